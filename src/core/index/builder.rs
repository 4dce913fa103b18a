//! Per-group index building.
//!
//! A group is the set of source blobs sharing a
//! `place/department/date` prefix. Building its index lists the
//! blobs, extracts and concatenates their text with per-document
//! labels, sums token counts, and writes a single derived artifact
//! to the index container. Per-document failures are accumulated
//! into the status message and never abort the group; only listing
//! or the final write fail the group as a whole.

use std::sync::Arc;

use dashmap::DashMap;

use crate::core::error::{GavelError, Result};
use crate::core::extract::{self, DocumentFormat};
use crate::core::llm::SummarizationClient;
use crate::core::store::ObjectStore;
use crate::core::types::{group_id, GroupStatus};

/// Result of one group's index build
#[derive(Debug, Clone)]
pub struct GroupIndex {
    pub text: String,
    pub token_count: usize,
}

/// Builds index artifacts for document groups
pub struct IndexBuilder {
    store: Arc<dyn ObjectStore>,
    llm: Arc<dyn SummarizationClient>,
    source_container: String,
    index_container: String,
}

impl IndexBuilder {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        llm: Arc<dyn SummarizationClient>,
        source_container: String,
        index_container: String,
    ) -> Self {
        Self {
            store,
            llm,
            source_container,
            index_container,
        }
    }

    /// Build the index for one `(place, department, date)` group
    ///
    /// The terminal status is written into `statuses` under the
    /// group id before this returns; the map starts at `Pending`
    /// when the build begins.
    pub async fn build(
        &self,
        place: &str,
        department: &str,
        date: &str,
        statuses: &DashMap<String, GroupStatus>,
    ) -> Result<GroupIndex> {
        let id = group_id(place, department, date);
        statuses.insert(id.clone(), GroupStatus::Pending);

        match self.build_inner(place, department, date).await {
            Ok((index, outcome_message)) => {
                statuses.insert(
                    id,
                    GroupStatus::Completed {
                        message: outcome_message,
                    },
                );
                Ok(index)
            }
            Err(e) => {
                let message = e.message();
                statuses.insert(
                    id,
                    GroupStatus::Failed {
                        message: message.clone(),
                    },
                );
                Err(e)
            }
        }
    }

    async fn build_inner(
        &self,
        place: &str,
        department: &str,
        date: &str,
    ) -> Result<(GroupIndex, String)> {
        let prefix = format!("{place}/{department}/{date}");
        let names = self
            .store
            .list_names(&self.source_container, &prefix)
            .await?;

        tracing::info!(
            place,
            department,
            date,
            documents = names.len(),
            "Building group index"
        );

        let mut text = String::new();
        let mut token_count = 0usize;
        let mut errors = String::new();
        let mut documents_indexed = 0usize;

        for name in &names {
            match self.append_document(name, &mut text).await {
                Ok(()) => {
                    documents_indexed += 1;
                    token_count = self.llm.count_tokens(&text);
                }
                Err(e) => {
                    tracing::warn!(blob = %name, error = %e, "Skipping document");
                    if !errors.is_empty() {
                        errors.push_str("; ");
                    }
                    errors.push_str(&format!("{name}: {e}"));
                    // Continue with the remaining documents
                }
            }
        }

        let artifact = format!("{place}/{department}/{date}_{token_count}.txt");
        self.store
            .ensure_container(&self.index_container)
            .await?;
        self.store
            .write_text(&self.index_container, &artifact, &text)
            .await?;

        let mut message = format!(
            "Indexed {documents_indexed} of {} documents ({token_count} tokens) into {artifact}",
            names.len()
        );
        if !errors.is_empty() {
            message.push_str(&format!("; failed documents: {errors}"));
        }

        tracing::info!(group = %group_id(place, department, date), %message, "Group index complete");

        Ok((GroupIndex { text, token_count }, message))
    }

    /// Read one source blob, extract its text, and append it with
    /// its date-time label
    async fn append_document(&self, name: &str, text: &mut String) -> Result<()> {
        let label = name
            .split('/')
            .nth(2)
            .ok_or_else(|| GavelError::Store(format!("Blob path too shallow: {name}")))?;

        let format = DocumentFormat::from_filename(name)?;
        let bytes = self.store.read_bytes(&self.source_container, name).await?;
        let extracted = extract::extract(&bytes, format)?;

        text.push_str(label);
        text.push('\n');
        text.push_str(&extracted);
        text.push('\n');
        Ok(())
    }
}
