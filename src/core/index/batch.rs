//! Batch index rebuilding across a whole place.
//!
//! Enumerates every `(place, department, date)` group from the
//! source container, then fans the group builds out concurrently.
//! All builds write their own key of one shared status map; keys are
//! disjoint by construction so no cross-key coordination is needed.
//! A failed group never aborts its siblings.

use std::collections::BTreeSet;
use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::task::JoinSet;

use crate::core::error::Result;
use crate::core::index::builder::IndexBuilder;
use crate::core::index::places::PlaceDirectory;
use crate::core::store::ObjectStore;
use crate::core::types::GroupStatus;

/// Fans out group index builds for all departments of a place
pub struct BatchOrchestrator {
    store: Arc<dyn ObjectStore>,
    places: Arc<PlaceDirectory>,
    builder: Arc<IndexBuilder>,
    source_container: String,
}

impl BatchOrchestrator {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        places: Arc<PlaceDirectory>,
        builder: Arc<IndexBuilder>,
        source_container: String,
    ) -> Self {
        Self {
            store,
            places,
            builder,
            source_container,
        }
    }

    /// Rebuild the index of every date group under every department
    /// of `place`, returning the status map keyed by group id
    pub async fn build_all(&self, place: &str) -> Result<HashMap<String, GroupStatus>> {
        let departments = self.places.departments(place).await?;
        let statuses: Arc<DashMap<String, GroupStatus>> = Arc::new(DashMap::new());

        let mut triples = Vec::new();
        for department in &departments {
            match self.list_dates(place, department).await {
                Ok(dates) => {
                    for date in dates {
                        triples.push((department.clone(), date));
                    }
                }
                Err(e) => {
                    // A department whose listing fails gets one failed
                    // entry under its place-department key; siblings
                    // still build.
                    tracing::error!(place, department = %department, error = %e, "Department listing failed");
                    statuses.insert(
                        format!("{place}-{department}"),
                        GroupStatus::Failed {
                            message: format!("Failed to list date groups: {e}"),
                        },
                    );
                }
            }
        }

        tracing::info!(place, groups = triples.len(), "Starting batch index build");

        let mut join_set = JoinSet::new();
        for (department, date) in triples {
            let builder = Arc::clone(&self.builder);
            let statuses = Arc::clone(&statuses);
            let place = place.to_string();
            join_set.spawn(async move {
                // The terminal status lands in the map either way.
                let _ = builder.build(&place, &department, &date, &statuses).await;
            });
        }

        while let Some(joined) = join_set.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "Group build task panicked");
            }
        }

        Ok(statuses
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect())
    }

    /// Distinct date tokens for one department, from the leading
    /// date token of each blob's filename; metadata blobs (`.json`)
    /// are skipped
    async fn list_dates(&self, place: &str, department: &str) -> Result<Vec<String>> {
        // Trailing slash matches the department as a whole segment, so
        // a sibling like `zoning-board` never leaks into `zoning`.
        let prefix = format!("{place}/{department}/");
        let names = self.store.list_names(&self.source_container, &prefix).await?;

        let mut dates = BTreeSet::new();
        for name in names {
            if name.ends_with(".json") {
                continue;
            }
            if let Some(date) = date_token(&name) {
                dates.insert(date);
            }
        }

        Ok(dates.into_iter().collect())
    }
}

/// Leading date token of a blob path's filename segment: the part
/// before the first `_`, or the whole stem when there is none
fn date_token(path: &str) -> Option<String> {
    let filename = path.split('/').nth(2)?;
    let stem = filename.rsplit_once('.').map(|(s, _)| s).unwrap_or(filename);
    let token = stem.split('_').next().unwrap_or(stem);
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
