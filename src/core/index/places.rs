//! Place and department metadata lookup.
//!
//! The metadata container holds JSON blobs: `places.json` lists the
//! known places; `{place}.json` lists that place's departments. Both
//! are small documents read on demand, never cached here.

use std::sync::Arc;

use serde::Deserialize;

use crate::core::error::Result;
use crate::core::store::ObjectStore;

#[derive(Debug, Deserialize)]
struct PlacesDoc {
    places: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DepartmentsDoc {
    departments: Vec<DepartmentEntry>,
}

#[derive(Debug, Deserialize)]
struct DepartmentEntry {
    name: String,
}

/// Directory over place/department metadata blobs
pub struct PlaceDirectory {
    store: Arc<dyn ObjectStore>,
    meta_container: String,
}

impl PlaceDirectory {
    pub fn new(store: Arc<dyn ObjectStore>, meta_container: String) -> Self {
        Self {
            store,
            meta_container,
        }
    }

    /// All known place names
    pub async fn list_places(&self) -> Result<Vec<String>> {
        let raw = self
            .store
            .read_text(&self.meta_container, "places.json")
            .await?;
        let doc: PlacesDoc = serde_json::from_str(&raw)?;
        Ok(doc.places)
    }

    /// Department names for one place
    pub async fn departments(&self, place: &str) -> Result<Vec<String>> {
        let raw = self
            .store
            .read_text(&self.meta_container, &format!("{place}.json"))
            .await?;
        let doc: DepartmentsDoc = serde_json::from_str(&raw)?;
        Ok(doc.departments.into_iter().map(|d| d.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::GavelError;
    use crate::core::store::MemoryObjectStore;

    fn directory_with(blobs: &[(&str, &str)]) -> PlaceDirectory {
        let store = MemoryObjectStore::new();
        for (path, content) in blobs {
            store.put_bytes("meta", path, content.as_bytes().to_vec());
        }
        PlaceDirectory::new(Arc::new(store), "meta".to_string())
    }

    #[tokio::test]
    async fn test_list_places() {
        let directory = directory_with(&[(
            "places.json",
            r#"{"places": ["springfield", "shelbyville"]}"#,
        )]);

        let places = directory.list_places().await.unwrap();
        assert_eq!(places, vec!["springfield", "shelbyville"]);
    }

    #[tokio::test]
    async fn test_departments_ignore_extra_keys() {
        let directory = directory_with(&[(
            "springfield.json",
            r#"{"departments": [{"name": "zoning", "head": "Quimby"}, {"name": "land-use"}]}"#,
        )]);

        let departments = directory.departments("springfield").await.unwrap();
        assert_eq!(departments, vec!["zoning", "land-use"]);
    }

    #[tokio::test]
    async fn test_missing_metadata_is_not_found() {
        let directory = directory_with(&[]);
        let err = directory.list_places().await.unwrap_err();
        assert!(matches!(err, GavelError::BlobNotFound(_)));
    }

    #[tokio::test]
    async fn test_malformed_metadata_is_serde_error() {
        let directory = directory_with(&[("places.json", "not json")]);
        let err = directory.list_places().await.unwrap_err();
        assert!(matches!(err, GavelError::Serde(_)));
    }
}
