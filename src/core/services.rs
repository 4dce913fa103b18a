//! Shared application services.
//!
//! One container wires the object store, summarization client,
//! cache, task registry and index machinery together. All fields
//! are behind Arc so handlers can clone the container freely.

use std::sync::Arc;

use crate::core::cache::TtlCache;
use crate::core::config::Config;
use crate::core::index::{BatchOrchestrator, IndexBuilder, PlaceDirectory};
use crate::core::llm::{OpenAiClient, SummarizationClient};
use crate::core::store::{FsObjectStore, MemoryObjectStore, ObjectStore};
use crate::core::tasks::TaskRegistry;

/// Shared state for request handlers
#[derive(Clone)]
pub struct Services {
    pub config: Arc<Config>,
    pub store: Arc<dyn ObjectStore>,
    pub llm: Arc<dyn SummarizationClient>,
    pub cache: Arc<TtlCache<String>>,
    pub tasks: Arc<TaskRegistry>,
    pub places: Arc<PlaceDirectory>,
    pub builder: Arc<IndexBuilder>,
    pub orchestrator: Arc<BatchOrchestrator>,
}

impl Services {
    /// Build the full service graph from configuration
    pub fn new(config: Config) -> Self {
        let store: Arc<dyn ObjectStore> = match config.storage.backend.as_str() {
            "memory" => Arc::new(MemoryObjectStore::new()),
            _ => Arc::new(FsObjectStore::new(config.storage.root_dir.clone())),
        };
        let llm: Arc<dyn SummarizationClient> = Arc::new(OpenAiClient::from_config(&config.llm));
        Self::with_parts(config, store, llm)
    }

    /// Build services around injected store and client implementations
    pub fn with_parts(
        config: Config,
        store: Arc<dyn ObjectStore>,
        llm: Arc<dyn SummarizationClient>,
    ) -> Self {
        let cache = Arc::new(TtlCache::new());
        let tasks = Arc::new(TaskRegistry::new(config.tasks.max_entries));

        let places = Arc::new(PlaceDirectory::new(
            Arc::clone(&store),
            config.storage.meta_container.clone(),
        ));
        let builder = Arc::new(IndexBuilder::new(
            Arc::clone(&store),
            Arc::clone(&llm),
            config.storage.source_container.clone(),
            config.storage.index_container.clone(),
        ));
        let orchestrator = Arc::new(BatchOrchestrator::new(
            Arc::clone(&store),
            Arc::clone(&places),
            Arc::clone(&builder),
            config.storage.source_container.clone(),
        ));

        Self {
            config: Arc::new(config),
            store,
            llm,
            cache,
            tasks,
            places,
            builder,
            orchestrator,
        }
    }
}
