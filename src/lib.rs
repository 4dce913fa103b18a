//! Gavel - Municipal Meeting Document Service
//!
//! A backend service that ingests municipal meeting documents
//! (PDF or plain text), extracts and normalizes their text,
//! summarizes them through an OpenAI-compatible endpoint, and
//! builds per-group index artifacts in an object store.
//!
//! # Architecture
//!
//! The codebase is organized into two main modules:
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, types
//!   - store (object store trait, fs and memory backends)
//!   - extract (PDF/text extraction and normalization)
//!   - llm (summarization client)
//!   - index (place directory, group builder, batch orchestrator)
//!   - cache (TTL cache), tasks (background task registry)
//!   - services (unified service container)
//!
//! - **http**: REST API adapter (depends on core)
//!   - handlers, middleware

// Core domain logic (protocol-agnostic)
pub mod core;

// HTTP REST adapter
pub mod http;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{GavelError, Result};
pub use core::services::Services;
pub use core::store::{FsObjectStore, MemoryObjectStore, ObjectStore};
pub use core::types::*;
