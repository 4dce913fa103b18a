//! Index building over grouped meeting documents.

pub mod batch;
pub mod builder;
pub mod places;

pub use batch::BatchOrchestrator;
pub use builder::{GroupIndex, IndexBuilder};
pub use places::PlaceDirectory;
