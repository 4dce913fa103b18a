//! HTTP REST adapter
//!
//! Depends only on core/. Request and response shapes live in
//! `core::types`; this layer is routing, extraction and status
//! mapping.

pub mod handlers;
pub mod middleware;

pub use handlers::*;
