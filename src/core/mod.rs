//! Core domain logic, independent of any transport.

pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod index;
pub mod llm;
pub mod services;
pub mod store;
pub mod tasks;
pub mod types;
