//! Core data types for the Gavel service.
//!
//! Defines group identity and status, token usage, and the
//! request/response shapes of the HTTP surface.

use serde::{Deserialize, Serialize};

/// Derived identifier for the set of blobs under a
/// `place/department/date` prefix
pub fn group_id(place: &str, department: &str, date: &str) -> String {
    format!("{place}-{department}-{date}")
}

/// Status of one group's index build, keyed by group id in the
/// batch status map
///
/// Created as `Pending` when the build starts, mutated at most once
/// more to a terminal state. A `Completed` message may carry the
/// accumulated per-document error annex inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GroupStatus {
    Pending,
    Completed { message: String },
    Failed { message: String },
}

impl GroupStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, GroupStatus::Failed { .. })
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, GroupStatus::Pending)
    }
}

/// Token usage reported by the summarization endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Request to submit a document for extraction and summarization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitDocumentRequest {
    /// Original filename; the extension declares the format
    pub filename: String,

    /// File bytes, base64-encoded
    pub content_base64: String,
}

/// Response from document submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitDocumentResponse {
    /// Token usage of the summarization call
    pub usage: TokenUsage,

    /// Blob path the extracted text was persisted under
    pub key: String,

    /// Structured summarization reply
    pub response: String,
}

/// Response from listing known places
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub places: Option<Vec<String>>,
}

/// Request to build the index for a single group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildGroupRequest {
    pub place: String,
    pub department: String,
    pub date: String,
}

/// Response from a single-group index build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildGroupResponse {
    pub group_id: String,
    pub token_count: usize,
    pub status: GroupStatus,
}

/// Request to build indexes for every group of a place
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPlaceRequest {
    pub place_name: String,
}

/// Request to write a cache entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheWriteRequest {
    pub key: String,
    pub value: String,

    /// TTL in seconds; the configured default applies when omitted
    #[serde(default)]
    pub ttl_seconds: Option<u64>,
}

/// Response from a cache read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheReadResponse {
    pub key: String,
    pub value: Option<String>,
}

/// Request to schedule a background blob write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleTaskRequest {
    pub filename: String,
    pub content: String,
}

/// Response from scheduling a background task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleTaskResponse {
    pub task_id: String,
}

/// Response from polling a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    pub task_id: String,
    pub status: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
