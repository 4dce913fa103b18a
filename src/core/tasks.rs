//! In-memory registry for fire-and-forget background tasks.
//!
//! `schedule` hands back a generated task id immediately and runs
//! the work on the tokio runtime; clients poll the id for the
//! terminal message. The registry is bounded: past `max_entries`
//! the oldest record is evicted, so a completion arriving for an
//! evicted task is dropped.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex};

use crate::core::error::Result;

/// Status text recorded while a task is still running
pub const STATUS_PENDING: &str = "pending";

/// Sentinel returned for unknown or evicted task ids
pub const STATUS_NOT_FOUND: &str = "Task not found";

struct TaskRecord {
    status: String,
}

struct RegistryInner {
    records: HashMap<String, TaskRecord>,
    order: VecDeque<String>,
}

/// Bounded map from task id to free-form status text
pub struct TaskRegistry {
    inner: Mutex<RegistryInner>,
    max_entries: usize,
}

impl TaskRegistry {
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                records: HashMap::new(),
                order: VecDeque::new(),
            }),
            max_entries,
        }
    }

    /// Schedule `work` and return its task id without waiting
    ///
    /// The record starts as `"pending"` and is overwritten exactly
    /// once: with the success text on `Ok`, or `"Error: <message>"`
    /// on `Err`.
    pub fn schedule<F>(self: &Arc<Self>, work: F) -> String
    where
        F: Future<Output = Result<String>> + Send + 'static,
    {
        let task_id = uuid::Uuid::new_v4().to_string();
        self.insert(&task_id);

        let registry = Arc::clone(self);
        let id = task_id.clone();
        tokio::spawn(async move {
            let status = match work.await {
                Ok(message) => message,
                Err(e) => format!("Error: {e}"),
            };
            registry.complete(&id, status);
        });

        task_id
    }

    /// Status text for `task_id`, or `None` if unknown or evicted
    pub fn status(&self, task_id: &str) -> Option<String> {
        let inner = self.inner.lock().expect("registry lock poisoned");
        inner.records.get(task_id).map(|r| r.status.clone())
    }

    /// Number of retained records
    pub fn len(&self) -> usize {
        self.inner.lock().expect("registry lock poisoned").records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, task_id: &str) {
        let mut inner = self.inner.lock().expect("registry lock poisoned");
        while inner.order.len() >= self.max_entries {
            if let Some(oldest) = inner.order.pop_front() {
                inner.records.remove(&oldest);
                tracing::debug!(task_id = %oldest, "Evicted oldest task record");
            }
        }
        inner.order.push_back(task_id.to_string());
        inner.records.insert(
            task_id.to_string(),
            TaskRecord {
                status: STATUS_PENDING.to_string(),
            },
        );
    }

    fn complete(&self, task_id: &str, status: String) {
        let mut inner = self.inner.lock().expect("registry lock poisoned");
        if let Some(record) = inner.records.get_mut(task_id) {
            record.status = status;
        }
        // Evicted ids fall through: the completion is dropped.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::GavelError;
    use std::time::Duration;

    #[tokio::test]
    async fn test_schedule_returns_immediately() {
        let registry = Arc::new(TaskRegistry::new(8));
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let task_id = registry.schedule(async move {
            rx.await.ok();
            Ok("wrote blob".to_string())
        });

        // Work has not finished; the record is still pending
        assert_eq!(registry.status(&task_id), Some(STATUS_PENDING.to_string()));

        tx.send(()).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(registry.status(&task_id), Some("wrote blob".to_string()));
    }

    #[tokio::test]
    async fn test_failed_task_records_error_message() {
        let registry = Arc::new(TaskRegistry::new(8));
        let task_id =
            registry.schedule(async { Err(GavelError::Store("disk full".to_string())) });

        tokio::time::sleep(Duration::from_millis(50)).await;
        let status = registry.status(&task_id).unwrap();
        assert!(status.starts_with("Error: "));
        assert!(status.contains("disk full"));
    }

    #[tokio::test]
    async fn test_unknown_task_id() {
        let registry = Arc::new(TaskRegistry::new(8));
        assert_eq!(registry.status("no-such-task"), None);
    }

    #[tokio::test]
    async fn test_bounded_registry_evicts_oldest() {
        let registry = Arc::new(TaskRegistry::new(2));

        let first = registry.schedule(async { Ok("one".to_string()) });
        let second = registry.schedule(async { Ok("two".to_string()) });
        let third = registry.schedule(async { Ok("three".to_string()) });

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.status(&first), None);
        assert!(registry.status(&second).is_some());
        assert!(registry.status(&third).is_some());
    }
}
