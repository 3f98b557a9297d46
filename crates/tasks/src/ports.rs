//! Port traits implemented by infrastructure crates.
//!
//! - [`TaskReader`] — the read boundary (implemented by `firestore`).
//! - [`Notifier`] — the outbound call (implemented by `notify-api`).
//! - [`ChildSource`] — the two ways a task's companies are discovered
//!   (implemented in [`crate::child_source`]).
//!
//! All traits are object-safe and `Send + Sync` so one shared instance can be
//! used by many concurrent calls.

use async_trait::async_trait;

use crate::{CompanyId, CompanyRef, NotificationPayload, NotifyError, ReadError, Task, TaskId};

/// Read access to task documents and their `companies` sub-collection.
#[async_trait]
pub trait TaskReader: Send + Sync {
    /// Looks up a task by id. Returns `Ok(None)` if the document does not exist.
    async fn get_task(&self, task_id: &TaskId) -> Result<Option<Task>, ReadError>;

    /// Lists every document of the task's `companies` sub-collection.
    async fn list_companies(&self, task_id: &TaskId) -> Result<Vec<CompanyRef>, ReadError>;
}

/// Sends one notification to the downstream endpoint.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers `payload` once, returning the 2xx status code on success.
    ///
    /// Implementations never retry.
    async fn notify(&self, payload: &NotificationPayload) -> Result<u16, NotifyError>;
}

/// Yields the company ids of one task, whatever shape the task stores them in.
#[async_trait]
pub trait ChildSource: Send + Sync {
    /// Materializes the company ids. Unresolvable references yield `None`
    /// entries rather than being skipped.
    async fn company_ids(&self) -> Result<Vec<Option<CompanyId>>, ReadError>;
}
