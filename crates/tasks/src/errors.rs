//! Error types for the task domain.
//!
//! [`DispatchError`] covers the conditions under which a dispatch refuses to
//! start. Failures of individual outbound calls are *not* dispatch errors:
//! they are [`NotifyError`]s, recorded per company and never propagated.
//!
//! [`ReadError`] is produced by [`crate::TaskReader`] implementations.

use std::time::Duration;

use thiserror::Error;

use crate::TaskId;

// ---------------------------------------------------------------------------
// Dispatch-level errors
// ---------------------------------------------------------------------------

/// Conditions that stop a dispatch before any outbound call is made.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The parent task has no (or an empty) organization id.
    ///
    /// This is a hard guard, not a retry condition.
    #[error("org_id not found in task document {task_id}")]
    MissingOrgId {
        /// The task that could not be dispatched.
        task_id: TaskId,
    },

    /// The parent task of a newly created company could not be read.
    #[error("failed to read parent task {task_id}: {source}")]
    ParentLookup {
        /// The parent task that was being read.
        task_id: TaskId,
        /// The underlying read failure.
        #[source]
        source: ReadError,
    },

    /// The task's companies could not be enumerated.
    ///
    /// Produced only for fetched sub-collections; embedded arrays never fail.
    #[error("failed to enumerate companies of task {task_id}: {source}")]
    ChildEnumeration {
        /// The task whose children were being read.
        task_id: TaskId,
        /// The underlying read failure.
        #[source]
        source: ReadError,
    },
}

// ---------------------------------------------------------------------------
// Per-call errors
// ---------------------------------------------------------------------------

/// Failure of one outbound notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// The endpoint answered with a non-2xx status.
    #[error("endpoint returned status {status}: {body}")]
    Status {
        /// HTTP status code returned.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Transport(String),

    /// The call did not settle within its time bound.
    #[error("call timed out after {after:?}")]
    Timeout {
        /// The bound that was exceeded.
        after: Duration,
    },

    /// The task running the call panicked or was cancelled before it could
    /// report an outcome.
    #[error("call task aborted: {0}")]
    Join(String),
}

// ---------------------------------------------------------------------------
// Read errors
// ---------------------------------------------------------------------------

/// Failure of a read against the document store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// The request could not be sent or the response could not be read.
    #[error("document store request failed: {0}")]
    Transport(String),

    /// The store answered with an unexpected status.
    #[error("document store returned status {status}: {body}")]
    Status {
        /// HTTP status code returned.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The store returned a document that could not be decoded.
    #[error("malformed document: {0}")]
    Malformed(String),
}
