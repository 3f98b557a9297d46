//! Shared value types for the task domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types
//! describe whole records (a [`Task`] and its [`CompanyRef`]s) and the derived
//! [`NotificationPayload`] that is sent once per company.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CompanyId, OrgId, TaskId};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A reference-like entry pointing at one company.
///
/// The referenced id may be missing (a `null` array entry, or an entry whose
/// shape carries no usable id). Such entries are kept rather than dropped so
/// that they still produce a notification with a `null` company id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRef {
    /// The referenced company, if one could be resolved.
    pub id: Option<CompanyId>,
}

impl CompanyRef {
    /// Creates a reference to a known company.
    pub fn new(id: CompanyId) -> Self {
        Self { id: Some(id) }
    }

    /// Creates a reference with no resolvable company id.
    pub fn unresolved() -> Self {
        Self { id: None }
    }

    /// Resolves a reference from a document path or a bare id.
    ///
    /// The id is the last non-empty `/`-separated segment, so
    /// `projects/p/databases/(default)/documents/companies/C1`, `companies/C1`
    /// and `C1` all resolve to `C1`.
    pub fn from_path(path: &str) -> Self {
        let id = path
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .and_then(|segment| CompanyId::new(segment));
        Self { id }
    }
}

// ---------------------------------------------------------------------------

/// A task document as seen at creation time.
///
/// `companies` distinguishes the two child representations:
///
/// - `None` — the record carries no embedded array; the companies live in
///   the `companies` sub-collection and must be fetched.
/// - `Some(refs)` — the record embeds its company references (possibly an
///   empty array).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Document id of the task.
    pub id: TaskId,

    /// Organization the task belongs to. `None` when absent or empty.
    pub org_id: Option<OrgId>,

    /// Embedded company references, when the record carries them.
    pub companies: Option<Vec<CompanyRef>>,
}

impl Task {
    /// Returns `true` if the companies are embedded on the record itself.
    pub fn has_embedded_companies(&self) -> bool {
        self.companies.is_some()
    }
}

// ---------------------------------------------------------------------------
// Outbound payload
// ---------------------------------------------------------------------------

/// Body of one outbound notification.
///
/// Serialized field names are the wire contract of the downstream endpoint.
/// `company_doc_id` serializes as `null` when the company could not be
/// resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// Parent task id; always equal to the dispatching task's id.
    pub task_doc_id: TaskId,

    /// Company this notification is for.
    pub company_doc_id: Option<CompanyId>,

    /// Organization id; always equal to the dispatching task's org.
    pub org_id: OrgId,
}

impl NotificationPayload {
    /// Builds the payload for one company of a task.
    pub fn new(task_id: TaskId, company_id: Option<CompanyId>, org_id: OrgId) -> Self {
        Self {
            task_doc_id: task_id,
            company_doc_id: company_id,
            org_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
