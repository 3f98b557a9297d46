//! Taskhook document store adapter.
//!
//! Implements the [`tasks::TaskReader`] trait over the Firestore REST API v1
//! and decodes Firestore's typed field encoding into [`tasks::Task`] and
//! [`tasks::CompanyRef`] values. The decoding in [`document`] is shared with
//! the `listener` crate, which receives the same document encoding inside
//! trigger events.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** URLs, authentication, pagination, and field decoding
//! live here. The `dispatcher` crate sees only [`tasks::TaskReader`].
//!
//! ## Layout
//!
//! | Path | Read |
//! |------|------|
//! | `tasks/{taskId}` | [`FirestoreReader`]'s `get_task` |
//! | `tasks/{taskId}/companies` | [`FirestoreReader`]'s `list_companies`, all pages |

pub mod document;
mod reader;

pub use document::{decode_company_ref, DecodeError, Document, ListDocumentsResponse};
pub use reader::{
    FirestoreConfig, FirestoreReader, DEFAULT_BASE_URL, DEFAULT_DATABASE, DEFAULT_PAGE_SIZE,
};
