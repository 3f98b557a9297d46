//! Core domain for Taskhook.
//!
//! Taskhook reacts to the creation of a task document and sends one
//! notification per company of that task to a downstream endpoint. This crate
//! contains every domain concept, newtype identifier, and error type used for
//! that, plus the port traits that infrastructure crates implement.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`TaskId`, `CompanyId`, `OrgId`, `DispatchId`) |
//! | [`types`] | Records and values (`Task`, `CompanyRef`, `NotificationPayload`, `Timestamp`) |
//! | [`errors`] | `DispatchError`, `NotifyError`, `ReadError` |
//! | [`ports`] | `TaskReader`, `Notifier`, `ChildSource` |
//! | [`child_source`] | `FetchedChildSource`, `EmbeddedChildSource` |

pub mod child_source;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use child_source::{select_child_source, EmbeddedChildSource, FetchedChildSource};
pub use errors::{DispatchError, NotifyError, ReadError};
pub use identifiers::{CompanyId, DispatchId, EmptyIdError, OrgId, TaskId};
pub use ports::{ChildSource, Notifier, TaskReader};
pub use types::{CompanyRef, NotificationPayload, Task, Timestamp};
