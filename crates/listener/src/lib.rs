//! Taskhook trigger boundary.
//!
//! Turns Firestore document-created events into [`dispatcher::Dispatcher`]
//! calls:
//!
//! | Created document | Event | Entry point |
//! |------------------|-------|-------------|
//! | `tasks/{taskId}` | [`TriggerEvent::TaskCreated`] | `Dispatcher::dispatch_task` |
//! | `tasks/{taskId}/companies/{companyId}` | [`TriggerEvent::CompanyCreated`] | `Dispatcher::dispatch_company` |
//!
//! Events arrive either as a raw body (see [`TriggerEvent::from_slice`]) or
//! over HTTP through [`router`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Envelope formats and HTTP status mapping live here.
//! The dispatcher never sees an event, only domain records.

mod event;
mod handler;
mod server;

pub use event::{EventError, TriggerEvent};
pub use handler::handle_trigger;
pub use server::{router, AppState, EventResponse};
