//! Taskhook fan-out dispatcher.
//!
//! Given a task and its companies, [`Dispatcher`] builds one
//! [`tasks::NotificationPayload`] per company, launches every outbound call
//! concurrently, and waits for all of them to settle. A failing call is
//! logged and recorded against its own company; it never cancels, delays, or
//! alters a sibling call, and never fails the dispatch as a whole.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** The dispatcher sequences calls between the domain
//! types in [`tasks`] and the [`tasks::Notifier`] / [`tasks::TaskReader`]
//! ports. It contains no transport details of its own.
//!
//! ## Entry points
//!
//! | Method | Trigger |
//! |--------|---------|
//! | [`Dispatcher::dispatch`] | Raw contract: task id, optional org id, company ids |
//! | [`Dispatcher::dispatch_task`] | A task document was created |
//! | [`Dispatcher::dispatch_company`] | A company document was created under a task |

mod config;
mod dispatcher;
mod report;

pub use config::{DispatchConfig, DEFAULT_CALL_TIMEOUT, DEFAULT_SETTLE_DELAY};
pub use dispatcher::Dispatcher;
pub use report::{CallOutcome, DispatchReport, DispatchSummary};
