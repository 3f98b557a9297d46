//! Taskhook outbound notification adapter.
//!
//! Implements the [`tasks::Notifier`] trait by POSTing each
//! [`tasks::NotificationPayload`] as JSON to one fixed endpoint.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, timeouts, and status mapping live here.
//! The `dispatcher` crate sees only [`tasks::Notifier`].
//!
//! ## Wire contract
//!
//! ```text
//! POST <endpoint>
//! Content-Type: application/json
//!
//! {"task_doc_id": "T1", "company_doc_id": "C1", "org_id": "O1"}
//! ```
//!
//! No authentication headers are sent. Any 2xx response is a delivery; every
//! other status, and every transport failure, is a [`tasks::NotifyError`].

mod client;

pub use client::{HttpNotifier, NotifierBuildError};
