//! Newtype domain identifiers.
//!
//! Every document identity is represented as a distinct newtype wrapping a
//! `String`. This prevents accidentally interchanging, for example, a
//! [`TaskId`] with a [`CompanyId`] even though both are document ids in the
//! same database.
//!
//! Empty strings are never valid identifiers: `new()` returns `None` for them,
//! so "absent" and "empty" collapse into the same `Option::None` state.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Rejected attempt to build an identifier from an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0} must not be empty")]
pub struct EmptyIdError(&'static str);

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        // Deserialization goes through `new`, so an empty id never decodes.
        impl TryFrom<String> for $name {
            type Error = EmptyIdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value).ok_or(EmptyIdError(stringify!($name)))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers — document ids
// ---------------------------------------------------------------------------

string_id! {
    /// Identifies a task document (`tasks/{taskId}`).
    TaskId
}

string_id! {
    /// Identifies a company document nested under a task
    /// (`tasks/{taskId}/companies/{companyId}`).
    CompanyId
}

string_id! {
    /// Identifies the organization a task is scoped to.
    ///
    /// A task without one cannot be dispatched.
    OrgId
}

// ---------------------------------------------------------------------------
// Identifiers — UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single fan-out run.
///
/// Generated fresh for every dispatch and recorded on its tracing span so all
/// per-company log lines of one run can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DispatchId(Uuid);

impl DispatchId {
    /// Generates a new random dispatch identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for DispatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
