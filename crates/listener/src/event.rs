//! Decoding of document-created trigger events.

use firestore::{DecodeError, Document};
use serde::Deserialize;
use tasks::{CompanyId, Task, TaskId};
use thiserror::Error;

/// A creation the dispatcher reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerEvent {
    /// `tasks/{taskId}` was created; carries the record as written.
    TaskCreated(Task),

    /// `tasks/{taskId}/companies/{companyId}` was created.
    CompanyCreated {
        task_id: TaskId,
        company_id: CompanyId,
    },
}

/// Why an incoming event could not be turned into a [`TriggerEvent`].
#[derive(Debug, Error)]
pub enum EventError {
    #[error("event is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("event carries no created document")]
    MissingDocument,

    #[error("document {0:?} is neither a task nor a company of a task")]
    UnsupportedPath(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Accepts both the background-function form (`{"value": Document}`) and the
/// CloudEvents JSON form (`{"data": {"value": Document}}`).
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    value: Option<Document>,
    #[serde(default)]
    data: Option<DataEnvelope>,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope {
    #[serde(default)]
    value: Option<Document>,
}

impl TriggerEvent {
    /// Decodes a raw event body.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EventError> {
        let envelope: Envelope = serde_json::from_slice(bytes)?;
        let document = envelope
            .value
            .or_else(|| envelope.data.and_then(|data| data.value))
            .ok_or(EventError::MissingDocument)?;
        Self::from_document(&document)
    }

    /// Classifies a created document by its path.
    pub fn from_document(document: &Document) -> Result<Self, EventError> {
        let unsupported = || EventError::UnsupportedPath(document.name.clone());

        match document.relative_path().as_slice() {
            ["tasks", _] => Ok(Self::TaskCreated(document.to_task()?)),
            ["tasks", task, "companies", company] => Ok(Self::CompanyCreated {
                task_id: TaskId::new(*task).ok_or_else(unsupported)?,
                company_id: CompanyId::new(*company).ok_or_else(unsupported)?,
            }),
            _ => Err(unsupported()),
        }
    }

    /// The task this event belongs to.
    pub fn task_id(&self) -> &TaskId {
        match self {
            Self::TaskCreated(task) => &task.id,
            Self::CompanyCreated { task_id, .. } => task_id,
        }
    }
}
