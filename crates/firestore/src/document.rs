//! Firestore REST document model and decoding into domain types.
//!
//! Firestore encodes every field as a single-key object naming its type,
//! e.g. `{"stringValue": "O1"}` or `{"arrayValue": {"values": [...]}}`. Only
//! the fields Taskhook reads are decoded; everything else is ignored.

use serde::Deserialize;
use serde_json::{Map, Value};
use tasks::{CompanyRef, OrgId, Task, TaskId};
use thiserror::Error;
use tracing::debug;

/// Field holding the organization id on a task document.
pub const ORG_ID_FIELD: &str = "org_id";

/// Field holding the embedded company references on a task document.
pub const COMPANIES_FIELD: &str = "companies";

/// Keys looked up, in order, inside a map-shaped company entry.
const COMPANY_REF_KEYS: [&str; 4] = ["id", "company_id", "company_doc_id", "ref"];

/// Errors decoding a Firestore document into a domain record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("document name {0:?} does not end in a document id")]
    MissingId(String),
}

/// One Firestore document as returned by the REST API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name:
    /// `projects/{p}/databases/{d}/documents/{collection}/{id}[/...]`.
    pub name: String,

    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// The document id (last segment of [`Document::name`]).
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }

    /// The collection path relative to the database root, e.g.
    /// `["tasks", "T1", "companies", "C1"]`.
    pub fn relative_path(&self) -> Vec<&str> {
        let relative = match self.name.split_once("/documents/") {
            Some((_, rest)) => rest,
            None => self.name.as_str(),
        };
        relative.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Returns the field as a string if it is a `stringValue`.
    pub fn string_field(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(|value| value.get("stringValue"))
            .and_then(Value::as_str)
    }

    /// Decodes this document as a task.
    ///
    /// A missing or non-string `org_id` decodes to `None`. A `companies`
    /// field that is an array decodes to embedded references; any other
    /// shape (or no field at all) means the companies live in the
    /// sub-collection.
    pub fn to_task(&self) -> Result<Task, DecodeError> {
        let id = TaskId::new(self.id()).ok_or_else(|| DecodeError::MissingId(self.name.clone()))?;

        let org_id = self.string_field(ORG_ID_FIELD).and_then(|org| OrgId::new(org));
        if org_id.is_none() && self.fields.contains_key(ORG_ID_FIELD) {
            debug!(task_id = %id, "org_id field present but not a non-empty string");
        }

        let companies = self
            .fields
            .get(COMPANIES_FIELD)
            .and_then(|value| value.get("arrayValue"))
            .map(decode_company_array);

        Ok(Task {
            id,
            org_id,
            companies,
        })
    }
}

/// Decodes the contents of an `arrayValue` into company references.
///
/// An `arrayValue` with no `values` key is an empty array.
fn decode_company_array(array: &Value) -> Vec<CompanyRef> {
    array
        .get("values")
        .and_then(Value::as_array)
        .map(|values| values.iter().map(decode_company_ref).collect())
        .unwrap_or_default()
}

/// Decodes one array entry into a company reference.
///
/// Accepted shapes: `referenceValue` (document path), `stringValue` (path or
/// bare id), and `mapValue` holding one of those under a known key. Anything
/// else, including `nullValue`, yields an unresolved reference.
pub fn decode_company_ref(value: &Value) -> CompanyRef {
    if let Some(path) = value
        .get("referenceValue")
        .or_else(|| value.get("stringValue"))
        .and_then(Value::as_str)
    {
        return CompanyRef::from_path(path);
    }

    if let Some(fields) = value
        .get("mapValue")
        .and_then(|map| map.get("fields"))
        .and_then(Value::as_object)
    {
        if let Some(inner) = COMPANY_REF_KEYS.iter().find_map(|key| fields.get(*key)) {
            return decode_company_ref(inner);
        }
    }

    CompanyRef::unresolved()
}

/// One page of a `documents.list` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<Document>,

    #[serde(default)]
    pub next_page_token: Option<String>,
}
