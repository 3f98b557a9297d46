use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tasks::{CompanyRef, ReadError, Task, TaskId, TaskReader};
use tracing::debug;
use url::Url;

use crate::document::{Document, ListDocumentsResponse};

/// Public Firestore REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1/";

/// Name of the default database of a project.
pub const DEFAULT_DATABASE: &str = "(default)";

/// Page size requested when listing a sub-collection.
pub const DEFAULT_PAGE_SIZE: u32 = 300;

const TASKS_COLLECTION: &str = "tasks";
const COMPANIES_COLLECTION: &str = "companies";

/// Location of, and credentials for, one Firestore database.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    pub base_url: Url,
    pub project_id: String,
    pub database: String,
    /// OAuth2 access token sent as a bearer token, if any.
    pub access_token: Option<String>,
    pub page_size: u32,
}

impl FirestoreConfig {
    /// Configuration for the default database of `project_id` on the public
    /// endpoint, without credentials.
    pub fn new(project_id: impl Into<String>, base_url: Url) -> Self {
        Self {
            base_url,
            project_id: project_id.into(),
            database: DEFAULT_DATABASE.to_string(),
            access_token: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// [`TaskReader`] over the Firestore REST API v1.
#[derive(Clone)]
pub struct FirestoreReader {
    http: Client,
    config: FirestoreConfig,
}

impl FirestoreReader {
    pub fn new(config: FirestoreConfig, http: Client) -> Self {
        Self { http, config }
    }

    /// Builds `{base}/projects/{p}/databases/{d}/documents/{segments...}`,
    /// percent-encoding each segment.
    fn documents_url(&self, segments: &[&str]) -> Result<Url, ReadError> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ReadError::Transport(format!(
                    "base url {} cannot carry a path",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .extend([
                "projects",
                self.config.project_id.as_str(),
                "databases",
                self.config.database.as_str(),
                "documents",
            ])
            .extend(segments);
        Ok(url)
    }

    fn get(&self, url: Url) -> RequestBuilder {
        let request = self.http.get(url);
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, url: Url) -> Result<Response, ReadError> {
        debug!(%url, "reading document store");
        self.get(url)
            .send()
            .await
            .map_err(|error| ReadError::Transport(error.to_string()))
    }
}

#[async_trait]
impl TaskReader for FirestoreReader {
    async fn get_task(&self, task_id: &TaskId) -> Result<Option<Task>, ReadError> {
        let url = self.documents_url(&[TASKS_COLLECTION, task_id.as_str()])?;
        let response = self.send(url).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let document: Document = parse_json(response).await?;
        document
            .to_task()
            .map(Some)
            .map_err(|error| ReadError::Malformed(error.to_string()))
    }

    async fn list_companies(&self, task_id: &TaskId) -> Result<Vec<CompanyRef>, ReadError> {
        let base = self.documents_url(&[TASKS_COLLECTION, task_id.as_str(), COMPANIES_COLLECTION])?;

        let mut companies = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();
        loop {
            let mut url = base.clone();
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("pageSize", &self.config.page_size.to_string());
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let page: ListDocumentsResponse = parse_json(self.send(url).await?).await?;
            companies.extend(
                page.documents
                    .iter()
                    .map(|document| CompanyRef::from_path(&document.name)),
            );

            match page.next_page_token {
                Some(token) if !token.is_empty() => {
                    if !seen_tokens.insert(token.clone()) {
                        return Err(ReadError::Malformed(format!(
                            "page token {token:?} repeated while listing companies of {task_id}"
                        )));
                    }
                    page_token = Some(token);
                }
                _ => break,
            }
        }

        debug!(%task_id, count = companies.len(), "listed companies");
        Ok(companies)
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ReadError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ReadError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|error| ReadError::Malformed(error.to_string()))
}
