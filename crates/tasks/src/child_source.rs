//! [`ChildSource`] implementations for the two company representations.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::{ChildSource, CompanyId, CompanyRef, ReadError, Task, TaskId, TaskReader};

/// Companies stored as the task's `companies` sub-collection.
///
/// Each call to [`ChildSource::company_ids`] performs exactly one
/// [`TaskReader::list_companies`] read.
pub struct FetchedChildSource {
    reader: Arc<dyn TaskReader>,
    task_id: TaskId,
}

impl FetchedChildSource {
    pub fn new(reader: Arc<dyn TaskReader>, task_id: TaskId) -> Self {
        Self { reader, task_id }
    }
}

#[async_trait]
impl ChildSource for FetchedChildSource {
    async fn company_ids(&self) -> Result<Vec<Option<CompanyId>>, ReadError> {
        let refs = self.reader.list_companies(&self.task_id).await?;
        debug!(task_id = %self.task_id, count = refs.len(), "fetched company sub-collection");
        Ok(refs.into_iter().map(|company| company.id).collect())
    }
}

/// Companies embedded on the task record as an array of references.
pub struct EmbeddedChildSource {
    refs: Vec<CompanyRef>,
}

impl EmbeddedChildSource {
    pub fn new(refs: Vec<CompanyRef>) -> Self {
        Self { refs }
    }
}

#[async_trait]
impl ChildSource for EmbeddedChildSource {
    async fn company_ids(&self) -> Result<Vec<Option<CompanyId>>, ReadError> {
        Ok(self.refs.iter().map(|company| company.id.clone()).collect())
    }
}

/// Picks the source matching the shape `task` exposes: its embedded array
/// when present, otherwise the sub-collection behind `reader`.
pub fn select_child_source(task: &Task, reader: Arc<dyn TaskReader>) -> Box<dyn ChildSource> {
    match &task.companies {
        Some(refs) => Box::new(EmbeddedChildSource::new(refs.clone())),
        None => Box::new(FetchedChildSource::new(reader, task.id.clone())),
    }
}
