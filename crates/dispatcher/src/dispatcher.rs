use std::sync::Arc;
use std::time::Duration;

use tasks::{
    select_child_source, CompanyId, DispatchError, DispatchId, NotificationPayload, Notifier,
    NotifyError, OrgId, Task, TaskId, TaskReader, Timestamp,
};
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::{CallOutcome, DispatchConfig, DispatchReport};

/// Sends one notification per company of a task, concurrently.
///
/// Construct once per process with the shared clients and reuse it for every
/// trigger; the dispatcher itself holds no per-dispatch state.
pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
    reader: Arc<dyn TaskReader>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        reader: Arc<dyn TaskReader>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            notifier,
            reader,
            config,
        }
    }

    /// Fans out one notification per entry of `companies`.
    ///
    /// Refuses to start, making no call at all, when `org_id` is `None`.
    /// Otherwise every call is launched before any is awaited, each one is
    /// bounded by [`DispatchConfig::call_timeout`], and this returns once all
    /// of them have settled. Individual call failures are logged and recorded
    /// in the report; they never turn into an `Err`.
    pub async fn dispatch(
        &self,
        task_id: &TaskId,
        org_id: Option<&OrgId>,
        companies: Vec<Option<CompanyId>>,
    ) -> Result<DispatchReport, DispatchError> {
        let org_id = require_org(task_id, org_id)?;

        let dispatch_id = DispatchId::new_random();
        let span = info_span!(
            "dispatch",
            %dispatch_id,
            %task_id,
            %org_id,
            companies = companies.len()
        );

        Ok(self
            .fan_out(dispatch_id, task_id, org_id, companies)
            .instrument(span)
            .await)
    }

    /// Entry point for a newly created task document.
    ///
    /// Checks the org id, waits for [`DispatchConfig::settle_delay`], then
    /// enumerates the companies from whichever shape the record exposes.
    pub async fn dispatch_task(&self, task: &Task) -> Result<DispatchReport, DispatchError> {
        let org_id = require_org(&task.id, task.org_id.as_ref())?;

        self.settle().await;

        let children = select_child_source(task, Arc::clone(&self.reader));
        let companies = children.company_ids().await.map_err(|source| {
            error!(task_id = %task.id, error = %source, "failed to enumerate companies");
            DispatchError::ChildEnumeration {
                task_id: task.id.clone(),
                source,
            }
        })?;

        self.dispatch(&task.id, Some(org_id), companies).await
    }

    /// Entry point for a newly created company document.
    ///
    /// Waits for [`DispatchConfig::settle_delay`], reads the parent task for
    /// its org id, and dispatches exactly one notification. A parent document
    /// that does not exist is treated as a missing org id.
    pub async fn dispatch_company(
        &self,
        task_id: &TaskId,
        company_id: CompanyId,
    ) -> Result<DispatchReport, DispatchError> {
        self.settle().await;

        let parent = self.reader.get_task(task_id).await.map_err(|source| {
            error!(%task_id, error = %source, "failed to read parent task");
            DispatchError::ParentLookup {
                task_id: task_id.clone(),
                source,
            }
        })?;

        let org_id = match parent {
            Some(task) => task.org_id,
            None => {
                warn!(%task_id, "parent task document not found");
                None
            }
        };

        self.dispatch(task_id, org_id.as_ref(), vec![Some(company_id)])
            .await
    }

    async fn settle(&self) {
        let delay = self.config.settle_delay;
        if !delay.is_zero() {
            debug!(?delay, "waiting for companies to become visible");
            tokio::time::sleep(delay).await;
        }
    }

    async fn fan_out(
        &self,
        dispatch_id: DispatchId,
        task_id: &TaskId,
        org_id: &OrgId,
        companies: Vec<Option<CompanyId>>,
    ) -> DispatchReport {
        let started_at = Timestamp::now();

        let calls: Vec<_> = companies
            .into_iter()
            .map(|company_id| {
                let payload =
                    NotificationPayload::new(task_id.clone(), company_id.clone(), org_id.clone());
                let call = deliver(
                    Arc::clone(&self.notifier),
                    payload,
                    self.config.call_timeout,
                );
                (company_id, tokio::spawn(call.in_current_span()))
            })
            .collect();

        // Every call is already running; awaiting in launch order only
        // collects results.
        let mut outcomes = Vec::with_capacity(calls.len());
        for (company_id, handle) in calls {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    error!(
                        company_id = company_label(company_id.as_ref()),
                        error = %join_error,
                        "notification task aborted"
                    );
                    CallOutcome {
                        company_id,
                        result: Err(NotifyError::Join(join_error.to_string())),
                    }
                }
            };
            outcomes.push(outcome);
        }

        let report = DispatchReport {
            dispatch_id,
            task_id: task_id.clone(),
            org_id: org_id.clone(),
            outcomes,
            started_at,
            finished_at: Timestamp::now(),
        };

        info!(
            attempted = report.attempted(),
            delivered = report.delivered(),
            failed = report.failed(),
            "dispatch completed"
        );

        report
    }
}

fn require_org<'a>(
    task_id: &TaskId,
    org_id: Option<&'a OrgId>,
) -> Result<&'a OrgId, DispatchError> {
    org_id.ok_or_else(|| {
        error!(%task_id, "org_id not found in task document; nothing dispatched");
        DispatchError::MissingOrgId {
            task_id: task_id.clone(),
        }
    })
}

async fn deliver(
    notifier: Arc<dyn Notifier>,
    payload: NotificationPayload,
    call_timeout: Duration,
) -> CallOutcome {
    let result = match tokio::time::timeout(call_timeout, notifier.notify(&payload)).await {
        Ok(result) => result,
        Err(_) => Err(NotifyError::Timeout {
            after: call_timeout,
        }),
    };

    let company = company_label(payload.company_doc_id.as_ref());
    match &result {
        Ok(status) => info!(company_id = company, status, "notification delivered"),
        Err(error) => warn!(company_id = company, %error, "notification failed"),
    }

    CallOutcome {
        company_id: payload.company_doc_id,
        result,
    }
}

fn company_label(company_id: Option<&CompanyId>) -> &str {
    company_id.map_or("<null>", CompanyId::as_str)
}
