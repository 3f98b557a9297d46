//! Results of one fan-out.

use serde::Serialize;
use tasks::{CompanyId, DispatchId, NotifyError, OrgId, TaskId, Timestamp};

/// Settled result of the outbound call for one company.
#[derive(Debug, Clone, PartialEq)]
pub struct CallOutcome {
    /// Company the call was for (`None` for an unresolved reference).
    pub company_id: Option<CompanyId>,

    /// The 2xx status code, or why the call failed.
    pub result: Result<u16, NotifyError>,
}

impl CallOutcome {
    pub fn is_delivered(&self) -> bool {
        self.result.is_ok()
    }
}

/// Every call outcome of one dispatch, in launch order.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub dispatch_id: DispatchId,
    pub task_id: TaskId,
    pub org_id: OrgId,
    pub outcomes: Vec<CallOutcome>,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
}

impl DispatchReport {
    /// Number of outbound calls attempted (one per company).
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of calls that received a 2xx response.
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_delivered()).count()
    }

    /// Number of calls that failed for any reason.
    pub fn failed(&self) -> usize {
        self.attempted() - self.delivered()
    }

    /// Outcomes of the failed calls.
    pub fn failures(&self) -> impl Iterator<Item = &CallOutcome> {
        self.outcomes.iter().filter(|o| !o.is_delivered())
    }

    pub fn summary(&self) -> DispatchSummary {
        DispatchSummary {
            dispatch_id: self.dispatch_id,
            task_id: self.task_id.clone(),
            org_id: self.org_id.clone(),
            attempted: self.attempted(),
            delivered: self.delivered(),
            failed: self.failed(),
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }
}

/// Serializable digest of a [`DispatchReport`], returned by the event
/// receiver and printed by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchSummary {
    pub dispatch_id: DispatchId,
    pub task_id: TaskId,
    pub org_id: OrgId,
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
}
