#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dispatcher::{DispatchConfig, Dispatcher};
use tasks::{
    CompanyId, CompanyRef, NotificationPayload, Notifier, NotifyError, OrgId, ReadError, Task,
    TaskId, TaskReader,
};
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

pub fn task_id(value: &str) -> TaskId {
    TaskId::new(value).expect("task id")
}

pub fn org_id(value: &str) -> OrgId {
    OrgId::new(value).expect("org id")
}

pub fn company_id(value: &str) -> CompanyId {
    CompanyId::new(value).expect("company id")
}

pub fn companies(ids: &[&str]) -> Vec<Option<CompanyId>> {
    ids.iter().map(|id| Some(company_id(id))).collect()
}

pub fn refs(paths: &[&str]) -> Vec<CompanyRef> {
    paths.iter().map(|path| CompanyRef::from_path(path)).collect()
}

/// How the fake endpoint answers the call for one company.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Status(u16),
    DelayedStatus(Duration, u16),
    Hang,
    Panic,
}

/// Notifier that records every payload and answers per company id.
pub struct RecordingNotifier {
    replies: HashMap<String, Reply>,
    default_reply: Reply,
    calls: Mutex<Vec<NotificationPayload>>,
    completed: Mutex<Vec<Option<CompanyId>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            default_reply: Reply::Status(200),
            calls: Mutex::new(Vec::new()),
            completed: Mutex::new(Vec::new()),
        }
    }

    pub fn reply(mut self, company: &str, reply: Reply) -> Self {
        self.replies.insert(company.to_string(), reply);
        self
    }

    pub fn default_reply(mut self, reply: Reply) -> Self {
        self.default_reply = reply;
        self
    }

    pub fn calls(&self) -> Vec<NotificationPayload> {
        self.calls.lock().expect("poisoned mutex").clone()
    }

    pub fn called_companies(&self) -> Vec<Option<CompanyId>> {
        self.calls()
            .into_iter()
            .map(|payload| payload.company_doc_id)
            .collect()
    }

    /// Company ids in the order their calls finished.
    pub fn completion_order(&self) -> Vec<Option<CompanyId>> {
        self.completed.lock().expect("poisoned mutex").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, payload: &NotificationPayload) -> Result<u16, NotifyError> {
        self.calls
            .lock()
            .expect("poisoned mutex")
            .push(payload.clone());

        let key = payload
            .company_doc_id
            .as_ref()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default();
        let reply = self
            .replies
            .get(&key)
            .copied()
            .unwrap_or(self.default_reply);

        let status = match reply {
            Reply::Status(status) => status,
            Reply::DelayedStatus(delay, status) => {
                tokio::time::sleep(delay).await;
                status
            }
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                200
            }
            Reply::Panic => panic!("notifier exploded for {key}"),
        };

        self.completed
            .lock()
            .expect("poisoned mutex")
            .push(payload.company_doc_id.clone());

        if (200..300).contains(&status) {
            Ok(status)
        } else {
            Err(NotifyError::Status {
                status,
                body: "internal error".to_string(),
            })
        }
    }
}

/// In-memory document store.
#[derive(Default)]
pub struct MemoryReader {
    tasks: HashMap<TaskId, Task>,
    companies: HashMap<TaskId, Vec<CompanyRef>>,
    failing: bool,
    task_reads: AtomicUsize,
    company_reads: AtomicUsize,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.insert(task.id.clone(), task);
        self
    }

    pub fn with_companies(mut self, task: &str, paths: &[&str]) -> Self {
        self.companies.insert(task_id(task), refs(paths));
        self
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn task_reads(&self) -> usize {
        self.task_reads.load(Ordering::SeqCst)
    }

    pub fn company_reads(&self) -> usize {
        self.company_reads.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), ReadError> {
        if self.failing {
            Err(ReadError::Status {
                status: 503,
                body: "unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TaskReader for MemoryReader {
    async fn get_task(&self, task_id: &TaskId) -> Result<Option<Task>, ReadError> {
        self.task_reads.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.tasks.get(task_id).cloned())
    }

    async fn list_companies(&self, task_id: &TaskId) -> Result<Vec<CompanyRef>, ReadError> {
        self.company_reads.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.companies.get(task_id).cloned().unwrap_or_default())
    }
}

pub fn dispatcher(
    notifier: &Arc<RecordingNotifier>,
    reader: &Arc<MemoryReader>,
    config: DispatchConfig,
) -> Dispatcher {
    Dispatcher::new(notifier.clone(), reader.clone(), config)
}

/// One event seen by a [`LogCapture`].
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Layer that keeps every event emitted while it is installed.
///
/// Install it on a `current_thread` runtime so events from spawned calls
/// land on the same thread-local subscriber.
#[derive(Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&self) -> DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().expect("poisoned mutex").clone()
    }

    pub fn with_message(&self, message: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.message == message)
            .collect()
    }

    /// Company ids of the events carrying `message`, sorted.
    pub fn companies_logged(&self, message: &str) -> Vec<String> {
        let mut companies: Vec<String> = self
            .with_message(message)
            .iter()
            .filter_map(|event| event.field("company_id").map(str::to_string))
            .collect();
        companies.sort();
        companies
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let message = visitor.fields.remove("message").unwrap_or_default();

        self.events
            .lock()
            .expect("poisoned mutex")
            .push(CapturedEvent {
                level: *event.metadata().level(),
                message,
                fields: visitor.fields,
            });
    }
}

#[derive(Default)]
struct FieldVisitor {
    fields: HashMap<String, String>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.fields
            .insert(field.name().to_string(), format!("{value:?}"));
    }
}
