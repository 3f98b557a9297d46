//! Taskhook CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration** from flags and environment (see [`cli`]).
//! 2. **Wire observability**: `tracing-subscriber` with a pretty or JSON
//!    layer, plus an OpenTelemetry OTLP exporter when
//!    `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
//! 3. **Construct infrastructure**: a [`notify_api::HttpNotifier`] and a
//!    [`firestore::FirestoreReader`], injected into a
//!    [`dispatcher::Dispatcher`].
//! 4. **Select the run mode**:
//!    - `serve` runs the HTTP event receiver until Ctrl-C.
//!    - `replay` feeds one event body through the same path as `serve`.
//!    - `send` calls `dispatch` directly with an explicit company list.

mod cli;
mod telemetry;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use dispatcher::{DispatchConfig, DispatchReport, Dispatcher};
use firestore::{FirestoreConfig, FirestoreReader};
use listener::TriggerEvent;
use notify_api::HttpNotifier;
use tasks::{CompanyId, DispatchError, OrgId, TaskId};
use tokio::io::AsyncReadExt;
use tracing::{error, info};

use cli::{Cli, Commands, DispatchArgs, ReplayArgs, SendArgs, ServeArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let telemetry = telemetry::init(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "taskhook starting");

    let result = match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Replay(args) => replay(args).await,
        Commands::Send(args) => send(args).await,
    };

    if let Err(ref err) = result {
        error!(error = %err, "command failed");
    }

    telemetry.shutdown();
    result
}

fn build_dispatcher(args: &DispatchArgs) -> Result<Dispatcher> {
    let notifier = HttpNotifier::new(args.endpoint.clone(), args.call_timeout())
        .context("failed to build notification client")?;

    let http = reqwest::Client::builder()
        .timeout(args.call_timeout())
        .build()
        .context("failed to build document store client")?;
    let mut store = FirestoreConfig::new(
        args.firestore_project.clone(),
        args.firestore_base_url.clone(),
    );
    store.database = args.firestore_database.clone();
    store.access_token = args.firestore_token.clone();
    let reader = FirestoreReader::new(store, http);

    let config = DispatchConfig {
        settle_delay: args.settle_delay(),
        call_timeout: args.call_timeout(),
    };

    Ok(Dispatcher::new(Arc::new(notifier), Arc::new(reader), config))
}

async fn serve(args: ServeArgs) -> Result<()> {
    let dispatcher = Arc::new(build_dispatcher(&args.dispatch)?);
    let app = listener::router(dispatcher);

    let socket = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!(bind = %args.bind, endpoint = %args.dispatch.endpoint, "listening for events");

    axum::serve(socket, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("event receiver failed")?;

    info!("event receiver stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for Ctrl-C");
    }
}

async fn replay(args: ReplayArgs) -> Result<()> {
    let dispatcher = build_dispatcher(&args.dispatch)?;
    let body = read_event(&args.event).await?;
    let event = TriggerEvent::from_slice(&body).context("failed to decode event")?;

    let outcome = listener::handle_trigger(&dispatcher, event).await;
    print_outcome(outcome)
}

async fn read_event(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut body = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut body)
            .await
            .context("failed to read event from stdin")?;
        return Ok(body);
    }

    tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read event from {}", path.display()))
}

async fn send(args: SendArgs) -> Result<()> {
    let dispatcher = build_dispatcher(&args.dispatch)?;
    let task_id = TaskId::new(args.task_id).context("task id must not be empty")?;
    let org_id = args.org_id.and_then(|org| OrgId::new(org));
    let companies: Vec<Option<CompanyId>> =
        args.companies.into_iter().map(|id| CompanyId::new(id)).collect();

    let outcome = dispatcher.dispatch(&task_id, org_id.as_ref(), companies).await;
    print_outcome(outcome)
}

/// Prints the summary on stdout. A missing org is a skip, not a failure.
fn print_outcome(outcome: Result<DispatchReport, DispatchError>) -> Result<()> {
    match outcome {
        Ok(report) => {
            let summary = serde_json::to_string_pretty(&report.summary())?;
            println!("{summary}");
            Ok(())
        }
        Err(DispatchError::MissingOrgId { task_id }) => {
            info!(%task_id, "nothing dispatched");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
