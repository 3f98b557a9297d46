//! HTTP receiver for trigger events.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use dispatcher::{DispatchSummary, Dispatcher};
use serde::Serialize;
use tasks::{DispatchError, TaskId};
use tracing::warn;

use crate::{handle_trigger, TriggerEvent};

#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<Dispatcher>,
}

/// Body returned for every event delivery.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EventResponse {
    /// The fan-out ran; individual calls may still have failed.
    Dispatched(DispatchSummary),
    /// The precondition failed and nothing was sent.
    Skipped { reason: &'static str, task_id: TaskId },
    /// A read failed before any call was made.
    Failed { message: String },
    /// The body was not a usable trigger event.
    Rejected { message: String },
}

/// Builds the receiver:
///
/// - `POST /events` — one document-created event per request.
/// - `GET /healthz` — liveness.
pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route("/events", post(receive_event))
        .route("/healthz", get(healthz))
        .with_state(AppState { dispatcher })
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn receive_event(State(state): State<AppState>, body: Bytes) -> Response {
    let event = match TriggerEvent::from_slice(&body) {
        Ok(event) => event,
        Err(err) => {
            warn!(error = %err, "rejected trigger event");
            return respond(
                StatusCode::BAD_REQUEST,
                EventResponse::Rejected {
                    message: err.to_string(),
                },
            );
        }
    };

    match handle_trigger(&state.dispatcher, event).await {
        Ok(report) => respond(StatusCode::OK, EventResponse::Dispatched(report.summary())),
        Err(DispatchError::MissingOrgId { task_id }) => respond(
            StatusCode::OK,
            EventResponse::Skipped {
                reason: "missing_org_id",
                task_id,
            },
        ),
        // No call was made, so the trigger may safely redeliver.
        Err(err) => respond(
            StatusCode::BAD_GATEWAY,
            EventResponse::Failed {
                message: err.to_string(),
            },
        ),
    }
}

fn respond(status: StatusCode, body: EventResponse) -> Response {
    (status, Json(body)).into_response()
}
