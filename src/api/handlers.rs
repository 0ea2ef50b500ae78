//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::{stream, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use super::responses::{ErrorResponse, HealthResponse, StatusResponse, ToggleResponse};
use crate::state::{AppState, Message};

/// Handle POST /toggle - Start or stop the redeem loop
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Json<ToggleResponse> {
    let running = state.controller.toggle();
    info!("Toggle endpoint called - auto-redeem {}", if running { "running" } else { "stopped" });
    Json(ToggleResponse::new(running))
}

/// Handle POST /messages - Accept a raw display message
///
/// Only `TOGGLE_REDEEM` travels in this direction; anything else is a
/// client mistake.
pub async fn message_handler(
    State(state): State<Arc<AppState>>,
    Json(message): Json<Message>,
) -> Result<Json<ToggleResponse>, (StatusCode, Json<ErrorResponse>)> {
    match message {
        Message::ToggleRedeem => {
            let running = state.controller.toggle();
            info!("TOGGLE_REDEEM received - auto-redeem {}", if running { "running" } else { "stopped" });
            Ok(Json(ToggleResponse::new(running)))
        }
        other => {
            warn!("Rejected controller-bound message: {:?}", other);
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "only TOGGLE_REDEEM can be sent to the controller".to_string(),
                }),
            ))
        }
    }
}

/// Handle GET /status - Return the display snapshot
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let display = state.display();

    Json(StatusResponse {
        running: display.running,
        label: display.status_label().to_string(),
        label_color: display.status_color().to_string(),
        toggle_label: display.toggle_label().to_string(),
        status: display.status.clone(),
        countdown: display.countdown.clone(),
        next_check_timestamp: display.next_check_timestamp,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
    })
}

/// Handle GET /events - Stream controller messages as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.controller.subscribe();

    let events = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(message) => {
                    let event = Event::default().json_data(&message).unwrap_or_else(|e| {
                        warn!("Failed to encode event: {}", e);
                        Event::default().comment("encoding error")
                    });
                    return Some((Ok::<_, Infallible>(event), rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream lagged, skipped {} messages", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
