//! HTTP API module
//!
//! The display side of the system: it relays the toggle command to the
//! controller and exposes the rendered status and the message stream.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/toggle", post(toggle_handler))
        .route("/messages", post(message_handler))
        .route("/status", get(status_handler))
        .route("/events", get(events_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        page::SimulatedPage,
        redeem::{CycleTimings, RedeemController, Redeemer, TokioClock},
        state::{DisplayState, StateStore},
        tasks::countdown_ticker_task,
    };
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use std::time::Duration;
    use tokio::sync::{broadcast, watch};
    use tower::ServiceExt;

    fn app(page: SimulatedPage) -> Router {
        let (bus, _) = broadcast::channel(64);
        let clock = Arc::new(TokioClock::starting_at(0));
        let redeemer = Redeemer::new(
            Arc::new(page),
            clock.clone(),
            CycleTimings::default(),
            "RAFFLE",
            bus.clone(),
        );
        let controller = Arc::new(RedeemController::new(
            redeemer,
            Arc::new(StateStore::in_memory()),
            bus,
        ));

        let (display_tx, display_rx) = watch::channel(DisplayState::default());
        tokio::spawn(countdown_ticker_task(controller.subscribe(), clock, display_tx));

        create_router(Arc::new(AppState::new(
            controller,
            display_rx,
            20554,
            "127.0.0.1".to_string(),
        )))
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test(start_paused = true)]
    async fn health_reports_ok() {
        let app = app(SimulatedPage::ready());
        let (status, body) = call(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_flips_run_state() {
        let app = app(SimulatedPage::ready().on_cooldown("45s"));

        let (status, body) = call(&app, "POST", "/toggle", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["running"], true);

        let (_, body) = call(&app, "POST", "/toggle", None).await;
        assert_eq!(body["running"], false);
    }

    #[tokio::test(start_paused = true)]
    async fn status_shows_cooldown_countdown() {
        let app = app(SimulatedPage::ready().on_cooldown("45s"));

        call(&app, "POST", "/messages", Some(r#"{"type":"TOGGLE_REDEEM"}"#)).await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        let (status, body) = call(&app, "GET", "/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["running"], true);
        assert_eq!(body["label"], "Status: Running");
        assert_eq!(body["toggle_label"], "Stop");
        assert_eq!(body["countdown"], "Next check in: 0m 46s");
        assert_eq!(body["next_check_timestamp"], 46_000);
        assert_eq!(body["status"]["text"], "On cooldown. Next check in 46s.");
        assert_eq!(body["status"]["color"], "#c00");
    }

    #[tokio::test(start_paused = true)]
    async fn display_bound_messages_are_rejected() {
        let app = app(SimulatedPage::ready());

        let (status, body) = call(
            &app,
            "POST",
            "/messages",
            Some(r#"{"type":"STATUS_UPDATE","running":true}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("TOGGLE_REDEEM"));
    }
}
