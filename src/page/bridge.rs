//! HTTP page bridge adapter
//!
//! A small helper injected into the browser tab exposes the controls over
//! HTTP. This adapter speaks that JSON protocol:
//!
//! - `GET  {base}/elements/{control}`       -> 200 `ElementState` or 404
//!   (`reward-item` carries `?label=` so the bridge can pick the right tile)
//! - `POST {base}/elements/{control}/click` -> 2xx, 404 when missing
//! - `GET  {base}/cooldown`                 -> `{ "text": string | null }`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::{Control, ElementState, PageAdapter};
use crate::error::PageError;

#[derive(Debug, Deserialize)]
struct CooldownBody {
    text: Option<String>,
}

/// Page adapter backed by the HTTP bridge
#[derive(Debug, Clone)]
pub struct BridgePage {
    client: Client,
    base_url: String,
    reward_label: Option<String>,
}

impl BridgePage {
    /// Create an adapter for the bridge at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self, PageError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| PageError::Bridge(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            reward_label: None,
        })
    }

    /// Label the bridge should use to pick the reward tile
    pub fn with_reward_label(mut self, label: impl Into<String>) -> Self {
        self.reward_label = Some(label.into());
        self
    }

    fn element_url(&self, control: Control) -> String {
        format!("{}/elements/{}", self.base_url, control)
    }
}

#[async_trait]
impl PageAdapter for BridgePage {
    async fn find(&self, control: Control) -> Result<Option<ElementState>, PageError> {
        let mut request = self.client.get(self.element_url(control));
        if let (Control::RewardItem, Some(label)) = (control, &self.reward_label) {
            request = request.query(&[("label", label)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PageError::Bridge(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let element = response
                    .json::<ElementState>()
                    .await
                    .map_err(|e| PageError::Bridge(e.to_string()))?;
                Ok(Some(element))
            }
            status => Err(PageError::Status {
                control,
                status: status.as_u16(),
            }),
        }
    }

    async fn click(&self, control: Control) -> Result<(), PageError> {
        debug!("Bridge click on {}", control);

        let response = self
            .client
            .post(format!("{}/click", self.element_url(control)))
            .send()
            .await
            .map_err(|e| PageError::Bridge(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(PageError::Missing(control)),
            status if status.is_success() => Ok(()),
            status => Err(PageError::Status {
                control,
                status: status.as_u16(),
            }),
        }
    }

    async fn cooldown_text(&self) -> Result<Option<String>, PageError> {
        let body = self
            .client
            .get(format!("{}/cooldown", self.base_url))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| PageError::Bridge(e.to_string()))?
            .json::<CooldownBody>()
            .await
            .map_err(|e| PageError::Bridge(e.to_string()))?;

        Ok(body.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let page = BridgePage::new("http://127.0.0.1:9222/").unwrap();
        assert_eq!(
            page.element_url(Control::RedeemButton),
            "http://127.0.0.1:9222/elements/redeem-button"
        );
    }

    #[test]
    fn element_state_defaults_missing_fields() {
        let element: ElementState = serde_json::from_str("{}").unwrap();
        assert_eq!(element, ElementState::default());

        let element: ElementState =
            serde_json::from_str(r#"{"disabled":true,"text":"Redeem"}"#).unwrap();
        assert!(element.disabled);
    }

    async fn fake_bridge() -> String {
        use axum::{
            extract::{Path, Query},
            http::StatusCode,
            routing::{get, post},
            Json, Router,
        };
        use std::collections::HashMap;

        let app = Router::new()
            .route(
                "/elements/:control",
                get(
                    |Path(control): Path<String>, Query(query): Query<HashMap<String, String>>| async move {
                        match control.as_str() {
                            "redeem-button" => Ok(Json(ElementState::disabled("Redeem"))),
                            "reward-item" if query.get("label").map(String::as_str) == Some("RAFFLE") => {
                                Ok(Json(ElementState::enabled("RAFFLE")))
                            }
                            "error-alert" => Err(StatusCode::INTERNAL_SERVER_ERROR),
                            _ => Err(StatusCode::NOT_FOUND),
                        }
                    },
                ),
            )
            .route(
                "/elements/:control/click",
                post(|Path(control): Path<String>| async move {
                    if control == "open-menu" {
                        StatusCode::NO_CONTENT
                    } else {
                        StatusCode::NOT_FOUND
                    }
                }),
            )
            .route(
                "/cooldown",
                get(|| async { Json(serde_json::json!({ "text": "2m 5s" })) }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn speaks_bridge_protocol() {
        let page = BridgePage::new(fake_bridge().await)
            .unwrap()
            .with_reward_label("RAFFLE");

        assert_eq!(
            page.find(Control::RedeemButton).await.unwrap(),
            Some(ElementState::disabled("Redeem"))
        );
        assert!(page.find(Control::RewardItem).await.unwrap().is_some());
        assert_eq!(page.find(Control::MenuContainer).await.unwrap(), None);
        assert!(matches!(
            page.find(Control::ErrorAlert).await,
            Err(PageError::Status { status: 500, .. })
        ));

        page.click(Control::OpenMenu).await.unwrap();
        assert!(matches!(
            page.click(Control::RedeemButton).await,
            Err(PageError::Missing(Control::RedeemButton))
        ));

        assert_eq!(page.cooldown_text().await.unwrap().as_deref(), Some("2m 5s"));
    }

    #[tokio::test]
    async fn unlabelled_reward_lookup_misses() {
        let page = BridgePage::new(fake_bridge().await).unwrap();
        assert_eq!(page.find(Control::RewardItem).await.unwrap(), None);
    }
}
