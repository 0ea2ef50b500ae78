//! Shared application state for the HTTP layer

use std::{sync::Arc, time::Instant};

use tokio::sync::watch;

use super::DisplayState;
use crate::redeem::RedeemController;

/// Everything a request handler can reach
pub struct AppState {
    pub controller: Arc<RedeemController>,
    /// Latest display snapshot, kept current by the countdown ticker
    pub display_rx: watch::Receiver<DisplayState>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
}

impl AppState {
    pub fn new(
        controller: Arc<RedeemController>,
        display_rx: watch::Receiver<DisplayState>,
        port: u16,
        host: String,
    ) -> Self {
        Self {
            controller,
            display_rx,
            start_time: Instant::now(),
            port,
            host,
        }
    }

    /// Current display snapshot
    pub fn display(&self) -> DisplayState {
        self.display_rx.borrow().clone()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
