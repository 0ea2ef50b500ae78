//! What the display layer shows: run state, status line and countdown

use serde::{Deserialize, Serialize};

use super::{messages::StatusLine, Message, PersistedState};

/// Snapshot of everything the display renders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayState {
    pub running: bool,
    /// Latest status line reported by the controller
    pub status: Option<StatusLine>,
    /// Epoch ms of the next check, 0 when cleared
    pub next_check_timestamp: i64,
    /// Rendered countdown, empty when no check is scheduled
    pub countdown: String,
}

impl DisplayState {
    /// Restore the display from persisted values without waiting for a message
    pub fn restore(persisted: PersistedState, now_ms: i64) -> Self {
        let mut state = Self {
            running: persisted.auto_redeem_running,
            next_check_timestamp: persisted.next_check_timestamp,
            ..Self::default()
        };
        state.tick(now_ms);
        state
    }

    /// Fold one controller message into the snapshot
    pub fn apply(&mut self, message: &Message, now_ms: i64) {
        match message {
            Message::StatusUpdate { running } => self.running = *running,
            Message::RedeemStatus { text, color } => {
                self.status = Some(StatusLine {
                    text: text.clone(),
                    color: color.clone(),
                });
            }
            Message::CountdownUpdate { timestamp } => {
                self.next_check_timestamp = *timestamp;
                self.tick(now_ms);
            }
            Message::ToggleRedeem => {}
        }
    }

    /// Re-derive the countdown text from the target and the current time
    pub fn tick(&mut self, now_ms: i64) {
        self.countdown = render_countdown(self.next_check_timestamp, now_ms);
    }

    pub fn status_label(&self) -> &'static str {
        if self.running {
            "Status: Running"
        } else {
            "Status: Stopped"
        }
    }

    pub fn status_color(&self) -> &'static str {
        if self.running {
            "green"
        } else {
            "red"
        }
    }

    /// Label of the toggle button
    pub fn toggle_label(&self) -> &'static str {
        if self.running {
            "Stop"
        } else {
            "Start"
        }
    }
}

/// `Next check in: {m}m {s}s`, or an empty string when `target_ms` is 0
pub fn render_countdown(target_ms: i64, now_ms: i64) -> String {
    if target_ms == 0 {
        return String::new();
    }

    let remaining = (target_ms - now_ms).max(0);
    let minutes = remaining / 60_000;
    let seconds = (remaining % 60_000) / 1000;
    format!("Next check in: {}m {}s", minutes, seconds)
}
