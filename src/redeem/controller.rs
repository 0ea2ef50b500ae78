//! Owner of the redeem session: toggling, scheduling and reporting

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard,
    },
    time::Duration,
};

use tokio::{sync::broadcast, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::cycle::Redeemer;
use crate::{
    state::{Message, StateStore},
    tasks::redeem_loop_task,
};

/// A running redeem chain
///
/// Exists from toggle-on until toggle-off. The loop task only ever has one
/// follow-up pending, tracked by `next_check_timestamp`.
#[derive(Debug)]
struct RedeemSession {
    id: u64,
    cancel: CancellationToken,
    task: JoinHandle<()>,
    next_check_timestamp: i64,
}

/// Point-in-time view of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerStatus {
    pub running: bool,
    pub next_check_timestamp: i64,
}

/// Single owner of the redeem session
pub struct RedeemController {
    redeemer: Redeemer,
    store: Arc<StateStore>,
    bus: broadcast::Sender<Message>,
    session: Mutex<Option<RedeemSession>>,
    next_session_id: AtomicU64,
}

impl RedeemController {
    pub fn new(redeemer: Redeemer, store: Arc<StateStore>, bus: broadcast::Sender<Message>) -> Self {
        Self {
            redeemer,
            store,
            bus,
            session: Mutex::new(None),
            next_session_id: AtomicU64::new(1),
        }
    }

    pub fn redeemer(&self) -> &Redeemer {
        &self.redeemer
    }

    /// Subscribe to controller → display messages
    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.bus.subscribe()
    }

    /// Start the loop if idle, stop it if running. Returns the new run state.
    pub fn toggle(self: &Arc<Self>) -> bool {
        let mut slot = self.lock_session();

        if let Some(session) = slot.take() {
            session.cancel.cancel();
            info!("Auto-redeem stopped (session {})", session.id);
            self.publish_running(false);
            self.publish_countdown(0);
            false
        } else {
            let id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
            let cancel = CancellationToken::new();
            // The first cycle starts right away; it cannot schedule before
            // the session below is installed because we still hold the slot.
            let task = tokio::spawn(redeem_loop_task(Arc::clone(self), id, cancel.clone()));
            *slot = Some(RedeemSession {
                id,
                cancel,
                task,
                next_check_timestamp: 0,
            });
            info!("Auto-redeem started (session {})", id);
            self.publish_running(true);
            true
        }
    }

    /// Start the loop unless it already runs
    pub fn start(self: &Arc<Self>) -> bool {
        if self.is_running() {
            return true;
        }
        self.toggle()
    }

    /// Stop the loop unless it is already stopped
    pub fn stop(self: &Arc<Self>) -> bool {
        if !self.is_running() {
            return false;
        }
        self.toggle()
    }

    /// Cancel the running session without touching persisted state
    ///
    /// Used on process shutdown so the next start can resume.
    pub async fn halt(&self) {
        let session = self.lock_session().take();
        if let Some(session) = session {
            session.cancel.cancel();
            if let Err(e) = session.task.await {
                warn!("Redeem loop ended abnormally: {}", e);
            }
            info!("Redeem loop halted (session {})", session.id);
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock_session().is_some()
    }

    pub fn status(&self) -> ControllerStatus {
        let slot = self.lock_session();
        ControllerStatus {
            running: slot.is_some(),
            next_check_timestamp: slot.as_ref().map_or(0, |s| s.next_check_timestamp),
        }
    }

    /// Record and announce the next check for session `id`
    ///
    /// Returns `false` when the session was stopped or replaced meanwhile;
    /// the caller must then exit without waiting.
    pub(crate) fn schedule_follow_up(&self, id: u64, cancel: &CancellationToken, wait: Duration) -> bool {
        let mut slot = self.lock_session();

        let session = match slot.as_mut() {
            Some(session) if session.id == id && !cancel.is_cancelled() => session,
            _ => {
                debug!("Session {} no longer active, dropping follow-up", id);
                return false;
            }
        };

        let wait_ms = i64::try_from(wait.as_millis()).unwrap_or(i64::MAX);
        let timestamp = self.redeemer.clock().now_ms().saturating_add(wait_ms);
        session.next_check_timestamp = timestamp;
        debug!("Next check for session {} at {}", id, timestamp);
        self.publish_countdown(timestamp);
        true
    }

    fn publish_countdown(&self, timestamp: i64) {
        self.publish(Message::CountdownUpdate { timestamp });
        if let Err(e) = self.store.set_next_check_timestamp(timestamp) {
            warn!("Failed to persist next check timestamp: {}", e);
        }
    }

    fn publish_running(&self, running: bool) {
        self.publish(Message::StatusUpdate { running });
        if let Err(e) = self.store.set_running(running) {
            warn!("Failed to persist run state: {}", e);
        }
    }

    fn publish(&self, message: Message) {
        if self.bus.send(message).is_err() {
            debug!("No display listening for controller messages");
        }
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<RedeemSession>> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
