//! Redeem loop background task

use std::sync::Arc;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::redeem::RedeemController;

/// Runs redeem cycles back to back until the session is cancelled
///
/// Cycles are strictly sequential: the next one starts only after the
/// follow-up of the previous one was scheduled and has elapsed. Cancellation
/// interrupts both an in-flight cycle and the wait between cycles.
pub async fn redeem_loop_task(controller: Arc<RedeemController>, session_id: u64, cancel: CancellationToken) {
    info!("Starting redeem loop for session {}", session_id);

    loop {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            outcome = controller.redeemer().run_cycle() => outcome,
        };

        let wait = outcome.wait(controller.redeemer().timings());
        if !controller.schedule_follow_up(session_id, &cancel, wait) {
            break;
        }

        debug!("Session {} sleeping {:?} before next cycle", session_id, wait);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = sleep(wait) => {}
        }
    }

    info!("Redeem loop for session {} finished", session_id);
}
