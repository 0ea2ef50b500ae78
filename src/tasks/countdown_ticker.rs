//! Display layer task: folds controller messages and ticks the countdown

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{broadcast, watch},
    time::interval,
};
use tracing::{debug, error, warn};

use crate::{
    redeem::Clock,
    state::{DisplayState, Message},
};

/// Keeps the display snapshot current
///
/// The countdown is re-derived from the target timestamp every second on
/// this task's own tick; the controller only sends the target.
pub async fn countdown_ticker_task(
    mut messages: broadcast::Receiver<Message>,
    clock: Arc<dyn Clock>,
    display_tx: watch::Sender<DisplayState>,
) {
    debug!("Starting countdown ticker task");

    let mut ticker = interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = clock.now_ms();
                display_tx.send_if_modified(|state| {
                    let before = state.countdown.clone();
                    state.tick(now);
                    state.countdown != before
                });
            }
            received = messages.recv() => match received {
                Ok(message) => {
                    let now = clock.now_ms();
                    display_tx.send_modify(|state| state.apply(&message, now));
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Display fell behind, skipped {} messages", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    error!("Controller message bus closed, stopping display updates");
                    break;
                }
            }
        }
    }
}
