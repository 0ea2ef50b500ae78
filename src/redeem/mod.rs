//! Redeem control loop
//!
//! A cycle walks the reward menu through a [`PageAdapter`](crate::page::PageAdapter)
//! and picks a backoff from its outcome; the controller owns the session that
//! chains cycles together and handles the toggle.

pub mod clock;
pub mod controller;
pub mod cooldown;
pub mod cycle;
pub mod wait;

// Re-export main types
pub use clock::{Clock, SystemClock, TokioClock};
pub use controller::{ControllerStatus, RedeemController};
pub use cooldown::{cooldown_wait, CooldownReading, FALLBACK_WAIT};
pub use cycle::{CycleTimings, Outcome, Redeemer};
pub use wait::{await_condition, Timeout};
