//! Auto Redeem - redeems a channel reward whenever its cooldown expires
//!
//! A single controller walks the reward menu through a page adapter, backs
//! off according to what it found, and reports status and the next check
//! time to a display layer served over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod page;
pub mod redeem;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{PageError, RedeemError, StoreError};
pub use redeem::RedeemController;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
