//! State management module
//!
//! Wire messages, the persisted run state and the display snapshot, plus the
//! shared application state handed to the HTTP layer.

pub mod app_state;
pub mod display_state;
pub mod messages;
pub mod store;

// Re-export main types
pub use app_state::AppState;
pub use display_state::DisplayState;
pub use messages::{Message, StatusLine};
pub use store::{PersistedState, StateStore};
