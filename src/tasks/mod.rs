//! Background tasks module
//!
//! The redeem loop and the display ticker run alongside the HTTP server.

pub mod countdown_ticker;
pub mod redeem_loop;

// Re-export main functions
pub use countdown_ticker::countdown_ticker_task;
pub use redeem_loop::redeem_loop_task;
