//! Error types for the redeem controller

use thiserror::Error;

use crate::page::Control;

/// Failures reported by a page adapter
#[derive(Debug, Clone, Error)]
pub enum PageError {
    /// The bridge could not be reached or answered with garbage
    #[error("page bridge request failed: {0}")]
    Bridge(String),

    /// The bridge answered with an unexpected HTTP status
    #[error("page bridge returned status {status} for {control}")]
    Status { control: Control, status: u16 },

    /// A click was requested on a control that is not on the page
    #[error("cannot click {0}: not present")]
    Missing(Control),
}

/// Everything that can end a redeem cycle early
#[derive(Debug, Clone, Error)]
pub enum RedeemError {
    /// A control did not show up within the lookup timeout
    #[error("timeout waiting for {control}")]
    ElementNotFound { control: Control },

    /// Countdown text did not match `(<m>m )?<s>s`
    #[error("unrecognized cooldown text: {0:?}")]
    Parse(String),

    /// The site showed an alert after the redeem click
    #[error("redeem rejected by site")]
    RedeemRejected,

    #[error(transparent)]
    Page(#[from] PageError),
}

/// Persistence failures for the state file
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("state file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
