//! Page adapter module
//!
//! The redeem loop never touches markup directly. It asks a [`PageAdapter`]
//! for a handful of named controls, so site selectors live in one place and
//! the loop can be driven by an in-memory page in tests.

pub mod bridge;
pub mod simulated;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PageError;

pub use bridge::BridgePage;
pub use simulated::SimulatedPage;

/// Controls the redeem loop needs to find on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// Button that toggles the rewards menu open and closed
    OpenMenu,
    /// Body of the rewards menu, present once it has rendered
    MenuContainer,
    /// Tile of the configured reward, matched by its image label
    RewardItem,
    /// Button whose text contains "redeem"
    RedeemButton,
    /// Any element with `role="alert"`
    ErrorAlert,
}

impl Control {
    /// Path segment used by the page bridge
    pub fn as_str(&self) -> &'static str {
        match self {
            Control::OpenMenu => "open-menu",
            Control::MenuContainer => "menu-container",
            Control::RewardItem => "reward-item",
            Control::RedeemButton => "redeem-button",
            Control::ErrorAlert => "error-alert",
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the adapter could observe about a located control
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementState {
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub text: String,
}

impl ElementState {
    pub fn enabled(text: impl Into<String>) -> Self {
        Self {
            disabled: false,
            text: text.into(),
        }
    }

    pub fn disabled(text: impl Into<String>) -> Self {
        Self {
            disabled: true,
            text: text.into(),
        }
    }
}

/// Narrow view of the target page used by the redeem loop
#[async_trait]
pub trait PageAdapter: Send + Sync {
    /// Look a control up once. `Ok(None)` means "not on the page yet".
    async fn find(&self, control: Control) -> Result<Option<ElementState>, PageError>;

    /// Activate a control
    async fn click(&self, control: Control) -> Result<(), PageError>;

    /// Raw countdown text shown next to a disabled redeem button
    async fn cooldown_text(&self) -> Result<Option<String>, PageError>;
}
