//! In-memory page used by `--simulate` and by the loop tests

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;

use super::{Control, ElementState, PageAdapter};
use crate::error::PageError;

#[derive(Debug, Default)]
struct Inner {
    elements: HashMap<Control, ElementState>,
    /// Lookups that still have to miss before a control shows up
    pending_lookups: HashMap<Control, u32>,
    broken: Vec<Control>,
    cooldown_text: Option<String>,
    alert_on_redeem: bool,
    cooldown_after_redeem: Option<String>,
    clicks: Vec<Control>,
}

/// Scriptable page that records every click
#[derive(Debug, Default)]
pub struct SimulatedPage {
    inner: Mutex<Inner>,
}

impl SimulatedPage {
    /// Empty page: no control is present
    pub fn new() -> Self {
        Self::default()
    }

    /// Page with the menu, reward tile and an enabled redeem button
    pub fn ready() -> Self {
        Self::new()
            .with_control(Control::OpenMenu, ElementState::enabled(""))
            .with_control(Control::MenuContainer, ElementState::enabled(""))
            .with_control(Control::RewardItem, ElementState::enabled("RAFFLE"))
            .with_control(Control::RedeemButton, ElementState::enabled("Redeem"))
    }

    pub fn with_control(self, control: Control, element: ElementState) -> Self {
        self.lock().elements.insert(control, element);
        self
    }

    pub fn without_control(self, control: Control) -> Self {
        self.lock().elements.remove(&control);
        self
    }

    /// Disable the redeem button and show `text` as its countdown
    pub fn on_cooldown(self, text: impl Into<String>) -> Self {
        {
            let mut inner = self.lock();
            inner.elements.insert(Control::RedeemButton, ElementState::disabled("Redeem"));
            inner.cooldown_text = Some(text.into());
        }
        self
    }

    /// Disable the redeem button without any readable countdown
    pub fn disabled_without_countdown(self) -> Self {
        {
            let mut inner = self.lock();
            inner.elements.insert(Control::RedeemButton, ElementState::disabled("Redeem"));
            inner.cooldown_text = None;
        }
        self
    }

    /// Raise an alert when the redeem button is clicked
    pub fn alert_on_redeem(self) -> Self {
        self.lock().alert_on_redeem = true;
        self
    }

    /// After a successful click, put the button on cooldown showing `text`
    pub fn cooldown_after_redeem(self, text: impl Into<String>) -> Self {
        self.lock().cooldown_after_redeem = Some(text.into());
        self
    }

    /// Make the first `misses` lookups of `control` come back empty
    pub fn appear_after(self, control: Control, misses: u32) -> Self {
        self.lock().pending_lookups.insert(control, misses);
        self
    }

    /// Make every lookup of `control` fail with a bridge error
    pub fn broken(self, control: Control) -> Self {
        self.lock().broken.push(control);
        self
    }

    /// Clicks received so far, in order
    pub fn clicks(&self) -> Vec<Control> {
        self.lock().clicks.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl PageAdapter for SimulatedPage {
    async fn find(&self, control: Control) -> Result<Option<ElementState>, PageError> {
        let mut inner = self.lock();

        if inner.broken.contains(&control) {
            return Err(PageError::Bridge(format!("simulated failure for {}", control)));
        }

        if let Some(misses) = inner.pending_lookups.get_mut(&control) {
            if *misses > 0 {
                *misses -= 1;
                return Ok(None);
            }
        }

        Ok(inner.elements.get(&control).cloned())
    }

    async fn click(&self, control: Control) -> Result<(), PageError> {
        let mut inner = self.lock();

        if !inner.elements.contains_key(&control) {
            return Err(PageError::Missing(control));
        }
        inner.clicks.push(control);

        if control == Control::RedeemButton {
            if inner.alert_on_redeem {
                inner
                    .elements
                    .insert(Control::ErrorAlert, ElementState::enabled("Something went wrong"));
            } else if let Some(text) = inner.cooldown_after_redeem.clone() {
                inner
                    .elements
                    .insert(Control::RedeemButton, ElementState::disabled("Redeem"));
                inner.cooldown_text = Some(text);
            }
        }

        Ok(())
    }

    async fn cooldown_text(&self) -> Result<Option<String>, PageError> {
        Ok(self.lock().cooldown_text.clone())
    }
}
