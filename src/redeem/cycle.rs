//! One redeem cycle: open the menu, find the reward, redeem or back off

use std::{sync::Arc, time::Duration};

use tokio::{sync::broadcast, time::sleep};
use tracing::{debug, info, warn};

use super::{
    clock::Clock,
    cooldown::cooldown_wait,
    wait::await_condition,
};
use crate::{
    error::RedeemError,
    page::{Control, ElementState, PageAdapter},
    state::{Message, StatusLine},
};

/// Timing knobs of a cycle and the backoff chosen for each outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTimings {
    pub lookup_timeout: Duration,
    pub poll_interval: Duration,
    /// Pause between the redeem click and the alert check
    pub settle: Duration,
    pub success_wait: Duration,
    pub rejected_wait: Duration,
    pub error_wait: Duration,
}

impl Default for CycleTimings {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(100),
            settle: Duration::from_secs(1),
            success_wait: Duration::from_secs(601),
            rejected_wait: Duration::from_secs(5),
            error_wait: Duration::from_secs(60),
        }
    }
}

/// How a cycle ended
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Redeem button disabled; wait out the parsed (or fallback) cooldown
    Cooldown(Duration),
    /// Clicked and no alert showed up
    Redeemed,
    /// Clicked but the site raised an alert
    Rejected,
    /// Lookup timeout or adapter failure
    Failed(RedeemError),
}

impl Outcome {
    /// Delay before the next cycle
    pub fn wait(&self, timings: &CycleTimings) -> Duration {
        match self {
            Outcome::Cooldown(wait) => *wait,
            Outcome::Redeemed => timings.success_wait,
            Outcome::Rejected => timings.rejected_wait,
            Outcome::Failed(_) => timings.error_wait,
        }
    }

    pub fn status_line(&self) -> StatusLine {
        match self {
            Outcome::Cooldown(wait) => StatusLine::alert(format!(
                "On cooldown. Next check in {}s.",
                (wait.as_millis() as f64 / 1000.0).round() as u64
            )),
            Outcome::Redeemed => StatusLine::success("Redeem clicked! Waiting 10 minutes..."),
            Outcome::Rejected => StatusLine::alert("Redeem error detected. Retrying..."),
            Outcome::Failed(err) => StatusLine::alert(format!("Error: {}", err)),
        }
    }
}

/// Drives a page adapter through one cycle and reports progress on the bus
pub struct Redeemer {
    page: Arc<dyn PageAdapter>,
    clock: Arc<dyn Clock>,
    timings: CycleTimings,
    reward_label: String,
    bus: broadcast::Sender<Message>,
}

impl Redeemer {
    pub fn new(
        page: Arc<dyn PageAdapter>,
        clock: Arc<dyn Clock>,
        timings: CycleTimings,
        reward_label: impl Into<String>,
        bus: broadcast::Sender<Message>,
    ) -> Self {
        Self {
            page,
            clock,
            timings,
            reward_label: reward_label.into(),
            bus,
        }
    }

    pub fn timings(&self) -> &CycleTimings {
        &self.timings
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Run one full cycle; never fails, errors become [`Outcome::Failed`]
    pub async fn run_cycle(&self) -> Outcome {
        info!("Checking redeem availability");
        self.report(StatusLine::neutral("Checking redeem availability..."));

        let outcome = match self.attempt().await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("Error during redeem process: {}", err);
                Outcome::Failed(err)
            }
        };

        self.report(outcome.status_line());
        outcome
    }

    async fn attempt(&self) -> Result<Outcome, RedeemError> {
        self.wait_for(Control::OpenMenu).await?;
        self.page.click(Control::OpenMenu).await?;
        debug!("Clicked open menu");
        self.report(StatusLine::progress("Opened menu"));

        self.wait_for(Control::MenuContainer).await?;
        debug!("Menu container is visible");
        self.report(StatusLine::progress("Menu loaded"));

        self.wait_for(Control::RewardItem).await?;
        self.page.click(Control::RewardItem).await?;
        debug!("Clicked reward {}", self.reward_label);
        self.report(StatusLine::progress("Navigated to reward"));

        let redeem = self.wait_for(Control::RedeemButton).await?;

        if redeem.disabled {
            let wait = self.read_cooldown().await;
            info!("Redeem on cooldown, waiting {}s before next check", wait.as_secs());
            self.close_menu().await;
            return Ok(Outcome::Cooldown(wait));
        }

        self.page.click(Control::RedeemButton).await?;
        info!("Redeem clicked, waiting for confirmation");
        sleep(self.timings.settle).await;

        if self.page.find(Control::ErrorAlert).await?.is_some() {
            warn!("{}, closing menu and retrying", RedeemError::RedeemRejected);
            self.close_menu().await;
            return Ok(Outcome::Rejected);
        }

        info!("Redeem successful");
        Ok(Outcome::Redeemed)
    }

    /// Poll for `control` until it matches or the lookup timeout passes
    async fn wait_for(&self, control: Control) -> Result<ElementState, RedeemError> {
        let found = await_condition(
            self.clock.as_ref(),
            || async move {
                let element = self.page.find(control).await?;
                Ok::<_, RedeemError>(element.filter(|e| self.matches(control, e)))
            },
            self.timings.poll_interval,
            self.timings.lookup_timeout,
        )
        .await?;

        found.map_err(|_| RedeemError::ElementNotFound { control })
    }

    fn matches(&self, control: Control, element: &ElementState) -> bool {
        match control {
            Control::RedeemButton => element.text.to_lowercase().contains("redeem"),
            Control::RewardItem => element.text.trim().eq_ignore_ascii_case(&self.reward_label),
            _ => true,
        }
    }

    async fn read_cooldown(&self) -> Duration {
        let text = self.page.cooldown_text().await.unwrap_or_else(|e| {
            warn!("Cooldown lookup failed: {}", e);
            None
        });
        cooldown_wait(text.as_deref())
    }

    /// The open-menu button doubles as the close button
    async fn close_menu(&self) {
        match self.page.find(Control::OpenMenu).await {
            Ok(Some(_)) => {
                if let Err(e) = self.page.click(Control::OpenMenu).await {
                    warn!("Failed to close menu: {}", e);
                }
            }
            Ok(None) => debug!("Menu toggle gone, nothing to close"),
            Err(e) => warn!("Failed to look up menu toggle: {}", e),
        }
    }

    fn report(&self, line: StatusLine) {
        debug!("Status: {}", line.text);
        if self.bus.send(line.into()).is_err() {
            debug!("No display listening for status updates");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{page::SimulatedPage, redeem::clock::TokioClock};

    fn setup(page: SimulatedPage) -> (Redeemer, Arc<SimulatedPage>, broadcast::Receiver<Message>) {
        let page = Arc::new(page);
        let (bus, rx) = broadcast::channel(64);
        let redeemer = Redeemer::new(
            page.clone(),
            Arc::new(TokioClock::starting_at(0)),
            CycleTimings::default(),
            "RAFFLE",
            bus,
        );
        (redeemer, page, rx)
    }

    fn statuses(rx: &mut broadcast::Receiver<Message>) -> Vec<String> {
        let mut texts = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            if let Message::RedeemStatus { text, .. } = msg {
                texts.push(text);
            }
        }
        texts
    }

    #[tokio::test(start_paused = true)]
    async fn successful_redeem_waits_ten_minutes() {
        let (redeemer, page, mut rx) = setup(SimulatedPage::ready());

        let outcome = redeemer.run_cycle().await;

        assert!(matches!(outcome, Outcome::Redeemed));
        assert_eq!(outcome.wait(redeemer.timings()), Duration::from_millis(601_000));
        assert_eq!(
            page.clicks(),
            vec![Control::OpenMenu, Control::RewardItem, Control::RedeemButton]
        );
        assert_eq!(
            statuses(&mut rx),
            vec![
                "Checking redeem availability...",
                "Opened menu",
                "Menu loaded",
                "Navigated to reward",
                "Redeem clicked! Waiting 10 minutes...",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn alert_after_click_retries_in_five_seconds() {
        let (redeemer, page, _rx) = setup(SimulatedPage::ready().alert_on_redeem());

        let outcome = redeemer.run_cycle().await;

        assert!(matches!(outcome, Outcome::Rejected));
        assert_eq!(outcome.wait(redeemer.timings()), Duration::from_millis(5_000));
        // menu closed again after the alert
        assert_eq!(page.clicks().last(), Some(&Control::OpenMenu));
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_button_uses_parsed_cooldown() {
        let (redeemer, page, mut rx) = setup(SimulatedPage::ready().on_cooldown("2m 5s"));

        let outcome = redeemer.run_cycle().await;

        assert_eq!(outcome.wait(redeemer.timings()), Duration::from_millis(126_000));
        assert!(!page.clicks().contains(&Control::RedeemButton));
        assert_eq!(
            statuses(&mut rx).last().map(String::as_str),
            Some("On cooldown. Next check in 126s.")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unreadable_cooldown_falls_back() {
        let (redeemer, _page, _rx) = setup(SimulatedPage::ready().on_cooldown("garbled"));
        let outcome = redeemer.run_cycle().await;
        assert_eq!(outcome.wait(redeemer.timings()), Duration::from_millis(601_000));

        let (redeemer, _page, _rx) = setup(SimulatedPage::ready().disabled_without_countdown());
        let outcome = redeemer.run_cycle().await;
        assert_eq!(outcome.wait(redeemer.timings()), Duration::from_millis(601_000));
    }

    #[tokio::test(start_paused = true)]
    async fn oversized_cooldown_uses_fallback_wait() {
        let (redeemer, _page, mut rx) =
            setup(SimulatedPage::ready().on_cooldown("307445734561825861m 0s"));

        let outcome = redeemer.run_cycle().await;

        assert_eq!(outcome.wait(redeemer.timings()), Duration::from_millis(601_000));
        assert_eq!(
            statuses(&mut rx).last().map(String::as_str),
            Some("On cooldown. Next check in 601s.")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn missing_control_times_out_into_error_backoff() {
        let (redeemer, page, mut rx) =
            setup(SimulatedPage::ready().without_control(Control::MenuContainer));

        let outcome = redeemer.run_cycle().await;

        assert!(matches!(
            outcome,
            Outcome::Failed(RedeemError::ElementNotFound {
                control: Control::MenuContainer
            })
        ));
        assert_eq!(outcome.wait(redeemer.timings()), Duration::from_millis(60_000));
        assert_eq!(page.clicks(), vec![Control::OpenMenu]);
        assert_eq!(
            statuses(&mut rx).last().map(String::as_str),
            Some("Error: timeout waiting for menu-container")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn adapter_errors_use_error_backoff() {
        let (redeemer, _page, _rx) = setup(SimulatedPage::ready().broken(Control::RewardItem));
        let outcome = redeemer.run_cycle().await;
        assert!(matches!(outcome, Outcome::Failed(RedeemError::Page(_))));
        assert_eq!(outcome.wait(redeemer.timings()), Duration::from_millis(60_000));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_controls_are_polled_until_present() {
        let (redeemer, _page, _rx) =
            setup(SimulatedPage::ready().appear_after(Control::RedeemButton, 20));
        assert!(matches!(redeemer.run_cycle().await, Outcome::Redeemed));
    }

    #[tokio::test(start_paused = true)]
    async fn other_reward_tiles_are_not_selected() {
        let page = SimulatedPage::ready()
            .with_control(Control::RewardItem, ElementState::enabled("HYDRATE"));
        let (redeemer, _page, _rx) = setup(page);

        assert!(matches!(
            redeemer.run_cycle().await,
            Outcome::Failed(RedeemError::ElementNotFound {
                control: Control::RewardItem
            })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn reward_label_matches_regardless_of_case() {
        let page = SimulatedPage::ready()
            .with_control(Control::RewardItem, ElementState::enabled("raffle"));
        let (redeemer, page, _rx) = setup(page);

        assert!(matches!(redeemer.run_cycle().await, Outcome::Redeemed));
        assert!(page.clicks().contains(&Control::RewardItem));
    }
}
