//! Countdown text parsing

use std::{sync::OnceLock, time::Duration};

use regex::Regex;
use tracing::warn;

use crate::error::RedeemError;

/// Wait used when the countdown cannot be read: ten minutes plus a second
pub const FALLBACK_WAIT: Duration = Duration::from_secs(601);

fn countdown_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:(\d+)m\s*)?(\d+)s").expect("countdown pattern is a valid regex")
    })
}

/// Remaining cooldown as displayed next to the redeem button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownReading {
    pub minutes: u64,
    pub seconds: u64,
}

impl CooldownReading {
    /// Parse text such as `"2m 5s"` or `"45s"` anywhere in `text`
    pub fn parse(text: &str) -> Result<Self, RedeemError> {
        let captures = countdown_pattern()
            .captures(text)
            .ok_or_else(|| RedeemError::Parse(text.to_string()))?;

        let minutes = match captures.get(1) {
            Some(m) => m
                .as_str()
                .parse()
                .map_err(|_| RedeemError::Parse(text.to_string()))?,
            None => 0,
        };
        let seconds = captures[2]
            .parse()
            .map_err(|_| RedeemError::Parse(text.to_string()))?;

        let reading = Self { minutes, seconds };
        reading
            .total_secs()
            .ok_or_else(|| RedeemError::Parse(text.to_string()))?;
        Ok(reading)
    }

    /// `minutes*60 + seconds + 1`, or `None` when that does not fit a u64
    fn total_secs(&self) -> Option<u64> {
        self.minutes
            .checked_mul(60)?
            .checked_add(self.seconds)?
            .checked_add(1)
    }

    /// Time until the reward is available again, plus a one second buffer
    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.total_secs().unwrap_or(u64::MAX))
    }
}

/// Wait derived from optional countdown text, falling back to [`FALLBACK_WAIT`]
pub fn cooldown_wait(text: Option<&str>) -> Duration {
    let Some(text) = text else {
        warn!("Countdown text not found, using fallback wait");
        return FALLBACK_WAIT;
    };

    match CooldownReading::parse(text) {
        Ok(reading) => reading.wait(),
        Err(e) => {
            warn!("{}, using fallback wait", e);
            FALLBACK_WAIT
        }
    }
}
