use fundme_types::{FundMeError, Result};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// One aggregator round, mirroring the `latestRoundData` tuple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundData {
    pub round_id: u64,
    /// Price scaled by the feed's decimals; signed because feeds report signed answers
    pub answer: i128,
    /// Unix seconds
    pub started_at: u64,
    /// Unix seconds; zero means the round never completed
    pub updated_at: u64,
    pub answered_in_round: u64,
}

impl RoundData {
    /// A round with `updated_at == 0` has not been answered yet
    pub fn is_complete(&self) -> bool {
        self.updated_at != 0
    }

    /// Answer carried over from an earlier round
    pub fn is_carried_over(&self) -> bool {
        self.answered_in_round < self.round_id
    }

    /// Check if the answer is older than `max_age_secs`
    pub fn is_stale(&self, now_secs: u64, max_age_secs: u64) -> bool {
        now_secs.saturating_sub(self.updated_at) > max_age_secs
    }

    /// The answer as an unsigned rate, rejecting anything a ledger must not price with
    pub fn usable_answer(&self, now_secs: u64, max_age_secs: Option<u64>) -> Result<u128> {
        if !self.is_complete() {
            return Err(FundMeError::OracleUnavailable(format!(
                "round {} is incomplete",
                self.round_id
            )));
        }
        if self.is_carried_over() {
            return Err(FundMeError::OracleUnavailable(format!(
                "round {} answered in earlier round {}",
                self.round_id, self.answered_in_round
            )));
        }
        if let Some(max_age) = max_age_secs {
            if self.is_stale(now_secs, max_age) {
                return Err(FundMeError::OracleUnavailable(format!(
                    "answer updated at {} is older than {}s",
                    self.updated_at, max_age
                )));
            }
        }
        if self.answer <= 0 {
            return Err(FundMeError::OracleUnavailable(format!(
                "non-positive answer {}",
                self.answer
            )));
        }
        Ok(self.answer as u128)
    }
}

/// Current unix time in seconds (0 if the clock is before the epoch)
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
