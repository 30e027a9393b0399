use fundme_types::{Address, FundMeError, Result};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::feed::PriceFeed;
use crate::round::{unix_now, RoundData};

/// Version reported by the mock aggregator contract
pub const MOCK_AGGREGATOR_VERSION: u64 = 0;

/// Mock aggregator with a settable answer and full round history.
/// Clones share state, so a test can keep a handle and move the price
/// while a ledger owns another clone.
#[derive(Debug, Clone)]
pub struct MockV3Aggregator {
    address: Address,
    decimals: u8,
    rounds: Arc<Mutex<MockRounds>>,
}

#[derive(Debug, Default)]
struct MockRounds {
    latest_round: u64,
    history: BTreeMap<u64, RoundData>,
    offline: bool,
}

impl MockV3Aggregator {
    /// Create a mock and publish `initial_answer` as round 1
    pub fn new(decimals: u8, initial_answer: i128) -> Self {
        let mock = MockV3Aggregator {
            address: Address::from_label("MockV3Aggregator"),
            decimals,
            rounds: Arc::new(Mutex::new(MockRounds::default())),
        };
        mock.update_answer(initial_answer);
        mock
    }

    /// Place the mock at a specific address
    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    fn rounds(&self) -> MutexGuard<'_, MockRounds> {
        self.rounds.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish a new answer as the next round, timestamped now
    pub fn update_answer(&self, answer: i128) {
        let now = unix_now();
        let mut rounds = self.rounds();
        let round_id = rounds.latest_round + 1;
        rounds.latest_round = round_id;
        rounds.history.insert(
            round_id,
            RoundData {
                round_id,
                answer,
                started_at: now,
                updated_at: now,
                answered_in_round: round_id,
            },
        );
        tracing::debug!(round_id, answer = %answer, "mock aggregator answer updated");
    }

    /// Overwrite a round with explicit timestamps and make it the latest
    pub fn update_round_data(&self, round_id: u64, answer: i128, updated_at: u64, started_at: u64) {
        let mut rounds = self.rounds();
        rounds.latest_round = round_id;
        rounds.history.insert(
            round_id,
            RoundData {
                round_id,
                answer,
                started_at,
                updated_at,
                answered_in_round: round_id,
            },
        );
    }

    /// Simulate the feed being unreachable
    pub fn set_offline(&self, offline: bool) {
        self.rounds().offline = offline;
    }

    pub fn latest_round(&self) -> u64 {
        self.rounds().latest_round
    }

    pub fn latest_answer(&self) -> i128 {
        let rounds = self.rounds();
        rounds
            .history
            .get(&rounds.latest_round)
            .map(|r| r.answer)
            .unwrap_or(0)
    }

    pub fn get_round_data(&self, round_id: u64) -> Result<RoundData> {
        self.rounds()
            .history
            .get(&round_id)
            .copied()
            .ok_or_else(|| FundMeError::OracleUnavailable(format!("no data for round {}", round_id)))
    }
}

impl PriceFeed for MockV3Aggregator {
    fn latest_round_data(&self) -> Result<RoundData> {
        let rounds = self.rounds();
        if rounds.offline {
            return Err(FundMeError::OracleUnavailable(format!(
                "feed {} is offline",
                self.address
            )));
        }
        rounds
            .history
            .get(&rounds.latest_round)
            .copied()
            .ok_or_else(|| FundMeError::OracleUnavailable("no rounds published".to_string()))
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn version(&self) -> u64 {
        MOCK_AGGREGATOR_VERSION
    }

    fn description(&self) -> String {
        "v0.6/tests/MockV3Aggregator.sol".to_string()
    }

    fn address(&self) -> Address {
        self.address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_answer_is_round_one() {
        let mock = MockV3Aggregator::new(8, 2000_0000_0000);
        let round = mock.latest_round_data().unwrap();

        assert_eq!(round.round_id, 1);
        assert_eq!(round.answered_in_round, 1);
        assert_eq!(round.answer, 2000_0000_0000);
        assert!(round.is_complete());
        assert_eq!(mock.decimals(), 8);
        assert_eq!(mock.version(), MOCK_AGGREGATOR_VERSION);
    }

    #[test]
    fn test_update_answer_advances_round() {
        let mock = MockV3Aggregator::new(8, 1);
        mock.update_answer(2);
        mock.update_answer(3);

        assert_eq!(mock.latest_round(), 3);
        assert_eq!(mock.latest_answer(), 3);
        assert_eq!(mock.get_round_data(2).unwrap().answer, 2);
        assert!(mock.get_round_data(9).is_err());
    }

    #[test]
    fn test_clones_share_rounds() {
        let mock = MockV3Aggregator::new(8, 1);
        let handle = mock.clone();
        handle.update_answer(42);
        assert_eq!(mock.latest_round_data().unwrap().answer, 42);
    }

    #[test]
    fn test_offline_feed() {
        let mock = MockV3Aggregator::new(8, 1);
        mock.set_offline(true);
        assert!(matches!(
            mock.latest_round_data(),
            Err(FundMeError::OracleUnavailable(_))
        ));
        mock.set_offline(false);
        assert!(mock.latest_round_data().is_ok());
    }

    #[test]
    fn test_update_round_data() {
        let mock = MockV3Aggregator::new(8, 1);
        mock.update_round_data(10, 5, 1_000, 900);

        let round = mock.latest_round_data().unwrap();
        assert_eq!(round.round_id, 10);
        assert_eq!(round.updated_at, 1_000);
        assert_eq!(round.started_at, 900);
    }
}
