use fundme_types::{Address, Result};

use crate::round::RoundData;

/// Read-only price feed for the native/reference pair.
/// Implemented by mocks in tests and by network clients in deployments.
pub trait PriceFeed {
    /// Latest round reported by the feed
    fn latest_round_data(&self) -> Result<RoundData>;

    /// Fixed decimal precision of `RoundData::answer`
    fn decimals(&self) -> u8;

    /// Aggregator interface version
    fn version(&self) -> u64;

    fn description(&self) -> String;

    /// On-chain location of the feed
    fn address(&self) -> Address;
}

impl<T: PriceFeed + ?Sized> PriceFeed for Box<T> {
    fn latest_round_data(&self) -> Result<RoundData> {
        (**self).latest_round_data()
    }

    fn decimals(&self) -> u8 {
        (**self).decimals()
    }

    fn version(&self) -> u64 {
        (**self).version()
    }

    fn description(&self) -> String {
        (**self).description()
    }

    fn address(&self) -> Address {
        (**self).address()
    }
}
