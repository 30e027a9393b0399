mod feed;
mod mock;
mod round;

pub use feed::PriceFeed;
pub use mock::{MockV3Aggregator, MOCK_AGGREGATOR_VERSION};
pub use round::{unix_now, RoundData};
