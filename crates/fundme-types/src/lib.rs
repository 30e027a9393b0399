mod address;
mod amount;
mod error;

pub use address::Address;
pub use amount::{Usd, Wei, ETHER_DECIMALS, USD_DECIMALS};
pub use error::{FundMeError, Result};
