mod access;
mod bank;
mod config;
mod conversion;
mod deploy;
mod fund_me;
mod meter;
mod registry;
mod snapshot;
mod withdraw;

pub use access::Ownership;
pub use bank::{Bank, MemoryBank};
pub use config::FundMeConfig;
pub use conversion::{convert, get_conversion_rate, get_price, ConversionParams, Rate};
pub use deploy::{deploy, NetworkConfig, NetworkEntry};
pub use fund_me::{FundMe, LedgerState};
pub use meter::StorageCost;
pub use registry::{FunderRecord, FunderRegistry};
pub use snapshot::LedgerSnapshot;
pub use withdraw::{WithdrawReceipt, WithdrawStrategy};
