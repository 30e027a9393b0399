use serde::{Deserialize, Serialize};

/// Persistent-storage accesses performed by one ledger call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageCost {
    pub reads: u64,
    pub writes: u64,
}

impl StorageCost {
    pub fn record_read(&mut self) {
        self.reads += 1;
    }

    pub fn record_write(&mut self) {
        self.writes += 1;
    }
}
