use fundme_types::{Address, Wei};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::meter::StorageCost;
use crate::registry::FunderRegistry;

/// How a withdrawal walks the funder list before clearing it.
/// Both strategies reach the same final state; they differ only in storage traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawStrategy {
    /// Re-reads the list length from storage on every step
    Naive,
    /// Reads the length once and iterates over an in-memory copy of the list
    Cached,
}

/// Outcome of a successful withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawReceipt {
    pub strategy: WithdrawStrategy,
    pub recipient: Address,
    pub amount: Wei,
    pub funders_cleared: usize,
    pub cost: StorageCost,
}

impl WithdrawStrategy {
    /// Zero every funder balance in insertion order, then drop the list.
    /// Returns the number of funders cleared.
    pub(crate) fn clear_funders(self, registry: &mut FunderRegistry, cost: &mut StorageCost) -> usize {
        let cleared = match self {
            WithdrawStrategy::Naive => {
                let mut index = 0;
                loop {
                    cost.record_read(); // funders.length
                    if index >= registry.len() {
                        break;
                    }
                    cost.record_read(); // funders[index]
                    registry.clear_balance_at(index);
                    cost.record_write();
                    index += 1;
                }
                index
            }
            WithdrawStrategy::Cached => {
                cost.record_read();
                let len = registry.len();
                let funders: Vec<Address> = (0..len)
                    .filter_map(|index| {
                        cost.record_read();
                        registry.funder_at(index).copied()
                    })
                    .collect();
                for funder in &funders {
                    registry.clear_balance_of(funder);
                    cost.record_write();
                }
                funders.len()
            }
        };

        registry.reset();
        cost.record_write();
        cleared
    }
}

impl fmt::Display for WithdrawStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WithdrawStrategy::Naive => write!(f, "naive"),
            WithdrawStrategy::Cached => write!(f, "cached"),
        }
    }
}
