use fundme_oracle::MockV3Aggregator;
use fundme_types::{Address, FundMeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::bank::Bank;
use crate::config::FundMeConfig;
use crate::fund_me::FundMe;

/// A live network with a deployed ETH/USD feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkEntry {
    pub name: String,
    pub eth_usd_price_feed: Address,
}

/// Where feeds live per chain, and how local chains are mocked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Live networks keyed by chain id
    pub networks: BTreeMap<u64, NetworkEntry>,

    /// Network names that get a mock aggregator instead of a live feed
    pub development_chains: Vec<String>,

    /// Decimals of the mock aggregator
    pub mock_decimals: u8,

    /// First answer published by the mock aggregator
    pub mock_initial_answer: i128,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert(
            11155111,
            NetworkEntry {
                name: "sepolia".to_string(),
                eth_usd_price_feed: Address::new([
                    0x1a, 0x81, 0xaf, 0xb8, 0x14, 0x6a, 0xef, 0xfc, 0xfc, 0x5e, 0x50, 0xe8, 0x47,
                    0x9e, 0x82, 0x6e, 0x7d, 0x55, 0xb9, 0x10,
                ]),
            },
        );

        Self {
            networks,
            development_chains: vec!["hardhat".to_string(), "localhost".to_string()],
            mock_decimals: 8,
            mock_initial_answer: 2000_0000_0000, // $2000.00000000
        }
    }
}

impl NetworkConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn is_development(&self, network: &str) -> bool {
        self.development_chains.iter().any(|n| n == network)
    }

    /// Look up a live network by name (case-insensitive)
    pub fn live_network(&self, network: &str) -> Option<(u64, &NetworkEntry)> {
        self.networks
            .iter()
            .find(|(_, entry)| entry.name.eq_ignore_ascii_case(network))
            .map(|(chain_id, entry)| (*chain_id, entry))
    }

    /// Mock aggregator configured for development chains
    pub fn mock_aggregator(&self) -> MockV3Aggregator {
        MockV3Aggregator::new(self.mock_decimals, self.mock_initial_answer)
    }
}

/// Deploy a ledger on `network` with `deployer` as owner.
///
/// Development chains get a fresh mock aggregator. Live networks need a feed client,
/// which this fixture does not provide.
pub fn deploy<B: Bank>(
    network: &str,
    networks: &NetworkConfig,
    config: FundMeConfig,
    deployer: Address,
    bank: B,
) -> Result<FundMe<MockV3Aggregator, B>> {
    if !networks.is_development(network) {
        return Err(match networks.live_network(network) {
            Some((chain_id, entry)) => FundMeError::ConfigError(format!(
                "network {} (chain {}) uses live feed {}; no feed client available",
                entry.name, chain_id, entry.eth_usd_price_feed
            )),
            None => FundMeError::ConfigError(format!("unknown network: {}", network)),
        });
    }

    info!(network, "local network detected, deploying mocks");
    let feed = networks.mock_aggregator();
    let address = Address::from_label(&format!("FundMe:{}:{}", network, deployer));
    FundMe::new(address, deployer, feed, bank, config)
}
