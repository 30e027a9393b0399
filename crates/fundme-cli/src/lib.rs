use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use fundme_ledger::{
    deploy, FundMe, FundMeConfig, FunderRecord, LedgerSnapshot, LedgerState, MemoryBank,
    NetworkConfig, WithdrawReceipt, WithdrawStrategy,
};
use fundme_oracle::{MockV3Aggregator, PriceFeed};
use fundme_types::{Address, Wei};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Number of pre-funded local signers; signer 0 deploys and owns the ledger
pub const LOCAL_SIGNERS: usize = 20;

/// Starting balance of each local signer
pub const LOCAL_SIGNER_BALANCE: Wei = Wei::from_ether(10_000);

#[derive(Debug, Parser)]
#[command(name = "fundme", about = "Fund and withdraw from a local FundMe ledger")]
pub struct Cli {
    /// Network to run against
    #[arg(long, default_value = "hardhat")]
    pub network: String,

    /// Local chain state file; deployed fresh when missing
    #[arg(long, default_value = "fundme-state.json")]
    pub state: PathBuf,

    /// Ledger policy (JSON); defaults apply when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Network table (JSON); defaults apply when omitted
    #[arg(long)]
    pub networks: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Deposit into the ledger
    Fund {
        /// Amount in ether
        #[arg(long, default_value = "0.1")]
        value: String,

        /// Index of the local signer sending the value
        #[arg(long, default_value_t = 0)]
        from: usize,
    },
    /// Sweep the pool to the owner
    Withdraw {
        /// Use the cached-list withdrawal
        #[arg(long)]
        cheaper: bool,

        /// Index of the local signer calling withdraw
        #[arg(long, default_value_t = 0)]
        from: usize,
    },
    /// Print ledger state
    Status,
}

/// What a command did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Funded { funder: Address, value: Wei },
    Withdrawn(WithdrawReceipt),
    Status(Status),
}

/// Ledger view printed by `status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub network: String,
    pub address: Address,
    pub owner: Address,
    pub price_feed: Address,
    pub state: LedgerState,
    pub pooled_balance: Wei,
    pub funders: Vec<FunderRecord>,
}

/// Everything persisted between invocations
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LocalChain {
    network: String,
    ledger: LedgerSnapshot,
    bank: MemoryBank,
}

pub fn signer(index: usize) -> Address {
    Address::from_label(&format!("signer-{}", index))
}

fn local_signer(index: usize) -> anyhow::Result<Address> {
    if index >= LOCAL_SIGNERS {
        bail!("signer index {} out of range (0..{})", index, LOCAL_SIGNERS);
    }
    Ok(signer(index))
}

pub fn run(cli: &Cli) -> anyhow::Result<Outcome> {
    let mut fund_me = open(cli)?;

    let outcome = match &cli.command {
        Command::Fund { value, from } => {
            let funder = local_signer(*from)?;
            let value = Wei::parse_ether(value)?;
            info!("Funding contract...");
            fund_me.fund(&funder, value)?;
            info!("Funded...");
            Outcome::Funded { funder, value }
        }
        Command::Withdraw { cheaper, from } => {
            let caller = local_signer(*from)?;
            let strategy = if *cheaper {
                WithdrawStrategy::Cached
            } else {
                WithdrawStrategy::Naive
            };
            info!("Withdrawing...");
            let receipt = fund_me.withdraw_with(&caller, strategy)?;
            info!("Got it back...");
            Outcome::Withdrawn(receipt)
        }
        Command::Status => Outcome::Status(status(&cli.network, &fund_me)),
    };

    save(&cli.state, &cli.network, &fund_me)?;
    Ok(outcome)
}

fn status(network: &str, fund_me: &FundMe<MockV3Aggregator, MemoryBank>) -> Status {
    Status {
        network: network.to_string(),
        address: fund_me.address(),
        owner: fund_me.owner(),
        price_feed: fund_me.price_feed().address(),
        state: fund_me.state(),
        pooled_balance: fund_me.pooled_balance(),
        funders: fund_me.snapshot().funders,
    }
}

fn open(cli: &Cli) -> anyhow::Result<FundMe<MockV3Aggregator, MemoryBank>> {
    let networks = match &cli.networks {
        Some(path) => NetworkConfig::from_file(path)
            .with_context(|| format!("loading networks from {}", path.display()))?,
        None => NetworkConfig::default(),
    };

    if cli.state.exists() {
        let json = std::fs::read_to_string(&cli.state)
            .with_context(|| format!("reading {}", cli.state.display()))?;
        let chain: LocalChain = serde_json::from_str(&json)
            .with_context(|| format!("parsing {}", cli.state.display()))?;
        if chain.network != cli.network {
            bail!(
                "state file {} belongs to network {}, not {}",
                cli.state.display(),
                chain.network,
                cli.network
            );
        }
        let fund_me = FundMe::restore(chain.ledger, networks.mock_aggregator(), chain.bank)?;
        return Ok(fund_me);
    }

    let config = match &cli.config {
        Some(path) => FundMeConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => FundMeConfig::default(),
    };

    let mut bank = MemoryBank::new();
    for i in 0..LOCAL_SIGNERS {
        bank.mint(&signer(i), LOCAL_SIGNER_BALANCE)?;
    }
    Ok(deploy(&cli.network, &networks, config, signer(0), bank)?)
}

fn save(
    path: &Path,
    network: &str,
    fund_me: &FundMe<MockV3Aggregator, MemoryBank>,
) -> anyhow::Result<()> {
    let chain = LocalChain {
        network: network.to_string(),
        ledger: fund_me.snapshot(),
        bank: fund_me.bank().clone(),
    };
    std::fs::write(path, serde_json::to_string_pretty(&chain)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Funded { funder, value } => write!(f, "{} funded {}", funder, value),
            Outcome::Withdrawn(receipt) => write!(
                f,
                "withdrew {} to {} ({} funders cleared, {} strategy, {} reads / {} writes)",
                receipt.amount,
                receipt.recipient,
                receipt.funders_cleared,
                receipt.strategy,
                receipt.cost.reads,
                receipt.cost.writes
            ),
            Outcome::Status(status) => match serde_json::to_string_pretty(status) {
                Ok(json) => write!(f, "{}", json),
                Err(_) => write!(f, "{:?}", status),
            },
        }
    }
}
