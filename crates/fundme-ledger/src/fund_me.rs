use fundme_oracle::PriceFeed;
use fundme_types::{Address, FundMeError, Result, Usd, Wei};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::access::Ownership;
use crate::bank::Bank;
use crate::config::FundMeConfig;
use crate::conversion::get_conversion_rate;
use crate::meter::StorageCost;
use crate::registry::FunderRegistry;
use crate::snapshot::LedgerSnapshot;
use crate::withdraw::{WithdrawReceipt, WithdrawStrategy};

/// Coarse ledger state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerState {
    /// No funders, nothing pooled
    Empty,
    /// At least one funder since the last withdrawal
    Funded,
}

/// Custodial funding ledger.
///
/// Accepts native-value deposits worth at least `minimum_usd` at the feed's current price,
/// escrows them at `address` in the bank, and lets the owner sweep everything.
/// Every mutating call takes `&mut self` and either completes or leaves state untouched.
#[derive(Debug)]
pub struct FundMe<F: PriceFeed, B: Bank> {
    address: Address,
    ownership: Ownership,
    config: FundMeConfig,
    price_feed: F,
    bank: B,
    registry: FunderRegistry,
    pooled: Wei,
}

impl<F: PriceFeed, B: Bank> FundMe<F, B> {
    /// Create an empty ledger escrowing at `address`, owned by `owner`
    pub fn new(
        address: Address,
        owner: Address,
        price_feed: F,
        bank: B,
        config: FundMeConfig,
    ) -> Result<Self> {
        config.validate()?;
        if owner == address {
            return Err(FundMeError::EscrowAccount(address));
        }
        info!(
            %address,
            %owner,
            feed = %price_feed.address(),
            minimum_usd = %config.minimum_usd,
            "fund me ledger created"
        );
        Ok(FundMe {
            address,
            ownership: Ownership::new(owner),
            config,
            price_feed,
            bank,
            registry: FunderRegistry::new(),
            pooled: Wei::ZERO,
        })
    }

    /// Rebuild a ledger from persisted state
    pub fn restore(snapshot: LedgerSnapshot, price_feed: F, bank: B) -> Result<Self> {
        snapshot.config.validate()?;
        snapshot.check_consistency()?;
        let registry = FunderRegistry::from_records(snapshot.funders)?;
        Ok(FundMe {
            address: snapshot.address,
            ownership: Ownership::new(snapshot.owner),
            config: snapshot.config,
            price_feed,
            bank,
            registry,
            pooled: snapshot.pooled_balance,
        })
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            address: self.address,
            owner: self.ownership.owner(),
            config: self.config.clone(),
            funders: self.registry.records().to_vec(),
            pooled_balance: self.pooled,
        }
    }

    /// Deposit `value` from `caller`.
    ///
    /// Fails with `InsufficientContribution` if `value` converts below the minimum,
    /// `OracleUnavailable` if the feed cannot price it, `TransferFailed` if the caller
    /// cannot pay, or `EscrowAccount` if the caller is the escrow itself.
    /// No state changes on failure.
    pub fn fund(&mut self, caller: &Address, value: Wei) -> Result<()> {
        if *caller == self.address {
            warn!(%caller, %value, "escrow cannot fund itself");
            return Err(FundMeError::EscrowAccount(self.address));
        }

        let converted = self.get_conversion_rate(value)?;
        if converted < self.config.minimum_usd {
            warn!(%caller, %value, %converted, "deposit below minimum");
            return Err(FundMeError::InsufficientContribution {
                converted,
                minimum: self.config.minimum_usd,
            });
        }

        let pooled = self.pooled.checked_add(value)?;
        let balance = self.registry.credited_balance(caller, value)?;

        // Escrow first; nothing below can fail
        self.bank.transfer(caller, &self.address, value)?;
        let new_funder = self.registry.set_balance(caller, balance);
        self.pooled = pooled;

        info!(%caller, %value, %converted, new_funder, pooled = %self.pooled, "funded");
        Ok(())
    }

    /// Owner sweeps the pool, re-reading the funder count each step
    pub fn withdraw(&mut self, caller: &Address) -> Result<WithdrawReceipt> {
        self.withdraw_with(caller, WithdrawStrategy::Naive)
    }

    /// Owner sweeps the pool, iterating over a cached copy of the funder list
    pub fn cheaper_withdraw(&mut self, caller: &Address) -> Result<WithdrawReceipt> {
        self.withdraw_with(caller, WithdrawStrategy::Cached)
    }

    /// Clear every funder and pay the pooled balance to the owner.
    /// If the payout fails, funders and pooled balance are restored.
    pub fn withdraw_with(
        &mut self,
        caller: &Address,
        strategy: WithdrawStrategy,
    ) -> Result<WithdrawReceipt> {
        if let Err(e) = self.ownership.require_owner(caller) {
            warn!(%caller, %strategy, "withdraw rejected");
            return Err(e);
        }

        let saved = self.registry.clone();
        let mut cost = StorageCost::default();

        let funders_cleared = strategy.clear_funders(&mut self.registry, &mut cost);
        cost.record_read();
        let amount = self.pooled;
        self.pooled = Wei::ZERO;
        cost.record_write();

        let owner = self.ownership.owner();
        if let Err(e) = self.bank.transfer(&self.address, &owner, amount) {
            self.registry = saved;
            self.pooled = amount;
            warn!(%owner, %amount, %strategy, error = %e, "withdraw rolled back");
            return Err(e);
        }

        debug!(%strategy, reads = cost.reads, writes = cost.writes, "withdraw storage cost");
        info!(%owner, %amount, funders_cleared, %strategy, "withdrawn");

        Ok(WithdrawReceipt {
            strategy,
            recipient: owner,
            amount,
            funders_cleared,
            cost,
        })
    }

    /// Reference value of `value` at the feed's current price
    pub fn get_conversion_rate(&self, value: Wei) -> Result<Usd> {
        get_conversion_rate(
            value,
            &self.price_feed,
            &self.config.conversion(),
            self.config.max_price_age_secs,
        )
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.ownership.owner()
    }

    pub fn minimum_usd(&self) -> Usd {
        self.config.minimum_usd
    }

    pub fn config(&self) -> &FundMeConfig {
        &self.config
    }

    pub fn price_feed(&self) -> &F {
        &self.price_feed
    }

    pub fn price_feed_address(&self) -> Address {
        self.price_feed.address()
    }

    /// Version of the price feed interface
    pub fn version(&self) -> u64 {
        self.price_feed.version()
    }

    pub fn address_to_amount_funded(&self, funder: &Address) -> Wei {
        self.registry.amount_of(funder)
    }

    /// Funder at `index` in first-deposit order
    pub fn funder(&self, index: usize) -> Result<Address> {
        self.registry
            .funder_at(index)
            .copied()
            .ok_or(FundMeError::IndexOutOfRange {
                index,
                len: self.registry.len(),
            })
    }

    pub fn funders_len(&self) -> usize {
        self.registry.len()
    }

    pub fn funders(&self) -> Vec<Address> {
        self.registry.addresses()
    }

    pub fn pooled_balance(&self) -> Wei {
        self.pooled
    }

    pub fn state(&self) -> LedgerState {
        if self.registry.is_empty() {
            LedgerState::Empty
        } else {
            LedgerState::Funded
        }
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    /// External-world access for fixtures (minting, recipient behaviour).
    /// Moving value out of the escrow here breaks the pooled balance, so it is test-only.
    #[cfg(any(test, feature = "fixtures"))]
    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }

    /// Give up the ledger and get the bank back. The snapshot only restores
    /// correctly against the same bank, untouched.
    pub fn into_parts(self) -> (LedgerSnapshot, F, B) {
        let snapshot = self.snapshot();
        (snapshot, self.price_feed, self.bank)
    }
}
