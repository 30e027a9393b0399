use fundme_ledger::{
    Bank, FundMe, FundMeConfig, LedgerState, MemoryBank, WithdrawStrategy,
};
use fundme_oracle::MockV3Aggregator;
use fundme_types::{Address, FundMeError, Usd, Wei};
use proptest::prelude::*;
use std::collections::BTreeMap;

const OWNER: &str = "owner";
const MINIMUM: u128 = 5;

fn funder(index: u8) -> Address {
    Address::from_label(&format!("funder-{}", index))
}

fn ledger() -> FundMe<MockV3Aggregator, MemoryBank> {
    let mut bank = MemoryBank::new();
    for i in 0..8 {
        bank.mint(&funder(i), Wei::from_raw(1_000_000)).unwrap();
    }
    let config = FundMeConfig {
        minimum_usd: Usd::from_raw(MINIMUM),
        native_decimals: 0,
        reference_decimals: 0,
        max_price_age_secs: None,
    };
    FundMe::new(
        Address::from_label("fund-me"),
        Address::from_label(OWNER),
        MockV3Aggregator::new(0, 1),
        bank,
        config,
    )
    .unwrap()
}

fn deposits() -> impl Strategy<Value = Vec<(u8, u128)>> {
    prop::collection::vec((0u8..8, 0u128..50), 0..24)
}

fn caller() -> impl Strategy<Value = Option<u8>> {
    // None is the owner
    prop_oneof![Just(None), (0u8..8).prop_map(Some)]
}

proptest! {
    #[test]
    fn prop_deposits_sum_into_the_pool(deposits in deposits()) {
        let mut fund_me = ledger();
        let mut expected: BTreeMap<Address, u128> = BTreeMap::new();
        let mut order = Vec::new();

        for (who, amount) in deposits {
            let before = fund_me.snapshot();
            match fund_me.fund(&funder(who), Wei::from_raw(amount)) {
                Ok(()) => {
                    prop_assert!(amount >= MINIMUM);
                    if !expected.contains_key(&funder(who)) {
                        order.push(funder(who));
                    }
                    *expected.entry(funder(who)).or_default() += amount;
                }
                Err(e) => {
                    prop_assert!(amount < MINIMUM);
                    let is_insufficient = matches!(e, FundMeError::InsufficientContribution { .. });
                    prop_assert!(is_insufficient);
                    prop_assert_eq!(fund_me.snapshot(), before);
                }
            }
        }

        let total: u128 = expected.values().sum();
        prop_assert_eq!(fund_me.pooled_balance(), Wei::from_raw(total));
        prop_assert_eq!(fund_me.bank().balance(&fund_me.address()), Wei::from_raw(total));
        prop_assert_eq!(fund_me.funders(), order);
        for (address, amount) in &expected {
            prop_assert_eq!(fund_me.address_to_amount_funded(address), Wei::from_raw(*amount));
        }
    }

    #[test]
    fn prop_strategies_are_equivalent(
        deposits in deposits(),
        who in caller(),
        owner_rejects in any::<bool>(),
    ) {
        let mut outcomes = Vec::new();

        for strategy in [WithdrawStrategy::Naive, WithdrawStrategy::Cached] {
            let mut fund_me = ledger();
            for (i, amount) in &deposits {
                let _ = fund_me.fund(&funder(*i), Wei::from_raw(*amount));
            }
            fund_me.bank_mut().set_rejects_transfers(&Address::from_label(OWNER), owner_rejects);

            let before = fund_me.snapshot();
            let caller = who.map(funder).unwrap_or_else(|| Address::from_label(OWNER));
            let result = fund_me.withdraw_with(&caller, strategy);

            match &result {
                Ok(receipt) => {
                    prop_assert_eq!(receipt.amount, before.pooled_balance);
                    prop_assert_eq!(fund_me.state(), LedgerState::Empty);
                    prop_assert_eq!(fund_me.pooled_balance(), Wei::ZERO);
                    prop_assert_eq!(fund_me.funders_len(), 0);
                }
                Err(_) => prop_assert_eq!(fund_me.snapshot(), before.clone()),
            }

            let outcome = result.map(|r| (r.amount, r.funders_cleared, r.recipient));
            let bank = fund_me.bank().clone();
            outcomes.push((outcome, fund_me.snapshot(), bank));
        }

        prop_assert_eq!(&outcomes[0], &outcomes[1]);
    }

    #[test]
    fn prop_cached_never_reads_more(deposits in deposits()) {
        let mut costs = Vec::new();
        let mut funders = 0;
        for strategy in [WithdrawStrategy::Naive, WithdrawStrategy::Cached] {
            let mut fund_me = ledger();
            for (i, amount) in &deposits {
                let _ = fund_me.fund(&funder(*i), Wei::from_raw(*amount));
            }
            funders = fund_me.funders_len();
            let receipt = fund_me.withdraw_with(&Address::from_label(OWNER), strategy).unwrap();
            costs.push(receipt.cost);
        }

        if funders == 0 {
            prop_assert_eq!(costs[0], costs[1]);
        } else {
            prop_assert!(costs[1].reads < costs[0].reads);
        }
    }
}
