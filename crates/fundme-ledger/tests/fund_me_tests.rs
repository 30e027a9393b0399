use fundme_ledger::{deploy, Bank, FundMe, FundMeConfig, MemoryBank, NetworkConfig};
use fundme_oracle::{MockV3Aggregator, PriceFeed};
use fundme_types::{Address, FundMeError, Wei};

const SIGNERS: usize = 6;

fn signer(index: usize) -> Address {
    Address::from_label(&format!("signer-{}", index))
}

/// Local deployment with six funded signers; signer 0 deploys
fn fixture() -> FundMe<MockV3Aggregator, MemoryBank> {
    let mut bank = MemoryBank::new();
    for i in 0..SIGNERS {
        bank.mint(&signer(i), Wei::from_ether(10_000)).unwrap();
    }
    deploy(
        "hardhat",
        &NetworkConfig::default(),
        FundMeConfig::default(),
        signer(0),
        bank,
    )
    .unwrap()
}

fn send_value() -> Wei {
    Wei::from_ether(1)
}

#[test]
fn test_constructor_sets_the_aggregator_address() {
    let fund_me = fixture();
    let mock = NetworkConfig::default().mock_aggregator();
    assert_eq!(fund_me.price_feed_address(), mock.address());
    assert_eq!(fund_me.owner(), signer(0));
}

#[test]
fn test_fund_fails_without_enough_eth() {
    let mut fund_me = fixture();
    let err = fund_me.fund(&signer(0), Wei::ZERO).unwrap_err();
    assert!(err.to_string().starts_with("Didn't send enough"));

    // $2000/ETH: 0.02 ETH is $40, under the $50 minimum; 0.025 ETH is exactly $50
    let err = fund_me
        .fund(&signer(0), Wei::parse_ether("0.02").unwrap())
        .unwrap_err();
    assert!(matches!(err, FundMeError::InsufficientContribution { .. }));
    assert!(fund_me
        .fund(&signer(0), Wei::parse_ether("0.025").unwrap())
        .is_ok());
}

#[test]
fn test_fund_updates_the_amount_funded() {
    let mut fund_me = fixture();
    fund_me.fund(&signer(0), send_value()).unwrap();
    assert_eq!(fund_me.address_to_amount_funded(&signer(0)), send_value());
}

#[test]
fn test_fund_adds_funder_to_list() {
    let mut fund_me = fixture();
    fund_me.fund(&signer(0), send_value()).unwrap();
    assert_eq!(fund_me.funder(0).unwrap(), signer(0));
}

fn assert_single_funder_withdraw(cheaper: bool) {
    let mut fund_me = fixture();
    fund_me.fund(&signer(0), send_value()).unwrap();

    let starting_contract = fund_me.bank().balance(&fund_me.address());
    let starting_deployer = fund_me.bank().balance(&signer(0));

    if cheaper {
        fund_me.cheaper_withdraw(&signer(0)).unwrap();
    } else {
        fund_me.withdraw(&signer(0)).unwrap();
    }

    let ending_contract = fund_me.bank().balance(&fund_me.address());
    let ending_deployer = fund_me.bank().balance(&signer(0));
    assert_eq!(ending_contract, Wei::ZERO);
    assert_eq!(starting_contract.checked_add(starting_deployer).unwrap(), ending_deployer);
}

fn assert_multi_funder_withdraw(cheaper: bool) {
    let mut fund_me = fixture();
    for i in 0..SIGNERS {
        fund_me.fund(&signer(i), send_value()).unwrap();
    }

    let starting_contract = fund_me.bank().balance(&fund_me.address());
    let starting_deployer = fund_me.bank().balance(&signer(0));
    assert_eq!(starting_contract, Wei::from_ether(SIGNERS as u64));

    let receipt = if cheaper {
        fund_me.cheaper_withdraw(&signer(0)).unwrap()
    } else {
        fund_me.withdraw(&signer(0)).unwrap()
    };
    assert_eq!(receipt.funders_cleared, SIGNERS);

    assert_eq!(fund_me.bank().balance(&fund_me.address()), Wei::ZERO);
    assert_eq!(
        fund_me.bank().balance(&signer(0)),
        starting_contract.checked_add(starting_deployer).unwrap()
    );

    // Funders are reset
    assert!(matches!(
        fund_me.funder(0),
        Err(FundMeError::IndexOutOfRange { index: 0, len: 0 })
    ));
    for i in 1..SIGNERS {
        assert_eq!(fund_me.address_to_amount_funded(&signer(i)), Wei::ZERO);
    }
}

#[test]
fn test_withdraw_from_a_single_funder() {
    assert_single_funder_withdraw(false);
}

#[test]
fn test_withdraw_with_multiple_funders() {
    assert_multi_funder_withdraw(false);
}

#[test]
fn test_cheaper_withdraw_from_a_single_funder() {
    assert_single_funder_withdraw(true);
}

#[test]
fn test_cheaper_withdraw_with_multiple_funders() {
    assert_multi_funder_withdraw(true);
}

#[test]
fn test_only_owner_can_withdraw() {
    let mut fund_me = fixture();
    fund_me.fund(&signer(0), send_value()).unwrap();

    let attacker = signer(1);
    for result in [fund_me.withdraw(&attacker), fund_me.cheaper_withdraw(&attacker)] {
        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("Sender is not owner"));
    }
    assert_eq!(fund_me.pooled_balance(), send_value());
}

#[test]
fn test_heartbeat_rejects_stale_mock() {
    let mut bank = MemoryBank::new();
    bank.mint(&signer(0), Wei::from_ether(10)).unwrap();
    let config = FundMeConfig {
        max_price_age_secs: Some(3_600),
        ..FundMeConfig::default()
    };
    let mut fund_me = deploy("localhost", &NetworkConfig::default(), config, signer(0), bank).unwrap();

    assert!(fund_me.fund(&signer(0), send_value()).is_ok());

    let feed = fund_me.price_feed().clone();
    feed.update_round_data(2, 2000_0000_0000, 1, 1);
    let err = fund_me.fund(&signer(0), send_value()).unwrap_err();
    assert!(matches!(err, FundMeError::OracleUnavailable(_)));
    assert_eq!(fund_me.pooled_balance(), send_value());
}
