use alloy_primitives::{Address, U256};
use banking::model::account::BalanceState;
use banking::model::deposit::DepositState;
use banking::BankingError;
use banking_core::balance::{BalanceReader, BalanceReaderConfig, BalanceTracker};
use banking_core::config::BankingConfig;
use banking_core::deposit::{DepositWorkflow, DepositWorkflowConfig};
use banking_core::testing::{Failure, MockChain};
use std::sync::Arc;

const BASE: u64 = 8453;

struct Harness {
    chain: Arc<MockChain>,
    workflow: DepositWorkflow<Arc<MockChain>>,
    tracker: BalanceTracker<Arc<MockChain>>,
    owner: Address,
    usdc: Address,
    ausdc: Address,
}

fn usdc(amount: u64) -> U256 {
    U256::from(amount) * U256::from(1_000_000u64)
}

/// A wallet on Base holding 100 USDC, with the pool minting aUSDC 1:1.
fn funded(chain_id: u64, configure: impl FnOnce(MockChain) -> MockChain) -> Harness {
    let _ = env_logger::builder().is_test(true).try_init();

    let config = BankingConfig::default();
    let owner = Address::repeat_byte(0x11);
    let usdc_addr = config.contracts.stable_asset;
    let ausdc_addr = config.contracts.yield_bearing_asset;

    let mock = MockChain::new(chain_id)
        .with_address(owner)
        .with_decimals(usdc_addr, 6)
        .with_decimals(ausdc_addr, 6)
        .with_balance(usdc_addr, owner, usdc(100))
        .with_receipt_token(usdc_addr, ausdc_addr);
    let chain = Arc::new(configure(mock));

    let workflow = DepositWorkflow::new(chain.clone(), DepositWorkflowConfig::from(&config));
    let tracker = BalanceTracker::new(BalanceReader::new(
        chain.clone(),
        BalanceReaderConfig::from(&config),
    ));

    Harness {
        chain,
        workflow,
        tracker,
        owner,
        usdc: usdc_addr,
        ausdc: ausdc_addr,
    }
}

#[tokio::test]
async fn test_deposit_happy_path() -> anyhow::Result<()> {
    let mut h = funded(BASE, |c| c);

    let receipt = h
        .workflow
        .deposit(Some(h.usdc), "25.5", &mut h.tracker)
        .await?;

    assert_eq!(receipt.amount, U256::from(25_500_000u64));
    assert_eq!(receipt.depositor, h.owner);
    assert!(receipt.approval.success && receipt.supply.success);

    let history = h.workflow.history();
    assert_eq!(
        history,
        vec![
            DepositState::Idle,
            DepositState::Validating,
            DepositState::AwaitingApproval,
            DepositState::ApprovalPending(receipt.approval.tx_hash),
            DepositState::Supplying,
            DepositState::SupplyPending(receipt.supply.tx_hash),
            DepositState::Confirmed,
        ]
    );
    assert!(!h.workflow.is_in_flight());

    // Approval is mined before the supply is submitted.
    let log = h.chain.call_log();
    let approve = log.iter().position(|m| *m == "approve").unwrap();
    let supply = log.iter().position(|m| *m == "supply").unwrap();
    let first_wait = log.iter().position(|m| *m == "wait_for_receipt").unwrap();
    assert!(approve < first_wait && first_wait < supply);

    assert_eq!(h.chain.balance(h.usdc, h.owner), U256::from(74_500_000u64));
    assert_eq!(h.chain.balance(h.ausdc, h.owner), U256::from(25_500_000u64));

    let balances = h.tracker.state().balances().unwrap();
    assert!((balances.stable - 74.5).abs() < 1e-9);
    assert!((balances.yield_bearing - 25.5).abs() < 1e-9);
    Ok(())
}

#[tokio::test]
async fn test_invalid_amounts_make_no_chain_calls() {
    let mut h = funded(BASE, |c| c);

    for amount in ["0", "-5", "", "abc", "1e3"] {
        let err = h
            .workflow
            .deposit(Some(h.usdc), amount, &mut h.tracker)
            .await
            .unwrap_err();
        assert!(
            matches!(err, BankingError::InvalidInput(_)),
            "{:?} gave {:?}",
            amount,
            err
        );
    }
    let err = h
        .workflow
        .deposit(None, "10", &mut h.tracker)
        .await
        .unwrap_err();
    assert!(matches!(err, BankingError::InvalidInput(_)));

    assert_eq!(h.chain.total_calls(), 0);
    assert!(matches!(h.workflow.state(), DepositState::Error(_)));
    assert_eq!(h.tracker.state(), &BalanceState::Idle);
}

#[tokio::test]
async fn test_disconnected_wallet() {
    let config = BankingConfig::default();
    let chain = Arc::new(MockChain::new(BASE));
    let workflow = DepositWorkflow::new(chain.clone(), DepositWorkflowConfig::from(&config));
    let mut tracker = BalanceTracker::new(BalanceReader::new(
        chain.clone(),
        BalanceReaderConfig::from(&config),
    ));

    let err = workflow
        .deposit(Some(config.contracts.stable_asset), "10", &mut tracker)
        .await
        .unwrap_err();
    assert_eq!(err, BankingError::WalletNotReady);
    assert_eq!(chain.total_calls(), 0);
}

#[tokio::test]
async fn test_insufficient_balance_never_approves() {
    let mut h = funded(BASE, |c| c);

    let err = h
        .workflow
        .deposit(Some(h.usdc), "100.000001", &mut h.tracker)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BankingError::InsufficientBalance {
            requested: U256::from(100_000_001u64),
            available: usdc(100),
        }
    );
    assert_eq!(h.chain.calls("approve"), 0);
    assert_eq!(h.chain.calls("supply"), 0);
}

#[tokio::test]
async fn test_wrong_network_is_switched() {
    let mut h = funded(1, |c| c.with_known_chain(BASE));

    h.workflow
        .deposit(Some(h.usdc), "10", &mut h.tracker)
        .await
        .unwrap();

    assert_eq!(h.chain.calls("switch_network"), 1);
    assert_eq!(h.chain.calls("add_network"), 0);
}

#[tokio::test]
async fn test_unknown_network_is_added() {
    let mut h = funded(1, |c| c);

    h.workflow
        .deposit(Some(h.usdc), "10", &mut h.tracker)
        .await
        .unwrap();

    assert_eq!(h.chain.calls("switch_network"), 1);
    assert_eq!(h.chain.calls("add_network"), 1);
}

#[tokio::test]
async fn test_refused_network_switch() {
    let mut h = funded(1, |c| {
        c.with_known_chain(BASE).failing(Failure::SwitchNetwork)
    });

    let err = h
        .workflow
        .deposit(Some(h.usdc), "10", &mut h.tracker)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BankingError::NetworkMismatch {
            expected: BASE,
            actual: 1
        }
    );
    assert_eq!(h.chain.calls("balance_of"), 0);
    assert_eq!(h.chain.calls("approve"), 0);
}

#[tokio::test]
async fn test_reverted_approval_stops_before_supply() {
    let mut h = funded(BASE, |c| c.failing(Failure::ApprovalReverted));

    let err = h
        .workflow
        .deposit(Some(h.usdc), "10", &mut h.tracker)
        .await
        .unwrap_err();

    assert!(matches!(err, BankingError::ApprovalFailed(_)));
    assert_eq!(h.chain.calls("supply"), 0);
    assert_eq!(h.workflow.state(), DepositState::Error(err));
}

#[tokio::test]
async fn test_rejected_supply_leaves_allowance() {
    let mut h = funded(BASE, |c| c.failing(Failure::Supply));
    let pool = BankingConfig::default().contracts.pool;

    let err = h
        .workflow
        .deposit(Some(h.usdc), "10", &mut h.tracker)
        .await
        .unwrap_err();

    assert!(matches!(err, BankingError::SupplyFailed(_)));
    assert_eq!(h.chain.allowance(h.usdc, h.owner, pool), usdc(10));
    assert_eq!(h.chain.balance(h.usdc, h.owner), usdc(100));
    assert!(h
        .workflow
        .history()
        .contains(&DepositState::Supplying));
}

#[tokio::test(start_paused = true)]
async fn test_stalled_receipt_times_out() {
    let mut h = funded(BASE, |c| c.failing(Failure::StallReceipts));

    let err = h
        .workflow
        .deposit(Some(h.usdc), "10", &mut h.tracker)
        .await
        .unwrap_err();

    assert!(
        matches!(&err, BankingError::ApprovalFailed(msg) if msg.contains("Timed out")),
        "got {:?}",
        err
    );
    assert_eq!(h.chain.calls("supply"), 0);
    assert!(!h.workflow.is_in_flight());
}

#[tokio::test(start_paused = true)]
async fn test_second_deposit_while_in_flight() {
    let mut h = funded(BASE, |c| c.failing(Failure::StallReceipts));
    let config = BankingConfig::default();
    let mut other_tracker = BalanceTracker::new(BalanceReader::new(
        h.chain.clone(),
        BalanceReaderConfig::from(&config),
    ));

    let (first, second) = tokio::join!(
        h.workflow.deposit(Some(h.usdc), "10", &mut h.tracker),
        h.workflow.deposit(Some(h.usdc), "10", &mut other_tracker),
    );

    assert!(matches!(first, Err(BankingError::ApprovalFailed(_))));
    assert_eq!(second, Err(BankingError::DepositInProgress));
    assert_eq!(h.chain.calls("approve"), 1);
    assert!(!h.workflow.is_in_flight());
}

#[tokio::test]
async fn test_rejected_approval_signature() {
    let mut h = funded(BASE, |c| c.failing(Failure::Approve));

    let err = h
        .workflow
        .deposit(Some(h.usdc), "10", &mut h.tracker)
        .await
        .unwrap_err();

    assert!(matches!(err, BankingError::ApprovalFailed(_)));
    assert_eq!(h.chain.calls("approve"), 1);
    assert_eq!(h.chain.calls("wait_for_receipt"), 0);
    assert_eq!(h.chain.calls("supply"), 0);
    assert_eq!(h.workflow.state(), DepositState::Error(err));
    assert!(h
        .workflow
        .history()
        .contains(&DepositState::AwaitingApproval));
}

#[tokio::test]
async fn test_reverted_supply_moves_no_funds() {
    let mut h = funded(BASE, |c| c.failing(Failure::SupplyReverted));

    let err = h
        .workflow
        .deposit(Some(h.usdc), "10", &mut h.tracker)
        .await
        .unwrap_err();

    assert!(matches!(err, BankingError::SupplyFailed(_)));
    assert_eq!(h.chain.calls("supply"), 1);
    assert_eq!(h.chain.balance(h.usdc, h.owner), usdc(100));
    assert_eq!(h.chain.balance(h.ausdc, h.owner), U256::ZERO);

    let history = h.workflow.history();
    assert!(matches!(
        history[history.len() - 2],
        DepositState::SupplyPending(_)
    ));
    assert_eq!(history.last(), Some(&DepositState::Error(err)));
    assert_eq!(h.tracker.state(), &BalanceState::Idle);
}

#[tokio::test]
async fn test_deposit_decimals_have_no_fallback() {
    let mut h = funded(BASE, |c| c.failing(Failure::Decimals));

    let err = h
        .workflow
        .deposit(Some(h.usdc), "10", &mut h.tracker)
        .await
        .unwrap_err();

    // The balance reader would fall back to 6 here; a deposit must not guess.
    assert!(
        matches!(&err, BankingError::ReadFailure(msg) if msg.contains("decimals")),
        "got {:?}",
        err
    );
    assert_eq!(h.chain.calls("decimals"), 1);
    assert_eq!(h.chain.calls("balance_of"), 0);
    assert_eq!(h.chain.calls("approve"), 0);
    assert_eq!(h.workflow.state(), DepositState::Error(err));
}

#[tokio::test]
async fn test_deposit_balance_read_failure() {
    let mut h = funded(BASE, |c| c.failing(Failure::BalanceOf));

    let err = h
        .workflow
        .deposit(Some(h.usdc), "10", &mut h.tracker)
        .await
        .unwrap_err();

    assert!(
        matches!(&err, BankingError::ReadFailure(msg) if msg.contains("balanceOf")),
        "got {:?}",
        err
    );
    assert_eq!(h.chain.calls("approve"), 0);
    assert_eq!(h.workflow.state(), DepositState::Error(err));
}

#[tokio::test]
async fn test_refused_network_add() {
    let mut h = funded(1, |c| c.failing(Failure::AddNetwork));

    let err = h
        .workflow
        .deposit(Some(h.usdc), "10", &mut h.tracker)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BankingError::NetworkMismatch {
            expected: BASE,
            actual: 1
        }
    );
    assert_eq!(h.chain.calls("switch_network"), 1);
    assert_eq!(h.chain.calls("add_network"), 1);
    assert_eq!(h.chain.calls("decimals"), 0);
    assert_eq!(h.chain.calls("approve"), 0);
    assert_eq!(h.workflow.state(), DepositState::Error(err));
}

#[tokio::test]
async fn test_balance_drained_between_deposits() -> anyhow::Result<()> {
    let mut h = funded(BASE, |c| c);

    h.workflow
        .deposit(Some(h.usdc), "10", &mut h.tracker)
        .await?;
    h.chain.set_balance(h.usdc, h.owner, usdc(5));

    let err = h
        .workflow
        .deposit(Some(h.usdc), "10", &mut h.tracker)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BankingError::InsufficientBalance {
            requested: usdc(10),
            available: usdc(5),
        }
    );
    assert_eq!(h.chain.calls("approve"), 1);
    // A new run starts its history over.
    assert_eq!(h.workflow.history()[0], DepositState::Idle);
    assert!(!h.workflow.history().contains(&DepositState::Confirmed));
    Ok(())
}
