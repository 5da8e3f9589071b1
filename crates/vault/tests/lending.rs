//! Lending lifecycle tests
//!
//! Drive the vault through the chain runtime the way clients do: every call
//! lands in its own block, queries are answered at the tip.

use bitflow_core::{AccountId, Amount};
use bitflow_vault::{
    Bank, CallCounters, Chain, HealthStatus, InMemoryBank, Liquidation, Loan, ProtocolStats,
    Receipt, TransferError, VaultCall, VaultError, VolumeTotals,
};

fn account(id: &str) -> AccountId {
    AccountId::new(id).unwrap()
}

fn amount(val: u128) -> Amount {
    Amount::new(val)
}

fn setup() -> Chain<InMemoryBank> {
    let mut chain = Chain::in_memory(account("deployer"), account("vault"));
    for id in ["alice", "bob", "carol"] {
        chain.faucet(&account(id), amount(10_000)).unwrap();
    }
    chain
}

fn deposit(chain: &mut Chain<InMemoryBank>, who: &str, val: u128) -> Result<Receipt, VaultError> {
    chain
        .submit(account(who), VaultCall::Deposit { amount: amount(val) })
        .result
}

fn borrow(
    chain: &mut Chain<InMemoryBank>,
    who: &str,
    val: u128,
    rate_bps: u32,
    term_days: u32,
) -> Result<Receipt, VaultError> {
    chain
        .submit(
            account(who),
            VaultCall::Borrow {
                amount: amount(val),
                rate_bps,
                term_days,
            },
        )
        .result
}

fn liquidate(
    chain: &mut Chain<InMemoryBank>,
    who: &str,
    borrower: &str,
    price: u128,
) -> Result<Receipt, VaultError> {
    chain
        .submit(
            account(who),
            VaultCall::Liquidate {
                borrower: account(borrower),
                price,
            },
        )
        .result
}

fn bank_balance(chain: &Chain<InMemoryBank>, who: &str) -> Amount {
    chain.vault().bank().balance_of(&account(who))
}

/// Everything a rejected call must leave untouched for one account
#[derive(Debug, PartialEq)]
struct Snapshot {
    deposit: Amount,
    loan: Option<Loan>,
    total_deposits: Amount,
    calls: CallCounters,
    volumes: VolumeTotals,
    stats: ProtocolStats,
    bank: Amount,
    custody_bank: Amount,
    /// Blocks since last activity, measured at a fixed height
    idle: u64,
}

fn snapshot(chain: &Chain<InMemoryBank>, who: &str) -> Snapshot {
    let vault = chain.vault();
    let id = account(who);
    Snapshot {
        deposit: vault.deposit_of(&id),
        loan: vault.loan_of(&id),
        total_deposits: vault.total_deposits(),
        calls: vault.protocol_metrics(),
        volumes: vault.volume_metrics(),
        stats: vault.protocol_stats(),
        bank: bank_balance(chain, who),
        custody_bank: bank_balance(chain, "vault"),
        idle: vault.time_since_last_activity(&id, 1_000_000),
    }
}

// ============================================================================
// Deposits
// ============================================================================

#[test]
fn test_deposit_withdraw_round_trip() {
    let mut chain = setup();
    deposit(&mut chain, "bob", 250).unwrap();

    let before_deposit = chain.vault().deposit_of(&account("alice"));
    let before_total = chain.vault().total_deposits();
    let before_bank = bank_balance(&chain, "alice");

    deposit(&mut chain, "alice", 777).unwrap();
    assert_eq!(chain.vault().deposit_of(&account("alice")), amount(777));
    assert_eq!(chain.vault().total_deposits(), amount(1027));

    let receipt = chain
        .submit(account("alice"), VaultCall::Withdraw { amount: amount(777) })
        .result
        .unwrap();
    assert_eq!(receipt, Receipt::Withdrawn { balance: Amount::ZERO });

    assert_eq!(chain.vault().deposit_of(&account("alice")), before_deposit);
    assert_eq!(chain.vault().total_deposits(), before_total);
    assert_eq!(bank_balance(&chain, "alice"), before_bank);
}

#[test]
fn test_zero_amounts_rejected() {
    let mut chain = setup();

    let err = deposit(&mut chain, "alice", 0).unwrap_err();
    assert_eq!(err, VaultError::InvalidAmount);
    assert_eq!(err.code(), Some(102));

    deposit(&mut chain, "alice", 100).unwrap();
    let err = chain
        .submit(account("alice"), VaultCall::Withdraw { amount: Amount::ZERO })
        .result
        .unwrap_err();
    assert_eq!(err.code(), Some(102));
}

#[test]
fn test_overdraw_rejected() {
    let mut chain = setup();
    deposit(&mut chain, "alice", 100).unwrap();
    let before = snapshot(&chain, "alice");

    let err = chain
        .submit(account("alice"), VaultCall::Withdraw { amount: amount(101) })
        .result
        .unwrap_err();

    assert_eq!(
        err,
        VaultError::InsufficientBalance {
            available: amount(100),
            requested: amount(101),
        }
    );
    assert_eq!(err.code(), Some(101));
    assert_eq!(snapshot(&chain, "alice"), before);
}

#[test]
fn test_deposit_beyond_bank_balance_is_transfer_error() {
    let mut chain = setup();

    let err = deposit(&mut chain, "alice", 10_001).unwrap_err();

    assert!(matches!(
        err,
        VaultError::Transfer(TransferError::InsufficientFunds { .. })
    ));
    assert_eq!(err.code(), Some(1));
    assert_eq!(chain.vault().deposit_of(&account("alice")), Amount::ZERO);
    assert_eq!(chain.vault().total_deposits(), Amount::ZERO);
    assert_eq!(chain.vault().protocol_metrics().deposits, 0);
}

// ============================================================================
// Collateral math
// ============================================================================

#[test]
fn test_required_collateral_values() {
    let chain = setup();
    let vault = chain.vault();

    assert_eq!(vault.required_collateral(amount(333)).unwrap(), amount(499));
    assert_eq!(vault.required_collateral(amount(1)).unwrap(), amount(1));
    assert_eq!(
        vault.required_collateral(amount(1_000_000)).unwrap(),
        amount(1_500_000)
    );
}

#[test]
fn test_max_borrow_after_deposit() {
    let mut chain = setup();
    deposit(&mut chain, "alice", 1500).unwrap();
    deposit(&mut chain, "bob", 1000).unwrap();

    assert_eq!(chain.vault().max_borrow(&account("alice")).unwrap(), amount(1000));
    assert_eq!(chain.vault().max_borrow(&account("bob")).unwrap(), amount(666));
    assert_eq!(chain.vault().max_borrow(&account("carol")).unwrap(), Amount::ZERO);
}

// ============================================================================
// Borrowing
// ============================================================================

#[test]
fn test_borrow_validation_order() {
    let mut chain = setup();
    deposit(&mut chain, "alice", 1500).unwrap();
    let before = snapshot(&chain, "alice");

    let rejected = [
        (1000, 0, 30, VaultError::InvalidInterestRate(0)),
        (1000, 10_001, 30, VaultError::InvalidInterestRate(10_001)),
        (1000, 500, 0, VaultError::InvalidTerm(0)),
        (1000, 500, 366, VaultError::InvalidTerm(366)),
        (
            1001,
            500,
            30,
            VaultError::InsufficientCollateral {
                deposited: amount(1500),
                required: amount(1501),
            },
        ),
        // Zero passes the collateral check and is caught afterwards
        (0, 500, 30, VaultError::InvalidAmount),
    ];

    for (val, rate_bps, term_days, expected) in rejected {
        let err = borrow(&mut chain, "alice", val, rate_bps, term_days).unwrap_err();
        assert_eq!(err, expected);
        assert_eq!(snapshot(&chain, "alice"), before);
    }
}

#[test]
fn test_borrow_records_loan_and_pays_out() {
    let mut chain = setup();
    deposit(&mut chain, "alice", 1500).unwrap();

    let tx = chain.submit(
        account("alice"),
        VaultCall::Borrow {
            amount: amount(1000),
            rate_bps: 500,
            term_days: 30,
        },
    );
    let Receipt::Borrowed { loan } = tx.result.unwrap() else {
        panic!("expected a borrow receipt");
    };

    assert_eq!(loan.principal, amount(1000));
    assert_eq!(loan.rate_bps, 500);
    assert_eq!(loan.start_height, tx.height);
    assert_eq!(loan.term_end_height, tx.height + 30 * 144);
    assert_eq!(chain.vault().loan_of(&account("alice")), Some(loan));
    assert_eq!(bank_balance(&chain, "alice"), amount(9500));
    assert_eq!(bank_balance(&chain, "vault"), amount(500));
}

#[test]
fn test_one_loan_per_account() {
    let mut chain = setup();
    deposit(&mut chain, "alice", 5000).unwrap();
    borrow(&mut chain, "alice", 1000, 500, 30).unwrap();

    let err = borrow(&mut chain, "alice", 1000, 500, 30).unwrap_err();

    assert_eq!(err, VaultError::AlreadyHasLoan(account("alice")));
    assert_eq!(err.code(), Some(103));
    assert_eq!(
        chain.vault().loan_of(&account("alice")).unwrap().principal,
        amount(1000)
    );
    assert_eq!(chain.vault().protocol_metrics().borrows, 1);
}

// ============================================================================
// Interest
// ============================================================================

#[test]
fn test_interest_rounding_threshold() {
    let mut chain = setup();
    deposit(&mut chain, "alice", 1500).unwrap();
    borrow(&mut chain, "alice", 1000, 100, 30).unwrap();

    let owed = chain.repayment_amount(&account("alice")).unwrap().unwrap();
    assert_eq!(owed.interest, Amount::ZERO);

    chain.mine_empty_blocks(52);
    let owed = chain.repayment_amount(&account("alice")).unwrap().unwrap();
    assert_eq!(owed.interest, Amount::ZERO);
    assert_eq!(owed.total, amount(1000));

    chain.mine_empty_blocks(1);
    let owed = chain.repayment_amount(&account("alice")).unwrap().unwrap();
    assert_eq!(owed.interest, amount(1));
    assert_eq!(owed.total, amount(1001));
}

#[test]
fn test_interest_never_decreases() {
    let mut chain = setup();
    deposit(&mut chain, "alice", 9000).unwrap();
    borrow(&mut chain, "alice", 6000, 1234, 365).unwrap();

    let mut last = Amount::ZERO;
    for _ in 0..50 {
        chain.mine_empty_blocks(97);
        let interest = chain
            .repayment_amount(&account("alice"))
            .unwrap()
            .unwrap()
            .interest;
        assert!(interest >= last);
        last = interest;
    }
    assert!(!last.is_zero());
}

#[test]
fn test_no_repayment_without_loan() {
    let chain = setup();
    assert!(chain.repayment_amount(&account("alice")).unwrap().is_none());
}

// ============================================================================
// Repayment
// ============================================================================

#[test]
fn test_repay_without_loan() {
    let mut chain = setup();

    let err = chain.submit(account("alice"), VaultCall::Repay).result.unwrap_err();

    assert_eq!(err, VaultError::NoActiveLoan(account("alice")));
    assert_eq!(err.code(), Some(106));
    assert_eq!(chain.vault().total_repaid(), Amount::ZERO);
}

#[test]
fn test_repay_is_rejected_when_short_of_funds() {
    let mut chain = setup();
    deposit(&mut chain, "alice", 9000).unwrap();
    borrow(&mut chain, "alice", 6000, 10_000, 365).unwrap();
    // Spend the borrowed funds so the interest cannot be covered
    chain
        .submit(account("alice"), VaultCall::Deposit { amount: amount(7000) })
        .result
        .unwrap();
    chain.mine_empty_blocks(144 * 365);

    let before = snapshot(&chain, "alice");
    let err = chain.submit(account("alice"), VaultCall::Repay).result.unwrap_err();

    assert_eq!(err.code(), Some(1));
    assert_eq!(snapshot(&chain, "alice"), before);
    assert_eq!(chain.vault().total_repaid(), Amount::ZERO);
}

#[test]
fn test_end_to_end_lifecycle() -> anyhow::Result<()> {
    let mut chain = setup();
    let alice = account("alice");

    deposit(&mut chain, "alice", 5000)?;
    borrow(&mut chain, "alice", 3000, 500, 30)?;
    chain.mine_empty_blocks(1000);

    // 1001 blocks elapsed at the repay height: floor(3000 * 500 * 1001 / 5_256_000)
    let receipt = chain.submit(alice.clone(), VaultCall::Repay).result?;
    let Receipt::Repaid { repayment } = receipt else {
        anyhow::bail!("expected a repay receipt");
    };
    assert_eq!(repayment.principal, amount(3000));
    assert_eq!(repayment.interest, amount(285));
    assert_eq!(repayment.total, amount(3285));
    assert!(chain.vault().loan_of(&alice).is_none());
    assert_eq!(chain.vault().total_repaid(), amount(3285));

    chain
        .submit(alice.clone(), VaultCall::Withdraw { amount: amount(5000) })
        .result?;

    assert_eq!(chain.vault().deposit_of(&alice), Amount::ZERO);
    assert_eq!(chain.vault().total_deposits(), Amount::ZERO);
    assert_eq!(bank_balance(&chain, "alice"), amount(9715));
    assert_eq!(bank_balance(&chain, "vault"), amount(285));
    Ok(())
}

// ============================================================================
// Health & liquidation
// ============================================================================

#[test]
fn test_health_factor_values() {
    let mut chain = setup();
    deposit(&mut chain, "alice", 1500).unwrap();
    borrow(&mut chain, "alice", 1000, 500, 30).unwrap();
    deposit(&mut chain, "bob", 2000).unwrap();
    borrow(&mut chain, "bob", 1000, 500, 30).unwrap();

    let vault = chain.vault();
    assert_eq!(vault.health_factor(&account("alice"), 100).unwrap(), Some(150));
    assert_eq!(vault.health_factor(&account("bob"), 50).unwrap(), Some(100));
    assert_eq!(vault.health_factor(&account("carol"), 100).unwrap(), None);

    // Exactly at the threshold is still safe
    assert_eq!(vault.health_factor(&account("bob"), 55).unwrap(), Some(110));
    assert!(!vault.is_liquidatable(&account("bob"), 55).unwrap());

    assert_eq!(vault.health_factor(&account("alice"), 73).unwrap(), Some(109));
    assert!(vault.is_liquidatable(&account("alice"), 73).unwrap());

    assert!(!vault.is_liquidatable(&account("carol"), 1).unwrap());
}

#[test]
fn test_liquidation_economics() {
    let mut chain = setup();
    deposit(&mut chain, "alice", 1500).unwrap();
    borrow(&mut chain, "alice", 1000, 500, 30).unwrap();

    let receipt = liquidate(&mut chain, "bob", "alice", 70).unwrap();

    assert_eq!(
        receipt,
        Receipt::Liquidated {
            liquidation: Liquidation {
                seized_collateral: amount(1500),
                paid: amount(1050),
                bonus: amount(50),
            }
        }
    );
    assert!(chain.vault().loan_of(&account("alice")).is_none());
    assert_eq!(chain.vault().deposit_of(&account("alice")), Amount::ZERO);
    assert_eq!(chain.vault().total_deposits(), Amount::ZERO);
    assert_eq!(chain.vault().total_liquidations(), 1);
    assert_eq!(bank_balance(&chain, "bob"), amount(10_450));
    assert_eq!(bank_balance(&chain, "alice"), amount(9500));
    assert_eq!(bank_balance(&chain, "vault"), amount(50));
    // Funds only move, never appear
    assert_eq!(chain.vault().bank().total_supply(), Some(amount(30_000)));
}

#[test]
fn test_liquidation_bonus_floors() {
    let mut chain = setup();
    deposit(&mut chain, "alice", 500).unwrap();
    borrow(&mut chain, "alice", 333, 500, 30).unwrap();

    let Receipt::Liquidated { liquidation } = liquidate(&mut chain, "bob", "alice", 10).unwrap()
    else {
        panic!("expected a liquidation receipt");
    };

    assert_eq!(liquidation.bonus, amount(16));
    assert_eq!(liquidation.paid, amount(349));
    assert_eq!(liquidation.seized_collateral, amount(500));
}

#[test]
fn test_healthy_position_not_liquidatable() {
    let mut chain = setup();
    deposit(&mut chain, "alice", 1500).unwrap();
    borrow(&mut chain, "alice", 1000, 500, 30).unwrap();

    let err = liquidate(&mut chain, "bob", "alice", 100).unwrap_err();

    assert_eq!(
        err,
        VaultError::NotLiquidatable {
            account: account("alice"),
            health_factor: 150,
        }
    );
    assert_eq!(err.code(), Some(107));
    assert_eq!(chain.vault().total_liquidations(), 0);
    assert_eq!(chain.vault().deposit_of(&account("alice")), amount(1500));
}

#[test]
fn test_self_liquidation_always_fails() {
    let mut chain = setup();
    deposit(&mut chain, "alice", 1500).unwrap();
    borrow(&mut chain, "alice", 1000, 500, 30).unwrap();

    for price in [1, 50, 100, 1000] {
        let err = liquidate(&mut chain, "alice", "alice", price).unwrap_err();
        assert_eq!(err, VaultError::LiquidateOwnLoan);
        assert_eq!(err.code(), Some(108));
    }
    assert!(chain.vault().loan_of(&account("alice")).is_some());
    assert_eq!(chain.vault().total_liquidations(), 0);
}

#[test]
fn test_liquidation_without_loan() {
    let mut chain = setup();
    let err = liquidate(&mut chain, "bob", "alice", 1).unwrap_err();
    assert_eq!(err, VaultError::NoActiveLoan(account("alice")));
}

#[test]
fn test_liquidator_short_of_funds_changes_nothing() {
    let mut chain = Chain::in_memory(account("deployer"), account("vault"));
    chain.faucet(&account("alice"), amount(10_000)).unwrap();
    chain.faucet(&account("bob"), amount(1000)).unwrap();
    deposit(&mut chain, "alice", 1500).unwrap();
    borrow(&mut chain, "alice", 1000, 500, 30).unwrap();

    let err = liquidate(&mut chain, "bob", "alice", 70).unwrap_err();

    assert_eq!(err.code(), Some(1));
    assert!(chain.vault().loan_of(&account("alice")).is_some());
    assert_eq!(chain.vault().deposit_of(&account("alice")), amount(1500));
    assert_eq!(bank_balance(&chain, "bob"), amount(1000));
    assert_eq!(bank_balance(&chain, "vault"), amount(500));
    assert_eq!(chain.vault().total_liquidations(), 0);
}

#[test]
fn test_liquidation_count_increments_once_per_success() {
    let mut chain = setup();
    deposit(&mut chain, "alice", 1500).unwrap();
    borrow(&mut chain, "alice", 1000, 500, 30).unwrap();
    deposit(&mut chain, "carol", 1500).unwrap();
    borrow(&mut chain, "carol", 1000, 500, 30).unwrap();

    liquidate(&mut chain, "bob", "alice", 100).unwrap_err();
    assert_eq!(chain.vault().total_liquidations(), 0);

    liquidate(&mut chain, "bob", "alice", 50).unwrap();
    assert_eq!(chain.vault().total_liquidations(), 1);

    liquidate(&mut chain, "bob", "alice", 50).unwrap_err();
    assert_eq!(chain.vault().total_liquidations(), 1);

    liquidate(&mut chain, "bob", "carol", 50).unwrap();
    assert_eq!(chain.vault().total_liquidations(), 2);
    assert_eq!(chain.vault().protocol_metrics().liquidations, 2);
}

#[test]
fn test_liquidating_a_drained_position() {
    let mut chain = setup();
    deposit(&mut chain, "bob", 2000).unwrap();
    deposit(&mut chain, "alice", 1500).unwrap();
    borrow(&mut chain, "alice", 1000, 500, 30).unwrap();
    // Withdrawals do not look at open loans
    chain
        .submit(account("alice"), VaultCall::Withdraw { amount: amount(1500) })
        .result
        .unwrap();

    assert_eq!(chain.vault().health_factor(&account("alice"), 100).unwrap(), Some(0));

    let Receipt::Liquidated { liquidation } = liquidate(&mut chain, "bob", "alice", 100).unwrap()
    else {
        panic!("expected a liquidation receipt");
    };
    assert_eq!(liquidation.seized_collateral, Amount::ZERO);
    assert_eq!(liquidation.paid, amount(1050));
    assert_eq!(bank_balance(&chain, "bob"), amount(6950));
}

// ============================================================================
// Queries & metrics
// ============================================================================

#[test]
fn test_position_summary() {
    let mut chain = setup();
    deposit(&mut chain, "alice", 3000).unwrap();
    let tx = chain.submit(
        account("alice"),
        VaultCall::Borrow {
            amount: amount(1000),
            rate_bps: 500,
            term_days: 30,
        },
    );
    tx.result.unwrap();

    let summary = chain.vault().position_summary(&account("alice"), 100).unwrap();

    assert_eq!(summary.deposit_amount, amount(3000));
    assert!(summary.has_loan);
    assert_eq!(summary.loan_amount, amount(1000));
    assert_eq!(summary.loan_interest_rate, 500);
    assert_eq!(summary.loan_term_end, tx.height + 4320);
    assert_eq!(summary.health_factor, Some(300));
    assert_eq!(summary.health_status, Some(HealthStatus::Healthy));
    assert!(!summary.is_liquidatable);
    assert_eq!(summary.max_borrow_available, amount(2000));
    assert_eq!(summary.collateral_usage_percent, 50);

    let empty = chain.vault().position_summary(&account("carol"), 100).unwrap();
    assert!(!empty.has_loan);
    assert_eq!(empty.health_factor, None);
    assert_eq!(empty.health_status, None);
    assert_eq!(empty.collateral_usage_percent, 0);
}

#[test]
fn test_metrics_counters() {
    let mut chain = setup();
    deposit(&mut chain, "alice", 1500).unwrap();
    deposit(&mut chain, "bob", 2000).unwrap();
    chain
        .submit(account("bob"), VaultCall::Withdraw { amount: amount(500) })
        .result
        .unwrap();
    borrow(&mut chain, "alice", 1000, 500, 30).unwrap();
    chain.submit(account("alice"), VaultCall::Repay).result.unwrap();
    // Failed calls are not counted
    deposit(&mut chain, "carol", 0).unwrap_err();
    chain.submit(account("carol"), VaultCall::Repay).result.unwrap_err();

    let calls = chain.vault().protocol_metrics();
    assert_eq!(calls.deposits, 2);
    assert_eq!(calls.withdrawals, 1);
    assert_eq!(calls.borrows, 1);
    assert_eq!(calls.repayments, 1);
    assert_eq!(calls.liquidations, 0);

    let volumes = chain.vault().volume_metrics();
    assert_eq!(volumes.deposit_volume, amount(3500));
    assert_eq!(volumes.borrow_volume, amount(1000));
    assert_eq!(volumes.repay_volume, amount(1000));
    assert_eq!(volumes.liquidation_volume, Amount::ZERO);

    let stats = chain.vault().protocol_stats();
    assert_eq!(stats.total_deposits, amount(3000));
    assert_eq!(stats.total_repaid, amount(1000));
    assert_eq!(stats.total_liquidations, 0);

    let overview = chain.vault().market_overview().unwrap();
    assert_eq!(overview.active_loans, 0);
    assert_eq!(overview.borrow_volume, amount(1000));
    assert_eq!(overview.outstanding_principal, Amount::ZERO);
}

#[test]
fn test_time_since_last_activity() {
    let mut chain = setup();
    deposit(&mut chain, "alice", 100).unwrap();

    assert_eq!(chain.time_since_last_activity(&account("alice")), 0);

    chain.mine_empty_blocks(10);
    assert_eq!(chain.time_since_last_activity(&account("alice")), 10);

    // Failed calls do not count as activity
    deposit(&mut chain, "alice", 0).unwrap_err();
    assert_eq!(chain.time_since_last_activity(&account("alice")), 11);

    // Never active: measured from height 0
    assert_eq!(
        chain.time_since_last_activity(&account("carol")),
        chain.height()
    );
}

// ============================================================================
// Administration
// ============================================================================

#[test]
fn test_initialize_owner_only() {
    let mut chain = setup();

    let err = chain
        .submit(account("alice"), VaultCall::Initialize)
        .result
        .unwrap_err();
    assert_eq!(err, VaultError::OwnerOnly);
    assert_eq!(err.code(), Some(109));
    assert_eq!(chain.vault().initialized_at(), None);

    let first = chain.submit(account("deployer"), VaultCall::Initialize);
    assert_eq!(
        first.result.unwrap(),
        Receipt::Initialized { height: first.height }
    );

    let again = chain.submit(account("deployer"), VaultCall::Initialize);
    assert_eq!(
        again.result.unwrap(),
        Receipt::Initialized { height: first.height }
    );
    assert_eq!(chain.vault().initialized_at(), Some(first.height));
}

#[test]
fn test_custody_account_cannot_call() {
    let mut chain = setup();
    chain.faucet(&account("vault"), amount(5000)).unwrap();
    deposit(&mut chain, "alice", 1500).unwrap();
    borrow(&mut chain, "alice", 1000, 500, 30).unwrap();

    let custody_before = snapshot(&chain, "vault");
    let alice_before = snapshot(&chain, "alice");

    let calls = [
        VaultCall::Deposit { amount: amount(100) },
        VaultCall::Withdraw { amount: amount(100) },
        VaultCall::Borrow {
            amount: amount(10),
            rate_bps: 500,
            term_days: 30,
        },
        VaultCall::Repay,
        // Liquidatable at this price, so only the caller check stops it
        VaultCall::Liquidate {
            borrower: account("alice"),
            price: 50,
        },
    ];

    for call in calls {
        let err = chain.submit(account("vault"), call).result.unwrap_err();
        assert_eq!(err, VaultError::CustodyCaller);
        assert_eq!(err.code(), Some(112));
    }

    assert_eq!(snapshot(&chain, "vault"), custody_before);
    assert_eq!(snapshot(&chain, "alice"), alice_before);
}
