//! CLI commands
//!
//! Amounts come in as display units and are converted to micro-units here.

use std::path::Path;

use bitflow_core::{AccountId, Amount};
use bitflow_events::{verify_chain, EventReader, JournalEntry};
use bitflow_vault::{Bank, Outcome, Price, Receipt, VaultCall};
use rust_decimal::Decimal;

use crate::context::AppContext;

fn account(id: &str) -> Result<AccountId, anyhow::Error> {
    Ok(AccountId::new(id)?)
}

fn micro(units: Decimal) -> Result<Amount, anyhow::Error> {
    Ok(Amount::from_units(units)?)
}

/// Receipt of a committed entry; a rejection becomes an error carrying its code
fn committed(entry: &JournalEntry) -> Result<&Receipt, anyhow::Error> {
    match &entry.outcome {
        Outcome::Committed { receipt } => Ok(receipt),
        Outcome::Rejected { code, error } => match code {
            Some(code) => anyhow::bail!(
                "Rejected at height {} (code {}): {}",
                entry.height,
                code,
                error
            ),
            None => anyhow::bail!("Rejected at height {}: {}", entry.height, error),
        },
    }
}

/// Initialize the vault as the configured owner
pub async fn init(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let owner = ctx.config().owner_id()?;
    let entry = ctx.submit(owner.clone(), VaultCall::Initialize).await?;

    if let Receipt::Initialized { height } = committed(&entry)? {
        println!("✅ Vault initialized by {} at height {}", owner, height);
    }
    Ok(())
}

/// Fund an account at the bank
pub async fn faucet(ctx: &AppContext, user: &str, amount: Decimal) -> Result<(), anyhow::Error> {
    let entry = ctx.faucet(account(user)?, micro(amount)?).await?;

    if let Receipt::Minted { balance } = committed(&entry)? {
        println!(
            "✅ Minted {} to {} (bank balance: {}, seq: {})",
            amount,
            user,
            balance.to_units(),
            entry.sequence
        );
    }
    Ok(())
}

pub async fn mine(ctx: &AppContext, blocks: u64) -> Result<(), anyhow::Error> {
    let entry = ctx.mine(blocks).await?;
    committed(&entry)?;
    println!("✅ Mined {} blocks (height: {})", blocks, entry.height);
    Ok(())
}

pub async fn deposit(ctx: &AppContext, user: &str, amount: Decimal) -> Result<(), anyhow::Error> {
    let call = VaultCall::Deposit {
        amount: micro(amount)?,
    };
    let entry = ctx.submit(account(user)?, call).await?;

    if let Receipt::Deposited { balance } = committed(&entry)? {
        println!(
            "✅ {} deposited {} (deposit: {}, height: {})",
            user,
            amount,
            balance.to_units(),
            entry.height
        );
    }
    Ok(())
}

pub async fn withdraw(ctx: &AppContext, user: &str, amount: Decimal) -> Result<(), anyhow::Error> {
    let call = VaultCall::Withdraw {
        amount: micro(amount)?,
    };
    let entry = ctx.submit(account(user)?, call).await?;

    if let Receipt::Withdrawn { balance } = committed(&entry)? {
        println!(
            "✅ {} withdrew {} (deposit: {}, height: {})",
            user,
            amount,
            balance.to_units(),
            entry.height
        );
    }
    Ok(())
}

pub async fn borrow(
    ctx: &AppContext,
    user: &str,
    amount: Decimal,
    rate_bps: u32,
    term_days: u32,
) -> Result<(), anyhow::Error> {
    let call = VaultCall::Borrow {
        amount: micro(amount)?,
        rate_bps,
        term_days,
    };
    let entry = ctx.submit(account(user)?, call).await?;

    if let Receipt::Borrowed { loan } = committed(&entry)? {
        println!(
            "✅ {} borrowed {} at {} bps (term ends at height {})",
            user,
            loan.principal.to_units(),
            loan.rate_bps,
            loan.term_end_height
        );
    }
    Ok(())
}

pub async fn repay(ctx: &AppContext, user: &str) -> Result<(), anyhow::Error> {
    let entry = ctx.submit(account(user)?, VaultCall::Repay).await?;

    if let Receipt::Repaid { repayment } = committed(&entry)? {
        println!(
            "✅ {} repaid {} (principal: {}, interest: {}, height: {})",
            user,
            repayment.total.to_units(),
            repayment.principal.to_units(),
            repayment.interest.to_units(),
            entry.height
        );
    }
    Ok(())
}

pub async fn liquidate(
    ctx: &AppContext,
    liquidator: &str,
    borrower: &str,
    price: Price,
) -> Result<(), anyhow::Error> {
    let call = VaultCall::Liquidate {
        borrower: account(borrower)?,
        price,
    };
    let entry = ctx.submit(account(liquidator)?, call).await?;

    if let Receipt::Liquidated { liquidation } = committed(&entry)? {
        println!(
            "✅ {} liquidated {}: paid {} (bonus {}), seized {}",
            liquidator,
            borrower,
            liquidation.paid.to_units(),
            liquidation.bonus.to_units(),
            liquidation.seized_collateral.to_units()
        );
    }
    Ok(())
}

// === Queries ===

pub async fn deposit_of(ctx: &AppContext, user: &str) -> Result<(), anyhow::Error> {
    let id = account(user)?;
    let chain = ctx.chain().await;

    println!("Deposit of {}: {}", user, chain.vault().deposit_of(&id).to_units());
    println!(
        "Bank balance of {}: {}",
        user,
        chain.vault().bank().balance_of(&id).to_units()
    );
    Ok(())
}

pub async fn loan(ctx: &AppContext, user: &str) -> Result<(), anyhow::Error> {
    let id = account(user)?;
    let chain = ctx.chain().await;

    match chain.vault().loan_of(&id) {
        Some(loan) => {
            println!("Loan of {}:", user);
            println!("  Principal:    {}", loan.principal.to_units());
            println!("  Rate:         {} bps", loan.rate_bps);
            println!("  Start height: {}", loan.start_height);
            println!("  Term end:     {}", loan.term_end_height);
            if loan.is_expired(chain.height()) {
                println!("  ⚠️  Term ended, interest keeps accruing");
            }
        }
        None => println!("No active loan for {}", user),
    }
    Ok(())
}

pub async fn health(ctx: &AppContext, user: &str, price: Price) -> Result<(), anyhow::Error> {
    let id = account(user)?;
    let chain = ctx.chain().await;

    match chain.vault().health_factor(&id, price)? {
        Some(health_factor) => {
            let liquidatable = chain.vault().is_liquidatable(&id, price)?;
            println!(
                "Health factor of {} at price {}: {}{}",
                user,
                price,
                health_factor,
                if liquidatable { " (liquidatable)" } else { "" }
            );
        }
        None => println!("No active loan for {}", user),
    }
    Ok(())
}

pub async fn position(ctx: &AppContext, user: &str, price: Price) -> Result<(), anyhow::Error> {
    let id = account(user)?;
    let chain = ctx.chain().await;
    let summary = chain.vault().position_summary(&id, price)?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

pub async fn repayment(ctx: &AppContext, user: &str) -> Result<(), anyhow::Error> {
    let id = account(user)?;
    let chain = ctx.chain().await;

    match chain.repayment_amount(&id)? {
        Some(owed) => println!(
            "{} owes {} at height {} (principal: {}, interest: {})",
            user,
            owed.total.to_units(),
            chain.height(),
            owed.principal.to_units(),
            owed.interest.to_units()
        ),
        None => println!("No active loan for {}", user),
    }
    Ok(())
}

pub async fn max_borrow(ctx: &AppContext, user: &str) -> Result<(), anyhow::Error> {
    let id = account(user)?;
    let chain = ctx.chain().await;

    println!(
        "Max borrow for {}: {}",
        user,
        chain.vault().max_borrow(&id)?.to_units()
    );
    Ok(())
}

pub async fn required_collateral(ctx: &AppContext, amount: Decimal) -> Result<(), anyhow::Error> {
    let chain = ctx.chain().await;
    let required = chain.vault().required_collateral(micro(amount)?)?;

    println!("Required collateral for {}: {}", amount, required.to_units());
    Ok(())
}

pub async fn activity(ctx: &AppContext, user: &str) -> Result<(), anyhow::Error> {
    let id = account(user)?;
    let chain = ctx.chain().await;

    println!(
        "{} blocks since last activity of {} (height: {})",
        chain.time_since_last_activity(&id),
        user,
        chain.height()
    );
    Ok(())
}

pub async fn stats(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let chain = ctx.chain().await;
    let stats = chain.vault().protocol_stats();

    println!("Protocol stats:");
    println!("  Total deposits:     {}", stats.total_deposits.to_units());
    println!("  Total repaid:       {}", stats.total_repaid.to_units());
    println!("  Total liquidations: {}", stats.total_liquidations);
    Ok(())
}

pub async fn metrics(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let chain = ctx.chain().await;
    let calls = chain.vault().protocol_metrics();

    println!("Successful calls:");
    println!("  Deposits:     {}", calls.deposits);
    println!("  Withdrawals:  {}", calls.withdrawals);
    println!("  Borrows:      {}", calls.borrows);
    println!("  Repayments:   {}", calls.repayments);
    println!("  Liquidations: {}", calls.liquidations);
    Ok(())
}

pub async fn volumes(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let chain = ctx.chain().await;
    let volumes = chain.vault().volume_metrics();

    println!("Volumes:");
    println!("  Deposit:     {}", volumes.deposit_volume.to_units());
    println!("  Borrow:      {}", volumes.borrow_volume.to_units());
    println!("  Repay:       {}", volumes.repay_volume.to_units());
    println!("  Liquidation: {}", volumes.liquidation_volume.to_units());
    Ok(())
}

pub async fn overview(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let chain = ctx.chain().await;
    let overview = chain.vault().market_overview()?;

    println!("Market overview at height {}:", chain.height());
    println!("  Total deposits:        {}", overview.total_deposits.to_units());
    println!("  Borrow volume:         {}", overview.borrow_volume.to_units());
    println!("  Active loans:          {}", overview.active_loans);
    println!(
        "  Outstanding principal: {}",
        overview.outstanding_principal.to_units()
    );
    Ok(())
}

// === Journal ===

/// Verify the journal hash chain.
///
/// Runs without rebuilding state, so a tampered journal can still be inspected.
pub fn audit(journal_path: &Path) -> Result<(), anyhow::Error> {
    let entries = EventReader::from_directory(journal_path)?.read_all()?;

    match verify_chain(&entries) {
        Ok(()) => println!("✅ Hash chain verified ({} entries)", entries.len()),
        Err(e) => anyhow::bail!("Hash chain broken: {}", e),
    }
    Ok(())
}

/// Report the state rebuilt from the journal at startup
pub async fn replay(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let chain = ctx.chain().await;
    println!(
        "✅ Replayed {} entries (height: {}, total deposits: {})",
        ctx.last_sequence().await,
        chain.height(),
        chain.vault().total_deposits().to_units()
    );
    Ok(())
}
