//! Bitflow CLI - Main entry point

use std::path::PathBuf;

use bitflow_rpc::{commands, AppContext, RpcConfig};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bitflow")]
#[command(about = "Bitflow - Collateralized lending vault", long_about = None)]
struct Cli {
    /// Data directory path
    #[arg(short, long, default_value = "./data")]
    data: PathBuf,

    /// JSON config file (owner, custody, journal directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the vault as the configured owner
    Init,

    /// Mint base asset to an account at the bank
    Faucet {
        /// Account ID
        user: String,
        /// Amount in display units
        amount: Decimal,
    },

    /// Mine empty blocks
    Mine {
        #[arg(default_value = "1")]
        blocks: u64,
    },

    /// Deposit collateral
    Deposit {
        /// Account ID
        user: String,
        /// Amount in display units
        amount: Decimal,
    },

    /// Withdraw collateral
    Withdraw {
        /// Account ID
        user: String,
        /// Amount in display units
        amount: Decimal,
    },

    /// Open a loan against deposited collateral
    Borrow {
        /// Account ID
        user: String,
        /// Amount in display units
        amount: Decimal,
        /// Interest rate in basis points (1-10000)
        #[arg(long)]
        rate: u32,
        /// Term in days (1-365)
        #[arg(long)]
        term: u32,
    },

    /// Repay the active loan with accrued interest
    Repay {
        /// Account ID
        user: String,
    },

    /// Liquidate an unhealthy loan
    Liquidate {
        /// Liquidator account ID
        liquidator: String,
        /// Borrower account ID
        borrower: String,
        /// Collateral price (100 = par)
        #[arg(long)]
        price: u128,
    },

    /// Show deposit and bank balance
    DepositOf { user: String },

    /// Show the active loan
    Loan { user: String },

    /// Show health factor at a price
    Health {
        user: String,
        #[arg(long, default_value = "100")]
        price: u128,
    },

    /// Show full position summary at a price
    Position {
        user: String,
        #[arg(long, default_value = "100")]
        price: u128,
    },

    /// Show what repaying would cost at the current height
    Repayment { user: String },

    /// Show maximum borrowable amount
    MaxBorrow { user: String },

    /// Show collateral required for a loan amount
    RequiredCollateral { amount: Decimal },

    /// Show blocks since last activity
    Activity { user: String },

    /// Show protocol stats
    Stats,

    /// Show successful call counters
    Metrics,

    /// Show cumulative volumes
    Volumes,

    /// Show market overview
    Overview,

    /// Audit the journal (verify hash chain)
    Audit,

    /// Rebuild state from the journal and report it
    Replay,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = RpcConfig::load(cli.config.as_deref())?;

    // Audit must work on a journal that no longer replays
    let ctx = match cli.command {
        Commands::Audit => return commands::audit(&cli.data.join(&config.journal_dir)),
        _ => AppContext::new(&cli.data, config).await?,
    };

    match cli.command {
        Commands::Init => commands::init(&ctx).await?,
        Commands::Faucet { user, amount } => commands::faucet(&ctx, &user, amount).await?,
        Commands::Mine { blocks } => commands::mine(&ctx, blocks).await?,
        Commands::Deposit { user, amount } => commands::deposit(&ctx, &user, amount).await?,
        Commands::Withdraw { user, amount } => commands::withdraw(&ctx, &user, amount).await?,
        Commands::Borrow {
            user,
            amount,
            rate,
            term,
        } => commands::borrow(&ctx, &user, amount, rate, term).await?,
        Commands::Repay { user } => commands::repay(&ctx, &user).await?,
        Commands::Liquidate {
            liquidator,
            borrower,
            price,
        } => commands::liquidate(&ctx, &liquidator, &borrower, price).await?,
        Commands::DepositOf { user } => commands::deposit_of(&ctx, &user).await?,
        Commands::Loan { user } => commands::loan(&ctx, &user).await?,
        Commands::Health { user, price } => commands::health(&ctx, &user, price).await?,
        Commands::Position { user, price } => commands::position(&ctx, &user, price).await?,
        Commands::Repayment { user } => commands::repayment(&ctx, &user).await?,
        Commands::MaxBorrow { user } => commands::max_borrow(&ctx, &user).await?,
        Commands::RequiredCollateral { amount } => {
            commands::required_collateral(&ctx, amount).await?
        }
        Commands::Activity { user } => commands::activity(&ctx, &user).await?,
        Commands::Stats => commands::stats(&ctx).await?,
        Commands::Metrics => commands::metrics(&ctx).await?,
        Commands::Volumes => commands::volumes(&ctx).await?,
        Commands::Overview => commands::overview(&ctx).await?,
        Commands::Audit => {}
        Commands::Replay => commands::replay(&ctx).await?,
    }

    Ok(())
}
