use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::info;

use wallet_selectors::logging::init_logging;
use wallet_selectors::{
    apply_interest_action, get_introduction_text, get_key, get_non_custodial_key,
    get_stx_self_custody_availability, load_latest_snapshot, parse_coin_list, save_snapshot,
    setup_database, snapshot_count, AccountOptions, Coin, CoinAccountsQuery, InterestAction,
    WalletState,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Derived wallet state: coin accounts, feature gates, copy")]
struct Cli {
    /// Default log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store a JSON wallet state snapshot in the database
    Import {
        snapshot: PathBuf,
        #[arg(long, default_value = "wallet.db")]
        db: PathBuf,
    },
    /// Resolve accounts for a list of coins
    Accounts {
        /// Comma-separated coin list, e.g. BTC,ETH,USDC
        #[arg(long, default_value = "")]
        coins: String,
        #[command(flatten)]
        families: Families,
        #[command(flatten)]
        source: Source,
    },
    /// Print the introduction copy for a coin
    Intro { coin: String },
    /// Whether STX self-custody is available
    StxAvailability {
        #[command(flatten)]
        source: Source,
    },
    /// Show which account-type module handles a coin
    Classify {
        coin: String,
        #[command(flatten)]
        source: Source,
    },
    /// Apply an interest action (JSON file) to the latest snapshot and store the result
    Dispatch {
        action: PathBuf,
        #[arg(long, default_value = "wallet.db")]
        db: PathBuf,
    },
}

#[derive(Args, Debug)]
struct Families {
    #[arg(long)]
    non_custodial: bool,
    #[arg(long)]
    imported: bool,
    #[arg(long)]
    trading: bool,
    #[arg(long)]
    interest: bool,
    #[arg(long)]
    staking: bool,
}

impl From<&Families> for AccountOptions {
    fn from(f: &Families) -> Self {
        AccountOptions {
            non_custodial_accounts: f.non_custodial,
            imported_addresses: f.imported,
            trading_accounts: f.trading,
            interest_accounts: f.interest,
            staking_accounts: f.staking,
        }
    }
}

#[derive(Args, Debug)]
struct Source {
    /// Read state from a JSON snapshot instead of the database
    #[arg(long, conflicts_with = "db")]
    state: Option<PathBuf>,
    #[arg(long, default_value = "wallet.db")]
    db: PathBuf,
}

impl Source {
    fn load(&self) -> Result<WalletState> {
        if let Some(path) = &self.state {
            return WalletState::from_file(path);
        }
        let conn = open_db(&self.db)?;
        load_latest_snapshot(&conn)?
            .with_context(|| format!("No snapshot stored in {:?}; run `import` first", self.db))
    }
}

fn open_db(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database: {:?}", path))?;
    setup_database(&conn)?;
    Ok(conn)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Command::Import { snapshot, db } => {
            let state = WalletState::from_file(&snapshot)?;
            let conn = open_db(&db)?;
            let id = save_snapshot(&conn, &state)?;
            info!(snapshot_id = id, total = snapshot_count(&conn)?, "import complete");
            print_json(&serde_json::json!({ "snapshot_id": id }))
        }
        Command::Accounts {
            coins,
            families,
            source,
        } => {
            let state = source.load()?;
            let query = CoinAccountsQuery::new(parse_coin_list(&coins)?, (&families).into());
            print_json(&state.coin_accounts(&query))
        }
        Command::Intro { coin } => match get_introduction_text(&coin) {
            Some(message) => print_json(&message),
            None => bail!("No introduction text for {}", coin),
        },
        Command::StxAvailability { source } => {
            let state = source.load()?;
            let available = get_stx_self_custody_availability(&state.stx_self_custody_inputs());
            print_json(&serde_json::json!({ "available": available }))
        }
        Command::Classify { coin, source } => {
            let state = source.load()?;
            let coin = Coin::parse(&coin)?;
            print_json(&serde_json::json!({
                "coin": coin,
                "key": get_key(&state.coins, &coin),
                "non_custodial_key": get_non_custodial_key(&state.coins, &coin),
            }))
        }
        Command::Dispatch { action, db } => {
            let raw = std::fs::read_to_string(&action)
                .with_context(|| format!("Failed to read action file: {:?}", action))?;
            let action: InterestAction =
                serde_json::from_str(&raw).context("Failed to parse interest action JSON")?;

            let conn = open_db(&db)?;
            let mut state = load_latest_snapshot(&conn)?.unwrap_or_default();
            let action_type = action.action_type();
            apply_interest_action(&conn, &mut state, action, "cli")?;
            let id = save_snapshot(&conn, &state)?;
            print_json(&serde_json::json!({ "applied": action_type, "snapshot_id": id }))
        }
    }
}
