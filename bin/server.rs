// Wallet Selectors - Web Server
// REST API over a wallet state snapshot, for UI clients

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use clap::Parser;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use wallet_selectors::logging::init_logging;
use wallet_selectors::{
    get_introduction_text, get_key, get_non_custodial_key, get_stx_self_custody_availability,
    load_latest_snapshot, parse_coin_list, setup_database, AccountOptions, Coin,
    CoinAccountsQuery, WalletState,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "HTTP API for derived wallet state")]
struct Args {
    /// JSON snapshot to serve; falls back to the latest snapshot in --db
    #[arg(long)]
    state: Option<PathBuf>,

    #[arg(long, default_value = "wallet.db")]
    db: PathBuf,

    #[arg(long, default_value = "0.0.0.0:3000")]
    addr: String,

    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Shared application state (snapshot is read-only for the server's lifetime)
#[derive(Clone)]
struct AppState {
    wallet: Arc<WalletState>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(ApiResponse {
            success: false,
            data: (),
            error: Some(message),
        }),
    )
        .into_response()
}

/// Query string for /api/accounts
#[derive(Debug, Default, Deserialize)]
struct AccountsParams {
    #[serde(default)]
    coins: Option<String>,
    #[serde(default)]
    non_custodial: bool,
    #[serde(default)]
    imported: bool,
    #[serde(default)]
    trading: bool,
    #[serde(default)]
    interest: bool,
    #[serde(default)]
    staking: bool,
}

impl AccountsParams {
    fn options(&self) -> AccountOptions {
        AccountOptions {
            non_custodial_accounts: self.non_custodial,
            imported_addresses: self.imported,
            trading_accounts: self.trading,
            interest_accounts: self.interest,
            staking_accounts: self.staking,
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/accounts?coins=BTC,ETH&trading=true - Accounts per coin
async fn get_accounts(
    State(state): State<AppState>,
    Query(params): Query<AccountsParams>,
) -> Response {
    let coins = match params.coins.as_deref().map(parse_coin_list).transpose() {
        Ok(coins) => coins,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let query = CoinAccountsQuery {
        coins,
        options: params.options(),
    };
    Json(ApiResponse::ok(state.wallet.coin_accounts(&query))).into_response()
}

/// GET /api/coins/:coin/intro - Introduction copy
async fn get_intro(Path(coin): Path<String>) -> Response {
    match get_introduction_text(&coin) {
        Some(message) => Json(ApiResponse::ok(message)).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("No introduction text for {}", coin),
        ),
    }
}

/// GET /api/coins/:coin/key - Account-type classification
async fn get_coin_key(State(state): State<AppState>, Path(coin): Path<String>) -> Response {
    let coin = match Coin::parse(&coin) {
        Ok(coin) => coin,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };
    let registry = &state.wallet.coins;

    Json(ApiResponse::ok(serde_json::json!({
        "coin": coin,
        "key": get_key(registry, &coin),
        "non_custodial_key": get_non_custodial_key(registry, &coin),
    })))
    .into_response()
}

/// GET /api/features/stx-self-custody - STX self-custody gate
async fn get_stx_self_custody(State(state): State<AppState>) -> impl IntoResponse {
    let available = get_stx_self_custody_availability(&state.wallet.stx_self_custody_inputs());
    Json(ApiResponse::ok(serde_json::json!({ "available": available })))
}

// ============================================================================
// Main Server
// ============================================================================

fn load_wallet(args: &Args) -> Result<WalletState> {
    if let Some(path) = &args.state {
        return WalletState::from_file(path);
    }

    let conn = Connection::open(&args.db)
        .with_context(|| format!("Failed to open database: {:?}", args.db))?;
    setup_database(&conn)?;
    match load_latest_snapshot(&conn)? {
        Some(state) => Ok(state),
        None => {
            warn!(db = ?args.db, "no snapshot stored, serving empty wallet state");
            Ok(WalletState::default())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let wallet = load_wallet(&args)?;
    let state = AppState {
        wallet: Arc::new(wallet),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/accounts", get(get_accounts))
        .route("/coins/:coin/intro", get(get_intro))
        .route("/coins/:coin/key", get(get_coin_key))
        .route("/features/stx-self-custody", get(get_stx_self_custody))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&args.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", args.addr))?;

    info!(addr = %args.addr, "wallet server listening");

    axum::serve(listener, app)
        .await
        .context("Server terminated")?;

    Ok(())
}
