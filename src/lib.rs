// Wallet Selectors - Core Library
// Derived UI state for a crypto wallet: coin accounts across custodial and
// self-custody backends, feature gates, and static copy.

pub mod remote;
pub mod coins;
pub mod accounts;
pub mod selectors;
pub mod settings;
pub mod messages;
pub mod interest;       // Rewards fetch lifecycle
pub mod order_summary;  // Buy order success screen
pub mod state;
pub mod db;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use remote::Remote;
pub use coins::{
    Coin, CoinRegistry, AccountTypeKey,
    get_key, get_non_custodial_key, parse_coin_list,
};
pub use accounts::{
    AccountDispatch, AccountOptions, AccountQuery, AccountSelector, AccountTypes,
    SwapAccount, SwapAccountKind,
};
pub use selectors::{
    CoinAccounts, CoinAccountsQuery,
    get_coin_accounts, get_coin_accounts_remote,
    get_introduction_text, get_stx_self_custody_availability,
};
pub use settings::{FeatureFlags, Invitations, SettingsState, StxSelfCustodyInputs};
pub use messages::LocalizedMessage;
pub use interest::{InterestAction, InterestState};
pub use state::WalletState;
pub use db::{
    Event,
    setup_database, save_snapshot, load_latest_snapshot, snapshot_count,
    insert_event, get_events_for_entity, apply_interest_action,
};
pub use error::SelectorError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
