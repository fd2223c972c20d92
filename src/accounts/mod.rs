// Account-type modules
//
// Each module answers the same question for one family of coins:
// "which accounts does the user hold for this coin?" The answer is a Remote,
// because the balances behind it are fetched asynchronously elsewhere.
//
// Modules never trigger fetches. They read whatever is already in state.

pub mod custodial;
pub mod dynamic_self_custody;
pub mod erc20;
pub mod non_custodial;

pub use custodial::{CustodialBalance, CustodialSelectors, CustodialState, StakingBalance};
pub use dynamic_self_custody::{DynamicSelfCustodySelectors, DynamicSelfCustodyState, SubAccount};
pub use erc20::{Erc20Selectors, Erc20State};
pub use non_custodial::{
    ImportedAddress, NonCustodialCoinState, NonCustodialSelectors, NonCustodialState,
    WalletAccount,
};

use crate::coins::{AccountTypeKey, Coin};
use crate::remote::Remote;
use serde::{Deserialize, Serialize};

// ============================================================================
// ACCOUNT RECORD
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapAccountKind {
    /// Key held by the user
    Account,
    /// Trading balance held by the service
    Custodial,
    /// Rewards balance
    Interest,
    Staking,
}

/// One selectable account for a coin, as shown in swap/buy/sell pickers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapAccount {
    #[serde(default)]
    pub account_index: Option<u32>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub archived: bool,

    /// Minor units, decimal string
    pub balance: String,

    /// Chain the account lives on (ETH for tokens)
    pub base_coin: Coin,

    pub coin: Coin,

    pub label: String,

    #[serde(rename = "type")]
    pub kind: SwapAccountKind,
}

// ============================================================================
// QUERY
// ============================================================================

/// Which account families the caller wants back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountOptions {
    #[serde(default)]
    pub non_custodial_accounts: bool,

    #[serde(default)]
    pub imported_addresses: bool,

    #[serde(default)]
    pub trading_accounts: bool,

    #[serde(default)]
    pub interest_accounts: bool,

    #[serde(default)]
    pub staking_accounts: bool,
}

impl AccountOptions {
    pub fn wants_custodial(&self) -> bool {
        self.trading_accounts || self.interest_accounts || self.staking_accounts
    }
}

/// Options merged with the specific coin being resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountQuery {
    pub coin: Coin,
    pub options: AccountOptions,
}

pub type AccountsRemote = Remote<String, Vec<SwapAccount>>;

// ============================================================================
// SELECTOR CONTRACT + DISPATCH
// ============================================================================

/// Contract every account-type module implements. Must not mutate or fetch.
pub trait AccountSelector {
    fn get_accounts(&self, query: &AccountQuery) -> AccountsRemote;
}

/// Maps a classification key to the module responsible for it
pub trait AccountDispatch {
    fn dispatch(&self, key: AccountTypeKey) -> &dyn AccountSelector;
}

/// The four concrete modules, each borrowing its slice of state
pub struct AccountTypes<'a> {
    pub custodial: CustodialSelectors<'a>,
    pub dynamic_self_custody: DynamicSelfCustodySelectors<'a>,
    pub erc20: Erc20Selectors<'a>,
    pub non_custodial: NonCustodialSelectors<'a>,
}

impl AccountDispatch for AccountTypes<'_> {
    fn dispatch(&self, key: AccountTypeKey) -> &dyn AccountSelector {
        match key {
            AccountTypeKey::Custodial => &self.custodial,
            AccountTypeKey::DynamicSelfCustody => &self.dynamic_self_custody,
            AccountTypeKey::Erc20 => &self.erc20,
            AccountTypeKey::NonCustodial => &self.non_custodial,
        }
    }
}

/// Concatenate a module's own accounts with the custodial ones, all-or-nothing
pub(crate) fn with_custodial(own: AccountsRemote, custodial: AccountsRemote) -> AccountsRemote {
    own.zip(custodial).map(|(mut own, custodial)| {
        own.extend(custodial);
        own
    })
}

/// Resolved empty list, used when the caller did not ask for a family
pub(crate) fn none_requested() -> AccountsRemote {
    Remote::of(Vec::new())
}
