// 🪙 Coins - Identifiers and account-type classification
//
// A coin identifier is an opaque ticker ("BTC", "USDC", "STX", "EUR").
// Which account-type module answers for a coin is decided by two membership
// lists maintained elsewhere; the first list that contains the coin wins.

use crate::error::SelectorError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// COIN IDENTIFIER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coin(String);

impl Coin {
    /// Validate user-supplied input (CLI flags, query strings)
    pub fn parse(raw: &str) -> Result<Self, SelectorError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(SelectorError::InvalidCoin(raw.to_string()));
        }
        Ok(Coin(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Coin {
    fn from(ticker: &str) -> Self {
        Coin(ticker.to_string())
    }
}

impl Borrow<str> for Coin {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a comma-separated coin list ("BTC, ETH,USDC"), skipping empty entries
pub fn parse_coin_list(raw: &str) -> Result<Vec<Coin>, SelectorError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(Coin::parse)
        .collect()
}

// ============================================================================
// ACCOUNT TYPE KEY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountTypeKey {
    /// Keys held by the service (trading / rewards / staking balances)
    Custodial,

    /// Tokens handled by the shared token-account module
    Erc20,

    /// Self-custody coins enabled via flags and invitations
    DynamicSelfCustody,

    /// Keys held by the user; the default
    NonCustodial,
}

impl AccountTypeKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountTypeKey::Custodial => "CUSTODIAL",
            AccountTypeKey::Erc20 => "ERC20",
            AccountTypeKey::DynamicSelfCustody => "DYNAMIC_SELF_CUSTODY",
            AccountTypeKey::NonCustodial => "NON_CUSTODIAL",
        }
    }
}

impl fmt::Display for AccountTypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountTypeKey {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CUSTODIAL" => Ok(AccountTypeKey::Custodial),
            "ERC20" => Ok(AccountTypeKey::Erc20),
            "DYNAMIC_SELF_CUSTODY" => Ok(AccountTypeKey::DynamicSelfCustody),
            "NON_CUSTODIAL" => Ok(AccountTypeKey::NonCustodial),
            other => Err(SelectorError::UnknownAccountType(other.to_string())),
        }
    }
}

// ============================================================================
// COIN REGISTRY (membership lists)
// ============================================================================

/// The two externally maintained coin lists that drive classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinRegistry {
    #[serde(default)]
    pub erc20_coins: Vec<Coin>,

    #[serde(default)]
    pub dynamic_self_custody_coins: Vec<Coin>,
}

impl CoinRegistry {
    pub fn new(erc20_coins: Vec<Coin>, dynamic_self_custody_coins: Vec<Coin>) -> Self {
        CoinRegistry {
            erc20_coins,
            dynamic_self_custody_coins,
        }
    }

    pub fn is_erc20(&self, coin: &Coin) -> bool {
        self.erc20_coins.contains(coin)
    }

    pub fn is_dynamic_self_custody(&self, coin: &Coin) -> bool {
        self.dynamic_self_custody_coins.contains(coin)
    }
}

/// Classify a coin: ERC20 list first, then dynamic self-custody, else non-custodial
pub fn get_key(registry: &CoinRegistry, coin: &Coin) -> AccountTypeKey {
    if registry.is_erc20(coin) {
        return AccountTypeKey::Erc20;
    }
    if registry.is_dynamic_self_custody(coin) {
        return AccountTypeKey::DynamicSelfCustody;
    }
    AccountTypeKey::NonCustodial
}

/// Same as [`get_key`] for callers that do not separate self-custody sub-types
pub fn get_non_custodial_key(registry: &CoinRegistry, coin: &Coin) -> AccountTypeKey {
    if registry.is_erc20(coin) {
        return AccountTypeKey::Erc20;
    }
    AccountTypeKey::NonCustodial
}

// ============================================================================
// TESTS
// ============================================================================
