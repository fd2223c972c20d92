// 🧮 Selectors - Derived state for the UI layer
//
// Pure reads over an already-materialized state snapshot. Calling any of
// these twice with the same inputs yields the same output; none of them
// triggers a fetch.

use crate::accounts::{AccountDispatch, AccountOptions, AccountQuery, SwapAccount};
use crate::coins::{get_key, Coin, CoinRegistry};
use crate::messages::LocalizedMessage;
use crate::remote::Remote;
use crate::settings::{FeatureFlags, Invitations, StxSelfCustodyInputs};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub type CoinAccounts = BTreeMap<Coin, Vec<SwapAccount>>;

/// Request for [`get_coin_accounts`]: which coins, and which account families
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinAccountsQuery {
    #[serde(default)]
    pub coins: Option<Vec<Coin>>,

    #[serde(default)]
    pub options: AccountOptions,
}

impl CoinAccountsQuery {
    pub fn new(coins: Vec<Coin>, options: AccountOptions) -> Self {
        CoinAccountsQuery {
            coins: Some(coins),
            options,
        }
    }
}

// ============================================================================
// COIN ACCOUNTS (multi-source aggregation)
// ============================================================================

/// Resolve accounts for every requested coin, as one Remote.
///
/// Loading anywhere means Loading overall. Once nothing is loading, a coin
/// whose module failed (or never fetched) maps to an empty list.
pub fn get_coin_accounts_remote<D>(
    account_types: &D,
    registry: &CoinRegistry,
    query: &CoinAccountsQuery,
) -> Remote<String, CoinAccounts>
where
    D: AccountDispatch + ?Sized,
{
    let coins = match query.coins.as_deref() {
        Some(coins) if !coins.is_empty() => coins,
        _ => return Remote::of(BTreeMap::new()),
    };

    let mut per_coin: BTreeMap<Coin, Remote<String, Vec<SwapAccount>>> = BTreeMap::new();
    for coin in coins {
        let key = get_key(registry, coin);
        let remote = account_types.dispatch(key).get_accounts(&AccountQuery {
            coin: coin.clone(),
            options: query.options,
        });
        debug!(coin = %coin, key = %key, status = remote.status(), "resolved coin accounts");
        per_coin.insert(coin.clone(), remote);
    }

    if per_coin.values().any(Remote::is_loading) {
        debug!(coins = per_coin.len(), "coin accounts still loading");
        return Remote::Loading;
    }

    Remote::of(
        per_coin
            .into_iter()
            .map(|(coin, remote)| {
                if let Remote::Failure(error) = &remote {
                    warn!(coin = %coin, error = %error, "account fetch failed, showing no accounts");
                }
                (coin, remote.unwrap_or_default())
            })
            .collect(),
    )
}

/// Plain mapping for rendering; any unresolved aggregate becomes an empty map
pub fn get_coin_accounts<D>(
    account_types: &D,
    registry: &CoinRegistry,
    query: &CoinAccountsQuery,
) -> CoinAccounts
where
    D: AccountDispatch + ?Sized,
{
    get_coin_accounts_remote(account_types, registry, query).unwrap_or_default()
}

// ============================================================================
// STX SELF-CUSTODY AVAILABILITY
// ============================================================================

pub fn get_stx_self_custody_availability(inputs: &StxSelfCustodyInputs<'_>) -> bool {
    // Double encryption blocks the feature outright
    if inputs.second_password_on {
        return false;
    }

    let feature_flags = inputs.feature_flags.clone().unwrap_or(FeatureFlags {
        stx_self_custody_enable_airdrop: false,
        stx_self_custody_enable_all: false,
    });
    let tag = inputs.blockstack_tag.clone().unwrap_or(false);
    let invitations = inputs.invitations.clone().unwrap_or(Invitations {
        stx_self_custody: true,
    });

    if !invitations.stx_self_custody {
        return false;
    }
    if tag && feature_flags.stx_self_custody_enable_airdrop {
        return true;
    }
    feature_flags.stx_self_custody_enable_all
}

// ============================================================================
// INTRODUCTION TEXT
// ============================================================================

/// Copy shown at the top of a coin's transaction page
pub fn get_introduction_text(coin: &str) -> Option<LocalizedMessage> {
    let (id, default_message) = match coin {
        "ARS" => (
            "coins.ars.intro",
            "Store Argentine peso in your wallet and use it to Buy crypto.",
        ),
        "BCH" => (
            "coins.bch.intro",
            "Bitcoin Cash (BCH) is a fork of Bitcoin built for everyday transactions.",
        ),
        "BTC" => (
            "coins.btc.intro",
            "Bitcoin (BTC) is the original crypto and the internet’s premier digital currency.",
        ),
        "ETH" => (
            "coins.eth.intro",
            "Ethereum (ETH) is a currency and platform for execution of decentralized smart contracts.",
        ),
        "EUR" => (
            "coins.eur.intro",
            "Store Euros in your wallet and use it to Buy crypto.",
        ),
        "GBP" => (
            "coins.gbp.intro",
            "Store British pounds in your wallet and use it to Buy crypto.",
        ),
        "USD" => (
            "coins.usd.intro",
            "Store U.S. dollars in your wallet and use it to Buy crypto.",
        ),
        "XLM" => (
            "coins.xlm.intro",
            "Stellar (XLM) connects banks, payments and you to the Stellar Payment network.",
        ),
        _ => return None,
    };
    Some(LocalizedMessage::new(id, default_message))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{AccountSelector, AccountsRemote, SwapAccountKind};
    use crate::coins::AccountTypeKey;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Module stub answering from a fixed per-coin table and recording calls
    struct StubModule {
        key: AccountTypeKey,
        answers: HashMap<String, AccountsRemote>,
        calls: RefCell<Vec<(AccountTypeKey, Coin)>>,
    }

    impl AccountSelector for StubModule {
        fn get_accounts(&self, query: &AccountQuery) -> AccountsRemote {
            self.calls.borrow_mut().push((self.key, query.coin.clone()));
            self.answers
                .get(query.coin.as_str())
                .cloned()
                .unwrap_or(Remote::NotAsked)
        }
    }

    struct StubDispatch {
        modules: Vec<StubModule>,
    }

    impl StubDispatch {
        fn new(answers: Vec<(&str, AccountsRemote)>) -> Self {
            let table: HashMap<String, AccountsRemote> = answers
                .into_iter()
                .map(|(coin, remote)| (coin.to_string(), remote))
                .collect();
            let modules = [
                AccountTypeKey::Custodial,
                AccountTypeKey::Erc20,
                AccountTypeKey::DynamicSelfCustody,
                AccountTypeKey::NonCustodial,
            ]
            .into_iter()
            .map(|key| StubModule {
                key,
                answers: table.clone(),
                calls: RefCell::new(Vec::new()),
            })
            .collect();
            StubDispatch { modules }
        }

        fn calls(&self) -> Vec<(AccountTypeKey, Coin)> {
            self.modules
                .iter()
                .flat_map(|m| m.calls.borrow().clone())
                .collect()
        }
    }

    impl AccountDispatch for StubDispatch {
        fn dispatch(&self, key: AccountTypeKey) -> &dyn AccountSelector {
            self.modules
                .iter()
                .find(|m| m.key == key)
                .map(|m| m as &dyn AccountSelector)
                .unwrap()
        }
    }

    fn account(coin: &str) -> SwapAccount {
        SwapAccount {
            account_index: Some(0),
            address: None,
            archived: false,
            balance: "1".to_string(),
            base_coin: coin.into(),
            coin: coin.into(),
            label: format!("{} Wallet", coin),
            kind: SwapAccountKind::Account,
        }
    }

    fn registry() -> CoinRegistry {
        CoinRegistry::new(vec!["USDC".into()], vec!["STX".into()])
    }

    fn query(coins: &[&str]) -> CoinAccountsQuery {
        CoinAccountsQuery::new(
            coins.iter().map(|c| Coin::from(*c)).collect(),
            AccountOptions::default(),
        )
    }

    #[test]
    fn test_empty_or_missing_coins_short_circuit() {
        let dispatch = StubDispatch::new(vec![]);

        assert!(get_coin_accounts(&dispatch, &registry(), &query(&[])).is_empty());
        assert!(get_coin_accounts(&dispatch, &registry(), &CoinAccountsQuery::default()).is_empty());
        assert_eq!(
            get_coin_accounts_remote(&dispatch, &registry(), &CoinAccountsQuery::default()),
            Remote::of(BTreeMap::new())
        );
        assert!(dispatch.calls().is_empty());
    }

    #[test]
    fn test_dispatches_by_classification() {
        let dispatch = StubDispatch::new(vec![
            ("BTC", Remote::of(vec![account("BTC")])),
            ("USDC", Remote::of(vec![account("USDC")])),
            ("STX", Remote::of(vec![account("STX")])),
        ]);

        let result = get_coin_accounts(&dispatch, &registry(), &query(&["BTC", "USDC", "STX"]));
        assert_eq!(result.len(), 3);

        let mut calls = dispatch.calls();
        calls.sort_by(|a, b| a.1.cmp(&b.1));
        assert_eq!(
            calls,
            vec![
                (AccountTypeKey::NonCustodial, Coin::from("BTC")),
                (AccountTypeKey::DynamicSelfCustody, Coin::from("STX")),
                (AccountTypeKey::Erc20, Coin::from("USDC")),
            ]
        );
    }

    #[test]
    fn test_any_loading_coin_hides_everything() {
        let dispatch = StubDispatch::new(vec![
            ("BTC", Remote::of(vec![account("BTC")])),
            ("ETH", Remote::Loading),
        ]);

        let q = query(&["BTC", "ETH"]);
        assert!(get_coin_accounts_remote(&dispatch, &registry(), &q).is_loading());
        assert!(get_coin_accounts(&dispatch, &registry(), &q).is_empty());
    }

    #[test]
    fn test_failure_becomes_empty_list() {
        let dispatch = StubDispatch::new(vec![("BTC", Remote::Failure("timeout".to_string()))]);

        let result = get_coin_accounts(&dispatch, &registry(), &query(&["BTC"]));
        assert_eq!(result.get("BTC"), Some(&Vec::new()));
    }

    #[test]
    fn test_mixed_success_failure_not_asked() {
        let dispatch = StubDispatch::new(vec![
            ("BTC", Remote::of(vec![account("BTC")])),
            ("ETH", Remote::Failure("500".to_string())),
        ]);

        let result = get_coin_accounts(&dispatch, &registry(), &query(&["BTC", "ETH", "XLM"]));
        assert_eq!(result["BTC"], vec![account("BTC")]);
        assert!(result["ETH"].is_empty());
        assert!(result["XLM"].is_empty());
    }

    #[test]
    fn test_duplicate_coins_are_harmless() {
        let dispatch = StubDispatch::new(vec![("BTC", Remote::of(vec![account("BTC")]))]);

        let result = get_coin_accounts(&dispatch, &registry(), &query(&["BTC", "BTC"]));
        assert_eq!(result.len(), 1);
        assert_eq!(dispatch.calls().len(), 2);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let dispatch = StubDispatch::new(vec![
            ("BTC", Remote::of(vec![account("BTC")])),
            ("USDC", Remote::Failure("x".to_string())),
        ]);
        let q = query(&["BTC", "USDC"]);
        assert_eq!(
            get_coin_accounts(&dispatch, &registry(), &q),
            get_coin_accounts(&dispatch, &registry(), &q)
        );
    }

    // ------------------------------------------------------------------------
    // STX self-custody gate
    // ------------------------------------------------------------------------

    struct Gate {
        second_password_on: bool,
        feature_flags: Remote<String, FeatureFlags>,
        invitations: Remote<String, Invitations>,
        tag: Remote<String, bool>,
    }

    impl Gate {
        fn new(second_password_on: bool, invited: bool, tag: bool, airdrop: bool, all: bool) -> Self {
            Gate {
                second_password_on,
                feature_flags: Remote::of(FeatureFlags {
                    stx_self_custody_enable_airdrop: airdrop,
                    stx_self_custody_enable_all: all,
                }),
                invitations: Remote::of(Invitations {
                    stx_self_custody: invited,
                }),
                tag: Remote::of(tag),
            }
        }

        fn available(&self) -> bool {
            get_stx_self_custody_availability(&StxSelfCustodyInputs {
                second_password_on: self.second_password_on,
                feature_flags: &self.feature_flags,
                invitations: &self.invitations,
                blockstack_tag: &self.tag,
            })
        }
    }

    #[test]
    fn test_double_encryption_always_blocks() {
        for invited in [false, true] {
            for tag in [false, true] {
                for airdrop in [false, true] {
                    for all in [false, true] {
                        assert!(!Gate::new(true, invited, tag, airdrop, all).available());
                    }
                }
            }
        }
    }

    #[test]
    fn test_missing_invitation_blocks() {
        for tag in [false, true] {
            for airdrop in [false, true] {
                for all in [false, true] {
                    assert!(!Gate::new(false, false, tag, airdrop, all).available());
                }
            }
        }
    }

    #[test]
    fn test_airdrop_tag_enables_without_enable_all() {
        assert!(Gate::new(false, true, true, true, false).available());
    }

    #[test]
    fn test_untagged_follows_enable_all() {
        for airdrop in [false, true] {
            assert!(!Gate::new(false, true, false, airdrop, false).available());
            assert!(Gate::new(false, true, false, airdrop, true).available());
        }
    }

    #[test]
    fn test_unresolved_inputs_use_defaults() {
        let gate = Gate {
            second_password_on: false,
            feature_flags: Remote::Loading,
            invitations: Remote::NotAsked,
            tag: Remote::Failure("profile down".to_string()),
        };
        // invitation defaults open, flags default off
        assert!(!gate.available());

        let gate = Gate {
            feature_flags: Remote::of(FeatureFlags {
                stx_self_custody_enable_airdrop: false,
                stx_self_custody_enable_all: true,
            }),
            ..gate
        };
        assert!(gate.available());
    }

    // ------------------------------------------------------------------------
    // Introduction text
    // ------------------------------------------------------------------------

    #[test]
    fn test_introduction_text() {
        let btc = get_introduction_text("BTC").unwrap();
        assert_eq!(btc.id, "coins.btc.intro");
        assert!(btc.default_message.starts_with("Bitcoin (BTC)"));

        assert_eq!(get_introduction_text("EUR").unwrap().id, "coins.eur.intro");
        assert!(get_introduction_text("ZZZ").is_none());
        assert!(get_introduction_text("btc").is_none());
    }
}
