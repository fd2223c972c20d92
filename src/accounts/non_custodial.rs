// 🔑 Non-custodial accounts - HD wallet accounts and imported addresses

use super::{
    none_requested, with_custodial, AccountQuery, AccountSelector, AccountsRemote,
    CustodialSelectors, SwapAccount, SwapAccountKind,
};
use crate::coins::Coin;
use crate::remote::Remote;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAccount {
    pub index: u32,
    pub label: String,
    #[serde(default)]
    pub archived: bool,
    /// Receive address (or xpub for UTXO coins)
    pub address: String,
    pub balance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedAddress {
    pub address: String,
    #[serde(default)]
    pub label: Option<String>,
    pub balance: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonCustodialCoinState {
    #[serde(default)]
    pub accounts: Remote<String, Vec<WalletAccount>>,

    #[serde(default)]
    pub imported_addresses: Remote<String, Vec<ImportedAddress>>,
}

pub type NonCustodialState = BTreeMap<Coin, NonCustodialCoinState>;

#[derive(Debug, Clone, Copy)]
pub struct NonCustodialSelectors<'a> {
    pub wallets: &'a NonCustodialState,
    pub custodial: CustodialSelectors<'a>,
}

impl<'a> NonCustodialSelectors<'a> {
    pub fn new(wallets: &'a NonCustodialState, custodial: CustodialSelectors<'a>) -> Self {
        NonCustodialSelectors { wallets, custodial }
    }

    /// Unarchived HD accounts for the coin; NotAsked if the coin was never loaded
    pub fn wallet_accounts(&self, coin: &Coin) -> AccountsRemote {
        let Some(state) = self.wallets.get(coin) else {
            return Remote::NotAsked;
        };

        state
            .accounts
            .as_ref()
            .map(|accounts| {
                accounts
                    .iter()
                    .filter(|acct| !acct.archived)
                    .map(|acct| SwapAccount {
                        account_index: Some(acct.index),
                        address: Some(acct.address.clone()),
                        archived: false,
                        balance: acct.balance.clone(),
                        base_coin: coin.clone(),
                        coin: coin.clone(),
                        label: acct.label.clone(),
                        kind: SwapAccountKind::Account,
                    })
                    .collect()
            })
            .map_err(|error| error.clone())
    }

    pub fn imported_accounts(&self, coin: &Coin) -> AccountsRemote {
        let Some(state) = self.wallets.get(coin) else {
            return Remote::NotAsked;
        };

        state
            .imported_addresses
            .as_ref()
            .map(|addresses| {
                addresses
                    .iter()
                    .map(|imported| SwapAccount {
                        account_index: None,
                        address: Some(imported.address.clone()),
                        archived: false,
                        balance: imported.balance.clone(),
                        base_coin: coin.clone(),
                        coin: coin.clone(),
                        label: imported
                            .label
                            .clone()
                            .unwrap_or_else(|| imported.address.clone()),
                        kind: SwapAccountKind::Account,
                    })
                    .collect()
            })
            .map_err(|error| error.clone())
    }
}

impl AccountSelector for NonCustodialSelectors<'_> {
    fn get_accounts(&self, query: &AccountQuery) -> AccountsRemote {
        let opts = &query.options;
        let accounts = if opts.non_custodial_accounts {
            self.wallet_accounts(&query.coin)
        } else {
            none_requested()
        };
        let imported = if opts.imported_addresses {
            self.imported_accounts(&query.coin)
        } else {
            none_requested()
        };

        let own = accounts.zip(imported).map(|(mut accounts, imported)| {
            accounts.extend(imported);
            accounts
        });
        with_custodial(own, self.custodial.get_accounts(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{AccountOptions, CustodialState};
    use crate::interest::InterestState;

    fn btc_wallet() -> NonCustodialState {
        let mut state = BTreeMap::new();
        state.insert(
            Coin::from("BTC"),
            NonCustodialCoinState {
                accounts: Remote::of(vec![
                    WalletAccount {
                        index: 0,
                        label: "Private Key Wallet".to_string(),
                        archived: false,
                        address: "xpub-0".to_string(),
                        balance: "1000".to_string(),
                    },
                    WalletAccount {
                        index: 1,
                        label: "Old Savings".to_string(),
                        archived: true,
                        address: "xpub-1".to_string(),
                        balance: "0".to_string(),
                    },
                ]),
                imported_addresses: Remote::of(vec![ImportedAddress {
                    address: "1Imported".to_string(),
                    label: None,
                    balance: "7".to_string(),
                }]),
            },
        );
        state
    }

    #[test]
    fn test_archived_accounts_are_skipped() {
        let wallets = btc_wallet();
        let custodial = CustodialState::default();
        let interest = InterestState::default();
        let selectors =
            NonCustodialSelectors::new(&wallets, CustodialSelectors::new(&custodial, &interest));

        let accounts = selectors
            .get_accounts(&AccountQuery {
                coin: "BTC".into(),
                options: AccountOptions {
                    non_custodial_accounts: true,
                    ..Default::default()
                },
            })
            .unwrap_or_default();

        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].account_index, Some(0));
        assert_eq!(accounts[0].base_coin, Coin::from("BTC"));
    }

    #[test]
    fn test_imported_addresses_use_address_as_label() {
        let wallets = btc_wallet();
        let custodial = CustodialState::default();
        let interest = InterestState::default();
        let selectors =
            NonCustodialSelectors::new(&wallets, CustodialSelectors::new(&custodial, &interest));

        let accounts = selectors
            .get_accounts(&AccountQuery {
                coin: "BTC".into(),
                options: AccountOptions {
                    non_custodial_accounts: true,
                    imported_addresses: true,
                    ..Default::default()
                },
            })
            .unwrap_or_default();

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[1].label, "1Imported");
        assert_eq!(accounts[1].account_index, None);
    }

    #[test]
    fn test_unloaded_coin_is_not_asked() {
        let wallets = btc_wallet();
        let custodial = CustodialState::default();
        let interest = InterestState::default();
        let selectors =
            NonCustodialSelectors::new(&wallets, CustodialSelectors::new(&custodial, &interest));

        let remote = selectors.get_accounts(&AccountQuery {
            coin: "BCH".into(),
            options: AccountOptions {
                non_custodial_accounts: true,
                ..Default::default()
            },
        });
        assert!(remote.is_not_asked());
    }

    #[test]
    fn test_custodial_failure_propagates() {
        let wallets = btc_wallet();
        let custodial = CustodialState {
            trading_balances: Remote::Failure("503".to_string()),
            ..Default::default()
        };
        let interest = InterestState::default();
        let selectors =
            NonCustodialSelectors::new(&wallets, CustodialSelectors::new(&custodial, &interest));

        let remote = selectors.get_accounts(&AccountQuery {
            coin: "BTC".into(),
            options: AccountOptions {
                non_custodial_accounts: true,
                trading_accounts: true,
                ..Default::default()
            },
        });
        assert_eq!(remote, Remote::Failure("503".to_string()));
    }
}
