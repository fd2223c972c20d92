// Dynamic self-custody accounts (e.g. STX)
// One account per sub-account of the unified balance response.

use super::{
    none_requested, with_custodial, AccountQuery, AccountSelector, AccountsRemote,
    CustodialSelectors, SwapAccount, SwapAccountKind,
};
use crate::coins::Coin;
use crate::remote::Remote;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubAccount {
    pub index: u32,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub balance: String,
}

pub type DynamicSelfCustodyState = BTreeMap<Coin, Remote<String, Vec<SubAccount>>>;

#[derive(Debug, Clone, Copy)]
pub struct DynamicSelfCustodySelectors<'a> {
    pub balances: &'a DynamicSelfCustodyState,
    pub custodial: CustodialSelectors<'a>,
}

impl<'a> DynamicSelfCustodySelectors<'a> {
    pub fn new(balances: &'a DynamicSelfCustodyState, custodial: CustodialSelectors<'a>) -> Self {
        DynamicSelfCustodySelectors { balances, custodial }
    }

    pub fn sub_accounts(&self, coin: &Coin) -> AccountsRemote {
        let Some(remote) = self.balances.get(coin) else {
            return Remote::NotAsked;
        };

        remote
            .as_ref()
            .map(|subs| {
                subs.iter()
                    .map(|sub| SwapAccount {
                        account_index: Some(sub.index),
                        address: sub.address.clone(),
                        archived: false,
                        balance: sub.balance.clone(),
                        base_coin: coin.clone(),
                        coin: coin.clone(),
                        label: sub
                            .label
                            .clone()
                            .unwrap_or_else(|| format!("{} Private Key Wallet", coin)),
                        kind: SwapAccountKind::Account,
                    })
                    .collect()
            })
            .map_err(|error| error.clone())
    }
}

impl AccountSelector for DynamicSelfCustodySelectors<'_> {
    fn get_accounts(&self, query: &AccountQuery) -> AccountsRemote {
        let own = if query.options.non_custodial_accounts {
            self.sub_accounts(&query.coin)
        } else {
            none_requested()
        };
        with_custodial(own, self.custodial.get_accounts(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{AccountOptions, CustodialState};
    use crate::interest::InterestState;

    #[test]
    fn test_sub_accounts_get_default_label() {
        let mut balances = BTreeMap::new();
        balances.insert(
            Coin::from("STX"),
            Remote::of(vec![SubAccount {
                index: 0,
                label: None,
                address: Some("SP2J".to_string()),
                balance: "990".to_string(),
            }]),
        );
        let custodial = CustodialState::default();
        let interest = InterestState::default();
        let selectors = DynamicSelfCustodySelectors::new(
            &balances,
            CustodialSelectors::new(&custodial, &interest),
        );

        let accounts = selectors
            .get_accounts(&AccountQuery {
                coin: "STX".into(),
                options: AccountOptions {
                    non_custodial_accounts: true,
                    ..Default::default()
                },
            })
            .unwrap_or_default();

        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].label, "STX Private Key Wallet");
        assert_eq!(accounts[0].address.as_deref(), Some("SP2J"));
    }

    #[test]
    fn test_failed_balance_is_failure() {
        let mut balances = BTreeMap::new();
        balances.insert(Coin::from("STX"), Remote::Failure("unified balance down".to_string()));
        let custodial = CustodialState::default();
        let interest = InterestState::default();
        let selectors = DynamicSelfCustodySelectors::new(
            &balances,
            CustodialSelectors::new(&custodial, &interest),
        );

        let remote = selectors.get_accounts(&AccountQuery {
            coin: "STX".into(),
            options: AccountOptions {
                non_custodial_accounts: true,
                ..Default::default()
            },
        });
        assert!(remote.is_failure());
    }
}
