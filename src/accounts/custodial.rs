// 🏦 Custodial accounts - balances held by the service
//
// Three families per coin, each opt-in through AccountOptions:
// trading balance, rewards (interest) balance, staking balance.

use super::{none_requested, AccountQuery, AccountSelector, AccountsRemote, SwapAccount, SwapAccountKind};
use crate::coins::Coin;
use crate::interest::InterestState;
use crate::remote::Remote;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodialBalance {
    pub available: String,
    #[serde(default)]
    pub pending: String,
    #[serde(default)]
    pub withdrawable: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingBalance {
    pub balance: String,
    #[serde(default)]
    pub bonding_deposits: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodialState {
    #[serde(default)]
    pub trading_balances: Remote<String, BTreeMap<Coin, CustodialBalance>>,

    #[serde(default)]
    pub staking_balances: Remote<String, BTreeMap<Coin, StakingBalance>>,
}

#[derive(Debug, Clone, Copy)]
pub struct CustodialSelectors<'a> {
    pub custodial: &'a CustodialState,
    pub interest: &'a InterestState,
}

impl<'a> CustodialSelectors<'a> {
    pub fn new(custodial: &'a CustodialState, interest: &'a InterestState) -> Self {
        CustodialSelectors { custodial, interest }
    }

    fn account(coin: &Coin, label: &str, balance: String, kind: SwapAccountKind) -> SwapAccount {
        SwapAccount {
            account_index: None,
            address: None,
            archived: false,
            balance,
            base_coin: coin.clone(),
            coin: coin.clone(),
            label: label.to_string(),
            kind,
        }
    }

    pub fn trading_accounts(&self, coin: &Coin) -> AccountsRemote {
        self.custodial
            .trading_balances
            .as_ref()
            .map(|balances| {
                balances
                    .get(coin)
                    .map(|b| Self::account(coin, "Trading Account", b.available.clone(), SwapAccountKind::Custodial))
                    .into_iter()
                    .collect()
            })
            .map_err(|error| error.clone())
    }

    pub fn interest_accounts(&self, coin: &Coin) -> AccountsRemote {
        self.interest.balance_for(coin).map(|balance| {
            balance
                .map(|b| Self::account(coin, "Rewards Account", b.balance, SwapAccountKind::Interest))
                .into_iter()
                .collect()
        })
    }

    pub fn staking_accounts(&self, coin: &Coin) -> AccountsRemote {
        self.custodial
            .staking_balances
            .as_ref()
            .map(|balances| {
                balances
                    .get(coin)
                    .map(|b| Self::account(coin, "Staking Account", b.balance.clone(), SwapAccountKind::Staking))
                    .into_iter()
                    .collect()
            })
            .map_err(|error| error.clone())
    }
}

impl AccountSelector for CustodialSelectors<'_> {
    fn get_accounts(&self, query: &AccountQuery) -> AccountsRemote {
        let opts = &query.options;
        let trading = if opts.trading_accounts {
            self.trading_accounts(&query.coin)
        } else {
            none_requested()
        };
        let interest = if opts.interest_accounts {
            self.interest_accounts(&query.coin)
        } else {
            none_requested()
        };
        let staking = if opts.staking_accounts {
            self.staking_accounts(&query.coin)
        } else {
            none_requested()
        };

        trading
            .zip(interest)
            .zip(staking)
            .map(|((mut accounts, interest), staking)| {
                accounts.extend(interest);
                accounts.extend(staking);
                accounts
            })
    }
}
