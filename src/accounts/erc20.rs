// 🪙 ERC20 token accounts
// Every token shares the wallet's ETH address; only the balance differs per token.

use super::{
    none_requested, with_custodial, AccountQuery, AccountSelector, AccountsRemote,
    CustodialSelectors, SwapAccount, SwapAccountKind,
};
use crate::coins::Coin;
use crate::remote::Remote;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const TOKEN_ACCOUNT_LABEL: &str = "Private Key Wallet";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc20State {
    /// Default ETH account address
    #[serde(default)]
    pub eth_address: Remote<String, String>,

    /// Token balance per coin, minor units
    #[serde(default)]
    pub token_balances: BTreeMap<Coin, Remote<String, String>>,
}

#[derive(Debug, Clone, Copy)]
pub struct Erc20Selectors<'a> {
    pub tokens: &'a Erc20State,
    pub custodial: CustodialSelectors<'a>,
}

impl<'a> Erc20Selectors<'a> {
    pub fn new(tokens: &'a Erc20State, custodial: CustodialSelectors<'a>) -> Self {
        Erc20Selectors { tokens, custodial }
    }

    pub fn token_accounts(&self, coin: &Coin) -> AccountsRemote {
        let balance = self
            .tokens
            .token_balances
            .get(coin)
            .cloned()
            .unwrap_or_default();

        self.tokens
            .eth_address
            .clone()
            .zip(balance)
            .map(|(address, balance)| {
                vec![SwapAccount {
                    account_index: Some(0),
                    address: Some(address),
                    archived: false,
                    balance,
                    base_coin: Coin::from("ETH"),
                    coin: coin.clone(),
                    label: TOKEN_ACCOUNT_LABEL.to_string(),
                    kind: SwapAccountKind::Account,
                }]
            })
    }
}

impl AccountSelector for Erc20Selectors<'_> {
    fn get_accounts(&self, query: &AccountQuery) -> AccountsRemote {
        let own = if query.options.non_custodial_accounts {
            self.token_accounts(&query.coin)
        } else {
            none_requested()
        };
        with_custodial(own, self.custodial.get_accounts(query))
    }
}
