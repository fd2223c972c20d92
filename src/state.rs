// 📦 Wallet state snapshot
//
// Read-only view of everything the selectors consume. Produced by whatever
// owns the fetches (or loaded from a JSON file / SQLite for the CLI and
// server). Every slice defaults to "nothing fetched yet".

use crate::accounts::{
    AccountTypes, CustodialSelectors, CustodialState, DynamicSelfCustodySelectors,
    DynamicSelfCustodyState, Erc20Selectors, Erc20State, NonCustodialSelectors,
    NonCustodialState,
};
use crate::coins::CoinRegistry;
use crate::interest::{InterestAction, InterestState};
use crate::selectors::{get_coin_accounts, CoinAccounts, CoinAccountsQuery};
use crate::settings::{SettingsState, StxSelfCustodyInputs};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletState {
    #[serde(default)]
    pub coins: CoinRegistry,

    #[serde(default)]
    pub non_custodial: NonCustodialState,

    #[serde(default)]
    pub erc20: Erc20State,

    #[serde(default)]
    pub dynamic_self_custody: DynamicSelfCustodyState,

    #[serde(default)]
    pub custodial: CustodialState,

    #[serde(default)]
    pub interest: InterestState,

    #[serde(default)]
    pub settings: SettingsState,
}

impl WalletState {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse wallet state JSON")
    }

    /// Load a snapshot from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read wallet state file: {:?}", path.as_ref()))?;

        let state = Self::from_json(&content)?;
        info!(
            path = %path.as_ref().display(),
            erc20 = state.coins.erc20_coins.len(),
            self_custody = state.coins.dynamic_self_custody_coins.len(),
            "loaded wallet state"
        );
        Ok(state)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize wallet state")
    }

    /// The four account-type modules, each borrowing only its own slice
    pub fn account_types(&self) -> AccountTypes<'_> {
        let custodial = CustodialSelectors::new(&self.custodial, &self.interest);
        AccountTypes {
            custodial,
            dynamic_self_custody: DynamicSelfCustodySelectors::new(
                &self.dynamic_self_custody,
                custodial,
            ),
            erc20: Erc20Selectors::new(&self.erc20, custodial),
            non_custodial: NonCustodialSelectors::new(&self.non_custodial, custodial),
        }
    }

    pub fn stx_self_custody_inputs(&self) -> StxSelfCustodyInputs<'_> {
        self.settings.stx_self_custody_inputs()
    }

    pub fn coin_accounts(&self, query: &CoinAccountsQuery) -> CoinAccounts {
        get_coin_accounts(&self.account_types(), &self.coins, query)
    }

    pub fn apply_interest(&mut self, action: InterestAction) {
        self.interest.reduce(action);
    }
}
