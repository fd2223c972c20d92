// ⚙️ Settings - Inputs to feature availability checks
//
// Each input is fetched on its own. When a fetch has not resolved, readers
// fall back to the defaults defined here.

use crate::remote::Remote;
use serde::{Deserialize, Serialize};

/// Remote feature flags (wallet options)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    #[serde(default)]
    pub stx_self_custody_enable_airdrop: bool,

    #[serde(default)]
    pub stx_self_custody_enable_all: bool,
}

/// Per-user invitations from account settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitations {
    #[serde(default)]
    pub stx_self_custody: bool,
}

impl Default for Invitations {
    /// Unresolved invitations keep the gate open
    fn default() -> Self {
        Invitations {
            stx_self_custody: true,
        }
    }
}

/// Wallet-level settings and remote-backed flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsState {
    /// Second password (double encryption) enabled on the wallet
    #[serde(default)]
    pub second_password_on: bool,

    #[serde(default)]
    pub feature_flags: Remote<String, FeatureFlags>,

    #[serde(default)]
    pub invitations: Remote<String, Invitations>,

    /// Profile carries the blockstack airdrop tag
    #[serde(default)]
    pub blockstack_tag: Remote<String, bool>,
}

/// Exactly the slice the STX self-custody gate reads
#[derive(Debug, Clone, Copy)]
pub struct StxSelfCustodyInputs<'a> {
    pub second_password_on: bool,
    pub feature_flags: &'a Remote<String, FeatureFlags>,
    pub invitations: &'a Remote<String, Invitations>,
    pub blockstack_tag: &'a Remote<String, bool>,
}

impl SettingsState {
    pub fn stx_self_custody_inputs(&self) -> StxSelfCustodyInputs<'_> {
        StxSelfCustodyInputs {
            second_password_on: self.second_password_on,
            feature_flags: &self.feature_flags,
            invitations: &self.invitations,
            blockstack_tag: &self.blockstack_tag,
        }
    }
}
