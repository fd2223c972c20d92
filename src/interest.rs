// 💰 Interest (rewards) accounts - fetch actions and reducer
//
// Every fetch group follows the same lifecycle:
//   FETCH_X            → trigger, handled by effects (no state change here)
//   FETCH_X_LOADING    → Remote::Loading
//   FETCH_X_SUCCESS    → Remote::Success(payload)
//   FETCH_X_FAILURE    → Remote::Failure(error)

use crate::coins::Coin;
use crate::remote::Remote;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

// ============================================================================
// PAYLOAD TYPES
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestBalance {
    /// Minor units, decimal string
    pub balance: String,
    #[serde(default)]
    pub pending_interest: String,
    #[serde(default)]
    pub total_interest: String,
    #[serde(default)]
    pub locked: String,
}

pub type InterestAccountBalance = BTreeMap<Coin, InterestBalance>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestEligibility {
    pub eligible: bool,
    #[serde(default)]
    pub ineligibility_reason: Option<String>,
}

pub type InterestEligible = BTreeMap<Coin, InterestEligibility>;

pub type InterestInstruments = Vec<Coin>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestLimit {
    pub currency: String,
    /// Seconds deposits stay locked
    pub lock_up_duration: u64,
    pub min_deposit_amount: String,
    pub max_withdrawal_amount: String,
}

pub type InterestLimits = BTreeMap<Coin, InterestLimit>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestPaymentAccount {
    pub address: String,
    #[serde(default)]
    pub partner_name: Option<String>,
}

// ============================================================================
// ACTIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterestAction {
    FetchInterestBalance,
    FetchInterestBalanceLoading,
    FetchInterestBalanceSuccess(InterestAccountBalance),
    FetchInterestBalanceFailure(String),

    FetchInterestEligible,
    FetchInterestEligibleLoading,
    FetchInterestEligibleSuccess(InterestEligible),
    FetchInterestEligibleFailure(String),

    FetchInterestInstruments,
    FetchInterestInstrumentsLoading,
    FetchInterestInstrumentsSuccess(InterestInstruments),
    FetchInterestInstrumentsFailure(String),

    FetchInterestLimits,
    FetchInterestLimitsLoading,
    FetchInterestLimitsSuccess(InterestLimits),
    FetchInterestLimitsFailure(String),

    FetchInterestPaymentAccount { crypto_currency: Coin },
    FetchInterestPaymentAccountLoading,
    FetchInterestPaymentAccountSuccess(InterestPaymentAccount),
    FetchInterestPaymentAccountFailure(String),

    InitializeInterest { coin: Coin },
}

impl InterestAction {
    pub fn action_type(&self) -> &'static str {
        use InterestAction::*;
        match self {
            FetchInterestBalance => "FETCH_INTEREST_BALANCE",
            FetchInterestBalanceLoading => "FETCH_INTEREST_BALANCE_LOADING",
            FetchInterestBalanceSuccess(_) => "FETCH_INTEREST_BALANCE_SUCCESS",
            FetchInterestBalanceFailure(_) => "FETCH_INTEREST_BALANCE_FAILURE",
            FetchInterestEligible => "FETCH_INTEREST_ELIGIBLE",
            FetchInterestEligibleLoading => "FETCH_INTEREST_ELIGIBLE_LOADING",
            FetchInterestEligibleSuccess(_) => "FETCH_INTEREST_ELIGIBLE_SUCCESS",
            FetchInterestEligibleFailure(_) => "FETCH_INTEREST_ELIGIBLE_FAILURE",
            FetchInterestInstruments => "FETCH_INTEREST_INSTRUMENTS",
            FetchInterestInstrumentsLoading => "FETCH_INTEREST_INSTRUMENTS_LOADING",
            FetchInterestInstrumentsSuccess(_) => "FETCH_INTEREST_INSTRUMENTS_SUCCESS",
            FetchInterestInstrumentsFailure(_) => "FETCH_INTEREST_INSTRUMENTS_FAILURE",
            FetchInterestLimits => "FETCH_INTEREST_LIMITS",
            FetchInterestLimitsLoading => "FETCH_INTEREST_LIMITS_LOADING",
            FetchInterestLimitsSuccess(_) => "FETCH_INTEREST_LIMITS_SUCCESS",
            FetchInterestLimitsFailure(_) => "FETCH_INTEREST_LIMITS_FAILURE",
            FetchInterestPaymentAccount { .. } => "FETCH_INTEREST_PAYMENT_ACCOUNT",
            FetchInterestPaymentAccountLoading => "FETCH_INTEREST_PAYMENT_ACCOUNT_LOADING",
            FetchInterestPaymentAccountSuccess(_) => "FETCH_INTEREST_PAYMENT_ACCOUNT_SUCCESS",
            FetchInterestPaymentAccountFailure(_) => "FETCH_INTEREST_PAYMENT_ACCOUNT_FAILURE",
            InitializeInterest { .. } => "INITIALIZE_INTEREST",
        }
    }

    /// Trigger actions start a fetch elsewhere and leave state alone
    pub fn is_trigger(&self) -> bool {
        use InterestAction::*;
        matches!(
            self,
            FetchInterestBalance
                | FetchInterestEligible
                | FetchInterestInstruments
                | FetchInterestLimits
                | FetchInterestPaymentAccount { .. }
        )
    }
}

// ============================================================================
// STATE + REDUCER
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestState {
    #[serde(default)]
    pub account_balance: Remote<String, InterestAccountBalance>,
    #[serde(default)]
    pub interest_eligible: Remote<String, InterestEligible>,
    #[serde(default)]
    pub instruments: Remote<String, InterestInstruments>,
    #[serde(default)]
    pub limits: Remote<String, InterestLimits>,
    #[serde(default)]
    pub payment_account: Remote<String, InterestPaymentAccount>,

    /// Coin selected by the last INITIALIZE_INTEREST
    #[serde(default)]
    pub coin: Option<Coin>,
}

impl InterestState {
    pub fn reduce(&mut self, action: InterestAction) {
        use InterestAction::*;
        debug!(action = action.action_type(), "reducing interest action");

        match action {
            FetchInterestBalanceLoading => self.account_balance = Remote::Loading,
            FetchInterestBalanceSuccess(balance) => self.account_balance = Remote::of(balance),
            FetchInterestBalanceFailure(error) => self.account_balance = Remote::Failure(error),

            FetchInterestEligibleLoading => self.interest_eligible = Remote::Loading,
            FetchInterestEligibleSuccess(eligible) => {
                self.interest_eligible = Remote::of(eligible)
            }
            FetchInterestEligibleFailure(error) => self.interest_eligible = Remote::Failure(error),

            FetchInterestInstrumentsLoading => self.instruments = Remote::Loading,
            FetchInterestInstrumentsSuccess(instruments) => {
                self.instruments = Remote::of(instruments)
            }
            FetchInterestInstrumentsFailure(error) => self.instruments = Remote::Failure(error),

            FetchInterestLimitsLoading => self.limits = Remote::Loading,
            FetchInterestLimitsSuccess(limits) => self.limits = Remote::of(limits),
            FetchInterestLimitsFailure(error) => self.limits = Remote::Failure(error),

            FetchInterestPaymentAccountLoading => self.payment_account = Remote::Loading,
            FetchInterestPaymentAccountSuccess(account) => {
                self.payment_account = Remote::of(account)
            }
            FetchInterestPaymentAccountFailure(error) => {
                self.payment_account = Remote::Failure(error)
            }

            InitializeInterest { coin } => self.coin = Some(coin),

            FetchInterestBalance
            | FetchInterestEligible
            | FetchInterestInstruments
            | FetchInterestLimits
            | FetchInterestPaymentAccount { .. } => {}
        }
    }

    /// Rewards balance for one coin; success with `None` when the coin has no rewards account
    pub fn balance_for(&self, coin: &Coin) -> Remote<String, Option<InterestBalance>> {
        self.account_balance
            .as_ref()
            .map(|balances| balances.get(coin).cloned())
            .map_err(|error| error.clone())
    }

    pub fn is_eligible(&self, coin: &Coin) -> bool {
        self.interest_eligible
            .as_ref()
            .map(|eligible| eligible.get(coin).map_or(false, |e| e.eligible))
            .unwrap_or(false)
    }
}

// ============================================================================
// TESTS
// ============================================================================
