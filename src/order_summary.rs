// 🧾 Buy order summary - what the success screen shows and where buttons lead
//
// Derived from the order alone (plus the user's promo tag and the
// withdrawal lock period). No rendering here.

use crate::coins::Coin;
use crate::error::SelectorError;
use crate::messages::LocalizedMessage;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// ORDER MODEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    PendingConfirmation,
    PendingDeposit,
    DepositMatched,
    Finished,
    Cancelled,
    Failed,
    Expired,
}

impl FromStr for OrderState {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING_CONFIRMATION" => Ok(OrderState::PendingConfirmation),
            "PENDING_DEPOSIT" => Ok(OrderState::PendingDeposit),
            "DEPOSIT_MATCHED" => Ok(OrderState::DepositMatched),
            "FINISHED" => Ok(OrderState::Finished),
            "CANCELED" | "CANCELLED" => Ok(OrderState::Cancelled),
            "FAILED" => Ok(OrderState::Failed),
            "EXPIRED" => Ok(OrderState::Expired),
            other => Err(SelectorError::UnknownOrderState(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardAcquirer {
    Everypay,
    Stripe,
    Checkoutdotcom,
    FakeCardAcquirer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentState {
    #[serde(rename = "WAITING_FOR_3DS_RESPONSE")]
    WaitingFor3dsResponse,
    Settled,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardProvider {
    #[serde(default)]
    pub card_acquirer_name: Option<CardAcquirer>,
    #[serde(default)]
    pub payment_state: Option<PaymentState>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EverypayAttributes {
    #[serde(default)]
    pub payment_state: Option<PaymentState>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAttributes {
    #[serde(default)]
    pub card_provider: Option<CardProvider>,
    #[serde(default)]
    pub everypay: Option<EverypayAttributes>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyOrder {
    pub id: String,
    pub side: OrderSide,
    pub state: OrderState,
    pub input_currency: Coin,
    pub output_currency: Coin,
    /// Display amounts, already formatted
    pub input_quantity: String,
    pub output_quantity: String,
    #[serde(default)]
    pub payment_method_id: Option<String>,
    #[serde(default)]
    pub attributes: Option<OrderAttributes>,
}

impl BuyOrder {
    fn card_provider(&self) -> Option<&CardProvider> {
        self.attributes.as_ref()?.card_provider.as_ref()
    }

    fn everypay(&self) -> Option<&EverypayAttributes> {
        self.attributes.as_ref()?.everypay.as_ref()
    }
}

// ============================================================================
// STEPS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuySellStep {
    #[serde(rename = "3DS_HANDLER_EVERYPAY")]
    ThreeDsHandlerEverypay,
    #[serde(rename = "3DS_HANDLER_STRIPE")]
    ThreeDsHandlerStripe,
    #[serde(rename = "3DS_HANDLER_CHECKOUTDOTCOM")]
    ThreeDsHandlerCheckoutdotcom,
    #[serde(rename = "3DS_HANDLER_FAKE_CARD_ACQUIRER")]
    ThreeDsHandlerFakeCardAcquirer,
    #[serde(rename = "UPGRADE_TO_GOLD")]
    UpgradeToGold,
}

/// Where the OK button leads
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSummaryNext {
    ShowModal {
        modal: &'static str,
        origin: &'static str,
        step: &'static str,
    },
    SetStep {
        step: BuySellStep,
    },
}

// ============================================================================
// DERIVATIONS
// ============================================================================

/// Card payment is waiting on the 3-D Secure challenge
pub fn is_transaction_pending(order: &BuyOrder) -> bool {
    if order.state != OrderState::PendingDeposit {
        return false;
    }

    let waiting = Some(PaymentState::WaitingFor3dsResponse);
    order.card_provider().and_then(|cp| cp.payment_state) == waiting
        || order.everypay().and_then(|ep| ep.payment_state) == waiting
}

/// 3DS handler to resume the card payment with, if the acquirer has one
pub fn three_ds_handler_step(order: &BuyOrder) -> Option<BuySellStep> {
    // A named acquirer beats the bare presence of Everypay attributes
    match order.card_provider().and_then(|cp| cp.card_acquirer_name) {
        Some(CardAcquirer::Stripe) => Some(BuySellStep::ThreeDsHandlerStripe),
        Some(CardAcquirer::Checkoutdotcom) => Some(BuySellStep::ThreeDsHandlerCheckoutdotcom),
        Some(CardAcquirer::FakeCardAcquirer) => Some(BuySellStep::ThreeDsHandlerFakeCardAcquirer),
        Some(CardAcquirer::Everypay) => Some(BuySellStep::ThreeDsHandlerEverypay),
        None => order
            .everypay()
            .map(|_| BuySellStep::ThreeDsHandlerEverypay),
    }
}

pub fn can_cancel(order: &BuyOrder) -> bool {
    match order.state {
        OrderState::PendingConfirmation => true,
        OrderState::PendingDeposit => order.payment_method_id.is_none(),
        _ => false,
    }
}

pub fn next_after_ok(has_cowboys_tag: bool) -> OrderSummaryNext {
    if has_cowboys_tag {
        OrderSummaryNext::ShowModal {
            modal: "COWBOYS_PROMO",
            origin: "BuySellOrderSummary",
            step: "verifyId",
        }
    } else {
        OrderSummaryNext::SetStep {
            step: BuySellStep::UpgradeToGold,
        }
    }
}

pub fn base_amount(order: &BuyOrder) -> &str {
    match order.side {
        OrderSide::Buy => &order.output_quantity,
        OrderSide::Sell => &order.input_quantity,
    }
}

pub fn base_currency(order: &BuyOrder) -> &Coin {
    match order.side {
        OrderSide::Buy => &order.output_currency,
        OrderSide::Sell => &order.input_currency,
    }
}

// ============================================================================
// COPY
// ============================================================================

pub fn title(order: &BuyOrder) -> LocalizedMessage {
    if is_transaction_pending(order) {
        return LocalizedMessage::new("modals.simplebuy.summary.pending_buy", "Pending Buy");
    }
    LocalizedMessage::new(
        "modals.simplebuy.summary.purchased",
        "{amount} {coin} Purchased",
    )
    .with_value("amount", base_amount(order))
    .with_value("coin", base_currency(order))
}

pub fn subtitle(order: &BuyOrder) -> LocalizedMessage {
    if is_transaction_pending(order) {
        return LocalizedMessage::new(
            "modals.simplebuy.summary.pending_buy_description",
            "Once you finalize your credit card information, your buy order will complete.",
        );
    }
    LocalizedMessage::new(
        "modals.simplebuy.transferdetails.available1",
        "Your {coin} is now available in your Trading Account.",
    )
    .with_value("coin", base_currency(order))
}

/// Withdrawal lock notice; `None` while the payment is still pending
pub fn lock_disclaimer(order: &BuyOrder, lock_time: Duration) -> Option<LocalizedMessage> {
    if is_transaction_pending(order) {
        return None;
    }

    let days = lock_time.num_days();
    if days <= 1 {
        return Some(LocalizedMessage::new(
            "modals.simplebuy.summary.disclaimer",
            "You will not be able to Send or Withdraw these funds from your Wallet for the next 1 day.",
        ));
    }
    Some(
        LocalizedMessage::new(
            "modals.simplebuy.summary.disclaimer_plural",
            "You will not be able to Send or Withdraw these funds from your Wallet for the next {days} days.",
        )
        .with_value("days", days),
    )
}

// ============================================================================
// TESTS
// ============================================================================
