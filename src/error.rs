use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("Unknown account type: {0}")]
    UnknownAccountType(String),
    #[error("Unknown order state: {0}")]
    UnknownOrderState(String),
    #[error("Invalid coin identifier: {0:?}")]
    InvalidCoin(String),
}
