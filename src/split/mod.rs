//! Turning one expense into per-participant obligations.

pub mod remainder;
pub mod splitter;

pub use splitter::{Allocation, Portion, Splitter};

use crate::core::participant::ParticipantId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while splitting an expense.
///
/// All of these are input validation errors: the expense must be corrected
/// before it can be split.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error("expense amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("expense has no beneficiaries")]
    EmptyBeneficiaries,
    #[error("invalid split: {0}")]
    InvalidSplit(#[from] InvalidSplit),
}

/// Why a split's parameters do not reconcile with its expense.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSplit {
    #[error("percentages sum to {total}, expected 100")]
    PercentageTotal { total: Decimal },
    #[error("custom amounts sum to {total}, expected {expected}")]
    CustomTotal { total: Decimal, expected: Decimal },
    #[error("{0} has a split parameter but is not a beneficiary")]
    UnknownBeneficiary(ParticipantId),
    #[error("beneficiary {0} has no split parameter")]
    MissingBeneficiary(ParticipantId),
    #[error("{0} is listed more than once")]
    DuplicateBeneficiary(ParticipantId),
    #[error("value for {participant} must not be negative, got {value}")]
    NegativeValue {
        participant: ParticipantId,
        value: Decimal,
    },
    #[error("{amount} has more than {scale} fractional digits")]
    ExcessPrecision { amount: Decimal, scale: u32 },
}
