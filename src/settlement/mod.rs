//! Reducing shares to net balances and a minimal list of payments.
//!
//! - **engine** — balance folding and strategy dispatch
//! - **greedy** — largest debtor against largest creditor
//! - **exact** — maximum zero-sum partition for small groups
//! - **pairwise** — naive per-pair netting, the baseline to beat
//! - **groups** — connected clusters of a settlement plan
//! - **report** — summary of a settlement against its baseline

pub mod engine;
pub mod exact;
pub mod greedy;
pub mod groups;
pub mod pairwise;
pub mod report;

pub use engine::{Settlement, SettlementEngine};
pub use groups::settlement_groups;
pub use pairwise::pairwise_transfers;
pub use report::SettlementReport;

use crate::core::participant::ParticipantId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Settlement invariant violations.
///
/// Shares folded by the engine always conserve money, so any of these
/// points at a defect upstream (a splitter bug or hand-built balances).
/// They are never corrected silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("balances sum to {residual} instead of zero")]
    Imbalanced { residual: Decimal },
    #[error("{participant} is left with unsettled balance {residual}")]
    ResidualBalance {
        participant: ParticipantId,
        residual: Decimal,
    },
}
