//! # trip-settle
//!
//! Shared trip expense splitting and debt settlement.
//!
//! Given who paid for what on behalf of whom, this crate splits each expense
//! into exact per-person shares, nets them into one balance per participant,
//! and produces a short list of payments that clears every balance.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: participants, expenses, shares, balances
//! - **split** — Equal, percentage and custom-amount splitting with remainder distribution
//! - **settlement** — Balance computation and payment minimization (greedy and exact)
//! - **trip** — Roster-aware facade: date windows, per-person explanations, analytics
//! - **simulation** — Random trip generation for benchmarks and load testing

pub mod config;
pub mod core;
pub mod settlement;
pub mod simulation;
pub mod split;
pub mod trip;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::{EngineConfig, Strategy};
    pub use crate::core::balances::Balances;
    pub use crate::core::expense::{Expense, ExpenseId, SplitMode, SplitParams};
    pub use crate::core::participant::ParticipantId;
    pub use crate::core::share::{Share, Transaction};
    pub use crate::settlement::{Settlement, SettlementEngine, SettlementError, SettlementReport};
    pub use crate::split::{SplitError, Splitter};
}
