//! Foundational value types shared by splitting and settlement.

pub mod balances;
pub mod expense;
pub mod participant;
pub mod share;
