//! The full expense record of one trip, as handed over by the surrounding
//! application, and everything computed from it.
//!
//! Nothing here is stored between calls: settling a trip splits every
//! expense again from scratch.

pub mod analytics;
pub mod explain;
pub mod roster;

pub use analytics::{AnalyticsWarning, TripAnalytics};
pub use explain::{ShareExplanation, ShareLine};
pub use roster::Participant;

use crate::core::expense::{Expense, ExpenseId, SplitMode};
use crate::core::participant::ParticipantId;
use crate::core::share::Share;
use crate::settlement::{SettlementEngine, SettlementError, SettlementReport};
use crate::split::{SplitError, Splitter};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised while validating or settling a trip.
#[derive(Debug, Error)]
pub enum TripError {
    #[error("participant {0} is listed more than once")]
    DuplicateParticipant(ParticipantId),
    #[error("participant {participant} leaves ({end}) before joining ({start})")]
    InvalidWindow {
        participant: ParticipantId,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("participant {0} is not on the trip")]
    NotOnRoster(ParticipantId),
    #[error("expense {expense}: participant {participant} is not on the trip")]
    UnknownParticipant {
        expense: ExpenseId,
        participant: ParticipantId,
    },
    #[error("expense {expense}: {participant} is not on the trip on {date}")]
    Inactive {
        expense: ExpenseId,
        participant: ParticipantId,
        date: NaiveDate,
    },
    #[error("expense {expense}: {source}")]
    Split {
        expense: ExpenseId,
        #[source]
        source: SplitError,
    },
    #[error(transparent)]
    Settlement(#[from] SettlementError),
    #[error("failed to parse trip: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A trip's participants and expenses.
///
/// # Examples
///
/// ```
/// use trip_settle::prelude::*;
/// use trip_settle::trip::{Participant, Trip};
/// use rust_decimal_macros::dec;
///
/// let ids = ["A", "B", "C"].map(ParticipantId::new);
/// let trip = Trip::new(
///     ids.iter().cloned().map(Participant::new).collect(),
///     vec![Expense::equal(ids[0].clone(), dec!(90), ids.clone())],
/// )
/// .unwrap();
///
/// let report = trip.settle(&Splitter::default(), &SettlementEngine::default()).unwrap();
/// assert_eq!(report.settlement.balances().net(&ids[0]), dec!(60));
/// assert_eq!(report.settlement.transaction_count(), 2);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trip {
    #[serde(default)]
    participants: Vec<Participant>,
    #[serde(default)]
    expenses: Vec<Expense>,
}

impl Trip {
    /// Create a trip, checking the roster.
    pub fn new(participants: Vec<Participant>, expenses: Vec<Expense>) -> Result<Self, TripError> {
        let trip = Self {
            participants,
            expenses,
        };
        trip.validate_roster()?;
        Ok(trip)
    }

    /// Parse and check a trip from its JSON representation.
    ///
    /// Expenses without an id are numbered by position (`EXP001`, ...), so
    /// the same file always yields the same ids.
    pub fn from_json_str(content: &str) -> Result<Self, TripError> {
        let mut trip: Self = serde_json::from_str(content)?;
        trip.validate_roster()?;
        let mut taken = trip.expense_ids();
        for (i, expense) in trip.expenses.iter_mut().enumerate() {
            if expense.id().is_empty() {
                expense.assign_id(next_free_id(&mut taken, i + 1));
            }
        }
        Ok(trip)
    }

    fn expense_ids(&self) -> HashSet<ExpenseId> {
        self.expenses
            .iter()
            .map(|e| e.id().clone())
            .filter(|id| !id.is_empty())
            .collect()
    }

    fn validate_roster(&self) -> Result<(), TripError> {
        let mut seen = HashSet::new();
        for participant in &self.participants {
            if !seen.insert(&participant.id) {
                return Err(TripError::DuplicateParticipant(participant.id.clone()));
            }
            if let (Some(start), Some(end)) = (participant.start_date, participant.end_date) {
                if end < start {
                    return Err(TripError::InvalidWindow {
                        participant: participant.id.clone(),
                        start,
                        end,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    /// Record another expense. Nothing is recomputed until the next settle.
    pub fn add_expense(&mut self, mut expense: Expense) {
        if expense.id().is_empty() {
            let mut taken = self.expense_ids();
            expense.assign_id(next_free_id(&mut taken, self.expenses.len() + 1));
        }
        self.expenses.push(expense);
    }

    /// Replace the expense with the same id. Returns false when absent.
    pub fn replace_expense(&mut self, expense: Expense) -> bool {
        match self.expenses.iter_mut().find(|e| e.id() == expense.id()) {
            Some(slot) => {
                *slot = expense;
                true
            }
            None => false,
        }
    }

    /// Remove an expense by id.
    pub fn remove_expense(&mut self, id: &ExpenseId) -> Option<Expense> {
        let index = self.expenses.iter().position(|e| e.id() == id)?;
        Some(self.expenses.remove(index))
    }

    /// The expense as it applies on its date: equal splits drop beneficiaries
    /// who are not on the trip that day, weighted splits reject them.
    pub fn eligible_expense(&self, expense: &Expense) -> Result<Expense, TripError> {
        let unknown = |participant: &ParticipantId| TripError::UnknownParticipant {
            expense: expense.id().clone(),
            participant: participant.clone(),
        };
        if self.participant(expense.payer()).is_none() {
            return Err(unknown(expense.payer()));
        }

        let mut eligible = Vec::with_capacity(expense.beneficiaries().len());
        for id in expense.beneficiaries() {
            let participant = self.participant(id).ok_or_else(|| unknown(id))?;
            match expense.date() {
                Some(date) if !participant.is_active_on(date) => {
                    if !matches!(expense.split_mode(), SplitMode::Equal) {
                        return Err(TripError::Inactive {
                            expense: expense.id().clone(),
                            participant: id.clone(),
                            date,
                        });
                    }
                }
                _ => eligible.push(id.clone()),
            }
        }
        Ok(expense.restricted_to(eligible))
    }

    /// Split every expense into shares, in expense order.
    pub fn shares(&self, splitter: &Splitter) -> Result<Vec<Share>, TripError> {
        let mut shares = Vec::new();
        for expense in &self.expenses {
            let eligible = self.eligible_expense(expense)?;
            let split = splitter.split(&eligible).map_err(|source| TripError::Split {
                expense: expense.id().clone(),
                source,
            })?;
            shares.extend(split);
        }
        Ok(shares)
    }

    /// Recompute balances and payments from the full expense list.
    ///
    /// Every roster member appears in the balances, with zero if they
    /// neither paid nor benefited.
    pub fn settle(
        &self,
        splitter: &Splitter,
        engine: &SettlementEngine,
    ) -> Result<SettlementReport, TripError> {
        let shares = self.shares(splitter)?;
        let mut balances = SettlementEngine::compute_balances(&shares);
        for participant in &self.participants {
            balances.register(participant.id.clone());
        }
        let settlement = engine.settle_balances(balances)?;
        Ok(SettlementReport::new(&shares, settlement))
    }

    /// Spending totals across the trip.
    pub fn analytics(&self) -> TripAnalytics {
        TripAnalytics::from_expenses(&self.expenses)
    }
}

/// First sequential id at or after `position` that is not yet taken.
fn next_free_id(taken: &mut HashSet<ExpenseId>, position: usize) -> ExpenseId {
    let mut n = position;
    while taken.contains(&ExpenseId::sequential(n)) {
        n += 1;
    }
    let id = ExpenseId::sequential(n);
    taken.insert(id.clone());
    id
}
