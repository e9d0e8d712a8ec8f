use crate::core::expense::ExpenseId;
use crate::core::participant::ParticipantId;
use crate::split::Splitter;
use crate::trip::{Trip, TripError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One expense a participant was charged for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLine {
    pub expense: ExpenseId,
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub payer: ParticipantId,
    /// Full amount of the expense.
    pub expense_amount: Decimal,
    /// Beneficiaries the expense was split over, after date eligibility.
    pub beneficiary_count: usize,
    /// This participant's portion.
    pub share: Decimal,
}

/// Why a participant's balance is what it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareExplanation {
    pub participant: ParticipantId,
    pub lines: Vec<ShareLine>,
    /// Sum of expenses this participant paid.
    pub total_paid: Decimal,
    /// Sum of this participant's portions, own expenses included.
    pub total_share: Decimal,
}

impl ShareExplanation {
    /// Positive: owed money. Negative: owes money.
    pub fn net(&self) -> Decimal {
        self.total_paid - self.total_share
    }
}

impl fmt::Display for ShareExplanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.participant)?;
        for line in &self.lines {
            let date = line.date.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
            writeln!(
                f,
                "  {:<10} {:<12} {:<10} paid by {:<10} {:>10} / {} = {:>10}",
                line.expense,
                date,
                line.category.as_deref().unwrap_or("-"),
                line.payer,
                line.expense_amount,
                line.beneficiary_count,
                line.share
            )?;
        }
        writeln!(f, "Total paid:  {}", self.total_paid)?;
        writeln!(f, "Total share: {}", self.total_share)?;
        writeln!(f, "Net:         {}", self.net())
    }
}

impl Trip {
    /// Break down a participant's total share expense by expense.
    pub fn explain(
        &self,
        participant: &ParticipantId,
        splitter: &Splitter,
    ) -> Result<ShareExplanation, TripError> {
        if self.participant(participant).is_none() {
            return Err(TripError::NotOnRoster(participant.clone()));
        }

        let mut lines = Vec::new();
        let mut total_paid = Decimal::ZERO;
        for expense in self.expenses() {
            if expense.payer() == participant {
                total_paid += expense.amount();
            }
            let eligible = self.eligible_expense(expense)?;
            let allocation = splitter.allocate(&eligible).map_err(|source| TripError::Split {
                expense: expense.id().clone(),
                source,
            })?;
            if !eligible.beneficiaries().contains(participant) {
                continue;
            }
            lines.push(ShareLine {
                expense: expense.id().clone(),
                date: expense.date(),
                category: expense.category().map(str::to_owned),
                description: expense.description().map(str::to_owned),
                payer: expense.payer().clone(),
                expense_amount: expense.amount(),
                beneficiary_count: eligible.beneficiaries().len(),
                share: allocation.portion(participant),
            });
        }

        let total_share = lines.iter().map(|l| l.share).sum();
        Ok(ShareExplanation {
            participant: participant.clone(),
            lines,
            total_paid,
            total_share,
        })
    }
}
