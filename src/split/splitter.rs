use crate::config::EngineConfig;
use crate::core::expense::{Expense, ExpenseId, SplitMode, SplitParams};
use crate::core::participant::ParticipantId;
use crate::core::share::Share;
use crate::split::remainder::{distribute, fits_scale, floor_to_scale};
use crate::split::{InvalidSplit, SplitError};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The part of an expense attributed to one beneficiary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portion {
    pub participant: ParticipantId,
    pub amount: Decimal,
}

/// Full apportionment of one expense over its beneficiaries, payer
/// included. Portions are in beneficiary order and add up exactly to the
/// expense amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub expense: ExpenseId,
    pub payer: ParticipantId,
    pub portions: Vec<Portion>,
}

impl Allocation {
    pub fn total(&self) -> Decimal {
        self.portions.iter().map(|p| p.amount).sum()
    }

    /// Portion of a participant (zero when not a beneficiary).
    pub fn portion(&self, participant: &ParticipantId) -> Decimal {
        self.portions
            .iter()
            .find(|p| &p.participant == participant)
            .map(|p| p.amount)
            .unwrap_or(Decimal::ZERO)
    }

    /// Shares owed to the payer. The payer's own portion and empty portions
    /// produce nothing.
    pub fn shares(&self) -> Vec<Share> {
        self.portions
            .iter()
            .filter(|p| p.participant != self.payer && p.amount > Decimal::ZERO)
            .map(|p| {
                Share::new(
                    self.expense.clone(),
                    p.participant.clone(),
                    self.payer.clone(),
                    p.amount,
                )
            })
            .collect()
    }
}

/// Splits expenses into shares.
///
/// Splitting is a pure function of the expense and the splitter's
/// settings: the same input always produces the same shares.
///
/// # Rounding
///
/// Portions are rounded down to the minor unit and the leftover units are
/// handed out one at a time: first to the beneficiaries other than the
/// payer, in their listed order, then to the payer.
///
/// # Examples
///
/// ```
/// use trip_settle::core::expense::Expense;
/// use trip_settle::core::participant::ParticipantId;
/// use trip_settle::split::Splitter;
/// use rust_decimal_macros::dec;
///
/// let expense = Expense::equal(
///     ParticipantId::new("A"),
///     dec!(100),
///     ["A", "B", "C"].map(ParticipantId::new),
/// );
/// let shares = Splitter::default().split(&expense).unwrap();
///
/// assert_eq!(shares.len(), 2);
/// assert_eq!(shares[0].amount(), dec!(33.34));
/// assert_eq!(shares[1].amount(), dec!(33.33));
/// ```
#[derive(Debug, Clone)]
pub struct Splitter {
    scale: u32,
    percentage_tolerance: Decimal,
    amount_tolerance: Decimal,
}

impl Default for Splitter {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl Splitter {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            scale: config.minor_unit_scale,
            percentage_tolerance: config.percentage_tolerance,
            amount_tolerance: config.amount_tolerance,
        }
    }

    fn unit(&self) -> Decimal {
        Decimal::new(1, self.scale)
    }

    /// Split an expense into the shares its beneficiaries owe the payer.
    pub fn split(&self, expense: &Expense) -> Result<Vec<Share>, SplitError> {
        let allocation = self.allocate(expense)?;
        let shares = allocation.shares();
        debug!(
            "split {} ({} {}) into {} shares",
            expense.id(),
            expense.split_mode().name(),
            expense.amount(),
            shares.len()
        );
        Ok(shares)
    }

    /// Apportion an expense over all its beneficiaries, payer included.
    pub fn allocate(&self, expense: &Expense) -> Result<Allocation, SplitError> {
        let amount = expense.amount();
        if amount <= Decimal::ZERO {
            return Err(SplitError::NonPositiveAmount(amount));
        }
        let beneficiaries = expense.beneficiaries();
        if beneficiaries.is_empty() {
            return Err(SplitError::EmptyBeneficiaries);
        }
        let mut seen = HashSet::new();
        for participant in beneficiaries {
            if !seen.insert(participant) {
                return Err(InvalidSplit::DuplicateBeneficiary(participant.clone()).into());
            }
        }
        self.check_precision(amount)?;

        let amounts = match expense.split_mode() {
            SplitMode::Equal => self.equal_portions(expense),
            SplitMode::Percentage(params) => self.percentage_portions(expense, params)?,
            SplitMode::Custom(params) => self.custom_portions(expense, params)?,
        };

        Ok(Allocation {
            expense: expense.id().clone(),
            payer: expense.payer().clone(),
            portions: beneficiaries
                .iter()
                .cloned()
                .zip(amounts)
                .map(|(participant, amount)| Portion {
                    participant,
                    amount,
                })
                .collect(),
        })
    }

    fn check_precision(&self, amount: Decimal) -> Result<(), InvalidSplit> {
        if fits_scale(amount, self.scale) {
            Ok(())
        } else {
            Err(InvalidSplit::ExcessPrecision {
                amount,
                scale: self.scale,
            })
        }
    }

    fn equal_portions(&self, expense: &Expense) -> Vec<Decimal> {
        let count = expense.beneficiaries().len();
        let per_head = floor_to_scale(expense.amount() / Decimal::from(count), self.scale);
        let mut portions = vec![per_head; count];
        let remainder = expense.amount() - per_head * Decimal::from(count);
        distribute(&mut portions, &remainder_order(expense), remainder, self.unit());
        portions
    }

    fn percentage_portions(
        &self,
        expense: &Expense,
        params: &SplitParams,
    ) -> Result<Vec<Decimal>, SplitError> {
        let percentages = ordered_params(expense, params)?;
        let total: Decimal = percentages.iter().sum();
        if (total - Decimal::ONE_HUNDRED).abs() > self.percentage_tolerance {
            return Err(InvalidSplit::PercentageTotal { total }.into());
        }

        let mut portions: Vec<Decimal> = percentages
            .iter()
            .map(|pct| floor_to_scale(expense.amount() * *pct / Decimal::ONE_HUNDRED, self.scale))
            .collect();
        let allocated: Decimal = portions.iter().sum();
        distribute(
            &mut portions,
            &remainder_order(expense),
            expense.amount() - allocated,
            self.unit(),
        );
        Ok(portions)
    }

    fn custom_portions(
        &self,
        expense: &Expense,
        params: &SplitParams,
    ) -> Result<Vec<Decimal>, SplitError> {
        let mut amounts = ordered_params(expense, params)?;
        for value in &amounts {
            self.check_precision(*value)?;
        }
        let total: Decimal = amounts.iter().sum();
        if (total - expense.amount()).abs() > self.amount_tolerance {
            return Err(InvalidSplit::CustomTotal {
                total,
                expected: expense.amount(),
            }
            .into());
        }
        // Within tolerance but not exact: settle the difference in whole units.
        distribute(
            &mut amounts,
            &remainder_order(expense),
            expense.amount() - total,
            self.unit(),
        );
        Ok(amounts)
    }
}

/// Parameter values in beneficiary order. Every beneficiary needs exactly
/// one entry and every entry needs a beneficiary.
fn ordered_params(expense: &Expense, params: &SplitParams) -> Result<Vec<Decimal>, InvalidSplit> {
    if let Some(stranger) = params
        .participants()
        .find(|p| !expense.beneficiaries().contains(p))
    {
        return Err(InvalidSplit::UnknownBeneficiary(stranger.clone()));
    }
    expense
        .beneficiaries()
        .iter()
        .map(|participant| {
            params
                .get(participant)
                .ok_or_else(|| InvalidSplit::MissingBeneficiary(participant.clone()))
        })
        .collect()
}

/// Slot order for leftover minor units: non-payers first, payer last.
fn remainder_order(expense: &Expense) -> Vec<usize> {
    let beneficiaries = expense.beneficiaries();
    let (payer, others): (Vec<usize>, Vec<usize>) =
        (0..beneficiaries.len()).partition(|&i| &beneficiaries[i] == expense.payer());
    others.into_iter().chain(payer).collect()
}
