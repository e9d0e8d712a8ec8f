use crate::core::expense::Expense;
use crate::core::participant::ParticipantId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Category used for expenses that carry none.
pub const UNCATEGORIZED: &str = "Other";

/// A single payer covering more than this percentage of the trip is flagged.
pub const PAYER_SHARE_LIMIT: Decimal = dec!(40);
/// A single category above this percentage of spending is flagged.
pub const CATEGORY_SHARE_LIMIT: Decimal = dec!(50);
/// A day spending more than this multiple of the daily average is flagged.
pub const SPIKE_FACTOR: Decimal = dec!(2);

/// Something unusual about how a trip's money was spent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalyticsWarning {
    /// One participant paid for a large part of the trip.
    PayerShare {
        payer: ParticipantId,
        amount: Decimal,
        percent: Decimal,
    },
    /// One category dominates spending.
    CategoryShare {
        category: String,
        amount: Decimal,
        percent: Decimal,
    },
    /// One day's spending is far above the daily average.
    SpendingSpike {
        date: NaiveDate,
        amount: Decimal,
        daily_average: Decimal,
    },
}

impl fmt::Display for AnalyticsWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyticsWarning::PayerShare {
                payer,
                amount,
                percent,
            } => write!(f, "{payer} paid {percent}% of total expenses ({amount})"),
            AnalyticsWarning::CategoryShare {
                category,
                amount,
                percent,
            } => write!(f, "'{category}' accounts for {percent}% of total spend ({amount})"),
            AnalyticsWarning::SpendingSpike {
                date,
                amount,
                daily_average,
            } => write!(
                f,
                "spending on {date} ({amount}) exceeds {SPIKE_FACTOR}x the daily average ({daily_average})"
            ),
        }
    }
}

/// Spending totals across a trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripAnalytics {
    pub expense_count: usize,
    pub total_spent: Decimal,
    pub by_category: BTreeMap<String, Decimal>,
    /// Only expenses with a date are counted here.
    pub by_day: BTreeMap<NaiveDate, Decimal>,
    pub by_payer: BTreeMap<ParticipantId, Decimal>,
    #[serde(default)]
    pub warnings: Vec<AnalyticsWarning>,
}

impl TripAnalytics {
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let mut analytics = Self::default();
        for expense in expenses {
            let amount = expense.amount();
            analytics.expense_count += 1;
            analytics.total_spent += amount;
            *analytics
                .by_category
                .entry(expense.category().unwrap_or(UNCATEGORIZED).to_string())
                .or_insert(Decimal::ZERO) += amount;
            if let Some(date) = expense.date() {
                *analytics.by_day.entry(date).or_insert(Decimal::ZERO) += amount;
            }
            *analytics
                .by_payer
                .entry(expense.payer().clone())
                .or_insert(Decimal::ZERO) += amount;
        }
        analytics.warnings = analytics.detect_warnings();
        analytics
    }

    /// Unusual spending patterns, payers first, then categories, then days.
    pub fn warnings(&self) -> &[AnalyticsWarning] {
        &self.warnings
    }

    fn detect_warnings(&self) -> Vec<AnalyticsWarning> {
        let mut warnings = Vec::new();
        if self.total_spent <= Decimal::ZERO {
            return warnings;
        }
        let percent_of_total =
            |amount: Decimal| (amount * Decimal::ONE_HUNDRED / self.total_spent).round_dp(2);

        for (payer, amount) in &self.by_payer {
            let percent = percent_of_total(*amount);
            if percent > PAYER_SHARE_LIMIT {
                warnings.push(AnalyticsWarning::PayerShare {
                    payer: payer.clone(),
                    amount: *amount,
                    percent,
                });
            }
        }
        for (category, amount) in &self.by_category {
            let percent = percent_of_total(*amount);
            if percent > CATEGORY_SHARE_LIMIT {
                warnings.push(AnalyticsWarning::CategoryShare {
                    category: category.clone(),
                    amount: *amount,
                    percent,
                });
            }
        }

        // A single day has no average to stand out from.
        if self.by_day.len() > 1 {
            let dated: Decimal = self.by_day.values().sum();
            let daily_average = (dated / Decimal::from(self.by_day.len())).round_dp(2);
            for (date, amount) in &self.by_day {
                if *amount > daily_average * SPIKE_FACTOR {
                    warnings.push(AnalyticsWarning::SpendingSpike {
                        date: *date,
                        amount: *amount,
                        daily_average,
                    });
                }
            }
        }
        warnings
    }

    /// Day with the most spending; the earliest such day on ties.
    pub fn busiest_day(&self) -> Option<(NaiveDate, Decimal)> {
        max_entry(&self.by_day)
    }

    /// Participant who paid the most; the first by id on ties.
    pub fn top_spender(&self) -> Option<(ParticipantId, Decimal)> {
        max_entry(&self.by_payer)
    }

    /// A category's share of total spending, in percent.
    pub fn category_percent(&self, category: &str) -> f64 {
        if self.total_spent == Decimal::ZERO {
            return 0.0;
        }
        let amount = self
            .by_category
            .get(category)
            .copied()
            .unwrap_or(Decimal::ZERO);
        let pct = amount * Decimal::ONE_HUNDRED / self.total_spent;
        pct.to_string().parse::<f64>().unwrap_or(0.0)
    }
}

fn max_entry<K: Clone>(map: &BTreeMap<K, Decimal>) -> Option<(K, Decimal)> {
    let mut best: Option<(&K, Decimal)> = None;
    for (key, amount) in map {
        if best.map_or(true, |(_, top)| *amount > top) {
            best = Some((key, *amount));
        }
    }
    best.map(|(k, v)| (k.clone(), v))
}

impl fmt::Display for TripAnalytics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Trip Analytics ===")?;
        writeln!(f, "Expenses:     {}", self.expense_count)?;
        writeln!(f, "Total spent:  {}", self.total_spent)?;

        writeln!(f, "\nBy category:")?;
        for (category, amount) in &self.by_category {
            writeln!(
                f,
                "  {:<15} {:>12}  ({:.1}%)",
                category,
                amount,
                self.category_percent(category)
            )?;
        }

        writeln!(f, "\nBy payer:")?;
        for (payer, amount) in &self.by_payer {
            writeln!(f, "  {:<15} {:>12}", payer, amount)?;
        }

        if let Some((day, amount)) = self.busiest_day() {
            writeln!(f, "\nBusiest day:  {} ({})", day, amount)?;
        }
        if let Some((payer, amount)) = self.top_spender() {
            writeln!(f, "Top spender:  {} ({})", payer, amount)?;
        }

        if !self.warnings.is_empty() {
            writeln!(f, "\nWarnings:")?;
            for warning in &self.warnings {
                writeln!(f, "  ! {}", warning)?;
            }
        }
        Ok(())
    }
}
