//! Random trip generation.
//!
//! Produces well-formed trips of arbitrary size for benchmarks, property
//! tests and the `generate` CLI command.

use crate::core::expense::{Expense, SplitParams};
use crate::core::participant::ParticipantId;
use crate::trip::{Participant, Trip};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

const CATEGORIES: [&str; 5] = ["Food", "Hotel", "Transport", "Activities", "Shopping"];

/// Configuration for generating a random trip.
#[derive(Debug, Clone)]
pub struct TripConfig {
    pub participant_count: usize,
    pub expense_count: usize,
    /// Smallest expense, in minor units.
    pub min_minor_units: i64,
    /// Largest expense, in minor units.
    pub max_minor_units: i64,
    /// Fraction of expenses split by percentage or custom amounts.
    pub weighted_ratio: f64,
    /// Fixed seed for reproducible trips; random when `None`.
    pub seed: Option<u64>,
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            participant_count: 6,
            expense_count: 30,
            min_minor_units: 100,
            max_minor_units: 50_000,
            weighted_ratio: 0.25,
            seed: None,
        }
    }
}

/// Generate a random trip. Every expense splits cleanly.
pub fn generate_random_trip(config: &TripConfig) -> Trip {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let ids: Vec<ParticipantId> = (0..config.participant_count.max(1))
        .map(|i| ParticipantId::new(format!("P{:03}", i + 1)))
        .collect();
    let participants = ids.iter().cloned().map(Participant::new).collect();

    let min = config.min_minor_units.max(1);
    let max = config.max_minor_units.max(min);
    let expenses = (0..config.expense_count)
        .map(|n| {
            let payer = ids[rng.gen_range(0..ids.len())].clone();
            let cents = rng.gen_range(min..=max);
            let amount = Decimal::new(cents, 2);

            let count = rng.gen_range(1..=ids.len());
            let beneficiaries: Vec<ParticipantId> =
                ids.choose_multiple(&mut rng, count).cloned().collect();

            let expense = if rng.gen_bool(config.weighted_ratio.clamp(0.0, 1.0)) {
                let weights: Vec<i64> = beneficiaries.iter().map(|_| rng.gen_range(1..=10)).collect();
                if rng.gen_bool(0.5) {
                    let percents = apportion(100, &weights);
                    Expense::by_percentage(payer, amount, params(&beneficiaries, &percents, 0))
                } else {
                    let parts = apportion(cents, &weights);
                    Expense::custom(payer, amount, params(&beneficiaries, &parts, 2))
                }
            } else {
                Expense::equal(payer, amount, beneficiaries)
            };

            expense
                .with_id(format!("EXP{:04}", n + 1))
                .with_category(CATEGORIES[rng.gen_range(0..CATEGORIES.len())])
        })
        .collect();

    Trip::new(participants, expenses).unwrap_or_default()
}

/// Split `total` proportionally to `weights`; the last slot takes the rest.
fn apportion(total: i64, weights: &[i64]) -> Vec<i64> {
    let sum: i64 = weights.iter().sum();
    let mut parts: Vec<i64> = weights.iter().map(|w| total * w / sum.max(1)).collect();
    let assigned: i64 = parts.iter().sum();
    if let Some(last) = parts.last_mut() {
        *last += total - assigned;
    }
    parts
}

fn params(beneficiaries: &[ParticipantId], values: &[i64], scale: u32) -> SplitParams {
    SplitParams::new(
        beneficiaries
            .iter()
            .cloned()
            .zip(values.iter().map(|v| Decimal::new(*v, scale))),
    )
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::SettlementEngine;
    use crate::split::Splitter;

    #[test]
    fn test_generation_shape() {
        let config = TripConfig {
            participant_count: 5,
            expense_count: 12,
            seed: Some(7),
            ..Default::default()
        };
        let trip = generate_random_trip(&config);
        assert_eq!(trip.participants().len(), 5);
        assert_eq!(trip.expenses().len(), 12);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let config = TripConfig {
            seed: Some(42),
            ..Default::default()
        };
        let a = generate_random_trip(&config);
        let b = generate_random_trip(&config);
        assert_eq!(a.expenses(), b.expenses());
    }

    #[test]
    fn test_generated_trip_settles() {
        let config = TripConfig {
            participant_count: 12,
            expense_count: 80,
            weighted_ratio: 0.5,
            ..Default::default()
        };
        let trip = generate_random_trip(&config);
        let report = trip
            .settle(&Splitter::default(), &SettlementEngine::default())
            .unwrap();
        assert!(report.settlement.balances().is_conserved(rust_decimal::Decimal::ZERO));
        assert!(report.settlement.clears_all(rust_decimal_macros::dec!(0.005)));
    }

    #[test]
    fn test_apportion() {
        assert_eq!(apportion(100, &[1, 1, 1]), vec![33, 33, 34]);
        assert_eq!(apportion(10, &[3, 7]), vec![3, 7]);
    }
}
