use crate::config::{EngineConfig, Strategy};
use crate::core::balances::Balances;
use crate::core::participant::ParticipantId;
use crate::core::share::{Share, Transaction};
use crate::settlement::exact::{settle_exact, MAX_EXACT_PARTICIPANTS};
use crate::settlement::greedy::settle_greedy;
use crate::settlement::groups::settlement_groups;
use crate::settlement::SettlementError;
use log::{info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Net balances together with the payments that clear them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    balances: Balances,
    transactions: Vec<Transaction>,
}

impl Settlement {
    pub fn balances(&self) -> &Balances {
        &self.balances
    }

    /// Payments in the order they were chosen.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Total amount moved by all payments.
    pub fn settled_total(&self) -> Decimal {
        self.transactions.iter().map(|t| t.amount).sum()
    }

    /// Clusters of participants that settle among themselves.
    pub fn groups(&self) -> Vec<Vec<ParticipantId>> {
        settlement_groups(&self.transactions)
    }

    /// Balances after every payment has been executed.
    pub fn residual_balances(&self) -> Balances {
        let mut after = self.balances.clone();
        for tx in &self.transactions {
            after.apply_transaction(tx);
        }
        after
    }

    /// Whether executing every payment leaves all balances within `tolerance`.
    pub fn clears_all(&self, tolerance: Decimal) -> bool {
        self.residual_balances().nonzero_count(tolerance) == 0
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Balances ===")?;
        for (participant, entry) in self.balances.iter() {
            let status = if entry.net > Decimal::ZERO {
                "is owed"
            } else if entry.net < Decimal::ZERO {
                "owes"
            } else {
                "settled"
            };
            writeln!(f, "  {:<15} {:>12}  [{}]", participant, entry.net, status)?;
        }
        writeln!(f, "\n=== Payments ({}) ===", self.transactions.len())?;
        if self.transactions.is_empty() {
            writeln!(f, "  Nothing to settle.")?;
        }
        for tx in &self.transactions {
            writeln!(f, "  {}", tx)?;
        }
        Ok(())
    }
}

/// The settlement engine.
///
/// Folds shares into net balances and turns the balances into as few
/// payments as the configured [`Strategy`] achieves. Every call is a pure
/// function of its input: nothing is remembered between calls.
///
/// # Examples
///
/// ```
/// use trip_settle::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let balances = Balances::from_nets([
///     (ParticipantId::new("A"), dec!(50)),
///     (ParticipantId::new("B"), dec!(-20)),
///     (ParticipantId::new("C"), dec!(-30)),
/// ]);
/// let txs = SettlementEngine::default().minimize_transactions(&balances).unwrap();
///
/// assert_eq!(txs.len(), 2);
/// assert_eq!(txs[0].from, ParticipantId::new("C"));
/// assert_eq!(txs[0].amount, dec!(30));
/// ```
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    strategy: Strategy,
    tolerance: Decimal,
    exact_max_participants: usize,
}

impl Default for SettlementEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl SettlementEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            strategy: config.strategy,
            tolerance: config.balance_tolerance,
            exact_max_participants: config.exact_max_participants.min(MAX_EXACT_PARTICIPANTS),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Fold shares into per-participant balances: the payer of each share
    /// gains its amount and the beneficiary loses it.
    ///
    /// The result always sums to exactly zero.
    pub fn compute_balances(shares: &[Share]) -> Balances {
        let mut balances = Balances::new();
        for share in shares {
            balances.apply_share(share);
        }
        debug_assert!(balances.is_conserved(Decimal::ZERO));
        balances
    }

    /// Produce an ordered list of payments that brings every balance to zero.
    ///
    /// Fails if the balances do not sum to zero, or if any balance is left
    /// over once one side has been exhausted.
    pub fn minimize_transactions(
        &self,
        balances: &Balances,
    ) -> Result<Vec<Transaction>, SettlementError> {
        if !balances.is_conserved(self.tolerance) {
            return Err(SettlementError::Imbalanced {
                residual: balances.total(),
            });
        }

        let nets: Vec<(ParticipantId, Decimal)> =
            balances.nets().map(|(p, net)| (p.clone(), net)).collect();
        match self.strategy {
            Strategy::Greedy => settle_greedy(&nets, self.tolerance),
            Strategy::Exact => {
                let active = balances.nonzero_count(self.tolerance);
                if active > self.exact_max_participants {
                    warn!(
                        "{} non-zero balances exceed exact limit of {}; using greedy",
                        active, self.exact_max_participants
                    );
                    settle_greedy(&nets, self.tolerance)
                } else {
                    settle_exact(&nets, self.tolerance)
                }
            }
        }
    }

    /// Settle a set of shares: balances plus payments.
    pub fn settle(&self, shares: &[Share]) -> Result<Settlement, SettlementError> {
        self.settle_balances(Self::compute_balances(shares))
    }

    /// Settle precomputed balances.
    pub fn settle_balances(&self, balances: Balances) -> Result<Settlement, SettlementError> {
        let transactions = self.minimize_transactions(&balances)?;
        info!(
            "settled {} participants ({} non-zero) with {} payments [{}]",
            balances.len(),
            balances.nonzero_count(self.tolerance),
            transactions.len(),
            self.strategy
        );
        Ok(Settlement {
            balances,
            transactions,
        })
    }
}
