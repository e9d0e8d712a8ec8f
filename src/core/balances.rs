use crate::core::participant::ParticipantId;
use crate::core::share::{Share, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One participant's position across all shares of a trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    /// Sum of shares others owe this participant.
    pub paid_for_others: Decimal,
    /// Sum of shares this participant owes others.
    pub owed_to_others: Decimal,
    /// `paid_for_others - owed_to_others`, adjusted by executed transactions.
    pub net: Decimal,
}

/// Net balance of every participant.
///
/// A positive net means the participant is owed money (creditor).
/// A negative net means the participant owes money (debtor).
///
/// Entries are kept in participant order so that iteration, display and
/// settlement are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balances {
    entries: BTreeMap<ParticipantId, BalanceEntry>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build balances directly from net amounts, with no share history.
    pub fn from_nets(nets: impl IntoIterator<Item = (ParticipantId, Decimal)>) -> Self {
        let mut balances = Self::new();
        for (participant, net) in nets {
            balances.entries.entry(participant).or_default().net += net;
        }
        balances
    }

    /// Register a participant with a zero balance if not yet present.
    pub fn register(&mut self, participant: ParticipantId) {
        self.entries.entry(participant).or_default();
    }

    /// Fold a share in: the payer gains, the beneficiary loses.
    pub fn apply_share(&mut self, share: &Share) {
        let creditor = self.entries.entry(share.to().clone()).or_default();
        creditor.paid_for_others += share.amount();
        creditor.net += share.amount();

        let debtor = self.entries.entry(share.from().clone()).or_default();
        debtor.owed_to_others += share.amount();
        debtor.net -= share.amount();
    }

    /// Execute a settlement payment: the debtor's net moves up, the
    /// creditor's net moves down.
    pub fn apply_transaction(&mut self, transaction: &Transaction) {
        self.entries.entry(transaction.from.clone()).or_default().net += transaction.amount;
        self.entries.entry(transaction.to.clone()).or_default().net -= transaction.amount;
    }

    /// Net balance of a participant (zero when unknown).
    pub fn net(&self, participant: &ParticipantId) -> Decimal {
        self.entries
            .get(participant)
            .map(|e| e.net)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn entry(&self, participant: &ParticipantId) -> Option<&BalanceEntry> {
        self.entries.get(participant)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &BalanceEntry)> {
        self.entries.iter()
    }

    /// `(participant, net)` pairs in participant order.
    pub fn nets(&self) -> impl Iterator<Item = (&ParticipantId, Decimal)> {
        self.entries.iter().map(|(p, e)| (p, e.net))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all nets. Zero for any balances built from shares.
    pub fn total(&self) -> Decimal {
        self.entries.values().map(|e| e.net).sum()
    }

    /// Conservation check: nets sum to zero within `tolerance`.
    pub fn is_conserved(&self, tolerance: Decimal) -> bool {
        self.total().abs() <= tolerance
    }

    /// Number of participants whose net exceeds `tolerance` in magnitude.
    pub fn nonzero_count(&self, tolerance: Decimal) -> usize {
        self.entries
            .values()
            .filter(|e| e.net.abs() > tolerance)
            .count()
    }

    /// Total amount that actually needs to change hands (sum of positive nets).
    pub fn total_outstanding(&self) -> Decimal {
        self.entries
            .values()
            .map(|e| e.net)
            .filter(|net| *net > Decimal::ZERO)
            .sum()
    }
}

impl FromIterator<(ParticipantId, Decimal)> for Balances {
    fn from_iter<T: IntoIterator<Item = (ParticipantId, Decimal)>>(iter: T) -> Self {
        Self::from_nets(iter)
    }
}
