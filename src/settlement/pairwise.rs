use crate::core::participant::ParticipantId;
use crate::core::share::{Share, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mutual shares between two participants, offset against each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairwiseNet {
    pub party_a: ParticipantId,
    pub party_b: ParticipantId,
    /// Gross amount A owes B.
    pub gross_a_to_b: Decimal,
    /// Gross amount B owes A.
    pub gross_b_to_a: Decimal,
}

impl PairwiseNet {
    /// Positive means A owes B net, negative means B owes A net.
    pub fn net_amount(&self) -> Decimal {
        self.gross_a_to_b - self.gross_b_to_a
    }

    /// The single transfer settling this pair, if any.
    pub fn transfer(&self) -> Option<Transaction> {
        let net = self.net_amount();
        if net > Decimal::ZERO {
            Some(Transaction::new(self.party_a.clone(), self.party_b.clone(), net))
        } else if net < Decimal::ZERO {
            Some(Transaction::new(self.party_b.clone(), self.party_a.clone(), -net))
        } else {
            None
        }
    }
}

/// Naive settlement: every pair of participants who share expenses nets
/// their mutual shares into at most one transfer.
///
/// This is what a group ends up doing without simplification, and is the
/// baseline the settlement engine is measured against. Transfers are
/// ordered by the (sorted) participant pair.
pub fn pairwise_transfers(shares: &[Share]) -> Vec<Transaction> {
    let mut pairs: BTreeMap<(&ParticipantId, &ParticipantId), PairwiseNet> = BTreeMap::new();
    for share in shares {
        let (a, b) = if share.from() < share.to() {
            (share.from(), share.to())
        } else {
            (share.to(), share.from())
        };
        let pair = pairs.entry((a, b)).or_insert_with(|| PairwiseNet {
            party_a: a.clone(),
            party_b: b.clone(),
            gross_a_to_b: Decimal::ZERO,
            gross_b_to_a: Decimal::ZERO,
        });
        if share.from() == a {
            pair.gross_a_to_b += share.amount();
        } else {
            pair.gross_b_to_a += share.amount();
        }
    }
    pairs.values().filter_map(PairwiseNet::transfer).collect()
}
