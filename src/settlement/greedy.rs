use crate::core::participant::ParticipantId;
use crate::core::share::Transaction;
use crate::settlement::SettlementError;
use log::debug;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// An unsettled debt or credit, ordered largest first and then by
/// ascending participant id.
#[derive(Debug, PartialEq, Eq)]
struct Outstanding {
    amount: Decimal,
    participant: ParticipantId,
}

impl Ord for Outstanding {
    fn cmp(&self, other: &Self) -> Ordering {
        self.amount
            .cmp(&other.amount)
            .then_with(|| other.participant.cmp(&self.participant))
    }
}

impl PartialOrd for Outstanding {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Settle net balances by repeatedly matching the largest debtor with the
/// largest creditor.
///
/// Every transfer clears at least one side, so `n` non-zero balances take
/// at most `n - 1` transfers. The result is often, but not always, the
/// true minimum; see [`crate::settlement::exact`] for that.
///
/// Balances within `tolerance` of zero are treated as settled. If one side
/// runs dry while the other still holds more than `tolerance`, the input
/// was not conserved and the leftover is reported.
pub fn settle_greedy(
    nets: &[(ParticipantId, Decimal)],
    tolerance: Decimal,
) -> Result<Vec<Transaction>, SettlementError> {
    let mut debtors = BinaryHeap::new();
    let mut creditors = BinaryHeap::new();
    for (participant, net) in nets {
        if *net > tolerance {
            creditors.push(Outstanding {
                amount: *net,
                participant: participant.clone(),
            });
        } else if *net < -tolerance {
            debtors.push(Outstanding {
                amount: -*net,
                participant: participant.clone(),
            });
        }
    }

    let mut transactions = Vec::with_capacity(debtors.len() + creditors.len());
    while !debtors.is_empty() && !creditors.is_empty() {
        let (Some(mut debtor), Some(mut creditor)) = (debtors.pop(), creditors.pop()) else {
            break;
        };
        let amount = debtor.amount.min(creditor.amount);
        debug!(
            "{} pays {} {} (debt {}, credit {})",
            debtor.participant, creditor.participant, amount, debtor.amount, creditor.amount
        );
        transactions.push(Transaction::new(
            debtor.participant.clone(),
            creditor.participant.clone(),
            amount,
        ));

        debtor.amount -= amount;
        creditor.amount -= amount;
        if debtor.amount > tolerance {
            debtors.push(debtor);
        }
        if creditor.amount > tolerance {
            creditors.push(creditor);
        }
    }

    if let Some(debtor) = debtors.pop() {
        return Err(SettlementError::ResidualBalance {
            participant: debtor.participant,
            residual: -debtor.amount,
        });
    }
    if let Some(creditor) = creditors.pop() {
        return Err(SettlementError::ResidualBalance {
            participant: creditor.participant,
            residual: creditor.amount,
        });
    }
    Ok(transactions)
}
