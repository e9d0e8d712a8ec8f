//! Provably minimal settlement for small groups.
//!
//! The fewest transfers that clear `n` non-zero balances is `n - k`, where
//! `k` is the largest number of disjoint zero-sum subsets the balances can
//! be partitioned into: each subset settles internally in `size - 1`
//! transfers. `k` is found by dynamic programming over all subsets, so the
//! cost is `O(n * 2^n)` and callers must bound `n`.

use crate::core::participant::ParticipantId;
use crate::core::share::Transaction;
use crate::settlement::greedy::settle_greedy;
use crate::settlement::SettlementError;
use rust_decimal::Decimal;

/// Hard ceiling on the number of non-zero balances accepted.
pub const MAX_EXACT_PARTICIPANTS: usize = 24;

/// Partition the non-zero balances into the maximum number of zero-sum
/// groups. Each group lists indices into `nets`, ascending.
///
/// # Panics
///
/// Panics if more than [`MAX_EXACT_PARTICIPANTS`] balances are non-zero.
pub fn zero_sum_groups(nets: &[(ParticipantId, Decimal)], tolerance: Decimal) -> Vec<Vec<usize>> {
    let active: Vec<usize> = (0..nets.len())
        .filter(|&i| nets[i].1.abs() > tolerance)
        .collect();
    let n = active.len();
    if n == 0 {
        return Vec::new();
    }
    assert!(
        n <= MAX_EXACT_PARTICIPANTS,
        "exact settlement limited to {} balances, got {}",
        MAX_EXACT_PARTICIPANTS,
        n
    );

    let full = (1usize << n) - 1;
    let is_zero = |sum: Decimal| sum.abs() <= tolerance;

    let mut sums = vec![Decimal::ZERO; full + 1];
    for mask in 1..=full {
        let low = mask.trailing_zeros() as usize;
        sums[mask] = sums[mask & (mask - 1)] + nets[active[low]].1;
    }

    // best[mask]: most zero-sum prefixes over any ordering of `mask`
    let mut best = vec![0u32; full + 1];
    for mask in 1..=full {
        let inner = bits(mask).map(|i| best[mask ^ (1 << i)]).max().unwrap_or(0);
        best[mask] = inner + u32::from(is_zero(sums[mask]));
    }

    let mut groups = Vec::new();
    let mut current = Vec::new();
    let mut mask = full;
    while mask != 0 {
        let target = best[mask] - u32::from(is_zero(sums[mask]));
        let Some(i) = bits(mask).find(|&i| best[mask ^ (1 << i)] == target) else {
            break;
        };
        current.push(active[i]);
        mask ^= 1 << i;
        if is_zero(sums[mask]) {
            current.sort_unstable();
            groups.push(std::mem::take(&mut current));
        }
    }
    groups.sort();
    groups
}

/// Settle balances with the minimum possible number of transfers.
pub fn settle_exact(
    nets: &[(ParticipantId, Decimal)],
    tolerance: Decimal,
) -> Result<Vec<Transaction>, SettlementError> {
    let mut transactions = Vec::new();
    for group in zero_sum_groups(nets, tolerance) {
        let members: Vec<(ParticipantId, Decimal)> =
            group.iter().map(|&i| nets[i].clone()).collect();
        transactions.extend(settle_greedy(&members, tolerance)?);
    }
    Ok(transactions)
}

fn bits(mask: usize) -> impl Iterator<Item = usize> {
    (0..usize::BITS as usize).filter(move |&i| mask & (1 << i) != 0)
}
