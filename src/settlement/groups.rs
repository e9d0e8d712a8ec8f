use crate::core::participant::ParticipantId;
use crate::core::share::Transaction;
use petgraph::unionfind::UnionFind;
use std::collections::{BTreeSet, HashMap};

/// Split the participants of a settlement plan into settlement groups:
/// clusters connected by at least one payment, which clear their balances
/// among themselves independently of everyone else.
///
/// Members of each group are sorted and groups are ordered by their first
/// member. Participants who neither pay nor receive appear in no group.
///
/// A plan whose payments form a forest (as both strategies produce) uses
/// exactly `participants - groups` payments.
pub fn settlement_groups(transactions: &[Transaction]) -> Vec<Vec<ParticipantId>> {
    let participants: Vec<&ParticipantId> = transactions
        .iter()
        .flat_map(|tx| [&tx.from, &tx.to])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let index: HashMap<&ParticipantId, usize> = participants
        .iter()
        .enumerate()
        .map(|(i, p)| (*p, i))
        .collect();

    let mut components = UnionFind::<usize>::new(participants.len());
    for tx in transactions {
        components.union(index[&tx.from], index[&tx.to]);
    }

    let mut by_root: HashMap<usize, Vec<ParticipantId>> = HashMap::new();
    for (i, participant) in participants.iter().enumerate() {
        by_root
            .entry(components.find(i))
            .or_default()
            .push((*participant).clone());
    }

    let mut groups: Vec<Vec<ParticipantId>> = by_root.into_values().collect();
    groups.sort();
    groups
}
