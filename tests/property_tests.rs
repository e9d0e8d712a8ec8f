use proptest::prelude::*;
use rust_decimal::Decimal;
use trip_settle::config::{EngineConfig, Strategy as SettleStrategy};
use trip_settle::core::balances::Balances;
use trip_settle::core::expense::{Expense, SplitParams};
use trip_settle::core::participant::ParticipantId;
use trip_settle::core::share::Share;
use trip_settle::settlement::SettlementEngine;
use trip_settle::split::Splitter;

const POOL: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

/// Generate a random participant from a small pool.
fn arb_participant() -> impl Strategy<Value = ParticipantId> {
    prop::sample::select(POOL.to_vec()).prop_map(ParticipantId::new)
}

/// Generate a non-empty set of distinct beneficiaries, in pool order.
fn arb_beneficiaries() -> impl Strategy<Value = Vec<ParticipantId>> {
    prop::sample::subsequence(POOL.to_vec(), 1..=POOL.len())
        .prop_map(|ids| ids.into_iter().map(ParticipantId::new).collect())
}

/// Split `total` into `n` non-negative whole parts.
fn arb_parts(total: i64, n: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(1i64..100, n).prop_map(move |weights| {
        let sum: i64 = weights.iter().sum();
        let mut parts: Vec<i64> = weights.iter().map(|w| total * w / sum).collect();
        let assigned: i64 = parts.iter().sum();
        if let Some(last) = parts.last_mut() {
            *last += total - assigned;
        }
        parts
    })
}

fn params(ids: &[ParticipantId], values: Vec<Decimal>) -> SplitParams {
    SplitParams::new(ids.iter().cloned().zip(values)).unwrap()
}

/// Generate a valid expense in any of the three split modes. Custom
/// amounts may be a cent off the total, which is within tolerance.
fn arb_expense() -> impl Strategy<Value = Expense> {
    (
        arb_participant(),
        1i64..500_000i64,
        arb_beneficiaries(),
        0u8..3,
        -1i64..=1,
    )
        .prop_flat_map(|(payer, cents, beneficiaries, mode, cent_off)| {
            let n = beneficiaries.len();
            let total = if mode == 1 { 10_000 } else { cents + cent_off };
            arb_parts(total, n).prop_map(move |parts| {
                let amount = Decimal::new(cents, 2);
                match mode {
                    0 => Expense::equal(payer.clone(), amount, beneficiaries.clone()),
                    1 => Expense::by_percentage(
                        payer.clone(),
                        amount,
                        params(&beneficiaries, parts.iter().map(|v| Decimal::new(*v, 2)).collect()),
                    ),
                    _ => Expense::custom(
                        payer.clone(),
                        amount,
                        params(&beneficiaries, parts.iter().map(|v| Decimal::new(*v, 2)).collect()),
                    ),
                }
            })
        })
}

fn arb_expenses() -> impl Strategy<Value = Vec<Expense>> {
    prop::collection::vec(arb_expense(), 1..40)
}

/// Generate conserving balances: random nets with the last one closing the sum.
fn arb_balances(max: usize) -> impl Strategy<Value = Balances> {
    prop::collection::vec(-100_000i64..100_000i64, 1..max).prop_map(|cents| {
        let closing: i64 = -cents.iter().sum::<i64>();
        cents
            .into_iter()
            .chain(std::iter::once(closing))
            .enumerate()
            .map(|(i, c)| (ParticipantId::new(format!("P{:02}", i)), Decimal::new(c, 2)))
            .collect()
    })
}

fn all_shares(expenses: &[Expense]) -> Vec<Share> {
    let splitter = Splitter::default();
    expenses
        .iter()
        .flat_map(|e| splitter.split(e).unwrap())
        .collect()
}

proptest! {
    // ===================================================================
    // INVARIANT 1: Balances always sum to zero.
    //
    // Every share moves the same amount from one participant to another,
    // so folding any set of shares conserves money exactly.
    // ===================================================================
    #[test]
    fn balances_are_conserved(expenses in arb_expenses()) {
        let balances = SettlementEngine::compute_balances(&all_shares(&expenses));
        prop_assert_eq!(balances.total(), Decimal::ZERO);
    }

    // ===================================================================
    // INVARIANT 2: Portions add back up to the expense amount.
    //
    // Holds for every split mode; no minor unit is lost or invented.
    // ===================================================================
    #[test]
    fn split_totals_match_amount(expense in arb_expense()) {
        let allocation = Splitter::default().allocate(&expense).unwrap();
        prop_assert_eq!(allocation.total(), expense.amount());

        let owed: Decimal = Splitter::default()
            .split(&expense)
            .unwrap()
            .iter()
            .map(|s| s.amount())
            .sum();
        prop_assert_eq!(owed + allocation.portion(expense.payer()), expense.amount());
    }

    // ===================================================================
    // INVARIANT 3: No participant ever owes themselves.
    // ===================================================================
    #[test]
    fn no_self_shares(expense in arb_expense()) {
        for share in Splitter::default().split(&expense).unwrap() {
            prop_assert_ne!(share.from(), share.to());
            prop_assert!(share.amount() > Decimal::ZERO);
        }
    }

    // ===================================================================
    // INVARIANT 4: Splitting and settling are deterministic.
    // ===================================================================
    #[test]
    fn split_and_settle_are_idempotent(expenses in arb_expenses()) {
        let shares = all_shares(&expenses);
        prop_assert_eq!(&shares, &all_shares(&expenses));

        let engine = SettlementEngine::default();
        let first = engine.settle(&shares).unwrap();
        let second = engine.settle(&shares).unwrap();
        prop_assert_eq!(first, second);
    }

    // ===================================================================
    // INVARIANT 5: Executing every payment zeroes every balance.
    // ===================================================================
    #[test]
    fn payments_clear_all_balances(expenses in arb_expenses()) {
        let settlement = SettlementEngine::default().settle(&all_shares(&expenses)).unwrap();
        prop_assert!(settlement.clears_all(Decimal::ZERO));
        for tx in settlement.transactions() {
            prop_assert!(tx.amount > Decimal::ZERO);
            prop_assert_ne!(&tx.from, &tx.to);
        }
    }

    // ===================================================================
    // INVARIANT 6: At most n - 1 payments for n non-zero balances.
    // ===================================================================
    #[test]
    fn payment_count_bounded(balances in arb_balances(30)) {
        let settlement = SettlementEngine::default().settle_balances(balances.clone()).unwrap();
        let nonzero = balances.nonzero_count(Decimal::ZERO);
        prop_assert!(settlement.transaction_count() <= nonzero.saturating_sub(1));
    }

    // ===================================================================
    // INVARIANT 7: Payments = non-zero participants − settlement groups.
    //
    // Each group of k participants is a tree of k - 1 payments.
    // ===================================================================
    #[test]
    fn payment_count_matches_groups(balances in arb_balances(30)) {
        let settlement = SettlementEngine::default().settle_balances(balances.clone()).unwrap();
        let nonzero = balances.nonzero_count(Decimal::ZERO);
        prop_assert_eq!(
            settlement.transaction_count(),
            nonzero - settlement.groups().len()
        );
    }

    // ===================================================================
    // INVARIANT 8: The exact strategy never needs more payments than greedy.
    // ===================================================================
    #[test]
    fn exact_never_worse_than_greedy(balances in arb_balances(10)) {
        let greedy = SettlementEngine::default().settle_balances(balances.clone()).unwrap();
        let config = EngineConfig::default().with_strategy(SettleStrategy::Exact);
        let exact = SettlementEngine::new(&config).settle_balances(balances).unwrap();
        prop_assert!(exact.transaction_count() <= greedy.transaction_count());
        prop_assert!(exact.clears_all(Decimal::ZERO));
    }

    // ===================================================================
    // INVARIANT 9: Total moved never exceeds gross owed.
    // ===================================================================
    #[test]
    fn settled_total_never_exceeds_gross(expenses in arb_expenses()) {
        let shares = all_shares(&expenses);
        let gross: Decimal = shares.iter().map(|s| s.amount()).sum();
        let settlement = SettlementEngine::default().settle(&shares).unwrap();
        prop_assert!(settlement.settled_total() <= gross);
    }
}
