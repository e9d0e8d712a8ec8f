use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use trip_settle::config::{EngineConfig, Strategy};
use trip_settle::core::balances::Balances;
use trip_settle::core::expense::{Expense, SplitParams};
use trip_settle::core::participant::ParticipantId;
use trip_settle::core::share::{Share, Transaction};
use trip_settle::settlement::{SettlementEngine, SettlementError};
use trip_settle::split::{InvalidSplit, SplitError, Splitter};
use trip_settle::trip::{Participant, Trip, TripError};

fn p(id: &str) -> ParticipantId {
    ParticipantId::new(id)
}

fn params(entries: &[(&str, Decimal)]) -> SplitParams {
    SplitParams::new(entries.iter().map(|(id, v)| (p(id), *v))).unwrap()
}

/// Full pipeline: expenses → shares → balances → payments → zero.
#[test]
fn full_pipeline_beach_weekend() {
    let splitter = Splitter::default();
    let engine = SettlementEngine::default();
    let everyone = [p("ana"), p("ben"), p("cleo"), p("dev")];

    let expenses = vec![
        Expense::equal(p("ana"), dec!(480), everyone.clone()).with_category("Hotel"),
        Expense::equal(p("ben"), dec!(97.30), everyone.clone()).with_category("Food"),
        Expense::by_percentage(
            p("cleo"),
            dec!(120),
            params(&[("ana", dec!(25)), ("ben", dec!(25)), ("dev", dec!(50))]),
        ),
        Expense::custom(
            p("dev"),
            dec!(45.50),
            params(&[("cleo", dec!(20.50)), ("dev", dec!(25))]),
        ),
    ];

    let mut shares: Vec<Share> = Vec::new();
    for expense in &expenses {
        let split = splitter.split(expense).unwrap();
        let payer_portion = splitter.allocate(expense).unwrap().portion(expense.payer());
        let owed: Decimal = split.iter().map(|s| s.amount()).sum();
        assert_eq!(owed + payer_portion, expense.amount());
        shares.extend(split);
    }

    let settlement = engine.settle(&shares).unwrap();
    let balances = settlement.balances();
    assert_eq!(balances.total(), Decimal::ZERO);
    assert_eq!(balances.len(), 4);
    assert!(settlement.transaction_count() <= balances.nonzero_count(Decimal::ZERO) - 1);
    assert!(settlement.clears_all(Decimal::ZERO));

    for tx in settlement.transactions() {
        assert!(tx.amount > Decimal::ZERO);
        assert_ne!(tx.from, tx.to);
    }
}

#[test]
fn equal_split_remainder_goes_to_first_beneficiary() {
    let expense = Expense::equal(p("A"), dec!(100), [p("A"), p("B"), p("C")]);
    let shares = Splitter::default().split(&expense).unwrap();

    assert_eq!(shares.len(), 2);
    assert_eq!((shares[0].from(), shares[0].amount()), (&p("B"), dec!(33.34)));
    assert_eq!((shares[1].from(), shares[1].amount()), (&p("C"), dec!(33.33)));
    assert!(shares.iter().all(|s| s.to() == &p("A")));
}

#[test]
fn percentage_split_paid_by_outsider() {
    let expense = Expense::by_percentage(
        p("C"),
        dec!(100),
        params(&[("A", dec!(60)), ("B", dec!(40))]),
    );
    let shares = Splitter::default().split(&expense).unwrap();
    assert_eq!(shares.len(), 2);
    assert_eq!((shares[0].from(), shares[0].to(), shares[0].amount()), (&p("A"), &p("C"), dec!(60)));
    assert_eq!((shares[1].from(), shares[1].to(), shares[1].amount()), (&p("B"), &p("C"), dec!(40)));
}

#[test]
fn percentage_split_not_summing_to_hundred_fails() {
    let expense = Expense::by_percentage(
        p("C"),
        dec!(100),
        params(&[("A", dec!(60)), ("B", dec!(39.5))]),
    );
    assert!(matches!(
        Splitter::default().split(&expense),
        Err(SplitError::InvalidSplit(InvalidSplit::PercentageTotal { .. }))
    ));
}

#[test]
fn worked_settlement_example() {
    let balances =
        Balances::from_nets([(p("A"), dec!(50)), (p("B"), dec!(-20)), (p("C"), dec!(-30))]);
    let settlement = SettlementEngine::default().settle_balances(balances).unwrap();

    assert_eq!(settlement.transaction_count(), 2);
    assert!(settlement
        .transactions()
        .contains(&Transaction::new(p("B"), p("A"), dec!(20))));
    assert!(settlement
        .transactions()
        .contains(&Transaction::new(p("C"), p("A"), dec!(30))));
    assert!(settlement.clears_all(Decimal::ZERO));
}

#[test]
fn imbalanced_input_is_surfaced() {
    let balances = Balances::from_nets([(p("A"), dec!(50)), (p("B"), dec!(-20))]);
    assert!(matches!(
        SettlementEngine::default().settle_balances(balances),
        Err(SettlementError::Imbalanced { .. })
    ));
}

#[test]
fn exact_strategy_never_uses_more_payments() {
    let nets = [
        ("A", dec!(4)),
        ("B", dec!(3)),
        ("C", dec!(-2)),
        ("D", dec!(-2)),
        ("E", dec!(-3)),
    ];
    let balances = Balances::from_nets(nets.iter().map(|(id, v)| (p(id), *v)));

    let greedy = SettlementEngine::default()
        .settle_balances(balances.clone())
        .unwrap();
    let exact_config = EngineConfig::default().with_strategy(Strategy::Exact);
    let exact = SettlementEngine::new(&exact_config)
        .settle_balances(balances)
        .unwrap();

    assert_eq!(greedy.transaction_count(), 4);
    assert_eq!(exact.transaction_count(), 3);
    assert_eq!(exact.groups().len(), 2);
    assert!(exact.clears_all(Decimal::ZERO));
}

#[test]
fn many_expenses_do_not_drift() {
    let splitter = Splitter::default();
    let everyone = [p("A"), p("B"), p("C")];
    let mut shares = Vec::new();
    for i in 0..500 {
        let payer = everyone[i % 3].clone();
        let expense = Expense::equal(payer, dec!(10), everyone.clone());
        shares.extend(splitter.split(&expense).unwrap());
    }
    let settlement = SettlementEngine::default().settle(&shares).unwrap();
    assert_eq!(settlement.balances().total(), Decimal::ZERO);
    assert!(settlement.clears_all(Decimal::ZERO));
}

#[test]
fn trip_from_json_with_late_joiner() {
    let trip = Trip::from_json_str(
        r#"{
            "participants": [
                { "id": "ana" },
                { "id": "ben" },
                { "id": "cleo", "start_date": "2024-06-02" }
            ],
            "expenses": [
                {
                    "id": "E1",
                    "payer": "ana",
                    "amount": "90.00",
                    "beneficiaries": ["ana", "ben", "cleo"],
                    "date": "2024-06-01",
                    "category": "Food"
                },
                {
                    "id": "E2",
                    "payer": "cleo",
                    "amount": "60.00",
                    "beneficiaries": ["ana", "ben", "cleo"],
                    "split": { "mode": "custom", "params": { "ana": "30.00", "ben": "20.00", "cleo": "10.00" } },
                    "date": "2024-06-02"
                }
            ]
        }"#,
    )
    .unwrap();

    let report = trip
        .settle(&Splitter::default(), &SettlementEngine::default())
        .unwrap();
    let balances = report.settlement.balances();

    // E1 is split between ana and ben only.
    assert_eq!(balances.net(&p("ana")), dec!(45) - dec!(30));
    assert_eq!(balances.net(&p("ben")), dec!(-45) - dec!(20));
    assert_eq!(balances.net(&p("cleo")), dec!(50));
    assert!(report.settlement.clears_all(Decimal::ZERO));

    let explanation = trip.explain(&p("cleo"), &Splitter::default()).unwrap();
    assert_eq!(explanation.lines.len(), 1);
    assert_eq!(explanation.net(), dec!(50));
}

#[test]
fn trip_rejects_unknown_beneficiary() {
    let trip = Trip::new(
        vec![Participant::new("A"), Participant::new("B")],
        vec![Expense::equal(p("A"), dec!(10), [p("A"), p("Z")]).with_id("E1")],
    )
    .unwrap();
    assert!(matches!(
        trip.settle(&Splitter::default(), &SettlementEngine::default()),
        Err(TripError::UnknownParticipant { .. })
    ));
}

#[test]
fn config_drives_splitter_precision() {
    let config = EngineConfig::from_json_str(r#"{ "minor_unit_scale": 0 }"#).unwrap();
    let splitter = Splitter::new(&config);

    let expense = Expense::equal(p("A"), dec!(100), [p("A"), p("B"), p("C")]);
    let shares = splitter.split(&expense).unwrap();
    assert_eq!(shares[0].amount(), dec!(34));
    assert_eq!(shares[1].amount(), dec!(33));

    let cents = Expense::equal(p("A"), dec!(10.50), [p("A"), p("B")]);
    assert!(matches!(
        splitter.split(&cents),
        Err(SplitError::InvalidSplit(InvalidSplit::ExcessPrecision { .. }))
    ));
}

/// Settlement reports serialize to JSON for the presentation layer.
#[test]
fn settlement_report_serializes() {
    let trip = Trip::new(
        vec![Participant::new("A"), Participant::new("B")],
        vec![Expense::equal(p("A"), dec!(40), [p("A"), p("B")])],
    )
    .unwrap();
    let report = trip
        .settle(&Splitter::default(), &SettlementEngine::default())
        .unwrap();

    let json = serde_json::to_string_pretty(&report).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(parsed.get("settlement").is_some());
    assert_eq!(parsed["settlement"]["transactions"][0]["from"], "B");
    let amount: Decimal = parsed["settlement"]["transactions"][0]["amount"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(amount, dec!(20));
}

#[test]
fn empty_trip_settles_to_nothing() {
    let trip = Trip::default();
    let report = trip
        .settle(&Splitter::default(), &SettlementEngine::default())
        .unwrap();
    assert_eq!(report.settlement.transaction_count(), 0);
    assert!(report.settlement.balances().is_empty());
    assert_eq!(report.savings_percent(), 0.0);
}
