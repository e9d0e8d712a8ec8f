//! Weekend trip settlement example.
//!
//! Four friends share a cabin, groceries and a boat rental, each split a
//! different way, and settle up with as few payments as possible.

use rust_decimal_macros::dec;
use std::error::Error;
use trip_settle::prelude::*;

fn main() -> Result<(), Box<dyn Error>> {
    println!("╔═══════════════════════════════════════╗");
    println!("║  trip-settle: Weekend Trip Example    ║");
    println!("╚═══════════════════════════════════════╝\n");

    let ana = ParticipantId::new("ana");
    let ben = ParticipantId::new("ben");
    let cleo = ParticipantId::new("cleo");
    let dev = ParticipantId::new("dev");
    let everyone = [ana.clone(), ben.clone(), cleo.clone(), dev.clone()];

    let expenses = vec![
        Expense::equal(ana.clone(), dec!(640), everyone.clone())
            .with_id("cabin")
            .with_category("Hotel"),
        Expense::equal(ben.clone(), dec!(100), everyone.clone())
            .with_id("groceries")
            .with_category("Food"),
        Expense::by_percentage(
            cleo.clone(),
            dec!(150),
            SplitParams::new([(ben.clone(), dec!(50)), (cleo.clone(), dec!(30)), (dev.clone(), dec!(20))])?,
        )
        .with_id("boat")
        .with_category("Activities"),
        Expense::custom(
            dev.clone(),
            dec!(42.75),
            SplitParams::new([(ana.clone(), dec!(20.25)), (dev.clone(), dec!(22.50))])?,
        )
        .with_id("fuel")
        .with_category("Transport"),
    ];

    // --- Step 1: split every expense ---
    println!("━━━ Shares ━━━\n");

    let splitter = Splitter::default();
    let mut shares = Vec::new();
    for expense in &expenses {
        let split = splitter.split(expense)?;
        for share in &split {
            println!(
                "  {:<10} {} owes {} {}",
                share.expense(),
                share.from(),
                share.to(),
                share.amount()
            );
        }
        shares.extend(split);
    }
    println!();

    // --- Step 2: greedy settlement ---
    println!("━━━ Greedy Settlement ━━━\n");

    let greedy = SettlementEngine::default().settle(&shares)?;
    println!("{}", greedy);

    // --- Step 3: exact settlement ---
    println!("━━━ Exact Settlement ━━━\n");

    let config = EngineConfig::default().with_strategy(Strategy::Exact);
    let exact = SettlementEngine::new(&config).settle(&shares)?;
    for tx in exact.transactions() {
        println!("  {}", tx);
    }
    println!(
        "\nGreedy: {} payments, exact: {} payments",
        greedy.transaction_count(),
        exact.transaction_count()
    );

    Ok(())
}
