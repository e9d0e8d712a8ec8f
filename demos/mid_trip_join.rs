//! Mid-trip join example.
//!
//! A participant joins on the third day. Equal splits dated before that
//! leave them out automatically; the explanation shows exactly which
//! expenses they were charged for.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::error::Error;
use trip_settle::prelude::*;
use trip_settle::trip::{Participant, Trip};

fn main() -> Result<(), Box<dyn Error>> {
    println!("╔═══════════════════════════════════════╗");
    println!("║  trip-settle: Mid-Trip Join Example   ║");
    println!("╚═══════════════════════════════════════╝\n");

    let day = |d: u32| NaiveDate::from_ymd_opt(2024, 6, d).ok_or("invalid date");
    let ids = ["maya", "noor", "ravi"].map(ParticipantId::new);

    let trip = Trip::new(
        vec![
            Participant::new("maya").with_name("Maya"),
            Participant::new("noor").with_name("Noor"),
            Participant::new("ravi").with_name("Ravi").joined(day(3)?),
        ],
        vec![
            Expense::equal(ids[0].clone(), dec!(180), ids.clone())
                .with_id("hostel-1")
                .with_date(day(1)?)
                .with_category("Hotel"),
            Expense::equal(ids[1].clone(), dec!(45.60), ids.clone())
                .with_id("dinner-2")
                .with_date(day(2)?)
                .with_category("Food"),
            Expense::equal(ids[2].clone(), dec!(270), ids.clone())
                .with_id("hostel-3")
                .with_date(day(3)?)
                .with_category("Hotel"),
            Expense::equal(ids[0].clone(), dec!(61), ids.clone())
                .with_id("museum-4")
                .with_date(day(4)?)
                .with_category("Activities"),
        ],
    )?;

    let splitter = Splitter::default();
    let report = trip.settle(&splitter, &SettlementEngine::default())?;
    println!("{}", report);

    println!("━━━ Ravi's share, expense by expense ━━━\n");
    println!("{}", trip.explain(&ids[2], &splitter)?);

    println!("{}", trip.analytics());

    Ok(())
}
