use crate::core::participant::ParticipantId;
use crate::core::share::Share;
use crate::settlement::engine::Settlement;
use crate::settlement::pairwise::pairwise_transfers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a settlement compares to settling every share as it stands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReport {
    pub settlement: Settlement,
    /// Number of shares folded in.
    pub share_count: usize,
    /// Sum of all share amounts.
    pub gross_total: Decimal,
    /// Transfers needed if each pair settled on its own.
    pub pairwise_transfer_count: usize,
    pub groups: Vec<Vec<ParticipantId>>,
}

impl SettlementReport {
    pub fn new(shares: &[Share], settlement: Settlement) -> Self {
        Self {
            share_count: shares.len(),
            gross_total: shares.iter().map(|s| s.amount()).sum(),
            pairwise_transfer_count: pairwise_transfers(shares).len(),
            groups: settlement.groups(),
            settlement,
        }
    }

    /// Transfers saved compared to pairwise settlement.
    pub fn transfers_saved(&self) -> usize {
        self.pairwise_transfer_count
            .saturating_sub(self.settlement.transaction_count())
    }

    /// Money that no longer needs to move, as a percentage of gross.
    pub fn savings_percent(&self) -> f64 {
        if self.gross_total == Decimal::ZERO {
            return 0.0;
        }
        let saved = self.gross_total - self.settlement.settled_total();
        let pct = saved * Decimal::ONE_HUNDRED / self.gross_total;
        pct.to_string().parse::<f64>().unwrap_or(0.0)
    }
}

impl fmt::Display for SettlementReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.settlement)?;
        writeln!(f, "\n=== Summary ===")?;
        writeln!(f, "Shares:            {}", self.share_count)?;
        writeln!(f, "Gross owed:        {}", self.gross_total)?;
        writeln!(f, "Outstanding:       {}", self.settlement.balances().total_outstanding())?;
        writeln!(f, "Settled total:     {}", self.settlement.settled_total())?;
        writeln!(f, "Money not moved:   {:.1}%", self.savings_percent())?;
        writeln!(f, "Pairwise payments: {}", self.pairwise_transfer_count)?;
        writeln!(f, "Payments:          {}", self.settlement.transaction_count())?;
        writeln!(f, "Payments saved:    {}", self.transfers_saved())?;
        for (i, group) in self.groups.iter().enumerate() {
            let members: Vec<&str> = group.iter().map(|p| p.as_str()).collect();
            writeln!(f, "Group {}:           {}", i + 1, members.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::engine::SettlementEngine;
    use rust_decimal_macros::dec;

    fn share(from: &str, to: &str, amount: Decimal) -> Share {
        Share::new("E".into(), from.into(), to.into(), amount)
    }

    #[test]
    fn test_report_chain() {
        // B owes A, C owes B: pairwise needs two payments, netting needs one
        let shares = vec![share("B", "A", dec!(20)), share("C", "B", dec!(20))];
        let settlement = SettlementEngine::default().settle(&shares).unwrap();
        let report = SettlementReport::new(&shares, settlement);

        assert_eq!(report.share_count, 2);
        assert_eq!(report.gross_total, dec!(40));
        assert_eq!(report.pairwise_transfer_count, 2);
        assert_eq!(report.settlement.transaction_count(), 1);
        assert_eq!(report.transfers_saved(), 1);
        assert!((report.savings_percent() - 50.0).abs() < 0.01);
        assert_eq!(report.groups.len(), 1);
    }

    #[test]
    fn test_report_shows_outstanding() {
        // A is owed 30 by B and 10 by C; B is owed 5 by C
        let shares = vec![
            share("B", "A", dec!(30)),
            share("C", "A", dec!(10)),
            share("C", "B", dec!(5)),
        ];
        let settlement = SettlementEngine::default().settle(&shares).unwrap();
        assert_eq!(settlement.balances().total_outstanding(), dec!(40));
        assert_eq!(settlement.settled_total(), dec!(40));

        let text = SettlementReport::new(&shares, settlement).to_string();
        assert!(text.contains("Outstanding:       40"));
    }

    #[test]
    fn test_report_empty() {
        let settlement = SettlementEngine::default().settle(&[]).unwrap();
        let report = SettlementReport::new(&[], settlement);
        assert_eq!(report.savings_percent(), 0.0);
        assert!(report.to_string().contains("Nothing to settle"));
    }
}
