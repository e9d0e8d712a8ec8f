use crate::core::expense::ExpenseId;
use crate::core::participant::ParticipantId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One beneficiary's obligation to the payer of one expense.
///
/// Shares are the atomic unit fed into settlement: `from` owes `to`
/// the given `amount` because `to` covered it in `expense`.
///
/// # Examples
///
/// ```
/// use trip_settle::core::share::Share;
/// use trip_settle::core::participant::ParticipantId;
/// use rust_decimal_macros::dec;
///
/// let share = Share::new(
///     "EXP001".into(),
///     ParticipantId::new("B"),
///     ParticipantId::new("A"),
///     dec!(33.34),
/// );
/// assert_eq!(share.amount(), dec!(33.34));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ShareRecord")]
pub struct Share {
    expense: ExpenseId,
    from: ParticipantId,
    to: ParticipantId,
    amount: Decimal,
}

impl Share {
    /// Create a new share.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive or if `from == to`.
    pub fn new(expense: ExpenseId, from: ParticipantId, to: ParticipantId, amount: Decimal) -> Self {
        assert!(
            amount > Decimal::ZERO,
            "Share amount must be positive, got {}",
            amount
        );
        assert!(from != to, "Share must not be owed to oneself ({})", from);
        Self {
            expense,
            from,
            to,
            amount,
        }
    }

    pub fn expense(&self) -> &ExpenseId {
        &self.expense
    }

    /// The beneficiary who owes.
    pub fn from(&self) -> &ParticipantId {
        &self.from
    }

    /// The payer who is owed.
    pub fn to(&self) -> &ParticipantId {
        &self.to
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Unchecked wire form of a [`Share`].
#[derive(Deserialize)]
struct ShareRecord {
    expense: ExpenseId,
    from: ParticipantId,
    to: ParticipantId,
    amount: Decimal,
}

impl TryFrom<ShareRecord> for Share {
    type Error = String;

    fn try_from(record: ShareRecord) -> Result<Self, Self::Error> {
        if record.amount <= Decimal::ZERO {
            return Err(format!("share amount must be positive, got {}", record.amount));
        }
        if record.from == record.to {
            return Err(format!("share must not be owed to oneself ({})", record.from));
        }
        Ok(Self {
            expense: record.expense,
            from: record.from,
            to: record.to,
            amount: record.amount,
        })
    }
}

/// A recommended payment produced by settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The debtor who pays.
    pub from: ParticipantId,
    /// The creditor who receives.
    pub to: ParticipantId,
    pub amount: Decimal,
}

impl Transaction {
    pub fn new(from: ParticipantId, to: ParticipantId, amount: Decimal) -> Self {
        Self { from, to, amount }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.from, self.to, self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    #[should_panic(expected = "must be positive")]
    fn test_share_zero_amount() {
        Share::new(
            "E1".into(),
            ParticipantId::new("B"),
            ParticipantId::new("A"),
            Decimal::ZERO,
        );
    }

    #[test]
    #[should_panic(expected = "owed to oneself")]
    fn test_share_self_owed() {
        Share::new(
            "E1".into(),
            ParticipantId::new("A"),
            ParticipantId::new("A"),
            dec!(10),
        );
    }

    #[test]
    fn test_share_json_is_checked() {
        let share: Share = serde_json::from_str(
            r#"{ "expense": "E1", "from": "B", "to": "A", "amount": "12.50" }"#,
        )
        .unwrap();
        assert_eq!(share.amount(), dec!(12.50));

        let zero = serde_json::from_str::<Share>(
            r#"{ "expense": "E1", "from": "B", "to": "A", "amount": "0" }"#,
        );
        assert!(zero.unwrap_err().to_string().contains("must be positive"));

        let own = serde_json::from_str::<Share>(
            r#"{ "expense": "E1", "from": "A", "to": "A", "amount": "5" }"#,
        );
        assert!(own.unwrap_err().to_string().contains("owed to oneself"));
    }

    #[test]
    fn test_transaction_display() {
        let tx = Transaction::new(ParticipantId::new("B"), ParticipantId::new("A"), dec!(20));
        assert_eq!(tx.to_string(), "B -> A: 20");
    }
}
