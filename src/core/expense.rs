use crate::core::participant::ParticipantId;
use crate::split::InvalidSplit;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a single expense within a trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random identifier, used when the caller does not supply one.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Sequential identifier for the expense at `position` (1-based): `EXP001`.
    pub fn sequential(position: usize) -> Self {
        Self(format!("EXP{position:03}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unset ids are empty until a trip assigns one.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ExpenseId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Per-beneficiary split parameters: a percentage or an explicit amount,
/// depending on the [`SplitMode`] that holds them.
///
/// Entries keep their insertion order. Keys are unique and values are
/// never negative; both are checked on construction and on deserialization.
///
/// # Examples
///
/// ```
/// use trip_settle::core::expense::SplitParams;
/// use trip_settle::core::participant::ParticipantId;
/// use rust_decimal_macros::dec;
///
/// let params = SplitParams::new([
///     (ParticipantId::new("A"), dec!(60)),
///     (ParticipantId::new("B"), dec!(40)),
/// ]).unwrap();
/// assert_eq!(params.total(), dec!(100));
/// assert!(SplitParams::new([
///     (ParticipantId::new("A"), dec!(60)),
///     (ParticipantId::new("A"), dec!(40)),
/// ]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SplitParams {
    entries: Vec<(ParticipantId, Decimal)>,
}

impl SplitParams {
    pub fn new(
        entries: impl IntoIterator<Item = (ParticipantId, Decimal)>,
    ) -> Result<Self, InvalidSplit> {
        let mut params = Self::default();
        for (participant, value) in entries {
            if params.get(&participant).is_some() {
                return Err(InvalidSplit::DuplicateBeneficiary(participant));
            }
            if value < Decimal::ZERO {
                return Err(InvalidSplit::NegativeValue { participant, value });
            }
            params.entries.push((participant, value));
        }
        Ok(params)
    }

    pub fn get(&self, participant: &ParticipantId) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(p, _)| p == participant)
            .map(|(_, v)| *v)
    }

    pub fn participants(&self) -> impl Iterator<Item = &ParticipantId> {
        self.entries.iter().map(|(p, _)| p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, Decimal)> {
        self.entries.iter().map(|(p, v)| (p, *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|(_, v)| *v).sum()
    }
}

mod params_serde {
    use super::*;
    use serde::de::{self, MapAccess, Visitor};
    use serde::ser::SerializeMap;

    impl Serialize for SplitParams {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.entries.len()))?;
            for (participant, value) in &self.entries {
                map.serialize_entry(participant, value)?;
            }
            map.end()
        }
    }

    impl<'de> Deserialize<'de> for SplitParams {
        fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct V;
            impl<'de> Visitor<'de> for V {
                type Value = SplitParams;
                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str("a map from participant id to decimal value")
                }
                fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                    let mut entries = Vec::new();
                    while let Some(entry) = access.next_entry::<ParticipantId, Decimal>()? {
                        entries.push(entry);
                    }
                    SplitParams::new(entries).map_err(de::Error::custom)
                }
            }
            deserializer.deserialize_map(V)
        }
    }
}

/// How an expense is apportioned among its beneficiaries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "params", rename_all = "lowercase")]
pub enum SplitMode {
    /// Divided evenly.
    #[default]
    Equal,
    /// Each beneficiary pays a percentage; percentages sum to 100.
    Percentage(SplitParams),
    /// Each beneficiary pays an explicit amount; amounts sum to the total.
    Custom(SplitParams),
}

impl SplitMode {
    pub fn params(&self) -> Option<&SplitParams> {
        match self {
            SplitMode::Equal => None,
            SplitMode::Percentage(params) | SplitMode::Custom(params) => Some(params),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SplitMode::Equal => "equal",
            SplitMode::Percentage(_) => "percentage",
            SplitMode::Custom(_) => "custom",
        }
    }
}

/// A shared expense: one payer covering an amount on behalf of an ordered
/// list of beneficiaries.
///
/// The beneficiary order is significant: it fixes who absorbs rounding
/// remainders when the amount does not divide evenly. The payer need not be
/// a beneficiary.
///
/// Expenses are plain records. Validation happens when they are split, so an
/// edited expense is simply split again from scratch.
///
/// # Examples
///
/// ```
/// use trip_settle::core::expense::Expense;
/// use trip_settle::core::participant::ParticipantId;
/// use rust_decimal_macros::dec;
///
/// let dinner = Expense::equal(
///     ParticipantId::new("A"),
///     dec!(90),
///     ["A", "B", "C"].map(ParticipantId::new),
/// )
/// .with_category("Food");
///
/// assert_eq!(dinner.beneficiaries().len(), 3);
/// assert_eq!(dinner.category(), Some("Food"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default)]
    id: ExpenseId,
    payer: ParticipantId,
    amount: Decimal,
    #[serde(default)]
    beneficiaries: Vec<ParticipantId>,
    #[serde(default)]
    split: SplitMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Expense {
    fn with_mode(
        payer: ParticipantId,
        amount: Decimal,
        beneficiaries: Vec<ParticipantId>,
        split: SplitMode,
    ) -> Self {
        Self {
            id: ExpenseId::generate(),
            payer,
            amount,
            beneficiaries,
            split,
            date: None,
            category: None,
            description: None,
        }
    }

    /// An expense divided evenly among `beneficiaries`.
    pub fn equal(
        payer: ParticipantId,
        amount: Decimal,
        beneficiaries: impl IntoIterator<Item = ParticipantId>,
    ) -> Self {
        Self::with_mode(payer, amount, beneficiaries.into_iter().collect(), SplitMode::Equal)
    }

    /// An expense split by percentage. The beneficiaries are the keys of
    /// `percentages`, in order.
    pub fn by_percentage(payer: ParticipantId, amount: Decimal, percentages: SplitParams) -> Self {
        let beneficiaries = percentages.participants().cloned().collect();
        Self::with_mode(payer, amount, beneficiaries, SplitMode::Percentage(percentages))
    }

    /// An expense split by explicit amounts. The beneficiaries are the keys
    /// of `amounts`, in order.
    pub fn custom(payer: ParticipantId, amount: Decimal, amounts: SplitParams) -> Self {
        let beneficiaries = amounts.participants().cloned().collect();
        Self::with_mode(payer, amount, beneficiaries, SplitMode::Custom(amounts))
    }

    pub fn with_id(mut self, id: impl Into<ExpenseId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn assign_id(&mut self, id: ExpenseId) {
        self.id = id;
    }

    /// Copy of this expense restricted to the given beneficiaries.
    pub(crate) fn restricted_to(&self, beneficiaries: Vec<ParticipantId>) -> Self {
        Self {
            beneficiaries,
            ..self.clone()
        }
    }

    // --- Accessors ---

    pub fn id(&self) -> &ExpenseId {
        &self.id
    }

    pub fn payer(&self) -> &ParticipantId {
        &self.payer
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn beneficiaries(&self) -> &[ParticipantId] {
        &self.beneficiaries
    }

    pub fn split_mode(&self) -> &SplitMode {
        &self.split
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl From<String> for ExpenseId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
