use crate::core::participant::ParticipantId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A trip member, optionally joining late or leaving early.
///
/// # Examples
///
/// ```
/// use trip_settle::trip::roster::Participant;
/// use chrono::NaiveDate;
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
/// let ravi = Participant::new("ravi").joined(day(3)).left(day(5));
///
/// assert!(!ravi.is_active_on(day(2)));
/// assert!(ravi.is_active_on(day(3)));
/// assert!(ravi.is_active_on(day(5)));
/// assert!(!ravi.is_active_on(day(6)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            start_date: None,
            end_date: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn joined(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn left(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Both ends of the window are inclusive.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date.map_or(true, |start| start <= date)
            && self.end_date.map_or(true, |end| date <= end)
    }

    /// Whether the window is well formed (no end before start).
    pub fn has_valid_window(&self) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }
}
