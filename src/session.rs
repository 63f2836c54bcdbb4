use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed grid axes of the deployment. Not runtime-configurable.
pub const TIME_SLOTS: [&str; 4] = ["8:00-8:45", "10:00-10:45", "12:00-12:45", "3:15-4:00"];
pub const DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Every slot is the same length, so tutored minutes are a straight multiple.
pub const SESSION_MINUTES: u32 = 45;

/// One logged mentoring session, as persisted. Field names stay camelCase so
/// payloads written by earlier versions of the planner still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub language: String,
    pub mentor_name: String,
    #[serde(default)]
    pub mentor_grade: String,
    #[serde(default)]
    pub mentor_teacher: String,
    pub mentee_name: String,
    #[serde(default)]
    pub mentee_grade: String,
    #[serde(default)]
    pub mentee_teacher: String,
    #[serde(default)]
    pub notes: String,
    pub time_slot: String,
    pub day: String,
    pub week: i32,
}

impl SessionRecord {
    /// Language, mentor and mentee are the minimum needed to make the entry
    /// meaningful; everything else is optional.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.language.trim().is_empty() {
            missing.push("language");
        }
        if self.mentor_name.trim().is_empty() {
            missing.push("mentor name");
        }
        if self.mentee_name.trim().is_empty() {
            missing.push("mentee name");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }
}

/// A save was rejected because required fields were left blank.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required field(s): {}", self.missing.join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// Typed grid position. The stringly `"<week>_<slot>_<day>"` form only
/// exists at the persistence boundary (see `to_storage_key`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub week: i32,
    pub slot: usize,
    pub day: usize,
}

impl SlotKey {
    pub fn new(week: i32, slot: usize, day: usize) -> Self {
        Self { week, slot, day }
    }

    pub fn slot_label(&self) -> &'static str {
        TIME_SLOTS[self.slot]
    }

    pub fn day_label(&self) -> &'static str {
        DAYS[self.day]
    }

    /// Key format used in the persisted JSON object.
    pub fn to_storage_key(self) -> String {
        format!("{}_{}_{}", self.week, self.slot, self.day)
    }

    /// Inverse of `to_storage_key`. Returns None for malformed keys or
    /// indexes outside the grid, so a corrupt entry is dropped rather than
    /// crashing the load.
    pub fn from_storage_key(s: &str) -> Option<Self> {
        let mut parts = s.split('_');
        let week = parts.next()?.parse::<i32>().ok()?;
        let slot = parts.next()?.parse::<usize>().ok()?;
        let day = parts.next()?.parse::<usize>().ok()?;
        if parts.next().is_some() || slot >= TIME_SLOTS.len() || day >= DAYS.len() {
            return None;
        }
        Some(Self { week, slot, day })
    }
}
