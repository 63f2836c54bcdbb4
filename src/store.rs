use crate::session::{SessionRecord, SlotKey, ValidationError, SESSION_MINUTES};
use itertools::Itertools;
use std::collections::{BTreeMap, HashMap};

/// Aggregate counters for one displayed week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeekSummary {
    pub session_count: usize,
    pub distinct_languages: usize,
    pub distinct_mentors: usize,
    pub minutes_total: u32,
}

/// In-memory mapping of grid slots to logged sessions. Persistence is the
/// caller's job (see `storage`); the store itself never touches disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStore {
    sessions: HashMap<SlotKey, SessionRecord>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn get(&self, key: SlotKey) -> Option<&SessionRecord> {
        self.sessions.get(&key)
    }

    /// Inserts or overwrites the session at `key`. Rejects records with
    /// blank required fields, leaving the store untouched.
    pub fn put(&mut self, key: SlotKey, record: SessionRecord) -> Result<(), ValidationError> {
        record.validate()?;
        self.sessions.insert(key, record);
        Ok(())
    }

    /// Removes the session at `key` if present. Deleting an absent key is a
    /// no-op, not an error; returns whether anything was removed.
    pub fn delete(&mut self, key: SlotKey) -> bool {
        self.sessions.remove(&key).is_some()
    }

    /// All entries whose key falls in the given week. Order is unspecified.
    pub fn list_for_week(&self, week: i32) -> Vec<(SlotKey, &SessionRecord)> {
        self.sessions
            .iter()
            .filter(|(key, _)| key.week == week)
            .map(|(key, rec)| (*key, rec))
            .collect()
    }

    pub fn summarize(&self, week: i32) -> WeekSummary {
        let records = self.list_for_week(week);
        let session_count = records.len();
        let distinct_languages = records
            .iter()
            .map(|(_, rec)| rec.language.as_str())
            .filter(|lang| !lang.is_empty())
            .unique()
            .count();
        let distinct_mentors = records
            .iter()
            .map(|(_, rec)| rec.mentor_name.as_str())
            .filter(|name| !name.is_empty())
            .unique()
            .count();
        WeekSummary {
            session_count,
            distinct_languages,
            distinct_mentors,
            minutes_total: session_count as u32 * SESSION_MINUTES,
        }
    }

    /// Persisted shape: a JSON object keyed by `"<week>_<slot>_<day>"`.
    /// BTreeMap keeps the serialized output stable across saves.
    pub fn to_persisted(&self) -> BTreeMap<String, SessionRecord> {
        self.sessions
            .iter()
            .map(|(key, rec)| (key.to_storage_key(), rec.clone()))
            .collect()
    }

    /// Rebuilds a store from the persisted map. Entries whose key does not
    /// parse back into the grid are dropped.
    pub fn from_persisted(map: BTreeMap<String, SessionRecord>) -> Self {
        let sessions = map
            .into_iter()
            .filter_map(|(key, rec)| SlotKey::from_storage_key(&key).map(|k| (k, rec)))
            .collect();
        Self { sessions }
    }
}
