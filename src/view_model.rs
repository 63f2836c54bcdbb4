use crate::session::{SessionRecord, DAYS, TIME_SLOTS};
use crate::store::{SessionStore, WeekSummary};
use crate::week;

const TOPIC_PREVIEW_CHARS: usize = 30;

/// What one occupied grid cell displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellViewModel {
    pub language: String,
    pub mentor: String,
    pub mentee: String,
    pub topic: String,
}

impl CellViewModel {
    fn from_record(rec: &SessionRecord) -> Self {
        Self {
            language: rec.language.clone(),
            mentor: rec.mentor_name.clone(),
            mentee: rec.mentee_name.clone(),
            topic: topic_preview(&rec.notes),
        }
    }
}

fn topic_preview(notes: &str) -> String {
    if notes.is_empty() {
        return "No notes".to_string();
    }
    let chars: Vec<char> = notes.chars().collect();
    if chars.len() > TOPIC_PREVIEW_CHARS {
        let head: String = chars[..TOPIC_PREVIEW_CHARS].iter().collect();
        format!("{}...", head)
    } else {
        notes.to_string()
    }
}

/// Pure derivation of everything the grid screen shows for one week. The
/// renderer reads only this; the store stays the single source of truth.
#[derive(Debug, Clone, PartialEq)]
pub struct GridViewModel {
    pub week_label: String,
    pub cells: Vec<Vec<Option<CellViewModel>>>,
    pub summary: WeekSummary,
}

impl GridViewModel {
    pub fn derive(store: &SessionStore, week: i32) -> Self {
        let mut cells: Vec<Vec<Option<CellViewModel>>> =
            vec![vec![None; DAYS.len()]; TIME_SLOTS.len()];
        for (key, rec) in store.list_for_week(week) {
            cells[key.slot][key.day] = Some(CellViewModel::from_record(rec));
        }
        Self {
            week_label: week::format_week_label(week),
            cells,
            summary: store.summarize(week),
        }
    }

    pub fn cell(&self, slot: usize, day: usize) -> Option<&CellViewModel> {
        self.cells[slot][day].as_ref()
    }
}
