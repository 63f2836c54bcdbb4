use chrono::{Datelike, Duration, Local, NaiveDate};

/// Monday of the week `offset` weeks away from the week containing `today`.
/// Weeks run Monday through Sunday, so a Sunday backs up six days.
pub fn week_start_from(today: NaiveDate, offset: i32) -> NaiveDate {
    let days_back = today.weekday().num_days_from_monday() as i64;
    today - Duration::days(days_back) + Duration::days(i64::from(offset) * 7)
}

/// Monday of the week `offset` weeks from the current real-world week.
pub fn week_start(offset: i32) -> NaiveDate {
    week_start_from(Local::now().date_naive(), offset)
}

/// Header label, e.g. "Week of March 3, 2025".
pub fn format_week_label(offset: i32) -> String {
    format_week_label_from(Local::now().date_naive(), offset)
}

pub fn format_week_label_from(today: NaiveDate, offset: i32) -> String {
    let monday = week_start_from(today, offset);
    format!("Week of {}", monday.format("%B %-d, %Y"))
}

/// Offset in weeks from the current real-world week. 0 = this week,
/// negative = past, positive = future. Owned by the controller; navigation
/// is the only mutator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeekCursor(pub i32);

impl WeekCursor {
    pub fn change(&mut self, direction: i32) {
        self.0 += direction;
    }

    pub fn offset(&self) -> i32 {
        self.0
    }
}
