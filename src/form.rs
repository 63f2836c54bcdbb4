use crate::session::{SessionRecord, SlotKey, ValidationError};

/// Form fields in focus order. Starred fields are required on save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum FormField {
    #[strum(serialize = "Language *")]
    Language,
    #[strum(serialize = "Mentor Name *")]
    MentorName,
    #[strum(serialize = "Mentor Grade")]
    MentorGrade,
    #[strum(serialize = "Mentor's Teacher")]
    MentorTeacher,
    #[strum(serialize = "Mentee Name *")]
    MenteeName,
    #[strum(serialize = "Mentee Grade")]
    MenteeGrade,
    #[strum(serialize = "Mentee's Teacher")]
    MenteeTeacher,
    #[strum(serialize = "Notes")]
    Notes,
}

pub const FORM_FIELDS: [FormField; 8] = [
    FormField::Language,
    FormField::MentorName,
    FormField::MentorGrade,
    FormField::MentorTeacher,
    FormField::MenteeName,
    FormField::MenteeGrade,
    FormField::MenteeTeacher,
    FormField::Notes,
];

/// Modal form state for logging or editing the session in one grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionForm {
    pub slot: usize,
    pub day: usize,
    pub focus: usize,
    pub editing_existing: bool,
    values: [String; FORM_FIELDS.len()],
}

impl SessionForm {
    pub fn open_blank(slot: usize, day: usize) -> Self {
        Self {
            slot,
            day,
            focus: 0,
            editing_existing: false,
            values: Default::default(),
        }
    }

    /// Prefills from an existing session so the modal edits in place.
    pub fn open_for(slot: usize, day: usize, record: &SessionRecord) -> Self {
        Self {
            slot,
            day,
            focus: 0,
            editing_existing: true,
            values: [
                record.language.clone(),
                record.mentor_name.clone(),
                record.mentor_grade.clone(),
                record.mentor_teacher.clone(),
                record.mentee_name.clone(),
                record.mentee_grade.clone(),
                record.mentee_teacher.clone(),
                record.notes.clone(),
            ],
        }
    }

    pub fn title(&self) -> &'static str {
        if self.editing_existing {
            "Edit Mentoring Session"
        } else {
            "Log Mentoring Session"
        }
    }

    pub fn focused_field(&self) -> FormField {
        FORM_FIELDS[self.focus]
    }

    pub fn value(&self, field: FormField) -> &str {
        let idx = FORM_FIELDS.iter().position(|f| *f == field).unwrap();
        &self.values[idx]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % FORM_FIELDS.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + FORM_FIELDS.len() - 1) % FORM_FIELDS.len();
    }

    pub fn push_char(&mut self, c: char) {
        self.values[self.focus].push(c);
    }

    pub fn backspace(&mut self) {
        self.values[self.focus].pop();
    }

    /// The grid cell this form edits, in the given week.
    pub fn key(&self, week: i32) -> SlotKey {
        SlotKey::new(week, self.slot, self.day)
    }

    /// Composes the record for the given week. The slot and day labels come
    /// from the cell being edited, so a stored record always describes the
    /// key it sits under.
    pub fn to_record(&self, week: i32) -> Result<SessionRecord, ValidationError> {
        let key = self.key(week);
        let record = SessionRecord {
            language: self.values[0].clone(),
            mentor_name: self.values[1].clone(),
            mentor_grade: self.values[2].clone(),
            mentor_teacher: self.values[3].clone(),
            mentee_name: self.values[4].clone(),
            mentee_grade: self.values[5].clone(),
            mentee_teacher: self.values[6].clone(),
            notes: self.values[7].clone(),
            time_slot: key.slot_label().to_string(),
            day: key.day_label().to_string(),
            week,
        };
        record.validate()?;
        Ok(record)
    }
}
