use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::form::SessionForm;
use crate::runtime::AppEvent;
use crate::session::{DAYS, TIME_SLOTS};
use crate::storage::SessionStorage;
use crate::store::SessionStore;
use crate::view_model::GridViewModel;
use crate::week::WeekCursor;

pub const TICK_RATE_MS: u64 = 250;

/// How long a transient status line stays visible (~3 seconds).
const STATUS_TICKS: u32 = (3000 / TICK_RATE_MS) as u32;

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Browsing,
    Editing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    ticks_remaining: u32,
}

impl StatusMessage {
    fn new(text: String) -> Self {
        Self {
            text,
            ticks_remaining: STATUS_TICKS,
        }
    }
}

/// The whole application state: store, storage, week cursor, grid selection
/// and the optional modal form. Mutation and persistence for one input event
/// run to completion before the next event is consumed.
pub struct App {
    pub store: SessionStore,
    storage: Box<dyn SessionStorage>,
    pub cursor: WeekCursor,
    pub mode: Mode,
    pub selected_slot: usize,
    pub selected_day: usize,
    pub form: Option<SessionForm>,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
}

impl App {
    pub fn new(storage: Box<dyn SessionStorage>, start_week: i32) -> Self {
        let store = storage.load();
        Self {
            store,
            storage,
            cursor: WeekCursor(start_week),
            mode: Mode::Browsing,
            selected_slot: 0,
            selected_day: 0,
            form: None,
            status: None,
            should_quit: false,
        }
    }

    /// Everything the grid screen needs, re-derived from the store.
    pub fn view_model(&self) -> GridViewModel {
        GridViewModel::derive(&self.store, self.cursor.offset())
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => self.on_tick(),
            AppEvent::Resize => {}
            AppEvent::Key(key) => match self.mode {
                Mode::Browsing => self.handle_browsing_key(key),
                Mode::Editing => self.handle_editing_key(key),
            },
        }
    }

    fn on_tick(&mut self) {
        if let Some(status) = &mut self.status {
            status.ticks_remaining = status.ticks_remaining.saturating_sub(1);
            if status.ticks_remaining == 0 {
                self.status = None;
            }
        }
    }

    fn handle_browsing_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected_day = self.selected_day.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.selected_day + 1 < DAYS.len() {
                    self.selected_day += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_slot = self.selected_slot.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_slot + 1 < TIME_SLOTS.len() {
                    self.selected_slot += 1;
                }
            }
            KeyCode::Char('[') | KeyCode::Char('p') => self.change_week(-1),
            KeyCode::Char(']') | KeyCode::Char('n') => self.change_week(1),
            KeyCode::Enter => self.open_form(),
            _ => {}
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('d') => self.delete_session(),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Esc => self.close_form(),
            KeyCode::Tab | KeyCode::Down => {
                if let Some(form) = &mut self.form {
                    form.focus_next();
                }
            }
            KeyCode::BackTab | KeyCode::Up => {
                if let Some(form) = &mut self.form {
                    form.focus_prev();
                }
            }
            KeyCode::Backspace => {
                if let Some(form) = &mut self.form {
                    form.backspace();
                }
            }
            KeyCode::Enter => self.save_session(),
            KeyCode::Char(c) => {
                if let Some(form) = &mut self.form {
                    form.push_char(c);
                }
            }
            _ => {}
        }
    }

    pub fn change_week(&mut self, direction: i32) {
        self.cursor.change(direction);
        // The grid and summary re-derive from the store on the next draw;
        // nothing else to invalidate.
    }

    fn open_form(&mut self) {
        let slot = self.selected_slot;
        let day = self.selected_day;
        let key = crate::session::SlotKey::new(self.cursor.offset(), slot, day);
        let form = match self.store.get(key) {
            Some(rec) => SessionForm::open_for(slot, day, rec),
            None => SessionForm::open_blank(slot, day),
        };
        self.form = Some(form);
        self.mode = Mode::Editing;
    }

    fn close_form(&mut self) {
        self.form = None;
        self.mode = Mode::Browsing;
    }

    fn save_session(&mut self) {
        let Some(form) = &self.form else {
            return;
        };
        let week = self.cursor.offset();
        match form.to_record(week) {
            Ok(record) => {
                let key = form.key(week);
                // Validation already passed, so the put cannot fail here.
                let _ = self.store.put(key, record);
                self.persist();
                self.close_form();
                self.set_status("Session saved successfully!".to_string());
            }
            Err(err) => {
                // Form stays open so the user can fill in what's missing.
                self.set_status(format!("Please fill in required fields ({})", err));
            }
        }
    }

    fn delete_session(&mut self) {
        let Some(form) = &self.form else {
            return;
        };
        let key = form.key(self.cursor.offset());
        if self.store.delete(key) {
            self.persist();
            self.set_status("Session deleted successfully!".to_string());
        }
        self.close_form();
    }

    /// Best-effort write-back of the whole store. A failed write keeps the
    /// in-memory mutation and surfaces on the status line instead of
    /// crashing or rolling back.
    fn persist(&mut self) {
        if let Err(e) = self.storage.save(&self.store) {
            self.set_status(format!("Could not save sessions: {}", e));
        }
    }

    fn set_status(&mut self, text: String) {
        self.status = Some(StatusMessage::new(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SlotKey;
    use crate::storage::FileSessionStorage;
    use std::io;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> AppEvent {
        AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_event(key(KeyCode::Char(c)));
        }
    }

    fn temp_app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::with_path(dir.path().join("sessions.json"));
        (App::new(Box::new(storage), 0), dir)
    }

    /// Fills in language, mentor and mentee on a fresh form and saves.
    fn log_session(app: &mut App, language: &str, mentor: &str, mentee: &str) {
        app.handle_event(key(KeyCode::Enter));
        type_text(app, language);
        app.handle_event(key(KeyCode::Tab));
        type_text(app, mentor);
        app.handle_event(key(KeyCode::Tab)); // mentor grade
        app.handle_event(key(KeyCode::Tab)); // mentor's teacher
        app.handle_event(key(KeyCode::Tab)); // mentee name
        type_text(app, mentee);
        app.handle_event(key(KeyCode::Enter));
    }

    #[test]
    fn starts_browsing_with_empty_store() {
        let (app, _dir) = temp_app();
        assert_eq!(app.mode, Mode::Browsing);
        assert!(app.store.is_empty());
        assert_eq!(app.cursor.offset(), 0);
    }

    #[test]
    fn arrows_move_selection_within_grid() {
        let (mut app, _dir) = temp_app();
        app.handle_event(key(KeyCode::Right));
        app.handle_event(key(KeyCode::Down));
        assert_eq!((app.selected_slot, app.selected_day), (1, 1));

        // Clamped at the edges
        for _ in 0..10 {
            app.handle_event(key(KeyCode::Right));
            app.handle_event(key(KeyCode::Down));
        }
        assert_eq!(app.selected_slot, TIME_SLOTS.len() - 1);
        assert_eq!(app.selected_day, DAYS.len() - 1);

        for _ in 0..10 {
            app.handle_event(key(KeyCode::Left));
            app.handle_event(key(KeyCode::Up));
        }
        assert_eq!((app.selected_slot, app.selected_day), (0, 0));
    }

    #[test]
    fn week_navigation_moves_cursor() {
        let (mut app, _dir) = temp_app();
        app.handle_event(key(KeyCode::Char(']')));
        app.handle_event(key(KeyCode::Char(']')));
        app.handle_event(key(KeyCode::Char('[')));
        assert_eq!(app.cursor.offset(), 1);
    }

    #[test]
    fn save_flow_puts_record_and_persists() {
        let (mut app, dir) = temp_app();
        log_session(&mut app, "Python", "Amy", "Ben");

        assert_eq!(app.mode, Mode::Browsing);
        assert!(app.form.is_none());
        let rec = app.store.get(SlotKey::new(0, 0, 0)).unwrap();
        assert_eq!(rec.language, "Python");
        assert_eq!(rec.mentor_name, "Amy");
        assert_eq!(
            app.status.as_ref().unwrap().text,
            "Session saved successfully!"
        );

        // Written through to disk
        let storage = FileSessionStorage::with_path(dir.path().join("sessions.json"));
        assert_eq!(storage.load(), app.store);
    }

    #[test]
    fn invalid_save_keeps_form_open_and_store_unchanged() {
        let (mut app, _dir) = temp_app();
        app.handle_event(key(KeyCode::Enter));
        type_text(&mut app, "Python");
        app.handle_event(key(KeyCode::Enter)); // mentor/mentee missing

        assert_eq!(app.mode, Mode::Editing);
        assert!(app.form.is_some());
        assert!(app.store.is_empty());
        assert!(app
            .status
            .as_ref()
            .unwrap()
            .text
            .contains("mentor name"));
    }

    #[test]
    fn reopening_an_occupied_cell_prefills_the_form() {
        let (mut app, _dir) = temp_app();
        log_session(&mut app, "Python", "Amy", "Ben");

        app.handle_event(key(KeyCode::Enter));
        let form = app.form.as_ref().unwrap();
        assert!(form.editing_existing);
        assert_eq!(form.value(crate::form::FormField::Language), "Python");
    }

    #[test]
    fn overwrite_same_cell_keeps_one_session() {
        let (mut app, _dir) = temp_app();
        log_session(&mut app, "Python", "Amy", "Ben");

        // Edit in place: clear the language, type a new one
        app.handle_event(key(KeyCode::Enter));
        for _ in 0..6 {
            app.handle_event(key(KeyCode::Backspace));
        }
        type_text(&mut app, "Rust");
        app.handle_event(key(KeyCode::Enter));

        let summary = app.store.summarize(0);
        assert_eq!(summary.session_count, 1);
        assert_eq!(
            app.store.get(SlotKey::new(0, 0, 0)).unwrap().language,
            "Rust"
        );
    }

    #[test]
    fn ctrl_d_deletes_the_edited_session() {
        let (mut app, _dir) = temp_app();
        log_session(&mut app, "Python", "Amy", "Ben");

        app.handle_event(key(KeyCode::Enter));
        app.handle_event(ctrl('d'));

        assert!(app.store.is_empty());
        assert_eq!(app.mode, Mode::Browsing);
        assert_eq!(
            app.status.as_ref().unwrap().text,
            "Session deleted successfully!"
        );
    }

    #[test]
    fn deleting_an_empty_cell_is_harmless() {
        let (mut app, _dir) = temp_app();
        app.handle_event(key(KeyCode::Enter));
        app.handle_event(ctrl('d'));
        assert!(app.store.is_empty());
        assert_eq!(app.mode, Mode::Browsing);
        assert!(app.status.is_none());
    }

    #[test]
    fn escape_cancels_the_form_without_saving() {
        let (mut app, _dir) = temp_app();
        app.handle_event(key(KeyCode::Enter));
        type_text(&mut app, "Python");
        app.handle_event(key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Browsing);
        assert!(app.store.is_empty());
        assert!(!app.should_quit);
    }

    #[test]
    fn sessions_follow_the_week_cursor() {
        let (mut app, _dir) = temp_app();
        log_session(&mut app, "Python", "Amy", "Ben");

        app.change_week(1);
        log_session(&mut app, "Rust", "Cleo", "Dan");

        assert_eq!(app.store.list_for_week(0).len(), 1);
        assert_eq!(app.store.list_for_week(1).len(), 1);
        assert_eq!(app.view_model().summary.session_count, 1);
        app.change_week(-1);
        assert_eq!(
            app.view_model().cell(0, 0).unwrap().language,
            "Python"
        );
    }

    #[test]
    fn status_message_expires_after_ticks() {
        let (mut app, _dir) = temp_app();
        log_session(&mut app, "Python", "Amy", "Ben");
        assert!(app.status.is_some());
        for _ in 0..STATUS_TICKS {
            app.handle_event(AppEvent::Tick);
        }
        assert!(app.status.is_none());
    }

    #[test]
    fn quit_keys_set_the_flag() {
        let (mut app, _dir) = temp_app();
        app.handle_event(key(KeyCode::Char('q')));
        assert!(app.should_quit);

        let (mut app, _dir) = temp_app();
        app.handle_event(ctrl('c'));
        assert!(app.should_quit);
    }

    struct FailingStorage;

    impl SessionStorage for FailingStorage {
        fn load(&self) -> SessionStore {
            SessionStore::new()
        }
        fn save(&self, _store: &SessionStore) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn persistence_failure_keeps_in_memory_mutation() {
        let mut app = App::new(Box::new(FailingStorage), 0);
        log_session(&mut app, "Python", "Amy", "Ben");

        // The save to disk failed, but the session is still in the store
        // and the failure shows on the status line.
        assert_eq!(app.store.summarize(0).session_count, 1);
        assert!(app
            .status
            .as_ref()
            .unwrap()
            .text
            .contains("Could not save sessions"));
    }

    #[test]
    fn app_reloads_what_it_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        {
            let storage = FileSessionStorage::with_path(&path);
            let mut app = App::new(Box::new(storage), 0);
            log_session(&mut app, "Python", "Amy", "Ben");
        }
        let app = App::new(Box::new(FileSessionStorage::with_path(&path)), 0);
        assert_eq!(app.store.summarize(0).session_count, 1);
    }
}
