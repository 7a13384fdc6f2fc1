use chrono::{Datelike, Days, Local, NaiveDate, Weekday};
use color_eyre::eyre::{Result, WrapErr};
use log::{error, info};

use crate::calendar::grid::shift_month;
use crate::calendar::{build_month_grid, Event, EventStore, FileStorage, MonthGrid};
use crate::components::event_form::{EditorMode, EventFormState};
use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    DayModal,
    Form,
    Help,
}

pub struct App {
    pub running: bool,
    pub selected_date: NaiveDate,
    pub today: NaiveDate,
    pub week_start: Weekday,
    /// Open create/edit form, `None` when closed.
    pub editor: Option<EventFormState>,
    pub day_modal_open: bool,
    pub show_help: bool,
    /// Highlighted row in the selected day's event list.
    pub event_cursor: usize,
    pub status_message: Option<String>,
    store: EventStore,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let storage = FileStorage::new(&config.data_dir);
        let store = EventStore::load(Box::new(storage))
            .wrap_err_with(|| format!("failed to load events from {}", config.data_dir.display()))?;

        let mut app = Self::with_store(store, Local::now().date_naive(), config.week_start);
        if app.store.recovered_from_corrupt() {
            app.status_message =
                Some("Stored events were unreadable; a backup was kept".to_string());
        }
        Ok(app)
    }

    pub fn with_store(store: EventStore, today: NaiveDate, week_start: Weekday) -> Self {
        Self {
            running: true,
            selected_date: today,
            today,
            week_start,
            editor: None,
            day_modal_open: false,
            show_help: false,
            event_cursor: 0,
            status_message: None,
            store,
        }
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn input_mode(&self) -> InputMode {
        if self.show_help {
            InputMode::Help
        } else if self.editor.is_some() {
            InputMode::Form
        } else if self.day_modal_open {
            InputMode::DayModal
        } else {
            InputMode::Normal
        }
    }

    pub fn month_grid(&self) -> MonthGrid {
        build_month_grid(
            self.selected_date,
            self.week_start,
            self.selected_date,
            self.today,
            self.store.events(),
        )
    }

    /// Events on the selected day, ordered for display.
    pub fn day_events(&self) -> Vec<&Event> {
        let mut events = self.store.find_by_date(self.selected_date);
        events.sort_by(|a, b| a.display_cmp(b));
        events
    }

    pub fn selected_event(&self) -> Option<&Event> {
        self.day_events().get(self.event_cursor).copied()
    }

    // ── Navigation ──

    pub fn select_date(&mut self, date: NaiveDate) {
        if date != self.selected_date {
            self.selected_date = date;
            self.event_cursor = 0;
        }
    }

    pub fn next_day(&mut self) {
        self.select_date(self.selected_date.succ_opt().unwrap_or(self.selected_date));
    }

    pub fn prev_day(&mut self) {
        self.select_date(self.selected_date.pred_opt().unwrap_or(self.selected_date));
    }

    pub fn next_week(&mut self) {
        self.select_date(
            self.selected_date
                .checked_add_days(Days::new(7))
                .unwrap_or(self.selected_date),
        );
    }

    pub fn prev_week(&mut self) {
        self.select_date(
            self.selected_date
                .checked_sub_days(Days::new(7))
                .unwrap_or(self.selected_date),
        );
    }

    pub fn next_month(&mut self) {
        self.select_date(shift_month(self.selected_date, 1));
    }

    pub fn prev_month(&mut self) {
        self.select_date(shift_month(self.selected_date, -1));
    }

    pub fn go_to_today(&mut self) {
        self.today = Local::now().date_naive();
        self.select_date(self.today);
    }

    pub fn cursor_down(&mut self) {
        let count = self.day_events().len();
        if self.event_cursor + 1 < count {
            self.event_cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.event_cursor = self.event_cursor.saturating_sub(1);
    }

    fn clamp_cursor(&mut self) {
        let count = self.day_events().len();
        self.event_cursor = self.event_cursor.min(count.saturating_sub(1));
    }

    // ── Day modal ──

    pub fn open_day_modal(&mut self) {
        self.day_modal_open = true;
        self.clamp_cursor();
    }

    pub fn close_day_modal(&mut self) {
        self.day_modal_open = false;
    }

    // ── Editor ──

    pub fn open_event_form(&mut self) {
        self.day_modal_open = false;
        self.editor = Some(EventFormState::new(self.selected_date));
    }

    pub fn edit_selected_event(&mut self) {
        let Some(form) = self.selected_event().map(EventFormState::for_event) else {
            self.status_message = Some("No event selected".to_string());
            return;
        };
        self.day_modal_open = false;
        self.editor = Some(form);
    }

    pub fn close_event_form(&mut self) {
        self.editor = None;
    }

    pub fn form_input_char(&mut self, c: char) {
        if let Some(ref mut form) = self.editor {
            form.input_char(c);
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(ref mut form) = self.editor {
            form.backspace();
        }
    }

    pub fn form_tab(&mut self) {
        if let Some(ref mut form) = self.editor {
            form.next_field();
        }
    }

    pub fn form_backtab(&mut self) {
        if let Some(ref mut form) = self.editor {
            form.prev_field();
        }
    }

    /// Validate and apply the open form. An invalid form stays open with the
    /// reason shown inline.
    pub fn submit_event_form(&mut self) {
        let Some(form) = self.editor.as_mut() else {
            return;
        };

        let id = match form.mode {
            EditorMode::Create => self.store.next_id(),
            EditorMode::Edit(id) => id,
        };
        let event = match form.to_event(id) {
            Ok(event) => event,
            Err(err) => {
                form.error = Some(err);
                return;
            }
        };
        let mode = form.mode;
        self.editor = None;

        let date = event.date;
        let result = match mode {
            EditorMode::Create => self.store.add(event).map(|()| "Event added"),
            EditorMode::Edit(_) => self.store.edit(event).map(|changed| {
                if changed {
                    "Event updated"
                } else {
                    "Event no longer exists"
                }
            }),
        };

        match result {
            Ok(msg) => self.status_message = Some(msg.to_string()),
            Err(e) => {
                error!("Failed to save events: {}", e);
                self.status_message = Some(format!("Failed to save: {}", e));
            }
        }

        self.select_date(date);
        self.clamp_cursor();
    }

    pub fn delete_selected_event(&mut self) {
        let Some(id) = self.selected_event().map(|e| e.id) else {
            self.status_message = Some("No event selected".to_string());
            return;
        };

        match self.store.delete(id) {
            Ok(_) => self.status_message = Some("Event deleted".to_string()),
            Err(e) => {
                error!("Failed to save events: {}", e);
                self.status_message = Some(format!("Failed to save: {}", e));
            }
        }
        self.clamp_cursor();
    }

    pub fn quit(&mut self) {
        info!(
            "Quitting with {} events, last viewed {}-{:02}",
            self.store.len(),
            self.selected_date.year(),
            self.selected_date.month()
        );
        self.running = false;
    }
}
