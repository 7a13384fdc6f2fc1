use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered;
use crate::calendar::event::{parse_date, parse_time};
use crate::calendar::{Event, EventId, ValidationError};
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    Name,
    Date,
    StartTime,
    EndTime,
    Description,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Name => FormField::Date,
            FormField::Date => FormField::StartTime,
            FormField::StartTime => FormField::EndTime,
            FormField::EndTime => FormField::Description,
            FormField::Description => FormField::Name,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FormField::Name => FormField::Description,
            FormField::Date => FormField::Name,
            FormField::StartTime => FormField::Date,
            FormField::EndTime => FormField::StartTime,
            FormField::Description => FormField::EndTime,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorMode {
    Create,
    Edit(EventId),
}

#[derive(Debug, Clone)]
pub struct EventFormState {
    pub mode: EditorMode,
    pub name: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub description: String,
    pub active_field: FormField,
    /// Reason the last submit was refused.
    pub error: Option<ValidationError>,
}

impl EventFormState {
    /// Empty form for a new event; times start blank.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            mode: EditorMode::Create,
            name: String::new(),
            date: date.format("%Y-%m-%d").to_string(),
            start_time: String::new(),
            end_time: String::new(),
            description: String::new(),
            active_field: FormField::Name,
            error: None,
        }
    }

    pub fn for_event(event: &Event) -> Self {
        Self {
            mode: EditorMode::Edit(event.id),
            name: event.name.clone(),
            date: event.date.format("%Y-%m-%d").to_string(),
            start_time: event.start_time.format("%H:%M").to_string(),
            end_time: event.end_time.format("%H:%M").to_string(),
            description: event.description.clone().unwrap_or_default(),
            active_field: FormField::Name,
            error: None,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, EditorMode::Edit(_))
    }

    /// Build the record this form describes. Start/end order is not checked.
    pub fn to_event(&self, id: EventId) -> Result<Event, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        let date = parse_date(&self.date)
            .ok_or_else(|| ValidationError::InvalidDate(self.date.clone()))?;
        let start_time =
            required_time(&self.start_time, "start", ValidationError::MissingStartTime)?;
        let end_time = required_time(&self.end_time, "end", ValidationError::MissingEndTime)?;
        // Emptiness is judged on trimmed text; the stored text is as typed.
        let description = (!self.description.trim().is_empty()).then(|| self.description.clone());

        Ok(Event {
            id,
            date,
            start_time,
            end_time,
            name: self.name.clone(),
            description,
        })
    }

    fn active_value_mut(&mut self) -> &mut String {
        match self.active_field {
            FormField::Name => &mut self.name,
            FormField::Date => &mut self.date,
            FormField::StartTime => &mut self.start_time,
            FormField::EndTime => &mut self.end_time,
            FormField::Description => &mut self.description,
        }
    }

    pub fn input_char(&mut self, c: char) {
        self.active_value_mut().push(c);
        self.error = None;
    }

    pub fn backspace(&mut self) {
        self.active_value_mut().pop();
        self.error = None;
    }

    pub fn next_field(&mut self) {
        self.active_field = self.active_field.next();
    }

    pub fn prev_field(&mut self) {
        self.active_field = self.active_field.prev();
    }
}

fn required_time(
    raw: &str,
    field: &'static str,
    missing: ValidationError,
) -> Result<chrono::NaiveTime, ValidationError> {
    if raw.trim().is_empty() {
        return Err(missing);
    }
    parse_time(raw).ok_or_else(|| ValidationError::InvalidTime {
        field,
        value: raw.to_string(),
    })
}

pub struct EventForm;

impl EventForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &EventFormState) {
        let theme = theme::current();

        let form_area = centered(area, area.width.min(56).max(30), area.height.min(14).max(11));

        frame.render_widget(Clear, form_area);

        let title = if state.is_edit() { " Edit Event " } else { " Add Event " };
        let accent = Style::default().fg(ratatui::style::Color::Green);
        let block = Block::default()
            .title(title)
            .title_style(accent.add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(accent);

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // name
            Constraint::Length(1), // date
            Constraint::Length(1), // start time
            Constraint::Length(1), // end time
            Constraint::Length(1), // description
            Constraint::Length(1), // spacer
            Constraint::Length(2), // error
            Constraint::Length(1), // help
            Constraint::Min(0),
        ])
        .split(inner);

        let active = state.active_field;
        render_field(frame, rows[0], "Name*", &state.name, "Event Name", active == FormField::Name);
        render_field(frame, rows[1], "Date", &state.date, "YYYY-MM-DD", active == FormField::Date);
        render_field(frame, rows[2], "Start*", &state.start_time, "HH:MM", active == FormField::StartTime);
        render_field(frame, rows[3], "End*", &state.end_time, "HH:MM", active == FormField::EndTime);
        render_field(
            frame,
            rows[4],
            "Notes",
            &state.description,
            "Description (optional)",
            active == FormField::Description,
        );

        if let Some(ref err) = state.error {
            let msg = Paragraph::new(Span::styled(err.to_string(), theme.error))
                .wrap(Wrap { trim: true });
            frame.render_widget(msg, rows[6]);
        }

        let submit = if state.is_edit() { ":Update " } else { ":Add " };
        let help = Line::from(vec![
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Next ", theme.dim),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(submit, theme.dim),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Cancel", theme.dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[7]);
    }
}

fn render_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    placeholder: &str,
    active: bool,
) {
    let theme = theme::current();
    let cursor = if active { "_" } else { "" };

    let style = if active {
        Style::default().fg(ratatui::style::Color::Cyan)
    } else {
        Style::default()
    };

    let mut spans = vec![Span::styled(format!("{:<8}", label), theme.dim)];
    if value.is_empty() && !active {
        spans.push(Span::styled(placeholder.to_string(), theme.dim));
    } else {
        spans.push(Span::styled(format!("{}{}", value, cursor), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
