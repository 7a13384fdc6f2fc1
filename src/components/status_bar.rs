use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::InputMode;
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame, area: Rect, mode: InputMode, message: Option<&str>, event_count: usize) {
        let theme = theme::current();
        let w = area.width as usize;

        let mode_str = match mode {
            InputMode::Normal => "Calendar",
            InputMode::DayModal => "Day",
            InputMode::Form => "Event",
            InputMode::Help => "Help",
        };
        let left = format!(" {} ({} stored) ", mode_str, event_count);

        // Show status message if present, otherwise show context-aware hints
        let right_text = if let Some(msg) = message {
            format!(" {} ", msg)
        } else {
            match mode {
                InputMode::Normal if w >= 90 => {
                    " hjkl:Nav [/]:Month t:Today Enter:Day n:New e:Edit d:Del ?:Help q:Quit ".to_string()
                }
                InputMode::Normal if w >= 50 => " [/]:Month Enter:Day n:New q:Quit ".to_string(),
                InputMode::DayModal if w >= 50 => " e:Edit d:Del n:New Esc:Close ".to_string(),
                InputMode::Form if w >= 50 => " Tab:Next Enter:Save Esc:Cancel ".to_string(),
                _ => " ?:Help q:Quit ".to_string(),
            }
        };

        let padding_len = w.saturating_sub(left.chars().count() + right_text.chars().count());
        let padding = " ".repeat(padding_len);

        let line = Line::from(vec![
            Span::styled(left, theme.status),
            Span::styled(padding, theme.status),
            Span::styled(right_text, theme.status),
        ]);

        let bar = Paragraph::new(line).style(theme.status);
        frame.render_widget(bar, area);
    }
}
