use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered;
use crate::calendar::Event;
use crate::theme;

/// Popup listing every event of the selected day.
pub struct DayModal;

impl DayModal {
    pub fn render(frame: &mut Frame, area: Rect, date: NaiveDate, events: &[&Event], cursor: usize) {
        let theme = theme::current();
        let popup_area = centered(area, area.width.min(60).max(30), area.height.min(20).max(8));

        frame.render_widget(Clear, popup_area);

        let accent = Style::default().fg(Color::Cyan);
        let block = Block::default()
            .title(format!(" Events on {} ", date.format("%B %-d, %Y")))
            .title_style(accent.add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(accent);

        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let [body, footer] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        let mut lines: Vec<Line> = Vec::new();
        if events.is_empty() {
            lines.push(Line::from(Span::styled("No events on this day", theme.dim)));
        }

        let mut cursor_line = 0;
        for (i, ev) in events.iter().enumerate() {
            if i > 0 {
                lines.push(Line::from(""));
            }
            let selected = i == cursor;
            if selected {
                cursor_line = lines.len();
            }
            let marker = if selected { "> " } else { "  " };
            let name_style = if selected {
                theme.highlight
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };

            lines.push(Line::from(vec![
                Span::styled(marker, accent),
                Span::styled(ev.name.clone(), name_style),
            ]));
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(ev.time_range_display(), theme.dim),
            ]));
            if let Some(ref desc) = ev.description {
                for line in desc.lines() {
                    lines.push(Line::from(format!("  {}", line)));
                }
            }
        }

        // Scroll so the highlighted event's name stays visible
        let scroll = (cursor_line + 3).saturating_sub(body.height as usize) as u16;
        let para = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));
        frame.render_widget(para, body);

        let hint = Line::from(vec![
            Span::styled("jk", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Move ", theme.dim),
            Span::styled("e", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Edit ", theme.dim),
            Span::styled("d", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Delete ", theme.dim),
            Span::styled("n", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":New ", theme.dim),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Close", theme.dim),
        ]);
        frame.render_widget(Paragraph::new(hint), footer);
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;
    use crate::calendar::EventId;
    use crate::components::test_support::{screen_text, terminal};

    fn make(id: i64, name: &str, desc: Option<&str>) -> Event {
        Event {
            id: EventId::new(id),
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
            name: name.to_string(),
            description: desc.map(str::to_string),
        }
    }

    #[test]
    fn test_modal_lists_all_events_of_the_day() {
        let a = make(1, "Standup", Some("daily sync"));
        let b = make(2, "Retro", None);
        let date = a.date;

        let mut term = terminal(80, 24);
        term.draw(|f| DayModal::render(f, f.area(), date, &[&a, &b], 1)).unwrap();
        let text = screen_text(&term);

        assert!(text.contains("Events on June 10, 2024"));
        assert!(text.contains("Standup"));
        assert!(text.contains("daily sync"));
        assert!(text.contains("> Retro"));
        assert!(text.contains("09:00 - 09:15"));
    }

    #[test]
    fn test_empty_modal() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 11).unwrap();
        let mut term = terminal(80, 24);
        term.draw(|f| DayModal::render(f, f.area(), date, &[], 0)).unwrap();
        assert!(screen_text(&term).contains("No events on this day"));
    }
}
