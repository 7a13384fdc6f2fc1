use chrono::Datelike;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::truncate;
use crate::calendar::grid::weekday_headers;
use crate::calendar::{CalendarCell, MonthGrid};
use crate::theme;

pub struct MonthView;

impl MonthView {
    pub fn render(frame: &mut Frame, area: Rect, grid: &MonthGrid) {
        let theme = theme::current();

        let block = Block::default()
            .title(format!(" {} ", grid.month.format("%B %Y")))
            .title_style(theme.header)
            .title_bottom(Line::from(Span::styled(
                format!(
                    " {} - {} ",
                    grid.first_day().format("%b %-d"),
                    grid.last_day().format("%b %-d")
                ),
                theme.dim,
            )))
            .borders(Borders::ALL)
            .border_style(theme.border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width < 14 || inner.height < 2 {
            return;
        }

        // Layout: header + weeks, each week row gets an equal share
        let week_h = ((inner.height - 1) / grid.weeks.len() as u16).max(1);
        let mut constraints = vec![Constraint::Length(1)];
        for _ in &grid.weeks {
            constraints.push(Constraint::Length(week_h));
        }
        constraints.push(Constraint::Min(0));
        let rows = Layout::vertical(constraints).split(inner);

        let col_constraints = [Constraint::Ratio(1, 7); 7];

        let header_cols = Layout::horizontal(col_constraints).split(rows[0]);
        for (i, weekday) in weekday_headers(grid.week_start).iter().enumerate() {
            let label = format!("{:^width$}", weekday.to_string(), width = header_cols[i].width as usize);
            frame.render_widget(Paragraph::new(Span::styled(label, theme.header)), header_cols[i]);
        }

        for (w, week) in grid.weeks.iter().enumerate() {
            let row = rows[w + 1];
            if row.height == 0 {
                break;
            }
            let cols = Layout::horizontal(col_constraints).split(row);
            for (d, cell) in week.iter().enumerate() {
                render_cell(frame, cols[d], cell);
            }
        }
    }
}

fn render_cell(frame: &mut Frame, area: Rect, cell: &CalendarCell) {
    let theme = theme::current();
    let width = area.width.saturating_sub(1) as usize;

    let day_style = if cell.is_selected && cell.is_today {
        theme.today.patch(theme.selected).add_modifier(Modifier::BOLD)
    } else if cell.is_selected {
        theme.selected
    } else if cell.is_today {
        theme.today
    } else if !cell.in_displayed_month {
        theme.dim
    } else {
        Style::default()
    };

    // Single-line rows only have room for a marker
    if area.height < 2 {
        let marker = if cell.events.is_empty() { " " } else { "*" };
        let text = format!("{:>2}{}", cell.date.day(), marker);
        frame.render_widget(Paragraph::new(Span::styled(text, day_style)), area);
        return;
    }

    let mut lines = vec![Line::from(Span::styled(format!("{:>2}", cell.date.day()), day_style))];

    let room = area.height as usize - 1;
    let event_style = if cell.in_displayed_month { theme.event } else { theme.dim };
    let shown = if cell.events.len() > room { room.saturating_sub(1) } else { cell.events.len() };

    for ev in cell.events.iter().take(shown) {
        let text = format!("{} {}", ev.start_time.format("%H:%M"), ev.name);
        lines.push(Line::from(Span::styled(truncate(&text, width), event_style)));
    }
    if shown < cell.events.len() {
        let more = format!("+{} more", cell.events.len() - shown);
        lines.push(Line::from(Span::styled(truncate(&more, width), theme.dim)));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, Weekday};

    use super::*;
    use crate::calendar::{build_month_grid, Event, EventId};
    use crate::components::test_support::{screen_text, terminal};

    #[test]
    fn test_renders_title_headers_and_events() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let events = vec![Event {
            id: EventId::new(1),
            date: day,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
            name: "Standup".to_string(),
            description: None,
        }];
        let grid = build_month_grid(day, Weekday::Sun, day, day, &events);

        let mut term = terminal(100, 30);
        term.draw(|f| MonthView::render(f, f.area(), &grid)).unwrap();
        let text = screen_text(&term);

        assert!(text.contains("June 2024"));
        assert!(text.contains("Sun"));
        assert!(text.contains("Sat"));
        assert!(text.contains("09:00 Standup"));
        // Leading day from May shows in the first row.
        let first_week = text.lines().nth(2).unwrap();
        assert!(first_week.contains("26"));
        assert!(text.contains("May 26 - Jul 6"));
    }

    #[test]
    fn test_cramped_area_uses_markers() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let grid = build_month_grid(day, Weekday::Mon, day, day, &[]);

        let mut term = terminal(40, 9);
        term.draw(|f| MonthView::render(f, f.area(), &grid)).unwrap();
        let text = screen_text(&term);

        assert!(text.contains("Mon"));
        assert!(text.contains("30"));
    }
}
