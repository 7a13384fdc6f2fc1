use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::truncate;
use crate::calendar::Event;
use crate::theme;

/// Inline event list for the selected day.
pub struct DayView;

impl DayView {
    pub fn render(frame: &mut Frame, area: Rect, date: NaiveDate, events: &[&Event], cursor: usize) {
        let theme = theme::current();
        let w = area.width as usize;

        let title = if w >= 30 {
            format!(" {} ", date.format("%A, %B %d, %Y"))
        } else if w >= 18 {
            format!(" {} ", date.format("%b %d, %Y"))
        } else {
            format!(" {} ", date.format("%m/%d"))
        };

        let count_str = match events.len() {
            0 => String::new(),
            1 => " 1 event ".to_string(),
            n => format!(" {} events ", n),
        };

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .title_bottom(Line::from(Span::styled(count_str, theme.dim)))
            .borders(Borders::ALL)
            .border_style(theme.border);

        if events.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("No events. Press n to add one.").style(theme.dim);
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;

        let items: Vec<ListItem> = events
            .iter()
            .enumerate()
            .map(|(i, ev)| format_event(ev, inner_w, i == cursor))
            .collect();

        // Keep the cursor row on screen
        let visible = area.height.saturating_sub(2) as usize;
        let skip = (cursor + 1).saturating_sub(visible);
        let items: Vec<ListItem> = items.into_iter().skip(skip).collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}

fn format_event(ev: &Event, max_width: usize, selected: bool) -> ListItem<'static> {
    let theme = theme::current();
    let time_str = format!(" {} ", ev.time_range_display());
    let used = time_str.chars().count();

    let (time_style, name_style) = if selected {
        (theme.highlight, theme.highlight)
    } else {
        (Style::default().add_modifier(Modifier::DIM), Style::default())
    };

    let name = truncate(&ev.name, max_width.saturating_sub(used));
    let name_len = name.chars().count();
    let mut spans = vec![
        Span::styled(time_str, time_style),
        Span::styled(name, name_style),
    ];

    // Only show the description if there's room
    if let Some(ref desc) = ev.description {
        let room = max_width.saturating_sub(used + name_len + 3);
        if room > 3 {
            spans.push(Span::styled(format!(" - {}", truncate(desc, room)), theme.dim));
        }
    }

    ListItem::new(Line::from(spans))
}
