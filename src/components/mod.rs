pub mod day_modal;
pub mod day_view;
pub mod event_form;
pub mod month_view;
pub mod status_bar;

pub use day_modal::DayModal;
pub use day_view::DayView;
pub use event_form::EventForm;
pub use month_view::MonthView;
pub use status_bar::StatusBar;

use ratatui::layout::Rect;

/// Cut `s` to `max` characters, marking the cut with "…".
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 1 {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('…');
        out
    } else {
        s.chars().take(max).collect()
    }
}

/// Rectangle of at most `w` x `h` centered in `area`.
pub fn centered(area: Rect, w: u16, h: u16) -> Rect {
    let w = w.min(area.width);
    let h = h.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
