//! Month grid computation.
//!
//! The grid always covers whole weeks: it starts on the configured week-start
//! day on or before the 1st of the month and ends on the day before the next
//! week-start on or after the last day of the month.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use super::event::Event;
use super::store::events_on;

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub in_displayed_month: bool,
    pub is_selected: bool,
    pub is_today: bool,
    /// Events on this day in display order.
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    /// First day of the displayed month.
    pub month: NaiveDate,
    pub week_start: Weekday,
    pub weeks: Vec<[CalendarCell; 7]>,
}

impl MonthGrid {
    pub fn cells(&self) -> impl Iterator<Item = &CalendarCell> {
        self.weeks.iter().flat_map(|week| week.iter())
    }

    #[allow(dead_code)]
    pub fn cell(&self, date: NaiveDate) -> Option<&CalendarCell> {
        self.cells().find(|c| c.date == date)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.weeks[0][0].date
    }

    pub fn last_day(&self) -> NaiveDate {
        self.weeks[self.weeks.len() - 1][6].date
    }
}

/// Build the grid for the month containing `reference`.
pub fn build_month_grid(
    reference: NaiveDate,
    week_start: Weekday,
    selected: NaiveDate,
    today: NaiveDate,
    events: &[Event],
) -> MonthGrid {
    let month_start = first_of_month(reference);
    let month_end = last_of_month(reference);
    let grid_start = week_start_on_or_before(month_start, week_start);
    let grid_end = week_end_on_or_after(month_end, week_start);

    let mut weeks = Vec::new();
    let mut week: Vec<CalendarCell> = Vec::with_capacity(7);

    for date in grid_start.iter_days().take_while(|d| *d <= grid_end) {
        let mut day_events: Vec<Event> = events_on(events, date).cloned().collect();
        day_events.sort_by(|a, b| a.display_cmp(b));

        week.push(CalendarCell {
            date,
            in_displayed_month: date.month() == month_start.month()
                && date.year() == month_start.year(),
            is_selected: date == selected,
            is_today: date == today,
            events: day_events,
        });

        if week.len() == 7 {
            if let Ok(full) = <[CalendarCell; 7]>::try_from(std::mem::take(&mut week)) {
                weeks.push(full);
            }
        }
    }

    MonthGrid {
        month: month_start,
        week_start,
        weeks,
    }
}

/// Column order for the header row.
pub fn weekday_headers(week_start: Weekday) -> [Weekday; 7] {
    let mut days = [week_start; 7];
    for i in 1..7 {
        days[i] = days[i - 1].succ();
    }
    days
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first)
}

/// Move by whole months, clamping the day to the target month's length.
pub fn shift_month(date: NaiveDate, delta: i32) -> NaiveDate {
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted.unwrap_or(date)
}

fn week_start_on_or_before(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let back = days_since(date.weekday(), week_start);
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

fn week_end_on_or_after(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let week_end = week_start.pred();
    let forward = days_since(week_end, date.weekday());
    date.checked_add_days(Days::new(forward)).unwrap_or(date)
}

/// Days from `earlier` forward to `later`, in 0..7.
fn days_since(later: Weekday, earlier: Weekday) -> u64 {
    let later = later.num_days_from_monday() as u64;
    let earlier = earlier.num_days_from_monday() as u64;
    (later + 7 - earlier) % 7
}
