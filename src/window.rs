//! Rate-setting windows.
//!
//! Fixed rates can be applied for during a window from the 10th to the 17th
//! (inclusive) of every even month. A `WAIT` verdict means "revisit at the
//! next window".

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const WINDOW_MONTHS: [u32; 6] = [2, 4, 6, 8, 10, 12];
const WINDOW_START_DAY: u32 = 10;
const WINDOW_END_DAY: u32 = 17;

/// An inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn window_for(year: i32, month: u32) -> Option<Window> {
    Some(Window {
        start: NaiveDate::from_ymd_opt(year, month, WINDOW_START_DAY)?,
        end: NaiveDate::from_ymd_opt(year, month, WINDOW_END_DAY)?,
    })
}

pub fn windows_in(year: i32) -> Vec<Window> {
    WINDOW_MONTHS.iter().filter_map(|&m| window_for(year, m)).collect()
}

/// The window open on `today`, if any.
pub fn current_window(today: NaiveDate) -> Option<Window> {
    windows_in(today.year()).into_iter().find(|w| w.contains(today))
}

/// The open window, or else the next one to open.
pub fn next_window(today: NaiveDate) -> Option<Window> {
    windows_in(today.year())
        .into_iter()
        .find(|w| today <= w.end)
        .or_else(|| window_for(today.year() + 1, WINDOW_MONTHS[0]))
}

/// 0 while a window is open.
pub fn days_until_next_window(today: NaiveDate) -> Option<i64> {
    if current_window(today).is_some() {
        return Some(0);
    }
    next_window(today).map(|w| (w.start - today).num_days())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn open_window_is_current_and_next() {
        let today = date(2026, 10, 17);
        let w = current_window(today).unwrap();
        assert_eq!(w.start, date(2026, 10, 10));
        assert_eq!(next_window(today), Some(w));
        assert_eq!(days_until_next_window(today), Some(0));
    }

    #[test]
    fn between_windows_counts_down() {
        let today = date(2026, 10, 18);
        assert_eq!(current_window(today), None);
        assert_eq!(next_window(today).unwrap().start, date(2026, 12, 10));
        assert_eq!(days_until_next_window(today), Some(53));
    }

    #[test]
    fn after_december_rolls_to_february() {
        let today = date(2026, 12, 20);
        assert_eq!(next_window(today).unwrap().start, date(2027, 2, 10));
        assert_eq!(days_until_next_window(today), Some(52));
    }

    #[test]
    fn odd_months_have_no_window() {
        assert_eq!(current_window(date(2026, 11, 12)), None);
        assert_eq!(windows_in(2026).len(), 6);
    }
}
