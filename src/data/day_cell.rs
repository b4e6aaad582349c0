use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Number of cells in every week-row.
pub const DAYS_PER_WEEK: usize = 7;

/// A cell's position within an active two-date selection.
#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RangeState {
    #[default]
    None,
    First,
    Middle,
    Last,
}

/// Identity of one calendar month: year plus zero-based month (0 = January).
///
/// Ordering is chronological, so keys can be compared directly without
/// worrying about December/January wrap-around.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month0: u32,
}

impl MonthKey {
    pub fn new(year: i32, month0: u32) -> Self {
        MonthKey { year, month0 }
    }

    /// The month that owns `date`.
    pub fn of(date: NaiveDate) -> Self {
        MonthKey::new(date.year(), date.month0())
    }

    /// First day of this month, if the year is representable.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1)
    }

    /// The following month, rolling over into January of the next year.
    pub fn next(&self) -> Self {
        if self.month0 >= 11 {
            MonthKey::new(self.year + 1, 0)
        } else {
            MonthKey::new(self.year, self.month0 + 1)
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month0 + 1)
    }
}

/// Identity and display label of one month in the active range.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MonthDescriptor {
    /// Zero-based month (0 = January).
    pub month: u32,
    pub year: i32,
    /// The date the month counter stood on when this month was emitted.
    pub anchor_date: NaiveDate,
    pub label: String,
}

/// One day's visual and selection state within a month grid.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_selectable: bool,
    pub is_selected: bool,
    pub is_today: bool,
    pub is_highlighted: bool,
    pub day_of_month: u32,
    pub range_state: RangeState,
}

impl DayCell {
    /// Clears selection flags, leaving the build-time flags alone.
    pub fn deselect(&mut self) {
        self.is_selected = false;
        self.range_state = RangeState::None;
    }
}

pub type Week = [DayCell; DAYS_PER_WEEK];

/// Week-row matrix of `DayCell` for one month. Always 4 to 6 complete rows.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct MonthGrid {
    pub weeks: Vec<Week>,
}

/// Coordinates of a cell inside a `MonthGrid`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl MonthGrid {
    pub fn num_rows(&self) -> usize {
        self.weeks.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = &DayCell> {
        self.weeks.iter().flat_map(|w| w.iter())
    }

    pub fn cell(&self, pos: CellPos) -> Option<&DayCell> {
        self.weeks.get(pos.row).and_then(|w| w.get(pos.col))
    }

    pub fn cell_mut(&mut self, pos: CellPos) -> Option<&mut DayCell> {
        self.weeks.get_mut(pos.row).and_then(|w| w.get_mut(pos.col))
    }

    /// Finds the selectable cell for `date`. Padding cells never match.
    pub fn find_selectable(&self, date: NaiveDate) -> Option<CellPos> {
        self.weeks.iter().enumerate().find_map(|(row, week)| {
            week.iter()
                .position(|c| c.date == date && c.is_selectable)
                .map(|col| CellPos { row, col })
        })
    }
}

/// A month descriptor together with its grid, as stored in the index.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MonthEntry {
    pub descriptor: MonthDescriptor,
    pub grid: MonthGrid,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn cell(date: NaiveDate, selectable: bool) -> DayCell {
        DayCell {
            date,
            is_current_month: selectable,
            is_selectable: selectable,
            is_selected: false,
            is_today: false,
            is_highlighted: false,
            day_of_month: date.day(),
            range_state: RangeState::None,
        }
    }

    #[test]
    fn test_month_key_of_date_is_zero_based() {
        let key = MonthKey::of(d(2024, 1, 15));
        assert_eq!(key, MonthKey::new(2024, 0));
    }

    #[test]
    fn test_month_key_next_rolls_year() {
        assert_eq!(MonthKey::new(2024, 11).next(), MonthKey::new(2025, 0));
        assert_eq!(MonthKey::new(2024, 5).next(), MonthKey::new(2024, 6));
    }

    #[test]
    fn test_month_key_ordering_across_years() {
        assert!(MonthKey::new(2023, 11) < MonthKey::new(2024, 0));
        assert!(MonthKey::new(2024, 1) > MonthKey::new(2024, 0));
    }

    #[test]
    fn test_month_key_display_is_one_based() {
        assert_eq!(MonthKey::new(2024, 0).to_string(), "2024-01");
        assert_eq!(MonthKey::new(2024, 11).to_string(), "2024-12");
    }

    #[test]
    fn test_month_key_first_day() {
        assert_eq!(MonthKey::new(2024, 1).first_day(), Some(d(2024, 2, 1)));
    }

    #[test]
    fn test_deselect_resets_selection_flags_only() {
        let mut c = cell(d(2024, 1, 10), true);
        c.is_selected = true;
        c.is_today = true;
        c.range_state = RangeState::Middle;
        c.deselect();
        assert!(!c.is_selected);
        assert_eq!(c.range_state, RangeState::None);
        assert!(c.is_today);
    }

    #[test]
    fn test_find_selectable_skips_padding() {
        let week: Week = std::array::from_fn(|i| {
            let date = d(2024, 1, 31) + chrono::Duration::days(i as i64);
            cell(date, date.month() == 2)
        });
        let grid = MonthGrid { weeks: vec![week] };
        assert_eq!(grid.find_selectable(d(2024, 1, 31)), None);
        assert_eq!(
            grid.find_selectable(d(2024, 2, 2)),
            Some(CellPos { row: 0, col: 2 })
        );
    }

    #[test]
    fn test_range_state_serializes_lowercase() {
        let json = serde_json::to_string(&RangeState::Middle).unwrap();
        assert_eq!(json, "\"middle\"");
    }
}
