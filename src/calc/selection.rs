use crate::calc::SelectableRange;
use crate::data::{CellPos, DayCell, MonthIndex, MonthKey, RangeState};
use crate::error::PickerError;
use chrono::NaiveDate;
use log::debug;

/// Address of a cell: month position in the index plus row/column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRef {
    pub month: usize,
    pub pos: CellPos,
}

/// Owns the month grids of one range-init and the selection made on them.
///
/// Cell flags are mutated in place; the grids themselves are only replaced
/// by building a new engine.
#[derive(Debug, Clone)]
pub struct SelectionEngine {
    range: SelectableRange,
    index: MonthIndex,
    /// At most two dates, in the order they were selected.
    anchors: Vec<NaiveDate>,
    /// Every cell currently marked selected. The first two entries are the
    /// anchor cells.
    selected: Vec<CellRef>,
}

impl SelectionEngine {
    pub fn new(range: SelectableRange, index: MonthIndex) -> Self {
        SelectionEngine {
            range,
            index,
            anchors: Vec::with_capacity(2),
            selected: Vec::new(),
        }
    }

    pub fn range(&self) -> &SelectableRange {
        &self.range
    }

    pub fn index(&self) -> &MonthIndex {
        &self.index
    }

    pub fn anchors(&self) -> &[NaiveDate] {
        &self.anchors
    }

    /// Fails with `OutOfRange` unless `date` lies in `[min, max)`.
    pub fn check_in_range(&self, date: NaiveDate) -> Result<(), PickerError> {
        if self.range.contains(date) {
            Ok(())
        } else {
            Err(PickerError::OutOfRange {
                date,
                min: self.range.min(),
                max: self.range.max(),
            })
        }
    }

    /// Selects `date`, returning the position of its month, or `None` when
    /// no selectable cell matches (nothing changes in that case).
    ///
    /// | anchors | event        | result                         |
    /// |---------|--------------|--------------------------------|
    /// | 0       | d            | 1 anchor                       |
    /// | 1 (a)   | d == a       | unchanged                      |
    /// | 1 (a)   | d > a        | 2 anchors, range [a, d] marked |
    /// | 1 (a)   | d < a        | cleared, 1 anchor (d)          |
    /// | 2       | d            | cleared, 1 anchor (d)          |
    pub fn select(&mut self, date: NaiveDate) -> Result<Option<usize>, PickerError> {
        self.check_in_range(date)?;

        let key = MonthKey::of(date);
        let month = self.index.index_of(key)?;
        let Some(pos) = self
            .index
            .at(month)
            .and_then(|entry| entry.grid.find_selectable(date))
        else {
            debug!("no selectable cell for {date} in {key}");
            return Ok(None);
        };
        let target = CellRef { month, pos };

        if self.anchors.as_slice() == [date] {
            debug!("{date} is already the selected date");
            return Ok(Some(month));
        }

        self.reset_range_states();
        let backward = self.anchors.len() == 1 && date < self.anchors[0];
        if self.anchors.len() > 1 || backward {
            debug!(
                "clearing {} selected cell(s) before selecting {date}",
                self.selected.len()
            );
            self.clear_selection();
        }

        if let Some(cell) = self.cell_mut(target) {
            cell.is_selected = true;
        }
        self.selected.push(target);
        self.anchors.push(date);

        if self.anchors.len() == 2 {
            self.mark_range()?;
            debug!(
                "selected range [{}, {}] spanning {} cell(s)",
                self.anchors[0],
                self.anchors[1],
                self.selected.len()
            );
        } else {
            debug!("selected {date}");
        }
        Ok(Some(month))
    }

    /// Deselects every selected cell and forgets the anchors.
    pub fn clear_selection(&mut self) {
        for r in std::mem::take(&mut self.selected) {
            if let Some(cell) = self.cell_mut(r) {
                cell.deselect();
            }
        }
        self.anchors.clear();
    }

    /// Dates of all selected cells in chronological order.
    pub fn selected_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.selected_cells().map(|c| c.date).collect();
        dates.sort();
        dates
    }

    pub fn selected_cells(&self) -> impl Iterator<Item = &DayCell> {
        self.selected.iter().filter_map(|r| self.cell_at(*r))
    }

    /// The in-month cell for `date`, selectable or not.
    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell> {
        self.index
            .get(MonthKey::of(date))
            .ok()?
            .grid
            .cells()
            .find(|c| c.date == date && c.is_current_month)
    }

    pub fn month_position(&self, date: NaiveDate) -> Option<usize> {
        self.index.index_of(MonthKey::of(date)).ok()
    }

    fn cell_at(&self, r: CellRef) -> Option<&DayCell> {
        self.index.at(r.month)?.grid.cell(r.pos)
    }

    fn cell_mut(&mut self, r: CellRef) -> Option<&mut DayCell> {
        self.index.at_mut(r.month)?.grid.cell_mut(r.pos)
    }

    fn reset_range_states(&mut self) {
        for i in 0..self.selected.len() {
            let r = self.selected[i];
            if let Some(cell) = self.cell_mut(r) {
                cell.range_state = RangeState::None;
            }
        }
    }

    /// Marks the two anchor cells as endpoints and every selectable cell
    /// strictly between them as selected interior cells.
    fn mark_range(&mut self) -> Result<(), PickerError> {
        let (start, end) = (self.anchors[0], self.anchors[1]);
        let (first, last) = (self.selected[0], self.selected[1]);
        if let Some(cell) = self.cell_mut(first) {
            cell.range_state = RangeState::First;
        }
        if let Some(cell) = self.cell_mut(last) {
            cell.range_state = RangeState::Last;
        }

        let start_month = self.index.index_of(MonthKey::of(start))?;
        let end_month = self.index.index_of(MonthKey::of(end))?;
        for month in start_month..=end_month {
            let Some(entry) = self.index.at_mut(month) else {
                continue;
            };
            for (row, week) in entry.grid.weeks.iter_mut().enumerate() {
                for (col, cell) in week.iter_mut().enumerate() {
                    if cell.is_selectable && cell.date > start && cell.date < end {
                        cell.is_selected = true;
                        cell.range_state = RangeState::Middle;
                        self.selected.push(CellRef {
                            month,
                            pos: CellPos { row, col },
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::DateGridBuilder;
    use crate::data::PickerLocale;
    use chrono::NaiveTime;
    use std::collections::HashSet;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn engine(min: NaiveDate, max: NaiveDate) -> SelectionEngine {
        let locale = PickerLocale::default();
        let highlighted = HashSet::new();
        let range =
            SelectableRange::new(min.and_time(NaiveTime::MIN), max.and_time(NaiveTime::MIN)).unwrap();
        let index = DateGridBuilder::new(&locale, min, &highlighted)
            .unwrap()
            .build(&range)
            .unwrap();
        SelectionEngine::new(range, index)
    }

    fn jan_feb_2024() -> SelectionEngine {
        engine(d(2024, 1, 1), d(2024, 3, 1))
    }

    fn state(e: &SelectionEngine, date: NaiveDate) -> (bool, RangeState) {
        let c = e.cell(date).unwrap();
        (c.is_selected, c.range_state)
    }

    /// Every selected cell across all grids, padding included.
    fn all_selected(e: &SelectionEngine) -> Vec<NaiveDate> {
        e.index()
            .values()
            .flat_map(|m| m.grid.cells().filter(|c| c.is_selected).map(|c| c.date))
            .collect()
    }

    // ── single selection ──────────────────────────────────────────────────────

    #[test]
    fn test_single_select_marks_one_cell() {
        let mut e = jan_feb_2024();
        assert_eq!(e.select(d(2024, 1, 10)).unwrap(), Some(0));
        assert_eq!(all_selected(&e), vec![d(2024, 1, 10)]);
        assert_eq!(state(&e, d(2024, 1, 10)), (true, RangeState::None));
        assert_eq!(e.anchors(), &[d(2024, 1, 10)]);
    }

    #[test]
    fn test_select_returns_month_position() {
        let mut e = jan_feb_2024();
        assert_eq!(e.select(d(2024, 2, 14)).unwrap(), Some(1));
    }

    #[test]
    fn test_reselecting_single_date_is_noop() {
        let mut e = jan_feb_2024();
        e.select(d(2024, 1, 10)).unwrap();
        assert_eq!(e.select(d(2024, 1, 10)).unwrap(), Some(0));
        assert_eq!(e.anchors(), &[d(2024, 1, 10)]);
        assert_eq!(all_selected(&e), vec![d(2024, 1, 10)]);
        assert_eq!(state(&e, d(2024, 1, 10)), (true, RangeState::None));
    }

    // ── range selection ───────────────────────────────────────────────────────

    #[test]
    fn test_forward_range_within_month() {
        let mut e = jan_feb_2024();
        e.select(d(2024, 1, 10)).unwrap();
        e.select(d(2024, 1, 20)).unwrap();
        assert_eq!(state(&e, d(2024, 1, 10)), (true, RangeState::First));
        assert_eq!(state(&e, d(2024, 1, 20)), (true, RangeState::Last));
        for day in 11..=19 {
            assert_eq!(state(&e, d(2024, 1, day)), (true, RangeState::Middle));
        }
        assert_eq!(state(&e, d(2024, 1, 9)), (false, RangeState::None));
        assert_eq!(state(&e, d(2024, 1, 21)), (false, RangeState::None));
        assert_eq!(all_selected(&e).len(), 11);
    }

    #[test]
    fn test_forward_range_across_months_skips_padding() {
        let mut e = jan_feb_2024();
        e.select(d(2024, 1, 25)).unwrap();
        e.select(d(2024, 2, 5)).unwrap();
        let selected = all_selected(&e);
        // Jan 25..=31 plus Feb 1..=5, each exactly once.
        assert_eq!(selected.len(), 12);
        assert_eq!(e.selected_dates().first(), Some(&d(2024, 1, 25)));
        assert_eq!(e.selected_dates().last(), Some(&d(2024, 2, 5)));
        assert_eq!(state(&e, d(2024, 1, 31)), (true, RangeState::Middle));
        assert_eq!(state(&e, d(2024, 2, 1)), (true, RangeState::Middle));

        // Jan 28..31 also appear as padding in the February grid; they stay unselected.
        let feb = e.index().at(1).unwrap();
        assert!(
            feb.grid
                .cells()
                .filter(|c| !c.is_current_month)
                .all(|c| !c.is_selected && c.range_state == RangeState::None)
        );
    }

    #[test]
    fn test_adjacent_days_have_no_middle() {
        let mut e = jan_feb_2024();
        e.select(d(2024, 1, 31)).unwrap();
        e.select(d(2024, 2, 1)).unwrap();
        assert_eq!(state(&e, d(2024, 1, 31)), (true, RangeState::First));
        assert_eq!(state(&e, d(2024, 2, 1)), (true, RangeState::Last));
        assert_eq!(all_selected(&e).len(), 2);
    }

    #[test]
    fn test_range_spanning_three_months() {
        let mut e = engine(d(2023, 11, 1), d(2024, 2, 1));
        e.select(d(2023, 11, 30)).unwrap();
        e.select(d(2024, 1, 1)).unwrap();
        // Dec 2023 fully selected in between.
        assert_eq!(e.selected_dates().len(), 33);
        assert_eq!(state(&e, d(2023, 12, 31)), (true, RangeState::Middle));
    }

    // ── clearing transitions ──────────────────────────────────────────────────

    #[test]
    fn test_backward_selection_clears_instead_of_reordering() {
        // Selecting an earlier date after a single anchor starts over with the
        // earlier date rather than forming the range [earlier, anchor].
        let mut e = jan_feb_2024();
        e.select(d(2024, 1, 20)).unwrap();
        e.select(d(2024, 1, 10)).unwrap();
        assert_eq!(e.anchors(), &[d(2024, 1, 10)]);
        assert_eq!(all_selected(&e), vec![d(2024, 1, 10)]);
        assert_eq!(state(&e, d(2024, 1, 20)), (false, RangeState::None));
        assert_eq!(state(&e, d(2024, 1, 10)), (true, RangeState::None));
    }

    #[test]
    fn test_select_after_range_clears_range() {
        let mut e = jan_feb_2024();
        e.select(d(2024, 1, 10)).unwrap();
        e.select(d(2024, 2, 10)).unwrap();
        e.select(d(2024, 1, 25)).unwrap();
        assert_eq!(e.anchors(), &[d(2024, 1, 25)]);
        assert_eq!(all_selected(&e), vec![d(2024, 1, 25)]);
        assert!(
            e.index()
                .values()
                .all(|m| m.grid.cells().all(|c| c.range_state == RangeState::None))
        );
    }

    #[test]
    fn test_new_range_after_cleared_range() {
        let mut e = jan_feb_2024();
        e.select(d(2024, 1, 1)).unwrap();
        e.select(d(2024, 1, 31)).unwrap();
        e.select(d(2024, 2, 10)).unwrap();
        e.select(d(2024, 2, 12)).unwrap();
        assert_eq!(e.selected_dates(), vec![d(2024, 2, 10), d(2024, 2, 11), d(2024, 2, 12)]);
        assert_eq!(state(&e, d(2024, 2, 10)), (true, RangeState::First));
        assert_eq!(state(&e, d(2024, 2, 11)), (true, RangeState::Middle));
        assert_eq!(state(&e, d(2024, 2, 12)), (true, RangeState::Last));
        assert_eq!(state(&e, d(2024, 1, 15)), (false, RangeState::None));
    }

    #[test]
    fn test_clear_selection_resets_everything() {
        let mut e = jan_feb_2024();
        e.select(d(2024, 1, 3)).unwrap();
        e.select(d(2024, 1, 6)).unwrap();
        e.clear_selection();
        assert!(e.anchors().is_empty());
        assert!(all_selected(&e).is_empty());
        assert_eq!(e.selected_cells().count(), 0);
    }

    // ── errors ────────────────────────────────────────────────────────────────

    #[test]
    fn test_out_of_range_leaves_state_unchanged() {
        let mut e = jan_feb_2024();
        e.select(d(2024, 1, 10)).unwrap();
        e.select(d(2024, 1, 12)).unwrap();
        let before = e.selected_dates();

        for date in [d(2023, 12, 31), d(2024, 3, 1), d(2025, 1, 1)] {
            let err = e.select(date).unwrap_err();
            assert!(matches!(err, PickerError::OutOfRange { .. }));
        }
        assert_eq!(e.selected_dates(), before);
        assert_eq!(e.anchors(), &[d(2024, 1, 10), d(2024, 1, 12)]);
    }

    #[test]
    fn test_last_day_before_max_is_selectable() {
        let mut e = jan_feb_2024();
        assert_eq!(e.select(d(2024, 2, 29)).unwrap(), Some(1));
    }

    #[test]
    fn test_first_day_of_mid_month_range() {
        let mut e = engine(d(2024, 1, 15), d(2024, 2, 15));
        assert!(e.select(d(2024, 1, 14)).is_err());
        assert!(e.select(d(2024, 1, 15)).unwrap().is_some());
        assert!(e.select(d(2024, 2, 15)).is_err());
    }

    #[test]
    fn test_month_position_lookup() {
        let e = jan_feb_2024();
        assert_eq!(e.month_position(d(2024, 2, 3)), Some(1));
        assert_eq!(e.month_position(d(2024, 5, 3)), None);
    }
}
