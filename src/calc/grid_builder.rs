use crate::data::day_cell::DAYS_PER_WEEK;
use crate::data::{
    DayCell, MonthDescriptor, MonthEntry, MonthGrid, MonthIndex, MonthKey, PickerLocale,
    RangeState, Week,
};
use crate::error::PickerError;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use log::{info, trace};
use std::collections::HashSet;

/// The active `[min, max)` range, both ends normalized to midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectableRange {
    min: NaiveDateTime,
    max: NaiveDateTime,
}

impl SelectableRange {
    /// Fails with `InvalidRange` when `min` is after `max` (after normalization).
    pub fn new(min: NaiveDateTime, max: NaiveDateTime) -> Result<Self, PickerError> {
        let min = midnight(min.date());
        let max = midnight(max.date());
        if min > max {
            return Err(PickerError::invalid_range(format!(
                "min date {} is after max date {}",
                min.date(),
                max.date()
            )));
        }
        Ok(SelectableRange { min, max })
    }

    pub fn min(&self) -> NaiveDate {
        self.min.date()
    }

    /// Exclusive upper bound.
    pub fn max(&self) -> NaiveDate {
        self.max.date()
    }

    /// The effective upper bound used for month iteration: one minute before
    /// `max`, so a `max` on the 1st does not pull in that month. Fails when
    /// `max` is the earliest representable date.
    pub fn last_instant(&self) -> Result<NaiveDateTime, PickerError> {
        self.max
            .checked_sub_signed(Duration::minutes(1))
            .ok_or_else(|| {
                PickerError::invalid_range(format!("max date {} has no predecessor", self.max.date()))
            })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        let at = midnight(date);
        at >= self.min && at < self.max
    }
}

/// Builds the month grids for a range. Pure given its inputs.
pub struct DateGridBuilder<'a> {
    locale: &'a PickerLocale,
    week_start: Weekday,
    today: NaiveDate,
    highlighted: &'a HashSet<NaiveDate>,
}

impl<'a> DateGridBuilder<'a> {
    pub fn new(
        locale: &'a PickerLocale,
        today: NaiveDate,
        highlighted: &'a HashSet<NaiveDate>,
    ) -> Result<Self, PickerError> {
        let week_start = locale.validate()?;
        Ok(DateGridBuilder {
            locale,
            week_start,
            today,
            highlighted,
        })
    }

    /// One month entry per calendar month from the month of `range.min()`
    /// through the month of `range.last_instant()`, inclusive.
    pub fn build(&self, range: &SelectableRange) -> Result<MonthIndex, PickerError> {
        let first = MonthKey::of(range.min());
        let last = MonthKey::of(range.last_instant()?.date());

        let span = (last.year - first.year) * 12 + last.month0 as i32 - first.month0 as i32 + 1;
        let mut index = MonthIndex::with_capacity(span.max(0) as usize);
        let mut key = first;
        let mut step = 0;
        // MonthKey orders by (year, month), so December -> January cannot loop.
        while key <= last {
            let anchor_date = add_months(range.min(), step).ok_or_else(|| {
                PickerError::invalid_range(format!("month {key} is not representable"))
            })?;
            let descriptor = MonthDescriptor {
                month: key.month0,
                year: key.year,
                anchor_date,
                label: self.locale.month_label(anchor_date),
            };
            let grid = self.month_grid(key, range)?;
            trace!("built {} with {} week rows", key, grid.num_rows());
            index.put(key, MonthEntry { descriptor, grid });
            key = key.next();
            step += 1;
        }

        info!(
            "built {} month(s) for range [{}, {}) starting {:?}",
            index.len(),
            range.min(),
            range.max(),
            self.week_start
        );
        Ok(index)
    }

    fn month_grid(&self, key: MonthKey, range: &SelectableRange) -> Result<MonthGrid, PickerError> {
        let first = key.first_day().ok_or_else(|| {
            PickerError::invalid_range(format!("month {key} is not representable"))
        })?;

        let mut cursor = shift_days(first, week_start_offset(self.week_start, first.weekday()))?;
        let mut weeks = Vec::with_capacity(6);
        while MonthKey::of(cursor) <= key {
            let mut days = [cursor; DAYS_PER_WEEK];
            for (offset, day) in (0..).zip(days.iter_mut()) {
                *day = shift_days(cursor, offset)?;
            }
            let week: Week = days.map(|date| self.cell(date, key, range));
            weeks.push(week);
            // The row ended on the last representable date, so the month is complete.
            match cursor.checked_add_signed(Duration::days(DAYS_PER_WEEK as i64)) {
                Some(next) => cursor = next,
                None => break,
            }
        }
        Ok(MonthGrid { weeks })
    }

    fn cell(&self, date: NaiveDate, key: MonthKey, range: &SelectableRange) -> DayCell {
        let is_current_month = MonthKey::of(date) == key;
        DayCell {
            date,
            is_current_month,
            is_selectable: is_current_month && range.contains(date),
            is_selected: false,
            is_today: date == self.today,
            is_highlighted: self.highlighted.contains(&date),
            day_of_month: date.day(),
            range_state: RangeState::None,
        }
    }
}

/// Days from the 1st back to the start of its week-row, in `(-7, 0]`.
pub(crate) fn week_start_offset(week_start: Weekday, first_of_month: Weekday) -> i64 {
    let offset =
        week_start.num_days_from_sunday() as i64 - first_of_month.num_days_from_sunday() as i64;
    if offset > 0 { offset - 7 } else { offset }
}

fn shift_days(date: NaiveDate, days: i64) -> Result<NaiveDate, PickerError> {
    date.checked_add_signed(Duration::days(days)).ok_or_else(|| {
        PickerError::invalid_range(format!("{date} shifted by {days} day(s) is not representable"))
    })
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let next = MonthKey::new(year, month.checked_sub(1)?).next();
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = next.first_day()?;
    Some(end.signed_duration_since(start).num_days() as u32)
}

/// Shifts `date` by whole months, clamping the day to the target month's length.
pub(crate) fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let total = date.month0() as i32 + months;
    let new_year = date.year() + total.div_euclid(12);
    let new_month = total.rem_euclid(12) as u32 + 1;
    let new_day = date.day().min(days_in_month(new_year, new_month)?);
    NaiveDate::from_ymd_opt(new_year, new_month, new_day)
}
