pub mod grid;
pub mod highlights;
pub mod init;
pub mod root;
pub mod select;

use crate::calc::grid_builder::add_months;
use crate::calc::GridContext;
use crate::data::{HighlightData, Persistable, PickerSettings};
use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Resolves the `[from, to)` range for a command. Missing bounds default to
/// `[today, today + span_months)`.
pub(crate) fn resolve_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    settings: &PickerSettings,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate)> {
    let from = from.unwrap_or(today);
    let to = match to {
        Some(to) => to,
        None => add_months(from, settings.span_months as i32)
            .with_context(|| format!("cannot add {} months to {}", settings.span_months, from))?,
    };
    Ok((from, to))
}

/// Loads highlights from the data dir into a grid context for `today`.
pub(crate) fn load_grid_context(today: NaiveDate) -> Result<GridContext> {
    let highlights = HighlightData::load()?;
    Ok(GridContext::new(today).with_highlights(highlights.dates()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_resolve_range_defaults_to_span_from_today() {
        let settings = PickerSettings::default();
        let (from, to) = resolve_range(None, None, &settings, d(2025, 3, 15)).unwrap();
        assert_eq!(from, d(2025, 3, 15));
        assert_eq!(to, d(2026, 3, 15));
    }

    #[test]
    fn test_resolve_range_span_counts_from_explicit_start() {
        let settings = PickerSettings {
            span_months: 2,
            ..PickerSettings::default()
        };
        let (from, to) = resolve_range(Some(d(2024, 12, 31)), None, &settings, d(2025, 1, 1)).unwrap();
        assert_eq!(from, d(2024, 12, 31));
        assert_eq!(to, d(2025, 2, 28));
    }

    #[test]
    fn test_resolve_range_explicit_bounds_pass_through() {
        let settings = PickerSettings::default();
        let (from, to) =
            resolve_range(Some(d(2024, 1, 1)), Some(d(2024, 3, 1)), &settings, d(2030, 1, 1)).unwrap();
        assert_eq!((from, to), (d(2024, 1, 1), d(2024, 3, 1)));
    }
}
