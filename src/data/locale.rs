use crate::error::PickerError;
use chrono::format::{Item, StrftimeItems};
use chrono::{Duration, NaiveDate, Weekday};
use std::fmt::Write;

pub const DEFAULT_MONTH_LABEL_FORMAT: &str = "%B %Y";
pub const DEFAULT_WEEKDAY_LABEL_FORMAT: &str = "%a";

/// Locale context threaded through range-init: which weekday starts a row
/// and how month titles and weekday headers are labelled.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerLocale {
    /// `None` means the locale did not specify one; range-init rejects it.
    pub week_start: Option<Weekday>,
    pub month_label_format: String,
    pub weekday_label_format: String,
}

impl Default for PickerLocale {
    fn default() -> Self {
        PickerLocale::new(Weekday::Sun)
    }
}

impl PickerLocale {
    pub fn new(week_start: Weekday) -> Self {
        PickerLocale {
            week_start: Some(week_start),
            month_label_format: DEFAULT_MONTH_LABEL_FORMAT.to_string(),
            weekday_label_format: DEFAULT_WEEKDAY_LABEL_FORMAT.to_string(),
        }
    }

    /// Parses a weekday name such as `sunday` or `Mon`.
    pub fn parse_week_start(name: &str) -> Result<Weekday, PickerError> {
        name.trim()
            .parse::<Weekday>()
            .map_err(|_| PickerError::invalid_range(format!("unknown week start day '{name}'")))
    }

    /// Checks the locale is fully specified and returns the week start.
    pub fn validate(&self) -> Result<Weekday, PickerError> {
        let week_start = self
            .week_start
            .ok_or_else(|| PickerError::invalid_range("locale does not specify a week start day"))?;
        check_format("month label", &self.month_label_format)?;
        check_format("weekday label", &self.weekday_label_format)?;
        Ok(week_start)
    }

    pub fn month_label(&self, date: NaiveDate) -> String {
        format_date(date, &self.month_label_format)
    }

    /// Seven header labels starting at the configured week start. Fails like
    /// range-init when the locale is incomplete.
    pub fn weekday_headers(&self) -> Result<Vec<String>, PickerError> {
        let start = self.validate()?;
        // 2023-01-01 was a Sunday.
        let sunday = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default();
        Ok((0..7)
            .map(|offset| {
                let day = sunday + Duration::days(start.num_days_from_sunday() as i64 + offset);
                format_date(day, &self.weekday_label_format)
            })
            .collect())
    }
}

fn check_format(what: &str, fmt: &str) -> Result<(), PickerError> {
    if fmt.is_empty() {
        return Err(PickerError::invalid_range(format!("{what} format is empty")));
    }
    if StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
        return Err(PickerError::invalid_range(format!(
            "{what} format '{fmt}' is not a valid strftime pattern"
        )));
    }
    Ok(())
}

fn format_date(date: NaiveDate, fmt: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(fmt)).is_err() {
        out.clear();
        out.push_str(&date.format("%Y-%m-%d").to_string());
    }
    out
}
