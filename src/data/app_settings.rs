use crate::data::locale::{DEFAULT_MONTH_LABEL_FORMAT, DEFAULT_WEEKDAY_LABEL_FORMAT};
use crate::data::persistence::Persistable;
use crate::data::PickerLocale;
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PickerSettings {
    /// Weekday name that starts each week-row. Left unset, range-init fails.
    pub week_start: Option<String>,
    pub month_label_format: String,
    pub weekday_label_format: String,
    /// Length of the default range `[today, today + span_months)`.
    pub span_months: u32,
    pub smooth_scroll: bool,
}

impl Default for PickerSettings {
    fn default() -> Self {
        PickerSettings {
            week_start: Some("sunday".to_string()),
            month_label_format: DEFAULT_MONTH_LABEL_FORMAT.to_string(),
            weekday_label_format: DEFAULT_WEEKDAY_LABEL_FORMAT.to_string(),
            span_months: 12,
            smooth_scroll: false,
        }
    }
}

/// Wrapper that reads the `settings` key from config.yaml.
#[derive(Serialize, Deserialize, Default, Debug)]
pub(crate) struct SettingsWrapper {
    #[serde(default)]
    pub(crate) settings: PickerSettings,
}

impl Persistable for SettingsWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
    fn is_json() -> bool {
        false
    }
}

impl PickerSettings {
    pub fn load() -> Result<Self> {
        Ok(SettingsWrapper::load()?.settings)
    }

    /// Builds the locale context. An unparseable week start is an error; a
    /// missing one is carried through as `None` and rejected at range-init.
    pub fn locale(&self) -> Result<PickerLocale> {
        let week_start = match &self.week_start {
            Some(name) => Some(PickerLocale::parse_week_start(name)?),
            None => None,
        };
        Ok(PickerLocale {
            week_start,
            month_label_format: self.month_label_format.clone(),
            weekday_label_format: self.weekday_label_format.clone(),
        })
    }
}
