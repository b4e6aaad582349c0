use crate::data::app_settings::SettingsWrapper;
use crate::data::{Highlight, HighlightData, Persistable};
use anyhow::Result;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

pub fn run() -> Result<()> {
    let dir = crate::data::persistence::get_data_dir()?;
    fs::create_dir_all(&dir)?;
    run_in_dir(&dir)?;
    println!("Data files initialized successfully.");
    Ok(())
}

/// Writes all default data files into `dir`.
pub(crate) fn run_in_dir(dir: &Path) -> Result<()> {
    write_config(dir)?;
    write_highlights(dir)?;
    Ok(())
}

fn write_config(dir: &Path) -> Result<()> {
    SettingsWrapper::default().save_to(dir)?;
    log::info!("wrote {}", dir.join(SettingsWrapper::filename()).display());
    Ok(())
}

fn write_highlights(dir: &Path) -> Result<()> {
    let mut data = HighlightData::default();
    for (name, date) in default_highlights() {
        data.add(Highlight::new(name, date));
    }
    data.save_to(dir)?;
    log::info!("wrote {}", dir.join(HighlightData::filename()).display());
    Ok(())
}

fn default_highlights() -> Vec<(&'static str, NaiveDate)> {
    [
        ("New Year's Day", (2026, 1, 1)),
        ("Independence Day", (2026, 7, 4)),
        ("Christmas Day", (2026, 12, 25)),
        ("New Year's Day", (2027, 1, 1)),
    ]
    .into_iter()
    .filter_map(|(name, (y, m, d))| NaiveDate::from_ymd_opt(y, m, d).map(|date| (name, date)))
    .collect()
}
