use crate::data::persistence::Persistable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Highlight {
    pub name: String,
    pub date: NaiveDate,
}

impl Highlight {
    pub fn new(name: &str, date: NaiveDate) -> Self {
        Highlight {
            name: name.to_string(),
            date,
        }
    }
}

/// Dates drawn highlighted in the grid. Read once per range-init.
#[derive(Serialize, Deserialize, Default, Debug)]
pub struct HighlightData {
    pub highlights: Vec<Highlight>,
}

impl Persistable for HighlightData {
    fn filename() -> &'static str {
        "highlights.yaml"
    }
    fn is_json() -> bool {
        false
    }
}

impl HighlightData {
    pub fn add(&mut self, highlight: Highlight) {
        self.highlights.push(highlight);
    }

    pub fn dates(&self) -> HashSet<NaiveDate> {
        self.highlights.iter().map(|h| h.date).collect()
    }

    /// Highlights sorted by date, for listing.
    pub fn sorted(&self) -> Vec<&Highlight> {
        let mut list: Vec<&Highlight> = self.highlights.iter().collect();
        list.sort_by_key(|h| h.date);
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_highlight_new_sets_fields() {
        let h = Highlight::new("Launch", d(2025, 3, 14));
        assert_eq!(h.name, "Launch");
        assert_eq!(h.date, d(2025, 3, 14));
    }

    #[test]
    fn test_dates_collects_unique_dates() {
        let mut data = HighlightData::default();
        data.add(Highlight::new("A", d(2025, 1, 1)));
        data.add(Highlight::new("B", d(2025, 1, 1)));
        data.add(Highlight::new("C", d(2025, 7, 4)));
        let dates = data.dates();
        assert_eq!(dates.len(), 2);
        assert!(dates.contains(&d(2025, 7, 4)));
    }

    #[test]
    fn test_sorted_orders_by_date() {
        let mut data = HighlightData::default();
        data.add(Highlight::new("Late", d(2025, 12, 25)));
        data.add(Highlight::new("Early", d(2025, 1, 1)));
        let names: Vec<_> = data.sorted().iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Early", "Late"]);
    }

    #[test]
    fn test_yaml_dates_are_iso() {
        let mut data = HighlightData::default();
        data.add(Highlight::new("Review", d(2025, 9, 1)));
        let yaml = serde_norway::to_string(&data).unwrap();
        assert!(yaml.contains("2025-09-01"));
        let parsed: HighlightData = serde_norway::from_str(&yaml).unwrap();
        assert_eq!(parsed.highlights, data.highlights);
    }

    #[test]
    fn test_default_highlight_data_is_empty() {
        assert!(HighlightData::default().dates().is_empty());
    }
}
