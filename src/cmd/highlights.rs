use crate::data::{HighlightData, Persistable};
use anyhow::Result;

pub fn run() -> Result<()> {
    let data = HighlightData::load()?;
    write_highlights(&data, &mut std::io::stdout())
}

pub(crate) fn write_highlights<W: std::io::Write>(data: &HighlightData, out: &mut W) -> Result<()> {
    writeln!(out, "Highlights")?;
    writeln!(out, "---")?;
    writeln!(out, "  {:<14} {}", "Date", "Name")?;
    for h in data.sorted() {
        writeln!(out, "  {:<14} {}", h.date.format("%Y-%m-%d").to_string(), h.name)?;
    }
    writeln!(out, "---")?;
    writeln!(out, "Total: {} highlight(s)", data.highlights.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Highlight;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn render(highlights: Vec<Highlight>) -> String {
        let data = HighlightData { highlights };
        let mut buf = Vec::new();
        write_highlights(&data, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_highlights_empty() {
        let out = render(vec![]);
        assert!(out.starts_with("Highlights\n"));
        assert!(out.contains("Total: 0 highlight(s)"));
    }

    #[test]
    fn test_write_highlights_single() {
        let out = render(vec![Highlight::new("Release", d(2025, 6, 2))]);
        assert!(out.contains("  2025-06-02     Release"));
        assert!(out.contains("Total: 1 highlight(s)"));
    }

    #[test]
    fn test_write_highlights_listed_by_date() {
        let out = render(vec![
            Highlight::new("Late", d(2025, 9, 1)),
            Highlight::new("Early", d(2025, 2, 1)),
        ]);
        let early = out.find("Early").unwrap();
        let late = out.find("Late").unwrap();
        assert!(early < late);
        assert!(out.contains("Total: 2 highlight(s)"));
    }
}
