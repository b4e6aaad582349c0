use crate::calc::{CalendarPicker, Scroller};
use crate::cmd::{load_grid_context, resolve_range};
use crate::data::PickerSettings;
use anyhow::Result;
use chrono::{Local, NaiveDate};

pub fn run(from: Option<NaiveDate>, to: Option<NaiveDate>, dates: &[NaiveDate]) -> Result<()> {
    let settings = PickerSettings::load()?;
    let locale = settings.locale()?;
    let today = Local::now().date_naive();
    let (min, max) = resolve_range(from, to, &settings, today)?;
    let context = load_grid_context(today)?;

    let mut picker = CalendarPicker::new(());
    picker
        .init_date_range(min, max, &locale, &context)?
        .with_initial_selection(dates)?;
    write_selection(&picker, &mut std::io::stdout())
}

pub(crate) fn write_selection<S: Scroller, W: std::io::Write>(
    picker: &CalendarPicker<S>,
    out: &mut W,
) -> Result<()> {
    let anchors = picker.anchors();
    writeln!(out, "Selection")?;
    writeln!(out, "---")?;
    match anchors {
        [] => writeln!(out, "  (none)")?,
        [single] => writeln!(out, "  {:<8} {}", "Date", single.format("%Y-%m-%d"))?,
        [first, last, ..] => {
            writeln!(out, "  {:<8} {}", "First", first.format("%Y-%m-%d"))?;
            writeln!(out, "  {:<8} {}", "Last", last.format("%Y-%m-%d"))?;
        }
    }
    let labels = month_labels(picker);
    if !labels.is_empty() {
        writeln!(out, "  {:<8} {}", "Months", labels.join(", "))?;
    }
    writeln!(out, "---")?;
    writeln!(out, "Total: {} day(s) selected", picker.selected_dates().len())?;
    Ok(())
}

/// Labels of the months holding at least one selected day, in range order.
fn month_labels<S: Scroller>(picker: &CalendarPicker<S>) -> Vec<String> {
    picker
        .months()
        .filter(|entry| entry.grid.cells().any(|c| c.is_current_month && c.is_selected))
        .map(|entry| entry.descriptor.label.clone())
        .collect()
}
