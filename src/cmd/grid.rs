use crate::calc::{CalendarPicker, MonthRenderer, Scroller};
use crate::cmd::{load_grid_context, resolve_range};
use crate::data::{DayCell, MonthDescriptor, MonthGrid, PickerSettings, RangeState};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::io::Write;

pub fn run(from: Option<NaiveDate>, to: Option<NaiveDate>, json: bool) -> Result<()> {
    let settings = PickerSettings::load()?;
    let locale = settings.locale()?;
    let today = Local::now().date_naive();
    let (min, max) = resolve_range(from, to, &settings, today)?;
    let context = load_grid_context(today)?;

    let mut picker = CalendarPicker::new(());
    picker.init_date_range(min, max, &locale, &context)?;

    let mut out = std::io::stdout().lock();
    if json {
        write_grid_json(&picker, &mut out)
    } else {
        write_grid(&picker, &mut out)
    }
}

pub(crate) fn write_grid_json<S: Scroller, W: Write>(
    picker: &CalendarPicker<S>,
    out: &mut W,
) -> Result<()> {
    let months: Vec<_> = picker.months().collect();
    serde_json::to_writer_pretty(&mut *out, &months)?;
    writeln!(out)?;
    Ok(())
}

pub(crate) fn write_grid<S: Scroller, W: Write>(picker: &CalendarPicker<S>, out: &mut W) -> Result<()> {
    let headers: String = picker
        .locale()
        .weekday_headers()?
        .iter()
        .map(|h| format!("{:>2} ", h.chars().take(2).collect::<String>()))
        .collect();
    let mut text = TextGrid {
        headers,
        buf: String::new(),
    };
    picker.render_with(&mut text);
    out.write_all(text.buf.as_bytes())?;
    writeln!(out, "Legend: * selected  - in range  ^ today  + highlighted")?;
    writeln!(out, "Total: {} month(s)", picker.month_count())?;
    Ok(())
}

/// Plain-text projection of the month grids.
struct TextGrid {
    headers: String,
    buf: String,
}

impl MonthRenderer for TextGrid {
    fn render_month(&mut self, _position: usize, month: &MonthDescriptor, grid: &MonthGrid) {
        self.buf.push_str(&month.label);
        self.buf.push('\n');
        self.buf.push_str(self.headers.trim_end());
        self.buf.push('\n');
        for week in &grid.weeks {
            let row: String = week.iter().map(cell_text).collect();
            self.buf.push_str(row.trim_end());
            self.buf.push('\n');
        }
        self.buf.push('\n');
    }
}

/// Three columns per cell: right-aligned day plus a one-char marker.
/// Padding cells from adjacent months are blank.
fn cell_text(cell: &DayCell) -> String {
    if !cell.is_current_month {
        return "   ".to_string();
    }
    let marker = if cell.is_selected {
        match cell.range_state {
            RangeState::Middle => '-',
            _ => '*',
        }
    } else if cell.is_today {
        '^'
    } else if cell.is_highlighted {
        '+'
    } else {
        ' '
    };
    format!("{:>2}{}", cell.day_of_month, marker)
}
