use crate::calc::CalendarPicker;
use crate::cmd::{load_grid_context, resolve_range};
use crate::data::PickerSettings;
use crate::ui::calendar_view::{App, MonthViewport, run_app};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::Result;
use chrono::{Local, NaiveDate};

pub fn run(from: Option<NaiveDate>, to: Option<NaiveDate>, initial: &[NaiveDate]) -> Result<()> {
    let settings = PickerSettings::load()?;
    let locale = settings.locale()?;
    let today = Local::now().date_naive();
    let (min, max) = resolve_range(from, to, &settings, today)?;
    let context = load_grid_context(today)?;

    let mut picker = CalendarPicker::new(MonthViewport::default());
    picker
        .init_date_range(min, max, &locale, &context)?
        .with_initial_selection(initial)?;
    let cursor = initial_cursor(&picker, today);

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen
        );
        original_hook(info);
    }));

    let mut app = App::new(picker, cursor, settings.smooth_scroll)?;
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;

    let anchors = app.picker().anchors();
    if !anchors.is_empty() {
        let dates: Vec<String> = anchors.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect();
        println!("{}", dates.join(" "));
    }
    result
}

/// First selected date if any, else today when in range, else the range start.
fn initial_cursor(picker: &CalendarPicker<MonthViewport>, today: NaiveDate) -> NaiveDate {
    let Some(engine) = picker.engine() else {
        return today;
    };
    if let Some(first) = engine.anchors().first() {
        return *first;
    }
    if engine.range().contains(today) {
        today
    } else {
        engine.range().min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::GridContext;
    use crate::data::PickerLocale;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn picker(today: NaiveDate, initial: &[NaiveDate]) -> CalendarPicker<MonthViewport> {
        let mut p = CalendarPicker::new(MonthViewport::default());
        p.init_date_range(d(2024, 1, 1), d(2024, 4, 1), &PickerLocale::default(), &GridContext::new(today))
            .unwrap()
            .with_initial_selection(initial)
            .unwrap();
        p
    }

    #[test]
    fn test_initial_cursor_prefers_selection() {
        let p = picker(d(2024, 1, 5), &[d(2024, 3, 3)]);
        assert_eq!(initial_cursor(&p, d(2024, 1, 5)), d(2024, 3, 3));
    }

    #[test]
    fn test_initial_cursor_today_in_range() {
        let p = picker(d(2024, 2, 5), &[]);
        assert_eq!(initial_cursor(&p, d(2024, 2, 5)), d(2024, 2, 5));
    }

    #[test]
    fn test_initial_cursor_falls_back_to_range_start() {
        let p = picker(d(2030, 2, 5), &[]);
        assert_eq!(initial_cursor(&p, d(2030, 2, 5)), d(2024, 1, 1));
    }
}
