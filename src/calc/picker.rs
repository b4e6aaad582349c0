use crate::calc::{DateGridBuilder, SelectableRange, SelectionEngine};
use crate::data::{MonthDescriptor, MonthEntry, MonthGrid, MonthKey, PickerLocale};
use crate::error::PickerError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, info};
use std::collections::HashSet;

/// Maximum number of dates a range selection can hold.
pub const MAX_SELECTED_DATES: usize = 2;

/// Receives scroll requests whenever the active selection's month changes.
pub trait Scroller {
    fn scroll_to_month(&mut self, position: usize, smooth: bool);
}

/// Discards scroll requests.
impl Scroller for () {
    fn scroll_to_month(&mut self, _position: usize, _smooth: bool) {}
}

/// Draws one month. Fed every month of the range in order by `render_with`.
pub trait MonthRenderer {
    fn render_month(&mut self, position: usize, month: &MonthDescriptor, grid: &MonthGrid);
}

/// Caller-supplied state evaluated once per range-init.
#[derive(Debug, Clone, Default)]
pub struct GridContext {
    pub today: NaiveDate,
    pub highlighted: HashSet<NaiveDate>,
}

impl GridContext {
    pub fn new(today: NaiveDate) -> Self {
        GridContext {
            today,
            highlighted: HashSet::new(),
        }
    }

    pub fn with_highlights(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.highlighted.extend(dates);
        self
    }
}

/// Entry point of the picker: validates range-init parameters, builds the
/// grids and forwards selections and scroll requests.
pub struct CalendarPicker<S: Scroller = ()> {
    scroller: S,
    engine: Option<SelectionEngine>,
    locale: PickerLocale,
    today: Option<NaiveDate>,
}

impl<S: Scroller> CalendarPicker<S> {
    pub fn new(scroller: S) -> Self {
        CalendarPicker {
            scroller,
            engine: None,
            locale: PickerLocale::default(),
            today: None,
        }
    }

    /// Rebuilds every month grid for `[min, max)` and clears the selection.
    ///
    /// Nothing is touched unless the bounds and locale are valid.
    pub fn init_range(
        &mut self,
        min: NaiveDateTime,
        max: NaiveDateTime,
        locale: &PickerLocale,
        context: &GridContext,
    ) -> Result<GridHandle<'_, S>, PickerError> {
        let range = SelectableRange::new(min, max)?;
        let builder = DateGridBuilder::new(locale, context.today, &context.highlighted)?;
        let index = builder.build(&range)?;

        info!(
            "range initialised: [{}, {}) with {} month(s)",
            range.min(),
            range.max(),
            index.len()
        );
        self.engine = Some(SelectionEngine::new(range, index));
        self.locale = locale.clone();
        self.today = Some(context.today);
        Ok(GridHandle { picker: self })
    }

    /// Date-only convenience over `init_range`.
    pub fn init_date_range(
        &mut self,
        min: NaiveDate,
        max: NaiveDate,
        locale: &PickerLocale,
        context: &GridContext,
    ) -> Result<GridHandle<'_, S>, PickerError> {
        self.init_range(
            min.and_time(NaiveTime::MIN),
            max.and_time(NaiveTime::MIN),
            locale,
            context,
        )
    }

    /// Selects `date`. `smooth` is passed through to the scroller untouched.
    ///
    /// Returns `Ok(false)` without side effects when no selectable cell
    /// matches; fails with `OutOfRange` outside `[min, max)`.
    pub fn select(&mut self, date: NaiveDate, smooth: bool) -> Result<bool, PickerError> {
        let engine = self.engine_mut()?;
        match engine.select(date)? {
            Some(position) => {
                self.scroller.scroll_to_month(position, smooth);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn clear_selection(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.clear_selection();
        }
    }

    /// Feeds every month of the current range to `renderer`, in order.
    pub fn render_with<R: MonthRenderer>(&self, renderer: &mut R) {
        for (position, entry) in self.months().enumerate() {
            renderer.render_month(position, &entry.descriptor, &entry.grid);
        }
    }

    pub fn months(&self) -> impl Iterator<Item = &MonthEntry> {
        self.engine.iter().flat_map(|e| e.index().values())
    }

    pub fn month_count(&self) -> usize {
        self.engine.as_ref().map_or(0, |e| e.index().len())
    }

    pub fn engine(&self) -> Option<&SelectionEngine> {
        self.engine.as_ref()
    }

    pub fn anchors(&self) -> &[NaiveDate] {
        match &self.engine {
            Some(engine) => engine.anchors(),
            None => &[],
        }
    }

    pub fn selected_dates(&self) -> Vec<NaiveDate> {
        self.engine
            .as_ref()
            .map(|e| e.selected_dates())
            .unwrap_or_default()
    }

    pub fn locale(&self) -> &PickerLocale {
        &self.locale
    }

    pub fn scroller(&self) -> &S {
        &self.scroller
    }

    pub fn scroller_mut(&mut self) -> &mut S {
        &mut self.scroller
    }

    fn engine_mut(&mut self) -> Result<&mut SelectionEngine, PickerError> {
        self.engine
            .as_mut()
            .ok_or_else(|| PickerError::invalid_range("no date range has been initialised"))
    }

    /// Scrolls to the first month holding a selected date, else to today's
    /// month. Does nothing when neither is in range.
    fn scroll_to_selected_dates(&mut self) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        let anchor_months: Vec<MonthKey> =
            engine.anchors().iter().map(|d| MonthKey::of(*d)).collect();
        let target = engine
            .index()
            .iter()
            .position(|(key, _)| anchor_months.contains(&key))
            .or_else(|| self.today.and_then(|t| engine.month_position(t)));
        if let Some(position) = target {
            debug!("initial scroll to month {position}");
            self.scroller.scroll_to_month(position, false);
        }
    }
}

/// Returned by range-init; used to apply an initial selection.
pub struct GridHandle<'a, S: Scroller> {
    picker: &'a mut CalendarPicker<S>,
}

impl<'a, S: Scroller> GridHandle<'a, S> {
    /// Selects up to two dates in order, then scrolls to the selection.
    ///
    /// All dates are validated before any of them is applied.
    pub fn with_initial_selection(self, dates: &[NaiveDate]) -> Result<Self, PickerError> {
        if dates.len() > MAX_SELECTED_DATES {
            return Err(PickerError::TooManySelections { count: dates.len() });
        }
        let engine = self.picker.engine_mut()?;
        for date in dates {
            engine.check_in_range(*date)?;
        }
        for date in dates {
            engine.select(*date)?;
        }
        self.picker.scroll_to_selected_dates();
        Ok(self)
    }
}
