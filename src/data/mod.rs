pub mod app_settings;
pub mod day_cell;
pub mod highlight;
pub mod locale;
pub mod month_index;
pub mod persistence;

pub use app_settings::PickerSettings;
pub use day_cell::{
    CellPos, DayCell, MonthDescriptor, MonthEntry, MonthGrid, MonthKey, RangeState, Week,
};
pub use highlight::{Highlight, HighlightData};
pub use locale::PickerLocale;
pub use month_index::MonthIndex;
pub use persistence::Persistable;
