pub mod grid_builder;
pub mod picker;
pub mod selection;

pub use grid_builder::{DateGridBuilder, SelectableRange};
pub use picker::{CalendarPicker, GridContext, MonthRenderer, Scroller};
pub use selection::SelectionEngine;
