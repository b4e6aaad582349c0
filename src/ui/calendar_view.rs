use crate::calc::{CalendarPicker, MonthRenderer, Scroller};
use crate::data::{DayCell, MonthDescriptor, MonthGrid, RangeState};
use crate::error::PickerError;
use anyhow::Result;
use chrono::{Duration, NaiveDate};
use crossterm::event::{self, Event as CEvent, KeyCode, KeyModifiers};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::io::Stdout;
use std::time::Duration as StdDuration;

/// Months drawn side by side.
const VISIBLE_MONTHS: usize = 3;
const MONTH_WIDTH: u16 = 21;
const GAP_WIDTH: u16 = 4;

// Range endpoint / single selection background
const ANCHOR_COLOR: Color = Color::Yellow;
// Range interior background
const MIDDLE_COLOR: Color = Color::Indexed(58);

/// Scroll position of the month list. The picker moves it on selection.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MonthViewport {
    pub top: usize,
    /// Whether the last picker-driven scroll asked for animation.
    pub last_smooth: bool,
}

impl Scroller for MonthViewport {
    fn scroll_to_month(&mut self, position: usize, smooth: bool) {
        self.top = position;
        self.last_smooth = smooth;
    }
}

pub struct App {
    picker: CalendarPicker<MonthViewport>,
    /// Keyboard cursor, always inside the active range.
    cursor: NaiveDate,
    smooth_scroll: bool,
    /// Weekday header labels, fixed for the lifetime of the range.
    headers: Vec<String>,
    /// Result of the last action (message, color). Cleared on next keypress.
    status: Option<(String, Color)>,
}

impl App {
    pub fn new(
        picker: CalendarPicker<MonthViewport>,
        cursor: NaiveDate,
        smooth_scroll: bool,
    ) -> Result<Self, PickerError> {
        let headers = picker.locale().weekday_headers()?;
        let mut app = App {
            picker,
            cursor,
            smooth_scroll,
            headers,
            status: None,
        };
        app.follow_cursor();
        Ok(app)
    }

    pub fn picker(&self) -> &CalendarPicker<MonthViewport> {
        &self.picker
    }

    fn in_range(&self, date: NaiveDate) -> bool {
        self.picker
            .engine()
            .is_some_and(|e| e.range().contains(date))
    }

    fn move_cursor(&mut self, days: i64) {
        if let Some(d) = self.cursor.checked_add_signed(Duration::days(days)) {
            if self.in_range(d) {
                self.cursor = d;
                self.follow_cursor();
            }
        }
    }

    /// Describes the day under the cursor, shown when there is no status.
    fn cursor_label(&self) -> String {
        let Some(cell) = self.picker.engine().and_then(|e| e.cell(self.cursor)) else {
            return self.cursor.format("%Y-%m-%d").to_string();
        };
        let mut label = cell.date.format("%a %Y-%m-%d").to_string();
        if cell.is_today {
            label.push_str("  today");
        }
        if cell.is_highlighted {
            label.push_str("  highlighted");
        }
        if !cell.is_selectable {
            label.push_str("  not selectable");
        }
        label
    }

    fn max_top(&self) -> usize {
        self.picker.month_count().saturating_sub(VISIBLE_MONTHS)
    }

    fn top(&self) -> usize {
        self.picker.scroller().top.min(self.max_top())
    }

    /// Scrolls just enough to keep the cursor's month on screen.
    fn follow_cursor(&mut self) {
        let Some(pos) = self.picker.engine().and_then(|e| e.month_position(self.cursor)) else {
            return;
        };
        let top = self.top();
        let viewport = self.picker.scroller_mut();
        if pos < top {
            viewport.top = pos;
        } else if pos >= top + VISIBLE_MONTHS {
            viewport.top = pos + 1 - VISIBLE_MONTHS;
        }
    }

    fn scroll_by(&mut self, delta: isize) {
        let top = self.top().saturating_add_signed(delta).min(self.max_top());
        self.picker.scroller_mut().top = top;
    }

    fn select_cursor(&mut self) {
        self.status = match self.picker.select(self.cursor, self.smooth_scroll) {
            Ok(true) => Some((selection_summary(self.picker.anchors()), Color::Green)),
            Ok(false) => Some((format!("{} cannot be selected", self.cursor), Color::DarkGray)),
            Err(e) => Some((e.to_string(), Color::Red)),
        };
        self.follow_cursor();
    }

    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        self.status = None;
        match code {
            KeyCode::Left => self.move_cursor(-1),
            KeyCode::Right => self.move_cursor(1),
            KeyCode::Up => self.move_cursor(-7),
            KeyCode::Down => self.move_cursor(7),
            KeyCode::PageUp => self.scroll_by(-1),
            KeyCode::PageDown => self.scroll_by(1),
            KeyCode::Enter | KeyCode::Char(' ') => self.select_cursor(),
            KeyCode::Esc => {
                self.picker.clear_selection();
                self.status = Some(("Selection cleared".to_string(), Color::DarkGray));
            }
            KeyCode::Char('t') => {
                let today = self
                    .picker
                    .months()
                    .flat_map(|m| m.grid.cells())
                    .find(|c| c.is_today && c.is_current_month)
                    .map(|c| c.date);
                if let Some(today) = today.filter(|d| self.in_range(*d)) {
                    self.cursor = today;
                    self.follow_cursor();
                }
            }
            KeyCode::Char('q') => return true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            _ => {}
        }
        false
    }

    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // selection summary
                Constraint::Length(9), // months: title + weekday header + up to 6 rows + padding
                Constraint::Length(1), // status
                Constraint::Min(4),    // help
            ])
            .split(f.area());

        let summary = Paragraph::new(Line::from(Span::styled(
            selection_summary(self.picker.anchors()),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        f.render_widget(summary, chunks[0]);

        self.render_months(f, chunks[1]);

        let (msg, color) = match &self.status {
            Some((msg, color)) => (msg.clone(), *color),
            None => (self.cursor_label(), Color::Gray),
        };
        f.render_widget(
            Paragraph::new(Span::styled(msg, Style::default().fg(color))),
            chunks[2],
        );

        let help = Paragraph::new(vec![
            Line::from("←/→/↑/↓ move   Enter/Space select   Esc clear   t today"),
            Line::from("PgUp/PgDn scroll months   q quit"),
        ])
        .block(Block::default().borders(Borders::TOP).title("Keys"));
        f.render_widget(help, chunks[3]);
    }

    fn render_months(&self, f: &mut Frame, area: Rect) {
        if self.picker.month_count() == 0 {
            f.render_widget(Paragraph::new("No months in range."), area);
            return;
        }

        let mut constraints = Vec::with_capacity(VISIBLE_MONTHS * 2);
        for _ in 0..VISIBLE_MONTHS {
            constraints.push(Constraint::Length(MONTH_WIDTH));
            constraints.push(Constraint::Length(GAP_WIDTH));
        }
        constraints.push(Constraint::Min(0));
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        let mut lines = MonthLines::new(self.top(), VISIBLE_MONTHS, self.cursor, &self.headers);
        self.picker.render_with(&mut lines);

        for (i, month) in lines.months.into_iter().enumerate() {
            let widget = Paragraph::new(month).block(Block::default().borders(Borders::NONE));
            f.render_widget(widget, columns[i * 2]);
        }
    }
}

/// Projects visible months into ratatui lines.
struct MonthLines<'a> {
    first: usize,
    count: usize,
    cursor: NaiveDate,
    headers: &'a [String],
    months: Vec<Vec<Line<'static>>>,
}

impl<'a> MonthLines<'a> {
    fn new(first: usize, count: usize, cursor: NaiveDate, headers: &'a [String]) -> Self {
        MonthLines {
            first,
            count,
            cursor,
            headers,
            months: Vec::with_capacity(count),
        }
    }
}

impl MonthRenderer for MonthLines<'_> {
    fn render_month(&mut self, position: usize, month: &MonthDescriptor, grid: &MonthGrid) {
        if position < self.first || position >= self.first + self.count {
            return;
        }
        let header: String = self
            .headers
            .iter()
            .map(|h| format!("{:<2}", h.chars().take(2).collect::<String>()))
            .collect::<Vec<_>>()
            .join(" ");

        let mut lines = vec![
            Line::from(Span::styled(
                format!("{:^21}", month.label),
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )),
            Line::from(header),
        ];
        for week in &grid.weeks {
            let mut spans = Vec::with_capacity(week.len() * 2);
            for cell in week {
                let is_cursor = cell.is_current_month && cell.date == self.cursor;
                spans.push(Span::styled(
                    format!("{:2}", cell.day_of_month),
                    calendar_day_style(cell, is_cursor),
                ));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }
        self.months.push(lines);
    }
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;
        if event::poll(StdDuration::from_millis(16))? {
            if let CEvent::Key(key) = event::read()? {
                if app.handle_key(key.code, key.modifiers) {
                    break;
                }
            }
        }
    }
    Ok(())
}

// ── Cell helpers ──────────────────────────────────────────────────────────────

/// Determines the ratatui `Style` for a day cell based on its flags.
pub(crate) fn calendar_day_style(cell: &DayCell, is_cursor: bool) -> Style {
    let mut style = if !cell.is_current_month {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
    } else if cell.is_selected {
        let bg = match cell.range_state {
            RangeState::Middle => MIDDLE_COLOR,
            RangeState::None | RangeState::First | RangeState::Last => ANCHOR_COLOR,
        };
        Style::default()
            .fg(Color::Black)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else if !cell.is_selectable {
        Style::default().add_modifier(Modifier::DIM)
    } else if cell.is_highlighted {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    if cell.is_today && cell.is_current_month {
        style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
    }
    if is_cursor {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

/// One-line description of the current selection.
pub(crate) fn selection_summary(anchors: &[NaiveDate]) -> String {
    match anchors {
        [] => "No selection".to_string(),
        [d] => format!("Selected: {}", d.format("%Y-%m-%d")),
        [a, b, ..] => {
            let (start, end) = if a <= b { (a, b) } else { (b, a) };
            let days = (*end - *start).num_days() + 1;
            format!(
                "Range: {} → {} ({} day{})",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d"),
                days,
                if days == 1 { "" } else { "s" }
            )
        }
    }
}
