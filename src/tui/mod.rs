//! Ratatui-based terminal UI.
//!
//! The dashboard shows category tabs, a line chart for the selected series
//! over the selected range, and the searchable, paginated table. Loads run on
//! the background loader; the event loop drains outcomes between input events
//! so the UI stays interactive while a fetch is pending.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs},
    Terminal,
};

use crate::cli::ViewArgs;
use crate::config::CATEGORIES;
use crate::data::{DataSource, LoadOutcome, Loader};
use crate::debug::DebugSnapshot;
use crate::domain::{Category, Dataset, RangeToken};
use crate::error::AppError;
use crate::view::chart::{chart_data, fmt_axis_date, fmt_axis_value};
use crate::view::range::apply_range;
use crate::view::series::select_series;
use crate::view::table::{build_page, TableControls};

mod plotters_chart;

use plotters_chart::SeriesChart;

/// Start the TUI.
pub fn run(args: ViewArgs) -> Result<(), AppError> {
    // Resolve configuration before touching the terminal so errors print
    // normally instead of into the alternate screen.
    let category = crate::app::resolve_category(&args.category)?;
    let source = crate::app::source_from_args(&args)?;
    let active = CATEGORIES
        .iter()
        .position(|c| c.key == category.key)
        .unwrap_or(0);

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::data(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(source, active, args.range);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::data(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::data(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    categories: &'static [Category],
    active: usize,
    range: RangeToken,
    dataset: Dataset,
    series: Option<String>,
    controls: TableControls,
    editing_query: bool,
    query_input: String,
    status: String,
    origin: String,
    loader: Loader,
    /// Total pages of the last rendered table, for page navigation clamping.
    last_total_pages: usize,
}

impl App {
    fn new(source: Box<dyn DataSource>, active: usize, range: RangeToken) -> Self {
        let origin = source.describe();
        let mut app = Self {
            categories: &CATEGORIES,
            active,
            range,
            dataset: Dataset::default(),
            series: None,
            controls: TableControls::default(),
            editing_query: false,
            query_input: String::new(),
            status: String::new(),
            origin,
            loader: Loader::spawn(source),
            last_total_pages: 1,
        };
        app.reload();
        app
    }

    fn active_category(&self) -> &'static Category {
        &self.categories[self.active]
    }

    /// Request a (re)load of the active category. Any in-flight load is
    /// superseded; its result will be discarded on arrival.
    fn reload(&mut self) {
        let category = self.active_category();
        self.loader.request(category);
        self.status = format!("Loading {}...", category.label);
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            while let Some(outcome) = self.loader.poll() {
                self.apply_outcome(outcome);
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::data(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::data(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::data(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Publish a load outcome. The loader has already discarded anything
    /// superseded, so whatever arrives here belongs to the active category.
    fn apply_outcome(&mut self, outcome: LoadOutcome) {
        match outcome {
            LoadOutcome::Loaded { category, dataset } => {
                // Re-derive the selection on every load; keep it only while
                // the new column set still contains it.
                self.series = select_series(self.series.as_deref(), &dataset.columns);
                self.controls.reset();
                self.status = format!("Loaded {} rows for {}.", dataset.len(), category.label);
                self.dataset = dataset;
            }
            LoadOutcome::Failed { category, error } => {
                // Prior dataset stays visible; only the status changes.
                self.status = format!("Load of {} failed: {error}", category.label);
            }
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        if self.editing_query {
            return self.handle_query_edit(code);
        }

        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Tab => {
                self.active = (self.active + 1) % self.categories.len();
                self.reload();
            }
            KeyCode::BackTab => {
                self.active = (self.active + self.categories.len() - 1) % self.categories.len();
                self.reload();
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                if index < self.categories.len() && index != self.active {
                    self.active = index;
                    self.reload();
                }
            }
            KeyCode::Char('r') => {
                self.range = self.range.next();
                self.status = format!("range: {}", self.range.key());
            }
            KeyCode::Char('R') => {
                self.range = self.range.prev();
                self.status = format!("range: {}", self.range.key());
            }
            KeyCode::Char('s') => self.cycle_series(1),
            KeyCode::Char('S') => self.cycle_series(-1),
            KeyCode::Char('/') => {
                self.editing_query = true;
                self.query_input = self.controls.query.clone();
                self.status = "Editing search. Enter to apply, Esc to cancel.".to_string();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.controls.next_page_size();
                self.status = format!("{} rows per page", self.controls.page_size());
            }
            KeyCode::Char('-') => {
                self.controls.prev_page_size();
                self.status = format!("{} rows per page", self.controls.page_size());
            }
            KeyCode::Char('n') | KeyCode::PageDown => {
                self.controls.next_page(self.last_total_pages);
            }
            KeyCode::Char('p') | KeyCode::PageUp => {
                self.controls.prev_page();
            }
            KeyCode::Char('g') => self.reload(),
            KeyCode::Char('d') => {
                let snapshot = DebugSnapshot {
                    category: self.active_category(),
                    dataset: &self.dataset,
                    range: self.range,
                    series: self.series.as_deref(),
                    query: &self.controls.query,
                    page: self.controls.page,
                    page_size: self.controls.page_size(),
                };
                match crate::debug::write_debug_bundle(&snapshot) {
                    Ok(path) => {
                        self.status = format!("Wrote debug bundle: {}", path.display());
                    }
                    Err(err) => {
                        self.status = format!("Debug write failed: {err}");
                    }
                }
            }
            _ => {}
        }

        Ok(false)
    }

    fn handle_query_edit(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Esc => {
                self.editing_query = false;
                self.status = "Search canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing_query = false;
                self.controls.set_query(self.query_input.clone());
                self.status = if self.controls.query.trim().is_empty() {
                    "Search cleared.".to_string()
                } else {
                    format!("Searching for {:?}.", self.controls.query.trim())
                };
            }
            KeyCode::Backspace => {
                self.query_input.pop();
            }
            KeyCode::Char(c) => {
                if !c.is_control() {
                    self.query_input.push(c);
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn cycle_series(&mut self, step: isize) {
        let columns = &self.dataset.columns;
        if columns.is_empty() {
            self.status = "No series available.".to_string();
            return;
        }
        let current = self
            .series
            .as_deref()
            .and_then(|s| columns.iter().position(|c| c == s))
            .unwrap_or(0);
        let next = (current as isize + step).rem_euclid(columns.len() as isize) as usize;
        self.series = Some(columns[next].clone());
        self.status = format!("series: {}", columns[next]);
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Percentage(45),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_tabs(frame, chunks[1]);
        self.draw_chart(frame, chunks[2]);
        self.draw_table(frame, chunks[3]);
        self.draw_footer(frame, chunks[4]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let loading = if self.loader.in_flight() {
            Span::styled("  loading...", Style::default().fg(Color::Yellow))
        } else {
            Span::raw("")
        };
        let line = Line::from(vec![
            Span::styled("mdash", Style::default().fg(Color::Cyan)),
            Span::raw(" — macro series dashboard | data: "),
            Span::styled(&self.origin, Style::default().fg(Color::Gray)),
            loading,
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_tabs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let titles: Vec<Line> = self
            .categories
            .iter()
            .enumerate()
            .map(|(i, c)| Line::from(format!("{}:{}", i + 1, c.label)))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.active)
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL).title("Categories"));
        frame.render_widget(tabs, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let series_label = self.series.as_deref().unwrap_or("-");
        let title = format!(
            "{} — {} ({})",
            self.active_category().label,
            series_label,
            self.range.key()
        );
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(series) = self.series.as_deref() else {
            let msg = Paragraph::new("No series available.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let windowed = apply_range(&self.dataset.records, self.range);
        let Some(data) = chart_data(windowed, series) else {
            let msg = Paragraph::new("No observations in this window.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let (chart_rect, insets) = chart_layout(inner);
        let widget = SeriesChart {
            segments: &data.segments,
            points: &data.points,
            x_bounds: data.x_bounds,
            y_bounds: data.y_bounds,
            fmt_x: fmt_axis_date,
            fmt_y: fmt_axis_value,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, data.x_bounds, data.y_bounds);
        }
    }

    fn draw_table(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let windowed = apply_range(&self.dataset.records, self.range);
        let page = build_page(windowed, &self.dataset.columns, &self.controls.request());
        self.last_total_pages = page.total_pages;

        let query = self.controls.query.trim();
        let mut title = format!(
            "Table — page {}/{} | {} rows | {} per page",
            page.page, page.total_pages, page.total_rows, page.page_size
        );
        if !query.is_empty() {
            title.push_str(&format!(" | search: {query:?}"));
        }

        let block = Block::default().title(title).borders(Borders::ALL);

        if page.rows.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            if !query.is_empty() {
                let msg = Paragraph::new("No rows match your search.")
                    .style(Style::default().fg(Color::Yellow));
                frame.render_widget(msg, inner);
            }
            return;
        }

        let header_cells: Vec<Cell> = std::iter::once("date")
            .chain(self.dataset.columns.iter().map(String::as_str))
            .map(|name| Cell::from(name.to_string()))
            .collect();
        let header = Row::new(header_cells)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .height(1);

        let rows: Vec<Row> = page
            .rows
            .iter()
            .map(|r| {
                let cells: Vec<Cell> = std::iter::once(r.date.to_string())
                    .chain(r.cells.iter().cloned())
                    .map(Cell::from)
                    .collect();
                Row::new(cells)
            })
            .collect();

        let mut widths = vec![Constraint::Length(12)];
        widths.extend(
            self.dataset
                .columns
                .iter()
                .map(|_| Constraint::Fill(1)),
        );

        let table = Table::new(rows, widths).header(header).block(block);
        frame.render_widget(table, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = if self.editing_query {
            Line::from(vec![
                Span::styled("search: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format!("{}_", self.query_input),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::styled("  (Enter apply, Esc cancel)", Style::default().fg(Color::Gray)),
            ])
        } else {
            let help = "Tab/1-5 category  r range  s series  / search  +/- size  n/p page  g reload  d debug  q quit";
            Line::from(vec![
                Span::styled(help, Style::default().fg(Color::Gray)),
                Span::raw(" | "),
                Span::styled(&self.status, Style::default().fg(Color::Yellow)),
            ])
        };
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 9,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 4
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let style = Style::default().fg(Color::Gray);

    let x_ticks = 4usize;
    for i in 0..x_ticks {
        let u = i as f64 / (x_ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = fmt_axis_date(x_val);
        let label_len = label.len() as u16;
        let start = x.saturating_sub(label_len / 2).max(inner.x);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len.min(inner.x + inner.width - start),
                height: 1,
            },
        );
    }

    let y_ticks = 5usize;
    for i in 0..y_ticks {
        let u = i as f64 / (y_ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_axis_value(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }
}
