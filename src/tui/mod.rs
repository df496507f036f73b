//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for choosing the input file, workbook
//! sheet, and forecast horizon, then renders the monthly trend charts and the
//! report narrative.

use std::io;
use std::path::PathBuf;
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
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Terminal,
};

use crate::app::pipeline::RunOutput;
use crate::cli::TuiArgs;
use crate::domain::{month_index, ReportConfig};
use crate::error::{ReportError, Result};

mod plotters_chart;

use plotters_chart::TrendChart;

/// Start the TUI.
pub fn run(args: TuiArgs) -> Result<()> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| ReportError::Terminal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(args);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()
            .map_err(|e| ReportError::Terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(ReportError::Terminal(format!(
                "Failed to enter alternate screen: {e}"
            )));
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

/// Which of the two report charts is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChartView {
    SalesForecast,
    ProfitMargin,
}

impl ChartView {
    fn title(self) -> &'static str {
        match self {
            ChartView::SalesForecast => "Monthly Sales & Forecast",
            ChartView::ProfitMargin => "Profit & Profit Margin",
        }
    }

    fn next(self) -> Self {
        match self {
            ChartView::SalesForecast => ChartView::ProfitMargin,
            ChartView::ProfitMargin => ChartView::SalesForecast,
        }
    }
}

struct App {
    path_input: String,
    sheet_input: String,
    horizon: usize,
    selected_field: usize,
    editing: bool,
    status: String,
    error: Option<String>,
    run: Option<RunOutput>,
    chart: ChartView,
}

impl App {
    fn new(args: TuiArgs) -> Self {
        let mut app = Self {
            path_input: args
                .input
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            sheet_input: args.sheet.unwrap_or_default(),
            horizon: args.horizon,
            selected_field: 0,
            editing: false,
            status: "Enter a file path, then press g to generate.".to_string(),
            error: None,
            run: None,
            chart: ChartView::SalesForecast,
        };
        if args.input.is_some() {
            app.generate();
        }
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| ReportError::Terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| ReportError::Terminal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read()
                .map_err(|e| ReportError::Terminal(format!("Event read error: {e}")))?
            {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
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

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing {
            self.handle_text_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < 2 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => {
                if self.selected_field < 2 {
                    self.editing = true;
                    let what = if self.selected_field == 0 { "file path" } else { "sheet name" };
                    self.status = format!("Editing {what}. Enter to apply, Esc to cancel.");
                }
            }
            KeyCode::Char('g') => self.generate(),
            KeyCode::Tab => {
                self.chart = self.chart.next();
                self.status = format!("chart: {}", self.chart.title());
            }
            _ => {}
        }

        false
    }

    fn handle_text_edit(&mut self, code: KeyCode) {
        let buf = if self.selected_field == 0 {
            &mut self.path_input
        } else {
            &mut self.sheet_input
        };
        match code {
            KeyCode::Esc => {
                self.editing = false;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing = false;
                self.status = "Press g to generate the report.".to_string();
            }
            KeyCode::Backspace => {
                buf.pop();
            }
            KeyCode::Char(c) => {
                if !c.is_control() {
                    buf.push(c);
                }
            }
            _ => {}
        }
    }

    fn adjust_field(&mut self, delta: i32) {
        if self.selected_field != 2 {
            return;
        }
        let next = if delta >= 0 {
            self.horizon.saturating_add(1)
        } else {
            self.horizon.saturating_sub(1)
        };
        self.horizon = next.clamp(1, 24);
        self.status = format!("horizon: {} months", self.horizon);
    }

    /// Run the full pipeline for the current settings.
    ///
    /// Any pipeline error lands in the error banner; the session never exits
    /// because of a bad file.
    fn generate(&mut self) {
        let path = self.path_input.trim();
        if path.is_empty() {
            self.error = Some("No input file set.".to_string());
            return;
        }
        let sheet = self.sheet_input.trim();
        let config = ReportConfig {
            input: PathBuf::from(path),
            sheet: if sheet.is_empty() { None } else { Some(sheet.to_string()) },
            horizon: self.horizon,
            export_monthly: None,
            export_report: None,
        };

        match crate::app::pipeline::run_report(&config, |stage| {
            // Stages complete faster than a frame renders, so the markers
            // only surface through the final status line here.
            log::debug!("{}... {}%", stage.label(), stage.percent());
        }) {
            Ok(run) => {
                self.error = None;
                self.status = format!(
                    "Report ready: {} months ({} rows used, {} dropped).",
                    run.monthly.records.len(),
                    run.monthly.rows_used,
                    run.monthly.dropped.len()
                );
                self.run = Some(run);
            }
            Err(err) => {
                self.error = Some(err.to_string());
                self.status = "Report failed.".to_string();
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("pulse", Style::default().fg(Color::Cyan)),
            Span::raw(" — Retail Business Performance & Profitability Report"),
        ]));

        if let Some(run) = &self.run {
            let profit_col = run
                .monthly
                .profit_column
                .clone()
                .unwrap_or_else(|| "assumed 20% of sales".to_string());
            lines.push(Line::from(Span::styled(
                format!(
                    "date: {} | sales: {} | profit: {} | months: {}",
                    run.monthly.date_column,
                    run.monthly.sales_column,
                    profit_col,
                    run.monthly.records.len(),
                ),
                Style::default().fg(Color::Gray),
            )));
            lines.push(Line::from(Span::styled(
                format!(
                    "total sales: {} | total profit: {} | avg margin: {}",
                    crate::report::fmt_money(run.metrics.total_sales),
                    crate::report::fmt_money(run.metrics.total_profit),
                    crate::report::fmt_percent(run.metrics.avg_profit_margin),
                ),
                Style::default().fg(Color::Gray),
            )));
        }

        if let Some(err) = &self.error {
            lines.push(Line::from(Span::styled(
                format!("error: {err}"),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(7),
                Constraint::Length(6),
            ])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_narrative(frame, chunks[1]);
        self.draw_settings(frame, chunks[2]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title(self.chart.title()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("No report yet. Set a file path and press g.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        // Chart 1 degrades to an informational placeholder when the series
        // was too short to fit a model.
        if self.chart == ChartView::SalesForecast && run.forecast.is_none() {
            let note = run
                .forecast_note
                .clone()
                .unwrap_or_else(|| "forecast unavailable".to_string());
            let msg = Paragraph::new(crate::report::format_forecast_placeholder(&note))
                .style(Style::default().fg(Color::Yellow))
                .wrap(Wrap { trim: true });
            frame.render_widget(msg, inner);
            return;
        }

        let Some(series) = chart_series(run, self.chart) else {
            return;
        };

        let widget = TrendChart {
            primary: &series.primary,
            secondary: &series.secondary,
            origin: series.origin,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
            x_label: "month",
            y_label: series.y_label,
            fmt_y: fmt_axis_y,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_narrative(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let text = match &self.run {
            Some(run) => run.narrative.clone(),
            None => crate::report::format_fallback_narrative(),
        };
        let p = Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Report Description").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let path_label = if self.path_input.trim().is_empty() {
            "(not set)".to_string()
        } else {
            self.path_input.trim().to_string()
        };
        let sheet_label = if self.sheet_input.trim().is_empty() {
            "(first sheet)".to_string()
        } else {
            self.sheet_input.trim().to_string()
        };

        let items = vec![
            ListItem::new(format!("Input file: {path_label}")),
            ListItem::new(format!("Sheet: {sheet_label}")),
            ListItem::new(format!("Horizon: {} months", self.horizon)),
        ];

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing {
            let hint = Paragraph::new("Editing…")
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ horizon  Enter edit  g generate  Tab chart  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Prepared series for one chart view.
struct ChartSeries {
    primary: Vec<(f64, f64)>,
    secondary: Vec<(f64, f64)>,
    origin: chrono::NaiveDate,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    y_label: String,
}

/// Build chart series for Plotters.
///
/// X values are month offsets from the first observed month so that the
/// spacing between points is uniform per calendar month.
fn chart_series(run: &RunOutput, view: ChartView) -> Option<ChartSeries> {
    let first = run.monthly.records.first()?;
    let origin = first.month;
    let offset = |d: chrono::NaiveDate| (month_index(d) - month_index(origin)) as f64;

    let (primary, secondary, y_label) = match view {
        ChartView::SalesForecast => {
            let actual: Vec<(f64, f64)> = run
                .monthly
                .records
                .iter()
                .map(|r| (offset(r.month), r.sales))
                .collect();
            let fitted: Vec<(f64, f64)> = run
                .forecast
                .iter()
                .flat_map(|f| f.points.iter())
                .map(|p| (offset(p.ds), p.yhat))
                .collect();
            (actual, fitted, "sales".to_string())
        }
        ChartView::ProfitMargin => {
            let profit: Vec<(f64, f64)> = run
                .monthly
                .records
                .iter()
                .map(|r| (offset(r.month), r.profit))
                .collect();
            // The margin shares the axis with profit; it hugs the baseline on
            // real data but keeps the two curves in one frame.
            let margin: Vec<(f64, f64)> = run
                .monthly
                .records
                .iter()
                .filter_map(|r| r.profit_margin.map(|m| (offset(r.month), m)))
                .collect();
            (profit, margin, "profit".to_string())
        }
    };

    if primary.is_empty() && secondary.is_empty() {
        return None;
    }

    let mut x_max = 0.0_f64;
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in primary.iter().chain(secondary.iter()) {
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    if !y_min.is_finite() || !y_max.is_finite() {
        return None;
    }
    if y_max <= y_min {
        y_min -= 1.0;
        y_max += 1.0;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);

    Some(ChartSeries {
        primary,
        secondary,
        origin,
        x_bounds: [0.0, x_max.max(1.0)],
        y_bounds: [y_min - pad, y_max + pad],
        y_label,
    })
}

fn fmt_axis_y(v: f64) -> String {
    if v.abs() >= 1000.0 {
        format!("{:.0}", v)
    } else {
        format!("{v:.1}")
    }
}
