use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pricing_dashboard::{
    params::parse_value, update_chart, ChartDescription, ParameterField, PricingParameters,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

const SERIES_COLORS: [Color; 3] = [Color::Yellow, Color::Green, Color::Cyan];

pub struct App {
    pub params: PricingParameters,
    pub chart: ChartDescription,
    pub state: TableState,
    pub editing: Option<String>,
    pub error: Option<String>,
}

impl App {
    pub fn new(params: PricingParameters) -> Self {
        let mut state = TableState::default();
        state.select(Some(0));

        Self {
            chart: update_chart(&params),
            params,
            state,
            editing: None,
            error: None,
        }
    }

    pub fn selected_field(&self) -> ParameterField {
        let i = self.state.selected().unwrap_or(0);
        ParameterField::ALL[i.min(ParameterField::ALL.len() - 1)]
    }

    pub fn next(&mut self) {
        let len = ParameterField::ALL.len();
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = ParameterField::ALL.len();
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn start_edit(&mut self, initial: Option<char>) {
        self.editing = Some(initial.map(String::from).unwrap_or_default());
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(buffer) = self.editing.as_mut() {
            buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(buffer) = self.editing.as_mut() {
            buffer.pop();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.error = None;
    }

    /// Apply the edit buffer to the selected field and redraw the chart.
    /// A bad value keeps the old chart and leaves the buffer open for fixing.
    pub fn commit_edit(&mut self) {
        let Some(buffer) = self.editing.as_ref() else {
            return;
        };
        let field = self.selected_field();

        let value = match parse_value(field, buffer) {
            Ok(value) => value.unwrap_or_else(|| field.default_value()),
            Err(e) => {
                self.error = Some(e.to_string());
                return;
            }
        };

        let mut params = self.params;
        params.set(field, value);
        let chart = update_chart(&params);
        if let Err(e) = chart.ensure_finite() {
            self.error = Some(e.to_string());
            return;
        }

        self.params = params;
        self.chart = chart;
        self.editing = None;
        self.error = None;
    }

    pub fn reset(&mut self) {
        self.params = PricingParameters::default();
        self.editing = None;
        self.error = None;
        self.chart = update_chart(&self.params);
    }

    /// Returns false when the user asked to quit
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing.is_some() {
            match code {
                KeyCode::Enter => self.commit_edit(),
                KeyCode::Esc => self.cancel_edit(),
                KeyCode::Backspace => self.backspace(),
                KeyCode::Char(c) if is_number_char(c) => self.push_char(c),
                _ => {}
            }
            return true;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Enter => self.start_edit(None),
            KeyCode::Char('r') => self.reset(),
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' || c == '.' => self.start_edit(Some(c)),
            _ => {}
        }
        true
    }
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')
}

/// Y range covering every series, padded so flat lines stay visible
pub fn y_bounds(chart: &ChartDescription) -> [f64; 2] {
    let values = chart.series.iter().flat_map(|s| s.y.iter().copied());
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }

    let pad = if max > min { (max - min) * 0.05 } else { max.abs().max(1.0) * 0.1 };
    [min - pad, max + pad]
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    event_loop_outcome(res)
}

/// Event loop failures reach `main` once the terminal is restored
fn event_loop_outcome(res: io::Result<()>) -> Result<()> {
    res.context("Terminal dashboard failed")
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !app.handle_key(key.code) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35), // Form + summary
            Constraint::Percentage(65), // Chart
        ])
        .split(chunks[1]);

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(0)])
        .split(content_chunks[0]);

    render_form(f, left_chunks[0], app);
    render_summary(f, left_chunks[1], app);
    render_chart(f, content_chunks[1], app);

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        "Pricing Strategies",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(best) = app.chart.best_strategy() {
        spans.push(Span::raw("  |  Best over horizon: "));
        spans.push(Span::styled(best.label(), Style::default().fg(Color::Green)));
    }

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_form(f: &mut Frame, area: Rect, app: &mut App) {
    let selected = app.selected_field();

    let rows = ParameterField::ALL.iter().map(|field| {
        let value = match (&app.editing, *field == selected) {
            (Some(buffer), true) => format!("{}_", buffer),
            _ => format!("{}", app.params.get(*field)),
        };

        Row::new(vec![Cell::from(field.label()), Cell::from(value)]).height(1)
    });

    let title = if app.editing.is_some() { " Parameters (editing) " } else { " Parameters " };

    let table = Table::new(rows, [Constraint::Percentage(70), Constraint::Percentage(30)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(title),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_summary(f: &mut Frame, area: Rect, app: &App) {
    let header_cells = ["Strategy", "Total", "Peak"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells).height(1);

    let rows = app
        .chart
        .summaries()
        .into_iter()
        .zip(SERIES_COLORS)
        .map(|(summary, color)| {
            let peak = summary
                .peak_period
                .map(|p| format!("t={}", p))
                .unwrap_or_else(|| "-".to_string());

            Row::new(vec![
                Cell::from(summary.name).style(Style::default().fg(color)),
                Cell::from(format!("{:.0}", summary.total_revenue)),
                Cell::from(peak),
            ])
            .height(1)
        });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(50),
            Constraint::Percentage(30),
            Constraint::Percentage(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Summary "),
    );

    f.render_widget(table, area);
}

fn render_chart(f: &mut Frame, area: Rect, app: &App) {
    let points: Vec<Vec<(f64, f64)>> = app.chart.series.iter().map(|s| s.points()).collect();

    let datasets: Vec<Dataset> = app
        .chart
        .series
        .iter()
        .zip(&points)
        .zip(SERIES_COLORS)
        .map(|((series, data), color)| {
            Dataset::default()
                .name(series.name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(data)
        })
        .collect();

    let last_period = app.chart.time_periods().saturating_sub(1) as f64;
    let [y_min, y_max] = y_bounds(&app.chart);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} ", app.chart.title)),
        )
        .x_axis(
            Axis::default()
                .title(app.chart.x_axis_title.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, last_period])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{}", last_period / 2.0)),
                    Span::raw(format!("{}", last_period)),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(app.chart.y_axis_title.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format!("{:.0}", y_min)),
                    Span::raw(format!("{:.0}", (y_min + y_max) / 2.0)),
                    Span::raw(format!("{:.0}", y_max)),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![];

    if let Some(error) = &app.error {
        status_spans.push(Span::styled(
            format!(" {} ", error),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
        status_spans.push(Span::raw(" | "));
    }

    if app.editing.is_some() {
        status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Apply | "));
        status_spans.push(Span::styled("Esc", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Cancel"));
    } else {
        status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Field | "));
        status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Edit | "));
        status_spans.push(Span::styled("r", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Reset | "));
        status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
        status_spans.push(Span::raw(" Quit"));
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
