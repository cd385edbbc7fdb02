use std::io;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, Timelike};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, Gauge, GraphType, List,
        ListItem, Paragraph,
    },
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tui_big_text::{BigText, PixelSize};

use crate::anim::{Animator, COUNTER_DURATION, GAUGE_DURATION};
use crate::data::{short_date_label, trailing_window, Dashboard, SelectedPeriod};
use crate::loader::{self, DataSource, LoadOutcome};

/// Outcome of the most recent load attempt. No history, only the current
/// value; every reload re-enters `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStatus {
    Loading,
    Success,
    Error,
    Warning,
}

impl DisplayStatus {
    /// Unknown kinds get the loading treatment.
    pub fn from_kind(s: &str) -> DisplayStatus {
        match s.trim().to_lowercase().as_str() {
            "success" => DisplayStatus::Success,
            "error" => DisplayStatus::Error,
            "warning" => DisplayStatus::Warning,
            _ => DisplayStatus::Loading,
        }
    }

    pub fn color(self) -> Color {
        match self {
            DisplayStatus::Loading => Color::Yellow,
            DisplayStatus::Success => Color::Green,
            DisplayStatus::Error => Color::Red,
            DisplayStatus::Warning => Color::LightRed,
        }
    }
}

/// Bar treatment for a monthly return is a pure function of sign,
/// recomputed per bar.
pub fn return_color(pct: f64) -> Color {
    if pct >= 0.0 {
        Color::Green
    } else {
        Color::Red
    }
}

/// Gauge widths come straight from the feed's 0-100 scores; values outside
/// that range are clamped for display only.
pub fn gauge_ratio(percent: f64) -> f64 {
    (percent / 100.0).clamp(0.0, 1.0)
}

pub fn period_for_key(c: char) -> Option<SelectedPeriod> {
    match c {
        '1' => Some(SelectedPeriod::Week),
        '2' => Some(SelectedPeriod::Month),
        '3' => Some(SelectedPeriod::Quarter),
        '4' => Some(SelectedPeriod::Year),
        '5' => Some(SelectedPeriod::All),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tab {
    Overview,
    Faq,
}

impl Tab {
    fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Faq => "FAQ",
        }
    }

    fn all() -> &'static [Tab] {
        &[Tab::Overview, Tab::Faq]
    }
}

pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
    pub open: bool,
}

fn default_faqs() -> Vec<FaqEntry> {
    let entries = [
        (
            "How often is the data updated?",
            "The feed files are regenerated externally. The dashboard reloads \
             them on demand (press r) and automatically at the top of each hour.",
        ),
        (
            "What does the risk score mean?",
            "A 0-100 score published with the feed; higher means the account \
             stayed within its drawdown limits more consistently. The dashboard \
             displays it as-is and computes nothing itself.",
        ),
        (
            "What happens if the feed is unreachable?",
            "The dashboard switches to a generated sample dataset and shows a \
             warning status, so the charts never go blank. Reload to retry.",
        ),
        (
            "Can I change the chart window?",
            "Keys 1-5 switch the growth chart between the trailing 7, 30, 90 \
             and 365 days, or the full history.",
        ),
    ];
    entries
        .into_iter()
        .map(|(question, answer)| FaqEntry {
            question,
            answer,
            open: false,
        })
        .collect()
}

#[derive(Debug)]
pub enum AppEvent {
    Loaded(LoadOutcome),
    MinuteTick,
}

/// All dashboard state lives here; background tasks only talk to it
/// through the event channel. Updates overwrite, never merge.
pub struct App {
    pub source: DataSource,
    pub dashboard: Option<Dashboard>,
    pub status: DisplayStatus,
    pub status_message: String,
    pub period: SelectedPeriod,
    pub current_tab: Tab,
    pub animator: Animator,
    pub faqs: Vec<FaqEntry>,
    pub selected_faq: usize,
    pub last_updated: DateTime<Local>,
    pub should_quit: bool,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(source: DataSource, period: SelectedPeriod) -> App {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        App {
            source,
            dashboard: None,
            status: DisplayStatus::Loading,
            status_message: "Loading data...".to_string(),
            period,
            current_tab: Tab::Overview,
            animator: Animator::default(),
            faqs: default_faqs(),
            selected_faq: 0,
            last_updated: Local::now(),
            should_quit: false,
            events_tx,
            events_rx,
        }
    }

    /// Spawns one load cycle. In-flight loads are never cancelled; whichever
    /// finishes last determines the displayed state.
    pub fn request_reload(&mut self) {
        self.status = DisplayStatus::Loading;
        self.status_message = "Loading data...".to_string();

        let source = self.source.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = loader::load_or_sample(&source).await;
            let _ = tx.send(AppEvent::Loaded(outcome));
        });
    }

    /// Drains pending events from background tasks without blocking.
    pub fn drain_events(&mut self, now: Instant) -> bool {
        let mut updated = false;
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                AppEvent::Loaded(outcome) => self.apply_load_outcome(outcome, now),
                AppEvent::MinuteTick => self.on_minute_tick(),
            }
            updated = true;
        }
        updated
    }

    pub fn apply_load_outcome(&mut self, outcome: LoadOutcome, now: Instant) {
        if outcome.fallback {
            self.status = DisplayStatus::Warning;
            self.status_message = "Using sample data".to_string();
        } else {
            self.status = DisplayStatus::Success;
            self.status_message = "Data loaded successfully".to_string();
        }

        let summary = &outcome.dashboard.summary;
        let anim = &mut self.animator;
        anim.set_target("avg_monthly_return", summary.avg_monthly_return, COUNTER_DURATION, now);
        anim.set_target("total_managed", summary.total_managed, COUNTER_DURATION, now);
        anim.set_target(
            "accounts_in_profit",
            f64::from(summary.accounts_in_profit),
            COUNTER_DURATION,
            now,
        );
        anim.set_target("win_rate", summary.win_rate, COUNTER_DURATION, now);
        anim.set_target("risk_score", summary.risk_score, COUNTER_DURATION, now);
        anim.set_target("consistency_score", summary.consistency_score, COUNTER_DURATION, now);
        anim.set_target("win_rate_bar", summary.win_rate, GAUGE_DURATION, now);
        anim.set_target("risk_bar", summary.risk_score, GAUGE_DURATION, now);
        anim.set_target("consistency_bar", summary.consistency_score, GAUGE_DURATION, now);

        self.dashboard = Some(outcome.dashboard);
        self.last_updated = Local::now();
    }

    fn on_minute_tick(&mut self) {
        self.last_updated = Local::now();
        // Full reload at the top of each hour.
        if Local::now().minute() == 0 {
            self.request_reload();
        }
    }

    pub fn select_period(&mut self, period: SelectedPeriod) {
        self.period = period;
    }

    pub fn next_tab(&mut self) {
        let tabs = Tab::all();
        let index = tabs.iter().position(|&t| t == self.current_tab).unwrap_or(0);
        self.current_tab = tabs[(index + 1) % tabs.len()];
    }

    pub fn previous_tab(&mut self) {
        let tabs = Tab::all();
        let index = tabs.iter().position(|&t| t == self.current_tab).unwrap_or(0);
        self.current_tab = tabs[(index + tabs.len() - 1) % tabs.len()];
    }

    pub fn select_next_faq(&mut self) {
        if self.selected_faq < self.faqs.len().saturating_sub(1) {
            self.selected_faq += 1;
        }
    }

    pub fn select_previous_faq(&mut self) {
        self.selected_faq = self.selected_faq.saturating_sub(1);
    }

    pub fn toggle_selected_faq(&mut self) {
        if let Some(entry) = self.faqs.get_mut(self.selected_faq) {
            entry.open = !entry.open;
        }
    }
}

pub async fn run_tui(
    source: DataSource,
    period: SelectedPeriod,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(source, period);
    app.request_reload();

    // Minute-granularity clock refresh; runs for the process lifetime.
    let tick_tx = app.events_tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        interval.tick().await;
        loop {
            interval.tick().await;
            if tick_tx.send(AppEvent::MinuteTick).is_err() {
                break;
            }
        }
    });

    let res = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

async fn run_app<B: Backend<Error = io::Error>>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        app.drain_events(Instant::now());

        if crossterm::event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => {
                            app.should_quit = true;
                        }
                        KeyCode::Char('r') => {
                            app.request_reload();
                        }
                        KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => {
                            app.previous_tab();
                        }
                        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
                            app.next_tab();
                        }
                        KeyCode::Char('j') | KeyCode::Down => {
                            if app.current_tab == Tab::Faq {
                                app.select_next_faq();
                            }
                        }
                        KeyCode::Char('k') | KeyCode::Up => {
                            if app.current_tab == Tab::Faq {
                                app.select_previous_faq();
                            }
                        }
                        KeyCode::Enter => {
                            if app.current_tab == Tab::Faq {
                                app.toggle_selected_faq();
                            }
                        }
                        KeyCode::Char(c) => {
                            if let Some(period) = period_for_key(c) {
                                app.select_period(period);
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn format_dollars(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = format!("{}", rounded.abs());
    let grouped = digits
        .chars()
        .rev()
        .collect::<String>()
        .chars()
        .collect::<Vec<_>>()
        .chunks(3)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(",")
        .chars()
        .rev()
        .collect::<String>();
    if rounded < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    match app.current_tab {
        Tab::Overview => render_overview(f, chunks[1], app),
        Tab::Faq => render_faq(f, chunks[1], app),
    }

    let help_text = match app.current_tab {
        Tab::Overview => "r (reload) | 1-5 (period: 7D/30D/90D/1Y/ALL) | h/l (tabs) | q (quit)",
        Tab::Faq => "j/k (select) | Enter (expand/collapse) | h/l (tabs) | q (quit)",
    };
    let help = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[2]);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let tab_spans: Vec<Span> = Tab::all()
        .iter()
        .flat_map(|t| {
            let style = if *t == app.current_tab {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            [Span::styled(t.title(), style), Span::raw("  ")]
        })
        .collect();
    let tabs = Paragraph::new(Line::from(tab_spans))
        .block(Block::default().borders(Borders::ALL).title("fundview"));
    f.render_widget(tabs, header_chunks[0]);

    let status_line = Line::from(vec![
        Span::styled("● ", Style::default().fg(app.status.color())),
        Span::raw(app.status_message.clone()),
        Span::styled(
            format!(
                "  Updated: {}  {}",
                app.last_updated.format("%b %-d, %Y"),
                app.last_updated.format("%H:%M"),
            ),
            Style::default().fg(Color::Gray),
        ),
    ]);
    let status = Paragraph::new(status_line)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .alignment(Alignment::Right);
    f.render_widget(status, header_chunks[1]);
}

fn render_overview(f: &mut Frame, area: Rect, app: &App) {
    let Some(dashboard) = &app.dashboard else {
        render_loading(f, area);
        return;
    };
    let now = Instant::now();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Length(9),
            Constraint::Min(10),
        ])
        .split(area);

    render_total_managed(f, chunks[0], app, now);
    render_metrics(f, chunks[1], app, dashboard, now);

    let chart_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);

    render_growth_chart(f, chart_chunks[0], app, dashboard);
    render_monthly_chart(f, chart_chunks[1], dashboard);
}

fn render_total_managed(f: &mut Frame, area: Rect, app: &App, now: Instant) {
    let text_value = format_dollars(app.animator.value("total_managed", now));

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Total Managed")
        .title_alignment(Alignment::Center);
    f.render_widget(block, area);

    let big_text = BigText::builder()
        .pixel_size(PixelSize::Quadrant)
        .style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
        .lines(vec![text_value.clone().into()])
        .build();

    let inner = area.inner(ratatui::layout::Margin {
        horizontal: 1,
        vertical: 1,
    });
    let big_text_width = text_value.len() as u16 * 4;
    let centered = if big_text_width < inner.width {
        let margin = (inner.width - big_text_width) / 2;
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(margin),
                Constraint::Min(0),
                Constraint::Length(margin),
            ])
            .split(inner)[1]
    } else {
        inner
    };
    f.render_widget(big_text, centered);
}

fn render_metrics(f: &mut Frame, area: Rect, app: &App, dashboard: &Dashboard, now: Instant) {
    let summary = &dashboard.summary;

    let metric_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let counters = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("Avg Monthly Return:  "),
            Span::styled(
                format!("{}%", app.animator.format("avg_monthly_return", 1, now)),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("Accounts in Profit:  "),
            Span::styled(
                format!(
                    "{} / {}",
                    app.animator.format("accounts_in_profit", 0, now),
                    summary.total_accounts
                ),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ];
    let counters = Paragraph::new(counters)
        .block(Block::default().borders(Borders::ALL).title("Performance"));
    f.render_widget(counters, metric_chunks[0]);

    let gauge_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(metric_chunks[1]);

    let gauges = [
        ("Win Rate", "win_rate", "win_rate_bar", Color::Green),
        ("Risk Score", "risk_score", "risk_bar", Color::Cyan),
        ("Consistency", "consistency_score", "consistency_bar", Color::Magenta),
    ];
    for ((title, counter_id, bar_id, color), chunk) in gauges.into_iter().zip(gauge_chunks.iter()) {
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(title))
            .gauge_style(Style::default().fg(color))
            .ratio(gauge_ratio(app.animator.value(bar_id, now)))
            .label(format!("{}%", app.animator.format(counter_id, 1, now)));
        f.render_widget(gauge, *chunk);
    }
}

fn render_growth_chart(f: &mut Frame, area: Rect, app: &App, dashboard: &Dashboard) {
    let filtered = trailing_window(&dashboard.growth, app.period);
    let title = format!(" Cumulative Growth ({}) ", app.period.label());

    if filtered.is_empty() {
        let empty = Paragraph::new("No growth data")
            .block(Block::default().borders(Borders::ALL).title(title))
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(empty, area);
        return;
    }

    let data: Vec<(f64, f64)> = filtered
        .iter()
        .enumerate()
        .map(|(i, point)| (i as f64, point.value))
        .collect();

    let min_y = filtered.iter().map(|p| p.value).fold(f64::INFINITY, f64::min) * 0.98;
    let max_y = filtered
        .iter()
        .map(|p| p.value)
        .fold(f64::NEG_INFINITY, f64::max)
        * 1.02;

    let datasets = vec![Dataset::default()
        .name("Total Value")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data)];

    let first = filtered
        .first()
        .map(|p| short_date_label(p.date))
        .unwrap_or_default();
    let last = filtered
        .last()
        .map(|p| short_date_label(p.date))
        .unwrap_or_default();

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, (filtered.len().saturating_sub(1)) as f64])
                .labels(vec![Span::raw(first), Span::raw(last)]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([min_y, max_y])
                .labels(vec![
                    Span::raw(format_dollars(min_y)),
                    Span::raw(format_dollars(max_y)),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_monthly_chart(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
    // Bar widgets take unsigned values, so bars show magnitude and the
    // printed value carries the sign.
    let bars: Vec<Bar> = dashboard
        .monthly
        .iter()
        .map(|entry| {
            let color = return_color(entry.pct);
            Bar::default()
                .value((entry.pct.abs() * 10.0).round() as u64)
                .text_value(format!("{:+.1}", entry.pct))
                .label(Line::from(entry.month.as_str()))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect();

    let barchart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Monthly Returns (%) "),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(5)
        .bar_gap(1);

    f.render_widget(barchart, area);
}

fn render_faq(f: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .faqs
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let marker = if entry.open { "▾" } else { "▸" };
            let question_style = if i == app.selected_faq {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let mut lines = vec![Line::from(Span::styled(
                format!("{marker} {}", entry.question),
                question_style,
            ))];
            if entry.open {
                lines.push(Line::from(Span::styled(
                    format!("  {}", entry.answer),
                    Style::default().fg(Color::Gray),
                )));
            }
            lines.push(Line::from(""));
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Frequently Asked Questions"),
    );
    f.render_widget(list, area);
}

fn render_loading(f: &mut Frame, area: Rect) {
    let loading = Paragraph::new("Loading dashboard data...")
        .block(Block::default().borders(Borders::ALL).title("Loading"))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center);
    f.render_widget(loading, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_dashboard;

    #[test]
    fn unknown_status_kind_gets_the_loading_treatment() {
        assert_eq!(DisplayStatus::from_kind("loading"), DisplayStatus::Loading);
        assert_eq!(DisplayStatus::from_kind("success"), DisplayStatus::Success);
        assert_eq!(DisplayStatus::from_kind("error"), DisplayStatus::Error);
        assert_eq!(DisplayStatus::from_kind("warning"), DisplayStatus::Warning);
        assert_eq!(DisplayStatus::from_kind("bogus"), DisplayStatus::Loading);
        assert_eq!(DisplayStatus::from_kind("bogus").color(), Color::Yellow);
    }

    #[test]
    fn return_color_is_a_sign_test_with_zero_positive() {
        assert_eq!(return_color(-2.0), Color::Red);
        assert_eq!(return_color(0.0), Color::Green);
        assert_eq!(return_color(4.2), Color::Green);
    }

    #[test]
    fn gauge_ratio_clamps_out_of_range_scores() {
        assert_eq!(gauge_ratio(84.5), 0.845);
        assert_eq!(gauge_ratio(150.0), 1.0);
        assert_eq!(gauge_ratio(-5.0), 0.0);
    }

    #[test]
    fn period_keys_cover_all_five_windows() {
        assert_eq!(period_for_key('1'), Some(SelectedPeriod::Week));
        assert_eq!(period_for_key('2'), Some(SelectedPeriod::Month));
        assert_eq!(period_for_key('3'), Some(SelectedPeriod::Quarter));
        assert_eq!(period_for_key('4'), Some(SelectedPeriod::Year));
        assert_eq!(period_for_key('5'), Some(SelectedPeriod::All));
        assert_eq!(period_for_key('6'), None);
    }

    #[test]
    fn format_dollars_groups_thousands() {
        assert_eq!(format_dollars(152_430.0), "$152,430");
        assert_eq!(format_dollars(999.4), "$999");
        assert_eq!(format_dollars(-12_500.0), "-$12,500");
    }

    #[tokio::test]
    async fn fallback_outcome_sets_warning_and_keeps_views_populated() {
        let mut app = App::new(DataSource::new("/nonexistent"), SelectedPeriod::Month);
        assert_eq!(app.status, DisplayStatus::Loading);

        let outcome = LoadOutcome {
            dashboard: sample_dashboard(),
            fallback: true,
        };
        app.apply_load_outcome(outcome, Instant::now());

        assert_eq!(app.status, DisplayStatus::Warning);
        let dashboard = app.dashboard.as_ref().unwrap();
        assert!(!dashboard.growth.is_empty());
        assert!(!dashboard.monthly.is_empty());
    }

    #[tokio::test]
    async fn counters_converge_to_the_feed_values() {
        let mut app = App::new(DataSource::new("sample_data"), SelectedPeriod::Month);
        let start = Instant::now();
        let outcome = LoadOutcome {
            dashboard: sample_dashboard(),
            fallback: false,
        };
        app.apply_load_outcome(outcome, start);
        assert_eq!(app.status, DisplayStatus::Success);

        let settled = start + COUNTER_DURATION;
        assert_eq!(app.animator.format("avg_monthly_return", 1, settled), "5.8");
        assert_eq!(app.animator.format("win_rate", 1, settled), "84.5");
        assert_eq!(app.animator.format("risk_score", 1, settled), "92.0");
        assert_eq!(app.animator.format("consistency_score", 1, settled), "94.7");
        assert_eq!(app.animator.format("total_managed", 0, settled), "152430");
        assert_eq!(app.animator.format("accounts_in_profit", 0, settled), "12");
        // Gauge widths track the same scores.
        assert_eq!(gauge_ratio(app.animator.value("win_rate_bar", settled)), 0.845);
        assert_eq!(gauge_ratio(app.animator.value("risk_bar", settled)), 0.92);
    }

    #[tokio::test]
    async fn reload_reenters_loading_from_any_state() {
        let mut app = App::new(DataSource::new("/nonexistent"), SelectedPeriod::Month);
        app.apply_load_outcome(
            LoadOutcome {
                dashboard: sample_dashboard(),
                fallback: true,
            },
            Instant::now(),
        );
        assert_eq!(app.status, DisplayStatus::Warning);
        app.request_reload();
        assert_eq!(app.status, DisplayStatus::Loading);
    }

    #[tokio::test]
    async fn faq_navigation_toggles_entries_in_place() {
        let mut app = App::new(DataSource::new("/nonexistent"), SelectedPeriod::Month);
        app.current_tab = Tab::Faq;
        assert!(!app.faqs[0].open);
        app.toggle_selected_faq();
        assert!(app.faqs[0].open);
        app.select_next_faq();
        assert_eq!(app.selected_faq, 1);
        app.select_previous_faq();
        app.select_previous_faq();
        assert_eq!(app.selected_faq, 0);
        app.toggle_selected_faq();
        assert!(!app.faqs[0].open);
    }
}
