use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wirewatch::app::{App, View};
use wirewatch::data::duration::parse_duration;
use wirewatch::data::export::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use wirewatch::data::search;
use wirewatch::{
    events, ui, DashboardData, DataSource, Diagram, Export, FileSource, HttpSource, LayoutConfig,
    SearchParams, SearchTask, Settings,
};
use wirewatch_adapters::logsearch::LogSearchClient;
use wirewatch_adapters::RetryPolicy;

/// Telemetry file used when neither a file nor an endpoint is configured.
const DEFAULT_TELEMETRY_FILE: &str = "telemetry.json";

#[derive(Parser, Debug)]
#[command(name = "wirewatch")]
#[command(about = "Terminal dashboard for US wires payment processing health")]
struct Args {
    /// Path to a telemetry JSON file (polled for changes)
    #[arg(short, long, conflicts_with = "endpoint")]
    file: Option<PathBuf>,

    /// Log-search backend base URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Bearer token for the backend
    #[arg(long)]
    token: Option<String>,

    /// Graph description JSON (defaults to the built-in US wires chain)
    #[arg(short, long)]
    graph: Option<PathBuf>,

    /// Config file (defaults to ./wirewatch.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Refresh interval (e.g., "30s", "500ms")
    #[arg(short, long)]
    refresh: Option<String>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset (e.g., "debug", "wirewatch=trace")
    #[arg(long)]
    log_level: Option<String>,

    /// Export the classified state and diagram to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Canvas width for the exported diagram
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: f64,

    /// Canvas height for the exported diagram
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: f64,

    /// Search one transaction by id, print its summary and exit
    #[arg(long, conflicts_with = "export")]
    search_id: Option<String>,

    /// Search transactions by amount (takes precedence over --search-id)
    #[arg(long, conflicts_with = "export")]
    search_amount: Option<String>,

    /// Start of the search window (ISO date or date-time)
    #[arg(long)]
    date_start: Option<String>,

    /// End of the search window (ISO date or date-time)
    #[arg(long)]
    date_end: Option<String>,
}

impl Args {
    /// Command-line flags override the config file and environment.
    fn apply(&self, settings: &mut Settings) {
        if let Some(ref file) = self.file {
            settings.source.file = Some(file.clone());
            settings.source.endpoint = None;
        }
        if let Some(ref endpoint) = self.endpoint {
            settings.source.endpoint = Some(endpoint.clone());
        }
        if let Some(ref token) = self.token {
            settings.source.token = Some(token.clone());
        }
        if let Some(ref graph) = self.graph {
            settings.source.graph = Some(graph.clone());
        }
        if let Some(ref refresh) = self.refresh {
            settings.source.refresh = refresh.clone();
        }
        if let Some(ref log_file) = self.log_file {
            settings.logging.file = Some(log_file.clone());
        }
        if let Some(ref level) = self.log_level {
            settings.logging.level = level.clone();
        }
    }

    fn is_search(&self) -> bool {
        self.search_id.is_some()
            || self.search_amount.is_some()
            || self.date_start.is_some()
            || self.date_end.is_some()
    }

    fn search_params(&self) -> SearchParams {
        SearchParams::by_id(self.search_id.as_deref().unwrap_or_default())
            .with_amount(self.search_amount.as_deref().unwrap_or_default())
            .with_dates(self.date_start.as_deref(), self.date_end.as_deref())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply(&mut settings);

    let interactive = args.export.is_none() && !args.is_search();
    init_logging(&settings, interactive)?;

    let layout = settings.layout()?;
    let graph = settings.graph()?;
    let diagram = Diagram::transform(&graph, &layout);
    info!(
        "loaded diagram with {} nodes and {} edges",
        diagram.nodes.len(),
        diagram.edges.len()
    );

    let refresh = parse_duration(&settings.source.refresh)
        .with_context(|| format!("invalid refresh interval '{}'", settings.source.refresh))?;
    let timeout = parse_duration(&settings.source.timeout)
        .with_context(|| format!("invalid timeout '{}'", settings.source.timeout))?;

    let client = settings
        .source
        .endpoint
        .as_deref()
        .map(|endpoint| build_client(endpoint, settings.source.token.as_deref(), timeout))
        .transpose()?;

    // Handle search mode (non-interactive)
    if args.is_search() {
        let Some(client) = client else {
            bail!("Transaction search needs --endpoint");
        };
        return run_search(&client, &args.search_params());
    }

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        let data = match client {
            Some(ref client) => fetch_once(client)?,
            None => DashboardData::load(&telemetry_path(&settings))?,
        };
        let export = Export::build(&data, &diagram, &layout, args.width, args.height);
        export.write(export_path)?;
        println!(
            "Exported {} systems to {}",
            export.summary.total_systems,
            export_path.display()
        );
        return Ok(());
    }

    match client {
        Some(client) => run_with_http(client, diagram, layout, refresh, &args),
        None => {
            let source = Box::new(FileSource::new(telemetry_path(&settings)));
            let app = App::new(source, diagram, layout);
            run_tui(app, refresh)
        }
    }
}

/// Log to the configured file, or to stderr outside the TUI.
fn init_logging(settings: &Settings, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    match settings.logging.file {
        Some(ref path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
                .init();
        }
        // stderr would draw over the alternate screen
        None if interactive => {}
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::stderr))
                .init();
        }
    }
    Ok(())
}

fn build_client(endpoint: &str, token: Option<&str>, timeout: Duration) -> Result<LogSearchClient> {
    let mut builder = LogSearchClient::builder().endpoint(endpoint).timeout(timeout);
    if let Some(token) = token {
        builder = builder.token(token);
    }
    builder
        .build()
        .with_context(|| format!("creating client for {}", endpoint))
}

fn telemetry_path(settings: &Settings) -> PathBuf {
    settings
        .source
        .file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TELEMETRY_FILE))
}

/// Run one transaction search and print the result as JSON.
fn run_search(client: &LogSearchClient, params: &SearchParams) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(search::execute(client, params))?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Fetch a single telemetry batch from the backend.
fn fetch_once(client: &LogSearchClient) -> Result<DashboardData> {
    let rt = tokio::runtime::Runtime::new()?;
    let records = rt
        .block_on(client.fetch_telemetry_with_retry(&RetryPolicy::default()))
        .with_context(|| format!("fetching telemetry from {}", client.endpoint()))?;
    Ok(DashboardData::from_records(records))
}

/// Run with the HTTP data source and transaction search enabled
fn run_with_http(
    client: LogSearchClient,
    diagram: Diagram,
    layout: LayoutConfig,
    refresh: Duration,
    args: &Args,
) -> Result<()> {
    // Build a tokio runtime for the polling and search tasks
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    let source: Box<dyn DataSource> =
        Box::new(HttpSource::spawn(client.clone(), refresh, RetryPolicy::default()));
    let search = SearchTask::new(client, rt.handle().clone());
    let app = App::new(source, diagram, layout).with_search(
        search,
        args.date_start.clone(),
        args.date_end.clone(),
    );

    // The background task owns the fetch cadence, the TUI only checks the channel
    run_tui(app, Duration::from_millis(250))
}

/// Run the TUI with the given app
fn run_tui(mut app: App, refresh_interval: Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    // Load initial data
    if !app.reload_data() {
        warn!("no telemetry available at startup from {}", app.source_description());
    }

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        app.poll_search();

        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let top = (area.height / 2).saturating_sub(2);
                let centered = ratatui::layout::Rect::new(0, top, area.width, 5.min(area.height));
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            // Render current view
            match app.current_view {
                View::Summary => ui::summary::render(frame, app, chunks[2]),
                View::Flow => ui::flow::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Table rows start after header (1) + tabs (1) + block border (1)
                    events::handle_mouse_event(app, mouse, 3);
                }
                Event::Resize(_, _) => {
                    // The flow view re-fits on the next draw
                }
                _ => {}
            }
        }

        // Auto-refresh data periodically
        if last_refresh.elapsed() >= refresh_interval {
            app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}
