//! Cocktail Kiosk Entry Point
//!
//! Launches the kiosk in the terminal, with drinks from a JSON file and
//! simulated pumps.
//!
//! Configuration comes from `.env`, the environment and
//! `$XDG_CONFIG_HOME/cocktail-kiosk/kiosk.toml`. Logs go to `KIOSK_LOG_FILE`
//! (default `kiosk.log`) so they never tear the frame.

use std::fs::OpenOptions;
use std::io;
use std::panic;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::runtime::Handle;
use tracing_subscriber::{
    layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

use kiosk_core::{load_config, Kiosk, KioskConfig};
use kiosk_tui::{DemoSettings, JsonCatalog, SimulatedDispenser, TerminalSurface};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let settings = DemoSettings::from_env();
    let log_filter = init_logging(&settings.log_file)?;
    let config = load_config().context("Invalid kiosk configuration")?;
    if config.debug {
        log_filter.reload(EnvFilter::new(filter_directive(
            true,
            std::env::var("RUST_LOG").ok(),
        )))?;
    }
    tracing::info!(
        full_screen = config.full_screen,
        frame_rate = config.frame_rate,
        cocktails = %settings.cocktails_file.display(),
        "Starting cocktail kiosk"
    );

    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: cocktail-kiosk requires a terminal (TTY)");
        std::process::exit(1);
    }

    // Restore the terminal before printing a panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    // The kiosk loop blocks; pumps run on this runtime meanwhile
    let runtime = Handle::current();
    let result =
        tokio::task::spawn_blocking(move || run_kiosk(terminal, config, settings, runtime)).await;

    disable_raw_mode()?;
    execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        cursor::Show
    )?;

    result.context("Kiosk thread panicked")?
}

fn run_kiosk(
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    config: KioskConfig,
    settings: DemoSettings,
    runtime: Handle,
) -> anyhow::Result<()> {
    let surface = TerminalSurface::new(terminal, &config)?;
    let catalog = JsonCatalog::new(settings.cocktails_file, settings.logo_folder);
    let dispenser =
        SimulatedDispenser::new(runtime, settings.pump_concurrency, settings.seconds_per_oz);

    let mut kiosk = Kiosk::new(surface, catalog, dispenser, config)?;
    kiosk.run()?;
    tracing::info!("Kiosk stopped");
    Ok(())
}

type LogFilter = reload::Handle<EnvFilter, Registry>;

/// Log to `path`; the returned handle swaps the filter once config is known
fn init_logging(path: &Path) -> anyhow::Result<LogFilter> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Cannot open log file {}", path.display()))?;

    let filter = EnvFilter::new(filter_directive(false, std::env::var("RUST_LOG").ok()));
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(handle)
}

/// `RUST_LOG` wins; otherwise debug mode decides the level
fn filter_directive(debug: bool, rust_log: Option<String>) -> String {
    match rust_log {
        Some(directive) if !directive.trim().is_empty() => directive,
        _ if debug => "debug".to_string(),
        _ => "info".to_string(),
    }
}
