// Clippy configuration: enable pedantic but allow overly strict lints
#![allow(clippy::missing_errors_doc)] // Internal functions don't need # Errors docs
#![allow(clippy::missing_panics_doc)] // Internal functions don't need # Panics docs
#![allow(clippy::must_use_candidate)] // Not all getters need #[must_use]
#![allow(clippy::module_name_repetitions)] // e.g., BookForm in form module is fine
#![allow(clippy::doc_markdown)] // Don't require backticks around JSON, TOML, etc.
#![allow(clippy::too_many_lines)] // Some functions are naturally long
#![allow(clippy::cast_possible_truncation)] // We're careful with our casts
#![allow(clippy::match_same_arms)] // Explicit arms are clearer than combined patterns
#![allow(clippy::items_after_statements)] // Helper closures can be defined inline
#![allow(clippy::needless_pass_by_value)] // PathBuf by value is fine for config loading

//! Shelfdash - terminal dashboard for a book collection
//!
//! Lists, searches, creates, edits and deletes books through the `/api/books`
//! REST API. Confirmations, alerts and prompts are stacked dialogs; feedback
//! goes through a queue of auto-hiding notifications.
//!
//! Usage:
//!   shelfdash                     # Start TUI against http://localhost:3000
//!   shelfdash --api-url URL       # Use another API origin
//!   shelfdash --demo              # In-memory sample library
//!   shelfdash completions zsh     # Shell completions

mod app;
mod books;
mod cli;
mod config;
mod errors;
mod event;
mod overlay;
mod tui;
mod ui;

use app::App;
use books::{BookApi, HttpBookApi, MemoryBookApi};
use clap::Parser;
use cli::{Cli, Commands};
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Get the log directory path
fn get_log_dir() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from("/tmp/shelfdash/logs"),
        |dirs| dirs.cache_dir().join("shelfdash").join("logs"),
    )
}

/// Print the example config, or write the defaults to the config path
fn handle_config_command(cli: &Cli, init: bool) -> Result<()> {
    if !init {
        print!("{}", config::ShelfdashConfig::example());
        return Ok(());
    }

    let path = cli.config_path();
    if path.exists() {
        return Err(color_eyre::eyre::eyre!(
            "Config already exists at {}",
            path.display()
        ));
    }
    config::ShelfdashConfig::default().save_to_path(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Completions { shell }) => {
            cli::print_completions(*shell);
            return Ok(());
        }
        Some(Commands::Config { init }) => {
            return handle_config_command(&cli, *init);
        }
        None => {
            // Fall through to TUI mode
        }
    }

    color_eyre::install()?;

    // Log to file; the terminal belongs to the TUI
    let log_dir = get_log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "shelfdash.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let log_filter = format!("shelfdash={}", cli.log_level);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&log_filter))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(non_blocking),
        )
        .init();

    tracing::info!("Starting shelfdash v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Log directory: {:?}", log_dir);

    let config = cli.load_config();

    let api: Arc<dyn BookApi> = if cli.demo {
        tracing::info!("Demo mode: using in-memory library");
        Arc::new(MemoryBookApi::seeded())
    } else {
        tracing::info!(url = %config.api.base_url, "Using book API");
        Arc::new(HttpBookApi::new(&config.api)?)
    };

    let (event_tx, event_rx) = mpsc::channel(100);

    run_tui(event_tx, event_rx, cli.tick_rate, cli.frame_rate, api, &config).await
}

/// What woke the main loop
enum Wake {
    Event(event::Event),
    Tick,
}

/// Ticker shared by every loop iteration; late ticks are skipped, not bunched
fn tick_interval(period: Duration) -> Interval {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

/// Wait for the next event or tick
///
/// The ticker outlives each call, so a steady stream of input still lets the
/// overlay timers run.
async fn next_wake(event_rx: &mut mpsc::Receiver<event::Event>, ticker: &mut Interval) -> Wake {
    tokio::select! {
        Some(event) = event_rx.recv() => Wake::Event(event),
        _ = ticker.tick() => Wake::Tick,
    }
}

async fn run_tui(
    event_tx: mpsc::Sender<event::Event>,
    mut event_rx: mpsc::Receiver<event::Event>,
    tick_rate: f64,
    frame_rate: f64,
    api: Arc<dyn BookApi>,
    config: &config::ShelfdashConfig,
) -> Result<()> {
    use std::time::Instant;
    use tokio_util::sync::CancellationToken;

    // Calculate durations from rates
    let tick_duration = Duration::from_secs_f64(1.0 / tick_rate);
    let frame_duration = Duration::from_secs_f64(1.0 / frame_rate);

    tracing::info!(
        "TUI starting: {:.1} FPS, {:.1} ticks/sec",
        frame_rate,
        tick_rate
    );

    // Initialize terminal (raw mode, alternate screen)
    let mut terminal = tui::init()?;

    // RAII guard ensures terminal is restored on panic or early return
    let _guard = tui::TerminalGuard;

    let mut app = App::new(
        config,
        api,
        event_tx.clone(),
        Arc::new(overlay::SystemClock),
    );
    app.load_books();

    // Create cancellation token for graceful shutdown
    let cancel = CancellationToken::new();

    // Spawn input event handler with cancellation support
    let input_tx = event_tx.clone();
    let input_cancel = cancel.clone();
    let input_handle = tokio::spawn(async move {
        event::input::listen(input_tx, input_cancel).await;
    });

    // Frame rate limiting state
    let mut last_frame = Instant::now();
    let mut ticker = tick_interval(tick_duration);

    // Main loop
    loop {
        // Frame rate limiting with dirty flag check
        let now = Instant::now();
        if app.needs_render && now.duration_since(last_frame) >= frame_duration {
            terminal.draw(|f| ui::render(f, &app))?;
            app.rendered();
            last_frame = now;
        }

        match next_wake(&mut event_rx, &mut ticker).await {
            Wake::Event(event) => app.handle_event(event),
            Wake::Tick => app.tick(),
        }

        if app.should_quit {
            break;
        }
    }

    // Pending dialogs resolve as dismissed, timers are cancelled
    app.overlays.shutdown();

    // Graceful shutdown: signal input listener to stop
    tracing::debug!("Shutting down input listener");
    cancel.cancel();
    input_handle.abort();

    // Restore terminal (guard will also restore on drop, but explicit is cleaner)
    tui::restore()?;
    terminal.show_cursor()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_keep_running_under_steady_input() {
        let (tx, mut rx) = mpsc::channel(100);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_millis(50)).await;
                if tx.send(event::Event::Resize).await.is_err() {
                    break;
                }
            }
        });

        let mut ticker = tick_interval(Duration::from_millis(100));
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        let (mut events, mut ticks) = (0, 0);
        while tokio::time::Instant::now() < deadline {
            match next_wake(&mut rx, &mut ticker).await {
                Wake::Event(_) => events += 1,
                Wake::Tick => ticks += 1,
            }
        }

        assert!(events >= 30, "events: {events}");
        assert!(ticks >= 15, "ticks: {ticks}");
    }
}
