// src/main.rs

//! Main entry point for `termpaint`.

use termpaint::backend::console::ConsoleDriver;
use termpaint::backend::Driver;
use termpaint::cli::{self, Args};
use termpaint::config::Config;
use termpaint::editor::{App, AppStatus, APP_TITLE};
use termpaint::os::epoll::{epoll_event_token, EventMonitor};
use termpaint::render::Renderer;

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use std::time::{Duration, Instant};

/// Registration token for the driver's input fd in the event monitor.
const STDIN_TOKEN: u64 = 0;

fn main() -> anyhow::Result<()> {
    // Initialize the logger to write to /tmp/termpaint.log; the editor
    // owns the terminal, so nothing may log to stdout or stderr.
    // Default filter is "info" if RUST_LOG is not set.
    use std::fs::OpenOptions;

    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("/tmp/termpaint.log")
        .expect("Failed to open log file");

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    info!("Starting termpaint...");

    let args = Args::parse();
    let config = Config::load_or_default();

    let startup = cli::resolve(&args, &config).context("Failed to resolve the starting canvas")?;
    let mut app = App::new(&config, startup.canvas, startup.save_path);

    let mut driver = ConsoleDriver::new().context("Failed to initialize the console driver")?;
    driver.set_title(APP_TITLE);
    let renderer = Renderer::new();

    let result = run_loop(
        &mut app,
        &renderer,
        &mut driver,
        config.cursor.blink_interval_ms,
    );

    // Restore the terminal before anything gets reported.
    if let Err(e) = driver.cleanup() {
        error!("Driver cleanup failed: {:#}", e);
    }
    match &result {
        Ok(()) => info!("termpaint exited successfully."),
        Err(e) => error!(
            "termpaint exited with an error: {:#}. Root cause: {:?}",
            e,
            e.root_cause()
        ),
    }
    result
}

/// Drives the editor until shutdown: draw a frame, sleep in `epoll` until
/// input arrives or the next blink flip is due, apply what happened.
fn run_loop(
    app: &mut App,
    renderer: &Renderer,
    driver: &mut dyn Driver,
    blink_interval_ms: u64,
) -> anyhow::Result<()> {
    let mut monitor = EventMonitor::new().context("Failed to create event monitor")?;
    if let Some(fd) = driver.get_event_fd() {
        monitor
            .add(fd, STDIN_TOKEN)
            .context("Failed to watch the driver input fd")?;
    }

    let blink = Duration::from_millis(blink_interval_ms.max(1));
    let mut next_tick = Instant::now() + blink;

    info!("Starting main event loop...");
    loop {
        if app.blink_active() {
            let now = Instant::now();
            if now >= next_tick {
                app.tick();
                next_tick += blink;
                // A stalled loop drops missed intervals instead of
                // replaying them in a burst.
                while next_tick <= now {
                    next_tick += blink;
                }
            }
        }

        renderer
            .draw(&app.frame_view(), driver)
            .context("Failed to draw a frame")?;

        // Block indefinitely while no cursor blinks; otherwise wake in
        // time for the next phase flip.
        let timeout_ms = if app.blink_active() {
            next_tick
                .saturating_duration_since(Instant::now())
                .as_millis()
                .max(1)
                .min(i32::MAX as u128) as i32
        } else {
            -1
        };

        let input_ready = {
            let events = monitor.events(timeout_ms)?;
            events
                .iter()
                .any(|event| epoll_event_token(event) == STDIN_TOKEN)
        };

        if input_ready {
            let was_blinking = app.blink_active();
            for event in driver
                .process_events()
                .context("Failed to process driver events")?
            {
                if app.handle_event(event) == AppStatus::Shutdown {
                    info!("Shutdown requested. Exiting main loop.");
                    return Ok(());
                }
            }
            // Blinking resumed (terminal focus came back); restart the
            // cadence so the first flip lands one full interval from now.
            if app.blink_active() && !was_blinking {
                next_tick = Instant::now() + blink;
            }
        }
    }
}
