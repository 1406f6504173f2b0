mod app_service;
mod app_state;
mod commands;
mod config;
mod dataset;
mod error;
mod report;
mod ui;

use anyhow::Context;
use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::app_service::run_command_loop;
use crate::app_state::{App, AppEvent};
use crate::commands::AppCommand;
use crate::config::DashboardConfig;
use crate::ui::draw;

fn init_logging(log_dir: &Path) -> io::Result<()> {
    let ts = Local::now().format("%Y%m%d-%H%M%S").to_string();
    std::fs::create_dir_all(log_dir)?;
    let log_file = std::fs::File::create(log_dir.join(format!("ro-dashboard-{}.log", ts)))?;
    // Logs go to a file so they never draw over the alternate screen.
    env_logger::Builder::new()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter_level(log::LevelFilter::Warn)
        .filter_module("ro_dashboard", log::LevelFilter::Info)
        .parse_default_env()
        .init();
    Ok(())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let config = DashboardConfig::from_env();
    init_logging(&config.log_dir).context("cannot set up log file")?;
    info!("starting with {:?}", config);

    // Nothing is drawn until the data is in memory; a missing file stops here.
    let dataset = match app_service::load(&config).await {
        Ok(ds) => Arc::new(ds),
        Err(e) => {
            error!("{:#}", e);
            return Err(e);
        }
    };

    let mut startup_info = vec![format!(
        "✓ loaded {} rows from {}",
        dataset.len(),
        config.data_file.display()
    )];
    if dataset.is_empty() {
        startup_info.push("⚠ worksheet has no data rows".to_string());
    }

    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<AppCommand>();
    let (evt_tx, evt_rx) = mpsc::unbounded_channel::<AppEvent>();
    tokio::spawn(run_command_loop(Arc::clone(&dataset), cmd_rx, evt_tx));

    let mut app = App::new(&dataset, startup_info, cmd_tx, evt_rx);
    app.request_report();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = match app.evt_rx.take() {
        Some(rx) => run_app_loop(&mut terminal, &mut app, rx).await,
        None => Ok(()),
    };

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res.context("terminal loop failed")
}

async fn run_app_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut evt_rx: mpsc::UnboundedReceiver<AppEvent>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        while let Ok(event) = evt_rx.try_recv() {
            match event {
                AppEvent::Message(msg) => app.add_log(msg),
                AppEvent::Error(msg) => app.add_log(msg),
                AppEvent::Report(report) => app.set_report(*report),
            }
        }

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key_event(key.code) {
                    return Ok(());
                }
            }
        }
    }
}
