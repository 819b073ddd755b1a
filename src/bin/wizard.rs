use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use kubescape_wizard::deploy::ChartRevision;
use kubescape_wizard::error::{AppError, Result};
use kubescape_wizard::event::{Event, EventHandler};
use kubescape_wizard::host;
use kubescape_wizard::wizard::{ExecutionMessage, WizardAction, WizardApp, WizardConfig};
use ratatui::prelude::*;
use std::io::stdout;
use std::panic;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "kubescape-wizard")]
#[command(author, version, about = "Deploy the Kubescape operator into your cluster with helm")]
struct Args {
    /// Path to config file (default: <config dir>/kubescape-wizard/config.toml)
    #[arg(long)]
    config: Option<String>,

    /// Simulate helm and kubectl without touching the cluster
    #[arg(long)]
    dryrun: bool,

    /// Operator chart to install, overrides the config file
    #[arg(long, value_enum)]
    revision: Option<ChartRevision>,

    /// Log file path (logging disabled if not specified)
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // The TUI owns stdout, so logs only go to a file
    if let Some(ref log_path) = args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .init();

        info!("Starting kubescape-wizard");
    }

    let mut config = match args.config.as_deref() {
        Some(path) => WizardConfig::load_from(path)?,
        None => WizardConfig::load()?,
    };

    // Flags override config
    if args.dryrun {
        config.general.dryrun = true;
    }
    if let Some(revision) = args.revision {
        config.deploy.revision = revision;
    }

    // Set up panic handler to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let result = run_wizard(&mut terminal, config).await;
    restore_terminal()?;

    if let Err(ref e) = result {
        error!("Wizard error: {}", e);
    }

    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode().map_err(|e| AppError::Terminal(e.to_string()))?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| AppError::Terminal(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| AppError::Terminal(e.to_string()))
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().map_err(|e| AppError::Terminal(e.to_string()))?;
    execute!(stdout(), LeaveAlternateScreen).map_err(|e| AppError::Terminal(e.to_string()))?;
    Ok(())
}

/// Wait for the next deploy message, or forever when nothing is running
async fn next_execution_message(
    rx: &mut Option<mpsc::UnboundedReceiver<ExecutionMessage>>,
) -> Option<ExecutionMessage> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

async fn run_wizard(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    config: WizardConfig,
) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(250));

    // One bridge for the whole session, shared by every component
    let host = host::create_host(config.general.dryrun);
    let mut app = WizardApp::new(config, host);
    let mut execution: Option<mpsc::UnboundedReceiver<ExecutionMessage>> = None;

    loop {
        terminal
            .draw(|frame| kubescape_wizard::wizard::ui::draw(frame, &app))
            .map_err(|e| AppError::Terminal(e.to_string()))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Event::Key(key)) => {
                    if let Some(WizardAction::Deploy) = app.handle_key(key) {
                        execution = app.start_deploy_execution();
                    }
                }
                Some(Event::Resize) => {}
                Some(Event::Tick) => app.tick(),
                None => break,
            },
            msg = next_execution_message(&mut execution) => match msg {
                Some(msg) => app.handle_execution_message(msg),
                None => execution = None,
            },
        }

        if app.should_exit {
            break;
        }
    }

    Ok(())
}
