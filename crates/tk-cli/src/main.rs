use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use tk_cli::commands::track::{Session, TrackArgs};
use tk_cli::commands::{add, edit, list, status, today};
use tk_cli::{Cli, Commands, Config, TerminalNotifier};
use tk_core::{EntryLog, Recorder, SystemClock, Tracker};
use tk_db::Database;

/// Ticks between redraws of the live clock while tracking.
const RENDER_EVERY_TICKS: u32 = 10;

/// Load config, ensuring the database directory exists.
fn load_config(cli: &Cli) -> Result<Config> {
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }
    Ok(config)
}

/// Load config and open the entry log.
fn open_log(cli: &Cli) -> Result<(EntryLog<Database>, Config)> {
    let config = load_config(cli)?;
    let db = Database::open(&config.database_path).context("failed to open database")?;
    Ok((EntryLog::open(db), config))
}

fn track(log: EntryLog<Database>, config: &Config, args: &TrackArgs) -> Result<()> {
    let mode = args.mode.unwrap_or(config.default_mode);
    let budget_ms = args.budget.unwrap_or(config.default_budget_ms);
    let tracker = Tracker::with_clock(mode, budget_ms, config.tick_period(), SystemClock);
    let recorder = Recorder::new(log, TerminalNotifier::new(config.notifications));

    let mut session = Session::new(tracker, recorder, Local);
    if let Some(description) = &args.description {
        session.set_description(description);
    }
    if config.tick_period() < Duration::from_secs(1) {
        session = session.with_render_every(RENDER_EVERY_TICKS);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    let result = runtime.block_on(async {
        let (interrupt_tx, mut interrupts) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if interrupt_tx.send(()).is_err() {
                    break;
                }
            }
        });

        let mut stdout = io::stdout();
        writeln!(stdout, "Type ? for help.")?;
        if !args.paused {
            session.start(&mut stdout)?;
        }
        session
            .run(BufReader::new(tokio::io::stdin()), &mut stdout, &mut interrupts)
            .await
    });

    // A pending stdin read would otherwise keep the runtime alive.
    runtime.shutdown_background();
    result
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut stdout = io::stdout().lock();
    match &cli.command {
        Some(Commands::Track(args)) => {
            drop(stdout);
            let (log, config) = open_log(&cli)?;
            track(log, &config, args)?;
        }
        Some(Commands::List { json }) => {
            let (log, _config) = open_log(&cli)?;
            list::run(&mut stdout, log.entries(), &Local, *json)?;
        }
        Some(Commands::Add(args)) => {
            let (mut log, _config) = open_log(&cli)?;
            add::run(&mut stdout, &mut log, args, Utc::now())?;
        }
        Some(Commands::Edit(args)) => {
            let (mut log, _config) = open_log(&cli)?;
            edit::run(&mut stdout, &mut log, args, Utc::now())?;
        }
        Some(Commands::Delete { number }) => {
            let (mut log, _config) = open_log(&cli)?;
            edit::delete(&mut stdout, &mut log, *number)?;
        }
        Some(Commands::Today { json }) => {
            let (log, _config) = open_log(&cli)?;
            today::run(&mut stdout, log.entries(), &Local::now(), *json)?;
        }
        Some(Commands::Status) => {
            let config = load_config(&cli)?;
            status::run(&mut stdout, &config, &Local::now())?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
