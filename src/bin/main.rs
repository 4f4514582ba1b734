use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stock_tracker::{
    config::Config, error::ValidationError, tracker::Tracker, tui::app::App, view::usd,
};

#[derive(Parser, Debug)]
#[command(version, about = "Track stock holdings at fixed prices")]
struct Args {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive terminal UI (default)
    Tui,
    /// Print the holdings table and total
    Show,
    /// Add shares of a stock and auto-save
    Add {
        symbol: String,
        #[arg(allow_hyphen_values = true)]
        quantity: String,
    },
    /// Write the portfolio to PATH (.csv for CSV, anything else for text)
    Export { path: PathBuf },
    /// Switch between the light and dark theme
    ToggleTheme,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let command = args.command.unwrap_or(Commands::Tui);

    let log_file = match command {
        Commands::Tui => Some(args.config.log_path.as_path()),
        _ => None,
    };
    if let Err(err) = init_tracing(log_file) {
        eprintln!("{:#}", err);
        return ExitCode::FAILURE;
    }

    let result = match command {
        Commands::Tui => run_tui(&args.config).await,
        Commands::Show => run_show(&args.config),
        Commands::Add { symbol, quantity } => run_add(&args.config, &symbol, &quantity),
        Commands::Export { path } => run_export(&args.config, &path),
        Commands::ToggleTheme => run_toggle_theme(&args.config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ValidationError>() {
                Some(validation) => eprintln!("{}", validation.to_string().red()),
                None => {
                    error!("{:#}", err);
                    eprintln!("Error: {:#}", err);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(log_path: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("stock_tracker=debug,{}=debug", env!("CARGO_CRATE_NAME")).into()
    });

    let (file_layer, stderr_layer) = match log_path {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Could not open log file {}", path.display()))?;
            (
                Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false)),
                None,
            )
        }
        None => (None, Some(fmt::layer().with_writer(std::io::stderr))),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(())
}

async fn run_tui(config: &Config) -> Result<()> {
    let tracker = Tracker::open(config)?;
    let mut app = App::new(tracker);

    let res = app.run().await;
    ratatui::restore();
    res
}

fn run_show(config: &Config) -> Result<()> {
    let tracker = Tracker::open(config)?;
    let view = tracker.view();

    println!(
        "{}",
        format!("{:<8}{:>10}{:>10}{:>14}", "Stock", "Quantity", "Price", "Value").bold()
    );
    for row in view.rows.iter() {
        println!(
            "{}{:>10}{:>10}{}",
            format!("{:<8}", row.symbol).blue(),
            row.quantity,
            usd(row.unit_price),
            format!("{:>14}", usd(row.value)).yellow()
        );
    }
    println!();
    println!("Total Investment: {}", usd(view.total).yellow().bold());

    Ok(())
}

fn run_add(config: &Config, symbol: &str, quantity: &str) -> Result<()> {
    let mut tracker = Tracker::open(config)?;
    let symbol = symbol.trim().to_uppercase();
    tracker.add_holding(Some(&symbol), quantity)?;
    println!("{}", tracker.state().portfolio);

    Ok(())
}

fn run_export(config: &Config, path: &Path) -> Result<()> {
    let tracker = Tracker::open(config)?;
    let format = tracker.export_as(path)?;
    println!("Portfolio saved to {} ({})", path.display(), format);

    Ok(())
}

fn run_toggle_theme(config: &Config) -> Result<()> {
    let mut tracker = Tracker::open(config)?;
    let theme = tracker.toggle_theme()?;
    println!("Theme: {}", theme);

    Ok(())
}
