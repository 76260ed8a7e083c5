mod cli;
mod commands;
mod config;
mod tui;

use clap::Parser;
use cli::{Cli, Commands};
use commands::Reporter;
use config::InspectConfig;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // No subcommand -> check the built-in stores
            init_logging(cli.verbose);
            run_inspect(InspectConfig::default());
        }
        Some(Commands::Inspect(args)) => {
            init_logging(cli.verbose);
            if let Err(e) = args.validate() {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }

            let format = args.format();
            run_inspect(InspectConfig::resolve(args.paths, args.limit, format));
        }
        Some(Commands::Tui(args)) => {
            // Log lines would tear the alternate screen, so no subscriber here
            if let Err(e) = tui::run(args.path) {
                eprintln!("TUI error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run_inspect(config: InspectConfig) {
    tracing::info!(stores = config.paths.len(), limit = config.limit, "starting inspection");

    let stdout = std::io::stdout().lock();
    let mut reporter = Reporter::new(stdout, config.format);
    if let Err(e) = commands::inspect(&config.paths, config.limit, &mut reporter) {
        eprintln!("Error writing report: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "dbpeek=warn",
        1 => "dbpeek=info",
        _ => "dbpeek=debug",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
