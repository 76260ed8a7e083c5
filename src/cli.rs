use clap::{Args, Parser, Subcommand};

use crate::commands::OutputFormat;

#[derive(Parser)]
#[command(name = "dbpeek")]
#[command(about = "Peek at the tables and first rows of SQLite store files")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the tables and first rows of each store
    Inspect(InspectArgs),
    /// Browse one store interactively
    Tui(TuiArgs),
}

#[derive(Args)]
pub struct InspectArgs {
    /// Rows to print per table
    #[arg(short = 'n', long = "limit")]
    pub limit: Option<usize>,

    /// Emit JSON Lines instead of text
    #[arg(long = "json")]
    pub json: bool,

    /// Store files to check, in order (defaults to the built-in list)
    pub paths: Vec<String>,
}

impl InspectArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.limit == Some(0) {
            return Err("--limit must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn format(&self) -> OutputFormat {
        if self.json { OutputFormat::Json } else { OutputFormat::Text }
    }
}

#[derive(Args)]
pub struct TuiArgs {
    /// Store file to browse
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_has_no_subcommand() {
        let cli = Cli::try_parse_from(["dbpeek"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn inspect_takes_paths_in_order() {
        let cli = Cli::try_parse_from(["dbpeek", "-vv", "inspect", "-n", "3", "b.db", "a.db"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let Some(Commands::Inspect(args)) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(args.paths, vec!["b.db", "a.db"]);
        assert_eq!(args.limit, Some(3));
        assert_eq!(args.format(), OutputFormat::Text);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn zero_limit_is_rejected() {
        let cli = Cli::try_parse_from(["dbpeek", "inspect", "--limit", "0", "--json"]).unwrap();
        let Some(Commands::Inspect(args)) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(args.format(), OutputFormat::Json);
        assert!(args.validate().is_err());
    }

    #[test]
    fn tui_requires_a_path() {
        assert!(Cli::try_parse_from(["dbpeek", "tui"]).is_err());
        assert!(Cli::try_parse_from(["dbpeek", "tui", "x.db"]).is_ok());
    }
}
