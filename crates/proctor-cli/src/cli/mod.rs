use clap::{Parser, ValueEnum};

pub mod parse;
pub mod root_commands;
pub mod subcommands;

pub use root_commands::Commands;

/// Shared output mode across all commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Raw,
}

/// Top-level CLI parser for the `pct` binary.
#[derive(Debug, Parser)]
#[command(name = "pct", version, about = "Proctor - exam session orchestration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json (pretty) or raw (one line)
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max rows for list commands (defaults from config)
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands};
    use crate::cli::subcommands::ScheduleCommands;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn schedule_create_parses_repeated_flags() {
        let cli = Cli::parse_from([
            "pct",
            "schedule",
            "create",
            "--academic-year",
            "2025-2026",
            "--exam-type",
            "sem",
            "--year",
            "3",
            "--semester",
            "5",
            "--session",
            "fn",
            "--start-date",
            "2025-03-10",
            "--end-date",
            "2025-03-20",
            "--holiday",
            "2025-03-15",
            "--hall",
            "H101",
            "--hall",
            "H102",
        ]);
        let Commands::Schedule {
            action: ScheduleCommands::Create(args),
        } = cli.command
        else {
            panic!("expected schedule create");
        };
        assert_eq!(args.halls, vec!["H101", "H102"]);
        assert_eq!(args.holidays.len(), 1);
    }
}
