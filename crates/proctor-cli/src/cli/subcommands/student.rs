use clap::Subcommand;

use proctor_core::enums::PersonRole;

use crate::cli::parse;

/// Student and staff commands.
#[derive(Clone, Debug, Subcommand)]
pub enum StudentCommands {
    /// Register a person (defaults to the student role).
    Add {
        /// Register number (required for students)
        #[arg(long)]
        register: Option<String>,
        #[arg(long)]
        name: String,
        /// Role: student, faculty, coe
        #[arg(long, value_parser = parse::person_role, default_value = "student")]
        role: PersonRole,
        /// Year of study
        #[arg(long)]
        year: Option<i64>,
        #[arg(long)]
        department: Option<String>,
    },
    /// List students, optionally restricted to one year of study.
    List {
        #[arg(long)]
        year: Option<i64>,
    },
}
