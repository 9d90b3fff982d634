use clap::Subcommand;

/// Hall commands.
#[derive(Clone, Debug, Subcommand)]
pub enum HallCommands {
    /// Register an examination hall.
    Add {
        /// Hall number, e.g. H101
        #[arg(long)]
        number: String,
        /// Total seat capacity
        #[arg(long)]
        capacity: i64,
        /// Exam capacity override (defaults to half the capacity)
        #[arg(long)]
        exam_capacity: Option<i64>,
        /// Number of seating columns
        #[arg(long, default_value_t = 6)]
        columns: i64,
        #[arg(long)]
        building: String,
        #[arg(long, default_value_t = 0)]
        floor: i64,
        /// Facility tag; repeat for multiple
        #[arg(long = "facility")]
        facilities: Vec<String>,
    },
    /// List halls.
    List {
        /// Include inactive halls
        #[arg(long)]
        all: bool,
    },
}
