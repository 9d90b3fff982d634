use clap::Subcommand;

/// Hall ticket commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TicketCommands {
    /// Authorize hall ticket issuance for a SEM schedule and issue the cohort.
    Authorize {
        schedule_id: String,
        /// Person ID of the authorizing COE
        #[arg(long)]
        by: String,
    },
    /// Issue (or re-issue) one student's hall ticket.
    Issue {
        schedule_id: String,
        register_number: String,
        #[arg(long)]
        by: String,
    },
    /// Issue tickets for every eligible student of a schedule.
    IssueBulk {
        schedule_id: String,
        /// Restrict to one year of study
        #[arg(long)]
        year: Option<i64>,
    },
    /// List a schedule's tickets.
    List { schedule_id: String },
    /// Resolve a ticket's PDF path and record the download.
    Download { ticket_id: String },
    /// Clear a ticket's downloaded flag so it can be re-issued.
    ResetDownload {
        ticket_id: String,
        #[arg(long)]
        by: String,
    },
}
