mod attendance;
mod hall;
mod qr;
mod schedule;
mod student;
mod ticket;

use proctor_engine::ProcessEngine;

use crate::cli::{Commands, OutputFormat};

/// Route a parsed command to its handler.
pub async fn dispatch(
    command: Commands,
    engine: &ProcessEngine,
    format: OutputFormat,
    limit: Option<u32>,
) -> anyhow::Result<()> {
    let limit = limit.unwrap_or(engine.config().general.default_limit);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    match command {
        Commands::Schedule { action } => schedule::handle(&action, engine, format, limit).await,
        Commands::Hall { action } => hall::handle(&action, engine, format, limit).await,
        Commands::Student { action } => student::handle(&action, engine, format, limit).await,
        Commands::Ticket { action } => ticket::handle(&action, engine, format, limit).await,
        Commands::Attendance { action } => attendance::handle(&action, engine, format, limit).await,
        Commands::Qr { action } => qr::handle(&action, engine, format).await,
    }
}
