use clap::Subcommand;

/// QR verification commands.
#[derive(Clone, Debug, Subcommand)]
pub enum QrCommands {
    /// Verify a scanned QR payload against the configured signing secret.
    Verify {
        /// The QR's JSON payload, as scanned
        payload: String,
    },
    /// Report the scan window for a timetable slot.
    Window { timetable_id: String },
}
