//! Artifact path containment and schedule deletion.
//!
//! Generated files live under the configured stage directories. Download
//! resolution never trusts a caller-supplied file name: anything that would
//! escape its stage directory is rejected before touching the filesystem.

use std::path::{Component, Path, PathBuf};

use tracing::{info, warn};

use proctor_core::responses::ScheduleDeleteReport;
use proctor_oracle::{ArtifactOracle, SeatingOracle, TimetableOracle};

use crate::Engine;
use crate::error::EngineError;

/// Join `file_name` onto `base_dir`, rejecting absolute paths and any `..`
/// traversal.
///
/// # Errors
///
/// Returns `EngineError::Validation` when the name would escape `base_dir`.
pub fn resolve_artifact_path(base_dir: &Path, file_name: &str) -> Result<PathBuf, EngineError> {
    let candidate = Path::new(file_name);
    if candidate.is_absolute() {
        return Err(EngineError::Validation(format!(
            "artifact name must be relative: {file_name}"
        )));
    }
    for component in candidate.components() {
        match component {
            Component::Normal(_) => {}
            _ => {
                return Err(EngineError::Validation(format!(
                    "artifact name escapes its directory: {file_name}"
                )));
            }
        }
    }
    Ok(base_dir.join(candidate))
}

impl<T, S, A> Engine<T, S, A>
where
    T: TimetableOracle,
    S: SeatingOracle,
    A: ArtifactOracle,
{
    /// Resolve a hall ticket PDF for download.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Validation` when the name would escape the
    /// hall-tickets directory.
    pub fn hall_ticket_download_path(&self, file_name: &str) -> Result<PathBuf, EngineError> {
        resolve_artifact_path(&self.config().storage.hall_tickets_dir(), file_name)
    }

    /// Delete a schedule, its dependent rows, and its artifact files.
    ///
    /// Row removal is one store transaction; file removal follows and logs
    /// (never fails on) already-missing files, so a partially cleaned
    /// directory cannot wedge the delete.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotFound` for an unknown schedule.
    pub async fn delete_schedule(
        &self,
        schedule_id: &str,
    ) -> Result<ScheduleDeleteReport, EngineError> {
        let schedule = self.store().get_schedule(schedule_id).await?;

        // Collect file paths before the rows disappear.
        let mut files: Vec<String> = schedule
            .artifact_paths()
            .into_iter()
            .map(str::to_string)
            .collect();
        for ticket in self.store().list_tickets(schedule_id).await? {
            if let Some(path) = ticket.pdf_path {
                files.push(path);
            }
        }

        let counts = self.store().delete_schedule_cascade(schedule_id).await?;

        let mut files_removed = 0u32;
        for file in &files {
            match tokio::fs::remove_file(file).await {
                Ok(()) => files_removed += 1,
                Err(e) => {
                    warn!(file, error = %e, "could not remove artifact file");
                }
            }
        }

        info!(
            schedule_id,
            timetable_entries = counts.timetable_entries,
            seating_allocations = counts.seating_allocations,
            hall_tickets = counts.hall_tickets,
            attendance_records = counts.attendance_records,
            files_removed,
            "schedule deleted"
        );

        Ok(ScheduleDeleteReport {
            schedule_id: schedule_id.to_string(),
            timetable_entries: u32::try_from(counts.timetable_entries).unwrap_or(u32::MAX),
            seating_allocations: u32::try_from(counts.seating_allocations).unwrap_or(u32::MAX),
            hall_tickets: u32::try_from(counts.hall_tickets).unwrap_or(u32::MAX),
            attendance_records: u32::try_from(counts.attendance_records).unwrap_or(u32::MAX),
            files_removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_resolve_under_base() {
        let path = resolve_artifact_path(Path::new("uploads/hall-tickets"), "tkt-abc.pdf").unwrap();
        assert_eq!(path, PathBuf::from("uploads/hall-tickets/tkt-abc.pdf"));
    }

    #[test]
    fn traversal_is_rejected() {
        let base = Path::new("uploads/hall-tickets");
        assert!(resolve_artifact_path(base, "../secrets.db").is_err());
        assert!(resolve_artifact_path(base, "a/../../b.pdf").is_err());
        assert!(resolve_artifact_path(base, "/etc/passwd").is_err());
    }

    #[test]
    fn nested_relative_names_are_allowed() {
        let path =
            resolve_artifact_path(Path::new("uploads/seating"), "sch-1/students.pdf").unwrap();
        assert_eq!(path, PathBuf::from("uploads/seating/sch-1/students.pdf"));
    }
}
