//! Schedule orchestration pipeline.
//!
//! `run_schedule_pipeline` drives: validate → create schedule (draft) →
//! timetable oracle → persist timetable → seating (oracle, else fallback) →
//! artifact generation → report. Each stage after creation may fail
//! independently; a failure leaves prior-stage outputs intact, marks later
//! stages skipped, and is reported per stage instead of as one opaque error.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{info, warn};

use proctor_core::entities::{Hall, Person, Schedule};
use proctor_core::enums::{AllocationMethod, ExamSession, ExamType, ScheduleStatus};
use proctor_core::responses::{PipelineReport, PipelineStage, StageOutcome, StageStatus};
use proctor_db::repos::schedule::NewSchedule;
use proctor_db::repos::seating::NewAllocation;
use proctor_db::repos::timetable::NewTimetableEntry;
use proctor_oracle::scheduling::TimetableRequest;
use proctor_oracle::seating::{SeatingRequest, SeatingResponse, fallback_allocation};
use proctor_oracle::{ArtifactOracle, SeatingOracle, TimetableOracle};

use crate::Engine;
use crate::error::EngineError;

/// A validated-on-entry request for one full pipeline run.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    pub academic_year: String,
    pub exam_type: ExamType,
    pub year: i64,
    pub semester: i64,
    pub session: ExamSession,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub holidays: Vec<NaiveDate>,
    pub selected_faculty: Vec<String>,
    pub selected_halls: Vec<String>,
}

impl ScheduleRequest {
    /// Reject malformed requests before any external call.
    fn validate(&self) -> Result<(), EngineError> {
        if self.start_date > self.end_date {
            return Err(EngineError::Validation(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            )));
        }
        for holiday in &self.holidays {
            if *holiday < self.start_date || *holiday > self.end_date {
                return Err(EngineError::Validation(format!(
                    "holiday {holiday} falls outside {}..{}",
                    self.start_date, self.end_date
                )));
            }
        }
        if self.selected_halls.is_empty() {
            return Err(EngineError::Validation(
                "at least one hall must be selected".to_string(),
            ));
        }
        Ok(())
    }
}

impl<T, S, A> Engine<T, S, A>
where
    T: TimetableOracle,
    S: SeatingOracle,
    A: ArtifactOracle,
{
    /// Run the full scheduling pipeline for one exam cycle.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Validation` for a malformed request and
    /// `EngineError::Conflict` for a duplicate cycle; once the schedule row
    /// exists, stage failures are reported in the returned `PipelineReport`
    /// rather than as errors, so callers can display partial progress.
    pub async fn run_schedule_pipeline(
        &self,
        request: &ScheduleRequest,
    ) -> Result<PipelineReport, EngineError> {
        request.validate()?;

        let schedule = self
            .store()
            .create_schedule(&NewSchedule {
                academic_year: request.academic_year.clone(),
                exam_type: request.exam_type,
                year: request.year,
                semester: request.semester,
                session: request.session,
                start_date: request.start_date,
                end_date: request.end_date,
                holidays: request.holidays.clone(),
                selected_faculty: request.selected_faculty.clone(),
                selected_halls: request.selected_halls.clone(),
            })
            .await?;
        info!(schedule_id = %schedule.id, "schedule created, starting pipeline");

        let mut report = PipelineReport {
            schedule_id: schedule.id.clone(),
            stages: vec![StageOutcome {
                stage: PipelineStage::CreateSchedule,
                status: StageStatus::Ok,
                message: None,
            }],
            timetable: vec![],
            violations: vec![],
            total_allocations: 0,
            allocation_method: None,
        };

        if let Err(message) = self.stage_timetable(&schedule, request, &mut report).await {
            warn!(schedule_id = %schedule.id, %message, "timetable stage failed");
            report.stages.push(StageOutcome {
                stage: PipelineStage::Timetable,
                status: StageStatus::Failed,
                message: Some(message),
            });
            report.stages.push(StageOutcome {
                stage: PipelineStage::Seating,
                status: StageStatus::Skipped,
                message: None,
            });
            report.stages.push(StageOutcome {
                stage: PipelineStage::Artifacts,
                status: StageStatus::Skipped,
                message: None,
            });
            return Ok(report);
        }

        if let Err(message) = self.stage_seating(&schedule, request, &mut report).await {
            warn!(schedule_id = %schedule.id, %message, "seating stage failed");
            report.stages.push(StageOutcome {
                stage: PipelineStage::Seating,
                status: StageStatus::Failed,
                message: Some(message),
            });
            report.stages.push(StageOutcome {
                stage: PipelineStage::Artifacts,
                status: StageStatus::Skipped,
                message: None,
            });
            return Ok(report);
        }

        // Artifact failures never fail the pipeline: the timetable and
        // seating data are already durable.
        self.stage_artifacts(&schedule.id, &mut report).await;

        Ok(report)
    }

    /// Invoke the scheduling oracle and persist its timetable in one bulk
    /// insert. An `Err` carries the stage failure message.
    async fn stage_timetable(
        &self,
        schedule: &Schedule,
        request: &ScheduleRequest,
        report: &mut PipelineReport,
    ) -> Result<(), String> {
        let response = self
            .timetable_oracle
            .generate_timetable(&TimetableRequest {
                year: request.year,
                semester: request.semester,
                exam_type: request.exam_type,
                session: request.session,
                start_date: request.start_date,
                end_date: request.end_date,
                holidays: request.holidays.clone(),
                schedule_id: schedule.id.clone(),
            })
            .await
            .map_err(|e| e.to_string())?;

        let entries: Vec<NewTimetableEntry> = response
            .timetable
            .iter()
            .map(|slot| NewTimetableEntry {
                subject_code: slot.subject_code.clone(),
                subject_name: slot
                    .subject_name
                    .clone()
                    .unwrap_or_else(|| slot.subject_code.clone()),
                date: slot.date,
                time_start: slot.time_start.clone(),
                time_end: slot.time_end.clone(),
                halls: slot.halls.clone(),
                invigilators: slot.invigilators.clone(),
                violations: slot.violations.clone(),
            })
            .collect();

        let persisted = self
            .store()
            .insert_timetable_bulk(&schedule.id, &entries)
            .await
            .map_err(|e| e.to_string())?;
        self.store()
            .set_schedule_status(&schedule.id, ScheduleStatus::Scheduled)
            .await
            .map_err(|e| e.to_string())?;

        // Oracle-reported clashes survive verbatim; the engine never hides a
        // conflict it knows about.
        report.violations = response.violations;
        for entry in &persisted {
            report.violations.extend(entry.violations.iter().cloned());
        }
        report.timetable = persisted;
        report.stages.push(StageOutcome {
            stage: PipelineStage::Timetable,
            status: StageStatus::Ok,
            message: None,
        });
        Ok(())
    }

    /// Allocate seats via the oracle, falling back to the deterministic
    /// local allocator on any oracle failure.
    async fn stage_seating(
        &self,
        schedule: &Schedule,
        request: &ScheduleRequest,
        report: &mut PipelineReport,
    ) -> Result<(), String> {
        let students = self
            .store()
            .list_students_by_year(request.year)
            .await
            .map_err(|e| e.to_string())?;
        let mut halls = Vec::with_capacity(request.selected_halls.len());
        for hall_id in &request.selected_halls {
            halls.push(
                self.store()
                    .get_hall(hall_id)
                    .await
                    .map_err(|e| e.to_string())?,
            );
        }

        let oracle_result = self
            .seating_oracle
            .allocate_seats(&SeatingRequest {
                year: request.year,
                exam_type: request.exam_type,
                session: request.session,
                halls: request.selected_halls.clone(),
                schedule_id: schedule.id.clone(),
            })
            .await
            .and_then(|response| {
                resolve_oracle_seats(&response, &students, &halls, request.exam_type)
            });

        let (allocations, method, degraded_message) = match oracle_result {
            Ok(allocations) => (allocations, AllocationMethod::Oracle, None),
            Err(e) => {
                warn!(schedule_id = %schedule.id, error = %e, "seating oracle failed, using fallback allocator");
                let seats = fallback_allocation(&students, &halls, request.exam_type)
                    .map_err(|e| e.to_string())?;
                let allocations = seats
                    .into_iter()
                    .map(|seat| NewAllocation {
                        hall_id: seat.hall_id,
                        hall_number: seat.hall_number,
                        seat_number: seat.seat_number,
                        student_id: seat.student_id,
                        register_number: seat.register_number,
                        is_left_seat: seat.is_left_seat,
                    })
                    .collect();
                (
                    allocations,
                    AllocationMethod::Fallback,
                    Some(format!("oracle failed ({e}), used fallback allocator")),
                )
            }
        };

        let persisted = self
            .store()
            .replace_seating(&schedule.id, &allocations, method)
            .await
            .map_err(|e| e.to_string())?;

        report.total_allocations = u32::try_from(persisted.len()).unwrap_or(u32::MAX);
        report.allocation_method = Some(method);
        report.stages.push(StageOutcome {
            stage: PipelineStage::Seating,
            status: if degraded_message.is_some() {
                StageStatus::Degraded
            } else {
                StageStatus::Ok
            },
            message: degraded_message,
        });
        Ok(())
    }

    /// Generate the timetable and seating PDFs. Failures are recorded as a
    /// degraded stage and logged, never propagated.
    async fn stage_artifacts(&self, schedule_id: &str, report: &mut PipelineReport) {
        let mut problems = Vec::new();

        match self.artifact_oracle.timetable_pdf(schedule_id).await {
            Ok(path) => {
                if let Err(e) = self
                    .store()
                    .set_schedule_artifacts(schedule_id, Some(&path), None, None)
                    .await
                {
                    problems.push(format!("failed to record timetable PDF path: {e}"));
                }
            }
            Err(e) => {
                warn!(schedule_id, error = %e, "timetable PDF generation failed");
                problems.push(format!("timetable PDF: {e}"));
            }
        }

        match self.artifact_oracle.seating_pdfs(schedule_id).await {
            Ok(pdfs) => {
                if let Err(e) = self
                    .store()
                    .set_schedule_artifacts(
                        schedule_id,
                        None,
                        Some(&pdfs.student_pdf_path),
                        Some(&pdfs.faculty_pdf_path),
                    )
                    .await
                {
                    problems.push(format!("failed to record seating PDF paths: {e}"));
                }
            }
            Err(e) => {
                warn!(schedule_id, error = %e, "seating PDF generation failed");
                problems.push(format!("seating PDFs: {e}"));
            }
        }

        report.stages.push(if problems.is_empty() {
            StageOutcome {
                stage: PipelineStage::Artifacts,
                status: StageStatus::Ok,
                message: None,
            }
        } else {
            StageOutcome {
                stage: PipelineStage::Artifacts,
                status: StageStatus::Degraded,
                message: Some(problems.join("; ")),
            }
        });
    }
}

/// Resolve oracle seat references against the known cohort and halls.
///
/// The oracle may reference students by internal ID or register number and
/// halls by ID or hall number; anything unresolvable makes the whole
/// response unusable (the fallback takes over). Bench sides are normalized
/// per exam type: SEM rows always store `None`, Internal rows derive a
/// missing side from seat parity.
fn resolve_oracle_seats(
    response: &SeatingResponse,
    students: &[Person],
    halls: &[Hall],
    exam_type: ExamType,
) -> Result<Vec<NewAllocation>, proctor_oracle::OracleError> {
    let mut student_by_ref: HashMap<&str, &Person> = HashMap::new();
    for student in students {
        student_by_ref.insert(student.id.as_str(), student);
        if let Some(reg) = &student.register_number {
            student_by_ref.insert(reg.as_str(), student);
        }
    }
    let mut hall_by_ref: HashMap<&str, &Hall> = HashMap::new();
    for hall in halls {
        hall_by_ref.insert(hall.id.as_str(), hall);
        hall_by_ref.insert(hall.hall_number.as_str(), hall);
    }

    let mut allocations = Vec::with_capacity(response.allocations.len());
    for seat in &response.allocations {
        let student = student_by_ref.get(seat.student_ref.as_str()).ok_or_else(|| {
            proctor_oracle::OracleError::MalformedOutput(format!(
                "unknown student reference {}",
                seat.student_ref
            ))
        })?;
        let hall = hall_by_ref.get(seat.hall_ref.as_str()).ok_or_else(|| {
            proctor_oracle::OracleError::MalformedOutput(format!(
                "unknown hall reference {}",
                seat.hall_ref
            ))
        })?;
        let is_left_seat = if exam_type.is_internal() {
            Some(seat.is_left_seat.unwrap_or(seat.seat_number % 2 == 1))
        } else {
            None
        };
        allocations.push(NewAllocation {
            hall_id: hall.id.clone(),
            hall_number: hall.hall_number.clone(),
            seat_number: seat.seat_number,
            student_id: student.id.clone(),
            register_number: student.register_number.clone().unwrap_or_default(),
            is_left_seat,
        });
    }
    Ok(allocations)
}
