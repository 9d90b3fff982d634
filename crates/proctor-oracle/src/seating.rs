//! Seating oracle adapter (`allocate_seats` op) and the deterministic local
//! fallback used when the oracle is unavailable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use proctor_config::OracleConfig;
use proctor_core::entities::{Hall, Person};
use proctor_core::enums::{ExamSession, ExamType};

use crate::error::OracleError;
use crate::transport::call_oracle;

/// Wire request for `allocate_seats`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatingRequest {
    pub year: i64,
    pub exam_type: ExamType,
    pub session: ExamSession,
    pub halls: Vec<String>,
    pub schedule_id: String,
}

/// One seat assignment as the oracle reports it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleSeat {
    pub student_ref: String,
    pub hall_ref: String,
    pub seat_number: i64,
    #[serde(default)]
    pub is_left_seat: Option<bool>,
}

/// Wire response for `allocate_seats`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatingResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub allocations: Vec<OracleSeat>,
    #[serde(default)]
    pub total_students: i64,
    #[serde(default)]
    pub total_halls: i64,
}

/// Capability seam for seat allocation.
pub trait SeatingOracle {
    fn allocate_seats(
        &self,
        request: &SeatingRequest,
    ) -> impl Future<Output = Result<SeatingResponse, OracleError>> + Send;
}

/// Subprocess-backed `SeatingOracle`.
#[derive(Debug, Clone)]
pub struct ProcessSeatingOracle {
    config: OracleConfig,
}

impl ProcessSeatingOracle {
    #[must_use]
    pub const fn new(config: OracleConfig) -> Self {
        Self { config }
    }
}

impl SeatingOracle for ProcessSeatingOracle {
    async fn allocate_seats(
        &self,
        request: &SeatingRequest,
    ) -> Result<SeatingResponse, OracleError> {
        let response: SeatingResponse = call_oracle(
            &self.config,
            &self.config.seating_script,
            "allocate_seats",
            request,
        )
        .await?;
        if !response.success {
            return Err(OracleError::Rejected(response.message));
        }
        Ok(response)
    }
}

// ---------------------------------------------------------------------------
// Deterministic fallback allocator
// ---------------------------------------------------------------------------

/// One seat produced by the fallback allocator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackSeat {
    pub hall_id: String,
    pub hall_number: String,
    pub seat_number: i64,
    pub student_id: String,
    pub register_number: String,
    pub is_left_seat: Option<bool>,
}

/// The supplied halls cannot seat the cohort.
#[derive(Debug, Error)]
#[error("Halls seat {available} students but {required} must be seated")]
pub struct CapacityExceeded {
    pub required: usize,
    pub available: usize,
}

/// Deterministic local allocation, used when the seating oracle fails.
///
/// Students are taken in register-number order and dealt round-robin across
/// the halls; within a hall, seat numbers increase from 1. Internal exams
/// pair two students per bench (`exam_capacity` benches, seats alternating
/// left/right); SEM exams seat one student per bench with `is_left_seat`
/// unset. Given the same inputs this always produces the same plan, so a
/// re-run after an oracle outage is reproducible.
///
/// # Errors
///
/// Returns `CapacityExceeded` when the cohort does not fit.
pub fn fallback_allocation(
    students: &[Person],
    halls: &[Hall],
    exam_type: ExamType,
) -> Result<Vec<FallbackSeat>, CapacityExceeded> {
    let seats_per_hall: Vec<usize> = halls
        .iter()
        .map(|h| {
            let benches = usize::try_from(h.exam_capacity).unwrap_or(0);
            if exam_type.is_internal() { benches * 2 } else { benches }
        })
        .collect();
    let available: usize = seats_per_hall.iter().sum();
    if students.len() > available {
        return Err(CapacityExceeded {
            required: students.len(),
            available,
        });
    }

    let mut ordered: Vec<&Person> = students.iter().collect();
    ordered.sort_by(|a, b| a.register_number.cmp(&b.register_number));

    let mut next_seat = vec![1i64; halls.len()];
    let mut assignments = Vec::with_capacity(ordered.len());
    let mut hall_idx = 0usize;

    for student in ordered {
        // Advance past full halls; total capacity was checked above.
        while usize::try_from(next_seat[hall_idx] - 1).unwrap_or(usize::MAX)
            >= seats_per_hall[hall_idx]
        {
            hall_idx = (hall_idx + 1) % halls.len();
        }

        let hall = &halls[hall_idx];
        let seat_number = next_seat[hall_idx];
        next_seat[hall_idx] += 1;

        let is_left_seat = if exam_type.is_internal() {
            Some(seat_number % 2 == 1)
        } else {
            None
        };

        assignments.push(FallbackSeat {
            hall_id: hall.id.clone(),
            hall_number: hall.hall_number.clone(),
            seat_number,
            student_id: student.id.clone(),
            register_number: student.register_number.clone().unwrap_or_default(),
            is_left_seat,
        });

        hall_idx = (hall_idx + 1) % halls.len();
    }

    Ok(assignments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use proctor_core::enums::PersonRole;

    fn hall(id: &str, number: &str, exam_capacity: i64) -> Hall {
        Hall {
            id: id.to_string(),
            hall_number: number.to_string(),
            capacity: exam_capacity * 2,
            exam_capacity,
            columns: 6,
            building: "Main Building".to_string(),
            floor: 1,
            facilities: vec![],
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn student(id: &str, reg: &str) -> Person {
        Person {
            id: id.to_string(),
            register_number: Some(reg.to_string()),
            name: format!("Student {reg}"),
            role: PersonRole::Student,
            year: Some(3),
            department: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn fallback_orders_by_register_number() {
        let students = vec![student("per-3", "21CS030"), student("per-1", "21CS010")];
        let halls = vec![hall("hal-1", "H101", 10)];
        let seats = fallback_allocation(&students, &halls, ExamType::Sem).unwrap();
        assert_eq!(seats[0].register_number, "21CS010");
        assert_eq!(seats[0].seat_number, 1);
        assert_eq!(seats[1].register_number, "21CS030");
        assert_eq!(seats[1].seat_number, 2);
    }

    #[test]
    fn fallback_round_robins_across_halls() {
        let students: Vec<Person> = (1..=4)
            .map(|i| student(&format!("per-{i}"), &format!("21CS{i:03}")))
            .collect();
        let halls = vec![hall("hal-1", "H101", 10), hall("hal-2", "H102", 10)];
        let seats = fallback_allocation(&students, &halls, ExamType::Sem).unwrap();
        let placed: Vec<(&str, i64)> = seats
            .iter()
            .map(|s| (s.hall_number.as_str(), s.seat_number))
            .collect();
        assert_eq!(
            placed,
            vec![("H101", 1), ("H102", 1), ("H101", 2), ("H102", 2)]
        );
    }

    #[test]
    fn internal_pairs_alternate_left_right() {
        let students: Vec<Person> = (1..=4)
            .map(|i| student(&format!("per-{i}"), &format!("21CS{i:03}")))
            .collect();
        let halls = vec![hall("hal-1", "H101", 2)];
        let seats = fallback_allocation(&students, &halls, ExamType::Internal1).unwrap();
        let sides: Vec<Option<bool>> = seats.iter().map(|s| s.is_left_seat).collect();
        assert_eq!(sides, vec![Some(true), Some(false), Some(true), Some(false)]);
    }

    #[test]
    fn sem_seats_have_no_side() {
        let students = vec![student("per-1", "21CS001")];
        let halls = vec![hall("hal-1", "H101", 5)];
        let seats = fallback_allocation(&students, &halls, ExamType::Sem).unwrap();
        assert_eq!(seats[0].is_left_seat, None);
    }

    #[test]
    fn internal_doubles_bench_capacity() {
        // 2 benches seat 4 students for internals, 2 for SEM.
        let students: Vec<Person> = (1..=4)
            .map(|i| student(&format!("per-{i}"), &format!("21CS{i:03}")))
            .collect();
        let halls = vec![hall("hal-1", "H101", 2)];
        assert!(fallback_allocation(&students, &halls, ExamType::Internal2).is_ok());
        let err = fallback_allocation(&students, &halls, ExamType::Sem).unwrap_err();
        assert_eq!(err.required, 4);
        assert_eq!(err.available, 2);
    }

    #[test]
    fn fallback_is_deterministic() {
        let students: Vec<Person> = (1..=9)
            .map(|i| student(&format!("per-{i}"), &format!("21CS{i:03}")))
            .collect();
        let halls = vec![hall("hal-1", "H101", 3), hall("hal-2", "H102", 3)];
        let a = fallback_allocation(&students, &halls, ExamType::Internal1).unwrap();
        let b = fallback_allocation(&students, &halls, ExamType::Internal1).unwrap();
        assert_eq!(a, b);
    }
}
