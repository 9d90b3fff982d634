//! Store integration tests covering the full exam lifecycle:
//! - Schedule: create, cycle uniqueness, status machine, SEM authorization
//! - Timetable: bulk insert ordering
//! - Halls: exam capacity derivation and bounds
//! - Seating: batch replace, seat/student uniqueness
//! - Tickets: upsert, downloaded lock, download reset
//! - Attendance: first-write provenance on re-mark, correction reason guard
//! - Audit trail: authorization and modification entries
//! - Cascade delete counts

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use proctor_core::enums::{
    AllocationMethod, AttendanceStatus, AuditAction, EntityType, ExamSession, ExamType, PersonRole,
    ScheduleStatus, VerificationMethod,
};
use proctor_db::error::StoreError;
use proctor_db::repos::attendance::NewAttendanceMark;
use proctor_db::repos::hall::NewHall;
use proctor_db::repos::person::NewPerson;
use proctor_db::repos::schedule::NewSchedule;
use proctor_db::repos::seating::NewAllocation;
use proctor_db::repos::ticket::NewTicket;
use proctor_db::repos::timetable::NewTimetableEntry;
use proctor_db::store::ExamStore;

async fn test_store() -> ExamStore {
    ExamStore::new_local(":memory:").await.unwrap()
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn sem_schedule() -> NewSchedule {
    NewSchedule {
        academic_year: "2025-2026".to_string(),
        exam_type: ExamType::Sem,
        year: 3,
        semester: 5,
        session: ExamSession::Forenoon,
        start_date: date("2025-11-10"),
        end_date: date("2025-11-21"),
        holidays: vec![date("2025-11-14")],
        selected_faculty: vec!["per-aaaaaaaa".to_string()],
        selected_halls: vec!["hal-aaaaaaaa".to_string()],
    }
}

fn internal_schedule() -> NewSchedule {
    NewSchedule {
        exam_type: ExamType::Internal1,
        session: ExamSession::Afternoon,
        ..sem_schedule()
    }
}

fn new_entry(code: &str, day: &str) -> NewTimetableEntry {
    NewTimetableEntry {
        subject_code: code.to_string(),
        subject_name: format!("Subject {code}"),
        date: date(day),
        time_start: "09:30".to_string(),
        time_end: "12:30".to_string(),
        halls: vec!["H101".to_string()],
        invigilators: vec!["per-aaaaaaaa".to_string()],
        violations: vec![],
    }
}

async fn new_student(store: &ExamStore, reg: &str) -> String {
    store
        .create_person(&NewPerson {
            register_number: Some(reg.to_string()),
            name: format!("Student {reg}"),
            role: PersonRole::Student,
            year: Some(3),
            department: Some("CSE".to_string()),
        })
        .await
        .unwrap()
        .id
}

// ---------------------------------------------------------------------------
// Schedule tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn schedule_create_starts_draft() {
    let store = test_store().await;
    let schedule = store.create_schedule(&sem_schedule()).await.unwrap();
    assert_eq!(schedule.status, ScheduleStatus::Draft);
    assert!(!schedule.hall_tickets_authorized);
    assert!(schedule.id.starts_with("sch-"));
    assert_eq!(schedule.holidays, vec![date("2025-11-14")]);
}

#[tokio::test]
async fn schedule_duplicate_cycle_conflicts() {
    let store = test_store().await;
    store.create_schedule(&sem_schedule()).await.unwrap();
    let err = store.create_schedule(&sem_schedule()).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)), "got {err:?}");

    // Same cycle with a different exam type is a distinct cycle.
    store.create_schedule(&internal_schedule()).await.unwrap();
}

#[tokio::test]
async fn schedule_status_machine_enforced() {
    let store = test_store().await;
    let schedule = store.create_schedule(&sem_schedule()).await.unwrap();

    // Draft cannot jump straight to completed.
    let err = store
        .set_schedule_status(&schedule.id, ScheduleStatus::Completed)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidState(_)));

    let scheduled = store
        .set_schedule_status(&schedule.id, ScheduleStatus::Scheduled)
        .await
        .unwrap();
    assert_eq!(scheduled.status, ScheduleStatus::Scheduled);

    let in_progress = store
        .set_schedule_status(&schedule.id, ScheduleStatus::InProgress)
        .await
        .unwrap();
    assert_eq!(in_progress.status, ScheduleStatus::InProgress);

    let completed = store
        .set_schedule_status(&schedule.id, ScheduleStatus::Completed)
        .await
        .unwrap();
    assert_eq!(completed.status, ScheduleStatus::Completed);
}

#[tokio::test]
async fn authorize_hall_tickets_sem_only_once() {
    let store = test_store().await;
    let internal = store.create_schedule(&internal_schedule()).await.unwrap();
    let err = store
        .authorize_hall_tickets(&internal.id, "per-coe00001")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidState(_)));

    let sem = store.create_schedule(&sem_schedule()).await.unwrap();
    let authorized = store
        .authorize_hall_tickets(&sem.id, "per-coe00001")
        .await
        .unwrap();
    assert!(authorized.hall_tickets_authorized);
    assert_eq!(authorized.authorized_by.as_deref(), Some("per-coe00001"));

    // Repeating is rejected so the original authorizer is never re-stamped.
    let err = store
        .authorize_hall_tickets(&sem.id, "per-coe00002")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidState(_)));
}

#[tokio::test]
async fn schedule_artifacts_coalesce() {
    let store = test_store().await;
    let schedule = store.create_schedule(&sem_schedule()).await.unwrap();

    store
        .set_schedule_artifacts(&schedule.id, Some("uploads/timetables/t.pdf"), None, None)
        .await
        .unwrap();
    store
        .set_schedule_artifacts(&schedule.id, None, Some("uploads/seating/s.pdf"), None)
        .await
        .unwrap();

    let fetched = store.get_schedule(&schedule.id).await.unwrap();
    assert_eq!(
        fetched.timetable_pdf_path.as_deref(),
        Some("uploads/timetables/t.pdf")
    );
    assert_eq!(
        fetched.seating_student_pdf_path.as_deref(),
        Some("uploads/seating/s.pdf")
    );
    assert_eq!(fetched.seating_faculty_pdf_path, None);
}

// ---------------------------------------------------------------------------
// Timetable tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn timetable_bulk_insert_ordered() {
    let store = test_store().await;
    let schedule = store.create_schedule(&sem_schedule()).await.unwrap();

    let entries = store
        .insert_timetable_bulk(
            &schedule.id,
            &[
                new_entry("CS302", "2025-11-12"),
                new_entry("CS301", "2025-11-10"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].subject_code, "CS301");
    assert_eq!(entries[1].subject_code, "CS302");
    assert!(entries[0].id.starts_with("tte-"));
}

// ---------------------------------------------------------------------------
// Hall tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn hall_exam_capacity_defaults_to_half() {
    let store = test_store().await;
    let hall = store
        .create_hall(&NewHall {
            hall_number: "H101".to_string(),
            capacity: 60,
            exam_capacity: None,
            columns: 6,
            building: "Main Building".to_string(),
            floor: 1,
            facilities: vec!["projector".to_string()],
        })
        .await
        .unwrap();
    assert_eq!(hall.exam_capacity, 30);

    // Odd capacity floors.
    let odd = store
        .create_hall(&NewHall {
            hall_number: "H102".to_string(),
            capacity: 61,
            exam_capacity: None,
            columns: 6,
            building: "Main Building".to_string(),
            floor: 1,
            facilities: vec![],
        })
        .await
        .unwrap();
    assert_eq!(odd.exam_capacity, 30);
}

#[tokio::test]
async fn hall_exam_capacity_cannot_exceed_capacity() {
    let store = test_store().await;
    let err = store
        .create_hall(&NewHall {
            hall_number: "H103".to_string(),
            capacity: 40,
            exam_capacity: Some(50),
            columns: 5,
            building: "Annex".to_string(),
            floor: 2,
            facilities: vec![],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidState(_)));
}

#[tokio::test]
async fn hall_number_unique() {
    let store = test_store().await;
    let new = NewHall {
        hall_number: "H101".to_string(),
        capacity: 60,
        exam_capacity: None,
        columns: 6,
        building: "Main Building".to_string(),
        floor: 1,
        facilities: vec![],
    };
    store.create_hall(&new).await.unwrap();
    let err = store.create_hall(&new).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
}

// ---------------------------------------------------------------------------
// Person tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn student_lookup_by_register_number() {
    let store = test_store().await;
    new_student(&store, "21CS042").await;

    let found = store
        .find_student_by_register_number("21CS042")
        .await
        .unwrap();
    assert_eq!(found.name, "Student 21CS042");

    let err = store
        .find_student_by_register_number("21CS999")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn students_by_year_ordered_by_register_number() {
    let store = test_store().await;
    new_student(&store, "21CS010").await;
    new_student(&store, "21CS002").await;
    new_student(&store, "21CS005").await;

    let students = store.list_students_by_year(3).await.unwrap();
    let regs: Vec<_> = students
        .iter()
        .filter_map(|s| s.register_number.as_deref())
        .collect();
    assert_eq!(regs, vec!["21CS002", "21CS005", "21CS010"]);
}

// ---------------------------------------------------------------------------
// Seating tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn seating_replace_is_all_or_nothing() {
    let store = test_store().await;
    let schedule = store.create_schedule(&sem_schedule()).await.unwrap();
    let hall = store
        .create_hall(&NewHall {
            hall_number: "H101".to_string(),
            capacity: 60,
            exam_capacity: None,
            columns: 6,
            building: "Main Building".to_string(),
            floor: 1,
            facilities: vec![],
        })
        .await
        .unwrap();
    let s1 = new_student(&store, "21CS001").await;
    let s2 = new_student(&store, "21CS002").await;

    let good = vec![
        NewAllocation {
            hall_id: hall.id.clone(),
            hall_number: hall.hall_number.clone(),
            seat_number: 1,
            student_id: s1.clone(),
            register_number: "21CS001".to_string(),
            is_left_seat: None,
        },
        NewAllocation {
            hall_id: hall.id.clone(),
            hall_number: hall.hall_number.clone(),
            seat_number: 2,
            student_id: s2.clone(),
            register_number: "21CS002".to_string(),
            is_left_seat: None,
        },
    ];
    let plan = store
        .replace_seating(&schedule.id, &good, AllocationMethod::Fallback)
        .await
        .unwrap();
    assert_eq!(plan.len(), 2);

    // A batch that double-books a seat fails and keeps the previous plan.
    let bad = vec![
        NewAllocation {
            seat_number: 1,
            student_id: s1.clone(),
            register_number: "21CS001".to_string(),
            ..good[0].clone()
        },
        NewAllocation {
            seat_number: 1,
            student_id: s2.clone(),
            register_number: "21CS002".to_string(),
            ..good[1].clone()
        },
    ];
    let err = store
        .replace_seating(&schedule.id, &bad, AllocationMethod::Fallback)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));

    let kept = store.list_seating(&schedule.id).await.unwrap();
    assert_eq!(kept.len(), 2);
    assert_eq!(kept[0].seat_number, 1);
    assert_eq!(kept[1].seat_number, 2);
}

// ---------------------------------------------------------------------------
// Ticket tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ticket_upsert_and_downloaded_lock() {
    let store = test_store().await;
    let schedule = store.create_schedule(&sem_schedule()).await.unwrap();
    let student = new_student(&store, "21CS001").await;

    let new = NewTicket {
        student_id: student.clone(),
        schedule_id: schedule.id.clone(),
        register_number: "21CS001".to_string(),
        qr_code_data: "{\"sig\":\"aa\"}".to_string(),
        pdf_path: None,
        authorized_by: "per-coe00001".to_string(),
    };
    let ticket = store.upsert_ticket(&new).await.unwrap();
    assert!(ticket.authorized);
    assert!(!ticket.downloaded);

    // Re-issue before download replaces credential material in place.
    let reissued = store
        .upsert_ticket(&NewTicket {
            qr_code_data: "{\"sig\":\"bb\"}".to_string(),
            ..new.clone()
        })
        .await
        .unwrap();
    assert_eq!(reissued.id, ticket.id);
    assert_eq!(reissued.qr_code_data, "{\"sig\":\"bb\"}");

    // Once downloaded, re-issue is refused until an explicit reset.
    let downloaded = store.mark_ticket_downloaded(&ticket.id).await.unwrap();
    assert!(downloaded.downloaded);
    assert!(downloaded.downloaded_at.is_some());

    let err = store.upsert_ticket(&new).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidState(_)));

    let reset = store
        .reset_ticket_download(&ticket.id, "per-coe00001")
        .await
        .unwrap();
    assert!(!reset.downloaded);
    assert_eq!(reset.downloaded_at, None);

    store.upsert_ticket(&new).await.unwrap();
}

#[tokio::test]
async fn ticket_download_idempotent() {
    let store = test_store().await;
    let schedule = store.create_schedule(&sem_schedule()).await.unwrap();
    let student = new_student(&store, "21CS001").await;

    let ticket = store
        .upsert_ticket(&NewTicket {
            student_id: student,
            schedule_id: schedule.id,
            register_number: "21CS001".to_string(),
            qr_code_data: "{}".to_string(),
            pdf_path: None,
            authorized_by: "per-coe00001".to_string(),
        })
        .await
        .unwrap();

    let first = store.mark_ticket_downloaded(&ticket.id).await.unwrap();
    let second = store.mark_ticket_downloaded(&ticket.id).await.unwrap();
    assert_eq!(first.downloaded_at, second.downloaded_at);
}

// ---------------------------------------------------------------------------
// Attendance tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn attendance_remark_keeps_first_write_provenance() {
    let store = test_store().await;
    let schedule = store.create_schedule(&sem_schedule()).await.unwrap();
    let entries = store
        .insert_timetable_bulk(&schedule.id, &[new_entry("CS301", "2025-11-10")])
        .await
        .unwrap();
    let student = new_student(&store, "21CS001").await;

    let first = store
        .mark_attendance(&NewAttendanceMark {
            timetable_id: entries[0].id.clone(),
            student_id: student.clone(),
            register_number: "21CS001".to_string(),
            status: AttendanceStatus::Present,
            verification_method: VerificationMethod::QrScan,
            marked_by: "per-fac00001".to_string(),
            modification_reason: None,
        })
        .await
        .unwrap();
    assert_eq!(first.marked_by, "per-fac00001");
    assert_eq!(first.modified_by, None);

    let corrected = store
        .mark_attendance(&NewAttendanceMark {
            timetable_id: entries[0].id.clone(),
            student_id: student.clone(),
            register_number: "21CS001".to_string(),
            status: AttendanceStatus::Late,
            verification_method: VerificationMethod::ManualEntry,
            marked_by: "per-coe00001".to_string(),
            modification_reason: Some("arrived 20 minutes late".to_string()),
        })
        .await
        .unwrap();

    // Same record, updated status, original provenance intact.
    assert_eq!(corrected.id, first.id);
    assert_eq!(corrected.status, AttendanceStatus::Late);
    assert_eq!(corrected.marked_by, "per-fac00001");
    assert_eq!(corrected.marked_at, first.marked_at);
    assert_eq!(corrected.modified_by.as_deref(), Some("per-coe00001"));
    assert_eq!(
        corrected.modification_reason.as_deref(),
        Some("arrived 20 minutes late")
    );

    let records = store.list_attendance(&entries[0].id).await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn attendance_correction_by_other_actor_requires_reason() {
    let store = test_store().await;
    let schedule = store.create_schedule(&sem_schedule()).await.unwrap();
    let entries = store
        .insert_timetable_bulk(&schedule.id, &[new_entry("CS301", "2025-11-10")])
        .await
        .unwrap();
    let student = new_student(&store, "21CS001").await;

    let mark = NewAttendanceMark {
        timetable_id: entries[0].id.clone(),
        student_id: student.clone(),
        register_number: "21CS001".to_string(),
        status: AttendanceStatus::Present,
        verification_method: VerificationMethod::QrScan,
        marked_by: "per-fac00001".to_string(),
        modification_reason: None,
    };
    let first = store.mark_attendance(&mark).await.unwrap();

    // A different actor must say why they are overriding the original mark.
    let err = store
        .mark_attendance(&NewAttendanceMark {
            status: AttendanceStatus::Absent,
            marked_by: "per-coe00001".to_string(),
            modification_reason: None,
            ..mark.clone()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidState(_)));
    let unchanged = store.get_attendance(&first.id).await.unwrap();
    assert_eq!(unchanged.status, AttendanceStatus::Present);
    assert_eq!(unchanged.modification_reason, None);

    // The original marker may re-mark without one.
    let remarked = store
        .mark_attendance(&NewAttendanceMark {
            status: AttendanceStatus::Late,
            ..mark
        })
        .await
        .unwrap();
    assert_eq!(remarked.status, AttendanceStatus::Late);
}

#[tokio::test]
async fn attendance_unknown_timetable_entry() {
    let store = test_store().await;
    let student = new_student(&store, "21CS001").await;

    let err = store
        .mark_attendance(&NewAttendanceMark {
            timetable_id: "tte-deadbeef".to_string(),
            student_id: student,
            register_number: "21CS001".to_string(),
            status: AttendanceStatus::Present,
            verification_method: VerificationMethod::QrScan,
            marked_by: "per-fac00001".to_string(),
            modification_reason: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// Audit trail tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn audit_trail_records_authorization_and_modification() {
    let store = test_store().await;
    let sem = store.create_schedule(&sem_schedule()).await.unwrap();
    store
        .authorize_hall_tickets(&sem.id, "per-coe00001")
        .await
        .unwrap();

    let schedule_audit = store
        .list_audit_for(EntityType::Schedule, &sem.id)
        .await
        .unwrap();
    let authorized: Vec<_> = schedule_audit
        .iter()
        .filter(|entry| entry.action == AuditAction::Authorized)
        .collect();
    assert_eq!(authorized.len(), 1);
    assert_eq!(authorized[0].actor.as_deref(), Some("per-coe00001"));

    let entries = store
        .insert_timetable_bulk(&sem.id, &[new_entry("CS301", "2025-11-10")])
        .await
        .unwrap();
    let student = new_student(&store, "21CS001").await;
    let record = store
        .mark_attendance(&NewAttendanceMark {
            timetable_id: entries[0].id.clone(),
            student_id: student.clone(),
            register_number: "21CS001".to_string(),
            status: AttendanceStatus::Present,
            verification_method: VerificationMethod::QrScan,
            marked_by: "per-fac00001".to_string(),
            modification_reason: None,
        })
        .await
        .unwrap();
    store
        .mark_attendance(&NewAttendanceMark {
            timetable_id: entries[0].id.clone(),
            student_id: student,
            register_number: "21CS001".to_string(),
            status: AttendanceStatus::Absent,
            verification_method: VerificationMethod::ManualEntry,
            marked_by: "per-coe00001".to_string(),
            modification_reason: Some("recount after final tally".to_string()),
        })
        .await
        .unwrap();

    let actions: Vec<AuditAction> = store
        .list_audit_for(EntityType::AttendanceRecord, &record.id)
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.action)
        .collect();
    assert_eq!(actions, vec![AuditAction::Marked, AuditAction::Modified]);
}

// ---------------------------------------------------------------------------
// Cascade delete tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cascade_delete_counts_dependents() {
    let store = test_store().await;
    let schedule = store.create_schedule(&sem_schedule()).await.unwrap();
    let entries = store
        .insert_timetable_bulk(&schedule.id, &[new_entry("CS301", "2025-11-10")])
        .await
        .unwrap();
    let hall = store
        .create_hall(&NewHall {
            hall_number: "H101".to_string(),
            capacity: 60,
            exam_capacity: None,
            columns: 6,
            building: "Main Building".to_string(),
            floor: 1,
            facilities: vec![],
        })
        .await
        .unwrap();
    let student = new_student(&store, "21CS001").await;

    store
        .replace_seating(
            &schedule.id,
            &[NewAllocation {
                hall_id: hall.id.clone(),
                hall_number: hall.hall_number.clone(),
                seat_number: 1,
                student_id: student.clone(),
                register_number: "21CS001".to_string(),
                is_left_seat: None,
            }],
            AllocationMethod::Oracle,
        )
        .await
        .unwrap();
    store
        .upsert_ticket(&NewTicket {
            student_id: student.clone(),
            schedule_id: schedule.id.clone(),
            register_number: "21CS001".to_string(),
            qr_code_data: "{}".to_string(),
            pdf_path: None,
            authorized_by: "per-coe00001".to_string(),
        })
        .await
        .unwrap();
    store
        .mark_attendance(&NewAttendanceMark {
            timetable_id: entries[0].id.clone(),
            student_id: student,
            register_number: "21CS001".to_string(),
            status: AttendanceStatus::Present,
            verification_method: VerificationMethod::QrScan,
            marked_by: "per-fac00001".to_string(),
            modification_reason: None,
        })
        .await
        .unwrap();

    let counts = store.delete_schedule_cascade(&schedule.id).await.unwrap();
    assert_eq!(counts.timetable_entries, 1);
    assert_eq!(counts.seating_allocations, 1);
    assert_eq!(counts.hall_tickets, 1);
    assert_eq!(counts.attendance_records, 1);

    let err = store.get_schedule(&schedule.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
    assert!(store.list_timetable(&schedule.id).await.unwrap().is_empty());
}
