#![forbid(unsafe_code)]

use dp_core::GrievanceStatus;
use dp_storage::{NewGrievance, NewStudent, SqliteStore, StoreError};
use std::path::PathBuf;

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let dir = base.join(format!("dp_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn seed_student(store: &mut SqliteStore, id: &str) {
    store
        .insert_student(NewStudent {
            id: id.to_string(),
            name: "Anita Rao".to_string(),
            email: None,
            batch: "B1".to_string(),
            joined_year: 2022,
            current_semester: 4,
        })
        .expect("insert student");
}

fn grievance(student_id: &str, subject: &str, created_at_ms: i64) -> NewGrievance {
    NewGrievance {
        student_id: student_id.to_string(),
        faculty_id: None,
        course_code: None,
        batch: "B1".to_string(),
        semester: 4,
        category: "Infrastructure".to_string(),
        subject: subject.to_string(),
        body: "Details follow".to_string(),
        created_at_ms,
    }
}

#[test]
fn grievance_ids_come_from_the_counter() {
    let storage_dir = temp_dir("grievance_ids_come_from_the_counter");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    seed_student(&mut store, "21CS054");

    let first = store
        .insert_grievance(grievance("21CS054", "Projector broken", 1_700_000_000_000))
        .expect("first grievance");
    let second = store
        .insert_grievance(grievance("21CS054", "Lab access", 1_700_000_100_000))
        .expect("second grievance");

    assert_eq!(first.id, "GRV-0001");
    assert_eq!(second.id, "GRV-0002");
    assert_eq!(first.status, "Pending");
}

#[test]
fn closing_replaces_the_grievance_with_a_notification() {
    let storage_dir = temp_dir("closing_replaces_the_grievance_with_a_notification");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    seed_student(&mut store, "21CS054");

    let row = store
        .insert_grievance(grievance("21CS054", "Projector broken", 1_700_000_000_000))
        .expect("insert grievance");

    let notification = store
        .close_grievance(&row.id, "Fixed and verified", 1_700_000_500_000)
        .expect("close grievance");

    assert_eq!(notification.id, "NTF-0001");
    assert_eq!(notification.student_id, "21CS054");
    assert_eq!(notification.grievance_id, row.id);
    assert_eq!(notification.message, "Fixed and verified");
    assert!(!notification.is_read);

    assert!(store.get_grievance(&row.id).expect("get").is_none());
    let inbox = store
        .notifications_for_student("21CS054")
        .expect("notifications");
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].id, notification.id);
}

#[test]
fn closing_an_unknown_grievance_fails_cleanly() {
    let storage_dir = temp_dir("closing_an_unknown_grievance_fails_cleanly");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    let err = store
        .close_grievance("GRV-9999", "irrelevant", 0)
        .expect_err("missing grievance");
    assert!(matches!(err, StoreError::UnknownId));
    assert!(
        store
            .notifications_for_student("21CS054")
            .expect("notifications")
            .is_empty()
    );
}

#[test]
fn non_terminal_update_keeps_the_row() {
    let storage_dir = temp_dir("non_terminal_update_keeps_the_row");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    seed_student(&mut store, "21CS054");

    let row = store
        .insert_grievance(grievance("21CS054", "Lab access", 1_700_000_000_000))
        .expect("insert grievance");

    let updated = store
        .update_grievance_status(
            &row.id,
            GrievanceStatus::InProgress,
            Some("Looking into it".to_string()),
        )
        .expect("update status");
    assert_eq!(updated.status, "In Progress");
    assert_eq!(updated.admin_response.as_deref(), Some("Looking into it"));
    assert!(store.get_grievance(&row.id).expect("get").is_some());
}

#[test]
fn status_counts_group_by_stored_status() {
    let storage_dir = temp_dir("status_counts_group_by_stored_status");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    seed_student(&mut store, "21CS054");

    let a = store
        .insert_grievance(grievance("21CS054", "One", 1))
        .expect("a");
    store
        .insert_grievance(grievance("21CS054", "Two", 2))
        .expect("b");
    store
        .insert_grievance(grievance("21CS054", "Three", 3))
        .expect("c");
    store
        .update_grievance_status(&a.id, GrievanceStatus::InProgress, None)
        .expect("progress");

    let stats = store.grievance_status_counts().expect("stats");
    assert_eq!(stats.total, 3);
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.in_progress, 1);
    assert_eq!(stats.resolved, 0);
    assert_eq!(stats.rejected, 0);
}

#[test]
fn notification_read_marking() {
    let storage_dir = temp_dir("notification_read_marking");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    seed_student(&mut store, "21CS054");

    let first = store
        .insert_grievance(grievance("21CS054", "One", 1))
        .expect("first");
    let second = store
        .insert_grievance(grievance("21CS054", "Two", 2))
        .expect("second");
    let n1 = store
        .close_grievance(&first.id, "done", 10)
        .expect("close first");
    store
        .close_grievance(&second.id, "done", 20)
        .expect("close second");

    let marked = store.mark_notification_read(&n1.id).expect("mark one");
    assert!(marked.is_read);

    let remaining = store
        .mark_all_notifications_read("21CS054")
        .expect("mark all");
    assert_eq!(remaining, 1);

    store.delete_notification(&n1.id).expect("delete");
    let err = store
        .delete_notification(&n1.id)
        .expect_err("already deleted");
    assert!(matches!(err, StoreError::UnknownId));
}
