#![forbid(unsafe_code)]

use dp_portal::{
    Caller, GrievanceOutcome, GrievanceStatus, Portal, PortalError, Role, SubmitGrievance,
};
use dp_storage::NewStudent;
use std::path::PathBuf;

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let dir = base.join(format!("dp_portal_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn seed_portal(test_name: &str) -> Portal {
    let mut portal = Portal::open(temp_dir(test_name)).expect("open portal");
    portal
        .store_mut()
        .insert_student(NewStudent {
            id: "21CS054".to_string(),
            name: "Anita Rao".to_string(),
            email: None,
            batch: "B1".to_string(),
            joined_year: 2022,
            current_semester: 4,
        })
        .expect("insert student");
    portal
}

fn grievance(student_id: &str, subject: &str) -> SubmitGrievance {
    SubmitGrievance {
        student_id: student_id.to_string(),
        faculty_id: None,
        course_code: None,
        batch: "B1".to_string(),
        semester: 4,
        category: "Infrastructure".to_string(),
        subject: subject.to_string(),
        body: "The projector in LH-3 has not worked for two weeks.".to_string(),
    }
}

fn student(id: &str) -> Caller {
    Caller::new(id, Role::Student)
}

fn admin() -> Caller {
    Caller::new("admin", Role::Admin)
}

#[test]
fn resolving_notifies_and_removes_the_grievance() {
    let mut portal = seed_portal("resolving_notifies_and_removes_the_grievance");

    let submitted = portal
        .submit_grievance_at(&student("21CS054"), grievance("21CS054", "Projector broken"), 1_000)
        .expect("submit");
    assert_eq!(submitted.status, "Pending");

    let outcome = portal
        .update_grievance_at(
            &admin(),
            &submitted.id,
            GrievanceStatus::Resolved,
            Some("Replaced on Monday".to_string()),
            2_000,
        )
        .expect("resolve");

    let GrievanceOutcome::Closed(notification) = outcome else {
        panic!("terminal status must close the grievance");
    };
    assert_eq!(
        notification.message,
        "Your grievance regarding \"Projector broken\" has been Resolved. \
         Response: Replaced on Monday"
    );
    assert!(!notification.is_read);

    let err = portal
        .get_grievance(&admin(), &submitted.id)
        .expect_err("grievance is gone");
    assert!(matches!(err, PortalError::NotFound("grievance")));

    let inbox = portal
        .notifications_for_student(&student("21CS054"), "21CS054")
        .expect("inbox");
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].grievance_id, submitted.id);
}

#[test]
fn terminal_status_requires_a_response() {
    let mut portal = seed_portal("terminal_status_requires_a_response");

    let submitted = portal
        .submit_grievance_at(&student("21CS054"), grievance("21CS054", "Lab access"), 1_000)
        .expect("submit");

    for response in [None, Some("   ".to_string())] {
        let err = portal
            .update_grievance_at(
                &admin(),
                &submitted.id,
                GrievanceStatus::Rejected,
                response,
                2_000,
            )
            .expect_err("empty response");
        assert!(matches!(err, PortalError::Validation(_)));
    }

    // Still pending; nothing was deleted or notified.
    let still_there = portal
        .get_grievance(&admin(), &submitted.id)
        .expect("grievance survives");
    assert_eq!(still_there.status, "Pending");
    assert!(
        portal
            .notifications_for_student(&admin(), "21CS054")
            .expect("inbox")
            .is_empty()
    );
}

#[test]
fn non_terminal_update_returns_the_updated_grievance() {
    let mut portal = seed_portal("non_terminal_update_returns_the_updated_grievance");

    let submitted = portal
        .submit_grievance_at(&student("21CS054"), grievance("21CS054", "Lab access"), 1_000)
        .expect("submit");

    let outcome = portal
        .update_grievance_at(
            &admin(),
            &submitted.id,
            GrievanceStatus::InProgress,
            Some("Checking with the lab in charge".to_string()),
            2_000,
        )
        .expect("update");

    let GrievanceOutcome::Updated(view) = outcome else {
        panic!("non-terminal status keeps the grievance");
    };
    assert_eq!(view.status, "In Progress");
    assert_eq!(
        view.admin_response.as_deref(),
        Some("Checking with the lab in charge")
    );
}

#[test]
fn submission_is_validated_and_self_scoped() {
    let mut portal = seed_portal("submission_is_validated_and_self_scoped");

    let mut blank_subject = grievance("21CS054", "  ");
    blank_subject.subject = "  ".to_string();
    let err = portal
        .submit_grievance_at(&student("21CS054"), blank_subject, 1_000)
        .expect_err("blank subject");
    assert!(matches!(err, PortalError::Validation(_)));

    let err = portal
        .submit_grievance_at(&student("21CS055"), grievance("21CS054", "Spoofed"), 1_000)
        .expect_err("submitting for someone else");
    assert!(matches!(err, PortalError::Forbidden(_)));

    let err = portal
        .submit_grievance_at(&admin(), grievance("21CS054", "By admin"), 1_000)
        .expect_err("admins do not submit grievances");
    assert!(matches!(err, PortalError::Forbidden(_)));
}

#[test]
fn listing_is_admin_only_and_per_student_reads_are_self_scoped() {
    let mut portal = seed_portal("listing_is_admin_only_and_per_student_reads_are_self_scoped");

    portal
        .submit_grievance_at(&student("21CS054"), grievance("21CS054", "One"), 1_000)
        .expect("submit");

    let err = portal
        .list_grievances(&student("21CS054"))
        .expect_err("students cannot list everything");
    assert!(matches!(err, PortalError::Forbidden(_)));

    let err = portal
        .grievances_by_student(&student("21CS055"), "21CS054")
        .expect_err("not their grievances");
    assert!(matches!(err, PortalError::Forbidden(_)));

    assert_eq!(
        portal
            .grievances_by_student(&student("21CS054"), "21CS054")
            .expect("own grievances")
            .len(),
        1
    );
    assert_eq!(
        portal
            .grievances_by_student(&admin(), "21CS054")
            .expect("admin view")
            .len(),
        1
    );

    let stats = portal.grievance_stats(&admin()).expect("stats");
    assert_eq!(stats.total, 1);
    assert_eq!(stats.pending, 1);
}

#[test]
fn notification_reads_are_self_scoped() {
    let mut portal = seed_portal("notification_reads_are_self_scoped");

    let submitted = portal
        .submit_grievance_at(&student("21CS054"), grievance("21CS054", "One"), 1_000)
        .expect("submit");
    portal
        .update_grievance_at(
            &admin(),
            &submitted.id,
            GrievanceStatus::Resolved,
            Some("Done".to_string()),
            2_000,
        )
        .expect("resolve");

    let err = portal
        .notifications_for_student(&student("21CS055"), "21CS054")
        .expect_err("not their inbox");
    assert!(matches!(err, PortalError::Forbidden(_)));

    let inbox = portal
        .notifications_for_student(&student("21CS054"), "21CS054")
        .expect("inbox");
    let marked = portal
        .mark_notification_read(&inbox[0].id)
        .expect("mark read");
    assert!(marked.is_read);

    assert_eq!(
        portal
            .mark_all_notifications_read(&student("21CS054"), "21CS054")
            .expect("mark all"),
        0
    );
}
