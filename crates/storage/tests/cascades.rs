#![forbid(unsafe_code)]

use dp_core::scoring::QuestionRating;
use dp_storage::{
    NewCourse, NewCourseAssignment, NewElectiveAssignment, NewElectiveCourse, NewFaculty,
    NewFeedback, NewStudent, NewUser, SqliteStore, StoreError,
};
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

fn seed_faculty(store: &mut SqliteStore, id: &str) {
    store
        .insert_faculty(NewFaculty {
            id: id.to_string(),
            name: "Ramesh Kumar".to_string(),
            designation: Some("Assistant Professor".to_string()),
        })
        .expect("insert faculty");
    store
        .ensure_user(NewUser {
            id: id.to_string(),
            role: "faculty".to_string(),
            name: "Ramesh Kumar".to_string(),
            password: "rameF001123".to_string(),
            email: None,
        })
        .expect("faculty credential");
}

fn seed_student(store: &mut SqliteStore, id: &str, semester: i64) {
    store
        .insert_student(NewStudent {
            id: id.to_string(),
            name: "Anita Rao".to_string(),
            email: None,
            batch: "B1".to_string(),
            joined_year: 2022,
            current_semester: semester,
        })
        .expect("insert student");
    store
        .ensure_user(NewUser {
            id: id.to_string(),
            role: "student".to_string(),
            name: "Anita Rao".to_string(),
            password: "4".to_string(),
            email: None,
        })
        .expect("student credential");
}

fn sample_feedback(student_id: &str, faculty_id: &str, course_code: &str) -> NewFeedback {
    NewFeedback {
        student_id: student_id.to_string(),
        faculty_id: faculty_id.to_string(),
        course_code: course_code.to_string(),
        batch: "B1".to_string(),
        semester: 4,
        questions: vec![QuestionRating {
            question: "Clarity of lectures".to_string(),
            rating: 4,
        }],
        comments: None,
        score: 4.0 / 55.0 * 25.0,
        created_at_ms: 1_700_000_000_000,
    }
}

#[test]
fn faculty_cascade_removes_every_dependent_record() {
    let storage_dir = temp_dir("faculty_cascade_removes_every_dependent_record");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    seed_faculty(&mut store, "F001");
    seed_student(&mut store, "21CS054", 4);
    store
        .insert_course(NewCourse {
            code: "CS401".to_string(),
            name: "Operating Systems".to_string(),
            semester: 4,
        })
        .expect("insert course");
    store
        .insert_elective_course(NewElectiveCourse {
            code: "EL201".to_string(),
            name: "Game Design".to_string(),
            semester: 5,
        })
        .expect("insert elective");

    store
        .assign_course_faculty(NewCourseAssignment {
            course_code: "CS401".to_string(),
            faculty_id: "F001".to_string(),
            semester: 4,
            batch: "B1".to_string(),
        })
        .expect("course assignment");
    store
        .assign_elective_faculty(NewElectiveAssignment {
            elective_code: "EL201".to_string(),
            faculty_id: "F001".to_string(),
            batch: 2,
        })
        .expect("elective assignment");
    store
        .insert_feedback(sample_feedback("21CS054", "F001", "CS401"))
        .expect("insert feedback");

    let cascade = store.delete_faculty("F001").expect("delete faculty");
    assert_eq!(cascade.feedback_deleted, 1);
    assert_eq!(cascade.course_assignments_deleted, 1);
    assert_eq!(cascade.elective_assignments_deleted, 1);

    assert!(store.get_faculty("F001").expect("get faculty").is_none());
    assert!(store.get_user("F001", "faculty").expect("get user").is_none());
    assert!(store.feedback_by_faculty("F001").expect("feedback").is_empty());
    assert!(store
        .course_assignments_by_faculty("F001")
        .expect("course assignments")
        .is_empty());
    assert!(store
        .elective_assignments_by_faculty("F001")
        .expect("elective assignments")
        .is_empty());
}

#[test]
fn faculty_cascade_rejects_unknown_id() {
    let storage_dir = temp_dir("faculty_cascade_rejects_unknown_id");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    let err = store.delete_faculty("F404").expect_err("missing faculty");
    assert!(matches!(err, StoreError::UnknownId));
}

#[test]
fn student_delete_removes_credential() {
    let storage_dir = temp_dir("student_delete_removes_credential");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    seed_student(&mut store, "21CS054", 4);
    store.delete_student("21CS054").expect("delete student");

    assert!(store.get_student("21CS054").expect("get student").is_none());
    assert!(store
        .get_user("21CS054", "student")
        .expect("get user")
        .is_none());
}

#[test]
fn semester_delete_removes_only_matching_students() {
    let storage_dir = temp_dir("semester_delete_removes_only_matching_students");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    seed_student(&mut store, "21CS054", 4);
    seed_student(&mut store, "21CS055", 4);
    seed_student(&mut store, "22CS010", 2);

    let deleted = store.delete_students_by_semester(4).expect("bulk delete");
    assert_eq!(deleted, 2);

    assert!(store.get_student("21CS054").expect("get").is_none());
    assert!(store.get_user("21CS054", "student").expect("user").is_none());
    assert!(store.get_student("22CS010").expect("get").is_some());
    assert!(store.get_user("22CS010", "student").expect("user").is_some());
}

#[test]
fn course_delete_takes_its_assignments() {
    let storage_dir = temp_dir("course_delete_takes_its_assignments");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    seed_faculty(&mut store, "F001");
    store
        .insert_course(NewCourse {
            code: "CS401".to_string(),
            name: "Operating Systems".to_string(),
            semester: 4,
        })
        .expect("insert course");
    store
        .assign_course_faculty(NewCourseAssignment {
            course_code: "CS401".to_string(),
            faculty_id: "F001".to_string(),
            semester: 4,
            batch: "B1".to_string(),
        })
        .expect("assignment");

    let assignments = store.delete_course("CS401").expect("delete course");
    assert_eq!(assignments, 1);
    assert!(store.get_course("CS401").expect("get course").is_none());
    assert!(store
        .list_course_assignments()
        .expect("assignments")
        .is_empty());
}

#[test]
fn elective_delete_pulls_choices_from_every_student() {
    let storage_dir = temp_dir("elective_delete_pulls_choices_from_every_student");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    seed_faculty(&mut store, "F001");
    seed_student(&mut store, "21CS054", 5);
    seed_student(&mut store, "21CS055", 5);
    store
        .insert_elective_course(NewElectiveCourse {
            code: "EL201".to_string(),
            name: "Game Design".to_string(),
            semester: 5,
        })
        .expect("insert elective");
    store
        .insert_elective_course(NewElectiveCourse {
            code: "EL202".to_string(),
            name: "Compilers Lab".to_string(),
            semester: 5,
        })
        .expect("insert second elective");

    store
        .assign_elective_faculty(NewElectiveAssignment {
            elective_code: "EL201".to_string(),
            faculty_id: "F001".to_string(),
            batch: 1,
        })
        .expect("faculty assignment");
    assert!(store
        .add_elective_choice("21CS054", "EL201", 1)
        .expect("choice"));
    assert!(store
        .add_elective_choice("21CS054", "EL202", 2)
        .expect("second choice"));
    assert!(store
        .add_elective_choice("21CS055", "EL201", 1)
        .expect("choice"));

    let cascade = store
        .delete_elective_course("EL201")
        .expect("delete elective");
    assert_eq!(cascade.faculty_assignments_deleted, 1);
    assert_eq!(cascade.student_choices_pulled, 2);

    let remaining = store
        .elective_choices_for_student("21CS054")
        .expect("choices");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].elective_code, "EL202");
    assert!(store
        .elective_choices_for_student("21CS055")
        .expect("choices")
        .is_empty());
}

#[test]
fn elective_choice_is_add_to_set() {
    let storage_dir = temp_dir("elective_choice_is_add_to_set");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    seed_student(&mut store, "21CS054", 5);
    assert!(store
        .add_elective_choice("21CS054", "EL201", 1)
        .expect("first add"));
    assert!(!store
        .add_elective_choice("21CS054", "EL201", 1)
        .expect("repeat add"));
    // Same elective in another batch counts as a different pair.
    assert!(store
        .add_elective_choice("21CS054", "EL201", 2)
        .expect("other batch"));

    let choices = store
        .elective_choices_for_student("21CS054")
        .expect("choices");
    assert_eq!(choices.len(), 2);
}
