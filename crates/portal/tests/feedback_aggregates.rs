#![forbid(unsafe_code)]

use dp_core::scoring::QuestionRating;
use dp_portal::{Caller, Portal, PortalError, Role, SubmitFeedback};
use dp_storage::{NewFaculty, NewStudent};
use std::path::PathBuf;

// 2023-01-01T00:00:00Z and 2024-01-01T00:00:00Z.
const MS_2023: i64 = 1_672_531_200_000;
const MS_2024: i64 = 1_704_067_200_000;

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
    for id in ["21CS054", "21CS055", "21CS056"] {
        portal
            .store_mut()
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
    portal
        .store_mut()
        .insert_faculty(NewFaculty {
            id: "F001".to_string(),
            name: "Ramesh Kumar".to_string(),
            designation: None,
        })
        .expect("insert faculty");
    portal
}

fn questions(ratings: &[u8]) -> Vec<QuestionRating> {
    ratings
        .iter()
        .enumerate()
        .map(|(index, rating)| QuestionRating {
            question: format!("Q{}", index + 1),
            rating: *rating,
        })
        .collect()
}

fn submission(student_id: &str, course_code: &str, ratings: &[u8]) -> SubmitFeedback {
    SubmitFeedback {
        student_id: student_id.to_string(),
        faculty_id: "F001".to_string(),
        course_code: course_code.to_string(),
        batch: "B1".to_string(),
        semester: 4,
        questions: questions(ratings),
        comments: None,
    }
}

fn student(id: &str) -> Caller {
    Caller::new(id, Role::Student)
}

fn admin() -> Caller {
    Caller::new("admin", Role::Admin)
}

#[test]
fn submission_computes_the_score_server_side() {
    let mut portal = seed_portal("submission_computes_the_score_server_side");

    let view = portal
        .submit_feedback_at(
            &student("21CS054"),
            submission("21CS054", "CS401", &[4; 11]),
            MS_2024,
        )
        .expect("submit");

    // 44 / 55 * 25
    assert_eq!(view.score, 20.0);
    let stored = portal
        .store()
        .get_student("21CS054")
        .expect("get")
        .expect("student");
    assert!(stored.feedback_given);
}

#[test]
fn submission_validation_and_authorization() {
    let mut portal = seed_portal("submission_validation_and_authorization");

    let err = portal
        .submit_feedback_at(
            &student("21CS054"),
            submission("21CS054", "CS401", &[4, 6]),
            MS_2024,
        )
        .expect_err("rating out of range");
    assert!(matches!(err, PortalError::Validation(_)));

    let err = portal
        .submit_feedback_at(
            &student("21CS054"),
            submission("21CS054", "CS401", &[]),
            MS_2024,
        )
        .expect_err("empty ratings");
    assert!(matches!(err, PortalError::Validation(_)));

    let mut bad_semester = submission("21CS054", "CS401", &[4, 4]);
    bad_semester.semester = 9;
    let err = portal
        .submit_feedback_at(&student("21CS054"), bad_semester, MS_2024)
        .expect_err("semester out of range");
    assert!(matches!(err, PortalError::Validation(_)));

    let err = portal
        .submit_feedback_at(
            &student("21CS055"),
            submission("21CS054", "CS401", &[4, 4]),
            MS_2024,
        )
        .expect_err("submitting for someone else");
    assert!(matches!(err, PortalError::Forbidden(_)));

    let err = portal
        .submit_feedback_at(&admin(), submission("21CS054", "CS401", &[4, 4]), MS_2024)
        .expect_err("admins do not submit feedback");
    assert!(matches!(err, PortalError::Forbidden(_)));
}

#[test]
fn duplicate_submission_is_rejected() {
    let mut portal = seed_portal("duplicate_submission_is_rejected");

    portal
        .submit_feedback_at(
            &student("21CS054"),
            submission("21CS054", "CS401", &[5, 4]),
            MS_2024,
        )
        .expect("first");
    let err = portal
        .submit_feedback_at(
            &student("21CS054"),
            submission("21CS054", "CS401", &[1, 1]),
            MS_2024,
        )
        .expect_err("same tuple");
    assert!(matches!(err, PortalError::Duplicate("feedback")));

    assert!(
        portal
            .feedback_exists(&student("21CS054"), "21CS054", "CS401", "B1", 4)
            .expect("exists")
    );
    assert!(
        !portal
            .feedback_exists(&admin(), "21CS055", "CS401", "B1", 4)
            .expect("exists")
    );
}

#[test]
fn faculty_average_is_rounded_and_zero_when_empty() {
    let mut portal = seed_portal("faculty_average_is_rounded_and_zero_when_empty");
    let faculty = Caller::new("F001", Role::Faculty);

    assert_eq!(
        portal
            .faculty_average_score(&faculty, "F001")
            .expect("empty average"),
        0.0
    );

    portal
        .submit_feedback_at(
            &student("21CS054"),
            submission("21CS054", "CS401", &[5, 4]),
            MS_2024,
        )
        .expect("first");
    portal
        .submit_feedback_at(
            &student("21CS055"),
            submission("21CS055", "CS401", &[3, 3]),
            MS_2024,
        )
        .expect("second");

    // mean(9/55*25, 6/55*25) = 7.5/55*25 = 3.409... -> 3.41
    assert_eq!(
        portal
            .faculty_average_score(&faculty, "F001")
            .expect("average"),
        3.41
    );

    let err = portal
        .faculty_average_score(&student("21CS054"), "F001")
        .expect_err("students cannot read aggregates");
    assert!(matches!(err, PortalError::Forbidden(_)));
}

#[test]
fn question_averages_are_index_aligned() {
    let mut portal = seed_portal("question_averages_are_index_aligned");

    portal
        .submit_feedback_at(
            &student("21CS054"),
            submission("21CS054", "CS401", &[5, 3]),
            MS_2023,
        )
        .expect("older");
    portal
        .submit_feedback_at(
            &student("21CS055"),
            submission("21CS055", "CS401", &[3, 3]),
            MS_2024,
        )
        .expect("newer");

    let averages = portal
        .faculty_question_averages(&admin(), "F001")
        .expect("averages");
    assert_eq!(averages.len(), 2);
    assert_eq!(averages[0].question, "Q1");
    assert_eq!(averages[0].average, 4.0);
    assert_eq!(averages[1].average, 3.0);

    assert!(
        portal
            .faculty_question_averages(&admin(), "F404")
            .expect("no submissions")
            .is_empty()
    );
}

#[test]
fn course_averages_group_per_course() {
    let mut portal = seed_portal("course_averages_group_per_course");

    portal
        .submit_feedback_at(
            &student("21CS054"),
            submission("21CS054", "CS401", &[5, 4]),
            MS_2024,
        )
        .expect("cs401 a");
    portal
        .submit_feedback_at(
            &student("21CS055"),
            submission("21CS055", "CS401", &[3, 3]),
            MS_2024,
        )
        .expect("cs401 b");
    portal
        .submit_feedback_at(
            &student("21CS056"),
            submission("21CS056", "CS402", &[5, 5]),
            MS_2024,
        )
        .expect("cs402");

    let averages = portal
        .faculty_course_averages(&admin(), "F001")
        .expect("course averages");
    assert_eq!(averages.len(), 2);
    // Average of each submission's own mean rating: mean(4.5, 3.0) = 3.75.
    assert_eq!(averages[0].course_code, "CS401");
    assert_eq!(averages[0].average, 3.75);
    assert_eq!(averages[0].submissions, 2);
    assert_eq!(averages[1].course_code, "CS402");
    assert_eq!(averages[1].average, 5.0);
    assert_eq!(averages[1].submissions, 1);
}

#[test]
fn course_averages_use_the_rating_scale_not_the_score_scale() {
    let mut portal = seed_portal("course_averages_use_the_rating_scale_not_the_score_scale");

    portal
        .submit_feedback_at(
            &student("21CS054"),
            submission("21CS054", "CS401", &[5; 11]),
            MS_2024,
        )
        .expect("full marks");

    let averages = portal
        .faculty_course_averages(&admin(), "F001")
        .expect("course averages");
    assert_eq!(averages.len(), 1);
    // A full-marks submission averages 5.0 per question; its score is 25.0.
    assert_eq!(averages[0].average, 5.0);
}

#[test]
fn yearly_averages_group_by_submission_year() {
    let mut portal = seed_portal("yearly_averages_group_by_submission_year");

    portal
        .submit_feedback_at(
            &student("21CS054"),
            submission("21CS054", "CS401", &[5, 4]),
            MS_2023,
        )
        .expect("2023");
    portal
        .submit_feedback_at(
            &student("21CS055"),
            submission("21CS055", "CS401", &[3, 3]),
            MS_2024,
        )
        .expect("2024 a");
    portal
        .submit_feedback_at(
            &student("21CS056"),
            submission("21CS056", "CS402", &[5, 5]),
            MS_2024,
        )
        .expect("2024 b");

    let by_year = portal
        .faculty_yearly_averages(&admin(), "F001")
        .expect("yearly");
    assert_eq!(by_year.len(), 2);
    // 9/55*25 -> 4.09; mean(6/55*25, 10/55*25) = 8/55*25 -> 3.64
    assert_eq!(by_year.get(&2023).copied(), Some(4.09));
    assert_eq!(by_year.get(&2024).copied(), Some(3.64));
}
