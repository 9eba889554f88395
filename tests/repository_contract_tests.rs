mod common;

use chrono::Utc;

use common::{
    math_course, InMemoryAttemptRecordRepository, InMemoryCourseRepository, InMemoryGradeRepository,
    InMemoryQuizResultRepository,
};
use edupanel_server::errors::AppError;
use edupanel_server::models::domain::{AttemptRecord, Grade, QuizResult};
use edupanel_server::repositories::{
    AttemptRecordRepository, CourseRepository, GradeImprovement, GradeRepository,
    QuizResultRepository,
};

fn make_grade(learner_id: &str, quiz_id: &str, percentage: u8) -> Grade {
    Grade::new(
        learner_id,
        "course-1",
        quiz_id,
        "Arithmetic",
        "Math",
        percentage,
        1,
        "teacher-1",
    )
}

#[tokio::test]
async fn attempt_records_count_and_sort_per_pair() {
    let repo = InMemoryAttemptRecordRepository::new();

    repo.create(AttemptRecord::new("quiz-1", "learner-a", 40, 1))
        .await
        .expect("create should work");
    repo.create(AttemptRecord::new("quiz-1", "learner-a", 80, 2))
        .await
        .expect("create should work");
    repo.create(AttemptRecord::new("quiz-2", "learner-a", 90, 1))
        .await
        .expect("create should work");
    repo.create(AttemptRecord::new("quiz-1", "learner-b", 10, 1))
        .await
        .expect("create should work");

    let count = repo
        .count_for("quiz-1", "learner-a")
        .await
        .expect("count should work");
    assert_eq!(count, 2);

    let history = repo
        .find_for("quiz-1", "learner-a")
        .await
        .expect("history should work");
    assert_eq!(history.len(), 2);
    assert!(history[0].submitted_at >= history[1].submitted_at);

    let duplicate = repo.create(history[0].clone()).await;
    assert!(matches!(duplicate, Err(AppError::DatabaseError(_))));
}

#[tokio::test]
async fn quiz_results_query_by_learner_and_quiz() {
    let repo = InMemoryQuizResultRepository::new();

    repo.create(QuizResult::new(
        "quiz-1",
        "course-1",
        "learner-a",
        Default::default(),
        Default::default(),
        50,
    ))
    .await
    .expect("create should work");
    repo.create(QuizResult::new(
        "quiz-1",
        "course-1",
        "learner-a",
        Default::default(),
        Default::default(),
        100,
    ))
    .await
    .expect("create should work");
    repo.create(QuizResult::new(
        "quiz-1",
        "course-1",
        "learner-b",
        Default::default(),
        Default::default(),
        70,
    ))
    .await
    .expect("create should work");

    let results = repo
        .find_by_learner_and_quiz("learner-a", "quiz-1")
        .await
        .expect("query should work");
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.learner_id == "learner-a"));
}

#[tokio::test]
async fn grade_pair_is_unique_and_update_is_conditional() {
    let repo = InMemoryGradeRepository::new();

    let grade = repo
        .create(make_grade("learner-a", "quiz-1", 60))
        .await
        .expect("create should work");

    let duplicate_pair = repo.create(make_grade("learner-a", "quiz-1", 80)).await;
    assert!(matches!(duplicate_pair, Err(AppError::DatabaseError(_))));

    let improvement = GradeImprovement {
        value: 5,
        percentage: 95,
        attempt_number: 2,
        comment: "Quiz: Arithmetic - 95% (Excellent) - attempt 2".to_string(),
        graded_by: "teacher-1".to_string(),
        graded_at: Utc::now(),
    };

    let updated = repo
        .update_if_improved(&grade.id, improvement.clone())
        .await
        .expect("update should work");
    assert!(updated);

    let stored = repo
        .find_by_learner_and_quiz("learner-a", "quiz-1")
        .await
        .expect("find should work")
        .expect("grade should exist");
    assert_eq!(stored.percentage, 95);
    assert_eq!(stored.value, 5);
    assert!(stored.is_best_attempt);

    // equal or worse: the filter does not match, nothing is modified
    let stale = GradeImprovement {
        value: 5,
        percentage: 95,
        ..improvement
    };
    let updated = repo
        .update_if_improved(&grade.id, stale)
        .await
        .expect("update should work");
    assert!(!updated);

    let missing = repo
        .update_if_improved(
            "grade-404",
            GradeImprovement {
                value: 5,
                percentage: 99,
                attempt_number: 3,
                comment: String::new(),
                graded_by: String::new(),
                graded_at: Utc::now(),
            },
        )
        .await
        .expect("update should work");
    assert!(!missing);
}

#[tokio::test]
async fn grades_list_by_learner_most_recent_first() {
    let repo = InMemoryGradeRepository::new();

    repo.create(make_grade("learner-a", "quiz-1", 60))
        .await
        .expect("create should work");
    repo.create(make_grade("learner-a", "quiz-2", 90))
        .await
        .expect("create should work");
    repo.create(make_grade("learner-b", "quiz-1", 30))
        .await
        .expect("create should work");

    let grades = repo
        .find_by_learner("learner-a")
        .await
        .expect("list should work");
    assert_eq!(grades.len(), 2);
    assert!(grades[0].graded_at >= grades[1].graded_at);
}

#[tokio::test]
async fn course_lookup_tolerates_absence() {
    let repo = InMemoryCourseRepository::new();
    repo.insert(math_course()).await;

    let found = repo
        .find_by_id("course-1")
        .await
        .expect("lookup should work")
        .expect("course should exist");
    assert_eq!(found.owner_identity(), Some("teacher-1"));

    let missing = repo
        .find_by_id("course-404")
        .await
        .expect("lookup should work");
    assert!(missing.is_none());
}
