use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Gradebook entry. At most one Grade document exists per (learner, quiz)
/// pair; it always reflects the highest percentage achieved across all
/// attempts for that quiz.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Grade {
    pub id: String,
    pub learner_id: String,
    pub course_id: String,
    pub quiz_id: String,
    pub quiz_title: String,
    pub subject: String,
    pub value: u8,
    pub percentage: u8,
    pub attempt_number: u32,
    pub is_best_attempt: bool,
    pub comment: String,
    /// Identity of the course owner, empty when the course could not be
    /// resolved at grading time.
    #[serde(default)]
    pub graded_by: String,
    pub graded_at: DateTime<Utc>,
    pub grade_type: String,
}

impl Grade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        learner_id: &str,
        course_id: &str,
        quiz_id: &str,
        quiz_title: &str,
        subject: &str,
        percentage: u8,
        attempt_number: u32,
        graded_by: &str,
    ) -> Self {
        let value = value_for_percentage(percentage);
        Grade {
            id: Uuid::new_v4().to_string(),
            learner_id: learner_id.to_string(),
            course_id: course_id.to_string(),
            quiz_id: quiz_id.to_string(),
            quiz_title: quiz_title.to_string(),
            subject: subject.to_string(),
            value,
            percentage,
            attempt_number,
            is_best_attempt: true,
            comment: grade_comment(quiz_title, percentage, attempt_number),
            graded_by: graded_by.to_string(),
            graded_at: Utc::now(),
            grade_type: "Quiz".to_string(),
        }
    }
}

/// Fixed percentage-to-grade table on the 1-5 school scale. Monotonic,
/// non-decreasing in percentage.
pub fn value_for_percentage(percentage: u8) -> u8 {
    if percentage >= 90 {
        5
    } else if percentage >= 75 {
        4
    } else if percentage >= 60 {
        3
    } else if percentage >= 40 {
        2
    } else {
        1
    }
}

pub fn value_description(value: u8) -> &'static str {
    match value {
        5 => "Excellent",
        4 => "Good",
        3 => "Satisfactory",
        2 => "Passing",
        1 => "Failing",
        _ => "Unknown",
    }
}

pub fn grade_comment(quiz_title: &str, percentage: u8, attempt_number: u32) -> String {
    format!(
        "Quiz: {} - {}% ({}) - attempt {}",
        quiz_title,
        percentage,
        value_description(value_for_percentage(percentage)),
        attempt_number
    )
}
