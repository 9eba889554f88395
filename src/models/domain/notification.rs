use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewGrade,
    GradeUpdated,
}

/// Created as a side effect whenever a grade is created or its value
/// increases; delivery is someone else's problem.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Notification {
    pub id: String,
    pub learner_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub quiz_id: String,
    pub course_id: String,
    pub grade_id: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn for_grade(
        kind: NotificationKind,
        learner_id: &str,
        quiz_id: &str,
        course_id: &str,
        grade_id: &str,
        quiz_title: &str,
        value: u8,
    ) -> Self {
        let (title, message) = match kind {
            NotificationKind::NewGrade => (
                format!("New grade: {}", quiz_title),
                format!("You received a {} for the quiz \"{}\"", value, quiz_title),
            ),
            NotificationKind::GradeUpdated => (
                format!("Grade updated: {}", quiz_title),
                format!("Your grade for the quiz \"{}\" improved to {}", quiz_title, value),
            ),
        };

        Notification {
            id: Uuid::new_v4().to_string(),
            learner_id: learner_id.to_string(),
            kind,
            title,
            message,
            quiz_id: quiz_id.to_string(),
            course_id: course_id.to_string(),
            grade_id: grade_id.to_string(),
            read: false,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_kind_serializes_snake_case() {
        let json = serde_json::to_string(&NotificationKind::NewGrade).expect("should serialize");
        assert_eq!(json, "\"new_grade\"");
        let json = serde_json::to_string(&NotificationKind::GradeUpdated).expect("should serialize");
        assert_eq!(json, "\"grade_updated\"");
    }

    #[test]
    fn grade_notifications_start_unread_and_reference_ids() {
        let notification = Notification::for_grade(
            NotificationKind::NewGrade,
            "learner-1",
            "quiz-1",
            "course-1",
            "grade-1",
            "Arithmetic",
            5,
        );

        assert!(!notification.read);
        assert_eq!(notification.quiz_id, "quiz-1");
        assert_eq!(notification.grade_id, "grade-1");
        assert!(notification.message.contains("Arithmetic"));
    }
}
