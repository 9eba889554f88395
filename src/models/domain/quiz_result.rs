use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Full record of one submission: which answers were given and what they
/// scored. Created once per submission and never mutated; queryable by
/// (learner, quiz) for result-review views.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizResult {
    pub id: String,
    pub quiz_id: String,
    pub course_id: String,
    pub learner_id: String,
    pub selected_answers: HashMap<String, String>,
    pub open_answers: HashMap<String, String>,
    pub score: u8,
    pub completed_at: DateTime<Utc>,
}

impl QuizResult {
    pub fn new(
        quiz_id: &str,
        course_id: &str,
        learner_id: &str,
        selected_answers: HashMap<String, String>,
        open_answers: HashMap<String, String>,
        score: u8,
    ) -> Self {
        QuizResult {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            course_id: course_id.to_string(),
            learner_id: learner_id.to_string(),
            selected_answers,
            open_answers,
            score,
            completed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_result_round_trip_preserves_answer_maps() {
        let mut selected = HashMap::new();
        selected.insert("q-1".to_string(), "a-2".to_string());
        let mut open = HashMap::new();
        open.insert("q-2".to_string(), "Warsaw".to_string());

        let result = QuizResult::new("quiz-1", "course-1", "learner-1", selected, open, 100);

        let json = serde_json::to_string(&result).expect("result should serialize");
        let parsed: QuizResult = serde_json::from_str(&json).expect("result should deserialize");

        assert_eq!(parsed.selected_answers.get("q-1").map(String::as_str), Some("a-2"));
        assert_eq!(parsed.open_answers.get("q-2").map(String::as_str), Some("Warsaw"));
        assert_eq!(parsed.score, 100);
    }
}
