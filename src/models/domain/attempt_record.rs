use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One completed pass through a quiz, manually submitted or forced by
/// timeout. Append-only; the count of records per (quiz, learner) pair is
/// the source of truth for attempts used.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttemptRecord {
    pub id: String,
    pub quiz_id: String,
    pub learner_id: String,
    pub score: u8,
    pub attempt_number: u32,
    pub submitted_at: DateTime<Utc>,
}

impl AttemptRecord {
    pub fn new(quiz_id: &str, learner_id: &str, score: u8, attempt_number: u32) -> Self {
        AttemptRecord {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            learner_id: learner_id.to_string(),
            score,
            attempt_number,
            submitted_at: Utc::now(),
        }
    }
}
