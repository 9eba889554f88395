use std::sync::Arc;

use crate::errors::AppResult;
use crate::models::domain::{AttemptRecord, Quiz};
use crate::repositories::AttemptRecordRepository;

/// How many times a learner has gone through a quiz. The persisted records
/// are the source of truth: the count is recomputed on every check, and a
/// failed query propagates instead of granting entry (fail closed).
pub struct AttemptLedger {
    repository: Arc<dyn AttemptRecordRepository>,
}

impl AttemptLedger {
    pub fn new(repository: Arc<dyn AttemptRecordRepository>) -> Self {
        Self { repository }
    }

    pub async fn count_attempts(&self, quiz_id: &str, learner_id: &str) -> AppResult<u32> {
        self.repository.count_for(quiz_id, learner_id).await
    }

    pub fn has_attempts_remaining(quiz: &Quiz, count: u32) -> bool {
        count < quiz.max_attempts
    }

    pub async fn record_attempt(&self, record: AttemptRecord) -> AppResult<AttemptRecord> {
        self.repository.create(record).await
    }

    /// Completed attempts for a (quiz, learner) pair, most recent first.
    pub async fn attempt_history(
        &self,
        quiz_id: &str,
        learner_id: &str,
    ) -> AppResult<Vec<AttemptRecord>> {
        self.repository.find_for(quiz_id, learner_id).await
    }
}
