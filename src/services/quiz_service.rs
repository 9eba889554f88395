use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::Quiz,
    repositories::QuizRepository,
};

pub struct QuizService {
    repository: Arc<dyn QuizRepository>,
}

impl QuizService {
    pub fn new(repository: Arc<dyn QuizRepository>) -> Self {
        Self { repository }
    }

    /// Loads and normalizes a quiz for a session. A missing quiz and a quiz
    /// with no questions both surface as `NotFound`: the session must never
    /// enter the taking state without at least one question.
    pub async fn load_for_session(&self, quiz_id: &str) -> AppResult<Quiz> {
        let document = self
            .repository
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))?;

        let quiz = Quiz::from_document(document);
        if quiz.questions.is_empty() {
            return Err(AppError::NotFound(format!(
                "Quiz with id '{}' has no questions",
                quiz_id
            )));
        }

        Ok(quiz)
    }
}
