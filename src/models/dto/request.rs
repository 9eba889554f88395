use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StartSessionRequest {
    #[validate(length(min = 1, message = "learner_id must not be empty"))]
    pub learner_id: String,
}

/// Records one answer. Exactly one of `selected_answer_id` (multiple choice)
/// or `text` (open question) must be present; the session service checks the
/// pairing against the question's kind.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordAnswerRequest {
    #[validate(length(min = 1, message = "question_id must not be empty"))]
    pub question_id: String,
    pub selected_answer_id: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NavigateRequest {
    Next,
    Previous,
    JumpTo { index: usize },
}
