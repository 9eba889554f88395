use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::grade::value_description;
use crate::models::domain::{Answer, Grade, Question};
use crate::services::grade_service::GradeOutcome;
use crate::services::quiz_session::{QuizSession, SessionPhase, SubmissionOutcome};

/// What a client sees of a live session. Never exposes `is_correct` flags
/// while the session is in progress.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub quiz_id: String,
    pub quiz_title: String,
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
    pub attempts_used: u32,
    pub max_attempts: u32,
    pub remaining_seconds: u32,
    pub question_index: usize,
    pub total_questions: usize,
    pub answered_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub content: String,
    pub open: bool,
    pub points: u32,
    pub answers: Vec<AnswerOptionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerOptionView {
    pub id: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub quiz_id: String,
    pub learner_id: String,
    pub percentage: u8,
    pub correct_count: usize,
    pub total_questions: usize,
    pub questions: Vec<QuestionResultView>,
    pub gradebook: GradebookStatusView,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionResultView {
    pub question_id: String,
    pub correct: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradebookStatusView {
    /// created | updated | unchanged | skipped
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<GradeSummaryView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradeSummaryView {
    pub value: u8,
    pub description: String,
    pub percentage: u8,
    pub attempt_number: u32,
    pub is_best_attempt: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradebookView {
    pub learner_id: String,
    pub subjects: Vec<SubjectSummaryView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_average: Option<f64>,
    pub total_grades: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectSummaryView {
    pub subject: String,
    pub average: f64,
    pub grades: Vec<GradeEntryView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradeEntryView {
    pub quiz_id: String,
    pub quiz_title: String,
    pub value: u8,
    pub description: String,
    pub percentage: u8,
    pub attempt_number: u32,
    pub comment: String,
    pub graded_at: DateTime<Utc>,
}

impl SessionView {
    pub fn for_session(session: &QuizSession) -> Self {
        let (phase, blocked_reason) = match session.phase() {
            SessionPhase::Ready => ("ready", None),
            SessionPhase::Blocked(reason) => ("blocked", Some(reason.message().to_string())),
            SessionPhase::Submitted(_) => ("submitted", None),
        };

        let question = session
            .is_ready()
            .then(|| QuestionView::from(session.current_question()));
        let result = match session.phase() {
            SessionPhase::Submitted(outcome) => Some(ResultView::for_outcome(session, outcome)),
            _ => None,
        };

        SessionView {
            session_id: session.id().to_string(),
            quiz_id: session.quiz().id.clone(),
            quiz_title: session.quiz().title.clone(),
            phase: phase.to_string(),
            blocked_reason,
            attempts_used: session.attempts_used(),
            max_attempts: session.quiz().max_attempts,
            remaining_seconds: session.remaining_seconds(),
            question_index: session.cursor(),
            total_questions: session.quiz().question_count(),
            answered_count: session.answered_count(),
            question,
            result,
        }
    }
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        QuestionView {
            id: question.id.clone(),
            content: question.content.clone(),
            open: question.is_open(),
            points: question.points,
            answers: question.answers.iter().map(AnswerOptionView::from).collect(),
        }
    }
}

impl From<&Answer> for AnswerOptionView {
    fn from(answer: &Answer) -> Self {
        AnswerOptionView {
            id: answer.id.clone(),
            content: answer.content.clone(),
        }
    }
}

impl ResultView {
    pub fn for_outcome(session: &QuizSession, outcome: &SubmissionOutcome) -> Self {
        ResultView {
            quiz_id: session.quiz().id.clone(),
            learner_id: session.learner_id().to_string(),
            percentage: outcome.scored.percentage,
            correct_count: outcome.scored.correct_count,
            total_questions: outcome.scored.total_questions,
            questions: outcome
                .scored
                .question_scores
                .iter()
                .map(|score| QuestionResultView {
                    question_id: score.question_id.clone(),
                    correct: score.correct,
                })
                .collect(),
            gradebook: GradebookStatusView::from(&outcome.grade),
        }
    }
}

impl From<&GradeOutcome> for GradebookStatusView {
    fn from(outcome: &GradeOutcome) -> Self {
        match outcome {
            GradeOutcome::Created(grade) => GradebookStatusView {
                status: "created".to_string(),
                grade: Some(GradeSummaryView::from(grade)),
                warning: None,
            },
            GradeOutcome::Improved(grade) => GradebookStatusView {
                status: "updated".to_string(),
                grade: Some(GradeSummaryView::from(grade)),
                warning: None,
            },
            GradeOutcome::Unchanged => GradebookStatusView {
                status: "unchanged".to_string(),
                grade: None,
                warning: None,
            },
            GradeOutcome::Skipped { warning } => GradebookStatusView {
                status: "skipped".to_string(),
                grade: None,
                warning: Some(warning.clone()),
            },
        }
    }
}

impl From<&Grade> for GradeSummaryView {
    fn from(grade: &Grade) -> Self {
        GradeSummaryView {
            value: grade.value,
            description: value_description(grade.value).to_string(),
            percentage: grade.percentage,
            attempt_number: grade.attempt_number,
            is_best_attempt: grade.is_best_attempt,
        }
    }
}

impl From<&Grade> for GradeEntryView {
    fn from(grade: &Grade) -> Self {
        GradeEntryView {
            quiz_id: grade.quiz_id.clone(),
            quiz_title: grade.quiz_title.clone(),
            value: grade.value,
            description: value_description(grade.value).to_string(),
            percentage: grade.percentage,
            attempt_number: grade.attempt_number,
            comment: grade.comment.clone(),
            graded_at: grade.graded_at,
        }
    }
}
