use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::models::domain::Question;

/// The learner's answers as captured by a session: multiple-choice picks and
/// open-answer texts, both keyed by question id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    pub selected: HashMap<String, String>,
    pub open: HashMap<String, String>,
}

impl AnswerSheet {
    pub fn has_answer_for(&self, question: &Question) -> bool {
        if question.is_open() {
            self.open
                .get(&question.id)
                .map(|text| !text.trim().is_empty())
                .unwrap_or(false)
        } else {
            self.selected.contains_key(&question.id)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionScore {
    pub question_id: String,
    pub correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScoredSubmission {
    pub question_scores: Vec<QuestionScore>,
    pub correct_count: usize,
    pub total_questions: usize,
    pub percentage: u8,
}

pub struct ScoringService;

impl ScoringService {
    /// Scores a submission. Pure and deterministic: the same questions and
    /// answers always produce the same result. An empty question list is a
    /// contract violation; the session loader guarantees it never happens.
    pub fn score(questions: &[Question], sheet: &AnswerSheet) -> AppResult<ScoredSubmission> {
        if questions.is_empty() {
            return Err(AppError::InternalError(
                "scoring requires at least one question".to_string(),
            ));
        }

        let mut question_scores = Vec::with_capacity(questions.len());
        let mut correct_count = 0usize;

        for question in questions {
            let correct = if question.is_open() {
                Self::open_answer_matches(question, sheet.open.get(&question.id))
            } else {
                Self::selection_matches(question, sheet.selected.get(&question.id))
            };

            if correct {
                correct_count += 1;
            }
            question_scores.push(QuestionScore {
                question_id: question.id.clone(),
                correct,
            });
        }

        let percentage = Self::percentage(correct_count, questions.len());

        Ok(ScoredSubmission {
            question_scores,
            correct_count,
            total_questions: questions.len(),
            percentage,
        })
    }

    /// Case-insensitive, whitespace-trimmed exact match against the first
    /// stored answer. No partial credit.
    fn open_answer_matches(question: &Question, submitted: Option<&String>) -> bool {
        let (Some(submitted), Some(expected)) = (submitted, question.answers.first()) else {
            return false;
        };
        submitted.trim().to_lowercase() == expected.content.trim().to_lowercase()
    }

    /// The selected id must be the id of the answer flagged correct. A
    /// question with no flagged answer never scores, whatever was selected.
    fn selection_matches(question: &Question, selected: Option<&String>) -> bool {
        match (selected, question.correct_answer()) {
            (Some(selected), Some(correct)) => *selected == correct.id,
            _ => false,
        }
    }

    // round half up
    fn percentage(correct: usize, total: usize) -> u8 {
        ((correct as f64 / total as f64) * 100.0).round() as u8
    }
}
