use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 1;
pub const DEFAULT_TIME_LIMIT_MINUTES: u32 = 30;

/// Stored shape of a quiz. Legacy documents omit question and answer ids as
/// well as the attempt and time limits; normalization fills them in before
/// anything else in the engine sees the quiz.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct QuizDocument {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subject: String,
    pub course_id: String,
    #[serde(default)]
    pub questions: Vec<QuestionDocument>,
    #[serde(default)]
    pub max_attempts: Option<u32>,
    #[serde(default)]
    pub time_limit_minutes: Option<u32>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct QuestionDocument {
    #[serde(default)]
    pub id: Option<String>,
    pub content: String,
    /// "open" marks an open-ended question; any other value (or none) means
    /// the answers decide.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub answers: Vec<AnswerDocument>,
    #[serde(default)]
    pub points: Option<u32>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AnswerDocument {
    #[serde(default)]
    pub id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// Canonical quiz: every question and answer carries a non-empty id.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub course_id: String,
    pub questions: Vec<Question>,
    pub max_attempts: u32,
    pub time_limit_minutes: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub content: String,
    pub kind: QuestionKind,
    pub answers: Vec<Answer>,
    pub points: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum QuestionKind {
    MultipleChoice,
    Open,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Answer {
    pub id: String,
    pub content: String,
    pub is_correct: bool,
}

impl Quiz {
    /// Normalizes a raw quiz document. Existing non-empty ids are kept;
    /// missing ones get a position-plus-random id, so two normalizations of
    /// the same document never silently share identifiers; answer maps
    /// keyed by these ids are only valid within one loaded session.
    pub fn from_document(doc: QuizDocument) -> Self {
        let questions = doc
            .questions
            .into_iter()
            .enumerate()
            .map(|(q_index, question)| {
                let answers: Vec<Answer> = question
                    .answers
                    .into_iter()
                    .enumerate()
                    .map(|(a_index, answer)| Answer {
                        id: non_empty(answer.id).unwrap_or_else(|| {
                            format!("answer_{}_{}_{}", q_index, a_index, Uuid::new_v4())
                        }),
                        content: answer.content,
                        is_correct: answer.is_correct,
                    })
                    .collect();

                let kind = if question.kind.as_deref() == Some("open") || answers.is_empty() {
                    QuestionKind::Open
                } else {
                    QuestionKind::MultipleChoice
                };

                Question {
                    id: non_empty(question.id)
                        .unwrap_or_else(|| format!("question_{}_{}", q_index, Uuid::new_v4())),
                    content: question.content,
                    kind,
                    answers,
                    points: question.points.unwrap_or(1),
                }
            })
            .collect();

        Quiz {
            id: doc.id,
            title: doc.title,
            description: doc.description,
            subject: doc.subject,
            course_id: doc.course_id,
            questions,
            max_attempts: doc
                .max_attempts
                .filter(|m| *m > 0)
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
            time_limit_minutes: doc
                .time_limit_minutes
                .filter(|m| *m > 0)
                .unwrap_or(DEFAULT_TIME_LIMIT_MINUTES),
        }
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn time_limit_seconds(&self) -> u32 {
        self.time_limit_minutes * 60
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

impl Question {
    /// Open-ended either by declared type or because no answers are stored
    /// (defensive fallback for malformed documents).
    pub fn is_open(&self) -> bool {
        self.kind == QuestionKind::Open || self.answers.is_empty()
    }

    pub fn correct_answer(&self) -> Option<&Answer> {
        self.answers.iter().find(|a| a.is_correct)
    }
}

fn non_empty(id: Option<String>) -> Option<String> {
    id.filter(|s| !s.trim().is_empty())
}
