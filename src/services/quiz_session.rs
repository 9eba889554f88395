use crate::errors::{AppError, AppResult};
use crate::models::domain::{Question, Quiz};
use crate::services::grade_service::GradeOutcome;
use crate::services::scoring_service::{AnswerSheet, ScoredSubmission};

/// Why a session refused to enter the taking state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockReason {
    AttemptsExhausted,
}

impl BlockReason {
    pub fn message(&self) -> &'static str {
        match self {
            BlockReason::AttemptsExhausted => "max attempts reached",
        }
    }
}

/// Phases a session can hold between events. Loading (identity resolution,
/// quiz fetch, ledger check) happens in the async service before a machine
/// exists, so a "loaded but empty" session is unrepresentable here.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionPhase {
    Ready,
    Blocked(BlockReason),
    Submitted(SubmissionOutcome),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubmissionOutcome {
    pub scored: ScoredSubmission,
    pub grade: GradeOutcome,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitTrigger {
    /// Learner finished from the last question.
    Manual,
    /// Countdown reached zero; submits whatever is recorded.
    Timeout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting down.
    Running(u32),
    /// Hit zero on this tick; the driver must submit.
    Expired,
    /// Not in the taking state; the driver should stop ticking.
    Stopped,
}

/// One learner's pass through one quiz: countdown, answer maps, and a cursor
/// over the questions. Scoped to a single load of the quiz and discarded on
/// exit; nothing here is shared across sessions.
pub struct QuizSession {
    id: String,
    learner_id: String,
    quiz: Quiz,
    phase: SessionPhase,
    cursor: usize,
    sheet: AnswerSheet,
    remaining_seconds: u32,
    attempts_used: u32,
}

impl QuizSession {
    /// Resolves the loading transition: enters `Ready`, or `Blocked` when
    /// the attempt cap is already reached.
    pub fn open(id: String, learner_id: String, quiz: Quiz, attempts_used: u32) -> Self {
        let phase = if attempts_used >= quiz.max_attempts {
            SessionPhase::Blocked(BlockReason::AttemptsExhausted)
        } else {
            SessionPhase::Ready
        };
        let remaining_seconds = quiz.time_limit_seconds();

        QuizSession {
            id,
            learner_id,
            quiz,
            phase,
            cursor: 0,
            sheet: AnswerSheet::default(),
            remaining_seconds,
            attempts_used,
        }
    }

    /// Restart after a submission: fresh countdown, empty answer maps, and a
    /// re-checked ledger count supplied by the caller.
    pub fn reload(&mut self, quiz: Quiz, attempts_used: u32) -> AppResult<()> {
        if !self.can_restart() {
            return Err(AppError::ValidationError(
                "only a submitted session can restart".to_string(),
            ));
        }

        self.phase = if attempts_used >= quiz.max_attempts {
            SessionPhase::Blocked(BlockReason::AttemptsExhausted)
        } else {
            SessionPhase::Ready
        };
        self.remaining_seconds = quiz.time_limit_seconds();
        self.quiz = quiz;
        self.cursor = 0;
        self.sheet = AnswerSheet::default();
        self.attempts_used = attempts_used;
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn learner_id(&self) -> &str {
        &self.learner_id
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, SessionPhase::Ready)
    }

    pub fn can_restart(&self) -> bool {
        matches!(self.phase, SessionPhase::Submitted(_))
    }

    pub fn attempts_used(&self) -> u32 {
        self.attempts_used
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Cursor clamped into the valid question range on every read.
    pub fn cursor(&self) -> usize {
        self.cursor.min(self.quiz.question_count().saturating_sub(1))
    }

    pub fn current_question(&self) -> &Question {
        &self.quiz.questions[self.cursor()]
    }

    pub fn answered_count(&self) -> usize {
        self.quiz
            .questions
            .iter()
            .filter(|question| self.sheet.has_answer_for(question))
            .count()
    }

    fn ensure_ready(&self) -> AppResult<()> {
        match &self.phase {
            SessionPhase::Ready => Ok(()),
            SessionPhase::Blocked(reason) => {
                Err(AppError::AttemptsExhausted(reason.message().to_string()))
            }
            SessionPhase::Submitted(_) => Err(AppError::ValidationError(
                "quiz already submitted".to_string(),
            )),
        }
    }

    pub fn record_selected(&mut self, question_id: &str, answer_id: &str) -> AppResult<()> {
        self.ensure_ready()?;
        let question = self.quiz.question(question_id).ok_or_else(|| {
            AppError::ValidationError(format!("Unknown question id '{}'", question_id))
        })?;
        if question.is_open() {
            return Err(AppError::ValidationError(
                "open questions take a text answer".to_string(),
            ));
        }
        if !question.answers.iter().any(|answer| answer.id == answer_id) {
            return Err(AppError::ValidationError(format!(
                "Answer '{}' does not belong to question '{}'",
                answer_id, question_id
            )));
        }

        self.sheet
            .selected
            .insert(question_id.to_string(), answer_id.to_string());
        Ok(())
    }

    pub fn record_open(&mut self, question_id: &str, text: &str) -> AppResult<()> {
        self.ensure_ready()?;
        let question = self.quiz.question(question_id).ok_or_else(|| {
            AppError::ValidationError(format!("Unknown question id '{}'", question_id))
        })?;
        if !question.is_open() {
            return Err(AppError::ValidationError(
                "choice questions take an answer id".to_string(),
            ));
        }

        self.sheet
            .open
            .insert(question_id.to_string(), text.to_string());
        Ok(())
    }

    fn current_question_answered(&self) -> bool {
        self.sheet.has_answer_for(self.current_question())
    }

    /// Navigation gate: leaving a question requires a non-empty answer on
    /// it. A UI rule only; the timeout path ignores it entirely.
    fn ensure_current_answered(&self) -> AppResult<()> {
        if self.current_question_answered() {
            Ok(())
        } else {
            Err(AppError::ValidationError(
                "answer the current question before navigating".to_string(),
            ))
        }
    }

    pub fn next(&mut self) -> AppResult<usize> {
        self.ensure_ready()?;
        self.ensure_current_answered()?;
        self.cursor = (self.cursor() + 1).min(self.quiz.question_count() - 1);
        Ok(self.cursor)
    }

    pub fn previous(&mut self) -> AppResult<usize> {
        self.ensure_ready()?;
        self.ensure_current_answered()?;
        self.cursor = self.cursor().saturating_sub(1);
        Ok(self.cursor)
    }

    pub fn jump_to(&mut self, index: usize) -> AppResult<usize> {
        self.ensure_ready()?;
        self.ensure_current_answered()?;
        self.cursor = index.min(self.quiz.question_count() - 1);
        Ok(self.cursor)
    }

    /// One second of countdown. Only the taking state ticks.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_ready() {
            return TickOutcome::Stopped;
        }
        if self.remaining_seconds == 0 {
            return TickOutcome::Expired;
        }

        self.remaining_seconds -= 1;
        if self.remaining_seconds == 0 {
            TickOutcome::Expired
        } else {
            TickOutcome::Running(self.remaining_seconds)
        }
    }

    /// Snapshot of the recorded answers for scoring. Manual submission is
    /// only allowed from the last question once it is answered; the timeout
    /// path takes whatever is there, including nothing.
    pub fn prepare_submission(&self, trigger: SubmitTrigger) -> AppResult<AnswerSheet> {
        self.ensure_ready()?;
        if trigger == SubmitTrigger::Manual {
            if self.cursor() != self.quiz.question_count() - 1 {
                return Err(AppError::ValidationError(
                    "submission is only allowed from the last question".to_string(),
                ));
            }
            self.ensure_current_answered()?;
        }
        Ok(self.sheet.clone())
    }

    /// Finishes the submission once scoring and reconciliation have run.
    pub fn complete_submission(
        &mut self,
        scored: ScoredSubmission,
        grade: GradeOutcome,
    ) -> AppResult<()> {
        self.ensure_ready()?;
        self.attempts_used += 1;
        self.phase = SessionPhase::Submitted(SubmissionOutcome { scored, grade });
        Ok(())
    }
}
