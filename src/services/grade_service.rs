use std::sync::Arc;

use chrono::Utc;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{
    grade::{grade_comment, value_for_percentage},
    AttemptRecord, Grade, Notification, NotificationKind, Quiz, QuizResult,
};
use crate::repositories::{
    CourseRepository, GradeImprovement, GradeRepository, NotificationRepository,
    QuizResultRepository,
};
use crate::services::attempt_ledger::AttemptLedger;
use crate::services::scoring_service::{AnswerSheet, ScoredSubmission};

/// What happened to the gradebook for this submission.
#[derive(Clone, Debug, PartialEq)]
pub enum GradeOutcome {
    Created(Grade),
    Improved(Grade),
    /// Worse or equal retry, or a concurrent reconciliation already recorded
    /// a higher score. The stored best is untouched either way.
    Unchanged,
    /// The gradebook sync failed after the attempt was already durable; the
    /// failure degrades to a warning.
    Skipped { warning: String },
}

pub struct ReconciledSubmission {
    pub result: QuizResult,
    pub attempt: AttemptRecord,
    pub grade: GradeOutcome,
}

/// Turns a scored submission into durable records and a gradebook update.
///
/// Phase 1 (attempt record + quiz result) must succeed and is never rolled
/// back. Phase 2 (grade + notification) is best-effort: the learner's
/// attempt survives a broken gradebook.
pub struct GradeService {
    attempt_ledger: Arc<AttemptLedger>,
    quiz_results: Arc<dyn QuizResultRepository>,
    grades: Arc<dyn GradeRepository>,
    notifications: Arc<dyn NotificationRepository>,
    courses: Arc<dyn CourseRepository>,
}

impl GradeService {
    pub fn new(
        attempt_ledger: Arc<AttemptLedger>,
        quiz_results: Arc<dyn QuizResultRepository>,
        grades: Arc<dyn GradeRepository>,
        notifications: Arc<dyn NotificationRepository>,
        courses: Arc<dyn CourseRepository>,
    ) -> Self {
        Self {
            attempt_ledger,
            quiz_results,
            grades,
            notifications,
            courses,
        }
    }

    pub async fn reconcile(
        &self,
        quiz: &Quiz,
        learner_id: &str,
        sheet: &AnswerSheet,
        scored: &ScoredSubmission,
    ) -> AppResult<ReconciledSubmission> {
        // Re-check the cap against a fresh count: another session may have
        // submitted since this one loaded.
        let attempts_used = self
            .attempt_ledger
            .count_attempts(&quiz.id, learner_id)
            .await?;
        if !AttemptLedger::has_attempts_remaining(quiz, attempts_used) {
            return Err(AppError::AttemptsExhausted(
                "max attempts reached".to_string(),
            ));
        }
        let attempt_number = attempts_used + 1;

        let result = self
            .quiz_results
            .create(QuizResult::new(
                &quiz.id,
                &quiz.course_id,
                learner_id,
                sheet.selected.clone(),
                sheet.open.clone(),
                scored.percentage,
            ))
            .await?;
        let attempt = self
            .attempt_ledger
            .record_attempt(AttemptRecord::new(
                &quiz.id,
                learner_id,
                scored.percentage,
                attempt_number,
            ))
            .await?;

        let grade = match self
            .sync_gradebook(quiz, learner_id, scored.percentage, attempt_number)
            .await
        {
            Ok(outcome) => outcome,
            Err(err) => {
                log::warn!(
                    "gradebook sync failed for learner {} on quiz {}: {}",
                    learner_id,
                    quiz.id,
                    err
                );
                GradeOutcome::Skipped {
                    warning: err.to_string(),
                }
            }
        };

        Ok(ReconciledSubmission {
            result,
            attempt,
            grade,
        })
    }

    /// Best-attempt-wins merge into the gradebook. The update itself is a
    /// conditional write keyed on the stored percentage, so two concurrent
    /// submissions cannot leave anything but the maximum behind.
    async fn sync_gradebook(
        &self,
        quiz: &Quiz,
        learner_id: &str,
        percentage: u8,
        attempt_number: u32,
    ) -> AppResult<GradeOutcome> {
        let graded_by = self.resolve_course_owner(&quiz.course_id).await;

        let existing = self
            .grades
            .find_by_learner_and_quiz(learner_id, &quiz.id)
            .await?;

        match existing {
            None => {
                let grade = self
                    .grades
                    .create(Grade::new(
                        learner_id,
                        &quiz.course_id,
                        &quiz.id,
                        &quiz.title,
                        &quiz.subject,
                        percentage,
                        attempt_number,
                        &graded_by,
                    ))
                    .await?;
                self.notify(NotificationKind::NewGrade, &grade, &quiz.title)
                    .await;
                Ok(GradeOutcome::Created(grade))
            }
            Some(current) if percentage > current.percentage => {
                let previous_value = current.value;
                let new_value = value_for_percentage(percentage);
                let improvement = GradeImprovement {
                    value: new_value,
                    percentage,
                    attempt_number,
                    comment: grade_comment(&quiz.title, percentage, attempt_number),
                    graded_by: graded_by.clone(),
                    graded_at: Utc::now(),
                };

                let updated = self
                    .grades
                    .update_if_improved(&current.id, improvement.clone())
                    .await?;
                if !updated {
                    // A concurrent reconciliation won with a higher score
                    // between our read and the conditional write.
                    return Ok(GradeOutcome::Unchanged);
                }

                let grade = Grade {
                    value: new_value,
                    percentage,
                    attempt_number,
                    is_best_attempt: true,
                    comment: improvement.comment,
                    graded_by,
                    graded_at: improvement.graded_at,
                    ..current
                };
                if new_value > previous_value {
                    self.notify(NotificationKind::GradeUpdated, &grade, &quiz.title)
                        .await;
                }
                Ok(GradeOutcome::Improved(grade))
            }
            // A worse or equal retry never downgrades the recorded best and
            // never notifies.
            Some(_) => Ok(GradeOutcome::Unchanged),
        }
    }

    async fn notify(&self, kind: NotificationKind, grade: &Grade, quiz_title: &str) {
        let notification = Notification::for_grade(
            kind,
            &grade.learner_id,
            &grade.quiz_id,
            &grade.course_id,
            &grade.id,
            quiz_title,
            grade.value,
        );
        if let Err(err) = self.notifications.create(notification).await {
            log::warn!(
                "failed to create grade notification for learner {}: {}",
                grade.learner_id,
                err
            );
        }
    }

    /// Course-owner lookup stamps grading metadata only; a missing course or
    /// a failed lookup leaves it empty rather than failing the sync.
    async fn resolve_course_owner(&self, course_id: &str) -> String {
        match self.courses.find_by_id(course_id).await {
            Ok(Some(course)) => course.owner_identity().unwrap_or_default().to_string(),
            Ok(None) => {
                log::warn!("course {} not found while stamping grade metadata", course_id);
                String::new()
            }
            Err(err) => {
                log::warn!("course lookup failed for {}: {}", course_id, err);
                String::new()
            }
        }
    }
}
