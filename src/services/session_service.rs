use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::dto::request::{NavigateRequest, RecordAnswerRequest, StartSessionRequest};
use crate::models::dto::response::{ResultView, SessionView};
use crate::services::attempt_ledger::AttemptLedger;
use crate::services::grade_service::GradeService;
use crate::services::quiz_service::QuizService;
use crate::services::quiz_session::{QuizSession, SessionPhase, SubmitTrigger, TickOutcome};
use crate::services::scoring_service::ScoringService;

struct SessionEntry {
    session: Mutex<QuizSession>,
    countdown: Mutex<Option<JoinHandle<()>>>,
}

impl SessionEntry {
    fn new(session: QuizSession) -> Self {
        Self {
            session: Mutex::new(session),
            countdown: Mutex::new(None),
        }
    }

    async fn set_countdown(&self, handle: JoinHandle<()>) {
        if let Some(previous) = self.countdown.lock().await.replace(handle) {
            previous.abort();
        }
    }

    async fn stop_countdown(&self) {
        if let Some(handle) = self.countdown.lock().await.take() {
            handle.abort();
        }
    }
}

struct Inner {
    quiz_service: Arc<QuizService>,
    attempt_ledger: Arc<AttemptLedger>,
    grade_service: Arc<GradeService>,
    sessions: RwLock<HashMap<String, Arc<SessionEntry>>>,
}

/// Drives quiz sessions end to end: identity gate, quiz load, ledger check,
/// answer capture, countdown, submission, restart. Sessions live in memory
/// and die with the process, like the browser tab they stand in for.
#[derive(Clone)]
pub struct SessionService {
    inner: Arc<Inner>,
}

impl SessionService {
    pub fn new(
        quiz_service: Arc<QuizService>,
        attempt_ledger: Arc<AttemptLedger>,
        grade_service: Arc<GradeService>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                quiz_service,
                attempt_ledger,
                grade_service,
                sessions: RwLock::new(HashMap::new()),
            }),
        }
    }

    pub async fn start_session(
        &self,
        quiz_id: &str,
        request: StartSessionRequest,
    ) -> AppResult<SessionView> {
        let learner_id = request.learner_id.trim().to_string();
        if learner_id.is_empty() {
            // Identity gate: nothing is read from the store without a learner.
            return Err(AppError::Unauthenticated(
                "a learner identity is required to take a quiz".to_string(),
            ));
        }

        let quiz = self.inner.quiz_service.load_for_session(quiz_id).await?;
        let attempts_used = self
            .inner
            .attempt_ledger
            .count_attempts(quiz_id, &learner_id)
            .await?;

        let session_id = Uuid::new_v4().to_string();
        let session = QuizSession::open(session_id.clone(), learner_id, quiz, attempts_used);
        let is_ready = session.is_ready();

        let entry = Arc::new(SessionEntry::new(session));
        self.inner
            .sessions
            .write()
            .await
            .insert(session_id.clone(), entry.clone());

        if is_ready {
            entry.set_countdown(self.spawn_countdown(&session_id)).await;
        }

        let guard = entry.session.lock().await;
        let view = SessionView::for_session(&*guard);
        drop(guard);
        Ok(view)
    }

    pub async fn session_view(&self, session_id: &str) -> AppResult<SessionView> {
        let entry = self.entry(session_id).await?;
        let session = entry.session.lock().await;
        Ok(SessionView::for_session(&session))
    }

    pub async fn record_answer(
        &self,
        session_id: &str,
        request: RecordAnswerRequest,
    ) -> AppResult<SessionView> {
        let entry = self.entry(session_id).await?;
        let mut session = entry.session.lock().await;

        match (&request.selected_answer_id, &request.text) {
            (Some(answer_id), None) => session.record_selected(&request.question_id, answer_id)?,
            (None, Some(text)) => session.record_open(&request.question_id, text)?,
            _ => {
                return Err(AppError::ValidationError(
                    "provide exactly one of selected_answer_id or text".to_string(),
                ))
            }
        }

        Ok(SessionView::for_session(&session))
    }

    pub async fn navigate(
        &self,
        session_id: &str,
        request: NavigateRequest,
    ) -> AppResult<SessionView> {
        let entry = self.entry(session_id).await?;
        let mut session = entry.session.lock().await;

        match request {
            NavigateRequest::Next => session.next()?,
            NavigateRequest::Previous => session.previous()?,
            NavigateRequest::JumpTo { index } => session.jump_to(index)?,
        };

        Ok(SessionView::for_session(&session))
    }

    pub async fn submit(&self, session_id: &str) -> AppResult<ResultView> {
        self.submit_with_trigger(session_id, SubmitTrigger::Manual)
            .await
    }

    pub async fn restart(&self, session_id: &str) -> AppResult<SessionView> {
        let entry = self.entry(session_id).await?;
        let mut session = entry.session.lock().await;
        if !session.can_restart() {
            return Err(AppError::ValidationError(
                "only a submitted session can restart".to_string(),
            ));
        }

        // Same path as the initial load: fresh quiz, fresh ledger count.
        let quiz_id = session.quiz().id.clone();
        let learner_id = session.learner_id().to_string();
        let quiz = self.inner.quiz_service.load_for_session(&quiz_id).await?;
        let attempts_used = self
            .inner
            .attempt_ledger
            .count_attempts(&quiz_id, &learner_id)
            .await?;

        session.reload(quiz, attempts_used)?;

        entry.stop_countdown().await;
        if session.is_ready() {
            entry.set_countdown(self.spawn_countdown(session_id)).await;
        }

        Ok(SessionView::for_session(&session))
    }

    /// Tears a session down without flushing anything: a partially answered
    /// quiz that is abandoned never becomes a submission.
    pub async fn leave(&self, session_id: &str) -> AppResult<()> {
        let entry = self
            .inner
            .sessions
            .write()
            .await
            .remove(session_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Session with id '{}' not found", session_id))
            })?;
        entry.stop_countdown().await;
        Ok(())
    }

    async fn submit_with_trigger(
        &self,
        session_id: &str,
        trigger: SubmitTrigger,
    ) -> AppResult<ResultView> {
        let entry = self.entry(session_id).await?;
        let mut session = entry.session.lock().await;

        let sheet = session.prepare_submission(trigger)?;
        let scored = ScoringService::score(&session.quiz().questions, &sheet)?;

        // A failure here leaves the session in the taking state so the
        // learner can retry the submission.
        let reconciled = self
            .inner
            .grade_service
            .reconcile(session.quiz(), session.learner_id(), &sheet, &scored)
            .await?;

        session.complete_submission(scored, reconciled.grade)?;

        match session.phase() {
            SessionPhase::Submitted(outcome) => Ok(ResultView::for_outcome(&session, outcome)),
            _ => Err(AppError::InternalError(
                "session did not reach the submitted state".to_string(),
            )),
        }
    }

    async fn entry(&self, session_id: &str) -> AppResult<Arc<SessionEntry>> {
        self.inner
            .sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session with id '{}' not found", session_id)))
    }

    /// One tick per second until the session leaves the taking state. On
    /// expiry the task submits through the same path as a manual submit and
    /// exits; it never aborts itself mid-submission.
    fn spawn_countdown(&self, session_id: &str) -> JoinHandle<()> {
        let service = self.clone();
        let session_id = session_id.to_string();

        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;

                let Ok(entry) = service.entry(&session_id).await else {
                    break;
                };
                let outcome = entry.session.lock().await.tick();

                match outcome {
                    TickOutcome::Running(_) => continue,
                    TickOutcome::Expired => {
                        if let Err(err) = service
                            .submit_with_trigger(&session_id, SubmitTrigger::Timeout)
                            .await
                        {
                            log::warn!(
                                "timed-out submission failed for session {}: {}",
                                session_id,
                                err
                            );
                        }
                        break;
                    }
                    TickOutcome::Stopped => break,
                }
            }
        })
    }
}
