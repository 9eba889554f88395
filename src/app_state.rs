use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoAttemptRecordRepository, MongoCourseRepository, MongoGradeRepository,
        MongoNotificationRepository, MongoQuizRepository, MongoQuizResultRepository,
    },
    services::{
        attempt_ledger::AttemptLedger, grade_service::GradeService,
        gradebook_service::GradebookService, quiz_service::QuizService,
        session_service::SessionService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<SessionService>,
    pub gradebook_service: Arc<GradebookService>,
    pub attempt_ledger: Arc<AttemptLedger>,
    pub db: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;
        let attempt_repository = Arc::new(MongoAttemptRecordRepository::new(&db));
        attempt_repository.ensure_indexes().await?;
        let result_repository = Arc::new(MongoQuizResultRepository::new(&db));
        result_repository.ensure_indexes().await?;
        let grade_repository = Arc::new(MongoGradeRepository::new(&db));
        grade_repository.ensure_indexes().await?;
        let notification_repository = Arc::new(MongoNotificationRepository::new(&db));
        notification_repository.ensure_indexes().await?;
        let course_repository = Arc::new(MongoCourseRepository::new(&db));

        let quiz_service = Arc::new(QuizService::new(quiz_repository));
        let attempt_ledger = Arc::new(AttemptLedger::new(attempt_repository));
        let grade_service = Arc::new(GradeService::new(
            attempt_ledger.clone(),
            result_repository.clone(),
            grade_repository.clone(),
            notification_repository,
            course_repository,
        ));
        let session_service = Arc::new(SessionService::new(
            quiz_service,
            attempt_ledger.clone(),
            grade_service,
        ));
        let gradebook_service = Arc::new(GradebookService::new(
            grade_repository,
            result_repository,
        ));

        Ok(Self {
            session_service,
            gradebook_service,
            attempt_ledger,
            db,
            config: Arc::new(config),
        })
    }
}
