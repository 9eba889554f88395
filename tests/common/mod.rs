#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use edupanel_server::errors::{AppError, AppResult};
use edupanel_server::models::domain::{
    AnswerDocument, AttemptRecord, CourseDocument, Grade, Notification, QuestionDocument,
    QuizDocument, QuizResult,
};
use edupanel_server::repositories::{
    AttemptRecordRepository, CourseRepository, GradeImprovement, GradeRepository,
    NotificationRepository, QuizRepository, QuizResultRepository,
};
use edupanel_server::services::{
    attempt_ledger::AttemptLedger, grade_service::GradeService,
    gradebook_service::GradebookService, quiz_service::QuizService,
    session_service::SessionService,
};

pub struct InMemoryQuizRepository {
    quizzes: RwLock<HashMap<String, QuizDocument>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self {
            quizzes: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, quiz: QuizDocument) {
        self.quizzes.write().await.insert(quiz.id.clone(), quiz);
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizDocument>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.get(id).cloned())
    }
}

pub struct InMemoryAttemptRecordRepository {
    records: RwLock<Vec<AttemptRecord>>,
}

impl InMemoryAttemptRecordRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    pub async fn all(&self) -> Vec<AttemptRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl AttemptRecordRepository for InMemoryAttemptRecordRepository {
    async fn create(&self, record: AttemptRecord) -> AppResult<AttemptRecord> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id == record.id) {
            return Err(AppError::DatabaseError(format!(
                "duplicate attempt record id '{}'",
                record.id
            )));
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn count_for(&self, quiz_id: &str, learner_id: &str) -> AppResult<u32> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.quiz_id == quiz_id && r.learner_id == learner_id)
            .count() as u32)
    }

    async fn find_for(&self, quiz_id: &str, learner_id: &str) -> AppResult<Vec<AttemptRecord>> {
        let records = self.records.read().await;
        let mut items: Vec<_> = records
            .iter()
            .filter(|r| r.quiz_id == quiz_id && r.learner_id == learner_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(items)
    }
}

pub struct InMemoryQuizResultRepository {
    results: RwLock<Vec<QuizResult>>,
}

impl InMemoryQuizResultRepository {
    pub fn new() -> Self {
        Self {
            results: RwLock::new(Vec::new()),
        }
    }

    pub async fn all(&self) -> Vec<QuizResult> {
        self.results.read().await.clone()
    }
}

#[async_trait]
impl QuizResultRepository for InMemoryQuizResultRepository {
    async fn create(&self, result: QuizResult) -> AppResult<QuizResult> {
        self.results.write().await.push(result.clone());
        Ok(result)
    }

    async fn find_by_learner_and_quiz(
        &self,
        learner_id: &str,
        quiz_id: &str,
    ) -> AppResult<Vec<QuizResult>> {
        let results = self.results.read().await;
        let mut items: Vec<_> = results
            .iter()
            .filter(|r| r.learner_id == learner_id && r.quiz_id == quiz_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(items)
    }
}

pub struct InMemoryGradeRepository {
    grades: RwLock<HashMap<String, Grade>>,
}

impl InMemoryGradeRepository {
    pub fn new() -> Self {
        Self {
            grades: RwLock::new(HashMap::new()),
        }
    }

    pub async fn all(&self) -> Vec<Grade> {
        self.grades.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl GradeRepository for InMemoryGradeRepository {
    async fn create(&self, grade: Grade) -> AppResult<Grade> {
        let mut grades = self.grades.write().await;
        // unique (learner, quiz) pair, like the collection index
        if grades
            .values()
            .any(|g| g.learner_id == grade.learner_id && g.quiz_id == grade.quiz_id)
        {
            return Err(AppError::DatabaseError(format!(
                "duplicate grade for learner '{}' and quiz '{}'",
                grade.learner_id, grade.quiz_id
            )));
        }
        grades.insert(grade.id.clone(), grade.clone());
        Ok(grade)
    }

    async fn find_by_learner_and_quiz(
        &self,
        learner_id: &str,
        quiz_id: &str,
    ) -> AppResult<Option<Grade>> {
        let grades = self.grades.read().await;
        Ok(grades
            .values()
            .find(|g| g.learner_id == learner_id && g.quiz_id == quiz_id)
            .cloned())
    }

    async fn find_by_learner(&self, learner_id: &str) -> AppResult<Vec<Grade>> {
        let grades = self.grades.read().await;
        let mut items: Vec<_> = grades
            .values()
            .filter(|g| g.learner_id == learner_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.graded_at.cmp(&a.graded_at));
        Ok(items)
    }

    async fn update_if_improved(
        &self,
        grade_id: &str,
        improvement: GradeImprovement,
    ) -> AppResult<bool> {
        let mut grades = self.grades.write().await;
        let Some(grade) = grades.get_mut(grade_id) else {
            return Ok(false);
        };
        // same filter as the conditional write: strictly better only
        if grade.percentage >= improvement.percentage {
            return Ok(false);
        }

        grade.value = improvement.value;
        grade.percentage = improvement.percentage;
        grade.attempt_number = improvement.attempt_number;
        grade.comment = improvement.comment;
        grade.graded_by = improvement.graded_by;
        grade.graded_at = improvement.graded_at;
        grade.is_best_attempt = true;
        Ok(true)
    }
}

pub struct InMemoryNotificationRepository {
    notifications: RwLock<Vec<Notification>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self {
            notifications: RwLock::new(Vec::new()),
        }
    }

    pub async fn all(&self) -> Vec<Notification> {
        self.notifications.read().await.clone()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn create(&self, notification: Notification) -> AppResult<Notification> {
        self.notifications.write().await.push(notification.clone());
        Ok(notification)
    }
}

pub struct InMemoryCourseRepository {
    courses: RwLock<HashMap<String, CourseDocument>>,
}

impl InMemoryCourseRepository {
    pub fn new() -> Self {
        Self {
            courses: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, course: CourseDocument) {
        self.courses.write().await.insert(course.id.clone(), course);
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<CourseDocument>> {
        let courses = self.courses.read().await;
        Ok(courses.get(id).cloned())
    }
}

/// Everything the engine touches, backed by memory.
pub struct TestStore {
    pub quizzes: Arc<InMemoryQuizRepository>,
    pub attempts: Arc<InMemoryAttemptRecordRepository>,
    pub results: Arc<InMemoryQuizResultRepository>,
    pub grades: Arc<InMemoryGradeRepository>,
    pub notifications: Arc<InMemoryNotificationRepository>,
    pub courses: Arc<InMemoryCourseRepository>,
}

impl TestStore {
    pub fn new() -> Self {
        Self {
            quizzes: Arc::new(InMemoryQuizRepository::new()),
            attempts: Arc::new(InMemoryAttemptRecordRepository::new()),
            results: Arc::new(InMemoryQuizResultRepository::new()),
            grades: Arc::new(InMemoryGradeRepository::new()),
            notifications: Arc::new(InMemoryNotificationRepository::new()),
            courses: Arc::new(InMemoryCourseRepository::new()),
        }
    }

    pub fn session_service(&self) -> Arc<SessionService> {
        let ledger = Arc::new(AttemptLedger::new(self.attempts.clone()));
        let grade_service = Arc::new(GradeService::new(
            ledger.clone(),
            self.results.clone(),
            self.grades.clone(),
            self.notifications.clone(),
            self.courses.clone(),
        ));
        Arc::new(SessionService::new(
            Arc::new(QuizService::new(self.quizzes.clone())),
            ledger,
            grade_service,
        ))
    }

    pub fn gradebook_service(&self) -> GradebookService {
        GradebookService::new(self.grades.clone(), self.results.clone())
    }
}

pub fn math_course() -> CourseDocument {
    CourseDocument {
        id: "course-1".to_string(),
        title: "Mathematics".to_string(),
        created_by: Some("teacher-1".to_string()),
        teacher_email: None,
    }
}

/// Two questions: multiple choice ("4" is right) and open ("Warsaw").
pub fn two_question_quiz_document(max_attempts: u32) -> QuizDocument {
    QuizDocument {
        id: "quiz-1".to_string(),
        title: "Arithmetic".to_string(),
        description: "Warm-up".to_string(),
        subject: "Math".to_string(),
        course_id: "course-1".to_string(),
        questions: vec![
            QuestionDocument {
                id: Some("q-1".to_string()),
                content: "What is 2+2?".to_string(),
                kind: None,
                answers: vec![
                    AnswerDocument {
                        id: Some("a-1".to_string()),
                        content: "4".to_string(),
                        is_correct: true,
                    },
                    AnswerDocument {
                        id: Some("a-2".to_string()),
                        content: "5".to_string(),
                        is_correct: false,
                    },
                ],
                points: None,
            },
            QuestionDocument {
                id: Some("q-2".to_string()),
                content: "Capital of Poland?".to_string(),
                kind: Some("open".to_string()),
                answers: vec![AnswerDocument {
                    id: Some("q-2-expected".to_string()),
                    content: "Warsaw".to_string(),
                    is_correct: false,
                }],
                points: None,
            },
        ],
        max_attempts: Some(max_attempts),
        time_limit_minutes: None,
    }
}
