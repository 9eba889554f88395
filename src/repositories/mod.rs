pub mod attempt_record_repository;
pub mod course_repository;
pub mod grade_repository;
pub mod notification_repository;
pub mod quiz_repository;
pub mod quiz_result_repository;

pub use attempt_record_repository::{AttemptRecordRepository, MongoAttemptRecordRepository};
pub use course_repository::{CourseRepository, MongoCourseRepository};
pub use grade_repository::{GradeImprovement, GradeRepository, MongoGradeRepository};
pub use notification_repository::{MongoNotificationRepository, NotificationRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use quiz_result_repository::{MongoQuizResultRepository, QuizResultRepository};
