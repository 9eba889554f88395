pub mod attempt_record;
pub mod course;
pub mod grade;
pub mod notification;
pub mod quiz;
pub mod quiz_result;

pub use attempt_record::AttemptRecord;
pub use course::CourseDocument;
pub use grade::Grade;
pub use notification::{Notification, NotificationKind};
pub use quiz::{Answer, AnswerDocument, Question, QuestionDocument, QuestionKind, Quiz, QuizDocument};
pub use quiz_result::QuizResult;
