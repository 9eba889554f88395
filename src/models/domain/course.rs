use serde::{Deserialize, Serialize};

/// Course shape as far as the grading engine cares: just enough to resolve
/// the owning teacher for grading metadata. Legacy documents carry either
/// `created_by` or `teacher_email`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CourseDocument {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub teacher_email: Option<String>,
}

impl CourseDocument {
    pub fn owner_identity(&self) -> Option<&str> {
        self.created_by
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.teacher_email.as_deref().filter(|s| !s.is_empty()))
    }
}
