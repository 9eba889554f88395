use async_trait::async_trait;
use mongodb::{bson::doc, Collection};

use crate::{db::Database, errors::AppResult, models::domain::CourseDocument};

/// Read-only access to the courses collection, used to resolve the owning
/// teacher for grading metadata.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<CourseDocument>>;
}

pub struct MongoCourseRepository {
    collection: Collection<CourseDocument>,
}

impl MongoCourseRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("courses");
        Self { collection }
    }
}

#[async_trait]
impl CourseRepository for MongoCourseRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<CourseDocument>> {
        let course = self.collection.find_one(doc! { "id": id }).await?;
        Ok(course)
    }
}
