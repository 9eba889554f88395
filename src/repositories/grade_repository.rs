use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Grade};

/// Fields rewritten when a later attempt beats the stored best.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GradeImprovement {
    pub value: u8,
    pub percentage: u8,
    pub attempt_number: u32,
    pub comment: String,
    pub graded_by: String,
    pub graded_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GradeRepository: Send + Sync {
    async fn create(&self, grade: Grade) -> AppResult<Grade>;
    async fn find_by_learner_and_quiz(
        &self,
        learner_id: &str,
        quiz_id: &str,
    ) -> AppResult<Option<Grade>>;
    async fn find_by_learner(&self, learner_id: &str) -> AppResult<Vec<Grade>>;
    /// Applies the improvement only where the stored percentage is strictly
    /// below the new one, as a single conditional update, so concurrent
    /// reconciliations cannot regress the recorded maximum. Returns whether
    /// a document was modified.
    async fn update_if_improved(
        &self,
        grade_id: &str,
        improvement: GradeImprovement,
    ) -> AppResult<bool>;
}

pub struct MongoGradeRepository {
    collection: Collection<Grade>,
}

impl MongoGradeRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("grades");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for grades collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        // One grade per (learner, quiz) pair
        let learner_quiz_index = IndexModel::builder()
            .keys(doc! { "learner_id": 1, "quiz_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("learner_quiz_unique".to_string())
                    .build(),
            )
            .build();

        let learner_index = IndexModel::builder()
            .keys(doc! { "learner_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("learner_id".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(learner_quiz_index).await?;
        self.collection.create_index(learner_index).await?;

        log::info!("Successfully created indexes for grades collection");
        Ok(())
    }
}

#[async_trait]
impl GradeRepository for MongoGradeRepository {
    async fn create(&self, grade: Grade) -> AppResult<Grade> {
        self.collection.insert_one(&grade).await?;
        Ok(grade)
    }

    async fn find_by_learner_and_quiz(
        &self,
        learner_id: &str,
        quiz_id: &str,
    ) -> AppResult<Option<Grade>> {
        let grade = self
            .collection
            .find_one(doc! {
                "learner_id": learner_id,
                "quiz_id": quiz_id
            })
            .await?;
        Ok(grade)
    }

    async fn find_by_learner(&self, learner_id: &str) -> AppResult<Vec<Grade>> {
        let grades = self
            .collection
            .find(doc! { "learner_id": learner_id })
            .sort(doc! { "graded_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(grades)
    }

    async fn update_if_improved(
        &self,
        grade_id: &str,
        improvement: GradeImprovement,
    ) -> AppResult<bool> {
        let graded_at = mongodb::bson::to_bson(&improvement.graded_at)?;

        let result = self
            .collection
            .update_one(
                doc! {
                    "id": grade_id,
                    "percentage": { "$lt": improvement.percentage as i32 }
                },
                doc! {
                    "$set": {
                        "value": improvement.value as i32,
                        "percentage": improvement.percentage as i32,
                        "attempt_number": improvement.attempt_number as i64,
                        "comment": &improvement.comment,
                        "graded_by": &improvement.graded_by,
                        "graded_at": graded_at,
                        "is_best_attempt": true
                    }
                },
            )
            .await?;

        Ok(result.modified_count == 1)
    }
}
