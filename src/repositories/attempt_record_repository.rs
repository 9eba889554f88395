use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::AttemptRecord};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttemptRecordRepository: Send + Sync {
    async fn create(&self, record: AttemptRecord) -> AppResult<AttemptRecord>;
    /// Number of completed attempts for a (quiz, learner) pair. Always
    /// computed from the stored records, never cached.
    async fn count_for(&self, quiz_id: &str, learner_id: &str) -> AppResult<u32>;
    async fn find_for(&self, quiz_id: &str, learner_id: &str) -> AppResult<Vec<AttemptRecord>>;
}

pub struct MongoAttemptRecordRepository {
    collection: Collection<AttemptRecord>,
}

impl MongoAttemptRecordRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quiz_attempts");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_attempts collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let learner_quiz_index = IndexModel::builder()
            .keys(doc! { "learner_id": 1, "quiz_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("learner_quiz".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(learner_quiz_index).await?;

        log::info!("Successfully created indexes for quiz_attempts collection");
        Ok(())
    }
}

#[async_trait]
impl AttemptRecordRepository for MongoAttemptRecordRepository {
    async fn create(&self, record: AttemptRecord) -> AppResult<AttemptRecord> {
        self.collection.insert_one(&record).await?;
        Ok(record)
    }

    async fn count_for(&self, quiz_id: &str, learner_id: &str) -> AppResult<u32> {
        let count = self
            .collection
            .count_documents(doc! {
                "quiz_id": quiz_id,
                "learner_id": learner_id
            })
            .await?;
        Ok(count as u32)
    }

    async fn find_for(&self, quiz_id: &str, learner_id: &str) -> AppResult<Vec<AttemptRecord>> {
        let records = self
            .collection
            .find(doc! {
                "quiz_id": quiz_id,
                "learner_id": learner_id
            })
            .sort(doc! { "submitted_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(records)
    }
}
