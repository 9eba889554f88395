use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Notification};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: Notification) -> AppResult<Notification>;
}

pub struct MongoNotificationRepository {
    collection: Collection<Notification>,
}

impl MongoNotificationRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("notifications");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for notifications collection");

        let learner_index = IndexModel::builder()
            .keys(doc! { "learner_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("learner_id".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(learner_index).await?;

        log::info!("Successfully created indexes for notifications collection");
        Ok(())
    }
}

#[async_trait]
impl NotificationRepository for MongoNotificationRepository {
    async fn create(&self, notification: Notification) -> AppResult<Notification> {
        self.collection.insert_one(&notification).await?;
        Ok(notification)
    }
}
