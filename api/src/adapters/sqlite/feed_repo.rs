//! SQLite adapter for FeedRepository

use async_trait::async_trait;
use sea_orm::{sea_query::OnConflict, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::domain::entities::{format_pub_date, parse_pub_date, Feed, NewFeed};
use crate::domain::ports::FeedRepository;
use crate::entity::feeds;
use crate::error::DomainError;

/// SQLite implementation of FeedRepository
pub struct SqliteFeedRepository {
    db: DatabaseConnection,
}

impl SqliteFeedRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn active_model(feed: &NewFeed) -> feeds::ActiveModel {
    feeds::ActiveModel {
        feed_id: Set(feed.feed_id.clone()),
        feed_name: Set(feed.name.clone()),
        feed_description: Set(feed.description.clone()),
        feed_icon_url: Set(feed.icon_url.clone()),
        feed_created_at: Set(format_pub_date(&feed.created_at)),
        feed_url: Set(feed.url.clone()),
        feed_token: Set(feed.token.clone()),
    }
}

#[async_trait]
impl FeedRepository for SqliteFeedRepository {
    async fn find_all(&self) -> Result<Vec<Feed>, DomainError> {
        let results = feeds::Entity::find()
            .order_by_asc(feeds::Column::FeedId)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;

        results.into_iter().map(Feed::try_from).collect()
    }

    async fn find_by_id(&self, feed_id: &str) -> Result<Option<Feed>, DomainError> {
        let result = feeds::Entity::find_by_id(feed_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;

        result.map(Feed::try_from).transpose()
    }

    async fn insert_if_absent(&self, feed: &NewFeed) -> Result<bool, DomainError> {
        let inserted = feeds::Entity::insert(active_model(feed))
            .on_conflict(
                OnConflict::column(feeds::Column::FeedId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;

        Ok(inserted > 0)
    }

    async fn upsert(&self, feed: &NewFeed) -> Result<(), DomainError> {
        feeds::Entity::insert(active_model(feed))
            .on_conflict(
                OnConflict::column(feeds::Column::FeedId)
                    .update_columns([
                        feeds::Column::FeedName,
                        feeds::Column::FeedDescription,
                        feeds::Column::FeedIconUrl,
                        feeds::Column::FeedCreatedAt,
                        feeds::Column::FeedUrl,
                        feeds::Column::FeedToken,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.db
            .ping()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))
    }
}

/// Convert SeaORM model to domain entity
impl TryFrom<feeds::Model> for Feed {
    type Error = DomainError;

    fn try_from(model: feeds::Model) -> Result<Self, Self::Error> {
        let created_at = parse_pub_date(&model.feed_created_at).map_err(|e| {
            DomainError::Store(format!(
                "feed '{}' has unreadable creation time '{}': {}",
                model.feed_id, model.feed_created_at, e
            ))
        })?;

        Ok(Feed {
            feed_id: model.feed_id,
            name: model.feed_name,
            description: model.feed_description,
            icon_url: model.feed_icon_url,
            url: model.feed_url,
            created_at,
            token: model.feed_token,
        })
    }
}
