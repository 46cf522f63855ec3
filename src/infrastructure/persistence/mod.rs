//! Relational profile storage.
//!
//! One [`ProfileStorePort`] with a SQLite and a PostgreSQL implementation,
//! chosen at startup from [`DatabaseConfig`].

mod postgres;
mod sqlite;

use std::sync::Arc;

use tracing::info;

pub use postgres::PostgresProfileStore;
pub use sqlite::SqliteProfileStore;

use crate::domain::entities::{
    Comment, CommentId, GalleryImage, ImageId, ProfileUser, Quote, QuoteId, UserId,
};
use crate::domain::errors::StoreError;
use crate::domain::ports::{ProfileStorePort, StoreResult};
use crate::infrastructure::config::DatabaseConfig;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::not_found("row"),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::connection(err.to_string())
            }
            other => Self::query(other.to_string()),
        }
    }
}

/// Opens the configured backend and applies the schema.
///
/// # Errors
/// Returns [`StoreError`] if the database cannot be reached or migrated.
pub async fn connect(config: &DatabaseConfig) -> StoreResult<Arc<dyn ProfileStorePort>> {
    if let Some(url) = config.url.as_deref() {
        info!(backend = "postgres", "Opening profile store");
        let store = PostgresProfileStore::connect(url, config.max_connections).await?;
        Ok(Arc::new(store))
    } else {
        info!(backend = "sqlite", path = ?config.sqlite_path, "Opening profile store");
        let store = SqliteProfileStore::open(&config.sqlite_path, config.max_connections).await?;
        Ok(Arc::new(store))
    }
}

/// Ordered per-user tables.
#[derive(Debug, Clone, Copy)]
enum OrderedTable {
    Images,
    Quotes,
}

impl OrderedTable {
    const fn name(self) -> &'static str {
        match self {
            Self::Images => "images",
            Self::Quotes => "quotes",
        }
    }
}

fn parse_user_id(raw: &str) -> StoreResult<UserId> {
    raw.parse::<u64>()
        .map(UserId)
        .map_err(|_| StoreError::query(format!("invalid user id in database: {raw}")))
}

fn to_count(value: i64) -> StoreResult<u32> {
    u32::try_from(value).map_err(|_| StoreError::query(format!("count out of range: {value}")))
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    username: Option<String>,
}

impl UserRow {
    fn into_user(self) -> StoreResult<ProfileUser> {
        Ok(ProfileUser::new(parse_user_id(&self.id)?, self.username))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ImageRow {
    id: i64,
    user_id: String,
    url: String,
    original_name: Option<String>,
    position: i32,
    like_count: i64,
}

impl ImageRow {
    fn into_image(self) -> StoreResult<GalleryImage> {
        Ok(GalleryImage {
            id: ImageId(self.id),
            owner: parse_user_id(&self.user_id)?,
            url: self.url,
            original_name: self.original_name,
            position: self.position,
            like_count: to_count(self.like_count)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct QuoteRow {
    id: i64,
    user_id: String,
    text: String,
    position: i32,
}

impl QuoteRow {
    fn into_quote(self) -> StoreResult<Quote> {
        Ok(Quote {
            id: QuoteId(self.id),
            owner: parse_user_id(&self.user_id)?,
            text: self.text,
            position: self.position,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: i64,
    image_id: i64,
    user_id: String,
    text: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl CommentRow {
    fn into_comment(self) -> StoreResult<Comment> {
        Ok(Comment {
            id: CommentId(self.id),
            image: ImageId(self.image_id),
            author: parse_user_id(&self.user_id)?,
            text: self.text,
            created_at: self.created_at,
        })
    }
}

fn collect<R, T>(rows: Vec<R>, convert: impl Fn(R) -> StoreResult<T>) -> StoreResult<Vec<T>> {
    rows.into_iter().map(convert).collect()
}
