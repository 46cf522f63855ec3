//! PostgreSQL profile store.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use super::{
    CommentRow, ImageRow, OrderedTable, QuoteRow, UserRow, collect, to_count,
};
use crate::domain::entities::{
    Comment, CommentId, GalleryImage, ImageId, ProfileUser, Quote, QuoteId, UserId,
};
use crate::domain::errors::StoreError;
use crate::domain::ports::{NewComment, NewImage, ProfileStorePort, PurgeSummary, StoreResult};

const SCHEMA: &str = include_str!("../../../migrations/postgres/001_initial_schema.sql");

const IMAGE_SELECT: &str = "SELECT i.id, i.user_id, i.url, i.original_name, i.position, \
     COUNT(l.id) AS like_count \
     FROM images i LEFT JOIN likes l ON l.image_id = i.id";

/// Profile store on a PostgreSQL server.
#[derive(Debug, Clone)]
pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    /// Connects and applies the schema.
    ///
    /// # Errors
    /// Returns [`StoreError`] if the server is unreachable or the schema fails.
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(url)
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        for statement in SCHEMA.split(';') {
            let stmt = statement.trim();
            if !stmt.is_empty() {
                sqlx::query(stmt)
                    .execute(&pool)
                    .await
                    .map_err(|e| StoreError::schema(e.to_string()))?;
            }
        }
        debug!("PostgreSQL schema ready");
        Ok(Self { pool })
    }

    async fn ensure_user_in(tx: &mut Transaction<'_, Postgres>, user: UserId) -> StoreResult<()> {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO users (id, created_at, updated_at) VALUES ($1, $2, $2) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(user.to_string())
        .bind(now)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn next_position(
        tx: &mut Transaction<'_, Postgres>,
        table: OrderedTable,
        owner: UserId,
    ) -> StoreResult<i32> {
        let sql = format!(
            "SELECT (COALESCE(MAX(position), -1) + 1)::INTEGER FROM {} WHERE user_id = $1",
            table.name()
        );
        Ok(sqlx::query_scalar(&sql)
            .bind(owner.to_string())
            .fetch_one(&mut **tx)
            .await?)
    }

    async fn ordered_ids(
        tx: &mut Transaction<'_, Postgres>,
        table: OrderedTable,
        owner: UserId,
    ) -> StoreResult<Vec<i64>> {
        let sql = format!(
            "SELECT id FROM {} WHERE user_id = $1 ORDER BY position, id FOR UPDATE",
            table.name()
        );
        Ok(sqlx::query_scalar(&sql)
            .bind(owner.to_string())
            .fetch_all(&mut **tx)
            .await?)
    }

    async fn write_positions(
        tx: &mut Transaction<'_, Postgres>,
        table: OrderedTable,
        owner: UserId,
        ordered: &[i64],
    ) -> StoreResult<()> {
        let sql = format!(
            "UPDATE {} SET position = $1 WHERE id = $2 AND user_id = $3",
            table.name()
        );
        for (position, id) in ordered.iter().enumerate() {
            let position =
                i32::try_from(position).map_err(|_| StoreError::query("position overflow"))?;
            sqlx::query(&sql)
                .bind(position)
                .bind(id)
                .bind(owner.to_string())
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }

    async fn delete_ordered(&self, table: OrderedTable, id: i64, owner: UserId) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;
        let sql = format!("DELETE FROM {} WHERE id = $1 AND user_id = $2", table.name());
        let deleted = sqlx::query(&sql)
            .bind(id)
            .bind(owner.to_string())
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Ok(false);
        }
        let remaining = Self::ordered_ids(&mut tx, table, owner).await?;
        Self::write_positions(&mut tx, table, owner, &remaining).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn reorder(&self, table: OrderedTable, owner: UserId, ordered: &[i64]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        let mut current = Self::ordered_ids(&mut tx, table, owner).await?;
        let mut requested = ordered.to_vec();
        current.sort_unstable();
        requested.sort_unstable();
        if current != requested {
            return Err(StoreError::query(format!(
                "reorder of {} does not match stored rows",
                table.name()
            )));
        }
        Self::write_positions(&mut tx, table, owner, ordered).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn count(&self, table: OrderedTable, owner: UserId) -> StoreResult<usize> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE user_id = $1", table.name());
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(owner.to_string())
            .fetch_one(&self.pool)
            .await?;
        usize::try_from(count).map_err(|_| StoreError::query("negative count"))
    }
}

#[async_trait]
impl ProfileStorePort for PostgresProfileStore {
    async fn ensure_user(&self, user: UserId) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_user_in(&mut tx, user).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn get_user(&self, user: UserId) -> StoreResult<Option<ProfileUser>> {
        sqlx::query_as::<_, UserRow>("SELECT id, username FROM users WHERE id = $1")
            .bind(user.to_string())
            .fetch_optional(&self.pool)
            .await?
            .map(UserRow::into_user)
            .transpose()
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<ProfileUser>> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, username FROM users WHERE LOWER(username) = LOWER($1)",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .map(UserRow::into_user)
        .transpose()
    }

    async fn set_username(&self, user: UserId, username: &str) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO users (id, username, created_at, updated_at) VALUES ($1, $2, $3, $3) \
             ON CONFLICT (id) DO UPDATE SET username = EXCLUDED.username, \
             updated_at = EXCLUDED.updated_at",
        )
        .bind(user.to_string())
        .bind(username)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn add_image(&self, image: NewImage) -> StoreResult<ImageId> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_user_in(&mut tx, image.owner).await?;
        let position = Self::next_position(&mut tx, OrderedTable::Images, image.owner).await?;
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO images (user_id, url, original_name, position, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(image.owner.to_string())
        .bind(&image.url)
        .bind(&image.original_name)
        .bind(position)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(ImageId(id))
    }

    async fn list_images(&self, owner: UserId) -> StoreResult<Vec<GalleryImage>> {
        let sql =
            format!("{IMAGE_SELECT} WHERE i.user_id = $1 GROUP BY i.id ORDER BY i.position, i.id");
        let rows = sqlx::query_as::<_, ImageRow>(&sql)
            .bind(owner.to_string())
            .fetch_all(&self.pool)
            .await?;
        collect(rows, ImageRow::into_image)
    }

    async fn get_image(&self, id: ImageId) -> StoreResult<Option<GalleryImage>> {
        let sql = format!("{IMAGE_SELECT} WHERE i.id = $1 GROUP BY i.id");
        sqlx::query_as::<_, ImageRow>(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?
            .map(ImageRow::into_image)
            .transpose()
    }

    async fn delete_image(&self, id: ImageId, owner: UserId) -> StoreResult<bool> {
        self.delete_ordered(OrderedTable::Images, id.as_i64(), owner).await
    }

    async fn reorder_images(&self, owner: UserId, ordered: &[ImageId]) -> StoreResult<()> {
        let ids: Vec<i64> = ordered.iter().map(|id| id.as_i64()).collect();
        self.reorder(OrderedTable::Images, owner, &ids).await
    }

    async fn count_images(&self, owner: UserId) -> StoreResult<usize> {
        self.count(OrderedTable::Images, owner).await
    }

    async fn like(&self, image: ImageId, user: UserId) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_user_in(&mut tx, user).await?;
        let inserted = sqlx::query(
            "INSERT INTO likes (image_id, user_id, created_at) VALUES ($1, $2, $3) \
             ON CONFLICT (image_id, user_id) DO NOTHING",
        )
        .bind(image.as_i64())
        .bind(user.to_string())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .rows_affected();
        tx.commit().await?;
        Ok(inserted == 1)
    }

    async fn unlike(&self, image: ImageId, user: UserId) -> StoreResult<bool> {
        let deleted = sqlx::query("DELETE FROM likes WHERE image_id = $1 AND user_id = $2")
            .bind(image.as_i64())
            .bind(user.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted == 1)
    }

    async fn has_liked(&self, image: ImageId, user: UserId) -> StoreResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE image_id = $1 AND user_id = $2")
                .bind(image.as_i64())
                .bind(user.to_string())
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    async fn like_count(&self, image: ImageId) -> StoreResult<u32> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE image_id = $1")
            .bind(image.as_i64())
            .fetch_one(&self.pool)
            .await?;
        to_count(count)
    }

    async fn add_quote(&self, owner: UserId, text: &str) -> StoreResult<QuoteId> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_user_in(&mut tx, owner).await?;
        let position = Self::next_position(&mut tx, OrderedTable::Quotes, owner).await?;
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO quotes (user_id, text, position, created_at) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(owner.to_string())
        .bind(text)
        .bind(position)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(QuoteId(id))
    }

    async fn list_quotes(&self, owner: UserId) -> StoreResult<Vec<Quote>> {
        let rows = sqlx::query_as::<_, QuoteRow>(
            "SELECT id, user_id, text, position FROM quotes WHERE user_id = $1 \
             ORDER BY position, id",
        )
        .bind(owner.to_string())
        .fetch_all(&self.pool)
        .await?;
        collect(rows, QuoteRow::into_quote)
    }

    async fn delete_quote(&self, id: QuoteId, owner: UserId) -> StoreResult<bool> {
        self.delete_ordered(OrderedTable::Quotes, id.0, owner).await
    }

    async fn reorder_quotes(&self, owner: UserId, ordered: &[QuoteId]) -> StoreResult<()> {
        let ids: Vec<i64> = ordered.iter().map(|id| id.0).collect();
        self.reorder(OrderedTable::Quotes, owner, &ids).await
    }

    async fn count_quotes(&self, owner: UserId) -> StoreResult<usize> {
        self.count(OrderedTable::Quotes, owner).await
    }

    async fn add_comment(&self, comment: NewComment) -> StoreResult<Comment> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_user_in(&mut tx, comment.author).await?;
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO comments (image_id, user_id, text, created_at) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(comment.image.as_i64())
        .bind(comment.author.to_string())
        .bind(&comment.text)
        .bind(comment.created_at)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(Comment {
            id: CommentId(id),
            image: comment.image,
            author: comment.author,
            text: comment.text,
            created_at: comment.created_at,
        })
    }

    async fn list_comments(&self, image: ImageId, limit: u32) -> StoreResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            "SELECT id, image_id, user_id, text, created_at FROM comments \
             WHERE image_id = $1 ORDER BY id DESC LIMIT $2",
        )
        .bind(image.as_i64())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        collect(rows, CommentRow::into_comment)
    }

    async fn purge_user(&self, owner: UserId) -> StoreResult<PurgeSummary> {
        let mut tx = self.pool.begin().await?;
        let owner_id = owner.to_string();

        let had_username: Option<Option<String>> =
            sqlx::query_scalar("SELECT username FROM users WHERE id = $1 FOR UPDATE")
                .bind(&owner_id)
                .fetch_optional(&mut *tx)
                .await?;
        let images = sqlx::query("DELETE FROM images WHERE user_id = $1")
            .bind(&owner_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let quotes = sqlx::query("DELETE FROM quotes WHERE user_id = $1")
            .bind(&owner_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("UPDATE users SET username = NULL, updated_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(&owner_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(PurgeSummary {
            images,
            quotes,
            had_username: had_username.flatten().is_some(),
        })
    }
}
