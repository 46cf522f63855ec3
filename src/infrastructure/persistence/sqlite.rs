//! SQLite profile store.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use super::{
    CommentRow, ImageRow, OrderedTable, QuoteRow, UserRow, collect, to_count,
};
use crate::domain::entities::{
    Comment, CommentId, GalleryImage, ImageId, ProfileUser, Quote, QuoteId, UserId,
};
use crate::domain::errors::StoreError;
use crate::domain::ports::{NewComment, NewImage, ProfileStorePort, PurgeSummary, StoreResult};

const SCHEMA: &str = include_str!("../../../migrations/sqlite/001_initial_schema.sql");

const IMAGE_SELECT: &str = "SELECT i.id, i.user_id, i.url, i.original_name, i.position, \
     COUNT(l.id) AS like_count \
     FROM images i LEFT JOIN likes l ON l.image_id = i.id";

/// Profile store on a SQLite file or in-memory database.
#[derive(Debug, Clone)]
pub struct SqliteProfileStore {
    pool: SqlitePool,
}

impl SqliteProfileStore {
    /// Opens (creating if missing) the database file and applies the schema.
    ///
    /// # Errors
    /// Returns [`StoreError`] if the file cannot be opened or migrated.
    pub async fn open(path: &Path, max_connections: u32) -> StoreResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::connection(format!("cannot create {parent:?}: {e}")))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

        Self::with_pool(pool).await
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    /// Returns [`StoreError`] if the schema cannot be applied.
    pub async fn in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(":memory:")
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> StoreResult<Self> {
        for statement in SCHEMA.split(';') {
            let stmt = statement.trim();
            if !stmt.is_empty() {
                sqlx::query(stmt)
                    .execute(&pool)
                    .await
                    .map_err(|e| StoreError::schema(e.to_string()))?;
            }
        }
        debug!("SQLite schema ready");
        Ok(Self { pool })
    }

    async fn ensure_user_in(tx: &mut Transaction<'_, Sqlite>, user: UserId) -> StoreResult<()> {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO users (id, created_at, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(user.to_string())
        .bind(now)
        .bind(now)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn next_position(
        tx: &mut Transaction<'_, Sqlite>,
        table: OrderedTable,
        owner: UserId,
    ) -> StoreResult<i32> {
        let sql = format!(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM {} WHERE user_id = ?",
            table.name()
        );
        let next: i64 = sqlx::query_scalar(&sql)
            .bind(owner.to_string())
            .fetch_one(&mut **tx)
            .await?;
        i32::try_from(next).map_err(|_| StoreError::query("position overflow"))
    }

    async fn ordered_ids(
        tx: &mut Transaction<'_, Sqlite>,
        table: OrderedTable,
        owner: UserId,
    ) -> StoreResult<Vec<i64>> {
        let sql = format!(
            "SELECT id FROM {} WHERE user_id = ? ORDER BY position, id",
            table.name()
        );
        Ok(sqlx::query_scalar(&sql)
            .bind(owner.to_string())
            .fetch_all(&mut **tx)
            .await?)
    }

    async fn write_positions(
        tx: &mut Transaction<'_, Sqlite>,
        table: OrderedTable,
        owner: UserId,
        ordered: &[i64],
    ) -> StoreResult<()> {
        let sql = format!(
            "UPDATE {} SET position = ? WHERE id = ? AND user_id = ?",
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
        let sql = format!("DELETE FROM {} WHERE id = ? AND user_id = ?", table.name());
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
        let sql = format!("SELECT COUNT(*) FROM {} WHERE user_id = ?", table.name());
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(owner.to_string())
            .fetch_one(&self.pool)
            .await?;
        usize::try_from(count).map_err(|_| StoreError::query("negative count"))
    }
}

/// Uniqueness key for usernames.
///
/// `COLLATE NOCASE` only folds ASCII, so the key is lowercased here.
fn username_key(username: &str) -> String {
    username.to_lowercase()
}

#[async_trait]
impl ProfileStorePort for SqliteProfileStore {
    async fn ensure_user(&self, user: UserId) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_user_in(&mut tx, user).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn get_user(&self, user: UserId) -> StoreResult<Option<ProfileUser>> {
        sqlx::query_as::<_, UserRow>("SELECT id, username FROM users WHERE id = ?")
            .bind(user.to_string())
            .fetch_optional(&self.pool)
            .await?
            .map(UserRow::into_user)
            .transpose()
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<ProfileUser>> {
        sqlx::query_as::<_, UserRow>("SELECT id, username FROM users WHERE username_key = ?")
            .bind(username_key(username))
            .fetch_optional(&self.pool)
            .await?
            .map(UserRow::into_user)
            .transpose()
    }

    async fn set_username(&self, user: UserId, username: &str) -> StoreResult<()> {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO users (id, username, username_key, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT (id) DO UPDATE SET username = excluded.username, \
             username_key = excluded.username_key, updated_at = excluded.updated_at",
        )
        .bind(user.to_string())
        .bind(username)
        .bind(username_key(username))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn add_image(&self, image: NewImage) -> StoreResult<ImageId> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_user_in(&mut tx, image.owner).await?;
        let position = Self::next_position(&mut tx, OrderedTable::Images, image.owner).await?;
        let id = sqlx::query(
            "INSERT INTO images (user_id, url, original_name, position, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(image.owner.to_string())
        .bind(&image.url)
        .bind(&image.original_name)
        .bind(position)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        tx.commit().await?;
        Ok(ImageId(id))
    }

    async fn list_images(&self, owner: UserId) -> StoreResult<Vec<GalleryImage>> {
        let sql = format!("{IMAGE_SELECT} WHERE i.user_id = ? GROUP BY i.id ORDER BY i.position, i.id");
        let rows = sqlx::query_as::<_, ImageRow>(&sql)
            .bind(owner.to_string())
            .fetch_all(&self.pool)
            .await?;
        collect(rows, ImageRow::into_image)
    }

    async fn get_image(&self, id: ImageId) -> StoreResult<Option<GalleryImage>> {
        let sql = format!("{IMAGE_SELECT} WHERE i.id = ? GROUP BY i.id");
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
            "INSERT INTO likes (image_id, user_id, created_at) VALUES (?, ?, ?) \
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
        let deleted = sqlx::query("DELETE FROM likes WHERE image_id = ? AND user_id = ?")
            .bind(image.as_i64())
            .bind(user.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted == 1)
    }

    async fn has_liked(&self, image: ImageId, user: UserId) -> StoreResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE image_id = ? AND user_id = ?")
                .bind(image.as_i64())
                .bind(user.to_string())
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    async fn like_count(&self, image: ImageId) -> StoreResult<u32> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE image_id = ?")
            .bind(image.as_i64())
            .fetch_one(&self.pool)
            .await?;
        to_count(count)
    }

    async fn add_quote(&self, owner: UserId, text: &str) -> StoreResult<QuoteId> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_user_in(&mut tx, owner).await?;
        let position = Self::next_position(&mut tx, OrderedTable::Quotes, owner).await?;
        let id = sqlx::query(
            "INSERT INTO quotes (user_id, text, position, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(owner.to_string())
        .bind(text)
        .bind(position)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        tx.commit().await?;
        Ok(QuoteId(id))
    }

    async fn list_quotes(&self, owner: UserId) -> StoreResult<Vec<Quote>> {
        let rows = sqlx::query_as::<_, QuoteRow>(
            "SELECT id, user_id, text, position FROM quotes WHERE user_id = ? \
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
        let id = sqlx::query(
            "INSERT INTO comments (image_id, user_id, text, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(comment.image.as_i64())
        .bind(comment.author.to_string())
        .bind(&comment.text)
        .bind(comment.created_at)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
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
             WHERE image_id = ? ORDER BY id DESC LIMIT ?",
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
            sqlx::query_scalar("SELECT username FROM users WHERE id = ?")
                .bind(&owner_id)
                .fetch_optional(&mut *tx)
                .await?;
        let images = sqlx::query("DELETE FROM images WHERE user_id = ?")
            .bind(&owner_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let quotes = sqlx::query("DELETE FROM quotes WHERE user_id = ?")
            .bind(&owner_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query(
            "UPDATE users SET username = NULL, username_key = NULL, updated_at = ? WHERE id = ?",
        )
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

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> SqliteProfileStore {
        SqliteProfileStore::in_memory().await.unwrap()
    }

    fn new_image(owner: u64, url: &str) -> NewImage {
        NewImage {
            owner: UserId(owner),
            url: url.to_string(),
            original_name: Some(format!("{url}.png")),
        }
    }

    #[tokio::test]
    async fn test_set_username_upserts_and_keeps_row() {
        let store = store().await;
        let owner = UserId(1);
        store.add_quote(owner, "hello").await.unwrap();

        store.set_username(owner, "Alice").await.unwrap();
        store.set_username(owner, "Alicia").await.unwrap();

        let user = store.get_user(owner).await.unwrap().unwrap();
        assert_eq!(user.username(), Some("Alicia"));
        assert_eq!(store.count_quotes(owner).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_user_by_username_ignores_case() {
        let store = store().await;
        store.set_username(UserId(1), "Alice").await.unwrap();

        let found = store.find_user_by_username("aLiCe").await.unwrap().unwrap();
        assert_eq!(found.id(), UserId(1));
        assert!(store.find_user_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let store = store().await;
        store.set_username(UserId(1), "Alice").await.unwrap();

        assert!(store.set_username(UserId(2), "ALICE").await.is_err());
    }

    #[tokio::test]
    async fn test_non_ascii_usernames_ignore_case() {
        let store = store().await;
        store.set_username(UserId(1), "Ädam").await.unwrap();

        let found = store.find_user_by_username("ädam").await.unwrap().unwrap();
        assert_eq!(found.id(), UserId(1));
        assert!(store.set_username(UserId(2), "ädam").await.is_err());
    }

    #[tokio::test]
    async fn test_purge_frees_username() {
        let store = store().await;
        store.set_username(UserId(1), "Ädam").await.unwrap();
        store.purge_user(UserId(1)).await.unwrap();

        store.set_username(UserId(2), "ädam").await.unwrap();
        let found = store.find_user_by_username("ÄDAM").await.unwrap().unwrap();
        assert_eq!(found.id(), UserId(2));
    }

    #[tokio::test]
    async fn test_images_are_appended_in_order() {
        let store = store().await;
        let a = store.add_image(new_image(1, "a")).await.unwrap();
        let b = store.add_image(new_image(1, "b")).await.unwrap();

        let images = store.list_images(UserId(1)).await.unwrap();
        assert_eq!(images.iter().map(|i| i.id).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(images.iter().map(|i| i.position).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(store.count_images(UserId(1)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_image_checks_owner_and_compacts() {
        let store = store().await;
        let a = store.add_image(new_image(1, "a")).await.unwrap();
        let b = store.add_image(new_image(1, "b")).await.unwrap();

        assert!(!store.delete_image(a, UserId(2)).await.unwrap());
        assert!(store.delete_image(a, UserId(1)).await.unwrap());

        let images = store.list_images(UserId(1)).await.unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].id, b);
        assert_eq!(images[0].position, 0);
    }

    #[tokio::test]
    async fn test_reorder_images() {
        let store = store().await;
        let a = store.add_image(new_image(1, "a")).await.unwrap();
        let b = store.add_image(new_image(1, "b")).await.unwrap();
        let c = store.add_image(new_image(1, "c")).await.unwrap();

        store.reorder_images(UserId(1), &[c, a, b]).await.unwrap();

        let ids: Vec<_> = store
            .list_images(UserId(1))
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![c, a, b]);
    }

    #[tokio::test]
    async fn test_reorder_rejects_foreign_ids() {
        let store = store().await;
        let a = store.add_image(new_image(1, "a")).await.unwrap();
        let other = store.add_image(new_image(2, "x")).await.unwrap();

        assert!(store.reorder_images(UserId(1), &[other, a]).await.is_err());
        assert_eq!(store.list_images(UserId(1)).await.unwrap()[0].id, a);
    }

    #[tokio::test]
    async fn test_like_is_idempotent_and_counted() {
        let store = store().await;
        let image = store.add_image(new_image(1, "a")).await.unwrap();

        assert!(store.like(image, UserId(2)).await.unwrap());
        assert!(!store.like(image, UserId(2)).await.unwrap());
        assert!(store.like(image, UserId(3)).await.unwrap());

        assert_eq!(store.like_count(image).await.unwrap(), 2);
        assert!(store.has_liked(image, UserId(2)).await.unwrap());
        assert_eq!(store.get_image(image).await.unwrap().unwrap().like_count, 2);

        assert!(store.unlike(image, UserId(2)).await.unwrap());
        assert!(!store.unlike(image, UserId(2)).await.unwrap());
        assert_eq!(store.like_count(image).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_quotes_crud() {
        let store = store().await;
        let first = store.add_quote(UserId(1), "one").await.unwrap();
        let second = store.add_quote(UserId(1), "two").await.unwrap();

        store.reorder_quotes(UserId(1), &[second, first]).await.unwrap();
        let quotes = store.list_quotes(UserId(1)).await.unwrap();
        assert_eq!(quotes[0].text, "two");

        assert!(store.delete_quote(second, UserId(1)).await.unwrap());
        let quotes = store.list_quotes(UserId(1)).await.unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].position, 0);
    }

    #[tokio::test]
    async fn test_comments_newest_first_with_limit() {
        let store = store().await;
        let image = store.add_image(new_image(1, "a")).await.unwrap();
        for text in ["first", "second", "third"] {
            store
                .add_comment(NewComment {
                    image,
                    author: UserId(2),
                    text: text.to_string(),
                    created_at: Utc::now(),
                })
                .await
                .unwrap();
        }

        let comments = store.list_comments(image, 2).await.unwrap();
        assert_eq!(
            comments.iter().map(|c| c.text.as_str()).collect::<Vec<_>>(),
            vec!["third", "second"]
        );
    }

    #[tokio::test]
    async fn test_deleting_image_cascades_likes_and_comments() {
        let store = store().await;
        let image = store.add_image(new_image(1, "a")).await.unwrap();
        store.like(image, UserId(2)).await.unwrap();
        store
            .add_comment(NewComment {
                image,
                author: UserId(2),
                text: "nice".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        store.delete_image(image, UserId(1)).await.unwrap();

        assert_eq!(store.like_count(image).await.unwrap(), 0);
        assert!(store.list_comments(image, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_purge_user() {
        let store = store().await;
        store.set_username(UserId(1), "alice").await.unwrap();
        store.add_image(new_image(1, "a")).await.unwrap();
        store.add_image(new_image(1, "b")).await.unwrap();
        store.add_quote(UserId(1), "hi").await.unwrap();

        let summary = store.purge_user(UserId(1)).await.unwrap();

        assert_eq!(
            summary,
            PurgeSummary {
                images: 2,
                quotes: 1,
                had_username: true
            }
        );
        let user = store.get_user(UserId(1)).await.unwrap().unwrap();
        assert_eq!(user.username(), None);
        assert!(store.purge_user(UserId(1)).await.unwrap().is_empty());
        assert!(store.purge_user(UserId(9)).await.unwrap().is_empty());
    }
}
