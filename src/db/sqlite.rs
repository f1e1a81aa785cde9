use super::{PollStore, StoreError};
use crate::models::{Poll, PollOption};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions},
    Row, Sqlite,
};
use std::collections::BTreeSet;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn new(db_url: &str) -> Result<Self, StoreError> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            Sqlite::create_database(db_url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(db_url)
            .await?;

        Self::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    /// A private database that lives as long as the store.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, StoreError> {
        // Every connection to `sqlite::memory:` is its own database, so pin one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Self::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    async fn init_schema(pool: &SqlitePool) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS polls (
                title TEXT PRIMARY KEY,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS poll_options (
                poll_title TEXT NOT NULL,
                position INTEGER NOT NULL,
                text TEXT NOT NULL,
                votes INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (poll_title, position),
                FOREIGN KEY (poll_title) REFERENCES polls(title) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS poll_voters (
                poll_title TEXT NOT NULL,
                user_id TEXT NOT NULL,
                PRIMARY KEY (poll_title, user_id),
                FOREIGN KEY (poll_title) REFERENCES polls(title) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    // Replace the options and voters of a poll with the given snapshot
    async fn write_children(conn: &mut SqliteConnection, poll: &Poll) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM poll_options WHERE poll_title = ?")
            .bind(&poll.title)
            .execute(&mut *conn)
            .await?;
        sqlx::query("DELETE FROM poll_voters WHERE poll_title = ?")
            .bind(&poll.title)
            .execute(&mut *conn)
            .await?;

        for (i, option) in poll.options.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO poll_options (poll_title, position, text, votes)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(&poll.title)
            .bind(i as i64)
            .bind(&option.text)
            .bind(i64::from(option.votes))
            .execute(&mut *conn)
            .await?;
        }

        for user_id in &poll.voters {
            sqlx::query("INSERT INTO poll_voters (poll_title, user_id) VALUES (?, ?)")
                .bind(&poll.title)
                .bind(user_id)
                .execute(&mut *conn)
                .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl PollStore for SqliteStore {
    async fn exists(&self, title: &str) -> Result<bool, StoreError> {
        let found = sqlx::query("SELECT 1 FROM polls WHERE title = ?")
            .bind(title)
            .fetch_optional(&self.pool)
            .await?
            .is_some();
        Ok(found)
    }

    async fn create(&self, poll: &Poll) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO polls (title, created_at)
            VALUES (?, ?)
            ON CONFLICT(title) DO NOTHING
            "#,
        )
        .bind(&poll.title)
        .bind(poll.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Err(StoreError::AlreadyExists(poll.title.clone()));
        }

        Self::write_children(&mut tx, poll).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, title: &str) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM poll_options WHERE poll_title = ?")
            .bind(title)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM poll_voters WHERE poll_title = ?")
            .bind(title)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM polls WHERE title = ?")
            .bind(title)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(StoreError::NotFound(title.to_string()));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get(&self, title: &str) -> Result<Poll, StoreError> {
        let poll_row = sqlx::query("SELECT title, created_at FROM polls WHERE title = ?")
            .bind(title)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(title.to_string()))?;

        let created_at_str: String = poll_row.try_get("created_at")?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| StoreError::Corrupt(format!("Failed to parse created_at: {}", e)))?
            .with_timezone(&Utc);

        let options = sqlx::query(
            r#"
            SELECT text, votes
            FROM poll_options
            WHERE poll_title = ?
            ORDER BY position
            "#,
        )
        .bind(title)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|row| -> Result<PollOption, StoreError> {
            let votes: i64 = row.try_get("votes")?;
            Ok(PollOption {
                text: row.try_get("text")?,
                votes: u32::try_from(votes)
                    .map_err(|_| StoreError::Corrupt(format!("Invalid vote count: {}", votes)))?,
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

        let voters = sqlx::query("SELECT user_id FROM poll_voters WHERE poll_title = ?")
            .bind(title)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|row| row.try_get::<String, _>("user_id"))
            .collect::<Result<BTreeSet<String>, _>>()?;

        Ok(Poll {
            title: poll_row.try_get("title")?,
            options,
            voters,
            created_at,
        })
    }

    async fn put(&self, poll: &Poll) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO polls (title, created_at)
            VALUES (?, ?)
            ON CONFLICT(title) DO NOTHING
            "#,
        )
        .bind(&poll.title)
        .bind(poll.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        Self::write_children(&mut tx, poll).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let titles = sqlx::query("SELECT title FROM polls ORDER BY created_at, rowid")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|row| row.try_get::<String, _>("title"))
            .collect::<Result<Vec<String>, _>>()?;
        Ok(titles)
    }
}
