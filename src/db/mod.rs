mod memory;
mod sqlite;
#[cfg(test)]
pub mod testing;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::models::Poll;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("poll '{0}' not found")]
    NotFound(String),
    #[error("poll '{0}' already exists")]
    AlreadyExists(String),
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("corrupt poll data: {0}")]
    Corrupt(String),
}

/// Persistent mapping from poll title to poll.
///
/// Polls are never mutated through the store: callers `get` a copy, change
/// it and `put` it back.
#[async_trait]
pub trait PollStore: Send + Sync {
    async fn exists(&self, title: &str) -> Result<bool, StoreError>;

    /// Fails with [`StoreError::AlreadyExists`] if the title is taken.
    async fn create(&self, poll: &Poll) -> Result<(), StoreError>;

    async fn delete(&self, title: &str) -> Result<(), StoreError>;

    async fn get(&self, title: &str) -> Result<Poll, StoreError>;

    /// Insert or overwrite the poll stored under `poll.title`.
    async fn put(&self, poll: &Poll) -> Result<(), StoreError>;

    /// All titles, oldest first.
    async fn list(&self) -> Result<Vec<String>, StoreError>;
}
