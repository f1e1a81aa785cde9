use super::{PollStore, StoreError};
use crate::models::Poll;
use async_trait::async_trait;

/// A store whose backend is always broken.
pub struct FailingStore;

fn broken() -> StoreError {
    StoreError::Corrupt("backend offline".to_string())
}

#[async_trait]
impl PollStore for FailingStore {
    async fn exists(&self, _title: &str) -> Result<bool, StoreError> {
        Err(broken())
    }

    async fn create(&self, _poll: &Poll) -> Result<(), StoreError> {
        Err(broken())
    }

    async fn delete(&self, _title: &str) -> Result<(), StoreError> {
        Err(broken())
    }

    async fn get(&self, _title: &str) -> Result<Poll, StoreError> {
        Err(broken())
    }

    async fn put(&self, _poll: &Poll) -> Result<(), StoreError> {
        Err(broken())
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        Err(broken())
    }
}
