use super::{PollStore, StoreError};
use crate::models::Poll;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Volatile store keeping polls in creation order.
#[derive(Default)]
pub struct MemoryStore {
    polls: RwLock<Vec<Poll>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PollStore for MemoryStore {
    async fn exists(&self, title: &str) -> Result<bool, StoreError> {
        Ok(self.polls.read().await.iter().any(|poll| poll.title == title))
    }

    async fn create(&self, poll: &Poll) -> Result<(), StoreError> {
        let mut polls = self.polls.write().await;
        if polls.iter().any(|existing| existing.title == poll.title) {
            return Err(StoreError::AlreadyExists(poll.title.clone()));
        }
        polls.push(poll.clone());
        Ok(())
    }

    async fn delete(&self, title: &str) -> Result<(), StoreError> {
        let mut polls = self.polls.write().await;
        let position = polls
            .iter()
            .position(|poll| poll.title == title)
            .ok_or_else(|| StoreError::NotFound(title.to_string()))?;
        polls.remove(position);
        Ok(())
    }

    async fn get(&self, title: &str) -> Result<Poll, StoreError> {
        self.polls
            .read()
            .await
            .iter()
            .find(|poll| poll.title == title)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(title.to_string()))
    }

    async fn put(&self, poll: &Poll) -> Result<(), StoreError> {
        let mut polls = self.polls.write().await;
        match polls.iter_mut().find(|existing| existing.title == poll.title) {
            Some(existing) => *existing = poll.clone(),
            None => polls.push(poll.clone()),
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.polls.read().await.iter().map(|poll| poll.title.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_get_and_duplicate() {
        let store = MemoryStore::new();
        store.create(&Poll::new("Lunch")).await.unwrap();

        assert!(store.exists("Lunch").await.unwrap());
        assert_eq!(store.get("Lunch").await.unwrap().title, "Lunch");
        assert!(matches!(
            store.create(&Poll::new("Lunch")).await,
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = MemoryStore::new();
        assert!(store.list().await.unwrap().is_empty());

        for title in ["Lunch", "Dinner", "Breakfast"] {
            store.create(&Poll::new(title)).await.unwrap();
        }
        store.delete("Dinner").await.unwrap();

        assert_eq!(store.list().await.unwrap(), vec!["Lunch", "Breakfast"]);
    }

    #[tokio::test]
    async fn test_put_replaces_in_place() {
        let store = MemoryStore::new();
        store.create(&Poll::new("Lunch")).await.unwrap();
        store.create(&Poll::new("Dinner")).await.unwrap();

        let mut poll = store.get("Lunch").await.unwrap();
        poll.add_option("Pizza");
        store.put(&poll).await.unwrap();

        assert!(store.get("Lunch").await.unwrap().has_option("Pizza"));
        assert_eq!(store.list().await.unwrap(), vec!["Lunch", "Dinner"]);
    }

    #[tokio::test]
    async fn test_missing_poll_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(store.get("Nope").await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete("Nope").await, Err(StoreError::NotFound(_))));
    }
}
