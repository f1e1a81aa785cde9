use crate::db::{PollStore, StoreError};
use crate::error::PollError;
use crate::models::{Poll, PollListing};
use crate::voting::format_poll;
use log::{debug, info, warn};
use tokio::sync::Mutex;

/// Owns the polls and the single active-poll pointer.
///
/// Every operation runs with `active` locked, which serializes all
/// read-modify-write sequences against the store.
pub struct PollManager<S> {
    store: S,
    active: Mutex<Option<String>>,
}

impl<S: PollStore> PollManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            active: Mutex::new(None),
        }
    }

    #[cfg(test)]
    pub async fn active_title(&self) -> Option<String> {
        self.active.lock().await.clone()
    }

    /// Stores an empty poll. It becomes the active poll if none is running.
    pub async fn create_poll(&self, title: &str) -> Result<(), PollError> {
        if title.is_empty() {
            return Err(PollError::EmptyTitle);
        }

        let mut active = self.active.lock().await;

        if self.store.exists(title).await? {
            return Err(PollError::DuplicateTitle);
        }
        self.store.create(&Poll::new(title)).await?;
        info!("Created poll '{}'", title);

        if active.is_none() {
            *active = Some(title.to_string());
            info!("Poll '{}' is now active", title);
        }

        Ok(())
    }

    /// The active poll cannot be removed; stop it first.
    pub async fn remove_poll(&self, title: &str) -> Result<(), PollError> {
        if title.is_empty() {
            return Err(PollError::EmptyTitle);
        }

        let active = self.active.lock().await;
        if active.as_deref() == Some(title) {
            debug!("Refusing to remove active poll '{}'", title);
            return Err(PollError::ActivePollRemoval(title.to_string()));
        }

        self.store.delete(title).await?;
        info!("Removed poll '{}'", title);
        Ok(())
    }

    pub async fn list_polls(&self) -> Result<Vec<PollListing>, PollError> {
        let active = self.active.lock().await;
        let listings = self
            .store
            .list()
            .await?
            .into_iter()
            .map(|title| PollListing {
                active: active.as_deref() == Some(title.as_str()),
                title,
            })
            .collect();
        Ok(listings)
    }

    /// Starts a fresh run of a stored poll: counts and voters are cleared.
    pub async fn start_poll(&self, title: &str) -> Result<String, PollError> {
        let mut active = self.active.lock().await;

        if let Some(running) = active.as_deref() {
            return Err(PollError::PollAlreadyActive(running.to_string()));
        }
        if title.is_empty() {
            return Err(PollError::EmptyTitle);
        }

        let mut poll = self.store.get(title).await?;
        poll.reset();
        self.store.put(&poll).await?;

        *active = Some(title.to_string());
        info!("Started poll '{}'", title);

        Ok(format_poll(&poll))
    }

    /// Returns the final tally, then resets the poll and clears the pointer.
    pub async fn stop_poll(&self) -> Result<String, PollError> {
        let mut active = self.active.lock().await;
        let mut poll = self.load_active(&mut active).await?;

        let results = format_poll(&poll);

        poll.reset();
        self.store.put(&poll).await?;
        *active = None;
        info!("Stopped poll '{}'", poll.title);

        Ok(results)
    }

    pub async fn add_option(&self, text: &str) -> Result<String, PollError> {
        let mut active = self.active.lock().await;
        let mut poll = self.load_active(&mut active).await?;

        if text.is_empty() {
            return Err(PollError::EmptyOption);
        }
        if poll.has_option(text) {
            return Err(PollError::DuplicateOption);
        }

        poll.add_option(text);
        self.store.put(&poll).await?;
        debug!("Added option '{}' to poll '{}'", text, poll.title);

        Ok(format_poll(&poll))
    }

    pub async fn show_active_poll(&self) -> Result<String, PollError> {
        let mut active = self.active.lock().await;
        let poll = self.load_active(&mut active).await?;
        Ok(format_poll(&poll))
    }

    /// Counts one vote from `user_id` for the option at the 1-based `index_text`.
    pub async fn vote(&self, user_id: &str, index_text: &str) -> Result<String, PollError> {
        let mut active = self.active.lock().await;
        let mut poll = self.load_active(&mut active).await?;

        if index_text.is_empty() {
            return Err(PollError::EmptyIndex);
        }
        if !index_text.chars().all(|c| c.is_ascii_digit()) {
            return Err(PollError::NotANumber);
        }

        let max = poll.options.len();
        let index = match index_text.parse::<usize>() {
            Ok(index) if (1..=max).contains(&index) => index,
            _ => return Err(PollError::IndexOutOfRange { max }),
        };

        if poll.has_voted(user_id) {
            return Err(PollError::AlreadyVoted);
        }

        poll.voters.insert(user_id.to_string());
        let option = &mut poll.options[index - 1];
        option.votes = option.votes.saturating_add(1);
        self.store.put(&poll).await?;
        debug!("User {} voted for option {} in poll '{}'", user_id, index, poll.title);

        Ok(format_poll(&poll))
    }

    async fn load_active(&self, active: &mut Option<String>) -> Result<Poll, PollError> {
        let title = active.as_deref().ok_or(PollError::NoActivePoll)?;

        match self.store.get(title).await {
            Ok(poll) => Ok(poll),
            Err(StoreError::NotFound(_)) => {
                warn!("Active poll '{}' vanished from the store, clearing it", title);
                *active = None;
                Err(PollError::NoActivePoll)
            }
            Err(e) => Err(e.into()),
        }
    }
}
