use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub title: String,
    /// Insertion order is the 1-based index users vote with.
    pub options: Vec<PollOption>,
    /// Users who voted in the current run.
    pub voters: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub text: String,
    pub votes: u32,
}

/// One row of `/poll list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollListing {
    pub title: String,
    pub active: bool,
}

impl Poll {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            options: Vec::new(),
            voters: BTreeSet::new(),
            created_at: Utc::now(),
        }
    }

    pub fn has_option(&self, text: &str) -> bool {
        self.options.iter().any(|option| option.text == text)
    }

    pub fn add_option(&mut self, text: impl Into<String>) {
        self.options.push(PollOption {
            text: text.into(),
            votes: 0,
        });
    }

    pub fn has_voted(&self, user_id: &str) -> bool {
        self.voters.contains(user_id)
    }

    pub fn total_votes(&self) -> u32 {
        self.options
            .iter()
            .fold(0u32, |total, option| total.saturating_add(option.votes))
    }

    /// Zero every count and forget who voted. Options are kept.
    pub fn reset(&mut self) {
        for option in &mut self.options {
            option.votes = 0;
        }
        self.voters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_poll_is_empty() {
        let poll = Poll::new("Lunch");
        assert_eq!(poll.title, "Lunch");
        assert!(poll.options.is_empty());
        assert!(poll.voters.is_empty());
        assert_eq!(poll.total_votes(), 0);
    }

    #[test]
    fn test_reset_keeps_options() {
        let mut poll = Poll::new("Lunch");
        poll.add_option("Pizza");
        poll.add_option("Tacos");
        poll.options[0].votes = 3;
        poll.options[1].votes = 2;
        poll.voters.insert("alice".to_string());

        poll.reset();

        assert_eq!(poll.options.len(), 2);
        assert_eq!(poll.total_votes(), 0);
        assert!(!poll.has_voted("alice"));
        assert!(poll.has_option("Tacos"));
    }

    #[test]
    fn test_total_votes_saturates() {
        let mut poll = Poll::new("Lunch");
        poll.add_option("Pizza");
        poll.add_option("Tacos");
        poll.options[0].votes = u32::MAX;
        poll.options[1].votes = 3;

        assert_eq!(poll.total_votes(), u32::MAX);
    }

    #[test]
    fn test_serialized_options_keep_order() {
        let mut poll = Poll::new("Lunch");
        poll.add_option("Tacos");
        poll.add_option("Pizza");

        let json = serde_json::to_value(&poll).unwrap();
        assert_eq!(json["options"][0]["text"], "Tacos");
        assert_eq!(json["options"][1]["text"], "Pizza");

        let back: Poll = serde_json::from_value(json).unwrap();
        assert_eq!(back, poll);
    }
}
