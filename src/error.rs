use thiserror::Error;

/// Every way a poll operation can be refused.
///
/// The `Display` text is the reply shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("Please give the title of the poll.")]
    EmptyTitle,
    #[error("usage: /poll option <poll_option>")]
    EmptyOption,
    #[error("usage: /poll vote <option_number>")]
    EmptyIndex,
    #[error("A poll with that title already exists.")]
    DuplicateTitle,
    #[error("Option already exists. Use /poll show to see all options.")]
    DuplicateOption,
    #[error("Poll not found. Use /poll list to see all polls.")]
    NotFound,
    #[error("No active poll. Use /poll start to start a poll.")]
    NoActivePoll,
    #[error("\"{0}\" is currently running, use /poll stop to finish it.")]
    PollAlreadyActive(String),
    #[error("\"{0}\" is currently running and cannot be removed. Use /poll stop first.")]
    ActivePollRemoval(String),
    #[error("Please vote using the numerical index of the option.")]
    NotANumber,
    #[error("Please choose a number between 1 and {max} (inclusive).")]
    IndexOutOfRange { max: usize },
    #[error("You have already voted.")]
    AlreadyVoted,
    #[error("The poll storage is unavailable right now, please try again later.")]
    StorageUnavailable(String),
}

impl PollError {
    /// True for faults that are not the caller's doing.
    pub fn is_internal(&self) -> bool {
        matches!(self, PollError::StorageUnavailable(_))
    }
}

impl From<crate::db::StoreError> for PollError {
    fn from(err: crate::db::StoreError) -> Self {
        use crate::db::StoreError;

        match err {
            StoreError::NotFound(_) => PollError::NotFound,
            StoreError::AlreadyExists(_) => PollError::DuplicateTitle,
            other => PollError::StorageUnavailable(other.to_string()),
        }
    }
}
