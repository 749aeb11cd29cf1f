//! Utilities to observe the persistence of a task store

use std::fmt::{Display, Error, Formatter};

/// What happened the last time a store tried to persist its collection
#[derive(Clone, Debug, PartialEq)]
pub enum StoreEvent {
    /// Nothing has been saved yet
    NotSaved,
    /// The whole collection has been written to storage
    Saved{ tasks: usize },
    /// Writing to storage failed. The in-memory collection is still up to date
    SaveFailed{ reason: String },
}

impl Display for StoreEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            StoreEvent::NotSaved => write!(f, "Not saved yet"),
            StoreEvent::Saved{tasks} => write!(f, "Saved {} tasks", tasks),
            StoreEvent::SaveFailed{reason} => write!(f, "Unable to save tasks: {}", reason),
        }
    }
}

impl Default for StoreEvent {
    fn default() -> Self {
        Self::NotSaved
    }
}



/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<StoreEvent>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::watch::Receiver<StoreEvent>;

/// Create a feeback channel, that can be used to observe every save of a [`TaskStore`](crate::store::TaskStore)
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::watch::channel(StoreEvent::default())
}
