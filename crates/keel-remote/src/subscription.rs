//! The change-event subscription handle.

use keel_core::{ChannelError, TaskChange};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

/// A live subscription to one identity's change events.
///
/// Obtained from [`RemoteCollection::subscribe`]. Events are buffered in a
/// bounded channel; a subscriber that falls behind observes
/// [`ChannelError::Lagged`] and must resynchronize from a fresh bulk read.
/// Dropping the handle cancels delivery — nothing is buffered for a dropped
/// subscriber.
///
/// [`RemoteCollection::subscribe`]: crate::RemoteCollection::subscribe
pub struct Subscription {
    receiver: broadcast::Receiver<TaskChange>,
}

impl Subscription {
    /// Wrap a raw broadcast receiver. Backend implementations call this;
    /// consumers only ever receive.
    #[must_use]
    pub fn new(receiver: broadcast::Receiver<TaskChange>) -> Self {
        Self { receiver }
    }

    /// Wait for the next change event.
    pub async fn recv(&mut self) -> Result<TaskChange, ChannelError> {
        self.receiver.recv().await.map_err(|err| match err {
            RecvError::Lagged(dropped) => ChannelError::Lagged(dropped),
            RecvError::Closed => ChannelError::Closed,
        })
    }

    /// Non-blocking poll. `Ok(None)` when no event is ready.
    pub fn try_recv(&mut self) -> Result<Option<TaskChange>, ChannelError> {
        match self.receiver.try_recv() {
            Ok(change) => Ok(Some(change)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Lagged(dropped)) => Err(ChannelError::Lagged(dropped)),
            Err(TryRecvError::Closed) => Err(ChannelError::Closed),
        }
    }

    /// Number of events waiting in the channel.
    #[must_use]
    pub fn backlog(&self) -> usize {
        self.receiver.len()
    }
}
