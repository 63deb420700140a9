//! The synchronization layer.
//!
//! [`TaskMirror`] maintains an in-memory, newest-first list mirroring the
//! remote collection for one identity: a single bulk read at initialize,
//! then incremental change events applied strictly in arrival order. The
//! list is a pure projection of server-confirmed state — nothing writes to
//! it except the consumer task, and the command layer never touches it.
//!
//! Channel-loss policy: on lag the consumer rebuilds the list from a fresh
//! bulk read; on close it tries a fresh subscription (plus rebuild) and
//! only then degrades, parking a retrievable error with the last good list
//! intact.

use std::sync::Arc;

use metrics::counter;
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use keel_core::{ChannelError, OwnerId, StatusFilter, SyncError, Task, TaskChange};
use keel_remote::{RemoteCollection, Subscription};

use crate::config::SyncConfig;
use crate::session::Session;

/// View state shared between the mirror handle and its consumer task.
#[derive(Debug)]
struct Shared {
    /// The mirrored list, newest first.
    tasks: RwLock<Vec<Task>>,
    /// Parked degraded-state error, if any.
    error: RwLock<Option<SyncError>>,
}

/// A live local projection of one identity's remote task collection.
#[derive(Debug)]
pub struct TaskMirror {
    shared: Arc<Shared>,
    cancel: CancellationToken,
    consumer: Option<JoinHandle<()>>,
}

impl TaskMirror {
    /// Bring up a mirror for the session's identity.
    ///
    /// Performs one bulk read (newest first), subscribes to the change
    /// channel, and spawns the consumer task. A failed bulk read is NOT
    /// fatal: the mirror goes live with an empty list and a parked
    /// [`SyncError::InitialLoad`]. A failed subscribe IS fatal and returns
    /// [`SyncError::Subscribe`]; a mirror is never started without a
    /// channel.
    pub async fn initialize(
        remote: Arc<dyn RemoteCollection>,
        session: &Session,
        config: SyncConfig,
    ) -> Result<Self, SyncError> {
        let owner = session.owner().ok_or(SyncError::Auth)?;

        let shared = Arc::new(Shared {
            tasks: RwLock::new(Vec::new()),
            error: RwLock::new(None),
        });

        match remote.list(&owner).await {
            Ok(tasks) => {
                info!(owner = %owner, count = tasks.len(), "initial load complete");
                *shared.tasks.write() = tasks;
            }
            Err(err) => {
                warn!(owner = %owner, error = %err, "initial load failed, starting empty");
                *shared.error.write() = Some(SyncError::InitialLoad(err));
            }
        }

        let subscription = remote.subscribe(&owner).await.map_err(SyncError::Subscribe)?;

        let cancel = CancellationToken::new();
        let consumer = tokio::spawn(consume(
            Arc::clone(&shared),
            Arc::clone(&remote),
            owner,
            subscription,
            config,
            cancel.clone(),
        ));

        Ok(Self {
            shared,
            cancel,
            consumer: Some(consumer),
        })
    }

    /// Snapshot of the mirrored list, newest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Task> {
        self.shared.tasks.read().clone()
    }

    /// Snapshot filtered by status, newest first.
    #[must_use]
    pub fn snapshot_filtered(&self, filter: StatusFilter) -> Vec<Task> {
        self.shared
            .tasks
            .read()
            .iter()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect()
    }

    /// Number of mirrored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.tasks.read().len()
    }

    /// Whether the mirror holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.tasks.read().is_empty()
    }

    /// Last degraded-state error, if any.
    ///
    /// The list keeps whatever state it held when the error occurred; a
    /// successful resync clears the error.
    #[must_use]
    pub fn last_error(&self) -> Option<SyncError> {
        self.shared.error.read().clone()
    }

    /// Whether the consumer task is still applying events.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.consumer.as_ref().is_some_and(|c| !c.is_finished())
    }

    /// Tear the mirror down: cancel the consumer and release the
    /// subscription.
    ///
    /// Consuming `self` makes teardown exactly-once at the type level. The
    /// consumer is awaited, so once this returns no late-arriving event can
    /// touch the discarded state.
    pub async fn teardown(mut self) {
        self.cancel.cancel();
        if let Some(consumer) = self.consumer.take() {
            let _ = consumer.await;
        }
        debug!("mirror torn down");
    }
}

impl Drop for TaskMirror {
    /// Backstop for mirrors dropped without [`TaskMirror::teardown`] (a view
    /// unmounting early): cancel the consumer so no late event lands on
    /// discarded state.
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(consumer) = &self.consumer {
            consumer.abort();
        }
    }
}

/// Apply one change event to a newest-first list.
///
/// - insert → prepend (arrival order is display order). An insert for an id
///   already present is ignored; it can only be a stale replay from the
///   resync path, where the bulk read already contains the row.
/// - update → replace the record sharing the id; no-op when absent.
/// - delete → remove the record sharing the id; no-op when absent.
pub fn apply_change(tasks: &mut Vec<Task>, change: TaskChange) {
    match change {
        TaskChange::Inserted { task } => {
            if tasks.iter().any(|existing| existing.id == task.id) {
                debug!(id = %task.id, "insert for known id ignored");
                return;
            }
            tasks.insert(0, task);
        }
        TaskChange::Updated { task } => {
            if let Some(existing) = tasks.iter_mut().find(|e| e.id == task.id) {
                *existing = task;
            }
        }
        TaskChange::Deleted { id } => {
            tasks.retain(|existing| existing.id != id);
        }
    }
}

/// Consumer loop: the single writer of the mirrored list.
///
/// Each event is processed to completion before the next is received; the
/// write lock is held only for the in-memory apply, never across an await.
async fn consume(
    shared: Arc<Shared>,
    remote: Arc<dyn RemoteCollection>,
    owner: OwnerId,
    mut subscription: Subscription,
    config: SyncConfig,
    cancel: CancellationToken,
) {
    loop {
        let received = tokio::select! {
            () = cancel.cancelled() => {
                debug!(owner = %owner, "consumer cancelled");
                return;
            }
            received = subscription.recv() => received,
        };

        match received {
            Ok(change) => {
                debug!(owner = %owner, kind = change.kind(), id = %change.task_id(), "applying change");
                counter!("keel_mirror_events_applied_total", "kind" => change.kind()).increment(1);
                apply_change(&mut shared.tasks.write(), change);
            }
            Err(ChannelError::Lagged(dropped)) => {
                if config.resync_on_lag {
                    warn!(owner = %owner, dropped, "change channel lagged, resyncing");
                    resync(&shared, remote.as_ref(), &owner, ChannelError::Lagged(dropped)).await;
                } else {
                    warn!(owner = %owner, dropped, "change channel lagged, resync disabled");
                    *shared.error.write() =
                        Some(SyncError::Channel(ChannelError::Lagged(dropped)));
                }
            }
            Err(ChannelError::Closed) => {
                warn!(owner = %owner, "change channel closed");
                match resubscribe(remote.as_ref(), &owner, config.resubscribe_attempts).await {
                    Some(fresh) => {
                        subscription = fresh;
                        counter!("keel_mirror_resubscribes_total").increment(1);
                        resync(&shared, remote.as_ref(), &owner, ChannelError::Closed).await;
                    }
                    None => {
                        warn!(owner = %owner, "could not re-establish channel, mirror degraded");
                        *shared.error.write() = Some(SyncError::Channel(ChannelError::Closed));
                        return;
                    }
                }
            }
        }
    }
}

/// Rebuild the list from a fresh bulk read.
///
/// On success the parked error (if any) is cleared. On failure the stale
/// list is kept and `cause` is parked.
async fn resync(shared: &Shared, remote: &dyn RemoteCollection, owner: &OwnerId, cause: ChannelError) {
    counter!("keel_mirror_resyncs_total").increment(1);
    match remote.list(owner).await {
        Ok(tasks) => {
            info!(owner = %owner, count = tasks.len(), "resync complete");
            *shared.tasks.write() = tasks;
            *shared.error.write() = None;
        }
        Err(err) => {
            warn!(owner = %owner, error = %err, "resync failed, keeping stale list");
            *shared.error.write() = Some(SyncError::Channel(cause));
        }
    }
}

async fn resubscribe(
    remote: &dyn RemoteCollection,
    owner: &OwnerId,
    attempts: u32,
) -> Option<Subscription> {
    for attempt in 1..=attempts {
        match remote.subscribe(owner).await {
            Ok(subscription) => {
                info!(owner = %owner, attempt, "resubscribed");
                return Some(subscription);
            }
            Err(err) => warn!(owner = %owner, attempt, error = %err, "resubscribe attempt failed"),
        }
    }
    None
}
