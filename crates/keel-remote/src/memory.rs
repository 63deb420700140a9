//! In-process reference backend.
//!
//! `MemoryCollection` implements [`RemoteCollection`] against a plain row
//! vector with per-owner broadcast channels for change delivery. It exists
//! for tests and local development, but it enforces the full contract —
//! row-level owner scoping included — so swapping in a production backend
//! changes no client behavior.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use metrics::counter;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use keel_core::{OwnerId, RemoteError, Task, TaskChange, TaskDraft, TaskId, TaskPatch};

use crate::collection::RemoteCollection;
use crate::subscription::Subscription;

/// Default change-channel depth per owner.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

struct Inner {
    /// Rows in insertion order; `list` reads them newest-first.
    rows: Vec<Task>,
    /// Per-owner change channels, created on first subscribe.
    channels: HashMap<OwnerId, broadcast::Sender<TaskChange>>,
    /// Error injected by tests; consumed by the next operation.
    fail_next: Option<RemoteError>,
}

/// Reference [`RemoteCollection`] backend.
///
/// INVARIANT: change events are published while the row lock is held, so
/// delivery order always matches commit order. The lock is never held
/// across an await point — every operation body is synchronous.
pub struct MemoryCollection {
    inner: Mutex<Inner>,
    channel_capacity: usize,
}

impl MemoryCollection {
    /// Empty collection with the default channel capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Empty collection with an explicit per-owner channel capacity.
    ///
    /// Small capacities make lag reproducible in tests.
    #[must_use]
    pub fn with_capacity(channel_capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                rows: Vec::new(),
                channels: HashMap::new(),
                fail_next: None,
            }),
            channel_capacity,
        }
    }

    /// Make the next operation fail with `err`, once.
    ///
    /// Lets tests drive the degraded paths without a network.
    pub fn fail_next(&self, err: RemoteError) {
        self.inner.lock().fail_next = Some(err);
    }

    /// Drop `owner`'s change channel, closing every open subscription.
    ///
    /// Subscribers observe `ChannelError::Closed`; a later subscribe opens a
    /// fresh channel.
    pub fn close_channel(&self, owner: &OwnerId) {
        let removed = self.inner.lock().channels.remove(owner);
        if removed.is_some() {
            debug!(owner = %owner, "change channel closed");
        }
    }

    /// Number of live subscriptions on `owner`'s channel.
    #[must_use]
    pub fn subscriber_count(&self, owner: &OwnerId) -> usize {
        self.inner
            .lock()
            .channels
            .get(owner)
            .map_or(0, broadcast::Sender::receiver_count)
    }

    /// Total rows across all owners. Test helper.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.inner.lock().rows.len()
    }

    fn take_injected_failure(inner: &mut Inner) -> Result<(), RemoteError> {
        match inner.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn publish(inner: &mut Inner, owner: &OwnerId, change: TaskChange) {
        counter!("keel_remote_changes_total", "kind" => change.kind()).increment(1);
        let Some(sender) = inner.channels.get(owner) else {
            return;
        };
        match sender.send(change) {
            Ok(subscribers) => debug!(owner = %owner, subscribers, "change published"),
            Err(_) => {
                // Every receiver is gone; prune so the next subscribe
                // starts a fresh channel with an empty backlog.
                debug!(owner = %owner, "no live subscribers, channel pruned");
                let _ = inner.channels.remove(owner);
            }
        }
    }
}

impl Default for MemoryCollection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteCollection for MemoryCollection {
    async fn list(&self, owner: &OwnerId) -> Result<Vec<Task>, RemoteError> {
        let mut inner = self.inner.lock();
        Self::take_injected_failure(&mut inner)?;

        let mut rows: Vec<Task> = inner
            .rows
            .iter()
            .filter(|task| &task.owner == owner)
            .cloned()
            .collect();
        rows.reverse();
        Ok(rows)
    }

    async fn insert(&self, owner: &OwnerId, draft: TaskDraft) -> Result<Task, RemoteError> {
        let mut inner = self.inner.lock();
        Self::take_injected_failure(&mut inner)?;

        let now = Utc::now();
        let task = Task {
            id: TaskId::new(Uuid::now_v7().to_string()),
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            status: draft.status,
            owner: owner.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.rows.push(task.clone());
        debug!(owner = %owner, id = %task.id, "row inserted");

        Self::publish(&mut inner, owner, TaskChange::Inserted { task: task.clone() });
        Ok(task)
    }

    async fn update(
        &self,
        owner: &OwnerId,
        id: &TaskId,
        patch: TaskPatch,
    ) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock();
        Self::take_injected_failure(&mut inner)?;

        let Some(row) = inner
            .rows
            .iter_mut()
            .find(|task| &task.id == id && &task.owner == owner)
        else {
            return Err(RemoteError::RowNotFound);
        };
        patch.apply_to(row);
        let task = row.clone();
        debug!(owner = %owner, id = %task.id, "row updated");

        Self::publish(&mut inner, owner, TaskChange::Updated { task });
        Ok(())
    }

    async fn delete(&self, owner: &OwnerId, id: &TaskId) -> Result<bool, RemoteError> {
        let mut inner = self.inner.lock();
        Self::take_injected_failure(&mut inner)?;

        let Some(position) = inner
            .rows
            .iter()
            .position(|task| &task.id == id && &task.owner == owner)
        else {
            return Ok(false);
        };
        let _ = inner.rows.remove(position);
        debug!(owner = %owner, id = %id, "row deleted");

        Self::publish(&mut inner, owner, TaskChange::Deleted { id: id.clone() });
        Ok(true)
    }

    async fn subscribe(&self, owner: &OwnerId) -> Result<Subscription, RemoteError> {
        let mut inner = self.inner.lock();
        Self::take_injected_failure(&mut inner)?;

        let capacity = self.channel_capacity;
        let sender = inner
            .channels
            .entry(owner.clone())
            .or_insert_with(|| broadcast::channel(capacity).0);
        debug!(owner = %owner, subscribers = sender.receiver_count() + 1, "subscription opened");
        Ok(Subscription::new(sender.subscribe()))
    }
}
