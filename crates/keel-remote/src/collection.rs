//! The remote collection contract.

use async_trait::async_trait;
use keel_core::{OwnerId, RemoteError, Task, TaskDraft, TaskId, TaskPatch};

use crate::subscription::Subscription;

/// The external system of record for task data.
///
/// Every operation is scoped to an owner identity. Backends MUST enforce
/// row-level ownership on reads and writes — the client layers assume a
/// foreign record can never be observed or mutated through this interface,
/// and do not re-check.
///
/// Writes are two-phase from the client's perspective: the request's
/// `Result` reports acceptance only, and the authoritative state change
/// arrives later as a [`TaskChange`] on the owner's subscription.
///
/// [`TaskChange`]: keel_core::TaskChange
#[async_trait]
pub trait RemoteCollection: Send + Sync {
    /// All records belonging to `owner`, newest first (`created_at`
    /// descending).
    async fn list(&self, owner: &OwnerId) -> Result<Vec<Task>, RemoteError>;

    /// Insert a new record for `owner`.
    ///
    /// The backend assigns the id and `created_at` and returns the committed
    /// row. The insert change event is published regardless of whether the
    /// caller keeps the returned row.
    async fn insert(&self, owner: &OwnerId, draft: TaskDraft) -> Result<Task, RemoteError>;

    /// Apply a partial update to `owner`'s record `id`.
    ///
    /// [`RemoteError::RowNotFound`] when no row matches within the owner's
    /// scope — a missing row and a foreign row are indistinguishable.
    async fn update(
        &self,
        owner: &OwnerId,
        id: &TaskId,
        patch: TaskPatch,
    ) -> Result<(), RemoteError>;

    /// Delete `owner`'s record `id`.
    ///
    /// Returns whether a row matched; `Ok(false)` is the "zero rows
    /// affected" signal, not an error.
    async fn delete(&self, owner: &OwnerId, id: &TaskId) -> Result<bool, RemoteError>;

    /// Open a change-event channel covering `owner`'s records.
    ///
    /// Only changes to rows owned by `owner` are delivered. Dropping the
    /// returned [`Subscription`] cancels delivery.
    async fn subscribe(&self, owner: &OwnerId) -> Result<Subscription, RemoteError>;
}
