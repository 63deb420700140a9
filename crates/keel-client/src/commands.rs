//! Command layer — user intents become remote write requests.
//!
//! Commands never touch the mirrored list. Every operation reports only the
//! fate of the request; the authoritative state change arrives later as a
//! change event on the mirror's channel. Failed requests are logged at WARN
//! and surfaced to the caller; nothing is retried automatically.

use std::sync::Arc;

use chrono::Utc;
use tracing::{instrument, warn};

use keel_core::{CommandError, OwnerId, TaskDraft, TaskId, TaskPatch, TaskStatus};
use keel_remote::RemoteCollection;

use crate::session::Session;

/// Translates user intents into requests against the remote collection.
pub struct TaskCommands {
    remote: Arc<dyn RemoteCollection>,
    session: Session,
}

impl TaskCommands {
    /// Command layer over `remote`, scoped by `session`.
    pub fn new(remote: Arc<dyn RemoteCollection>, session: Session) -> Self {
        Self { remote, session }
    }

    /// Create a task.
    ///
    /// The title is trimmed and must be non-empty; the check runs before
    /// dispatch, so an invalid draft never produces a remote request. The
    /// committed row the service returns is deliberately discarded — the
    /// insert change event is the sole state-update signal.
    #[instrument(skip_all)]
    pub async fn create(&self, mut draft: TaskDraft) -> Result<(), CommandError> {
        draft.title = draft.title.trim().to_string();
        if draft.title.is_empty() {
            return Err(CommandError::EmptyTitle);
        }
        let owner = self.owner()?;

        let _ = self
            .remote
            .insert(&owner, draft)
            .await
            .inspect_err(|err| warn!(%owner, error = %err, "create request failed"))?;
        Ok(())
    }

    /// Apply a partial edit to a task.
    ///
    /// Stamps `updated_at` on every edit. A patched title is trimmed and
    /// must stay non-empty — a task never loses its title.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn update(&self, id: &TaskId, mut patch: TaskPatch) -> Result<(), CommandError> {
        if let Some(title) = patch.title.take() {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(CommandError::EmptyTitle);
            }
            patch.title = Some(title);
        }
        let owner = self.owner()?;
        patch.updated_at = Some(Utc::now());

        self.remote
            .update(&owner, id, patch)
            .await
            .inspect_err(|err| warn!(%owner, %id, error = %err, "update request failed"))
            .map_err(CommandError::from)
    }

    /// Flip the completion state: `completed` reopens to `pending`,
    /// anything else completes. A single-field status update.
    pub async fn toggle_status(
        &self,
        id: &TaskId,
        current: TaskStatus,
    ) -> Result<(), CommandError> {
        self.update(id, TaskPatch::status(current.toggled())).await
    }

    /// Delete a task.
    ///
    /// A delete matching no rows reads as success toward the caller: the
    /// service reports "zero rows affected" for an already-gone row and a
    /// foreign one alike, and the distinction is invisible client-side. The
    /// case is logged so masked permission failures stay visible.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn delete(&self, id: &TaskId) -> Result<(), CommandError> {
        let owner = self.owner()?;

        let matched = self
            .remote
            .delete(&owner, id)
            .await
            .inspect_err(|err| warn!(%owner, %id, error = %err, "delete request failed"))?;
        if !matched {
            warn!(%owner, %id, "delete matched no rows");
        }
        Ok(())
    }

    fn owner(&self) -> Result<OwnerId, CommandError> {
        self.session.owner().ok_or(CommandError::Unauthenticated)
    }
}
