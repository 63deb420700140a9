//! Error hierarchy for the keel client.
//!
//! Four families, one per failure surface:
//!
//! - [`RemoteError`] — a remote collection request failed
//! - [`ChannelError`] — the change-event channel degraded
//! - [`CommandError`] — a user intent was rejected before or during dispatch
//! - [`SyncError`] — the synchronization layer entered a degraded state
//!
//! No variant is fatal to the process. Commands surface their error to the
//! caller; the mirror parks a retrievable [`SyncError`] and keeps its last
//! good list.

use thiserror::Error;

/// Errors surfaced by a remote collection backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// No row matched the id within the caller's scope.
    ///
    /// Ownership scoping is enforced by the backend, so a foreign row and a
    /// missing row are indistinguishable from the client side.
    #[error("no matching row")]
    RowNotFound,

    /// The backend is unreachable or refused the request.
    #[error("remote collection unavailable: {0}")]
    Unavailable(String),

    /// The backend accepted the request but failed internally.
    #[error("remote collection error: {0}")]
    Backend(String),
}

/// Errors on the change-event channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The subscriber fell behind and events were dropped.
    #[error("subscriber lagged, {0} events dropped")]
    Lagged(u64),

    /// The channel was closed by the backend.
    #[error("change channel closed")]
    Closed,
}

/// Errors returned by command-layer operations.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Title was empty after trimming. Checked before dispatch — no request
    /// reaches the remote.
    #[error("title must not be empty")]
    EmptyTitle,

    /// The session holds no authenticated identity.
    #[error("not signed in")]
    Unauthenticated,

    /// The remote request itself failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Failure states of the synchronization layer.
///
/// `Auth` and `Subscribe` are returned from initialization; `InitialLoad`
/// and `Channel` are parked on the mirror and retrievable via
/// `TaskMirror::last_error`. The local list keeps whatever state it held
/// when the error occurred.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The session held no identity at initialize time.
    #[error("cannot initialize a mirror without a signed-in identity")]
    Auth,

    /// The initial bulk read failed; the mirror went live with an empty list.
    #[error("initial load failed: {0}")]
    InitialLoad(RemoteError),

    /// Subscribing to the change channel failed.
    #[error("subscribe failed: {0}")]
    Subscribe(RemoteError),

    /// The change channel was lost and could not be re-established.
    #[error("change channel lost: {0}")]
    Channel(ChannelError),
}
