//! # keel-client
//!
//! The client core: session context, the task mirror, and the command layer.
//!
//! - **[`Session`]**: explicitly-scoped authentication context, installed on
//!   sign-in and cleared on sign-out. No ambient global state.
//! - **[`TaskMirror`]**: the synchronization layer — a newest-first local
//!   list mirroring the remote collection, kept current by change events.
//! - **[`TaskCommands`]**: the command layer — user intents become write
//!   requests against the remote collection.
//!
//! ## The two-phase model
//!
//! Commands never mutate the local list. Every write reports only the fate
//! of the *request*; the authoritative state change arrives later as a
//! change event the mirror applies. There is no optimistic update: UI
//! feedback latency is one full round trip, request → commit → event, and
//! the local list only ever holds server-confirmed state.
//!
//! ## Crate Position
//!
//! Top layer. Depends on `keel-core` and `keel-remote`.

#![deny(unsafe_code)]

pub mod commands;
pub mod config;
pub mod mirror;
pub mod session;

pub use commands::TaskCommands;
pub use config::SyncConfig;
pub use mirror::{TaskMirror, apply_change};
pub use session::{Identity, Session};
