//! # keel-core
//!
//! Foundation types for the keel task client.
//!
//! This crate provides the shared vocabulary the other keel crates depend on:
//!
//! - **Branded IDs**: [`ids::TaskId`], [`ids::OwnerId`] as newtypes
//! - **Records**: [`task::Task`] with its draft and patch companions
//! - **Change events**: [`events::TaskChange`] insert/update/delete notifications
//! - **Errors**: [`errors`] hierarchy via `thiserror`
//! - **Logging**: [`logging::init`] tracing-subscriber setup
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by `keel-remote` and `keel-client`.

#![deny(unsafe_code)]

pub mod errors;
pub mod events;
pub mod ids;
pub mod logging;
pub mod task;

pub use errors::{ChannelError, CommandError, RemoteError, SyncError};
pub use events::TaskChange;
pub use ids::{OwnerId, TaskId};
pub use task::{StatusFilter, Task, TaskDraft, TaskPatch, TaskPriority, TaskStatus};
