//! # keel-remote
//!
//! The remote collection contract and an in-process reference backend.
//!
//! - **[`RemoteCollection`]**: the external system of record's interface —
//!   bulk read, owner-scoped writes, and a per-owner change subscription.
//! - **[`Subscription`]**: the change-event channel handle with an explicit
//!   receive/cancel contract.
//! - **[`MemoryCollection`]**: reference backend used by tests and local
//!   development; enforces the same row-level owner scoping a production
//!   backend must provide.
//!
//! ## Crate Position
//!
//! Contract layer. Depends on `keel-core`. Depended on by `keel-client`.

#![deny(unsafe_code)]

pub mod collection;
pub mod memory;
pub mod subscription;

pub use collection::RemoteCollection;
pub use memory::MemoryCollection;
pub use subscription::Subscription;
