//! Branded ID newtypes.
//!
//! IDs are opaque strings on the wire. The newtypes exist so a task id can
//! never be passed where an owner id is expected; nothing in the client ever
//! inspects their contents. The reference backend mints UUID v7 task ids, but
//! that is a backend choice, not part of the contract.

use serde::{Deserialize, Serialize};

/// Unique identifier of a task record.
///
/// Assigned by the remote collection service at insert time and never
/// mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The authenticated principal a task record belongs to.
///
/// Set at creation to the calling identity; immutable. Row-level visibility
/// scoping on this id is the backend's responsibility.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OwnerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_transparently() {
        let id = TaskId::new("0193b6f2-89ab-7def-8123-456789abcdef");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"0193b6f2-89ab-7def-8123-456789abcdef\"");

        let back: TaskId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn display_matches_raw_form() {
        let owner = OwnerId::from("user-1");
        assert_eq!(owner.to_string(), "user-1");
        assert_eq!(owner.as_str(), "user-1");
    }
}
