//! Change events emitted by the remote collection.
//!
//! Every committed mutation produces one [`TaskChange`] delivered to
//! subscribers of the owning identity's channel. The synchronization layer
//! applies these strictly in arrival order; two writers racing on the same
//! record converge to whichever update is delivered last.

use serde::{Deserialize, Serialize};

use crate::ids::TaskId;
use crate::task::Task;

/// A mutation notification from the remote collection.
///
/// `Inserted` and `Updated` carry the full row as committed; `Deleted`
/// carries only the departed row's id — the remote does not echo dropped
/// payloads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskChange {
    /// A new record was committed.
    Inserted {
        /// The new row.
        task: Task,
    },
    /// An existing record was rewritten.
    Updated {
        /// The full row after the update.
        task: Task,
    },
    /// A record was removed.
    Deleted {
        /// Id of the removed row.
        id: TaskId,
    },
}

impl TaskChange {
    /// Id of the record this change concerns.
    #[must_use]
    pub fn task_id(&self) -> &TaskId {
        match self {
            Self::Inserted { task } | Self::Updated { task } => &task.id,
            Self::Deleted { id } => id,
        }
    }

    /// Short change-kind label for logs and metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Inserted { .. } => "inserted",
            Self::Updated { .. } => "updated",
            Self::Deleted { .. } => "deleted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::OwnerId;
    use crate::task::{TaskPriority, TaskStatus};
    use chrono::{TimeZone, Utc};

    #[test]
    fn events_tag_on_type() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let change = TaskChange::Inserted {
            task: Task {
                id: TaskId::from("t-9"),
                title: "ship it".into(),
                description: None,
                priority: TaskPriority::Low,
                status: TaskStatus::Pending,
                owner: OwnerId::from("user-1"),
                created_at: at,
                updated_at: at,
            },
        };

        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["type"], "inserted");
        assert_eq!(json["task"]["title"], "ship it");

        let deleted = TaskChange::Deleted {
            id: TaskId::from("t-9"),
        };
        let json = serde_json::to_value(&deleted).unwrap();
        assert_eq!(json["type"], "deleted");
        assert_eq!(json["id"], "t-9");
    }

    #[test]
    fn task_id_points_at_the_affected_row() {
        let deleted = TaskChange::Deleted {
            id: TaskId::from("t-3"),
        };
        assert_eq!(deleted.task_id().as_str(), "t-3");
        assert_eq!(deleted.kind(), "deleted");
    }
}
