//! Task record types.
//!
//! All serializable types use `camelCase` struct fields; enum values are
//! `snake_case`/`lowercase` strings matching the stored column values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{OwnerId, TaskId};

// ─────────────────────────────────────────────────────────────────────────────
// Enums
// ─────────────────────────────────────────────────────────────────────────────

/// Task status in the workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not yet started.
    #[default]
    Pending,
    /// Currently being worked on.
    InProgress,
    /// Done.
    Completed,
}

impl TaskStatus {
    /// Whether this status represents a finished task.
    #[must_use]
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Next status under the toggle-complete affordance.
    ///
    /// `Completed` reopens to `Pending`; anything else completes. Transitions
    /// are otherwise unconstrained — any status may be set directly.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Completed => Self::Pending,
            Self::Pending | Self::InProgress => Self::Completed,
        }
    }

    /// Canonical string form (matches the serialized values).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Default priority.
    #[default]
    Medium,
    /// Elevated priority.
    High,
}

impl TaskPriority {
    /// Canonical string form (matches the serialized values).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client-side list filter over task status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// No filtering.
    #[default]
    All,
    /// Only `pending` tasks.
    Pending,
    /// Only `in_progress` tasks.
    InProgress,
    /// Only `completed` tasks.
    Completed,
}

impl StatusFilter {
    /// The status this filter selects, if it selects one at all.
    #[must_use]
    pub fn status(self) -> Option<TaskStatus> {
        match self {
            Self::All => None,
            Self::Pending => Some(TaskStatus::Pending),
            Self::InProgress => Some(TaskStatus::InProgress),
            Self::Completed => Some(TaskStatus::Completed),
        }
    }

    /// Whether a task passes this filter.
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        self.status().is_none_or(|status| task.status == status)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Records
// ─────────────────────────────────────────────────────────────────────────────

/// A task record owned by a single identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique record id, assigned by the remote service at insert.
    pub id: TaskId,
    /// Short human-readable title. Never empty.
    pub title: String,
    /// Optional long-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Priority level.
    pub priority: TaskPriority,
    /// Workflow status.
    pub status: TaskStatus,
    /// Identity the record belongs to. Immutable after insert.
    pub owner: OwnerId,
    /// Set by the remote service at insert.
    pub created_at: DateTime<Utc>,
    /// Stamped by the command layer on every edit.
    pub updated_at: DateTime<Utc>,
}

/// Client-supplied fields for creating a task.
///
/// `id`, `owner`, and `created_at` are assigned by the remote service at
/// insert; they never travel in a draft.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    /// Title for the new task.
    pub title: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Priority, `medium` when unspecified.
    #[serde(default)]
    pub priority: TaskPriority,
    /// Initial status, `pending` when unspecified.
    #[serde(default)]
    pub status: TaskStatus,
}

impl TaskDraft {
    /// Draft with the given title and defaults everywhere else.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update of a task.
///
/// `None` fields are left untouched. `description` is doubly optional so a
/// patch can distinguish "leave alone" (`None`) from "clear" (`Some(None)`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// Replacement title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Replacement description, or `Some(None)` to clear it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    /// Replacement priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    /// Replacement status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// New `updated_at` stamp. The command layer sets this on every edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TaskPatch {
    /// Patch that only changes the status.
    #[must_use]
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Apply this patch onto an existing record, field by field.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            task.description.clone_from(description);
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(updated_at) = self.updated_at {
            task.updated_at = updated_at;
        }
    }
}
