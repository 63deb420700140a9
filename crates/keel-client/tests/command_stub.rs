//! Command-layer contract tests against a scripted remote stub.
//!
//! The stub panics on any call without a matching expectation, so the
//! "never dispatches" tests prove zero remote traffic by construction.

use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::Utc;
use mockall::mock;

use keel_client::{Identity, Session, TaskCommands};
use keel_core::{
    CommandError, OwnerId, RemoteError, Task, TaskDraft, TaskId, TaskPatch, TaskStatus,
};
use keel_remote::{RemoteCollection, Subscription};

mock! {
    Remote {}

    #[async_trait]
    impl RemoteCollection for Remote {
        async fn list(&self, owner: &OwnerId) -> Result<Vec<Task>, RemoteError>;
        async fn insert(&self, owner: &OwnerId, draft: TaskDraft) -> Result<Task, RemoteError>;
        async fn update(
            &self,
            owner: &OwnerId,
            id: &TaskId,
            patch: TaskPatch,
        ) -> Result<(), RemoteError>;
        async fn delete(&self, owner: &OwnerId, id: &TaskId) -> Result<bool, RemoteError>;
        async fn subscribe(&self, owner: &OwnerId) -> Result<Subscription, RemoteError>;
    }
}

fn committed(owner: &OwnerId, draft: TaskDraft) -> Task {
    let now = Utc::now();
    Task {
        id: TaskId::from("assigned-by-service"),
        title: draft.title,
        description: draft.description,
        priority: draft.priority,
        status: draft.status,
        owner: owner.clone(),
        created_at: now,
        updated_at: now,
    }
}

fn commands_over(mock: MockRemote) -> TaskCommands {
    TaskCommands::new(Arc::new(mock), Session::signed_in(Identity::new("user-1")))
}

#[tokio::test]
async fn empty_title_never_dispatches() {
    // No expectations: any remote call panics the test.
    let commands = commands_over(MockRemote::new());

    assert_matches!(
        commands.create(TaskDraft::new("")).await,
        Err(CommandError::EmptyTitle)
    );
    assert_matches!(
        commands.create(TaskDraft::new("   \t ")).await,
        Err(CommandError::EmptyTitle)
    );
}

#[tokio::test]
async fn blanked_title_edit_never_dispatches() {
    let commands = commands_over(MockRemote::new());
    let patch = TaskPatch {
        title: Some("   ".into()),
        ..TaskPatch::default()
    };

    assert_matches!(
        commands.update(&TaskId::from("t-1"), patch).await,
        Err(CommandError::EmptyTitle)
    );
}

#[tokio::test]
async fn signed_out_session_never_dispatches() {
    let commands = TaskCommands::new(Arc::new(MockRemote::new()), Session::signed_out());

    assert_matches!(
        commands.create(TaskDraft::new("valid title")).await,
        Err(CommandError::Unauthenticated)
    );
    assert_matches!(
        commands.delete(&TaskId::from("t-1")).await,
        Err(CommandError::Unauthenticated)
    );
    assert_matches!(
        commands
            .toggle_status(&TaskId::from("t-1"), TaskStatus::Pending)
            .await,
        Err(CommandError::Unauthenticated)
    );
}

#[tokio::test]
async fn create_trims_the_title_and_discards_the_row() {
    let mut mock = MockRemote::new();
    mock.expect_insert()
        .withf(|owner, draft| owner.as_str() == "user-1" && draft.title == "trimmed")
        .times(1)
        .returning(|owner, draft| Ok(committed(owner, draft)));

    let commands = commands_over(mock);
    assert_matches!(commands.create(TaskDraft::new("  trimmed  ")).await, Ok(()));
}

#[tokio::test]
async fn update_stamps_updated_at() {
    let mut mock = MockRemote::new();
    mock.expect_update()
        .withf(|_, id, patch| {
            id.as_str() == "t-1"
                && patch.status == Some(TaskStatus::InProgress)
                && patch.updated_at.is_some()
        })
        .times(1)
        .returning(|_, _, _| Ok(()));

    let commands = commands_over(mock);
    let patch = TaskPatch::status(TaskStatus::InProgress);
    assert_matches!(commands.update(&TaskId::from("t-1"), patch).await, Ok(()));
}

#[tokio::test]
async fn toggle_derives_the_next_status() {
    let mut mock = MockRemote::new();
    mock.expect_update()
        .withf(|_, _, patch| patch.status == Some(TaskStatus::Pending))
        .times(1)
        .returning(|_, _, _| Ok(()));
    mock.expect_update()
        .withf(|_, _, patch| patch.status == Some(TaskStatus::Completed))
        .times(2)
        .returning(|_, _, _| Ok(()));

    let commands = commands_over(mock);
    let id = TaskId::from("t-1");
    // completed reopens; pending and in_progress both complete.
    commands
        .toggle_status(&id, TaskStatus::Completed)
        .await
        .unwrap();
    commands
        .toggle_status(&id, TaskStatus::Pending)
        .await
        .unwrap();
    commands
        .toggle_status(&id, TaskStatus::InProgress)
        .await
        .unwrap();
}

#[tokio::test]
async fn zero_row_delete_reads_as_success() {
    let mut mock = MockRemote::new();
    mock.expect_delete()
        .withf(|_, id| id.as_str() == "already-gone")
        .times(1)
        .returning(|_, _| Ok(false));

    let commands = commands_over(mock);
    assert_matches!(commands.delete(&TaskId::from("already-gone")).await, Ok(()));
}

#[tokio::test]
async fn remote_failures_surface_as_command_errors() {
    let mut mock = MockRemote::new();
    mock.expect_insert()
        .times(1)
        .returning(|_, _| Err(RemoteError::Unavailable("offline".into())));
    mock.expect_update()
        .times(1)
        .returning(|_, _, _| Err(RemoteError::RowNotFound));

    let commands = commands_over(mock);
    assert_matches!(
        commands.create(TaskDraft::new("net down")).await,
        Err(CommandError::Remote(RemoteError::Unavailable(_)))
    );
    assert_matches!(
        commands
            .update(&TaskId::from("foreign"), TaskPatch::status(TaskStatus::Completed))
            .await,
        Err(CommandError::Remote(RemoteError::RowNotFound))
    );
}
