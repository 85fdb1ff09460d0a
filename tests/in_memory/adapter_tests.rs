//! Contract tests for the in-memory repositories.

use foreman::{
    actor::ActorId,
    config::WorkflowConfig,
    task::{
        adapters::memory::{
            InMemoryTaskApprovalRepository, InMemoryTaskCodeSequence, InMemoryTaskRepository,
            InMemoryWorkflowStore,
        },
        domain::{
            ApprovalLevel, SiteId, Task, TaskApproval, TaskCategory, TaskCode, TaskFields, TaskId,
            TaskQuery,
        },
        ports::{RepositoryError, TaskApprovalRepository, TaskCodeSequence, TaskRepository},
    },
};
use mockable::DefaultClock;
use rstest::rstest;

fn task(site_id: SiteId, code: TaskCode) -> Result<Task, eyre::Report> {
    Ok(Task::new(
        site_id,
        code,
        TaskFields::new("Pour slab", TaskCategory::Foundation),
        ActorId::new("site-engineer")?,
        &DefaultClock,
    )?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_codes_within_a_site_are_rejected() -> Result<(), eyre::Report> {
    let repo = InMemoryTaskRepository::new();
    let site_id = SiteId::new();
    let code = TaskCode::generate("HVT", 1);
    repo.store(&task(site_id, code.clone())?).await?;

    let result = repo.store(&task(site_id, code.clone())?).await;
    let elsewhere = repo.store(&task(SiteId::new(), code.clone())?).await;

    eyre::ensure!(
        matches!(result, Err(RepositoryError::DuplicateTaskCode { .. })),
        "expected duplicate code error, got {result:?}"
    );
    eyre::ensure!(elsewhere.is_ok(), "same code on another site is allowed");
    let found = repo.find_by_code(site_id, &code).await?;
    eyre::ensure!(found.is_some(), "task should be found by code");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn updating_an_unknown_task_is_not_found() -> Result<(), eyre::Report> {
    let repo = InMemoryTaskRepository::new();
    let result = repo
        .update(&task(SiteId::new(), TaskCode::generate("HVT", 1))?)
        .await;

    eyre::ensure!(
        matches!(result, Err(RepositoryError::NotFound { .. })),
        "expected not found, got {result:?}"
    );
    let all = repo.search(&TaskQuery::new().including_archived()).await?;
    eyre::ensure!(all.is_empty(), "nothing should be stored");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn one_approval_per_level() -> Result<(), eyre::Report> {
    let repo = InMemoryTaskApprovalRepository::new();
    let task_id = TaskId::new();
    repo.store(&TaskApproval::pending(task_id, ApprovalLevel::Engineer, &DefaultClock))
        .await?;

    let result = repo
        .store(&TaskApproval::pending(task_id, ApprovalLevel::Engineer, &DefaultClock))
        .await;

    eyre::ensure!(
        matches!(result, Err(RepositoryError::DuplicateApprovalLevel { .. })),
        "expected duplicate level error, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sequences_count_per_site() -> Result<(), eyre::Report> {
    let sequence = InMemoryTaskCodeSequence::new();
    let first_site = SiteId::new();
    let second_site = SiteId::new();

    let values = [
        sequence.next_value(first_site).await?,
        sequence.next_value(first_site).await?,
        sequence.next_value(second_site).await?,
    ];

    eyre::ensure!(values == [1, 2, 1], "unexpected sequence values {values:?}");
    Ok(())
}

#[rstest]
fn store_audit_log_uses_configured_capacity() -> Result<(), eyre::Report> {
    let config = WorkflowConfig::from_json_str(r#"{ "audit": { "capacity": 500 } }"#)?;

    let store = InMemoryWorkflowStore::from_config(&config.audit);

    eyre::ensure!(
        store.audit_log.capacity() == 500,
        "audit log capacity should follow configuration"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_orders_codes_numerically() -> Result<(), eyre::Report> {
    let repo = InMemoryTaskRepository::new();
    let site_id = SiteId::new();
    for sequence in [10_000, 9_999, 2] {
        repo.store(&task(site_id, TaskCode::generate("HVT", sequence))?)
            .await?;
    }

    let found = repo.search(&TaskQuery::for_site(site_id)).await?;
    let codes: Vec<&str> = found.iter().map(|task| task.code().as_str()).collect();

    eyre::ensure!(
        codes == ["HVT-TASK-0002", "HVT-TASK-9999", "HVT-TASK-10000"],
        "unexpected order {codes:?}"
    );
    Ok(())
}
