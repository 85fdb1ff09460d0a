//! End-to-end workflow tests over the in-memory adapters.

use super::helpers::{Harness, actor, harness};
use foreman::task::{
    domain::{
        ApprovalDecision, ApprovalLevel, ApprovalSummary, Money, Site, SiteId, TaskCategory,
        TaskPatch, TaskPriority, TaskStatus, TaskUpdateDraft, TimelineEvent,
    },
    services::{CreateTaskRequest, EntityRef, TaskWorkflowError},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn billable_task_runs_from_creation_to_sign_off(harness: Harness) -> Result<(), eyre::Report> {
    let engineer = actor("site-engineer")?;
    let task = harness
        .service
        .create_task(
            CreateTaskRequest::new(harness.site.id(), "Theatre ventilation", TaskCategory::Hvac)
                .with_priority(TaskPriority::High)
                .billable_with_budget(Money::from_major_units(48_000)),
            &engineer,
        )
        .await?;
    eyre::ensure!(task.code().as_str() == "RMC-TASK-0001", "unexpected code {}", task.code());

    harness
        .service
        .update_task(
            task.id(),
            &TaskPatch::new().with_status(TaskStatus::InProgress),
            &engineer,
        )
        .await?;
    for (delta, note) in [(40, "Ducts hung"), (35, "Dampers fitted"), (25, "Commissioned")] {
        harness
            .service
            .add_task_update(TaskUpdateDraft::new(task.id(), delta, note, engineer.clone()))
            .await?;
    }
    for level in ApprovalLevel::ALL {
        harness
            .service
            .approve_task(
                task.id(),
                level,
                ApprovalDecision::Approved,
                &actor(level.as_str())?,
                None,
            )
            .await?;
    }

    let details = harness.service.get_task_with_details(task.id()).await?;
    eyre::ensure!(
        details.task.status() == TaskStatus::Completed,
        "task should be completed"
    );
    eyre::ensure!(details.task.actual_completion_date().is_some(), "missing completion date");
    eyre::ensure!(
        details.approval_summary == ApprovalSummary::Approved,
        "approvals should all be signed off"
    );
    eyre::ensure!(details.updates.len() == 3, "expected three updates");

    let timeline = harness.service.get_task_timeline(task.id()).await?;
    let decisions = timeline
        .iter()
        .filter(|entry| matches!(entry.event, TimelineEvent::ApprovalDecided { .. }))
        .count();
    eyre::ensure!(decisions == 3, "expected three decisions, found {decisions}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_progress_leaves_no_trace(harness: Harness) -> Result<(), eyre::Report> {
    let engineer = actor("site-engineer")?;
    let task = harness
        .service
        .create_task(
            CreateTaskRequest::new(harness.site.id(), "Screed", TaskCategory::Finishing)
                .with_status(TaskStatus::InProgress)
                .with_progress(95),
            &engineer,
        )
        .await?;
    let audit_before = harness.service.audit_trail().len().await?;

    let result = harness
        .service
        .add_task_update(TaskUpdateDraft::new(task.id(), 10, "Too far", engineer))
        .await;

    eyre::ensure!(
        matches!(result, Err(TaskWorkflowError::Validation(_))),
        "expected validation failure, got {result:?}"
    );
    let reloaded = harness.service.get_task(task.id()).await?;
    eyre::ensure!(reloaded.progress().value() == 95, "progress must be unchanged");
    eyre::ensure!(
        harness.service.audit_trail().len().await? == audit_before,
        "no audit event expected"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invoice_links_accumulate_cost(harness: Harness) -> Result<(), eyre::Report> {
    let engineer = actor("quantity-surveyor")?;
    let task = harness
        .service
        .create_task(
            CreateTaskRequest::new(harness.site.id(), "Cladding", TaskCategory::Finishing),
            &engineer,
        )
        .await?;
    let invoice = harness.seed_invoice(
        "INV-0042",
        Money::from_major_units(10_000),
        Money::from_major_units(1_500),
    )?;

    let first = harness
        .service
        .link_task_to_invoice(task.id(), invoice.id(), Money::from_major_units(2_500), &engineer)
        .await?;
    harness
        .service
        .link_task_to_invoice(task.id(), invoice.id(), Money::from_major_units(500), &engineer)
        .await?;

    eyre::ensure!(
        first.balance() == Money::from_major_units(1_000),
        "balance should be billed minus paid"
    );
    let reloaded = harness.service.get_task(task.id()).await?;
    eyre::ensure!(
        reloaded.cost_to_date() == Money::from_major_units(3_000),
        "cost should include every link"
    );
    let links = harness.service.get_task_with_details(task.id()).await?.invoice_links;
    eyre::ensure!(links.len() == 2, "expected two links");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn codes_are_independent_per_site(harness: Harness) -> Result<(), eyre::Report> {
    let engineer = actor("site-engineer")?;
    let other = Site::new(SiteId::new(), "Harbor View Tower")?;
    harness.store.sites.insert(other.clone())?;

    let here = harness
        .service
        .create_task(
            CreateTaskRequest::new(harness.site.id(), "Piling", TaskCategory::Foundation),
            &engineer,
        )
        .await?;
    let there = harness
        .service
        .create_task(
            CreateTaskRequest::new(other.id(), "Piling", TaskCategory::Foundation),
            &engineer,
        )
        .await?;

    eyre::ensure!(here.code().as_str() == "RMC-TASK-0001", "first site code");
    eyre::ensure!(there.code().as_str() == "HVT-TASK-0001", "second site code");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_approval_level_is_reported(harness: Harness) -> Result<(), eyre::Report> {
    let engineer = actor("site-engineer")?;
    let task = harness
        .service
        .create_task(
            CreateTaskRequest::new(harness.site.id(), "Paint corridors", TaskCategory::Finishing)
                .with_priority(TaskPriority::Low),
            &engineer,
        )
        .await?;

    let result = harness
        .service
        .approve_task(
            task.id(),
            ApprovalLevel::SiteManager,
            ApprovalDecision::Approved,
            &actor("site-manager")?,
            None,
        )
        .await;

    let missing = result.as_ref().err().and_then(TaskWorkflowError::missing);
    eyre::ensure!(
        missing
            == Some(EntityRef::Approval {
                task_id: task.id(),
                level: ApprovalLevel::SiteManager,
            }),
        "expected missing approval, got {missing:?}"
    );
    Ok(())
}
