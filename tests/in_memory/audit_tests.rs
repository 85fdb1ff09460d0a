//! Audit trail integration tests: history queries, capacity and retention.

use super::helpers::{Harness, actor, harness};
use foreman::{
    audit::domain::{AuditEntityType, AuditEvent, AuditEventType, AuditQuery},
    config::{AuditConfig, WorkflowConfig},
    task::{
        domain::{Money, TaskCategory, TaskUpdateDraft},
        services::CreateTaskRequest,
    },
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_mutation_is_attributed(harness: Harness) -> Result<(), eyre::Report> {
    let engineer = actor("site-engineer")?;
    let crew_lead = actor("crew-lead")?;
    let task = harness
        .service
        .create_task(
            CreateTaskRequest::new(harness.site.id(), "Drylining", TaskCategory::Finishing),
            &engineer,
        )
        .await?;
    harness
        .service
        .add_task_update(TaskUpdateDraft::new(task.id(), 20, "Level 1 boarded", crew_lead.clone()))
        .await?;
    harness.service.archive_task(task.id(), &engineer).await?;

    let by_crew_lead = harness
        .service
        .audit_trail()
        .query(&AuditQuery::new().by_actor(crew_lead))
        .await?;
    let for_site = harness
        .service
        .audit_trail()
        .query(&AuditQuery::new().for_site(harness.site.id()))
        .await?;

    eyre::ensure!(by_crew_lead.len() == 1, "crew lead recorded one update");
    let update = by_crew_lead
        .first()
        .ok_or_else(|| eyre::eyre!("missing update event"))?;
    eyre::ensure!(
        update.entity_type() == AuditEntityType::TaskUpdate,
        "update event should describe the progress record"
    );
    eyre::ensure!(for_site.len() == 3, "expected three site events");
    let newest = for_site
        .first()
        .ok_or_else(|| eyre::eyre!("missing newest event"))?;
    eyre::ensure!(
        newest.event_type() == AuditEventType::Archive,
        "newest event should be the archive"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ring_buffer_keeps_the_newest_events() -> Result<(), eyre::Report> {
    let config = WorkflowConfig {
        audit: AuditConfig {
            capacity: 2,
            ..AuditConfig::default()
        },
        ..WorkflowConfig::default()
    };
    let harness = Harness::with_config(&config)?;
    let engineer = actor("site-engineer")?;

    for name in ["Set out", "Excavate", "Blind"] {
        harness
            .service
            .create_task(
                CreateTaskRequest::new(harness.site.id(), name, TaskCategory::Excavation),
                &engineer,
            )
            .await?;
    }

    let events = harness.service.audit_trail().query(&AuditQuery::new()).await?;
    let actions: Vec<&str> = events.iter().map(AuditEvent::action).collect();
    eyre::ensure!(
        actions == ["Created task RMC-TASK-0003", "Created task RMC-TASK-0002"],
        "unexpected retained events {actions:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_keeps_recent_events(harness: Harness) -> Result<(), eyre::Report> {
    let engineer = actor("site-engineer")?;
    let task = harness
        .service
        .create_task(
            CreateTaskRequest::new(harness.site.id(), "Kerbs", TaskCategory::SitePreparation)
                .billable_with_budget(Money::from_major_units(1_200)),
            &engineer,
        )
        .await?;

    let report = harness.service.start().await?;

    eyre::ensure!(report.total() == 0, "nothing should be purged");
    let history = harness
        .service
        .audit_trail()
        .history(AuditEntityType::Task, task.id())
        .await?;
    eyre::ensure!(history.len() == 1, "creation event should survive");
    Ok(())
}
