//! Workflow service tests for creation, progress, approvals, invoicing and
//! archiving.

use crate::{
    audit::domain::{AuditEntityType, AuditEventType, AuditQuery},
    task::{
        domain::{
            ApprovalDecision, ApprovalLevel, ApprovalStatus, ApprovalSummary, InvoiceId, Money,
            SiteId, TaskApproval, TaskCategory, TaskId, TaskPatch, TaskPriority, TaskStatus,
            TaskUpdateDraft,
        },
        services::{CreateTaskRequest, EntityRef, TaskWorkflowError},
    },
};
use chrono::TimeDelta;
use mockable::Clock;
use rstest::rstest;

use super::support::{World, actor, world};

fn request(world: &World, name: &str) -> CreateTaskRequest {
    CreateTaskRequest::new(world.site.id(), name, TaskCategory::Structural)
}

async fn task_at(world: &World, progress: i32) -> TaskId {
    let task = world
        .service
        .create_task(
            request(world, "Cast columns")
                .with_status(TaskStatus::InProgress)
                .with_progress(progress),
            &world.actor(),
        )
        .await
        .expect("task creation");
    task.id()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_assigns_sequential_site_codes(world: World) {
    let first = world
        .service
        .create_task(request(&world, "Set out grid"), &world.actor())
        .await
        .expect("first task");
    let second = world
        .service
        .create_task(request(&world, "Excavate pits"), &world.actor())
        .await
        .expect("second task");

    assert_eq!(first.code().as_str(), "HVT-TASK-0001");
    assert_eq!(second.code().as_str(), "HVT-TASK-0002");
    assert_eq!(first.status(), TaskStatus::Planned);
    assert_eq!(first.created_at(), world.clock.utc());
    assert!(!first.is_archived());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_audits_the_new_task(world: World) {
    let task = world
        .service
        .create_task(request(&world, "Set out grid"), &world.actor())
        .await
        .expect("task creation");

    let history = world
        .service
        .audit_trail()
        .history(AuditEntityType::Task, task.id())
        .await
        .expect("history");

    assert_eq!(history.len(), 1);
    let event = history.first().expect("create event");
    assert_eq!(event.event_type(), AuditEventType::Create);
    assert_eq!(event.action(), "Created task HVT-TASK-0001");
    assert_eq!(event.site_id(), Some(world.site.id().into_inner()));
    assert!(event.old_value().is_none());
    assert!(event.new_value().is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_for_unknown_site_is_not_found(world: World) {
    let missing = SiteId::new();
    let result = world
        .service
        .create_task(
            CreateTaskRequest::new(missing, "Orphan", TaskCategory::Other),
            &world.actor(),
        )
        .await;

    assert_eq!(
        result.expect_err("missing site").missing(),
        Some(EntityRef::Site(missing))
    );
    assert_eq!(world.audit_len().await, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_create_does_not_consume_a_code(world: World) {
    let rejected = world
        .service
        .create_task(request(&world, " "), &world.actor())
        .await;
    let accepted = world
        .service
        .create_task(request(&world, "Set out grid"), &world.actor())
        .await
        .expect("valid task");

    let errors = rejected.expect_err("blank name");
    assert!(
        errors
            .validation_errors()
            .is_some_and(|fields| fields.has_field("name"))
    );
    assert_eq!(accepted.code().as_str(), "HVT-TASK-0001");
}

#[rstest]
#[case(true, TaskPriority::Low, true)]
#[case(false, TaskPriority::Critical, true)]
#[case(false, TaskPriority::Low, false)]
#[tokio::test(flavor = "multi_thread")]
async fn approvals_open_for_billable_or_urgent_work(
    world: World,
    #[case] billable: bool,
    #[case] priority: TaskPriority,
    #[case] expects_approvals: bool,
) {
    let mut shaped = request(&world, "Roof slab").with_priority(priority);
    if billable {
        shaped = shaped.billable_with_budget(Money::from_major_units(9_000));
    }
    let task = world
        .service
        .create_task(shaped, &world.actor())
        .await
        .expect("task creation");

    let approvals = world
        .service
        .get_task_approvals(task.id())
        .await
        .expect("approvals");

    if expects_approvals {
        let levels: Vec<ApprovalLevel> = approvals.iter().map(TaskApproval::level).collect();
        assert_eq!(levels, ApprovalLevel::ALL);
        assert!(
            approvals
                .iter()
                .all(|approval| approval.status() == ApprovalStatus::Pending)
        );
    } else {
        assert!(approvals.is_empty());
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn progress_update_accumulates(world: World) {
    let task_id = task_at(&world, 65).await;

    let recorded = world
        .service
        .add_task_update(
            TaskUpdateDraft::new(task_id, 15, "Columns C1-C8 poured", actor("foreman"))
                .with_manpower(9),
        )
        .await
        .expect("progress update");

    assert_eq!(recorded.update.progress_before().value(), 65);
    assert_eq!(recorded.update.progress_after().value(), 80);
    assert_eq!(recorded.task.progress().value(), 80);
    assert_eq!(recorded.task.manpower(), 9);
    assert_eq!(recorded.task.status(), TaskStatus::InProgress);

    let stored = world.service.get_task(task_id).await.expect("task");
    assert_eq!(stored.progress().value(), 80);
}

#[rstest]
#[case::overshoot(95, 10, "Overshoot")]
#[case::below_zero(5, -10, "Rework stripped formwork")]
#[tokio::test(flavor = "multi_thread")]
async fn out_of_range_progress_is_rejected_without_side_effects(
    #[case] starting_at: i32,
    #[case] delta: i32,
    #[case] note: &str,
    world: World,
) {
    let task_id = task_at(&world, starting_at).await;
    let audit_before = world.audit_len().await;

    let result = world
        .service
        .add_task_update(TaskUpdateDraft::new(task_id, delta, note, actor("foreman")))
        .await;

    let err = result.expect_err("out of range");
    assert!(
        err.validation_errors()
            .is_some_and(|fields| fields.has_field("delta"))
    );
    let details = world
        .service
        .get_task_with_details(task_id)
        .await
        .expect("details");
    assert_eq!(i32::from(details.task.progress().value()), starting_at);
    assert!(details.updates.is_empty());
    assert_eq!(world.audit_len().await, audit_before);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reaching_complete_closes_the_task(world: World) {
    let task_id = task_at(&world, 90).await;
    world.clock.advance(TimeDelta::days(3));

    let recorded = world
        .service
        .add_task_update(
            TaskUpdateDraft::new(task_id, 10, "Snagging cleared", actor("foreman"))
                .with_status_change(TaskStatus::OnHold),
        )
        .await
        .expect("progress update");

    assert_eq!(recorded.task.status(), TaskStatus::Completed);
    assert_eq!(
        recorded.task.actual_completion_date(),
        Some(world.clock.utc())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_for_unknown_task_is_not_found(world: World) {
    let missing = TaskId::new();
    let result = world
        .service
        .add_task_update(TaskUpdateDraft::new(missing, 5, "Ghost", actor("foreman")))
        .await;

    assert!(matches!(
        result,
        Err(TaskWorkflowError::NotFound(EntityRef::Task(id))) if id == missing
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn patch_to_full_progress_completes_the_task(world: World) {
    let task_id = task_at(&world, 50).await;

    let task = world
        .service
        .update_task(task_id, &TaskPatch::new().with_progress(100), &world.actor())
        .await
        .expect("update");

    assert_eq!(task.status(), TaskStatus::Completed);
    assert_eq!(task.actual_completion_date(), Some(world.clock.utc()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn patch_records_changed_fields(world: World) {
    let task_id = task_at(&world, 10).await;

    world
        .service
        .update_task(
            task_id,
            &TaskPatch::new().with_name("Cast level 2 columns").with_manpower(5),
            &world.actor(),
        )
        .await
        .expect("update");

    let updates = world
        .service
        .audit_trail()
        .query(
            &AuditQuery::for_entity(AuditEntityType::Task, task_id)
                .with_event_type(AuditEventType::Update),
        )
        .await
        .expect("query");
    let event = updates.first().expect("update event");
    let changed = event.metadata().get("changed_fields").expect("changed");
    assert_eq!(changed, &serde_json::json!(["manpower", "name"]));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_patch_changes_nothing(world: World) {
    let task_id = task_at(&world, 10).await;
    let audit_before = world.audit_len().await;
    world.clock.advance(TimeDelta::minutes(5));

    let task = world
        .service
        .update_task(task_id, &TaskPatch::new(), &world.actor())
        .await
        .expect("no-op update");

    assert_eq!(task.updated_at(), task.created_at());
    assert_eq!(world.audit_len().await, audit_before);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approval_decision_is_recorded_and_audited(world: World) {
    let task = world
        .service
        .create_task(
            request(&world, "Transfer slab").billable_with_budget(Money::from_major_units(40_000)),
            &world.actor(),
        )
        .await
        .expect("task creation");
    let manager = actor("site-manager");

    let approval = world
        .service
        .approve_task(
            task.id(),
            ApprovalLevel::SiteManager,
            ApprovalDecision::Rejected,
            &manager,
            Some("Rebar spacing off".to_owned()),
        )
        .await
        .expect("decision");

    assert_eq!(approval.status(), ApprovalStatus::Rejected);
    assert_eq!(approval.approver(), Some(&manager));
    assert_eq!(approval.remark(), Some("Rebar spacing off"));
    assert_eq!(
        world
            .service
            .approval_summary(task.id())
            .await
            .expect("summary"),
        ApprovalSummary::Rejected
    );

    let events = world
        .service
        .audit_trail()
        .query(&AuditQuery::new().with_event_type(AuditEventType::Rejected))
        .await
        .expect("query");
    let event = events.first().expect("rejection event");
    assert_eq!(event.entity_id(), approval.id().into_inner());
    assert_eq!(event.actor(), &manager);
    assert_eq!(event.site_id(), Some(world.site.id().into_inner()));
}

#[rstest]
#[case::approved(ApprovalDecision::Approved)]
#[case::rejected(ApprovalDecision::Rejected)]
#[tokio::test(flavor = "multi_thread")]
async fn deciding_without_a_pending_record_is_not_found(
    #[case] decision: ApprovalDecision,
    world: World,
) {
    let task_id = task_at(&world, 0).await;
    let audit_before = world.audit_len().await;

    let result = world
        .service
        .approve_task(
            task_id,
            ApprovalLevel::SiteManager,
            decision,
            &actor("site-manager"),
            None,
        )
        .await;

    assert_eq!(
        result.expect_err("no approval").missing(),
        Some(EntityRef::Approval {
            task_id,
            level: ApprovalLevel::SiteManager,
        })
    );
    assert_eq!(world.audit_len().await, audit_before);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invoice_link_captures_balance_and_cost(world: World) {
    let task_id = task_at(&world, 30).await;
    let invoice = world.seed_invoice("INV-2024-031", 10_000, 1_500);

    let link = world
        .service
        .link_task_to_invoice(
            task_id,
            invoice.id(),
            Money::from_major_units(2_500),
            &world.actor(),
        )
        .await
        .expect("link");

    assert_eq!(link.amount_paid(), Money::from_major_units(1_500));
    assert_eq!(link.balance(), Money::from_major_units(1_000));
    let task = world.service.get_task(task_id).await.expect("task");
    assert_eq!(task.cost_to_date(), Money::from_major_units(2_500));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invoice_link_checks_task_then_invoice_then_amount(world: World) {
    let task_id = task_at(&world, 30).await;
    let invoice = world.seed_invoice("INV-2024-032", 500, 0);
    let missing_task = TaskId::new();
    let missing_invoice = InvoiceId::new();

    let no_task = world
        .service
        .link_task_to_invoice(missing_task, missing_invoice, Money::ZERO, &world.actor())
        .await;
    let no_invoice = world
        .service
        .link_task_to_invoice(task_id, missing_invoice, Money::ZERO, &world.actor())
        .await;
    let bad_amount = world
        .service
        .link_task_to_invoice(task_id, invoice.id(), Money::ZERO, &world.actor())
        .await;

    assert_eq!(
        no_task.expect_err("task").missing(),
        Some(EntityRef::Task(missing_task))
    );
    assert_eq!(
        no_invoice.expect_err("invoice").missing(),
        Some(EntityRef::Invoice(missing_invoice))
    );
    assert!(
        bad_amount
            .expect_err("amount")
            .validation_errors()
            .is_some_and(|fields| fields.has_field("amount_billed"))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archived_tasks_leave_listings_but_stay_readable(world: World) {
    let task_id = task_at(&world, 20).await;
    task_at(&world, 40).await;

    let archived = world
        .service
        .archive_task(task_id, &world.actor())
        .await
        .expect("archive");
    let listed = world
        .service
        .get_tasks_by_site(world.site.id(), false)
        .await
        .expect("listing");
    let all = world
        .service
        .get_tasks_by_site(world.site.id(), true)
        .await
        .expect("full listing");

    assert!(archived.is_archived());
    assert_eq!(listed.len(), 1);
    assert!(listed.iter().all(|task| task.id() != task_id));
    assert_eq!(all.len(), 2);
    assert!(world.service.get_task(task_id).await.is_ok());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archive_state_changes_must_alternate(world: World) {
    let task_id = task_at(&world, 20).await;

    let restore_live = world.service.restore_task(task_id, &world.actor()).await;
    world
        .service
        .archive_task(task_id, &world.actor())
        .await
        .expect("archive");
    let archive_again = world.service.archive_task(task_id, &world.actor()).await;
    let restored = world
        .service
        .restore_task(task_id, &world.actor())
        .await
        .expect("restore");

    assert!(matches!(
        restore_live,
        Err(TaskWorkflowError::StateConflict { .. })
    ));
    assert!(matches!(
        archive_again,
        Err(TaskWorkflowError::StateConflict { .. })
    ));
    assert!(!restored.is_archived());

    let history = world
        .service
        .audit_trail()
        .history(AuditEntityType::Task, task_id)
        .await
        .expect("history");
    let kinds: Vec<AuditEventType> = history.iter().map(|event| event.event_type()).collect();
    assert_eq!(
        kinds,
        [
            AuditEventType::Restore,
            AuditEventType::Archive,
            AuditEventType::Create,
        ]
    );
}
