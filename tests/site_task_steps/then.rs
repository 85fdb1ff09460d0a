//! Then steps for site task BDD scenarios.

use super::world::{SiteTaskWorld, run_async};
use foreman::{
    audit::domain::{AuditEntityType, AuditQuery},
    task::{
        domain::{ApprovalLevel, ApprovalStatus, ApprovalSummary, Money, TaskStatus},
        services::{EntityRef, TaskWorkflowError},
    },
};
use rstest_bdd_macros::then;

#[then(r#"the task code is "{code}""#)]
fn task_code_is(world: &SiteTaskWorld, code: String) -> Result<(), eyre::Report> {
    let task = world.task()?;
    eyre::ensure!(
        task.code().as_str() == code,
        "expected code {code}, found {}",
        task.code()
    );
    Ok(())
}

#[then("the task progress is {progress:u8}")]
fn task_progress_is(world: &SiteTaskWorld, progress: u8) -> Result<(), eyre::Report> {
    let task = world.reload_task()?;
    eyre::ensure!(
        task.progress().value() == progress,
        "expected progress {progress}, found {}",
        task.progress()
    );
    Ok(())
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &SiteTaskWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world.reload_task()?;
    eyre::ensure!(
        task.status() == expected,
        "expected status {expected}, found {}",
        task.status()
    );
    Ok(())
}

#[then("the task has a completion date")]
fn task_has_completion_date(world: &SiteTaskWorld) -> Result<(), eyre::Report> {
    let task = world.reload_task()?;
    eyre::ensure!(
        task.actual_completion_date().is_some(),
        "completed task should carry a completion date"
    );
    Ok(())
}

#[then(r#"the operation is rejected on field "{field}""#)]
fn rejected_on_field(world: &SiteTaskWorld, field: String) -> Result<(), eyre::Report> {
    let errors = world
        .last_error
        .as_ref()
        .and_then(TaskWorkflowError::validation_errors)
        .ok_or_else(|| eyre::eyre!("expected a validation error, got {:?}", world.last_error))?;
    eyre::ensure!(
        errors.has_field(&field),
        "expected an error on {field}, got {errors}"
    );
    Ok(())
}

#[then("the task has {count:usize} pending approvals")]
fn pending_approvals(world: &SiteTaskWorld, count: usize) -> Result<(), eyre::Report> {
    let approvals = run_async(world.service.get_task_approvals(world.task()?.id()))?;
    let pending = approvals
        .iter()
        .filter(|approval| approval.status() == ApprovalStatus::Pending)
        .count();
    eyre::ensure!(pending == count, "expected {count} pending, found {pending}");
    Ok(())
}

#[then(r#"the approval summary is "{summary}""#)]
fn approval_summary_is(world: &SiteTaskWorld, summary: String) -> Result<(), eyre::Report> {
    let expected = match summary.as_str() {
        "not_required" => ApprovalSummary::NotRequired,
        "pending" => ApprovalSummary::Pending,
        "approved" => ApprovalSummary::Approved,
        "rejected" => ApprovalSummary::Rejected,
        other => return Err(eyre::eyre!("unknown summary in scenario: {other}")),
    };
    let actual = run_async(world.service.approval_summary(world.task()?.id()))?;
    eyre::ensure!(
        actual == expected,
        "expected summary {expected:?}, found {actual:?}"
    );
    Ok(())
}

#[then("the operation fails because the approval is missing")]
fn approval_missing(world: &SiteTaskWorld) -> Result<(), eyre::Report> {
    let missing = world.last_error.as_ref().and_then(TaskWorkflowError::missing);
    eyre::ensure!(
        matches!(
            missing,
            Some(EntityRef::Approval {
                level: ApprovalLevel::SiteManager,
                ..
            })
        ),
        "expected a missing approval, got {:?}",
        world.last_error
    );
    Ok(())
}

#[then("no approval audit event is recorded")]
fn no_approval_audit(world: &SiteTaskWorld) -> Result<(), eyre::Report> {
    let events = run_async(
        world
            .service
            .audit_trail()
            .query(&AuditQuery::new().with_entity_type(AuditEntityType::TaskApproval)),
    )?;
    eyre::ensure!(events.is_empty(), "unexpected approval events {events:?}");
    Ok(())
}

#[then("the link balance is {balance:i64}")]
fn link_balance_is(world: &SiteTaskWorld, balance: i64) -> Result<(), eyre::Report> {
    let link = world
        .last_link
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing invoice link in scenario world"))?;
    eyre::ensure!(
        link.balance() == Money::from_major_units(balance),
        "expected balance {balance}, found {}",
        link.balance()
    );
    Ok(())
}

#[then("the task cost to date is {cost:i64}")]
fn task_cost_is(world: &SiteTaskWorld, cost: i64) -> Result<(), eyre::Report> {
    let task = world.reload_task()?;
    eyre::ensure!(
        task.cost_to_date() == Money::from_major_units(cost),
        "expected cost {cost}, found {}",
        task.cost_to_date()
    );
    Ok(())
}
