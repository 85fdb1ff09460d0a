//! When steps for site task BDD scenarios.

use super::world::{SiteTaskWorld, run_async};
use foreman::{
    actor::ActorId,
    task::domain::{ApprovalDecision, ApprovalLevel, Money, TaskUpdateDraft},
};
use rstest_bdd_macros::when;

#[when(r#"a progress update of {delta:i32} is recorded with note "{note}""#)]
fn record_progress(world: &mut SiteTaskWorld, delta: i32, note: String) -> Result<(), eyre::Report> {
    let draft = TaskUpdateDraft::new(world.task()?.id(), delta, note, ActorId::new("foreman")?);
    match run_async(world.service.add_task_update(draft)) {
        Ok(recorded) => world.task = Some(recorded.task),
        Err(err) => world.last_error = Some(err),
    }
    Ok(())
}

#[when(r#"the "{level}" level is {decision} by "{approver}""#)]
fn decide_level(
    world: &mut SiteTaskWorld,
    level: String,
    decision: String,
    approver: String,
) -> Result<(), eyre::Report> {
    let parsed_level = ApprovalLevel::try_from(level.as_str())
        .map_err(|err| eyre::eyre!("invalid level in scenario: {err}"))?;
    let chosen = match decision.as_str() {
        "approved" => ApprovalDecision::Approved,
        "rejected" => ApprovalDecision::Rejected,
        other => return Err(eyre::eyre!("unknown decision in scenario: {other}")),
    };
    let result = run_async(world.service.approve_task(
        world.task()?.id(),
        parsed_level,
        chosen,
        &ActorId::new(approver)?,
        None,
    ));
    if let Err(err) = result {
        world.last_error = Some(err);
    }
    Ok(())
}

#[when("{amount:i64} is billed against the invoice")]
fn bill_invoice(world: &mut SiteTaskWorld, amount: i64) -> Result<(), eyre::Report> {
    let invoice_id = world
        .invoice
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing invoice in scenario world"))?
        .id();
    let link = run_async(world.service.link_task_to_invoice(
        world.task()?.id(),
        invoice_id,
        Money::from_major_units(amount),
        &ActorId::new("quantity-surveyor")?,
    ))?;
    world.last_link = Some(link);
    Ok(())
}
