//! Given steps for site task BDD scenarios.

use super::world::{SiteTaskWorld, run_async};
use eyre::WrapErr;
use foreman::{
    actor::ActorId,
    task::{
        domain::{Invoice, InvoiceId, Money, Site, SiteId, TaskCategory, TaskStatus},
        services::CreateTaskRequest,
    },
};
use rstest_bdd_macros::given;

#[given(r#"a site named "{name}""#)]
fn site_named(world: &mut SiteTaskWorld, name: String) -> Result<(), eyre::Report> {
    let site = Site::new(SiteId::new(), name)?;
    world.store.sites.insert(site.clone())?;
    world.site = Some(site);
    Ok(())
}

#[given(r#"a task "{name}" at {progress:i32} percent progress"#)]
fn task_at_progress(
    world: &mut SiteTaskWorld,
    name: String,
    progress: i32,
) -> Result<(), eyre::Report> {
    let status = if progress > 0 {
        TaskStatus::InProgress
    } else {
        TaskStatus::Planned
    };
    let request = CreateTaskRequest::new(world.site()?.id(), name, TaskCategory::Structural)
        .with_status(status)
        .with_progress(progress);
    let task = run_async(
        world
            .service
            .create_task(request, &ActorId::new("site-engineer")?),
    )
    .wrap_err("create task for scenario")?;
    world.task = Some(task);
    Ok(())
}

#[given(r#"a billable task "{name}" with budget {budget:i64}"#)]
fn billable_task(world: &mut SiteTaskWorld, name: String, budget: i64) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(world.site()?.id(), name, TaskCategory::Structural)
        .billable_with_budget(Money::from_major_units(budget));
    let task = run_async(
        world
            .service
            .create_task(request, &ActorId::new("site-engineer")?),
    )
    .wrap_err("create billable task for scenario")?;
    world.task = Some(task);
    Ok(())
}

#[given(r#"an invoice "{number}" of {total:i64} with {paid:i64} paid"#)]
fn invoice_with_payment(
    world: &mut SiteTaskWorld,
    number: String,
    total: i64,
    paid: i64,
) -> Result<(), eyre::Report> {
    let invoice = Invoice::new(
        InvoiceId::new(),
        world.site()?.id(),
        number,
        Money::from_major_units(total),
        Money::from_major_units(paid),
    )?;
    world.store.invoices.insert(invoice.clone())?;
    world.invoice = Some(invoice);
    Ok(())
}
