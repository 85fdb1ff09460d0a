//! Behaviour tests for site task progress, approvals and invoicing.

#[path = "site_task_steps/mod.rs"]
mod site_task_steps_defs;

use rstest_bdd_macros::scenario;
use site_task_steps_defs::world::{SiteTaskWorld, world};

#[scenario(
    path = "tests/features/task_progress.feature",
    name = "Task codes follow the site initials"
)]
#[tokio::test(flavor = "multi_thread")]
async fn task_codes_follow_site_initials(world: SiteTaskWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_progress.feature",
    name = "Progress accumulates from signed deltas"
)]
#[tokio::test(flavor = "multi_thread")]
async fn progress_accumulates(world: SiteTaskWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_progress.feature",
    name = "Progress beyond completion is rejected"
)]
#[tokio::test(flavor = "multi_thread")]
async fn progress_beyond_completion_is_rejected(world: SiteTaskWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_progress.feature",
    name = "Reaching full progress completes the task"
)]
#[tokio::test(flavor = "multi_thread")]
async fn full_progress_completes_task(world: SiteTaskWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_approvals.feature",
    name = "Billable tasks open one pending approval per level"
)]
#[tokio::test(flavor = "multi_thread")]
async fn billable_tasks_open_approvals(world: SiteTaskWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_approvals.feature",
    name = "Rejecting one level rejects the task"
)]
#[tokio::test(flavor = "multi_thread")]
async fn rejecting_one_level_rejects_task(world: SiteTaskWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_approvals.feature",
    name = "Rejecting a level that was never opened fails"
)]
#[tokio::test(flavor = "multi_thread")]
async fn rejecting_unopened_level_fails(world: SiteTaskWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_approvals.feature",
    name = "Invoice links record the outstanding balance"
)]
#[tokio::test(flavor = "multi_thread")]
async fn invoice_links_record_balance(world: SiteTaskWorld) {
    let _ = world;
}
