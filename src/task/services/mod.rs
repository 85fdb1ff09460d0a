//! Application services for the task workflow.
//!
//! [`TaskWorkflowService`] is split across files by concern; each file adds
//! an `impl` block to the same service.

mod approval;
mod archive;
mod error;
mod invoice;
mod progress;
mod queries;
mod requests;
mod workflow;

pub use error::{EntityRef, TaskWorkflowError, TaskWorkflowResult};
pub use requests::{CreateTaskRequest, ProgressRecorded};
pub use workflow::{TaskWorkflowService, WorkflowPorts};
