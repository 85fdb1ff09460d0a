//! Port contracts for site task workflow management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod records;
pub mod reference;
pub mod repository;
pub mod validator;

pub use records::{TaskApprovalRepository, TaskInvoiceLinkRepository, TaskUpdateRepository};
pub use reference::{InvoiceRepository, SiteRepository, TaskCodeSequence};
pub use repository::{RepositoryError, RepositoryResult, TaskRepository};
pub use validator::{TaskValidator, ValidationResult};
