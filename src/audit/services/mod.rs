//! Audit trail services.

mod trail;

pub use trail::{AuditTrail, RetentionReport};
