//! Append-only audit trail for workflow mutations.
//!
//! Every change the task workflow makes is recorded as an [`domain::AuditEvent`]
//! naming the record, the actor and the before/after state. Recording is
//! best-effort: a failing log is reported through `tracing` and never undoes
//! the change it describes.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The recording service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
