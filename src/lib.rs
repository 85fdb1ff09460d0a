//! Foreman: construction-site task workflow engine.
//!
//! This crate tracks site work through its progress and status lifecycle,
//! gates important tasks behind multi-level approvals, links billed work to
//! invoices, and keeps an append-only audit trail of every mutation.
//!
//! # Architecture
//!
//! Foreman follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, progress updates, approvals and invoice links
//! - [`audit`]: Append-only audit trail with retention and compaction
//! - [`actor`]: Opaque actor identifiers supplied by the identity provider
//! - [`config`]: Workflow configuration loading

pub mod actor;
pub mod audit;
pub mod config;
pub mod task;

#[cfg(test)]
mod testing;
