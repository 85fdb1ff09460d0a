//! Site task workflow.
//!
//! Tasks belong to a site and carry a per-site code such as
//! `HVT-TASK-0001`. Work is tracked through signed progress updates, billable
//! and urgent tasks pass through a three-level approval workflow, and billed
//! work is linked to invoices. Every mutation is recorded in the
//! [`crate::audit`] trail. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Validation rules in [`validation`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod validation;

#[cfg(test)]
mod tests;
