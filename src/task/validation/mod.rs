//! Task validation implementation.
//!
//! This module provides the individual validation rules and the composite
//! validator service.

pub mod rules;
pub mod service;

pub use service::DefaultTaskValidator;
