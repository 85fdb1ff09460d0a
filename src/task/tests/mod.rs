//! Unit tests for the site task workflow.

mod service_tests;
mod support;
