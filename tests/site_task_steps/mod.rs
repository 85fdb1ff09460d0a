//! Step definitions for site task behaviour scenarios.

mod given;
mod then;
mod when;
pub mod world;
