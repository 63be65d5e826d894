//! Domain layer - pure business logic with no knowledge of tracing or storage.
//!
//! This layer contains the core concepts of the deprecation workflow:
//! - Deprecation events and their metadata
//! - Rules pairing a matcher with a handler
//! - Workflow configuration
//! - The report format for collected deprecations

pub mod config;
pub mod event;
pub mod report;
pub mod rule;
