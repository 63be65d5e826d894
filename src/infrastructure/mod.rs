//! Infrastructure layer - external adapters and integrations.
//!
//! This layer provides adapters for:
//! - Storage of the deprecation log (sharded maps)
//! - Log sinks (tracing)
//! - Tracing integration (`Filter` and `Layer` traits)

pub mod layer;
pub mod sink;
pub mod storage;
pub(crate) mod visitor;

/// Mock implementations for testing.
///
/// This module is only available when the `test-helpers` feature is enabled,
/// or during test builds.
///
/// To use these mocks in integration tests, add to your `Cargo.toml`:
/// ```toml
/// [dev-dependencies]
/// deprecation-workflow = { version = "*", features = ["test-helpers"] }
/// ```
#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;
