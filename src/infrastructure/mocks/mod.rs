//! Mock implementations for testing.
//!
//! Test doubles for the log sink and for downstream tracing layers.

pub mod layer;
pub mod sink;

pub use layer::MockCaptureLayer;
pub use sink::RecordingSink;
