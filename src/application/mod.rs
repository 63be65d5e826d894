//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the domain types at runtime:
//! - Matcher (first matching rule)
//! - Dispatcher (handler effects and error signalling)
//! - Deprecation log (deduplicating accumulation)
//! - Workflow engine (owned configuration and inbound API)
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters must implement. This keeps the application layer independent
//! from infrastructure details.

pub mod dispatcher;
pub mod log;
pub mod matcher;
pub mod metrics;
pub mod ports;
pub mod workflow;
