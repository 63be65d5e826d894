//! # deprecation-workflow
//!
//! Rule-based handling of deprecation notices.
//!
//! A host fires deprecations (a message plus optional `id`, `since`, `until`
//! and `for` metadata). Each one is matched against an ordered list of rules
//! and routed to a handler:
//!
//! - **silence**: swallow it
//! - **log**: write `DEPRECATION: <message>` to the log sink
//! - **throw**: fail the firing call with a [`DeprecationError`]
//!
//! Deprecations no rule matches are collected. At any point the collection can
//! be flushed into a configuration block that silences everything seen so
//! far, which makes it easy to adopt a new framework version, paste the block,
//! and then work through the list.
//!
//! ## Quick Start
//!
//! ```rust
//! use deprecation_workflow::{DeprecationOptions, DeprecationWorkflow, Rule, WorkflowConfig};
//!
//! let workflow = DeprecationWorkflow::builder()
//!     .with_config(WorkflowConfig::new(vec![
//!         Rule::silence_id("ember-routing.route-router"),
//!         Rule::log_pattern("^Using the global").unwrap(),
//!         Rule::throw_message("Calling set() on a destroyed object"),
//!     ]))
//!     .build()
//!     .unwrap();
//!
//! workflow
//!     .deprecate("First deprecation", false, DeprecationOptions::with_id("first"))
//!     .unwrap();
//! workflow
//!     .deprecate("Second deprecation", false, DeprecationOptions::with_id("second"))
//!     .unwrap();
//!
//! assert_eq!(
//!     workflow.flush_deprecations(),
//!     r#"self.deprecationWorkflow = self.deprecationWorkflow || {};
//! self.deprecationWorkflow.config = {
//!   workflow: [
//!     { handler: "silence", matchId: "first" },
//!     { handler: "silence", matchId: "second" }
//!   ]
//! };"#
//! );
//! ```
//!
//! ## Rule Precedence
//!
//! Rules are evaluated in declaration order and the **first match wins**. A
//! rule matches when its `match_id` equals the deprecation's identifier, or
//! when its message matcher accepts the message:
//!
//! - [`MessageMatcher::Literal`] compares by exact equality. A literal is
//!   never compiled as a regex, so `"foo() is deprecated"` matches only that
//!   exact text.
//! - [`MessageMatcher::Pattern`] searches the message with a regex.
//!
//! ## Unhandled Deprecations
//!
//! A deprecation no rule matches is recorded in the deprecation log under its
//! identifier (or [`DEFAULT_DEPRECATION_ID`] when it has none). Recording is
//! idempotent: firing the same deprecation in a loop keeps a single entry.
//!
//! It then fails the call with [`DeprecationError::Unhandled`] when either
//! `throw_on_unhandled` is set in the configuration or the host's global
//! raise-on-deprecation flag is set
//! ([`DeprecationWorkflow::set_raise_on_deprecation`]). A matching `silence`
//! or `log` rule always wins over the host flag.
//!
//! ## Configuration
//!
//! Configurations are replaced wholesale with
//! [`DeprecationWorkflow::set_config`] and can be loaded from JSON:
//!
//! ```rust
//! use deprecation_workflow::WorkflowConfig;
//!
//! let config = WorkflowConfig::from_json(r#"{
//!     "throwOnUnhandled": true,
//!     "workflow": [
//!         { "handler": "silence", "matchMessage": "Sshhhhh!!" },
//!         { "handler": "log", "matchMessage": { "pattern": "Inter" } }
//!     ]
//! }"#).unwrap();
//! # assert_eq!(config.workflow().len(), 2);
//! ```
//!
//! ## Tracing Integration
//!
//! [`DeprecationLayer`] turns `tracing` events on the `deprecation` target
//! into deprecations, and as a per-layer filter keeps handled ones out of the
//! host's output:
//!
//! ```rust,no_run
//! use deprecation_workflow::{DeprecationLayer, DeprecationWorkflow};
//! use std::sync::Arc;
//! use tracing_subscriber::prelude::*;
//!
//! let workflow = Arc::new(DeprecationWorkflow::new());
//! let deprecations = DeprecationLayer::new(workflow.clone());
//!
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer().with_filter(deprecations))
//!     .init();
//!
//! tracing::warn!(target: "deprecation", id = "old-api", "old_api() is deprecated");
//! println!("{}", workflow.flush_deprecations());
//! ```
//!
//! ## Observability
//!
//! [`DeprecationWorkflow::metrics`] counts silenced, logged, thrown, unhandled
//! and raised deprecations, and [`DeprecationLog::entries`] exposes the
//! recorded metadata with an occurrence count per identifier.

// Domain layer - pure business logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    config::{ConfigError, WorkflowConfig},
    event::{DeprecationEvent, DeprecationOptions},
    report::WorkflowReport,
    rule::{Handler, MessageMatcher, Rule},
};

pub use application::{
    dispatcher::{DeprecationError, Dispatcher, Disposition, LOG_PREFIX},
    log::{DeprecationLog, LogEntry},
    matcher::resolve,
    metrics::{Metrics, MetricsSnapshot},
    ports::{LogSink, Storage},
    workflow::{BuildError, DeprecationWorkflow, DeprecationWorkflowBuilder, DEFAULT_DEPRECATION_ID},
};

pub use infrastructure::{
    layer::{DeprecationLayer, DeprecationLayerBuilder, DEFAULT_TARGET},
    sink::{StderrSink, TracingSink},
    storage::ShardedStorage,
};
