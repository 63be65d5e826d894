//! Handler execution for resolved deprecations.
//!
//! Given the rule the matcher picked (or none), the dispatcher performs the
//! handler's effect:
//!
//! | Resolution        | Effect                                                   |
//! |-------------------|----------------------------------------------------------|
//! | `silence`         | nothing, even when the host raise flag is set            |
//! | `log`             | one sink line `DEPRECATION: <message>`                   |
//! | `throw`           | `DeprecationError::Thrown`, not recorded                 |
//! | no match          | recorded; `DeprecationError::Unhandled` if raising       |
//!
//! "Raising" means either `throw_on_unhandled` in the configuration or the
//! host's global raise-on-deprecation flag.

use crate::application::log::{DeprecationLog, LogEntry};
use crate::application::metrics::Metrics;
use crate::application::ports::{LogSink, Storage};
use crate::domain::{
    config::WorkflowConfig,
    event::DeprecationEvent,
    rule::{Handler, Rule},
};
use std::sync::Arc;

/// Prefix of every line written by a `log` handler.
pub const LOG_PREFIX: &str = "DEPRECATION: ";

/// How a dispatched deprecation was handled, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// A `silence` rule swallowed it
    Silenced,
    /// A `log` rule wrote it to the sink
    Logged,
    /// No rule matched; it was recorded in the deprecation log
    Unhandled,
}

/// Error returned when a deprecation must fail the firing call.
///
/// Displays as the original deprecation message so callers can assert on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeprecationError {
    /// No rule matched and unhandled deprecations raise
    #[error("{message}")]
    Unhandled { message: String, id: Option<String> },
    /// A `throw` rule matched
    #[error("{message}")]
    Thrown { message: String, id: Option<String> },
}

impl DeprecationError {
    /// The deprecation message that caused the error.
    pub fn message(&self) -> &str {
        match self {
            DeprecationError::Unhandled { message, .. } | DeprecationError::Thrown { message, .. } => {
                message
            }
        }
    }

    /// The deprecation identifier, if the event carried one.
    pub fn id(&self) -> Option<&str> {
        match self {
            DeprecationError::Unhandled { id, .. } | DeprecationError::Thrown { id, .. } => {
                id.as_deref()
            }
        }
    }

    pub fn is_unhandled(&self) -> bool {
        matches!(self, DeprecationError::Unhandled { .. })
    }
}

/// Executes handlers and records unmatched deprecations.
#[derive(Debug, Clone)]
pub struct Dispatcher<S>
where
    S: Storage<String, LogEntry> + Clone,
{
    sink: Arc<dyn LogSink>,
    log: DeprecationLog<S>,
    metrics: Metrics,
}

impl<S> Dispatcher<S>
where
    S: Storage<String, LogEntry> + Clone,
{
    pub fn new(sink: Arc<dyn LogSink>, log: DeprecationLog<S>, metrics: Metrics) -> Self {
        Self { sink, log, metrics }
    }

    /// Run the effect for `event` given the rule it resolved to.
    ///
    /// # Arguments
    /// * `matched` - The first matching rule, if any
    /// * `config` - Current configuration (for `throw_on_unhandled`)
    /// * `raise_on_deprecation` - The host's global raise flag
    /// * `default_id` - Identifier to record id-less events under
    ///
    /// # Errors
    /// `Thrown` for a matched `throw` rule; `Unhandled` for an unmatched event
    /// while raising is enabled. An unhandled event is recorded before the
    /// error is returned.
    pub fn dispatch(
        &self,
        event: &DeprecationEvent,
        matched: Option<&Rule>,
        config: &WorkflowConfig,
        raise_on_deprecation: bool,
        default_id: &str,
    ) -> Result<Disposition, DeprecationError> {
        let Some(rule) = matched else {
            return self.dispatch_unhandled(event, config, raise_on_deprecation, default_id);
        };

        match rule.handler() {
            Handler::Silence => {
                tracing::debug!(target: "deprecation_workflow", id = event.id(), "silenced deprecation");
                self.metrics.record(Disposition::Silenced);
                Ok(Disposition::Silenced)
            }
            Handler::Log => {
                tracing::debug!(target: "deprecation_workflow", id = event.id(), "logging deprecation");
                self.metrics.record(Disposition::Logged);
                self.sink.warn(&format!("{}{}", LOG_PREFIX, event.message()));
                Ok(Disposition::Logged)
            }
            Handler::Throw => {
                tracing::debug!(target: "deprecation_workflow", id = event.id(), "throwing deprecation");
                self.metrics.record_thrown();
                Err(DeprecationError::Thrown {
                    message: event.message().to_string(),
                    id: event.id().map(str::to_string),
                })
            }
        }
    }

    fn dispatch_unhandled(
        &self,
        event: &DeprecationEvent,
        config: &WorkflowConfig,
        raise_on_deprecation: bool,
        default_id: &str,
    ) -> Result<Disposition, DeprecationError> {
        let id = event.id_or(default_id);
        let first_seen = self.log.record(id, event);
        let raise = config.throw_on_unhandled() || raise_on_deprecation;

        tracing::debug!(
            target: "deprecation_workflow",
            id,
            first_seen,
            raise,
            "unhandled deprecation"
        );

        if raise {
            self.metrics.record_raised();
            return Err(DeprecationError::Unhandled {
                message: event.message().to_string(),
                id: event.id().map(str::to_string),
            });
        }

        self.metrics.record(Disposition::Unhandled);
        Ok(Disposition::Unhandled)
    }

    pub fn log(&self) -> &DeprecationLog<S> {
        &self.log
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
