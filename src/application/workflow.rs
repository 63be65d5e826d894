//! The deprecation workflow engine.
//!
//! [`DeprecationWorkflow`] owns everything a host needs: the swappable
//! configuration, the host's raise-on-deprecation flag, the log sink and the
//! deprecation log. Hosts hold an instance (usually in an `Arc`) and call
//! [`DeprecationWorkflow::deprecate`] wherever they would fire a deprecation.

use crate::application::dispatcher::{DeprecationError, Dispatcher, Disposition};
use crate::application::log::{DeprecationLog, LogEntry};
use crate::application::matcher;
use crate::application::metrics::Metrics;
use crate::application::ports::{LogSink, Storage};
use crate::domain::{
    config::WorkflowConfig,
    event::{DeprecationEvent, DeprecationOptions},
    rule::Handler,
};
use crate::infrastructure::sink::TracingSink;
use crate::infrastructure::storage::ShardedStorage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Identifier used for deprecations fired without one.
///
/// Id-less events are matched against `matchId` rules and recorded in the log
/// under this identifier.
pub const DEFAULT_DEPRECATION_ID: &str = "deprecation-workflow.unidentified";

/// Error returned when building a `DeprecationWorkflow` fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// The identifier for id-less deprecations must not be empty
    #[error("default deprecation id must not be empty")]
    EmptyDefaultId,
    /// The tracing target intercepted as deprecations must not be empty
    #[error("deprecation layer target must not be empty")]
    EmptyTarget,
}

/// Builder for constructing a `DeprecationWorkflow`.
#[derive(Debug)]
pub struct DeprecationWorkflowBuilder<S = Arc<ShardedStorage<String, LogEntry>>>
where
    S: Storage<String, LogEntry> + Clone,
{
    config: WorkflowConfig,
    sink: Option<Arc<dyn LogSink>>,
    storage: S,
    default_id: String,
    raise_on_deprecation: bool,
}

impl<S> DeprecationWorkflowBuilder<S>
where
    S: Storage<String, LogEntry> + Clone,
{
    /// Set the initial configuration.
    pub fn with_config(mut self, config: WorkflowConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the sink receiving `log`-handled deprecations.
    ///
    /// Default: [`TracingSink`], which emits a `WARN` event.
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Keep the deprecation log in a custom storage backend.
    ///
    /// Default: [`ShardedStorage`]
    pub fn with_storage<ST>(self, storage: ST) -> DeprecationWorkflowBuilder<ST>
    where
        ST: Storage<String, LogEntry> + Clone,
    {
        DeprecationWorkflowBuilder {
            config: self.config,
            sink: self.sink,
            storage,
            default_id: self.default_id,
            raise_on_deprecation: self.raise_on_deprecation,
        }
    }

    /// Set the identifier used for deprecations fired without one.
    ///
    /// Default: [`DEFAULT_DEPRECATION_ID`]
    pub fn with_default_id(mut self, id: impl Into<String>) -> Self {
        self.default_id = id.into();
        self
    }

    /// Start with the host's raise-on-deprecation flag set.
    pub fn with_raise_on_deprecation(mut self, enabled: bool) -> Self {
        self.raise_on_deprecation = enabled;
        self
    }

    /// Build the workflow.
    ///
    /// # Errors
    /// Returns `BuildError::EmptyDefaultId` if the default identifier is empty.
    pub fn build(self) -> Result<DeprecationWorkflow<S>, BuildError> {
        if self.default_id.is_empty() {
            return Err(BuildError::EmptyDefaultId);
        }

        let sink = self.sink.unwrap_or_else(|| Arc::new(TracingSink::new()));

        Ok(DeprecationWorkflow::assemble(
            DeprecationLog::new(self.storage),
            sink,
            self.config,
            self.default_id,
            self.raise_on_deprecation,
        ))
    }
}

/// Matches fired deprecations against the configured rules and handles them.
///
/// # Example
/// ```
/// use deprecation_workflow::{DeprecationOptions, DeprecationWorkflow, Rule, WorkflowConfig};
///
/// let workflow = DeprecationWorkflow::builder()
///     .with_config(
///         WorkflowConfig::new(vec![Rule::silence_id("known")]).with_throw_on_unhandled(true),
///     )
///     .build()
///     .unwrap();
///
/// assert!(workflow.deprecate("Known", false, DeprecationOptions::with_id("known")).is_ok());
///
/// let err = workflow
///     .deprecate("Surprise", false, DeprecationOptions::with_id("surprise"))
///     .unwrap_err();
/// assert_eq!(err.to_string(), "Surprise");
/// assert!(workflow.flush_deprecations().contains(r#"matchId: "surprise""#));
/// ```
#[derive(Debug)]
pub struct DeprecationWorkflow<S = Arc<ShardedStorage<String, LogEntry>>>
where
    S: Storage<String, LogEntry> + Clone,
{
    config: RwLock<Arc<WorkflowConfig>>,
    raise_on_deprecation: AtomicBool,
    default_id: String,
    dispatcher: Dispatcher<S>,
}

impl DeprecationWorkflow {
    /// Create a builder for configuring the workflow.
    ///
    /// Defaults:
    /// - Configuration: no rules, `throw_on_unhandled` off
    /// - Sink: `TracingSink`
    /// - Default identifier: [`DEFAULT_DEPRECATION_ID`]
    /// - Log storage: `ShardedStorage`
    /// - Raise on deprecation: off
    pub fn builder() -> DeprecationWorkflowBuilder {
        DeprecationWorkflowBuilder {
            config: WorkflowConfig::default(),
            sink: None,
            storage: Arc::new(ShardedStorage::new()),
            default_id: DEFAULT_DEPRECATION_ID.to_string(),
            raise_on_deprecation: false,
        }
    }

    /// Create a workflow with default settings.
    pub fn new() -> Self {
        Self::assemble(
            DeprecationLog::new(Arc::new(ShardedStorage::new())),
            Arc::new(TracingSink::new()),
            WorkflowConfig::default(),
            DEFAULT_DEPRECATION_ID.to_string(),
            false,
        )
    }
}

impl Default for DeprecationWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> DeprecationWorkflow<S>
where
    S: Storage<String, LogEntry> + Clone,
{
    fn assemble(
        log: DeprecationLog<S>,
        sink: Arc<dyn LogSink>,
        config: WorkflowConfig,
        default_id: String,
        raise_on_deprecation: bool,
    ) -> Self {
        Self {
            config: RwLock::new(Arc::new(config)),
            raise_on_deprecation: AtomicBool::new(raise_on_deprecation),
            default_id,
            dispatcher: Dispatcher::new(sink, log, Metrics::new()),
        }
    }

    /// Fire a deprecation unless `test` holds.
    ///
    /// Mirrors the host's `deprecate(message, test, options)` guard: a true
    /// `test` means the deprecated condition is not met and nothing happens.
    ///
    /// # Errors
    /// Returns the `DeprecationError` produced by the matched handler or by
    /// an unhandled deprecation while raising is enabled.
    pub fn deprecate(
        &self,
        message: impl Into<String>,
        test: bool,
        options: DeprecationOptions,
    ) -> Result<(), DeprecationError> {
        if test {
            return Ok(());
        }
        self.handle(&DeprecationEvent::new(message, options))
            .map(|_| ())
    }

    /// Resolve and dispatch a fired deprecation.
    ///
    /// The configuration is snapshotted before any handler runs, so a handler
    /// that fires another deprecation or replaces the configuration does not
    /// disturb the dispatch in progress.
    ///
    /// # Errors
    /// See [`Dispatcher::dispatch`].
    pub fn handle(&self, event: &DeprecationEvent) -> Result<Disposition, DeprecationError> {
        let config = self.config();
        let matched = matcher::resolve(event, &config, &self.default_id);
        self.dispatcher.dispatch(
            event,
            matched,
            &config,
            self.raise_on_deprecation(),
            &self.default_id,
        )
    }

    /// Replace the configuration wholesale.
    ///
    /// `None` restores the default: no rules and `throw_on_unhandled` off.
    pub fn set_config(&self, config: Option<WorkflowConfig>) {
        let config = config.unwrap_or_default();
        tracing::info!(
            target: "deprecation_workflow",
            rules = config.workflow().len(),
            throw_on_unhandled = config.throw_on_unhandled(),
            "replaced deprecation workflow configuration"
        );
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(config);
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Arc<WorkflowConfig> {
        Arc::clone(&self.config.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Set the host's global raise-on-deprecation flag.
    ///
    /// While set, unmatched deprecations fail even when `throw_on_unhandled`
    /// is off. Matching `silence` and `log` rules still take precedence.
    pub fn set_raise_on_deprecation(&self, enabled: bool) {
        self.raise_on_deprecation.store(enabled, Ordering::Relaxed);
    }

    pub fn raise_on_deprecation(&self) -> bool {
        self.raise_on_deprecation.load(Ordering::Relaxed)
    }

    /// Identifier used for deprecations fired without one.
    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    /// Render every unhandled deprecation seen since the last reset as a
    /// `silence` workflow. The log is left untouched; see [`Self::reset`].
    pub fn flush_deprecations(&self) -> String {
        self.dispatcher.log().flush()
    }

    /// Like [`Self::flush_deprecations`], assigning `handler` to every entry.
    pub fn flush_with_handler(&self, handler: Handler) -> String {
        self.dispatcher.log().report(handler).render()
    }

    /// Clear the deprecation log.
    pub fn reset(&self) {
        tracing::info!(
            target: "deprecation_workflow",
            entries = self.dispatcher.log().len(),
            "reset deprecation log"
        );
        self.dispatcher.log().reset();
    }

    pub fn log(&self) -> &DeprecationLog<S> {
        self.dispatcher.log()
    }

    pub fn metrics(&self) -> &Metrics {
        self.dispatcher.metrics()
    }
}
