//! Tracing integration layer.
//!
//! Lets a host fire deprecations as ordinary `tracing` events:
//!
//! ```rust,no_run
//! tracing::warn!(
//!     target: "deprecation",
//!     id = "old-router",
//!     since = "2.1",
//!     until = "3.0",
//!     "The old router is deprecated"
//! );
//! ```
//!
//! Events on the configured target are converted into deprecation events and
//! handed to the workflow. Events on any other target are left alone.
//!
//! The layer can be installed in two ways. Pick one; installing the same
//! layer both ways dispatches every deprecation twice.
//!
//! * As a per-layer **filter** on the output layer. Silenced, logged and
//!   thrown deprecations are filtered out; unhandled deprecations that do not
//!   raise pass through, so the host's default output still shows them.
//! * As a plain **layer**. Deprecations are dispatched but nothing is
//!   filtered.
//!
//! Errors cannot unwind through `tracing`, so raised deprecations are queued
//! and drained with [`DeprecationLayer::take_raised`].

use crate::application::{
    dispatcher::{DeprecationError, Disposition},
    log::LogEntry,
    ports::Storage,
    workflow::{BuildError, DeprecationWorkflow},
};
use crate::infrastructure::storage::ShardedStorage;
use crate::infrastructure::visitor::DeprecationVisitor;

use std::sync::{Arc, Mutex, PoisonError};
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Filter};
use tracing_subscriber::Layer;

/// Target the layer intercepts unless configured otherwise.
pub const DEFAULT_TARGET: &str = "deprecation";

/// Builder for constructing a `DeprecationLayer`.
#[derive(Debug)]
pub struct DeprecationLayerBuilder<S = Arc<ShardedStorage<String, LogEntry>>>
where
    S: Storage<String, LogEntry> + Clone,
{
    workflow: Arc<DeprecationWorkflow<S>>,
    target: String,
}

impl<S> DeprecationLayerBuilder<S>
where
    S: Storage<String, LogEntry> + Clone,
{
    /// Set the event target treated as a deprecation.
    ///
    /// Targets are compared exactly. Default: `"deprecation"`
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Build the layer.
    ///
    /// # Errors
    /// Returns `BuildError::EmptyTarget` if the target is empty.
    pub fn build(self) -> Result<DeprecationLayer<S>, BuildError> {
        if self.target.is_empty() {
            return Err(BuildError::EmptyTarget);
        }

        Ok(DeprecationLayer {
            workflow: self.workflow,
            target: Arc::from(self.target),
            raised: Arc::new(Mutex::new(Vec::new())),
        })
    }
}

/// Routes `tracing` events on the deprecation target through a workflow.
///
/// Clones share the workflow and the queue of raised errors.
#[derive(Debug, Clone)]
pub struct DeprecationLayer<S = Arc<ShardedStorage<String, LogEntry>>>
where
    S: Storage<String, LogEntry> + Clone,
{
    workflow: Arc<DeprecationWorkflow<S>>,
    target: Arc<str>,
    raised: Arc<Mutex<Vec<DeprecationError>>>,
}

impl<S> DeprecationLayer<S>
where
    S: Storage<String, LogEntry> + Clone,
{
    /// Create a builder around a shared workflow.
    pub fn builder(workflow: Arc<DeprecationWorkflow<S>>) -> DeprecationLayerBuilder<S> {
        DeprecationLayerBuilder {
            workflow,
            target: DEFAULT_TARGET.to_string(),
        }
    }

    /// Create a layer on the default target.
    pub fn new(workflow: Arc<DeprecationWorkflow<S>>) -> Self {
        Self {
            workflow,
            target: Arc::from(DEFAULT_TARGET),
            raised: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The workflow deprecations are dispatched to.
    pub fn workflow(&self) -> &Arc<DeprecationWorkflow<S>> {
        &self.workflow
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Drain the errors raised since the last call, oldest first.
    pub fn take_raised(&self) -> Vec<DeprecationError> {
        std::mem::take(&mut *self.raised.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn is_deprecation(&self, metadata: &Metadata<'_>) -> bool {
        metadata.target() == &*self.target
    }

    /// Dispatch `event` if it is a deprecation; `None` for other targets.
    fn intercept(&self, event: &Event<'_>) -> Option<Result<Disposition, DeprecationError>> {
        let metadata = event.metadata();
        if !self.is_deprecation(metadata) {
            return None;
        }

        let mut visitor = DeprecationVisitor::new();
        event.record(&mut visitor);
        let deprecation = visitor.into_event(metadata.name());

        let result = self.workflow.handle(&deprecation);
        if let Err(err) = &result {
            self.raised
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(err.clone());
        }
        Some(result)
    }
}

// Implement the Filter trait so handled deprecations can be kept from output
impl<S, Sub> Filter<Sub> for DeprecationLayer<S>
where
    S: Storage<String, LogEntry> + Clone,
    Sub: Subscriber,
{
    fn enabled(&self, _meta: &Metadata<'_>, _cx: &Context<'_, Sub>) -> bool {
        // Decisions need the event's fields, so they happen in event_enabled
        true
    }

    fn event_enabled(&self, event: &Event<'_>, _cx: &Context<'_, Sub>) -> bool {
        match self.intercept(event) {
            None => true,
            Some(Ok(Disposition::Unhandled)) => true,
            Some(Ok(Disposition::Silenced | Disposition::Logged)) | Some(Err(_)) => false,
        }
    }
}

impl<S, Sub> Layer<Sub> for DeprecationLayer<S>
where
    S: Storage<String, LogEntry> + Clone + 'static,
    Sub: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, Sub>) {
        // Errors are already queued for take_raised
        let _ = self.intercept(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{config::WorkflowConfig, rule::Rule};
    use crate::infrastructure::mocks::{MockCaptureLayer, RecordingSink};
    use tracing::warn;
    use tracing_subscriber::layer::SubscriberExt;

    fn workflow(config: WorkflowConfig, sink: &RecordingSink) -> Arc<DeprecationWorkflow> {
        Arc::new(
            DeprecationWorkflow::builder()
                .with_config(config)
                .with_sink(Arc::new(sink.clone()))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_builder_rejects_empty_target() {
        let sink = RecordingSink::new();
        let result = DeprecationLayer::builder(workflow(WorkflowConfig::default(), &sink))
            .with_target("")
            .build();
        assert_eq!(result.unwrap_err(), BuildError::EmptyTarget);
    }

    #[test]
    fn test_filter_hides_handled_deprecations() {
        let sink = RecordingSink::new();
        let layer = DeprecationLayer::new(workflow(
            WorkflowConfig::new(vec![Rule::silence_id("quiet"), Rule::log_id("loud")]),
            &sink,
        ));
        let capture = MockCaptureLayer::new();
        let subscriber =
            tracing_subscriber::registry().with(capture.clone().with_filter(layer.clone()));

        tracing::subscriber::with_default(subscriber, || {
            warn!(target: "deprecation", id = "quiet", "Quiet one");
            warn!(target: "deprecation", id = "loud", "Loud one");
            warn!(target: "deprecation", id = "unknown", "Unknown one");
            warn!(target: "app", "unrelated");
        });

        let messages: Vec<_> = capture.get_captured().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["Unknown one", "unrelated"]);
        assert_eq!(sink.lines(), vec!["DEPRECATION: Loud one"]);
        assert_eq!(layer.workflow().log().ids(), vec!["unknown"]);
    }

    #[test]
    fn test_custom_target() {
        let sink = RecordingSink::new();
        let layer = DeprecationLayer::builder(workflow(WorkflowConfig::default(), &sink))
            .with_target("myapp::deprecations")
            .build()
            .unwrap();
        let subscriber = tracing_subscriber::registry().with(layer.clone());

        tracing::subscriber::with_default(subscriber, || {
            warn!(target: "deprecation", id = "ignored", "Not ours");
            warn!(target: "myapp::deprecations", id = "ours", "Ours");
        });

        assert_eq!(layer.target(), "myapp::deprecations");
        assert_eq!(layer.workflow().log().ids(), vec!["ours"]);
    }

    #[test]
    fn test_raised_errors_are_queued() {
        let sink = RecordingSink::new();
        let layer = DeprecationLayer::new(workflow(
            WorkflowConfig::new(vec![Rule::throw_message("Interesting")]),
            &sink,
        ));
        let subscriber = tracing_subscriber::registry().with(layer.clone());

        tracing::subscriber::with_default(subscriber, || {
            warn!(target: "deprecation", id = "interesting", "Interesting");
        });

        let raised = layer.take_raised();
        assert_eq!(raised.len(), 1);
        assert_eq!(raised[0].message(), "Interesting");
        assert!(layer.take_raised().is_empty());
    }
}
