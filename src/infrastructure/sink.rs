//! Log sink adapters.

use crate::application::ports::LogSink;
use std::sync::Arc;
use tracing::subscriber::NoSubscriber;

/// Sink writing each line to standard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn warn(&self, line: &str) {
        eprintln!("{}", line);
    }
}

/// Sink that emits each line as a `WARN` event on the `deprecation_workflow`
/// target.
///
/// `tracing` drops events fired while no subscriber is installed and events
/// fired from inside a subscriber callback, which is where deprecations
/// dispatched by [`DeprecationLayer`](crate::DeprecationLayer) end up. In both
/// cases the line goes to the fallback sink instead ([`StderrSink`] unless
/// configured otherwise).
#[derive(Debug, Clone)]
pub struct TracingSink {
    fallback: Arc<dyn LogSink>,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::with_fallback(Arc::new(StderrSink))
    }

    /// Use `fallback` for lines `tracing` cannot accept.
    pub fn with_fallback(fallback: Arc<dyn LogSink>) -> Self {
        Self { fallback }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether an event fired now would reach a subscriber.
///
/// Inside a subscriber callback the current dispatcher is the no-op one.
fn can_emit() -> bool {
    tracing::dispatcher::get_default(|dispatch| !dispatch.is::<NoSubscriber>())
}

impl LogSink for TracingSink {
    fn warn(&self, line: &str) {
        if can_emit() {
            tracing::warn!(target: "deprecation_workflow", "{}", line);
        } else {
            self.fallback.warn(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mocks::{MockCaptureLayer, RecordingSink};
    use tracing::Level;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    #[test]
    fn test_tracing_sink_emits_warn() {
        let capture = MockCaptureLayer::new();
        let fallback = RecordingSink::new();
        let subscriber = tracing_subscriber::registry().with(capture.clone());

        tracing::subscriber::with_default(subscriber, || {
            TracingSink::with_fallback(Arc::new(fallback.clone())).warn("DEPRECATION: Interesting");
        });

        let events = capture.get_captured();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::WARN);
        assert_eq!(events[0].target, "deprecation_workflow");
        assert_eq!(events[0].message, "DEPRECATION: Interesting");
        assert_eq!(fallback.count(), 0);
    }

    #[test]
    fn test_tracing_sink_falls_back_without_subscriber() {
        let fallback = RecordingSink::new();

        tracing::subscriber::with_default(NoSubscriber::default(), || {
            TracingSink::with_fallback(Arc::new(fallback.clone())).warn("DEPRECATION: Orphan");
        });

        assert_eq!(fallback.lines(), vec!["DEPRECATION: Orphan"]);
    }

    /// Calls the sink from inside `on_event`, like a dispatching layer does.
    struct CallbackLayer {
        sink: TracingSink,
    }

    impl<S: tracing::Subscriber> Layer<S> for CallbackLayer {
        fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            self.sink.warn("DEPRECATION: From callback");
        }
    }

    #[test]
    fn test_tracing_sink_falls_back_inside_callback() {
        let capture = MockCaptureLayer::new();
        let fallback = RecordingSink::new();
        let subscriber = tracing_subscriber::registry().with(capture.clone()).with(CallbackLayer {
            sink: TracingSink::with_fallback(Arc::new(fallback.clone())),
        });

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("trigger");
        });

        assert_eq!(capture.count(), 1);
        assert_eq!(fallback.lines(), vec!["DEPRECATION: From callback"]);
    }
}
