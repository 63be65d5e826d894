//! Recording log sink for testing.

use crate::application::ports::LogSink;
use std::sync::{Arc, Mutex};

/// Sink that keeps every line it receives.
///
/// Clones share the same buffer, so a test can hand one clone to the
/// workflow and inspect another.
///
/// # Examples
///
/// ```
/// use deprecation_workflow::infrastructure::mocks::RecordingSink;
/// use deprecation_workflow::{DeprecationOptions, DeprecationWorkflow, Rule, WorkflowConfig};
/// use std::sync::Arc;
///
/// let sink = RecordingSink::new();
/// let workflow = DeprecationWorkflow::builder()
///     .with_config(WorkflowConfig::new(vec![Rule::log_id("old")]))
///     .with_sink(Arc::new(sink.clone()))
///     .build()
///     .unwrap();
///
/// workflow.deprecate("Old thing", false, DeprecationOptions::with_id("old")).unwrap();
/// assert_eq!(sink.lines(), vec!["DEPRECATION: Old thing"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines received so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .expect("RecordingSink mutex poisoned - a test thread panicked while holding the lock")
            .clone()
    }

    /// Number of lines received so far.
    pub fn count(&self) -> usize {
        self.lines
            .lock()
            .expect("RecordingSink mutex poisoned - a test thread panicked while holding the lock")
            .len()
    }

    /// Forget all received lines.
    pub fn clear(&self) {
        self.lines
            .lock()
            .expect("RecordingSink mutex poisoned - a test thread panicked while holding the lock")
            .clear();
    }
}

impl LogSink for RecordingSink {
    fn warn(&self, line: &str) {
        self.lines
            .lock()
            .expect("RecordingSink mutex poisoned - a test thread panicked while holding the lock")
            .push(line.to_string());
    }
}
