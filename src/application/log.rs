//! Accumulating record of unhandled deprecations.
//!
//! The log keeps one entry per deprecation identifier. Recording an
//! identifier that is already present never adds an entry, so a deprecation
//! firing in a loop costs a single slot. Entries remember the order in which
//! identifiers were first seen, and the report lists them in that order.

use crate::application::ports::Storage;
use crate::domain::{event::DeprecationEvent, report::WorkflowReport, rule::Handler};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// First recorded occurrence of a deprecation identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    id: String,
    message: String,
    since: Option<String>,
    until: Option<String>,
    for_: Option<String>,
    sequence: u64,
    occurrences: u64,
}

impl LogEntry {
    fn first(id: &str, event: &DeprecationEvent, sequence: u64) -> Self {
        Self {
            id: id.to_string(),
            message: event.message().to_string(),
            since: event.since().map(str::to_string),
            until: event.until().map(str::to_string),
            for_: event.for_().map(str::to_string),
            sequence,
            occurrences: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Message of the first occurrence.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn since(&self) -> Option<&str> {
        self.since.as_deref()
    }

    pub fn until(&self) -> Option<&str> {
        self.until.as_deref()
    }

    pub fn for_(&self) -> Option<&str> {
        self.for_.as_deref()
    }

    /// How many times the identifier was recorded since the last reset.
    pub fn occurrences(&self) -> u64 {
        self.occurrences
    }
}

/// Deduplicating, insertion-ordered log keyed by deprecation identifier.
///
/// Generic over the storage backend; in production this is
/// `Arc<ShardedStorage>`. Clones share the same entries.
#[derive(Debug, Clone)]
pub struct DeprecationLog<S>
where
    S: Storage<String, LogEntry> + Clone,
{
    storage: S,
    next_sequence: Arc<AtomicU64>,
}

impl<S> DeprecationLog<S>
where
    S: Storage<String, LogEntry> + Clone,
{
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            next_sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record an occurrence of `event` under `id`.
    ///
    /// Returns `true` if this is the first time `id` was seen since the
    /// last reset.
    pub fn record(&self, id: &str, event: &DeprecationEvent) -> bool {
        let mut inserted = false;
        let next_sequence = &self.next_sequence;
        self.storage.with_entry_mut(
            id.to_string(),
            || {
                inserted = true;
                LogEntry::first(id, event, next_sequence.fetch_add(1, Ordering::Relaxed))
            },
            |entry| entry.occurrences += 1,
        );
        inserted
    }

    /// Entries in order of first occurrence.
    pub fn entries(&self) -> Vec<LogEntry> {
        let mut entries = Vec::with_capacity(self.storage.len());
        self.storage.for_each(|_, entry| entries.push(entry.clone()));
        entries.sort_by_key(|entry| entry.sequence);
        entries
    }

    /// Identifiers in order of first occurrence.
    pub fn ids(&self) -> Vec<String> {
        self.entries().into_iter().map(|entry| entry.id).collect()
    }

    /// Build a report assigning `handler` to every recorded identifier.
    pub fn report(&self, handler: Handler) -> WorkflowReport {
        WorkflowReport::with_handler(self.ids(), handler)
    }

    /// Render the `silence` report. Does not clear the log.
    pub fn flush(&self) -> String {
        self.report(Handler::Silence).render()
    }

    /// Drop every entry and restart first-occurrence ordering.
    pub fn reset(&self) {
        self.storage.clear();
        self.next_sequence.store(0, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::DeprecationOptions;
    use crate::infrastructure::storage::ShardedStorage;

    fn new_log() -> DeprecationLog<Arc<ShardedStorage<String, LogEntry>>> {
        DeprecationLog::new(Arc::new(ShardedStorage::new()))
    }

    fn event(message: &str, id: &str) -> DeprecationEvent {
        DeprecationEvent::new(
            message,
            DeprecationOptions::with_id(id)
                .since("the beginning")
                .until("forever")
                .for_("testing"),
        )
    }

    #[test]
    fn test_record_is_idempotent() {
        let log = new_log();

        assert!(log.record("first", &event("First deprecation", "first")));
        assert!(!log.record("first", &event("First deprecation", "first")));
        assert!(!log.record("first", &event("First deprecation", "first")));

        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].occurrences(), 3);
    }

    #[test]
    fn test_insertion_order_not_lexical() {
        let log = new_log();
        for id in ["zulu", "alpha", "mike", "alpha", "zulu", "bravo"] {
            log.record(id, &event("msg", id));
        }

        assert_eq!(log.ids(), vec!["zulu", "alpha", "mike", "bravo"]);
    }

    #[test]
    fn test_entry_keeps_first_occurrence_metadata() {
        let log = new_log();
        log.record("shared", &event("First wording", "shared"));
        log.record("shared", &DeprecationEvent::bare("Second wording"));

        let entry = &log.entries()[0];
        assert_eq!(entry.message(), "First wording");
        assert_eq!(entry.since(), Some("the beginning"));
        assert_eq!(entry.until(), Some("forever"));
        assert_eq!(entry.for_(), Some("testing"));
    }

    #[test]
    fn test_flush_does_not_clear() {
        let log = new_log();
        log.record("first", &event("First deprecation", "first"));

        let once = log.flush();
        let twice = log.flush();
        assert_eq!(once, twice);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_reset_clears_and_restarts_order() {
        let log = new_log();
        log.record("b", &event("b", "b"));
        log.record("a", &event("a", "a"));

        log.reset();
        assert!(log.is_empty());
        assert!(!log.flush().contains("matchId"));

        log.record("a", &event("a", "a"));
        log.record("b", &event("b", "b"));
        assert_eq!(log.ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_clones_share_entries() {
        let log = new_log();
        let other = log.clone();
        other.record("shared", &event("msg", "shared"));

        assert_eq!(log.len(), 1);
    }
}
