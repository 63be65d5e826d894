//! Field visitor turning a `tracing` event into a deprecation event.
//!
//! Recognised fields:
//!
//! | field                  | becomes                 |
//! |------------------------|-------------------------|
//! | `message`              | deprecation message     |
//! | `id`                   | identifier              |
//! | `since`, `until`       | version metadata        |
//! | `for`, `for_`          | owning package          |
//!
//! Anything else is ignored. String fields are taken verbatim; other values
//! use their `Debug` rendering.

use crate::domain::event::{DeprecationEvent, DeprecationOptions};
use std::fmt;
use tracing::field::{Field, Visit};

#[derive(Debug, Default)]
pub(crate) struct DeprecationVisitor {
    message: Option<String>,
    options: DeprecationOptions,
}

impl DeprecationVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the event. Falls back to `fallback_message` (the callsite name)
    /// when the tracing event had no `message` field.
    pub fn into_event(self, fallback_message: &str) -> DeprecationEvent {
        let message = self
            .message
            .unwrap_or_else(|| fallback_message.to_string());
        DeprecationEvent::new(message, self.options)
    }

    fn store(&mut self, field: &Field, value: String) {
        let slot = match field.name() {
            "message" => &mut self.message,
            "id" => &mut self.options.id,
            "since" => &mut self.options.since,
            "until" => &mut self.options.until,
            "for" | "for_" | "r#for" => &mut self.options.for_,
            _ => return,
        };
        *slot = Some(value);
    }
}

impl Visit for DeprecationVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.store(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        // `message` arrives as fmt::Arguments, whose Debug output is the
        // formatted text without quotes.
        self.store(field, format!("{:?}", value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_visitor_uses_fallback() {
        let event = DeprecationVisitor::new().into_event("event src/lib.rs:1");
        assert_eq!(event.message(), "event src/lib.rs:1");
        assert_eq!(event.id(), None);
    }
}
