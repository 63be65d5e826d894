//! Deprecation events as fired by the host framework.

use std::fmt;

/// Metadata passed alongside a deprecation message.
///
/// Every field is optional; hosts that predate identifiers may fire
/// deprecations with nothing but a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeprecationOptions {
    /// Stable identifier of the deprecation (e.g. `"ember-routing.route-router"`)
    pub id: Option<String>,
    /// Version the deprecation was introduced in
    pub since: Option<String>,
    /// Version the deprecated API will be removed in
    pub until: Option<String>,
    /// Package or library that owns the deprecation
    pub for_: Option<String>,
}

impl DeprecationOptions {
    /// Options carrying only an identifier.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Set the `since` version.
    pub fn since(mut self, since: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self
    }

    /// Set the `until` version.
    pub fn until(mut self, until: impl Into<String>) -> Self {
        self.until = Some(until.into());
        self
    }

    /// Set the owning package.
    pub fn for_(mut self, owner: impl Into<String>) -> Self {
        self.for_ = Some(owner.into());
        self
    }
}

/// A single firing of a deprecation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecationEvent {
    message: String,
    options: DeprecationOptions,
}

impl DeprecationEvent {
    /// Create an event from a message and its metadata.
    pub fn new(message: impl Into<String>, options: DeprecationOptions) -> Self {
        Self {
            message: message.into(),
            options,
        }
    }

    /// Create an event with no metadata at all.
    pub fn bare(message: impl Into<String>) -> Self {
        Self::new(message, DeprecationOptions::default())
    }

    /// The human readable deprecation message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The deprecation identifier, if the host supplied one.
    pub fn id(&self) -> Option<&str> {
        self.options.id.as_deref()
    }

    /// The identifier, falling back to `default_id` when absent.
    pub fn id_or<'a>(&'a self, default_id: &'a str) -> &'a str {
        self.id().unwrap_or(default_id)
    }

    pub fn since(&self) -> Option<&str> {
        self.options.since.as_deref()
    }

    pub fn until(&self) -> Option<&str> {
        self.options.until.as_deref()
    }

    pub fn for_(&self) -> Option<&str> {
        self.options.for_.as_deref()
    }

    /// All metadata supplied with the event.
    pub fn options(&self) -> &DeprecationOptions {
        &self.options
    }
}

impl fmt::Display for DeprecationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "[{}] {}", id, self.message),
            None => f.write_str(&self.message),
        }
    }
}
