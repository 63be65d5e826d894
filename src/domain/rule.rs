//! Workflow rules: a matcher paired with a handler.
//!
//! A rule matches a deprecation either by identifier or by message. Message
//! matchers are a tagged variant chosen when the rule is built: a
//! [`MessageMatcher::Literal`] compares by exact equality and is never
//! interpreted as a regex, while a [`MessageMatcher::Pattern`] searches the
//! message with a compiled regex.
//!
//! # Example
//! ```
//! use deprecation_workflow::{DeprecationEvent, DeprecationOptions, Rule};
//!
//! let literal = Rule::silence_message("Calling foo() is deprecated");
//! let pattern = Rule::log_pattern(r"foo\(\)").unwrap();
//! let event = DeprecationEvent::new(
//!     "Calling foo() is deprecated",
//!     DeprecationOptions::with_id("foo"),
//! );
//!
//! assert!(literal.matches(&event, "unidentified"));
//! assert!(pattern.matches(&event, "unidentified"));
//! ```

use crate::domain::config::ConfigError;
use crate::domain::event::DeprecationEvent;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to do with a deprecation once a rule matches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Handler {
    /// Swallow the deprecation without any output
    Silence,
    /// Emit `DEPRECATION: <message>` through the log sink
    Log,
    /// Fail the firing call with an error carrying the message
    Throw,
}

impl Handler {
    /// The handler name as it appears in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Handler::Silence => "silence",
            Handler::Log => "log",
            Handler::Throw => "throw",
        }
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Handler {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "silence" => Ok(Handler::Silence),
            "log" => Ok(Handler::Log),
            "throw" => Ok(Handler::Throw),
            other => Err(ConfigError::UnknownHandler(other.to_string())),
        }
    }
}

impl TryFrom<String> for Handler {
    type Error = ConfigError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

/// How a rule compares against the deprecation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawMatcher", into = "RawMatcher")]
pub enum MessageMatcher {
    /// Exact string equality
    Literal(String),
    /// Regex search anywhere in the message
    Pattern(Regex),
}

impl MessageMatcher {
    /// A matcher comparing by exact equality.
    pub fn literal(message: impl Into<String>) -> Self {
        MessageMatcher::Literal(message.into())
    }

    /// Compile a regex matcher.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidPattern` if the regex does not compile.
    pub fn pattern(pattern: &str) -> Result<Self, ConfigError> {
        Regex::new(pattern)
            .map(MessageMatcher::Pattern)
            .map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Test a message against this matcher.
    pub fn is_match(&self, message: &str) -> bool {
        match self {
            MessageMatcher::Literal(literal) => literal == message,
            MessageMatcher::Pattern(regex) => regex.is_match(message),
        }
    }
}

impl PartialEq for MessageMatcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MessageMatcher::Literal(a), MessageMatcher::Literal(b)) => a == b,
            (MessageMatcher::Pattern(a), MessageMatcher::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl Eq for MessageMatcher {}

/// Wire form of a message matcher: a bare string is a literal,
/// `{ "pattern": "..." }` is a regex.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum RawMatcher {
    Literal(String),
    Pattern { pattern: String },
}

impl TryFrom<RawMatcher> for MessageMatcher {
    type Error = ConfigError;

    fn try_from(raw: RawMatcher) -> Result<Self, Self::Error> {
        match raw {
            RawMatcher::Literal(literal) => Ok(MessageMatcher::Literal(literal)),
            RawMatcher::Pattern { pattern } => MessageMatcher::pattern(&pattern),
        }
    }
}

impl From<MessageMatcher> for RawMatcher {
    fn from(matcher: MessageMatcher) -> Self {
        match matcher {
            MessageMatcher::Literal(literal) => RawMatcher::Literal(literal),
            MessageMatcher::Pattern(regex) => RawMatcher::Pattern {
                pattern: regex.as_str().to_string(),
            },
        }
    }
}

/// A matcher-plus-handler pair evaluated against each deprecation.
///
/// A rule with neither an identifier nor a message matcher never matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawRule")]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    match_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    match_message: Option<MessageMatcher>,
    handler: Handler,
}

/// Unvalidated rule as written in a configuration document.
///
/// Kept separate from [`Rule`] so an unknown handler or a bad pattern
/// surfaces as its own `ConfigError` variant instead of a parse error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawRule {
    #[serde(default)]
    match_id: Option<String>,
    #[serde(default)]
    match_message: Option<RawMatcher>,
    handler: String,
}

impl TryFrom<RawRule> for Rule {
    type Error = ConfigError;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        let handler = raw.handler.parse()?;
        let match_message = raw.match_message.map(MessageMatcher::try_from).transpose()?;
        Ok(Rule::new(handler, raw.match_id, match_message))
    }
}

impl Rule {
    /// Create a rule from its parts.
    pub fn new(
        handler: Handler,
        match_id: Option<String>,
        match_message: Option<MessageMatcher>,
    ) -> Self {
        Self {
            match_id,
            match_message,
            handler,
        }
    }

    /// Rule matching a deprecation identifier.
    pub fn for_id(handler: Handler, id: impl Into<String>) -> Self {
        Self::new(handler, Some(id.into()), None)
    }

    /// Rule matching a message by exact equality.
    pub fn for_message(handler: Handler, message: impl Into<String>) -> Self {
        Self::new(handler, None, Some(MessageMatcher::literal(message)))
    }

    /// Rule matching messages against a regex.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidPattern` if the regex does not compile.
    pub fn for_pattern(handler: Handler, pattern: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(handler, None, Some(MessageMatcher::pattern(pattern)?)))
    }

    pub fn silence_id(id: impl Into<String>) -> Self {
        Self::for_id(Handler::Silence, id)
    }

    pub fn log_id(id: impl Into<String>) -> Self {
        Self::for_id(Handler::Log, id)
    }

    pub fn throw_id(id: impl Into<String>) -> Self {
        Self::for_id(Handler::Throw, id)
    }

    pub fn silence_message(message: impl Into<String>) -> Self {
        Self::for_message(Handler::Silence, message)
    }

    pub fn log_message(message: impl Into<String>) -> Self {
        Self::for_message(Handler::Log, message)
    }

    pub fn throw_message(message: impl Into<String>) -> Self {
        Self::for_message(Handler::Throw, message)
    }

    pub fn silence_pattern(pattern: &str) -> Result<Self, ConfigError> {
        Self::for_pattern(Handler::Silence, pattern)
    }

    pub fn log_pattern(pattern: &str) -> Result<Self, ConfigError> {
        Self::for_pattern(Handler::Log, pattern)
    }

    pub fn throw_pattern(pattern: &str) -> Result<Self, ConfigError> {
        Self::for_pattern(Handler::Throw, pattern)
    }

    pub fn handler(&self) -> Handler {
        self.handler
    }

    pub fn match_id(&self) -> Option<&str> {
        self.match_id.as_deref()
    }

    pub fn match_message(&self) -> Option<&MessageMatcher> {
        self.match_message.as_ref()
    }

    /// Check whether this rule applies to an event.
    ///
    /// Events fired without an identifier are compared under `default_id`.
    pub fn matches(&self, event: &DeprecationEvent, default_id: &str) -> bool {
        let id_matches = self
            .match_id
            .as_deref()
            .is_some_and(|id| id == event.id_or(default_id));

        id_matches
            || self
                .match_message
                .as_ref()
                .is_some_and(|matcher| matcher.is_match(event.message()))
    }
}
