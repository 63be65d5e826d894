//! Workflow configuration.
//!
//! A [`WorkflowConfig`] is an ordered rule list plus the `throw_on_unhandled`
//! toggle. It is always replaced wholesale; there is no merging of partial
//! configurations.
//!
//! Configurations can be loaded from JSON using the host's field names:
//!
//! ```
//! use deprecation_workflow::{Handler, WorkflowConfig};
//!
//! let config = WorkflowConfig::from_json(r#"{
//!     "throwOnUnhandled": true,
//!     "workflow": [
//!         { "handler": "silence", "matchId": "first" },
//!         { "handler": "log", "matchMessage": "Sshhhhh!!" },
//!         { "handler": "throw", "matchMessage": { "pattern": "^Inter" } }
//!     ]
//! }"#).unwrap();
//!
//! assert!(config.throw_on_unhandled());
//! assert_eq!(config.workflow().len(), 3);
//! assert_eq!(config.workflow()[2].handler(), Handler::Throw);
//! ```

use crate::domain::rule::{RawRule, Rule};
use serde::{Deserialize, Deserializer, Serialize};

/// Error raised while building or loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A `matchMessage` pattern is not a valid regex
    #[error("invalid message pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    /// Handler name other than `silence`, `log` or `throw`
    #[error("unknown handler `{0}` (expected silence, log or throw)")]
    UnknownHandler(String),
    /// The configuration document could not be parsed
    #[error("malformed workflow configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ordered rules plus the unhandled-deprecation toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawConfig")]
pub struct WorkflowConfig {
    workflow: Vec<Rule>,
    throw_on_unhandled: bool,
}

/// Configuration document before its rules are validated.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    workflow: Vec<RawRule>,
    #[serde(default, deserialize_with = "null_as_default")]
    throw_on_unhandled: bool,
}

impl TryFrom<RawConfig> for WorkflowConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let workflow = raw
            .workflow
            .into_iter()
            .map(Rule::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(WorkflowConfig::new(workflow).with_throw_on_unhandled(raw.throw_on_unhandled))
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl WorkflowConfig {
    /// Create a configuration from an ordered rule list.
    pub fn new(workflow: Vec<Rule>) -> Self {
        Self {
            workflow,
            throw_on_unhandled: false,
        }
    }

    /// Append a rule after every existing one.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.workflow.push(rule);
        self
    }

    /// Raise an error for deprecations no rule matches.
    pub fn with_throw_on_unhandled(mut self, enabled: bool) -> Self {
        self.throw_on_unhandled = enabled;
        self
    }

    /// Parse a JSON configuration document.
    ///
    /// # Errors
    /// Returns `ConfigError::Json` for malformed documents,
    /// `ConfigError::UnknownHandler` for a handler other than silence, log or
    /// throw, and `ConfigError::InvalidPattern` for a message pattern that
    /// does not compile.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;
        raw.try_into()
    }

    /// Rules in evaluation order.
    pub fn workflow(&self) -> &[Rule] {
        &self.workflow
    }

    pub fn throw_on_unhandled(&self) -> bool {
        self.throw_on_unhandled
    }
}
