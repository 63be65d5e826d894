//! Rendering of collected deprecations as a workflow configuration block.
//!
//! The output is meant to be pasted into the host application's deprecation
//! workflow file, so its shape is fixed:
//!
//! ```text
//! self.deprecationWorkflow = self.deprecationWorkflow || {};
//! self.deprecationWorkflow.config = {
//!   workflow: [
//!     { handler: "silence", matchId: "first" },
//!     { handler: "silence", matchId: "second" }
//!   ]
//! };
//! ```

use crate::domain::rule::Handler;
use std::fmt;

/// A rendered list of `matchId` rules, one per collected identifier.
///
/// Identifiers keep the order they were given in; nothing is sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowReport {
    handler: Handler,
    ids: Vec<String>,
}

impl WorkflowReport {
    /// Create a report that silences every identifier.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_handler(ids, Handler::Silence)
    }

    /// Create a report that assigns `handler` to every identifier.
    pub fn with_handler<I, S>(ids: I, handler: Handler) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            handler,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Render the configuration block.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for WorkflowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "self.deprecationWorkflow = self.deprecationWorkflow || {{}};")?;
        writeln!(f, "self.deprecationWorkflow.config = {{")?;
        writeln!(f, "  workflow: [")?;

        let last = self.ids.len().saturating_sub(1);
        for (i, id) in self.ids.iter().enumerate() {
            let separator = if i == last { "" } else { "," };
            writeln!(
                f,
                "    {{ handler: {}, matchId: {} }}{}",
                quote(self.handler.as_str()),
                quote(id),
                separator
            )?;
        }

        writeln!(f, "  ]")?;
        write!(f, "}};")
    }
}

/// Double-quoted string literal with JSON escaping.
fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_entries_exact() {
        let report = WorkflowReport::new(["first", "second"]);

        assert_eq!(
            report.render(),
            r#"self.deprecationWorkflow = self.deprecationWorkflow || {};
self.deprecationWorkflow.config = {
  workflow: [
    { handler: "silence", matchId: "first" },
    { handler: "silence", matchId: "second" }
  ]
};"#
        );
    }

    #[test]
    fn test_keeps_given_order() {
        let report = WorkflowReport::new(["zebra", "apple"]);
        let rendered = report.render();

        let zebra = rendered.find("zebra").unwrap();
        let apple = rendered.find("apple").unwrap();
        assert!(zebra < apple);
    }

    #[test]
    fn test_empty_report() {
        let report = WorkflowReport::new(Vec::<String>::new());

        assert!(report.is_empty());
        assert_eq!(
            report.render(),
            "self.deprecationWorkflow = self.deprecationWorkflow || {};\n\
             self.deprecationWorkflow.config = {\n  workflow: [\n  ]\n};"
        );
    }

    #[test]
    fn test_single_entry_has_no_trailing_comma() {
        let rendered = WorkflowReport::new(["only"]).render();
        assert!(rendered.contains("    { handler: \"silence\", matchId: \"only\" }\n  ]"));
    }

    #[test]
    fn test_ids_are_escaped() {
        let rendered = WorkflowReport::new([r#"quo"te\slash"#]).render();
        assert!(rendered.contains(r#"matchId: "quo\"te\\slash""#));
    }

    #[test]
    fn test_custom_handler() {
        let rendered = WorkflowReport::with_handler(["a"], Handler::Log).render();
        assert!(rendered.contains(r#"{ handler: "log", matchId: "a" }"#));
    }
}
