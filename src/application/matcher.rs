//! Rule resolution.
//!
//! Rules are evaluated strictly in declaration order and the first match
//! wins. There is no specificity scoring: an identifier rule declared after a
//! broad message pattern never sees events the pattern already claimed.

use crate::domain::{config::WorkflowConfig, event::DeprecationEvent, rule::Rule};

/// Find the first rule in `config` matching `event`.
///
/// Events fired without an identifier are compared under `default_id`.
pub fn resolve<'a>(
    event: &DeprecationEvent,
    config: &'a WorkflowConfig,
    default_id: &str,
) -> Option<&'a Rule> {
    config.workflow().iter().enumerate().find_map(|(index, rule)| {
        let matched = rule.matches(event, default_id);
        tracing::trace!(
            target: "deprecation_workflow",
            index,
            handler = %rule.handler(),
            matched,
            "evaluated rule"
        );
        matched.then_some(rule)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::DeprecationOptions;
    use crate::domain::rule::Handler;

    const DEFAULT_ID: &str = "unidentified";

    fn event(message: &str, id: &str) -> DeprecationEvent {
        DeprecationEvent::new(message, DeprecationOptions::with_id(id))
    }

    #[test]
    fn test_no_rules_resolves_nothing() {
        let config = WorkflowConfig::default();
        assert!(resolve(&event("anything", "x"), &config, DEFAULT_ID).is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let config = WorkflowConfig::new(vec![
            Rule::log_pattern("Inter").unwrap(),
            Rule::throw_message("Interesting"),
            Rule::silence_id("interesting"),
        ]);

        let rule = resolve(&event("Interesting", "interesting"), &config, DEFAULT_ID).unwrap();
        assert_eq!(rule.handler(), Handler::Log);
    }

    #[test]
    fn test_later_rule_used_when_earlier_do_not_match() {
        let config = WorkflowConfig::new(vec![
            Rule::throw_id("other"),
            Rule::log_message("Something else"),
            Rule::silence_id("target"),
        ]);

        let rule = resolve(&event("Boring", "target"), &config, DEFAULT_ID).unwrap();
        assert_eq!(rule.handler(), Handler::Silence);
        assert_eq!(rule.match_id(), Some("target"));
    }

    #[test]
    fn test_unmatched_resolves_nothing() {
        let config = WorkflowConfig::new(vec![Rule::silence_message("Sshhhhh!!")]);
        assert!(resolve(&event("Foobarrrzzzz", "foobar"), &config, DEFAULT_ID).is_none());
    }

    #[test]
    fn test_id_less_event_matches_default_id_rule() {
        let config = WorkflowConfig::new(vec![Rule::throw_id("other"), Rule::log_id(DEFAULT_ID)]);

        let rule = resolve(&DeprecationEvent::bare("no id"), &config, DEFAULT_ID).unwrap();
        assert_eq!(rule.handler(), Handler::Log);
    }

    #[test]
    fn test_ordering_holds_for_every_position() {
        // Every rule matches; whichever comes first must be chosen.
        let handlers = [Handler::Silence, Handler::Log, Handler::Throw];
        for first in 0..handlers.len() {
            let rules = (0..handlers.len())
                .map(|i| Rule::for_id(handlers[(first + i) % handlers.len()], "same"))
                .collect();
            let config = WorkflowConfig::new(rules);

            let rule = resolve(&event("msg", "same"), &config, DEFAULT_ID).unwrap();
            assert_eq!(rule.handler(), handlers[first]);
        }
    }
}
