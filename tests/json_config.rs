use deprecation_workflow::infrastructure::mocks::RecordingSink;
use deprecation_workflow::{
    ConfigError, DeprecationOptions, DeprecationWorkflow, Handler, MessageMatcher, WorkflowConfig,
};
use std::sync::Arc;

const CONFIG: &str = r#"{
    "throwOnUnhandled": true,
    "workflow": [
        { "handler": "silence", "matchId": "ember.deprecation-workflow" },
        { "handler": "log", "matchMessage": { "pattern": "^Using the global" } },
        { "handler": "throw", "matchMessage": "Calling set() on a destroyed object" }
    ]
}"#;

#[test]
fn test_json_config_drives_workflow() {
    let config = WorkflowConfig::from_json(CONFIG).unwrap();
    assert!(config.throw_on_unhandled());
    assert_eq!(config.workflow().len(), 3);
    assert_eq!(config.workflow()[1].handler(), Handler::Log);
    assert!(matches!(
        config.workflow()[2].match_message(),
        Some(MessageMatcher::Literal(_))
    ));

    let sink = RecordingSink::new();
    let workflow = DeprecationWorkflow::builder()
        .with_config(config)
        .with_sink(Arc::new(sink.clone()))
        .build()
        .unwrap();

    assert!(workflow
        .deprecate(
            "Slightly interesting",
            false,
            DeprecationOptions::with_id("ember.deprecation-workflow")
        )
        .is_ok());
    assert!(workflow
        .deprecate("Using the global App", false, DeprecationOptions::with_id("global"))
        .is_ok());
    assert!(workflow
        .deprecate(
            "Calling set() on a destroyed object",
            false,
            DeprecationOptions::with_id("destroyed")
        )
        .is_err());
    assert!(workflow
        .deprecate("Nobody expects this", false, DeprecationOptions::with_id("surprise"))
        .is_err());

    assert_eq!(sink.lines(), vec!["DEPRECATION: Using the global App"]);
    assert_eq!(workflow.log().ids(), vec!["surprise"]);
}

#[test]
fn test_json_config_defaults() {
    let config = WorkflowConfig::from_json("{}").unwrap();
    assert_eq!(config, WorkflowConfig::default());

    let config = WorkflowConfig::from_json(r#"{ "workflow": null, "throwOnUnhandled": null }"#)
        .unwrap();
    assert_eq!(config, WorkflowConfig::default());
}

#[test]
fn test_json_config_rejects_invalid_pattern() {
    let err = WorkflowConfig::from_json(
        r#"{ "workflow": [{ "handler": "silence", "matchMessage": { "pattern": "(" } }] }"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPattern { ref pattern, .. } if pattern == "("));
}

#[test]
fn test_json_config_rejects_unknown_handler() {
    let err = WorkflowConfig::from_json(
        r#"{ "workflow": [{ "handler": "explode", "matchId": "x" }] }"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::UnknownHandler(ref h) if h == "explode"));
    assert_eq!(err.to_string(), "unknown handler `explode` (expected silence, log or throw)");
}
