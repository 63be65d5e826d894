//! Collecting deprecations and generating a silence configuration.
//!
//! Deprecations are fired as `tracing` events on the `deprecation` target.
//! Known ones are silenced or logged by the workflow rules, the rest are
//! collected and printed as a ready-to-paste configuration block.

use deprecation_workflow::{
    DeprecationLayer, DeprecationOptions, DeprecationWorkflow, Rule, WorkflowConfig,
};
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::prelude::*;

fn main() {
    let config = WorkflowConfig::new(vec![
        Rule::silence_id("ember-routing.route-router"),
        Rule::log_pattern("^Using the global").expect("valid pattern"),
    ]);

    let workflow = Arc::new(
        DeprecationWorkflow::builder()
            .with_config(config)
            .build()
            .expect("valid workflow"),
    );

    // Handled deprecations are kept out of the fmt output
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(DeprecationLayer::new(workflow.clone())))
        .init();

    println!("=== Deprecation Collector Example ===\n");

    println!("Firing a silenced deprecation (no output expected):");
    warn!(target: "deprecation", id = "ember-routing.route-router", "The route router is private");

    println!("\nFiring a logged deprecation:");
    warn!(target: "deprecation", id = "global-app", "Using the global App is deprecated");

    println!("\nFiring unhandled deprecations, each one three times:");
    for _ in 0..3 {
        warn!(target: "deprecation", id = "first", since = "1.0", "First deprecation");
        warn!(target: "deprecation", id = "second", until = "2.0", "Second deprecation");
    }

    // Direct calls go through the same workflow
    workflow
        .deprecate("Third deprecation", false, DeprecationOptions::with_id("third"))
        .expect("unhandled deprecations do not raise by default");

    println!("\nCollected entries:");
    for entry in workflow.log().entries() {
        println!("  {} seen {} time(s): {}", entry.id(), entry.occurrences(), entry.message());
    }

    println!("\nPaste this into your deprecation workflow config:\n");
    println!("{}", workflow.flush_deprecations());

    let metrics = workflow.metrics().snapshot();
    println!(
        "\nSilenced: {}, logged: {}, unhandled: {}",
        metrics.events_silenced, metrics.events_logged, metrics.events_unhandled
    );
}
