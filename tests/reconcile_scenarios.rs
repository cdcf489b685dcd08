#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the engine against a real symlink tree.
//!
//! A temporary server root is populated with available/enabled entries and
//! the fake `a2*` tools from `common` change it, so every observation goes
//! through the real filesystem.  Covers:
//! - observation with and without the `000-default` alias
//! - multi-site toggles and their minimal diffs
//! - single-artifact toggles and exit-code classification
//! - start failures carrying the pre-toggle snapshot
//! - argument vectors reaching the tool unjoined

mod common;

use std::sync::Arc;

use a2toggle::apache::Apache;
use a2toggle::enablement::{ArtifactClass, SingleToggleStatus, StateChange, Verb};
use a2toggle::error::EnablementError;
use a2toggle::exec::Executor;
use a2toggle::fs::SystemFs;
use common::{ApacheTreeBuilder, FakeA2Tools};

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

/// One enabled and one disabled site are observed as such.
#[test]
fn observe_reports_enabled_flags() {
    let tree = ApacheTreeBuilder::new()
        .enabled(ArtifactClass::Site, "a")
        .available(ArtifactClass::Site, "b")
        .build();
    let apache = tree.apache(&FakeA2Tools::new(&tree));

    let sites = apache.list_sites().unwrap();
    assert_eq!(sites.len(), 2);
    assert!(sites["a"]);
    assert!(!sites["b"]);
}

/// The stock site counts as enabled through its `000-` alias.
#[test]
fn default_site_enabled_through_alias() {
    let tree = ApacheTreeBuilder::new()
        .enabled_as(ArtifactClass::Site, "default", "000-default")
        .build();
    let apache = tree.apache(&FakeA2Tools::new(&tree));

    assert!(apache.is_site_enabled("default").unwrap());
    assert!(apache.list_sites().unwrap()["default"]);
}

/// The alias rule is sites-only; a module named `default` needs a plain link.
#[test]
fn alias_does_not_apply_to_modules() {
    let tree = ApacheTreeBuilder::new()
        .enabled_as(ArtifactClass::Module, "default", "000-default")
        .build();
    let apache = tree.apache(&FakeA2Tools::new(&tree));

    assert!(!apache.is_module_enabled("default").unwrap());
}

/// A missing available directory is an error, never an empty listing.
#[test]
fn missing_available_dir_is_an_error() {
    let tree = ApacheTreeBuilder::new().build();
    std::fs::remove_dir(tree.available(ArtifactClass::Site)).unwrap();
    let apache = tree.apache(&FakeA2Tools::new(&tree));

    let err = apache.list_sites().unwrap_err();
    assert!(matches!(err, EnablementError::Filesystem(_)));
}

// ---------------------------------------------------------------------------
// Multi-site toggles
// ---------------------------------------------------------------------------

/// Enabling a disabled site reports exactly that change.
#[test]
fn enable_site_reports_single_change() {
    let tree = ApacheTreeBuilder::new()
        .enabled(ArtifactClass::Site, "a")
        .available(ArtifactClass::Site, "b")
        .build();
    let apache = tree.apache(&FakeA2Tools::new(&tree));

    let result = apache.enable_sites(Some("b"), &[]).unwrap();
    assert_eq!(result.changed.len(), 1);
    assert_eq!(
        result.changed["b"],
        StateChange {
            before: false,
            after: true
        }
    );
    assert_eq!(result.unchanged, 1);
    assert!(result.errors.is_none());
    assert!(tree.has_link(ArtifactClass::Site, "b"));
}

/// Enabling an already enabled site leaves the diff empty.
#[test]
fn enable_already_enabled_site_is_empty_diff() {
    let tree = ApacheTreeBuilder::new()
        .enabled(ArtifactClass::Site, "a")
        .available(ArtifactClass::Site, "b")
        .build();
    let apache = tree.apache(&FakeA2Tools::new(&tree));

    let result = apache.enable_sites(Some("a"), &[]).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.unchanged, 2);
}

/// Disabling several sites at once, including the aliased default site.
#[test]
fn disable_several_sites() {
    let tree = ApacheTreeBuilder::new()
        .enabled_as(ArtifactClass::Site, "default", "000-default")
        .enabled(ArtifactClass::Site, "example.com")
        .enabled(ArtifactClass::Site, "keep.me")
        .build();
    let apache = tree.apache(&FakeA2Tools::new(&tree));

    let result = apache
        .disable_sites(None, &["default".to_string(), "example.com".to_string()])
        .unwrap();
    let changed: Vec<&str> = result.changed.keys().map(String::as_str).collect();
    assert_eq!(changed, vec!["default", "example.com"]);
    assert!(result.changed.values().all(|c| c.before && !c.after));
    assert!(!tree.has_link(ArtifactClass::Site, "000-default"));
    assert!(tree.has_link(ArtifactClass::Site, "keep.me"));
}

/// A partial failure still reports what changed, with the tool's stderr.
#[test]
fn partial_failure_keeps_diff_and_errors() {
    let tree = ApacheTreeBuilder::new()
        .available(ArtifactClass::Site, "a")
        .build();
    let apache = tree.apache(&FakeA2Tools::new(&tree));

    let result = apache
        .enable_sites(Some("a"), &["nope".to_string()])
        .unwrap();
    assert!(result.changed["a"].after);
    let errors = result.errors.expect("stderr attached");
    assert!(errors.contains("nope does not exist"));
}

/// Names are passed as separate argv elements, primary first.
#[test]
fn names_reach_tool_unjoined() {
    let tree = ApacheTreeBuilder::new().build();
    let tools = FakeA2Tools::new(&tree);
    let apache = tree.apache(&tools);

    let _ = apache
        .enable_sites(None, &["a;rm -rf /".to_string(), "b".to_string()])
        .unwrap();
    assert_eq!(
        tools.calls(),
        vec![(
            "a2ensite".to_string(),
            vec!["a;rm -rf /".to_string(), "b".to_string()]
        )]
    );
}

/// With no names at all the bare tool is still invoked.
#[test]
fn empty_toggle_runs_bare_tool() {
    let tree = ApacheTreeBuilder::new()
        .available(ArtifactClass::Site, "a")
        .build();
    let tools = FakeA2Tools::new(&tree);
    let apache = tree.apache(&tools);

    let result = apache.disable_sites(None, &[]).unwrap();
    assert!(result.is_empty());
    assert_eq!(tools.calls(), vec![("a2dissite".to_string(), Vec::new())]);
}

// ---------------------------------------------------------------------------
// Single-artifact toggles
// ---------------------------------------------------------------------------

/// Enabling and disabling a module round-trips through the filesystem.
#[test]
fn module_enable_then_disable() {
    let tree = ApacheTreeBuilder::new()
        .available(ArtifactClass::Module, "rewrite.load")
        .build();
    let apache = tree.apache(&FakeA2Tools::new(&tree));

    let enabled = apache.enable_module("rewrite.load").unwrap();
    assert_eq!(enabled.status, SingleToggleStatus::Enabled);
    assert_eq!(enabled.message, "Mod rewrite.load enabled");
    assert!(apache.is_module_enabled("rewrite.load").unwrap());

    let disabled = apache.disable_module("rewrite.load").unwrap();
    assert_eq!(disabled.status, SingleToggleStatus::Disabled);
    assert!(!apache.is_module_enabled("rewrite.load").unwrap());
}

/// Disabling an unknown module reports not found through code 256.
#[test]
fn disable_unknown_module_is_not_found() {
    let tree = ApacheTreeBuilder::new().build();
    let apache = tree.apache(&FakeA2Tools::new(&tree));

    let result = apache.disable_module("ghost").unwrap();
    assert_eq!(result.status, SingleToggleStatus::NotFound);
    assert_eq!(result.exit_code, 256);
    assert_eq!(result.message, "Mod ghost Not found");
}

/// Enabling an unknown conf fragment reports not found through code 1.
#[test]
fn enable_unknown_conf_is_not_found() {
    let tree = ApacheTreeBuilder::new().build();
    let apache = tree.apache(&FakeA2Tools::new(&tree));

    let result = apache.enable_config("ghost").unwrap();
    assert_eq!(result.status, SingleToggleStatus::NotFound);
    assert_eq!(result.exit_code, 1);
    assert_eq!(result.verb, Verb::Enable);
}

/// A conf fragment toggle is visible through the enablement check.
#[test]
fn conf_enable_is_observable() {
    let tree = ApacheTreeBuilder::new()
        .available(ArtifactClass::Conf, "security.conf")
        .build();
    let apache = tree.apache(&FakeA2Tools::new(&tree));

    assert!(!apache.is_config_enabled("security.conf").unwrap());
    let result = apache.enable_config("security.conf").unwrap();
    assert_eq!(result.message, "Conf security.conf enabled");
    assert!(apache.is_config_enabled("security.conf").unwrap());
}

// ---------------------------------------------------------------------------
// Start failures
// ---------------------------------------------------------------------------

/// A tool that cannot be started surfaces as an execution error carrying the
/// snapshot taken before the attempt.
#[test]
fn start_failure_carries_before_snapshot() {
    let tree = ApacheTreeBuilder::new()
        .enabled(ArtifactClass::Site, "a")
        .available(ArtifactClass::Site, "b")
        .build();
    let mut config = tree.config();
    config.sites.tools.enable = "a2ensite-missing".to_string();
    let tools = FakeA2Tools::new(&tree);
    let apache = Apache::new(&config, tools as Arc<dyn Executor>, Arc::new(SystemFs));

    let err = apache.enable_sites(Some("b"), &[]).unwrap_err();
    let before = err.before().expect("before snapshot");
    assert!(before["a"]);
    assert!(!before["b"]);
    assert!(!tree.has_link(ArtifactClass::Site, "b"));
}

/// The same failure on the single-artifact path is an error, not a status.
#[test]
fn single_toggle_start_failure_is_error() {
    let tree = ApacheTreeBuilder::new().build();
    let mut config = tree.config();
    config.modules.tools.disable = "a2dismod-missing".to_string();
    let apache = Apache::new(
        &config,
        FakeA2Tools::new(&tree) as Arc<dyn Executor>,
        Arc::new(SystemFs),
    );

    let err = apache.disable_module("rewrite").unwrap_err();
    assert!(matches!(err, EnablementError::Execution { .. }));
    assert!(err.before().is_none());
}
