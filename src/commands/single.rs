//! Commands that act on one named artifact: `*-enabled`, `enable-*`, `disable-*`.
use std::io::Write;

use anyhow::{Context as _, Result};
use serde::Serialize;

use super::{emit, state_word};
use crate::apache::Apache;
use crate::enablement::{ArtifactClass, Verb};

/// JSON shape of an enablement query.
#[derive(Debug, Serialize)]
struct EnabledReport<'a> {
    class: ArtifactClass,
    name: &'a str,
    enabled: bool,
}

/// Print whether `name` of `class` is enabled.
///
/// # Errors
///
/// Returns an error if the enabled directory cannot be inspected or `out`
/// cannot be written.
pub fn enabled(
    apache: &Apache,
    class: ArtifactClass,
    name: &str,
    json: bool,
    out: &mut dyn Write,
) -> Result<bool> {
    let enabled = apache
        .reconciler(class)
        .is_enabled(name)
        .with_context(|| format!("failed to check {class} {name}"))?;
    let report = EnabledReport {
        class,
        name,
        enabled,
    };
    emit(out, json, &report, &format!("{name}: {}", state_word(enabled)))?;
    Ok(true)
}

/// Toggle `name` of `class` and print the classified outcome.
///
/// Returns `false` unless the toggle took effect.
///
/// # Errors
///
/// Returns an error if the tool cannot be run or `out` cannot be written.
pub fn toggle(
    apache: &Apache,
    class: ArtifactClass,
    verb: Verb,
    name: &str,
    json: bool,
    out: &mut dyn Write,
) -> Result<bool> {
    let result = apache
        .reconciler(class)
        .toggle_single(verb, name)
        .with_context(|| format!("failed to {verb} {class} {name}"))?;
    emit(out, json, &result, &result.message)?;
    Ok(result.status.is_success())
}
