//! Commands: `list-sites`, `enable-sites`, `disable-sites`.
use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context as _, Result};

use super::{emit, state_word};
use crate::apache::Apache;
use crate::cli::SitesOpts;
use crate::enablement::{ReconciliationResult, Verb};

/// Print every available site with its enabled flag.
///
/// # Errors
///
/// Returns an error if the sites directories cannot be read or `out` cannot
/// be written.
pub fn list(apache: &Apache, json: bool, out: &mut dyn Write) -> Result<bool> {
    let sites = apache.list_sites().context("failed to list sites")?;
    let text = sites
        .iter()
        .map(|(name, enabled)| format!("{name}: {}", state_word(*enabled)))
        .collect::<Vec<_>>()
        .join("\n");
    emit(out, json, &sites, &text)?;
    Ok(true)
}

/// Toggle the named sites and print what changed.
///
/// Returns `false` when the tool reported an error.
///
/// # Errors
///
/// Returns an error if the sites directories cannot be read, the tool cannot
/// be run, or `out` cannot be written.
pub fn toggle(
    apache: &Apache,
    verb: Verb,
    opts: &SitesOpts,
    json: bool,
    out: &mut dyn Write,
) -> Result<bool> {
    let name = opts.name.as_deref();
    let result = match verb {
        Verb::Enable => apache.enable_sites(name, &opts.sites),
        Verb::Disable => apache.disable_sites(name, &opts.sites),
    }
    .with_context(|| format!("failed to {verb} sites"))?;

    emit(out, json, &result, &describe(&result))?;
    Ok(result.errors.is_none())
}

/// Human-readable rendering of a reconciliation.
fn describe(result: &ReconciliationResult) -> String {
    let mut text = String::new();
    for (name, change) in &result.changed {
        let _ = writeln!(
            text,
            "{name}: {} -> {}",
            state_word(change.before),
            state_word(change.after)
        );
    }
    if result.is_empty() {
        text.push_str("no changes");
    } else {
        let _ = write!(text, "{} changed", result.changed.len());
    }
    let _ = write!(text, ", {} unchanged", result.unchanged);
    if let Some(errors) = &result.errors {
        let _ = write!(text, "\nerrors: {}", errors.trim_end());
    }
    text
}
