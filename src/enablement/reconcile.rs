//! Before/toggle/after reconciliation for one artifact class.
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::{info, warn};

use super::{
    ArtifactClass, DirectoryPair, EnablementState, ExitCodeTables, SingleToggleResult,
    StateObserver, ToggleExecutor, Verb, classify_single_toggle,
};
use crate::config::ClassConfig;
use crate::error::EnablementError;
use crate::exec::Executor;
use crate::fs::FsObserver;

/// Enabled flag of one artifact before and after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateChange {
    /// Flag before the toggle.
    pub before: bool,
    /// Flag after the toggle.
    pub after: bool,
}

/// Minimal diff produced by a multi-artifact toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationResult {
    /// Artifacts whose enabled flag differs between the two snapshots.
    pub changed: BTreeMap<String, StateChange>,
    /// Number of artifacts whose flag did not change.
    pub unchanged: usize,
    /// Tool stderr, present only when the tool exited non-zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<String>,
}

impl ReconciliationResult {
    /// Whether any artifact changed state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Compute the minimal diff between two snapshots.
///
/// Every name present in either snapshot is compared; a name missing from
/// one side counts as not enabled there.  Names with identical flags are
/// left out of `changed`.
#[must_use]
pub fn diff(before: &EnablementState, after: &EnablementState) -> ReconciliationResult {
    let mut result = ReconciliationResult::default();
    for name in before.keys().chain(after.keys().filter(|k| !before.contains_key(*k))) {
        let was = before.get(name).copied().unwrap_or(false);
        let now = after.get(name).copied().unwrap_or(false);
        if was == now {
            result.unchanged += 1;
        } else {
            result.changed.insert(
                name.clone(),
                StateChange {
                    before: was,
                    after: now,
                },
            );
        }
    }
    result
}

/// Snapshot → toggle → snapshot pipeline for one artifact class.
///
/// Toggles on one reconciler are serialized by an internal lock so a
/// concurrent toggle can never leak into another's "after" snapshot.
/// Toggles issued from other processes are not covered; callers that share
/// a host must serialize those themselves.
#[derive(Debug)]
pub struct Reconciler {
    class: ArtifactClass,
    pair: DirectoryPair,
    observer: StateObserver,
    toggler: ToggleExecutor,
    exit_codes: ExitCodeTables,
    lock: Mutex<()>,
}

impl Reconciler {
    /// Build a reconciler for `class` from its configuration and collaborators.
    #[must_use]
    pub fn new(
        class: ArtifactClass,
        config: &ClassConfig,
        executor: Arc<dyn Executor>,
        fs: Arc<dyn FsObserver>,
    ) -> Self {
        Self {
            class,
            pair: config.pair.clone(),
            observer: StateObserver::new(fs),
            toggler: ToggleExecutor::new(config.tools.clone(), executor),
            exit_codes: config.exit_codes.clone(),
            lock: Mutex::new(()),
        }
    }

    /// Artifact class handled by this reconciler.
    #[must_use]
    pub const fn class(&self) -> ArtifactClass {
        self.class
    }

    /// Directories observed by this reconciler.
    #[must_use]
    pub const fn pair(&self) -> &DirectoryPair {
        &self.pair
    }

    /// Snapshot the current enablement state.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be read.
    pub fn observe(&self) -> Result<EnablementState, EnablementError> {
        Ok(self.observer.observe(&self.pair)?)
    }

    /// Whether `name` is currently enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the enabled directory cannot be inspected.
    pub fn is_enabled(&self, name: &str) -> Result<bool, EnablementError> {
        Ok(self.observer.is_enabled(&self.pair, name)?)
    }

    /// Run the `verb` tool on `primary` followed by `names` and report what
    /// changed.  Empty names are dropped.
    ///
    /// A non-zero exit does not suppress the diff; the tool's stderr is
    /// attached as [`ReconciliationResult::errors`].  With no names at all
    /// the bare tool is run.
    ///
    /// # Errors
    ///
    /// Returns an error if either snapshot fails, or if the tool cannot be
    /// run to completion.  Once the first snapshot exists it travels with
    /// the error; a tool that never completed gets no second snapshot.
    pub fn toggle(
        &self,
        verb: Verb,
        primary: Option<&str>,
        names: &[String],
    ) -> Result<ReconciliationResult, EnablementError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let args: Vec<String> = primary
            .into_iter()
            .chain(names.iter().map(String::as_str))
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        let before = self.observe()?;
        info!(class = %self.class, %verb, names = ?args, "toggling");

        let outcome = match self.toggler.run(verb, &args) {
            Ok(outcome) => outcome,
            Err(source) => {
                return Err(EnablementError::Execution {
                    source,
                    before: Some(before),
                });
            }
        };

        let after = match self.observer.observe(&self.pair) {
            Ok(after) => after,
            Err(source) => return Err(EnablementError::AfterObservation { source, before }),
        };
        if before.len() != after.len() || before.keys().any(|k| !after.contains_key(k)) {
            warn!(
                class = %self.class,
                available = %self.pair.available_dir.display(),
                "available artifacts changed during toggle"
            );
        }

        let mut result = diff(&before, &after);
        if !outcome.succeeded() {
            warn!(
                class = %self.class,
                %verb,
                code = outcome.raw_exit_code,
                "toggle tool reported failure"
            );
            result.errors = Some(outcome.stderr_text);
        }
        info!(
            class = %self.class,
            changed = result.changed.len(),
            unchanged = result.unchanged,
            "toggle reconciled"
        );
        Ok(result)
    }

    /// Run the `verb` tool on one artifact and classify its exit code.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot be run to completion; exit codes
    /// never produce an error.
    pub fn toggle_single(
        &self,
        verb: Verb,
        name: &str,
    ) -> Result<SingleToggleResult, EnablementError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        info!(class = %self.class, %verb, name, "toggling");
        let outcome = self.toggler.run(verb, &[name.to_string()])?;
        let status = classify_single_toggle(&self.exit_codes, verb, outcome.raw_exit_code);
        if !status.is_success() {
            warn!(
                class = %self.class,
                %verb,
                name,
                code = outcome.raw_exit_code,
                status = status.as_str(),
                "toggle did not take effect"
            );
        }
        Ok(SingleToggleResult::new(
            self.class,
            name,
            verb,
            status,
            outcome.raw_exit_code,
        ))
    }
}
