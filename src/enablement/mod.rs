//! Symlink-based enablement engine.
//!
//! An artifact (site, module or conf fragment) is *available* when it has an
//! entry in the available directory and *enabled* when a symlink with the
//! same name exists in the enabled directory.  The submodules split the
//! engine into the pieces that observe that state, change it through an
//! external tool, and interpret what happened:
//!
//! - [`observer`]: build an [`EnablementState`] from a [`DirectoryPair`]
//! - [`toggle`]: run the enable/disable tool and capture its outcome
//! - [`classify`]: map a single-artifact exit code to a [`SingleToggleStatus`]
//! - [`reconcile`]: snapshot, toggle, snapshot again, and diff
pub mod classify;
pub mod observer;
pub mod reconcile;
pub mod toggle;

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use classify::{
    ExitCodeTable, ExitCodeTables, SingleToggleResult, SingleToggleStatus, classify_single_toggle,
};
pub use observer::StateObserver;
pub use reconcile::{ReconciliationResult, Reconciler, StateChange, diff};
pub use toggle::{ToggleExecutor, ToggleOutcome, ToggleTools};

/// Enabled flag for every artifact name found in the available directory.
pub type EnablementState = BTreeMap<String, bool>;

/// The three kinds of artifact managed through available/enabled directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactClass {
    /// Virtual host definitions (`sites-available` / `sites-enabled`).
    Site,
    /// Server modules (`mods-available` / `mods-enabled`).
    Module,
    /// Configuration fragments (`conf-available` / `conf-enabled`).
    Conf,
}

impl ArtifactClass {
    /// Every artifact class, in display order.
    pub const ALL: [Self; 3] = [Self::Site, Self::Module, Self::Conf];

    /// Short label used in status messages (`"Mod vhost_alias enabled"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Site => "Site",
            Self::Module => "Mod",
            Self::Conf => "Conf",
        }
    }

    /// Directory stem under the server root (`sites`, `mods`, `conf`).
    #[must_use]
    pub const fn dir_stem(self) -> &'static str {
        match self {
            Self::Site => "sites",
            Self::Module => "mods",
            Self::Conf => "conf",
        }
    }
}

impl fmt::Display for ArtifactClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Site => write!(f, "site"),
            Self::Module => write!(f, "module"),
            Self::Conf => write!(f, "conf"),
        }
    }
}

/// Direction of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    /// Create the enabling symlink.
    Enable,
    /// Remove the enabling symlink.
    Disable,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enable => write!(f, "enable"),
            Self::Disable => write!(f, "disable"),
        }
    }
}

/// Alternate link name that also marks one artifact as enabled.
///
/// Debian ships its stock site as `000-default` so that it sorts first; the
/// site is still called `default` in `sites-available`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecialCaseRule {
    /// Artifact name the rule applies to.
    pub name: String,
    /// Prefix prepended to `name` to form the alternate link name.
    pub prefix: String,
}

impl SpecialCaseRule {
    /// The Debian `000-default` convention.
    #[must_use]
    pub fn debian_default_site() -> Self {
        Self {
            name: "default".to_string(),
            prefix: "000-".to_string(),
        }
    }

    /// Alternate link name for `name`, if the rule covers it.
    #[must_use]
    pub fn alternate_link(&self, name: &str) -> Option<String> {
        (name == self.name).then(|| format!("{}{name}", self.prefix))
    }
}

/// Where one artifact class lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryPair {
    /// Directory enumerating every artifact of the class.
    pub available_dir: PathBuf,
    /// Directory whose symlinks mark artifacts as enabled.
    pub enabled_dir: PathBuf,
    /// Optional alternate-link rule for one artifact name.
    pub special_case: Option<SpecialCaseRule>,
}

impl DirectoryPair {
    /// Pair without a special-case rule.
    #[must_use]
    pub fn new(available_dir: impl Into<PathBuf>, enabled_dir: impl Into<PathBuf>) -> Self {
        Self {
            available_dir: available_dir.into(),
            enabled_dir: enabled_dir.into(),
            special_case: None,
        }
    }

    /// Attach a special-case rule.
    #[must_use]
    pub fn with_special_case(mut self, rule: SpecialCaseRule) -> Self {
        self.special_case = Some(rule);
        self
    }
}
