//! Exit-code classification for single-artifact toggles.
//!
//! The module and conf tools signal "no such artifact" with a different
//! exit code depending on the verb, so classification is table driven and
//! configured per artifact class and verb.
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use super::{ArtifactClass, Verb};

/// Status historically reported when `a2dismod`/`a2disconf` is given an
/// unknown name.
///
/// This lies outside the 0..=255 range a process can exit with and may be a
/// raw wait status (exit code 1 shifted left by 8).  It is kept as reported
/// upstream; add `1` to the disable table's `not_found` codes to also match
/// the shifted-down value.
pub const DISABLE_NOT_FOUND_CODE: i32 = 256;

/// Exit codes with a known meaning for one verb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExitCodeTable {
    /// Codes meaning the toggle took effect.
    pub success: Vec<i32>,
    /// Codes meaning the artifact does not exist.
    pub not_found: Vec<i32>,
}

impl ExitCodeTable {
    /// Table with one success code and one not-found code.
    #[must_use]
    pub fn new(success: i32, not_found: i32) -> Self {
        Self {
            success: vec![success],
            not_found: vec![not_found],
        }
    }
}

/// Exit-code tables for both verbs of one artifact class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitCodeTables {
    /// Table for [`Verb::Enable`].
    pub enable: ExitCodeTable,
    /// Table for [`Verb::Disable`].
    pub disable: ExitCodeTable,
}

impl ExitCodeTables {
    /// Codes used by Debian's `a2en*`/`a2dis*` scripts.
    #[must_use]
    pub fn apache_defaults() -> Self {
        Self {
            enable: ExitCodeTable::new(0, 1),
            disable: ExitCodeTable::new(0, DISABLE_NOT_FOUND_CODE),
        }
    }

    /// Table for `verb`.
    #[must_use]
    pub const fn for_verb(&self, verb: Verb) -> &ExitCodeTable {
        match verb {
            Verb::Enable => &self.enable,
            Verb::Disable => &self.disable,
        }
    }
}

impl Default for ExitCodeTables {
    fn default() -> Self {
        Self::apache_defaults()
    }
}

/// Meaning of a single-artifact toggle's exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleToggleStatus {
    /// The artifact was enabled.
    Enabled,
    /// The artifact was disabled.
    Disabled,
    /// The tool reported that the artifact does not exist.
    NotFound,
    /// The exit code has no configured meaning.
    Unknown(i32),
}

impl SingleToggleStatus {
    /// Stable machine-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
            Self::NotFound => "not_found",
            Self::Unknown(_) => "unknown",
        }
    }

    /// Whether the toggle took effect.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Enabled | Self::Disabled)
    }
}

impl Serialize for SingleToggleStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Classify `raw_exit_code` for `verb` using a class's `tables`.
///
/// Success codes are checked before not-found codes; anything else is
/// returned as [`SingleToggleStatus::Unknown`] carrying the exact code.
#[must_use]
pub fn classify_single_toggle(
    tables: &ExitCodeTables,
    verb: Verb,
    raw_exit_code: i32,
) -> SingleToggleStatus {
    let table = tables.for_verb(verb);
    if table.success.contains(&raw_exit_code) {
        match verb {
            Verb::Enable => SingleToggleStatus::Enabled,
            Verb::Disable => SingleToggleStatus::Disabled,
        }
    } else if table.not_found.contains(&raw_exit_code) {
        SingleToggleStatus::NotFound
    } else {
        SingleToggleStatus::Unknown(raw_exit_code)
    }
}

/// Reported result of a single-artifact toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SingleToggleResult {
    /// Class of the artifact.
    pub class: ArtifactClass,
    /// Artifact name as given.
    pub name: String,
    /// Direction of the toggle.
    pub verb: Verb,
    /// Classified outcome.
    pub status: SingleToggleStatus,
    /// Exit code the classification was derived from.
    pub exit_code: i32,
    /// Human-readable summary.
    pub message: String,
}

impl SingleToggleResult {
    /// Build a result, deriving the message from `class`, `name` and `status`.
    #[must_use]
    pub fn new(
        class: ArtifactClass,
        name: impl Into<String>,
        verb: Verb,
        status: SingleToggleStatus,
        exit_code: i32,
    ) -> Self {
        let name = name.into();
        let label = class.label();
        let message = match status {
            SingleToggleStatus::Enabled => format!("{label} {name} enabled"),
            SingleToggleStatus::Disabled => format!("{label} {name} disabled"),
            SingleToggleStatus::NotFound => format!("{label} {name} Not found"),
            SingleToggleStatus::Unknown(code) => code.to_string(),
        };
        Self {
            class,
            name,
            verb,
            status,
            exit_code,
            message,
        }
    }
}

impl fmt::Display for SingleToggleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
