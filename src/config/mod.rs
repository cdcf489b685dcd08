//! Configuration: where each artifact class lives and how its tools behave.
//!
//! Built-in defaults describe a Debian `apache2` layout under
//! [`DEFAULT_SERVER_ROOT`].  An optional TOML file overrides individual
//! settings per class, and CLI flags override the file:
//!
//! ```toml
//! server_root = "/etc/apache2"
//! timeout_secs = 30
//!
//! [sites]
//! enabled_dir = "sites-enabled"       # relative paths resolve under server_root
//! special_case = { name = "default", prefix = "000-" }
//!
//! [modules.disable_codes]
//! success = [0]
//! not_found = [1, 256]
//! ```
pub mod toml_loader;
pub mod validation;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::enablement::{
    ArtifactClass, DirectoryPair, ExitCodeTable, ExitCodeTables, SpecialCaseRule, ToggleTools,
};
use crate::error::ConfigError;

/// Server root used when neither the config file nor the CLI names one.
pub const DEFAULT_SERVER_ROOT: &str = "/etc/apache2";

/// Resolved settings for one artifact class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassConfig {
    /// Available/enabled directories and the special-case rule.
    pub pair: DirectoryPair,
    /// Enable and disable programs.
    pub tools: ToggleTools,
    /// Exit-code meanings for single-artifact toggles.
    pub exit_codes: ExitCodeTables,
}

impl ClassConfig {
    /// Debian defaults for `class` under `server_root`.
    #[must_use]
    pub fn defaults_for(class: ArtifactClass, server_root: &Path) -> Self {
        let stem = class.dir_stem();
        let mut pair = DirectoryPair::new(
            server_root.join(format!("{stem}-available")),
            server_root.join(format!("{stem}-enabled")),
        );
        if class == ArtifactClass::Site {
            pair = pair.with_special_case(SpecialCaseRule::debian_default_site());
        }
        let tools = match class {
            ArtifactClass::Site => ToggleTools::new("a2ensite", "a2dissite"),
            ArtifactClass::Module => ToggleTools::new("a2enmod", "a2dismod"),
            ArtifactClass::Conf => ToggleTools::new("a2enconf", "a2disconf"),
        };
        Self {
            pair,
            tools,
            exit_codes: ExitCodeTables::apache_defaults(),
        }
    }

    fn apply(&mut self, section: ClassSection, server_root: &Path) {
        if let Some(dir) = section.available_dir {
            self.pair.available_dir = server_root.join(dir);
        }
        if let Some(dir) = section.enabled_dir {
            self.pair.enabled_dir = server_root.join(dir);
        }
        if let Some(tool) = section.enable_tool {
            self.tools.enable = tool;
        }
        if let Some(tool) = section.disable_tool {
            self.tools.disable = tool;
        }
        match section.special_case {
            Some(SpecialCaseSetting::Toggle(false)) => self.pair.special_case = None,
            Some(SpecialCaseSetting::Rule(rule)) => self.pair.special_case = Some(rule),
            Some(SpecialCaseSetting::Toggle(true)) | None => {}
        }
        if let Some(table) = section.enable_codes {
            self.exit_codes.enable = table;
        }
        if let Some(table) = section.disable_codes {
            self.exit_codes.disable = table;
        }
    }

    fn to_section(&self) -> ClassSection {
        ClassSection {
            available_dir: Some(self.pair.available_dir.clone()),
            enabled_dir: Some(self.pair.enabled_dir.clone()),
            enable_tool: Some(self.tools.enable.clone()),
            disable_tool: Some(self.tools.disable.clone()),
            special_case: Some(
                self.pair
                    .special_case
                    .clone()
                    .map_or(SpecialCaseSetting::Toggle(false), SpecialCaseSetting::Rule),
            ),
            enable_codes: Some(self.exit_codes.enable.clone()),
            disable_codes: Some(self.exit_codes.disable.clone()),
        }
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory the default class directories live under.
    pub server_root: PathBuf,
    /// Seconds a toggle tool may run before it is killed; `None` or `0` waits forever.
    pub timeout_secs: Option<u64>,
    /// Site settings.
    pub sites: ClassConfig,
    /// Module settings.
    pub modules: ClassConfig,
    /// Conf fragment settings.
    pub confs: ClassConfig,
}

/// Values supplied on the command line, applied over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Replacement server root.
    pub server_root: Option<PathBuf>,
    /// Replacement tool timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Debian defaults for every class under `server_root`, without a timeout.
    #[must_use]
    pub fn defaults(server_root: &Path) -> Self {
        Self {
            server_root: server_root.to_path_buf(),
            timeout_secs: None,
            sites: ClassConfig::defaults_for(ArtifactClass::Site, server_root),
            modules: ClassConfig::defaults_for(ArtifactClass::Module, server_root),
            confs: ClassConfig::defaults_for(ArtifactClass::Conf, server_root),
        }
    }

    /// Load configuration from `path` (built-in defaults when `None`), apply
    /// `overrides`, and validate the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the merged
    /// configuration fails validation.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => {
                debug!(path = %path.display(), "loading configuration");
                toml_loader::load_config(path)?
            }
            None => ConfigFile::default(),
        };
        let config = Self::from_file(file, overrides);

        let warnings = validation::validate(&config);
        if !warnings.is_empty() {
            let joined: Vec<String> = warnings.iter().map(ToString::to_string).collect();
            return Err(ConfigError::Invalid(joined.join("; ")));
        }
        Ok(config)
    }

    /// Merge a parsed file and CLI overrides over the built-in defaults.
    #[must_use]
    pub fn from_file(file: ConfigFile, overrides: &Overrides) -> Self {
        let server_root = overrides
            .server_root
            .clone()
            .or(file.server_root)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SERVER_ROOT));

        let mut config = Self::defaults(&server_root);
        config.timeout_secs = overrides.timeout_secs.or(file.timeout_secs);
        config.sites.apply(file.sites, &server_root);
        config.modules.apply(file.modules, &server_root);
        config.confs.apply(file.confs, &server_root);
        config
    }

    /// Settings for `class`.
    #[must_use]
    pub const fn class(&self, class: ArtifactClass) -> &ClassConfig {
        match class {
            ArtifactClass::Site => &self.sites,
            ArtifactClass::Module => &self.modules,
            ArtifactClass::Conf => &self.confs,
        }
    }

    /// Name of the config file section for `class`.
    #[must_use]
    pub const fn section_name(class: ArtifactClass) -> &'static str {
        match class {
            ArtifactClass::Site => "sites",
            ArtifactClass::Module => "modules",
            ArtifactClass::Conf => "confs",
        }
    }

    /// Tool timeout, if one is configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Express the resolved configuration in config file form, with every
    /// setting spelled out.
    #[must_use]
    pub fn to_file(&self) -> ConfigFile {
        ConfigFile {
            server_root: Some(self.server_root.clone()),
            timeout_secs: self.timeout_secs,
            sites: self.sites.to_section(),
            modules: self.modules.to_section(),
            confs: self.confs.to_section(),
        }
    }
}

/// On-disk configuration file; every setting is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Directory the default class directories live under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_root: Option<PathBuf>,
    /// Toggle tool timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// `[sites]` section.
    #[serde(default)]
    pub sites: ClassSection,
    /// `[modules]` section.
    #[serde(default)]
    pub modules: ClassSection,
    /// `[confs]` section.
    #[serde(default)]
    pub confs: ClassSection,
}

/// Per-class overrides in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassSection {
    /// Available directory; relative paths resolve under the server root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_dir: Option<PathBuf>,
    /// Enabled directory; relative paths resolve under the server root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_dir: Option<PathBuf>,
    /// Program run to enable artifacts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_tool: Option<String>,
    /// Program run to disable artifacts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_tool: Option<String>,
    /// Special-case rule, or `false` to drop the default one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_case: Option<SpecialCaseSetting>,
    /// Exit-code table for enabling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_codes: Option<ExitCodeTable>,
    /// Exit-code table for disabling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_codes: Option<ExitCodeTable>,
}

/// `special_case` setting: either a rule table or a boolean switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecialCaseSetting {
    /// `false` removes the class's rule; `true` keeps the default.
    Toggle(bool),
    /// `{ name = "...", prefix = "..." }` replaces the rule.
    Rule(SpecialCaseRule),
}
