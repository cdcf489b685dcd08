//! Subcommand dispatch and the shared setup sequence.
pub mod completions;
pub mod show_config;
pub mod single;
pub mod sites;
pub mod version;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use serde::Serialize;
use tracing::debug;

use crate::apache::Apache;
use crate::cli::{Cli, Command, GlobalOpts};
use crate::config::{Config, Overrides};
use crate::enablement::{ArtifactClass, Verb};

/// Configuration and engine shared by every command that touches Apache.
#[derive(Debug)]
pub struct CommandSetup {
    /// Resolved configuration.
    pub config: Config,
    /// Engine built from `config`.
    pub apache: Apache,
}

impl CommandSetup {
    /// Load configuration from the global options and build the engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read, parsed or
    /// validated.
    pub fn init(global: &GlobalOpts) -> Result<Self> {
        let config = load_config(global)?;
        let apache = Apache::from_config(&config);
        Ok(Self { config, apache })
    }
}

/// Load and validate configuration, applying `--root` and `--timeout`.
///
/// # Errors
///
/// Returns an error if the configuration file cannot be read, parsed or
/// validated.
pub fn load_config(global: &GlobalOpts) -> Result<Config> {
    let overrides = Overrides {
        server_root: global.root.clone(),
        timeout_secs: global.timeout,
    };
    let config = Config::load(global.config.as_deref(), &overrides)
        .context("failed to load configuration")?;
    debug!(
        server_root = %config.server_root.display(),
        timeout_secs = ?config.timeout_secs,
        "configuration loaded"
    );
    Ok(config)
}

/// Run the parsed command line, writing results to stdout.
///
/// # Errors
///
/// Returns an error if configuration loading fails, an artifact directory
/// cannot be read, a toggle tool cannot be run, or stdout cannot be written.
pub fn run(cli: &Cli) -> Result<ExitCode> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let global = &cli.global;

    match &cli.command {
        Command::Version => {
            version::run(&mut out)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Completions(opts) => {
            completions::run(opts.shell, &mut out);
            Ok(ExitCode::SUCCESS)
        }
        Command::ShowConfig => {
            show_config::run(&load_config(global)?, &mut out)?;
            Ok(ExitCode::SUCCESS)
        }
        command => {
            let setup = CommandSetup::init(global)?;
            run_with(&setup.apache, command, global.json, &mut out)
        }
    }
}

/// Run an artifact command against `apache`, writing results to `out`.
///
/// Queries always exit successfully; toggles exit with failure when the
/// tool reported an error or the artifact was not toggled.
///
/// # Errors
///
/// Returns an error if an artifact directory cannot be read, a toggle tool
/// cannot be run, or `out` cannot be written.
pub fn run_with(
    apache: &Apache,
    command: &Command,
    json: bool,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let succeeded = match command {
        Command::ListSites => sites::list(apache, json, out)?,
        Command::SiteEnabled(arg) => {
            single::enabled(apache, ArtifactClass::Site, &arg.name, json, out)?
        }
        Command::EnableSites(opts) => sites::toggle(apache, Verb::Enable, opts, json, out)?,
        Command::DisableSites(opts) => sites::toggle(apache, Verb::Disable, opts, json, out)?,
        Command::ModuleEnabled(arg) => {
            single::enabled(apache, ArtifactClass::Module, &arg.name, json, out)?
        }
        Command::EnableModule(arg) => {
            single::toggle(apache, ArtifactClass::Module, Verb::Enable, &arg.name, json, out)?
        }
        Command::DisableModule(arg) => {
            single::toggle(apache, ArtifactClass::Module, Verb::Disable, &arg.name, json, out)?
        }
        Command::ConfEnabled(arg) => {
            single::enabled(apache, ArtifactClass::Conf, &arg.name, json, out)?
        }
        Command::EnableConf(arg) => {
            single::toggle(apache, ArtifactClass::Conf, Verb::Enable, &arg.name, json, out)?
        }
        Command::DisableConf(arg) => {
            single::toggle(apache, ArtifactClass::Conf, Verb::Disable, &arg.name, json, out)?
        }
        Command::ShowConfig | Command::Completions(_) | Command::Version => {
            anyhow::bail!("command does not operate on artifacts")
        }
    };
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Write `value` as pretty JSON, or `text` followed by a newline.
fn emit<T: Serialize + ?Sized>(
    out: &mut dyn Write,
    json: bool,
    value: &T,
    text: &str,
) -> Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(value).context("failed to encode JSON")?;
        writeln!(out, "{rendered}")?;
    } else if !text.is_empty() {
        writeln!(out, "{text}")?;
    }
    Ok(())
}

/// Human-readable word for an enabled flag.
const fn state_word(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}
