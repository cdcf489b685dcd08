//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "a2toggle",
    about = "Inspect and toggle Apache sites, modules and conf fragments",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "A2TOGGLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the Apache server root (default /etc/apache2)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Kill a toggle tool after this many seconds (0 waits forever)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available sites and whether each is enabled
    ListSites,
    /// Report whether a site is enabled
    SiteEnabled(NameArg),
    /// Enable one or more sites
    EnableSites(SitesOpts),
    /// Disable one or more sites
    DisableSites(SitesOpts),
    /// Report whether a module is enabled
    ModuleEnabled(NameArg),
    /// Enable a module
    EnableModule(NameArg),
    /// Disable a module
    DisableModule(NameArg),
    /// Report whether a conf fragment is enabled
    ConfEnabled(NameArg),
    /// Enable a conf fragment
    EnableConf(NameArg),
    /// Disable a conf fragment
    DisableConf(NameArg),
    /// Print the resolved configuration as TOML
    ShowConfig,
    /// Generate shell completions
    Completions(CompletionsOpts),
    /// Print version information
    Version,
}

/// A single artifact name.
#[derive(Args, Debug, Clone)]
pub struct NameArg {
    /// Artifact name as it appears in the available directory
    pub name: String,
}

/// Options for `enable-sites` and `disable-sites`.
#[derive(Args, Debug, Clone)]
pub struct SitesOpts {
    /// Site to toggle first
    pub name: Option<String>,

    /// Further sites to toggle
    #[arg(long, value_delimiter = ',')]
    pub sites: Vec<String>,
}

/// Options for the `completions` subcommand.
#[derive(Args, Debug, Clone)]
pub struct CompletionsOpts {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_list_sites_json() {
        let cli = Cli::parse_from(["a2toggle", "--json", "list-sites"]);
        assert!(cli.global.json);
        assert!(matches!(cli.command, Command::ListSites));
    }

    #[test]
    fn parse_enable_sites_with_primary_and_list() {
        let cli = Cli::parse_from(["a2toggle", "enable-sites", "example.com", "--sites", "a,b"]);
        let Command::EnableSites(opts) = cli.command else {
            panic!("expected enable-sites");
        };
        assert_eq!(opts.name.as_deref(), Some("example.com"));
        assert_eq!(opts.sites, vec!["a", "b"]);
    }

    #[test]
    fn parse_disable_sites_without_names() {
        let cli = Cli::parse_from(["a2toggle", "disable-sites"]);
        let Command::DisableSites(opts) = cli.command else {
            panic!("expected disable-sites");
        };
        assert!(opts.name.is_none());
        assert!(opts.sites.is_empty());
    }

    #[test]
    fn parse_module_commands() {
        let cli = Cli::parse_from(["a2toggle", "enable-module", "rewrite"]);
        assert!(matches!(&cli.command, Command::EnableModule(arg) if arg.name == "rewrite"));
        let cli = Cli::parse_from(["a2toggle", "module-enabled", "ssl"]);
        assert!(matches!(&cli.command, Command::ModuleEnabled(arg) if arg.name == "ssl"));
    }

    #[test]
    fn name_is_required_for_single_toggles() {
        assert!(Cli::try_parse_from(["a2toggle", "disable-conf"]).is_err());
    }

    #[test]
    fn parse_root_and_timeout_after_subcommand() {
        let cli = Cli::parse_from([
            "a2toggle",
            "conf-enabled",
            "security",
            "--root",
            "/tmp/apache",
            "--timeout",
            "5",
        ]);
        assert_eq!(cli.global.root, Some(PathBuf::from("/tmp/apache")));
        assert_eq!(cli.global.timeout, Some(5));
    }

    #[test]
    fn parse_completions() {
        let cli = Cli::parse_from(["a2toggle", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Command::Completions(CompletionsOpts { shell: Shell::Bash })
        ));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["a2toggle", "-v", "version"]);
        assert!(cli.verbose);
    }
}
