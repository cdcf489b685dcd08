//! Apache enablement engine.
//!
//! Sites, modules and conf fragments are enabled on Debian-style Apache
//! installations by symlinking an entry of an `*-available` directory into
//! the matching `*-enabled` directory.  This crate observes that state,
//! changes it through the distribution's `a2en*`/`a2dis*` tools, and reports
//! exactly what a toggle changed.
//!
//! The public API is organised into layers:
//!
//! - **[`enablement`]**: observe, toggle, classify and reconcile one artifact class
//! - **[`apache`]**: the three classes wired together from configuration
//! - **[`config`]**: built-in Debian defaults and TOML overrides
//! - **[`exec`]** / **[`fs`]**: the process and filesystem seams the engine runs against
//! - **[`commands`]**: top-level subcommand orchestration for the CLI
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod apache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod enablement;
pub mod error;
pub mod exec;
pub mod fs;
pub mod logging;
