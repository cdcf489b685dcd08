//! Command: print version information.
use std::io::{self, Write};

/// Version string: the build-time `A2TOGGLE_VERSION` if set, else the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("A2TOGGLE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the a2toggle version to `out`.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn run(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "a2toggle {}", version())
}
