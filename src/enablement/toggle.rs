//! Toggle tool invocation.
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Verb;
use crate::error::ExecError;
use crate::exec::Executor;

/// Exit code recorded when the tool was terminated by a signal.
pub const SIGNALLED_EXIT_CODE: i32 = -1;

/// Executable names for the two verbs of one artifact class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleTools {
    /// Program run to enable artifacts (e.g. `a2ensite`).
    pub enable: String,
    /// Program run to disable artifacts (e.g. `a2dissite`).
    pub disable: String,
}

impl ToggleTools {
    /// Build from the enable and disable program names.
    #[must_use]
    pub fn new(enable: impl Into<String>, disable: impl Into<String>) -> Self {
        Self {
            enable: enable.into(),
            disable: disable.into(),
        }
    }

    /// Program for `verb`.
    #[must_use]
    pub fn for_verb(&self, verb: Verb) -> &str {
        match verb {
            Verb::Enable => &self.enable,
            Verb::Disable => &self.disable,
        }
    }
}

/// What one toggle tool invocation reported, uninterpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleOutcome {
    /// Names passed to the tool, in order.
    pub artifact_names: Vec<String>,
    /// Direction of the toggle.
    pub verb: Verb,
    /// Exit code, or [`SIGNALLED_EXIT_CODE`] when killed by a signal.
    pub raw_exit_code: i32,
    /// Standard error, verbatim.
    pub stderr_text: String,
}

impl ToggleOutcome {
    /// Whether the tool exited with status zero.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.raw_exit_code == 0
    }
}

/// Runs the enable/disable tool of one artifact class.
#[derive(Clone)]
pub struct ToggleExecutor {
    tools: ToggleTools,
    executor: Arc<dyn Executor>,
}

impl fmt::Debug for ToggleExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleExecutor")
            .field("tools", &self.tools)
            .finish_non_exhaustive()
    }
}

impl ToggleExecutor {
    /// Create a toggle executor running `tools` through `executor`.
    #[must_use]
    pub fn new(tools: ToggleTools, executor: Arc<dyn Executor>) -> Self {
        Self { tools, executor }
    }

    /// The configured programs.
    #[must_use]
    pub const fn tools(&self) -> &ToggleTools {
        &self.tools
    }

    /// Run the `verb` tool with one argv element per name.
    ///
    /// An empty `names` runs the bare tool.
    ///
    /// # Errors
    ///
    /// Returns an error only when the tool could not be run to completion;
    /// a non-zero exit is reported in the outcome.
    pub fn run(&self, verb: Verb, names: &[String]) -> Result<ToggleOutcome, ExecError> {
        let program = self.tools.for_verb(verb);
        let args: Vec<&str> = names.iter().map(String::as_str).collect();
        debug!(program, ?args, "invoking toggle tool");

        let result = self.executor.run(program, &args)?;
        let outcome = ToggleOutcome {
            artifact_names: names.to_vec(),
            verb,
            raw_exit_code: result.code.unwrap_or(SIGNALLED_EXIT_CODE),
            stderr_text: result.stderr,
        };
        debug!(program, code = outcome.raw_exit_code, "toggle tool exited");
        Ok(outcome)
    }
}
