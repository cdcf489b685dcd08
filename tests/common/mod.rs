// Shared helpers for integration tests.
//
// Provides a temporary Apache server root with the six available/enabled
// directories, a fluent builder to populate it, and a fake set of
// `a2en*`/`a2dis*` tools that manipulate the symlinks the way the Debian
// scripts do.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use a2toggle::apache::Apache;
use a2toggle::config::Config;
use a2toggle::enablement::ArtifactClass;
use a2toggle::error::ExecError;
use a2toggle::exec::{ExecResult, Executor};
use a2toggle::fs::SystemFs;

const DIRS: [&str; 6] = [
    "sites-available",
    "sites-enabled",
    "mods-available",
    "mods-enabled",
    "conf-available",
    "conf-enabled",
];

/// An isolated Apache server root backed by a [`tempfile::TempDir`].
pub struct ApacheTree {
    /// Temporary directory acting as the server root.
    pub root: tempfile::TempDir,
}

impl ApacheTree {
    /// Server root with the six empty class directories.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        for dir in DIRS {
            fs::create_dir_all(root.path().join(dir)).expect("create class dir");
        }
        Self { root }
    }

    /// Path to the server root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Available directory for `class`.
    pub fn available(&self, class: ArtifactClass) -> PathBuf {
        self.root_path()
            .join(format!("{}-available", class.dir_stem()))
    }

    /// Enabled directory for `class`.
    pub fn enabled(&self, class: ArtifactClass) -> PathBuf {
        self.root_path().join(format!("{}-enabled", class.dir_stem()))
    }

    /// Whether `link` exists as a symlink in the enabled directory of `class`.
    pub fn has_link(&self, class: ArtifactClass, link: &str) -> bool {
        self.enabled(class)
            .join(link)
            .symlink_metadata()
            .is_ok_and(|m| m.file_type().is_symlink())
    }

    /// Default configuration rooted at this tree.
    pub fn config(&self) -> Config {
        Config::defaults(self.root_path())
    }

    /// Engine over this tree driven by `tools`.
    pub fn apache(&self, tools: &Arc<FakeA2Tools>) -> Apache {
        Apache::new(&self.config(), Arc::clone(tools) as Arc<dyn Executor>, Arc::new(SystemFs))
    }
}

/// Fluent builder for [`ApacheTree`].
pub struct ApacheTreeBuilder {
    available: Vec<(ArtifactClass, String)>,
    links: Vec<(ArtifactClass, String, String)>,
}

impl ApacheTreeBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self {
            available: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Add an available, disabled artifact.
    pub fn available(mut self, class: ArtifactClass, name: &str) -> Self {
        self.available.push((class, name.to_string()));
        self
    }

    /// Add an available artifact linked under its own name.
    pub fn enabled(self, class: ArtifactClass, name: &str) -> Self {
        self.enabled_as(class, name, name)
    }

    /// Add an available artifact linked under `link`.
    pub fn enabled_as(mut self, class: ArtifactClass, name: &str, link: &str) -> Self {
        self.available.push((class, name.to_string()));
        self.links
            .push((class, name.to_string(), link.to_string()));
        self
    }

    /// Create the tree on disk.
    pub fn build(self) -> ApacheTree {
        let tree = ApacheTree::new();
        for (class, name) in &self.available {
            fs::write(tree.available(*class).join(name), "# test\n").expect("write artifact");
        }
        for (class, name, link) in &self.links {
            symlink(tree.available(*class).join(name), tree.enabled(*class).join(link))
                .expect("create link");
        }
        tree
    }
}

/// Stand-in for the Debian `a2en*`/`a2dis*` scripts.
///
/// Each invocation processes every argument, creating or removing symlinks
/// in the tree.  An unknown name is reported on stderr and makes the
/// invocation exit non-zero: `1` when enabling, and when disabling `1` for
/// sites but `256` for modules and conf fragments.
pub struct FakeA2Tools {
    root: PathBuf,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeA2Tools {
    /// Tools operating on `tree`.
    pub fn new(tree: &ApacheTree) -> Arc<Self> {
        Arc::new(Self {
            root: tree.root_path().to_path_buf(),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Every invocation so far as `(program, args)`.
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn lookup(program: &str) -> Option<(ArtifactClass, bool)> {
        match program {
            "a2ensite" => Some((ArtifactClass::Site, true)),
            "a2dissite" => Some((ArtifactClass::Site, false)),
            "a2enmod" => Some((ArtifactClass::Module, true)),
            "a2dismod" => Some((ArtifactClass::Module, false)),
            "a2enconf" => Some((ArtifactClass::Conf, true)),
            "a2disconf" => Some((ArtifactClass::Conf, false)),
            _ => None,
        }
    }

    fn link_name(class: ArtifactClass, name: &str) -> String {
        if class == ArtifactClass::Site && name == "default" {
            "000-default".to_string()
        } else {
            name.to_string()
        }
    }
}

impl Executor for FakeA2Tools {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult, ExecError> {
        self.calls.lock().expect("calls lock").push((
            program.to_string(),
            args.iter().map(ToString::to_string).collect(),
        ));

        let Some((class, enable)) = Self::lookup(program) else {
            return Err(ExecError::Spawn {
                program: program.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        };

        let available = self.root.join(format!("{}-available", class.dir_stem()));
        let enabled = self.root.join(format!("{}-enabled", class.dir_stem()));
        let mut stderr = String::new();
        let mut missing = false;

        for name in args {
            let source = available.join(name);
            let link = enabled.join(Self::link_name(class, name));
            if enable {
                if !source.exists() {
                    stderr.push_str(&format!("ERROR: {} {name} does not exist!\n", class.label()));
                    missing = true;
                } else if link.symlink_metadata().is_err() {
                    symlink(&source, &link).expect("create link");
                }
            } else {
                let plain = enabled.join(name);
                if link.symlink_metadata().is_ok() {
                    fs::remove_file(&link).expect("remove link");
                } else if plain.symlink_metadata().is_ok() {
                    fs::remove_file(&plain).expect("remove link");
                } else {
                    stderr.push_str(&format!("ERROR: {} {name} is not enabled\n", class.label()));
                    missing = true;
                }
            }
        }

        let code = match (missing, enable, class) {
            (false, _, _) => 0,
            (true, false, ArtifactClass::Module | ArtifactClass::Conf) => 256,
            (true, _, _) => 1,
        };
        Ok(ExecResult {
            stdout: String::new(),
            stderr,
            success: code == 0,
            code: Some(code),
        })
    }
}
