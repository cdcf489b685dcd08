//! Apache-facing operations over sites, modules and conf fragments.
use std::sync::Arc;

use crate::config::Config;
use crate::enablement::{
    ArtifactClass, EnablementState, ReconciliationResult, Reconciler, SingleToggleResult, Verb,
};
use crate::error::EnablementError;
use crate::exec::{Executor, SystemExecutor};
use crate::fs::{FsObserver, SystemFs};

/// One [`Reconciler`] per artifact class, built from a [`Config`].
#[derive(Debug)]
pub struct Apache {
    sites: Reconciler,
    modules: Reconciler,
    confs: Reconciler,
}

impl Apache {
    /// Build the reconcilers with the given collaborators.
    #[must_use]
    pub fn new(config: &Config, executor: Arc<dyn Executor>, fs: Arc<dyn FsObserver>) -> Self {
        let build = |class| {
            Reconciler::new(
                class,
                config.class(class),
                Arc::clone(&executor),
                Arc::clone(&fs),
            )
        };
        Self {
            sites: build(ArtifactClass::Site),
            modules: build(ArtifactClass::Module),
            confs: build(ArtifactClass::Conf),
        }
    }

    /// Build against the real filesystem and process table, honouring the
    /// configured tool timeout.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config,
            Arc::new(SystemExecutor::with_timeout(config.timeout())),
            Arc::new(SystemFs),
        )
    }

    /// Reconciler for `class`.
    #[must_use]
    pub const fn reconciler(&self, class: ArtifactClass) -> &Reconciler {
        match class {
            ArtifactClass::Site => &self.sites,
            ArtifactClass::Module => &self.modules,
            ArtifactClass::Conf => &self.confs,
        }
    }

    /// Every available site with its enabled flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the sites directories cannot be read.
    pub fn list_sites(&self) -> Result<EnablementState, EnablementError> {
        self.sites.observe()
    }

    /// Whether site `name` is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the enabled directory cannot be inspected.
    pub fn is_site_enabled(&self, name: &str) -> Result<bool, EnablementError> {
        self.sites.is_enabled(name)
    }

    /// Enable `name` followed by `names`, reporting what changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the sites directories cannot be read or the tool
    /// cannot be run.
    pub fn enable_sites(
        &self,
        name: Option<&str>,
        names: &[String],
    ) -> Result<ReconciliationResult, EnablementError> {
        self.sites.toggle(Verb::Enable, name, names)
    }

    /// Disable `name` followed by `names`, reporting what changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the sites directories cannot be read or the tool
    /// cannot be run.
    pub fn disable_sites(
        &self,
        name: Option<&str>,
        names: &[String],
    ) -> Result<ReconciliationResult, EnablementError> {
        self.sites.toggle(Verb::Disable, name, names)
    }

    /// Whether module `name` is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the enabled directory cannot be inspected.
    pub fn is_module_enabled(&self, name: &str) -> Result<bool, EnablementError> {
        self.modules.is_enabled(name)
    }

    /// Enable module `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot be run.
    pub fn enable_module(&self, name: &str) -> Result<SingleToggleResult, EnablementError> {
        self.modules.toggle_single(Verb::Enable, name)
    }

    /// Disable module `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot be run.
    pub fn disable_module(&self, name: &str) -> Result<SingleToggleResult, EnablementError> {
        self.modules.toggle_single(Verb::Disable, name)
    }

    /// Whether conf fragment `name` is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the enabled directory cannot be inspected.
    pub fn is_config_enabled(&self, name: &str) -> Result<bool, EnablementError> {
        self.confs.is_enabled(name)
    }

    /// Enable conf fragment `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot be run.
    pub fn enable_config(&self, name: &str) -> Result<SingleToggleResult, EnablementError> {
        self.confs.toggle_single(Verb::Enable, name)
    }

    /// Disable conf fragment `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot be run.
    pub fn disable_config(&self, name: &str) -> Result<SingleToggleResult, EnablementError> {
        self.confs.toggle_single(Verb::Disable, name)
    }
}
