//! Sanity checks for merged configuration.
use std::fmt;

use super::{ClassConfig, Config};
use crate::enablement::{ArtifactClass, Verb};

/// A problem detected in the merged configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Config section the problem belongs to (`sites`, `modules`, `confs`).
    pub section: String,
    /// The specific setting that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    #[must_use]
    fn new(section: impl Into<String>, item: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.section, self.item, self.message)
    }
}

/// Check every class section of `config`.
#[must_use]
pub fn validate(config: &Config) -> Vec<ValidationWarning> {
    ArtifactClass::ALL
        .iter()
        .flat_map(|class| validate_class(Config::section_name(*class), config.class(*class)))
        .collect()
}

fn validate_class(section: &str, class: &ClassConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for verb in [Verb::Enable, Verb::Disable] {
        if class.tools.for_verb(verb).trim().is_empty() {
            warnings.push(ValidationWarning::new(
                section,
                format!("{verb}_tool"),
                "program name is empty",
            ));
        }

        let table = class.exit_codes.for_verb(verb);
        if table.success.is_empty() {
            warnings.push(ValidationWarning::new(
                section,
                format!("{verb}_codes.success"),
                "at least one success code is required",
            ));
        }
        for code in table.success.iter().filter(|c| table.not_found.contains(*c)) {
            warnings.push(ValidationWarning::new(
                section,
                format!("{verb}_codes"),
                format!("code {code} listed as both success and not_found"),
            ));
        }
    }

    if let Some(rule) = &class.pair.special_case {
        if rule.name.is_empty() {
            warnings.push(ValidationWarning::new(
                section,
                "special_case.name",
                "artifact name is empty",
            ));
        }
        if rule.prefix.is_empty() {
            warnings.push(ValidationWarning::new(
                section,
                "special_case.prefix",
                "prefix is empty, so the alternate link equals the plain one",
            ));
        }
    }

    if class.pair.available_dir == class.pair.enabled_dir {
        warnings.push(ValidationWarning::new(
            section,
            "enabled_dir",
            "enabled directory is the same as the available directory",
        ));
    }

    warnings
}
