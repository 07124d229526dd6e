//! Classified-leaf validation.
//!
//! Catches leaf sets that would produce broken generated code: names that
//! sanitize to an empty identifier, distinct names that sanitize to the same
//! identifier, and malformed option forms.
//!
//! # Examples
//!
//! ```
//! use docopt_codegen_core::*;
//!
//! let leaves = ClassifiedLeaves {
//!     commands: vec![Command::new("show")],
//!     flags: vec![OptionSpec::new(Some("-p"), Some("--plain-text"), 0)],
//!     ..ClassifiedLeaves::default()
//! };
//! assert!(validate_leaves(&leaves).is_empty());
//!
//! // Command `plain-text` and flag `--plain-text` share the field `plain_text`.
//! let mut clash = leaves.clone();
//! clash.commands.push(Command::new("plain-text"));
//! let errors = validate_leaves(&clash);
//! assert!(errors.iter().any(|e| matches!(e, ValidationError::IdentifierCollision { .. })));
//! ```

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::{ClassifiedLeaves, OptionSpec, field_identifier};

/// Classified-leaf validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Leaf name has no alphanumeric characters (e.g. the `--` separator).
    #[error("leaf '{0}' has no usable field identifier")]
    EmptyIdentifier(String),
    /// Two leaves map to the same generated field.
    #[error("leaves '{first}' and '{second}' both map to field '{identifier}'")]
    IdentifierCollision {
        identifier: String,
        first: String,
        second: String,
    },
    /// Two leaves share a name.
    #[error("duplicate leaf: {0}")]
    DuplicateLeaf(String),
    /// Short option not of the form `-x`.
    #[error("invalid short option format: {0}")]
    InvalidShortOption(String),
    /// Long option not of the form `--word`.
    #[error("invalid long option format: {0}")]
    InvalidLongOption(String),
    /// An option has neither short nor long form.
    #[error("option must define short or long form")]
    MissingOptionName,
}

/// Validates classified leaves, reporting every problem found.
pub fn validate_leaves(leaves: &ClassifiedLeaves) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen_names: HashSet<&str> = HashSet::new();
    let mut identifiers: HashMap<String, &str> = HashMap::new();

    for leaf in leaves.iter() {
        let name = leaf.name();
        if !seen_names.insert(name) {
            errors.push(ValidationError::DuplicateLeaf(name.to_string()));
            continue;
        }

        let identifier = field_identifier(name);
        if identifier.is_empty() {
            errors.push(ValidationError::EmptyIdentifier(name.to_string()));
            continue;
        }
        match identifiers.get(&identifier) {
            Some(first) => errors.push(ValidationError::IdentifierCollision {
                identifier: identifier.clone(),
                first: first.to_string(),
                second: name.to_string(),
            }),
            None => {
                identifiers.insert(identifier, name);
            }
        }
    }

    for option in leaves.all_options() {
        errors.extend(validate_option(option));
    }

    errors
}

fn validate_option(option: &OptionSpec) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if option.short.is_none() && option.long.is_none() {
        errors.push(ValidationError::MissingOptionName);
        return errors;
    }

    if let Some(short) = &option.short {
        if !short.starts_with('-') || short.starts_with("--") || short.len() < 2 {
            errors.push(ValidationError::InvalidShortOption(short.clone()));
        }
    }

    if let Some(long) = &option.long {
        if !long.starts_with("--") || long.len() < 3 {
            errors.push(ValidationError::InvalidLongOption(long.clone()));
        }
    }

    errors
}
