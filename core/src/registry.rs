//! Registry of the options a grammar declares.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::OptionSpec;

/// Ordered collection of every option known to a grammar.
///
/// Populated from the options section first, then from options that only
/// appear in usage lines. Once parsing finishes the registry is treated as
/// read-only.
///
/// # Examples
///
/// ```
/// use docopt_codegen_core::{OptionSpec, OptionsRegistry};
///
/// let mut registry = OptionsRegistry::new();
/// registry.register(OptionSpec::new(Some("-z"), Some("--no-control"), 0));
/// registry.register(OptionSpec::new(None, Some("--angle"), 1));
///
/// assert_eq!(registry.len(), 2);
/// assert_eq!(registry.with_long("--angle").len(), 1);
/// let names: Vec<_> = registry.sorted_unique().iter().map(|o| o.name().to_string()).collect();
/// assert_eq!(names, vec!["--angle", "--no-control"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionsRegistry {
    options: Vec<OptionSpec>,
}

impl OptionsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an option, keeping declaration order.
    pub fn register(&mut self, option: OptionSpec) {
        self.options.push(option);
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionSpec> {
        self.options.iter()
    }

    /// Options whose long form equals `long`.
    pub fn with_long(&self, long: &str) -> Vec<&OptionSpec> {
        self.options
            .iter()
            .filter(|option| option.long.as_deref() == Some(long))
            .collect()
    }

    /// Options whose short form equals `short`.
    pub fn with_short(&self, short: &str) -> Vec<&OptionSpec> {
        self.options
            .iter()
            .filter(|option| option.short.as_deref() == Some(short))
            .collect()
    }

    /// Returns the options sorted by name, keeping the first declaration of
    /// any repeated name.
    pub fn sorted_unique(&self) -> Vec<OptionSpec> {
        let mut seen = HashSet::new();
        let mut unique: Vec<OptionSpec> = self
            .options
            .iter()
            .filter(|option| seen.insert(option.name().to_string()))
            .cloned()
            .collect();
        unique.sort_by(|a, b| a.name().cmp(b.name()));
        unique
    }
}

impl FromIterator<OptionSpec> for OptionsRegistry {
    fn from_iter<I: IntoIterator<Item = OptionSpec>>(iter: I) -> Self {
        Self {
            options: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_sorted_unique_keeps_first_declaration() {
        let registry: OptionsRegistry = [
            OptionSpec::new(None, Some("--step"), 1).with_value(Value::from("0.8")),
            OptionSpec::new(None, Some("--impulse"), 0),
            OptionSpec::new(None, Some("--step"), 1).with_value(Value::from("0.5")),
        ]
        .into_iter()
        .collect();

        let unique = registry.sorted_unique();
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].name(), "--impulse");
        assert_eq!(unique[1].value, Value::from("0.8"));
    }

    #[test]
    fn test_with_short_matches_only_short_form() {
        let mut registry = OptionsRegistry::new();
        registry.register(OptionSpec::new(Some("-p"), Some("--plain-text"), 0));
        assert_eq!(registry.with_short("-p").len(), 1);
        assert!(registry.with_short("--plain-text").is_empty());
        assert!(registry.with_long("-p").is_empty());
    }
}
