//! Template loading and safe placeholder substitution.
//!
//! Templates use `$name` / `${name}` placeholders (identifiers of ASCII
//! letters, digits and `_`, not starting with a digit) and `$$` for a
//! literal dollar sign. Substitution never fails: a placeholder with no
//! value, or a `$` that starts no valid placeholder, is copied through
//! unchanged so partial templates still render.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::error::{CompileError, Result};

/// Placeholder values keyed by placeholder name.
pub type TemplateValues = BTreeMap<String, String>;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:(\$)|([_A-Za-z][_A-Za-z0-9]*)|\{([_A-Za-z][_A-Za-z0-9]*)\}|)")
        .expect("static regex must compile")
});

const BUNDLED_HEADER: &str = include_str!("../templates/template.h");
const BUNDLED_SOURCE: &str = include_str!("../templates/template.c");

/// Substitutes every known placeholder in `template`.
///
/// # Examples
///
/// ```
/// use docopt_codegen::template::{TemplateValues, safe_substitute};
///
/// let mut values = TemplateValues::new();
/// values.insert("module".to_string(), "CONSOLE_H".to_string());
///
/// let out = safe_substitute("#ifndef $module /* ${module} $$ $missing */", &values);
/// assert_eq!(out, "#ifndef CONSOLE_H /* CONSOLE_H $ $missing */");
/// ```
pub fn safe_substitute(template: &str, values: &TemplateValues) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            if caps.get(1).is_some() {
                return "$".to_string();
            }
            caps.get(2)
                .or_else(|| caps.get(3))
                .and_then(|name| values.get(name.as_str()))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Placeholder names in `template` that `values` does not provide, in order
/// of first appearance.
pub fn unresolved_placeholders(template: &str, values: &TemplateValues) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(template) {
        let Some(name) = caps.get(2).or_else(|| caps.get(3)) else {
            continue;
        };
        let name = name.as_str();
        if !values.contains_key(name) && !missing.iter().any(|m| m == name) {
            missing.push(name.to_string());
        }
    }
    missing
}

/// The header and source templates of one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    pub header: String,
    pub source: String,
}

impl Templates {
    /// The C templates compiled into this crate.
    pub fn bundled() -> Self {
        Self {
            header: BUNDLED_HEADER.to_string(),
            source: BUNDLED_SOURCE.to_string(),
        }
    }

    /// Reads `<base>.h` and `<base>.c`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Io`] naming the template that could not be
    /// read.
    pub fn load(base: impl AsRef<Path>) -> Result<Self> {
        let base = base.as_ref();
        let header_path = with_suffix(base, ".h");
        let source_path = with_suffix(base, ".c");
        debug!(header = %header_path.display(), source = %source_path.display(), "Loading templates");

        let header = std::fs::read_to_string(&header_path)
            .map_err(|e| CompileError::io(&header_path, e))?;
        let source = std::fs::read_to_string(&source_path)
            .map_err(|e| CompileError::io(&source_path, e))?;
        Ok(Self { header, source })
    }

    /// Renders both templates, logging placeholders left unresolved.
    pub fn render(&self, header: &TemplateValues, source: &TemplateValues) -> (String, String) {
        for (name, template, values) in [
            ("header", &self.header, header),
            ("source", &self.source, source),
        ] {
            let missing = unresolved_placeholders(template, values);
            if !missing.is_empty() {
                debug!(template = name, placeholders = ?missing, "Unresolved template placeholders");
            }
        }
        (
            safe_substitute(&self.header, header),
            safe_substitute(&self.source, source),
        )
    }
}

/// Appends `suffix` to the final path component: `out/console` becomes
/// `out/console.h`, and `out/console.v2` becomes `out/console.v2.h`.
pub(crate) fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut path = base.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}
