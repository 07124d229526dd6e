//! Pattern tree type definitions.
//!
//! This module defines the data model produced by parsing a usage grammar:
//! terminal leaves ([`Command`], [`Argument`], [`OptionSpec`]), the
//! [`Value`] they carry as their default, and the recursive [`PatternNode`]
//! tree that groups them. All types serialize with [`serde`] so the tree can
//! be inspected as JSON or YAML.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default value carried by a leaf.
///
/// Commands and flags default to `Bool(false)`, arguments and value options
/// to `Null` unless the options section declares a `[default: ...]`.
/// `Number` and `List` are not produced by the grammar parser itself but can
/// appear in programmatically built leaves; emit targets decide which kinds
/// they can render.
///
/// # Examples
///
/// ```
/// use docopt_codegen_core::Value;
///
/// assert_eq!(Value::from("5"), Value::Text("5".to_string()));
/// assert_eq!(Value::from(false).to_string(), "false");
/// assert_eq!(Value::Null.to_string(), "null");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// No value (rendered as the target's null literal).
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Number(i64),
    /// Text value.
    Text(String),
    /// Several text values.
    List(Vec<String>),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Option<&str>> for Value {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Value::Null, Value::from)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(raw) => f.write_str(&raw),
            Err(_) => write!(f, "{self:?}"),
        }
    }
}

/// A literal positional keyword (e.g. `show` in `prog motor show`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    pub value: Value,
}

impl Command {
    /// Creates a command leaf defaulting to `false`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: Value::Bool(false),
        }
    }
}

/// A positional placeholder (`<name>` or `NAME`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    pub value: Value,
}

impl Argument {
    /// Creates an argument leaf defaulting to null.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: Value::Null,
        }
    }
}

/// A flag (`argcount == 0`) or an option taking a value (`argcount == 1`).
///
/// At least one of `short` / `long` is expected to be present; the long form
/// wins when naming the leaf.
///
/// # Examples
///
/// ```
/// use docopt_codegen_core::{OptionSpec, Value};
///
/// let plain = OptionSpec::new(Some("-p"), Some("--plain-text"), 0);
/// assert_eq!(plain.name(), "--plain-text");
/// assert_eq!(plain.value, Value::Bool(false));
/// assert!(!plain.takes_value());
///
/// let iters = OptionSpec::new(Some("-t"), None, 1).with_value(Value::from("3"));
/// assert_eq!(iters.name(), "-t");
/// assert!(iters.takes_value());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Short form (e.g. "-p")
    pub short: Option<String>,
    /// Long form (e.g. "--plain-text")
    pub long: Option<String>,
    /// Number of values the option consumes (0 or 1)
    pub argcount: u8,
    /// Default value
    pub value: Value,
}

impl OptionSpec {
    /// Creates an option with the conventional default for its arity:
    /// `false` for flags, null for options taking a value.
    pub fn new(short: Option<&str>, long: Option<&str>, argcount: u8) -> Self {
        Self {
            short: short.map(String::from),
            long: long.map(String::from),
            argcount,
            value: if argcount == 0 {
                Value::Bool(false)
            } else {
                Value::Null
            },
        }
    }

    /// Replaces the default value.
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = value;
        self
    }

    /// Returns the leaf name: the long form when present, else the short form.
    pub fn name(&self) -> &str {
        self.long
            .as_deref()
            .or(self.short.as_deref())
            .unwrap_or("")
    }

    /// Returns `true` when the option consumes a value.
    pub fn takes_value(&self) -> bool {
        self.argcount > 0
    }
}

/// Category of a terminal node after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafKind {
    Command,
    Argument,
    /// Option without a value.
    Flag,
    /// Option with a value.
    Option,
}

impl LeafKind {
    /// Human-readable label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            LeafKind::Command => "command",
            LeafKind::Argument => "argument",
            LeafKind::Flag => "flag",
            LeafKind::Option => "option",
        }
    }
}

/// A terminal node of the pattern tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Leaf {
    Command(Command),
    Argument(Argument),
    Option(OptionSpec),
}

impl Leaf {
    /// Display key and deduplication key of the leaf.
    pub fn name(&self) -> &str {
        match self {
            Leaf::Command(command) => &command.name,
            Leaf::Argument(argument) => &argument.name,
            Leaf::Option(option) => option.name(),
        }
    }

    pub fn value(&self) -> &Value {
        match self {
            Leaf::Command(command) => &command.value,
            Leaf::Argument(argument) => &argument.value,
            Leaf::Option(option) => &option.value,
        }
    }

    pub fn kind(&self) -> LeafKind {
        match self {
            Leaf::Command(_) => LeafKind::Command,
            Leaf::Argument(_) => LeafKind::Argument,
            Leaf::Option(option) if option.takes_value() => LeafKind::Option,
            Leaf::Option(_) => LeafKind::Flag,
        }
    }
}

/// Node of the parsed usage pattern.
///
/// Grouping nodes own their children in source order. `Repeated` wraps the
/// element(s) preceding an ellipsis and keeps them visible to leaf
/// collection. `OptionsShortcut` stands for "any registered option".
///
/// # Examples
///
/// ```
/// use docopt_codegen_core::{Command, Leaf, OptionSpec, PatternNode};
///
/// // prog show [--plain-text]
/// let tree = PatternNode::Required(vec![
///     PatternNode::Leaf(Leaf::Command(Command::new("show"))),
///     PatternNode::Optional(vec![PatternNode::Leaf(Leaf::Option(OptionSpec::new(
///         None,
///         Some("--plain-text"),
///         0,
///     )))]),
/// ]);
/// assert_eq!(tree.children().len(), 2);
/// assert_eq!(tree.leaf_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternNode {
    Leaf(Leaf),
    Required(Vec<PatternNode>),
    Optional(Vec<PatternNode>),
    Either(Vec<PatternNode>),
    Repeated(Vec<PatternNode>),
    OptionsShortcut,
}

impl PatternNode {
    /// Child nodes of a grouping node; empty for leaves and the shortcut.
    pub fn children(&self) -> &[PatternNode] {
        match self {
            PatternNode::Required(children)
            | PatternNode::Optional(children)
            | PatternNode::Either(children)
            | PatternNode::Repeated(children) => children,
            PatternNode::Leaf(_) | PatternNode::OptionsShortcut => &[],
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            PatternNode::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Counts terminal nodes reachable from this node, duplicates included.
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.as_leaf().is_some() {
                count += 1;
            }
            stack.extend(node.children());
        }
        count
    }
}

/// Converts a leaf name into an identifier usable as a generated field name.
///
/// Every non-alphanumeric character becomes `_`, then leading and trailing
/// underscores are removed.
///
/// # Examples
///
/// ```
/// use docopt_codegen_core::field_identifier;
///
/// assert_eq!(field_identifier("--plain-text"), "plain_text");
/// assert_eq!(field_identifier("<file>"), "file");
/// assert_eq!(field_identifier("out-and-back"), "out_and_back");
/// assert_eq!(field_identifier("--"), "");
/// ```
pub fn field_identifier(name: &str) -> String {
    let mapped: String = name
        .chars()
        .map(|ch| if ch.is_alphanumeric() { ch } else { '_' })
        .collect();
    mapped.trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_kind_splits_options_by_argcount() {
        let flag = Leaf::Option(OptionSpec::new(Some("-p"), None, 0));
        let option = Leaf::Option(OptionSpec::new(None, Some("--iters"), 1));
        assert_eq!(flag.kind(), LeafKind::Flag);
        assert_eq!(option.kind(), LeafKind::Option);
        assert_eq!(Leaf::Command(Command::new("show")).kind(), LeafKind::Command);
    }

    #[test]
    fn test_value_serializes_untagged() {
        let raw = serde_json::to_string(&vec![
            Value::Null,
            Value::Bool(true),
            Value::Number(3),
            Value::from("1.0"),
        ])
        .unwrap();
        assert_eq!(raw, r#"[null,true,3,"1.0"]"#);
    }

    #[test]
    fn test_leaf_serializes_with_kind_tag() {
        let leaf = Leaf::Argument(Argument::new("<file>"));
        let json = serde_json::to_value(&leaf).unwrap();
        assert_eq!(json["kind"], "argument");
        assert_eq!(json["name"], "<file>");
    }

    #[test]
    fn test_leaf_count_includes_nested_duplicates() {
        let show = PatternNode::Leaf(Leaf::Command(Command::new("show")));
        let tree = PatternNode::Either(vec![
            PatternNode::Required(vec![show.clone()]),
            PatternNode::Repeated(vec![show, PatternNode::OptionsShortcut]),
        ]);
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn test_option_name_empty_without_forms() {
        let option = OptionSpec::new(None, None, 0);
        assert_eq!(option.name(), "");
    }
}
