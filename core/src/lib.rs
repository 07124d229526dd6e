//! Core types for the docopt code generator.
//!
//! This crate defines the data model shared by every stage of the
//! generator:
//!
//! - [`PatternNode`]: the parsed usage pattern, a tree of grouping nodes
//!   over terminal [`Leaf`] nodes ([`Command`], [`Argument`], [`OptionSpec`]).
//! - [`OptionsRegistry`]: every option the grammar declares, with defaults.
//! - [`ClassifiedLeaves`]: deduplicated, sorted leaves split into commands,
//!   arguments, flags, and options.
//! - [`SectionFragment`]: usage/help text sliced out for one subcommand.
//!
//! Validation ([`validate_leaves`]) catches leaf sets that would produce
//! broken generated code, such as two leaves mapping to one field name.
//!
//! # Example
//!
//! ```
//! use docopt_codegen_core::*;
//!
//! let leaves = ClassifiedLeaves {
//!     commands: vec![Command::new("cmd")],
//!     flags: vec![OptionSpec::new(None, Some("--flag"), 0)],
//!     ..ClassifiedLeaves::default()
//! };
//!
//! let fields: Vec<String> = leaves.iter().map(|leaf| field_identifier(leaf.name())).collect();
//! assert_eq!(fields, vec!["cmd", "flag"]);
//! assert!(validate_leaves(&leaves).is_empty());
//! ```

mod fragment;
mod leaves;
mod registry;
mod types;
mod validate;

pub use fragment::{FragmentKind, SectionFragment};
pub use leaves::{ClassifiedLeaf, ClassifiedLeaves};
pub use registry::OptionsRegistry;
pub use types::*;
pub use validate::{ValidationError, validate_leaves};
