//! Recursive-descent parser for formal usage patterns.
//!
//! ```text
//! expr ::= seq ( '|' seq )* ;
//! seq  ::= ( atom [ '...' ] )* ;
//! atom ::= '(' expr ')' | '[' expr ']' | 'options'
//!        | long | shorts | argument | command ;
//! ```
//!
//! Options met in the pattern are resolved against the [`OptionsRegistry`];
//! options the registry does not know yet are registered on first sight so
//! later references resolve to the same definition.

use docopt_codegen_core::{Argument, Command, Leaf, OptionSpec, OptionsRegistry, PatternNode};

use super::tokens::Tokens;
use crate::error::GrammarError;

type ParseResult = Result<Vec<PatternNode>, GrammarError>;

/// Parses a formal usage pattern into a tree rooted at `Required`.
pub(crate) fn parse_pattern(
    source: &str,
    registry: &mut OptionsRegistry,
) -> Result<PatternNode, GrammarError> {
    let mut tokens = Tokens::from_pattern(source);
    let result = parse_expr(&mut tokens, registry)?;
    if tokens.current().is_some() {
        return Err(GrammarError::UnexpectedEnding(tokens.remaining()));
    }
    Ok(PatternNode::Required(result))
}

fn parse_expr(tokens: &mut Tokens, registry: &mut OptionsRegistry) -> ParseResult {
    let seq = parse_seq(tokens, registry)?;
    if tokens.current() != Some("|") {
        return Ok(seq);
    }

    let mut alternatives = group_sequence(seq);
    while tokens.current() == Some("|") {
        tokens.advance();
        let seq = parse_seq(tokens, registry)?;
        alternatives.extend(group_sequence(seq));
    }

    if alternatives.len() > 1 {
        Ok(vec![PatternNode::Either(alternatives)])
    } else {
        Ok(alternatives)
    }
}

/// A multi-element alternative is one required group.
fn group_sequence(seq: Vec<PatternNode>) -> Vec<PatternNode> {
    if seq.len() > 1 {
        vec![PatternNode::Required(seq)]
    } else {
        seq
    }
}

fn parse_seq(tokens: &mut Tokens, registry: &mut OptionsRegistry) -> ParseResult {
    let mut result = Vec::new();
    while !matches!(tokens.current(), None | Some("]" | ")" | "|")) {
        let atom = parse_atom(tokens, registry)?;
        if tokens.current() == Some("...") {
            tokens.advance();
            result.push(PatternNode::Repeated(atom));
        } else {
            result.extend(atom);
        }
    }
    Ok(result)
}

fn parse_atom(tokens: &mut Tokens, registry: &mut OptionsRegistry) -> ParseResult {
    let Some(token) = tokens.current().map(str::to_string) else {
        return Ok(Vec::new());
    };

    match token.as_str() {
        "(" | "[" => {
            tokens.advance();
            let inner = parse_expr(tokens, registry)?;
            let (closing, node) = if token == "(" {
                (")", PatternNode::Required(inner))
            } else {
                ("]", PatternNode::Optional(inner))
            };
            if tokens.advance().as_deref() != Some(closing) {
                let opening = if token == "(" { '(' } else { '[' };
                return Err(GrammarError::Unmatched(opening));
            }
            Ok(vec![node])
        }
        "options" => {
            tokens.advance();
            Ok(vec![PatternNode::OptionsShortcut])
        }
        t if t.starts_with("--") && t != "--" => parse_long(tokens, registry),
        t if t.starts_with('-') && t != "-" && t != "--" => parse_shorts(tokens, registry),
        t if (t.starts_with('<') && t.ends_with('>')) || is_upper(t) => {
            tokens.advance();
            Ok(vec![leaf(Leaf::Argument(Argument::new(&token)))])
        }
        _ => {
            tokens.advance();
            Ok(vec![leaf(Leaf::Command(Command::new(&token)))])
        }
    }
}

fn leaf(leaf: Leaf) -> PatternNode {
    PatternNode::Leaf(leaf)
}

fn option_node(option: OptionSpec) -> PatternNode {
    leaf(Leaf::Option(option))
}

/// `FILE`, `PATH_2`: has an uppercase letter and no lowercase ones.
fn is_upper(token: &str) -> bool {
    token.chars().any(char::is_uppercase) && !token.chars().any(char::is_lowercase)
}

/// Whether the token after an option can serve as its value.
fn value_token_available(tokens: &Tokens) -> bool {
    !matches!(tokens.current(), None | Some("--"))
}

fn parse_long(tokens: &mut Tokens, registry: &mut OptionsRegistry) -> ParseResult {
    let token = tokens.advance().unwrap_or_default();
    let (long, value) = match token.split_once('=') {
        Some((long, value)) => (long.to_string(), Some(value.to_string())),
        None => (token, None),
    };

    let similar: Vec<OptionSpec> = registry.with_long(&long).into_iter().cloned().collect();
    match similar.as_slice() {
        [] => {
            let argcount = u8::from(value.is_some());
            let option = OptionSpec::new(None, Some(&long), argcount);
            registry.register(option.clone());
            Ok(vec![option_node(option)])
        }
        [option] => {
            let option = option.clone();
            if !option.takes_value() && value.is_some() {
                return Err(GrammarError::UnexpectedArgument(long));
            }
            if option.takes_value() && value.is_none() {
                if !value_token_available(tokens) {
                    return Err(GrammarError::MissingArgument(long));
                }
                tokens.advance();
            }
            Ok(vec![option_node(option)])
        }
        _ => Err(GrammarError::AmbiguousLong {
            candidates: similar
                .iter()
                .map(OptionSpec::name)
                .collect::<Vec<_>>()
                .join(", "),
            long,
        }),
    }
}

fn parse_shorts(tokens: &mut Tokens, registry: &mut OptionsRegistry) -> ParseResult {
    let token = tokens.advance().unwrap_or_default();
    let mut left = token.trim_start_matches('-');
    let mut parsed = Vec::new();

    while let Some(ch) = left.chars().next() {
        let short = format!("-{ch}");
        left = &left[ch.len_utf8()..];

        let similar: Vec<OptionSpec> = registry.with_short(&short).into_iter().cloned().collect();
        let option = match similar.as_slice() {
            [] => {
                let option = OptionSpec::new(Some(&short), None, 0);
                registry.register(option.clone());
                option
            }
            [option] => {
                if option.takes_value() {
                    if left.is_empty() {
                        if !value_token_available(tokens) {
                            return Err(GrammarError::MissingArgument(short));
                        }
                        tokens.advance();
                    } else {
                        // `-ofile`: the rest of the token is the value.
                        left = "";
                    }
                }
                option.clone()
            }
            _ => {
                return Err(GrammarError::AmbiguousShort {
                    short,
                    count: similar.len(),
                });
            }
        };
        parsed.push(option_node(option));
    }

    Ok(parsed)
}
