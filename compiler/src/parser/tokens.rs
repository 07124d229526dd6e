//! Token stream over a formal usage pattern.

use std::sync::LazyLock;

use regex::Regex;

static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\[\]()|]|\.\.\.)").expect("static regex must compile")
});

/// A token is either a run of non-space characters ending in `<...>`
/// (which may contain spaces) or any other run of non-space characters.
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S*<.*?>|\S+").expect("static regex must compile"));

/// Cursor over the tokens of a pattern.
#[derive(Debug, Clone)]
pub(crate) struct Tokens {
    tokens: Vec<String>,
    position: usize,
}

impl Tokens {
    /// Splits a pattern into tokens. Grouping punctuation and `...` always
    /// stand alone, even when written flush against a word.
    pub(crate) fn from_pattern(source: &str) -> Self {
        let spaced = PUNCTUATION.replace_all(source, " ${1} ");
        let tokens = TOKEN
            .find_iter(&spaced)
            .map(|m| m.as_str().to_string())
            .collect();
        Self {
            tokens,
            position: 0,
        }
    }

    pub(crate) fn current(&self) -> Option<&str> {
        self.tokens.get(self.position).map(String::as_str)
    }

    /// Consumes and returns the current token.
    pub(crate) fn advance(&mut self) -> Option<String> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    /// The unconsumed tokens joined by single spaces.
    pub(crate) fn remaining(&self) -> String {
        self.tokens[self.position..].join(" ")
    }
}
