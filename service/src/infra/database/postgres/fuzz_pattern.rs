//! [`FuzzPattern`] definition.

use derive_more::Display;
use itertools::Itertools as _;
use postgres_types::{FromSql, ToSql};

/// `SIMILAR TO` pattern matching any of the words of a search input.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct FuzzPattern(String);

impl FuzzPattern {
    /// Creates a new [`FuzzPattern`] out of the given search `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self(format!(
            "%({})%",
            input
                .split_whitespace()
                .map(Self::escape)
                .format("|"),
        ))
    }

    /// Escapes `SIMILAR TO` metacharacters in the provided `word`.
    fn escape(word: &str) -> String {
        let mut escaped = String::with_capacity(word.len());
        for c in word.chars() {
            if matches!(
                c,
                '\\' | '%'
                    | '_'
                    | '|'
                    | '*'
                    | '+'
                    | '?'
                    | '{'
                    | '}'
                    | '('
                    | ')'
                    | '['
                    | ']'
            ) {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped
    }
}

#[cfg(test)]
mod spec {
    use super::FuzzPattern;

    #[test]
    fn joins_escaped_words() {
        assert_eq!(
            FuzzPattern::new("  Lisbon  Porto ").to_string(),
            "%(Lisbon|Porto)%",
        );
        assert_eq!(
            FuzzPattern::new("100% (north)").to_string(),
            r"%(100\%|\(north\))%",
        );
    }
}
