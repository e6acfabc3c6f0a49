use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_TICKER_LEN: usize = 15;

/// Exchange ticker, trimmed and uppercased.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parses user input such as `" dangcem "` into `DANGCEM`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let ticker = input.trim().to_ascii_uppercase();

        let mut chars = ticker.chars();
        let Some(first) = chars.next() else {
            return Err(ValidationError::EmptySymbol);
        };
        if !first.is_ascii_alphabetic() {
            return Err(ValidationError::SymbolInvalidStart { ch: first });
        }

        let len = ticker.chars().count();
        if len > MAX_TICKER_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_TICKER_LEN,
            });
        }

        if let Some((index, ch)) = ticker
            .char_indices()
            .find(|(_, ch)| !(ch.is_ascii_alphanumeric() || *ch == '.' || *ch == '-'))
        {
            return Err(ValidationError::SymbolInvalidChar { ch, index });
        }

        Ok(Self(ticker))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_lowercase_input() {
        let symbol = Symbol::parse("  zenithbank ").expect("symbol should parse");
        assert_eq!(symbol.as_str(), "ZENITHBANK");
    }

    #[test]
    fn accepts_share_class_suffix() {
        assert_eq!(Symbol::parse("brk.b").expect("valid").as_str(), "BRK.B");
    }

    #[test]
    fn rejects_blank_and_digit_leading_input() {
        assert_eq!(Symbol::parse("   "), Err(ValidationError::EmptySymbol));
        assert!(matches!(
            Symbol::parse("3M"),
            Err(ValidationError::SymbolInvalidStart { ch: '3' })
        ));
    }

    #[test]
    fn reports_position_of_invalid_character() {
        let err = Symbol::parse("GT CO").expect_err("space is not allowed");
        assert_eq!(err, ValidationError::SymbolInvalidChar { ch: ' ', index: 2 });
    }

    #[test]
    fn rejects_overlong_ticker() {
        let err = Symbol::parse("ABCDEFGHIJKLMNOP").expect_err("16 chars");
        assert!(matches!(err, ValidationError::SymbolTooLong { len: 16, .. }));
    }
}
