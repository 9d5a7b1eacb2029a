//! Ticker symbols used as the unit of subscription and as the metric label.
//!
//! A `Symbol` is an opaque, case-sensitive string. The exporter never interprets
//! it beyond rejecting blank values at configuration time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ExporterError;

/// Case-sensitive ticker symbol such as `AAPL`.
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Borrow the symbol text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join symbols with `,` as expected by the `symbols` query parameter.
    pub fn join(symbols: &[Symbol]) -> String {
        symbols
            .iter()
            .map(Symbol::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromStr for Symbol {
    type Err = ExporterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ExporterError::Config(String::from("symbol must not be blank")));
        }
        Ok(Symbol(trimmed.to_string()))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_but_keeps_case() {
        let symbol: Symbol = "  brk.B ".parse().unwrap();
        assert_eq!(symbol.as_str(), "brk.B");
    }

    #[test]
    fn blank_symbol_is_rejected() {
        assert!(matches!(
            "   ".parse::<Symbol>(),
            Err(ExporterError::Config(_))
        ));
    }

    #[test]
    fn join_preserves_order_and_duplicates() {
        let symbols: Vec<Symbol> = ["FB", "AAPL", "FB"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        assert_eq!(Symbol::join(&symbols), "FB,AAPL,FB");
    }
}
