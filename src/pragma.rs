//! SQLite pragma parsing.
//!
//! Pragmas arrive as `KEY=VALUE` strings (from the config file or repeated
//! `--sqlite-pragma` flags) and are turned into a map handed to the server.
//!
//! # Design Decisions
//! - Exactly one `=` per entry; empty keys or values are not rejected here
//! - Fail fast on the first malformed entry, never return a partial map
//! - Duplicate keys: last entry wins

use std::collections::BTreeMap;

use thiserror::Error;

/// Pragma name → value.
pub type PragmaMap = BTreeMap<String, String>;

/// Error returned for a pragma entry that is not `KEY=VALUE`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PragmaError {
    #[error("pragma statements must be in KEY=VALUE format, got {0:?}")]
    Malformed(String),
}

impl PragmaError {
    /// The offending input, verbatim.
    pub fn input(&self) -> &str {
        match self {
            PragmaError::Malformed(input) => input,
        }
    }
}

/// Parse a list of `KEY=VALUE` strings into a [`PragmaMap`].
pub fn parse_pragmas<S: AsRef<str>>(input: &[S]) -> Result<PragmaMap, PragmaError> {
    let mut result = PragmaMap::new();

    for pragma in input {
        let pragma = pragma.as_ref();
        let mut parts = pragma.split('=');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => {
                result.insert(key.to_string(), value.to_string());
            }
            _ => return Err(PragmaError::Malformed(pragma.to_string())),
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_pairs() {
        let map = parse_pragmas(&["foo=bar", "cache_size=2000"]).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("foo").map(String::as_str), Some("bar"));
        assert_eq!(map.get("cache_size").map(String::as_str), Some("2000"));
    }

    #[test]
    fn empty_input_is_empty_map() {
        let input: [&str; 0] = [];
        let map = parse_pragmas(&input).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn extra_separator_is_rejected() {
        let err = parse_pragmas(&["foo=bar=baz"]).unwrap_err();
        assert_eq!(err, PragmaError::Malformed("foo=bar=baz".into()));
        assert_eq!(err.input(), "foo=bar=baz");
        assert!(err.to_string().contains("\"foo=bar=baz\""));
    }

    #[test]
    fn missing_separator_is_rejected() {
        let err = parse_pragmas(&["journal_mode"]).unwrap_err();
        assert_eq!(err.input(), "journal_mode");
    }

    #[test]
    fn first_malformed_entry_is_reported() {
        let err = parse_pragmas(&["a=1", "bad", "worse==", "b=2"]).unwrap_err();
        assert_eq!(err.input(), "bad");
    }

    #[test]
    fn last_duplicate_wins() {
        let map = parse_pragmas(&["journal_mode=wal", "synchronous=2", "journal_mode=delete"]).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["journal_mode"], "delete");
        assert_eq!(map["synchronous"], "2");
    }

    #[test]
    fn empty_key_and_value_are_accepted() {
        let map = parse_pragmas(&["=", "k="]).unwrap();
        assert_eq!(map[""], "");
        assert_eq!(map["k"], "");
    }

    #[test]
    fn accepts_owned_strings() {
        let input = vec![String::from("synchronous=1")];
        let map = parse_pragmas(&input).unwrap();
        assert_eq!(map["synchronous"], "1");
    }
}
