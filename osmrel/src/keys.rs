//! Two independent views of a tag key: its lexical bucket (used for audit
//! counts) and its split into namespace and local key (used for storage).

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LOWER: Regex = Regex::new(r"^([a-z]|_)*$").unwrap();
    static ref LOWER_COLON: Regex = Regex::new(r"^([a-z]|_)*:([a-z]|_)*$").unwrap();
    static ref PROBLEM_CHARS: Regex = Regex::new(r#"[=\+/&<>;'"\?%#$@,\. \t\r\n]"#).unwrap();
}

/// Lexical shape of a tag key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyType {
    Lower,
    LowerColon,
    ProblemChars,
    Other,
}

impl KeyType {
    pub const ALL: [KeyType; 4] = [
        KeyType::Lower,
        KeyType::LowerColon,
        KeyType::ProblemChars,
        KeyType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            KeyType::Lower => "lower",
            KeyType::LowerColon => "lower_colon",
            KeyType::ProblemChars => "problemchars",
            KeyType::Other => "other",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a key; the first matching bucket wins.
pub fn classify(key: &str) -> KeyType {
    if LOWER.is_match(key) {
        KeyType::Lower
    } else if LOWER_COLON.is_match(key) {
        KeyType::LowerColon
    } else if has_problem_chars(key) {
        KeyType::ProblemChars
    } else {
        KeyType::Other
    }
}

pub fn has_problem_chars(key: &str) -> bool {
    PROBLEM_CHARS.is_match(key)
}

/// Storage view of a tag key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitKey {
    /// Local key; `None` if the key contains problem characters.
    pub key: Option<String>,
    pub namespace: String,
}

impl SplitKey {
    pub fn is(&self, namespace: &str, key: &str) -> bool {
        self.namespace == namespace && self.key.as_deref() == Some(key)
    }
}

/// Splits a key at its first colon into namespace and local key.
///
/// Keys without colon get `default_namespace`. Keys containing problem
/// characters are not split at all: they get `default_namespace` and lose
/// their local key.
pub fn split_key(key: &str, default_namespace: &str) -> SplitKey {
    if has_problem_chars(key) {
        return SplitKey {
            key: None,
            namespace: default_namespace.into(),
        };
    }
    match key.find(':') {
        None => SplitKey {
            key: Some(key.into()),
            namespace: default_namespace.into(),
        },
        Some(pos) => SplitKey {
            key: Some(key[pos + 1..].into()),
            namespace: key[..pos].into(),
        },
    }
}
