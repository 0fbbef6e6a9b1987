//! Normalization of `addr:street` values into `<Type> <Name>` with Catalan
//! street types and title-cased names.

use crate::config::{ABBREVIATIONS, CONNECTOR_WORDS, EXPECTED, LANGUAGE_MAPPING};

/// Lookup table which matched the street type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Foreign street type translated; name kept as is.
    Translated,
    /// Street type already canonical; type and name re-cased.
    Cased,
    /// Abbreviation expanded; name re-cased.
    Expanded,
    /// Street type unknown; value left untouched.
    Unmatched,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedStreet {
    pub value: String,
    pub rule: Rule,
}

impl NormalizedStreet {
    pub fn is_unmatched(&self) -> bool {
        self.rule == Rule::Unmatched
    }
}

/// Splits a street value at its first space into street type and name.
pub fn split_street(value: &str) -> (&str, &str) {
    match value.find(' ') {
        Some(pos) => (&value[..pos], &value[pos + 1..]),
        None => (value, ""),
    }
}

/// Normalizes a whole `addr:street` value.
///
/// A value whose street type is not found in any table is returned exactly
/// as given.
pub fn normalize_street(value: &str) -> NormalizedStreet {
    let (street_type, street_name) = split_street(value);
    let mut street = normalize(street_type, street_name);
    if street.is_unmatched() {
        street.value = value.to_string();
    }
    street
}

/// Normalizes a street given as street type candidate and street name.
///
/// Type and name are always rejoined with a single space, also when the name
/// is empty.
pub fn normalize(street_type: &str, street_name: &str) -> NormalizedStreet {
    let lookup = street_type.to_lowercase();
    let lookup = lookup.as_str();

    if let Some(translated) = LANGUAGE_MAPPING.get(lookup) {
        NormalizedStreet {
            value: join(translated, street_name),
            rule: Rule::Translated,
        }
    } else if EXPECTED.contains(lookup) {
        NormalizedStreet {
            value: join(&fix_case(street_type), &fix_case(street_name)),
            rule: Rule::Cased,
        }
    } else if let Some(expanded) = ABBREVIATIONS.get(lookup) {
        NormalizedStreet {
            value: join(expanded, &fix_case(street_name)),
            rule: Rule::Expanded,
        }
    } else {
        NormalizedStreet {
            value: join(street_type, street_name),
            rule: Rule::Unmatched,
        }
    }
}

fn join(street_type: &str, street_name: &str) -> String {
    format!("{} {}", street_type, street_name)
}

/// Title-cases every word of `s` except connector words.
///
/// Words longer than three characters with an elided article (`d'`, `l'`)
/// keep the article in lower case and capitalize the word after it.
/// Whitespace runs collapse to single spaces.
pub fn fix_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            if CONNECTOR_WORDS.contains(word) {
                word.to_string()
            } else if word.chars().count() > 3 && word.contains(is_apostrophe) {
                case_elided(word)
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '’'
}

fn case_elided(word: &str) -> String {
    // contains an apostrophe, checked by the caller
    let pos = word.find(is_apostrophe).unwrap_or(0);
    let mut rest = word[pos..].chars();
    let mut result = word[..pos].to_lowercase();
    result.extend(rest.next());
    result.push_str(&capitalize(rest.as_str()));
    result
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            let mut result: String = first.to_uppercase().collect();
            result.push_str(&chars.as_str().to_lowercase());
            result
        }
    }
}
