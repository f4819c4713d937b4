//! Query classification
//!
//! Maps a query to the label of the backend that should answer it, using
//! case-insensitive substring matching over an ordered keyword list. Pure and
//! total: a query that matches nothing falls back to the default label.

use std::fmt;

/// Routing decision: which backend handles a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// Place search (geocoding + nearby places).
    Map,
    /// Document question answering. The catch-all.
    Qa,
}

impl Label {
    /// Every label, in registry order.
    pub const ALL: [Label; 2] = [Label::Map, Label::Qa];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Map => "map",
            Label::Qa => "qa",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keywords that send a query to the place-search backend.
pub const MAP_KEYWORDS: &[&str] = &[
    "карта",
    "place",
    "address",
    "где находится",
    "найти на карте",
    "location",
    "координаты",
];

/// Ordered `(label, keywords)` rules with a default label.
///
/// Rules are checked in order and the first rule with any matching keyword
/// wins. With the default rule set there is a single non-default label, so
/// no tie-break beyond "any match wins" is ever exercised.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: Vec<(Label, Vec<String>)>,
    default: Label,
}

impl KeywordClassifier {
    /// Create a classifier that only ever returns `default`.
    pub fn new(default: Label) -> Self {
        Self {
            rules: Vec::new(),
            default,
        }
    }

    /// Append a rule. Keywords are lower-cased once here.
    pub fn with_rule<I, S>(mut self, label: Label, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        self.rules.push((label, keywords));
        self
    }

    /// The label returned when no rule matches.
    pub fn default_label(&self) -> Label {
        self.default
    }

    /// Classify a query.
    pub fn classify(&self, query: &str) -> Label {
        let lower = query.to_lowercase();
        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k.as_str())))
            .map(|(label, _)| *label)
            .unwrap_or(self.default)
    }
}

impl Default for KeywordClassifier {
    /// Map keywords first, document Q&A as the catch-all.
    fn default() -> Self {
        KeywordClassifier::new(Label::Qa).with_rule(Label::Map, MAP_KEYWORDS)
    }
}

/// Classify with the default rule set.
pub fn classify(query: &str) -> Label {
    KeywordClassifier::default().classify(query)
}
