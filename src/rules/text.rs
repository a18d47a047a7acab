use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet},
};

use itertools::Itertools;
use regex::{Captures, Regex, escape};
use serde::{Deserialize, Serialize};

/// Returns a lowercase representation, reusing the original string if already lowercase.
pub fn lowercase(input: &str) -> Cow<'_, str> {
    if input.chars().all(|ch| !ch.is_uppercase()) {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(input.to_lowercase())
    }
}

/// Trims the ends and collapses every internal whitespace run to one space.
pub fn collapse_whitespace(input: &str) -> Cow<'_, str> {
    let collapsed = input.split_whitespace().join(" ");
    if collapsed == input {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(collapsed)
    }
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn strip_punctuation(word: &str) -> Cow<'_, str> {
    if word.contains(|ch: char| ch.is_ascii_punctuation()) {
        Cow::Owned(word.chars().filter(|ch| !ch.is_ascii_punctuation()).collect())
    } else {
        Cow::Borrowed(word)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flag {
    /// Exact, case-sensitive spellings that mean `true`.
    pub truthy: Vec<String>,
}

impl Default for Flag {
    fn default() -> Self {
        Self {
            truthy: ["yes", "Y", "true", "1", "True"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

impl Flag {
    pub fn apply(&self, raw: &str) -> bool {
        self.truthy.iter().any(|candidate| candidate == raw)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueMap {
    pub mapping: BTreeMap<String, String>,
}

impl ValueMap {
    pub fn job_titles() -> Self {
        let mapping = [
            ("Dr.", "Doctor"),
            ("Prof.", "Professor"),
            ("Mr.", "Mister"),
            ("Ms.", "Miss"),
            ("Mgr.", "Manager"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();
        Self { mapping }
    }

    pub fn apply<'a>(&'a self, raw: &'a str) -> Cow<'a, str> {
        match self.mapping.get(raw.trim()) {
            Some(replacement) => Cow::Borrowed(replacement.as_str()),
            None => Cow::Borrowed(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressSpec {
    /// Whole words (matched case-insensitively) and the abbreviation replacing them.
    pub abbreviations: BTreeMap<String, String>,
}

impl Default for AddressSpec {
    fn default() -> Self {
        let abbreviations = [
            ("boulevard", "BLVD"),
            ("drive", "DR"),
            ("street", "ST"),
            ("road", "RD"),
            ("avenue", "AVE"),
        ]
        .into_iter()
        .map(|(word, abbr)| (word.to_string(), abbr.to_string()))
        .collect();
        Self { abbreviations }
    }
}

/// Street address canonicalization: lowercase, abbreviate street types,
/// title-case, strip punctuation. Abbreviations are rendered in upper case so
/// `Main Street`, `main st.` and `MAIN ST` all become `Main ST`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "AddressSpec", into = "AddressSpec")]
pub struct StreetAddress {
    abbreviations: BTreeMap<String, String>,
    pattern: Option<Regex>,
    canonical: BTreeSet<String>,
}

impl TryFrom<AddressSpec> for StreetAddress {
    type Error = regex::Error;

    fn try_from(spec: AddressSpec) -> Result<Self, Self::Error> {
        let abbreviations: BTreeMap<String, String> = spec
            .abbreviations
            .into_iter()
            .map(|(word, abbr)| (word.to_lowercase(), abbr))
            .collect();
        let pattern = if abbreviations.is_empty() {
            None
        } else {
            let alternation = abbreviations.keys().map(|word| escape(word)).join("|");
            Some(Regex::new(&format!(r"\b(?:{alternation})\b"))?)
        };
        let canonical = abbreviations
            .values()
            .map(|abbr| strip_punctuation(abbr).to_uppercase())
            .filter(|abbr| !abbr.is_empty())
            .collect();
        Ok(Self {
            abbreviations,
            pattern,
            canonical,
        })
    }
}

impl From<StreetAddress> for AddressSpec {
    fn from(rule: StreetAddress) -> Self {
        AddressSpec {
            abbreviations: rule.abbreviations,
        }
    }
}

impl Default for StreetAddress {
    fn default() -> Self {
        StreetAddress::try_from(AddressSpec::default())
            .expect("built-in street abbreviations form a valid pattern")
    }
}

impl PartialEq for StreetAddress {
    fn eq(&self, other: &Self) -> bool {
        self.abbreviations == other.abbreviations
    }
}

impl StreetAddress {
    pub fn apply(&self, raw: &str) -> String {
        let lowered = raw.to_lowercase();
        let substituted = match &self.pattern {
            Some(pattern) => pattern.replace_all(&lowered, |caps: &Captures<'_>| {
                self.abbreviations
                    .get(&caps[0])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            }),
            None => Cow::Borrowed(lowered.as_str()),
        };
        substituted
            .split_whitespace()
            .map(|word| title_case_word(&strip_punctuation(word)))
            .filter(|word| !word.is_empty())
            .map(|word| {
                let upper = word.to_uppercase();
                if self.canonical.contains(&upper) {
                    upper
                } else {
                    word
                }
            })
            .join(" ")
    }
}
