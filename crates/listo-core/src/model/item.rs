use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Stable numeric identifier of a to-do item.
pub type ItemKey = u64;

/// A colour tag attached to an item.
///
/// Only the four named colours can be toggled by the user. Anything else
/// found in stored data is carried through untouched as [`Label::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Label {
    Red,
    Green,
    Blue,
    Yellow,
    Other(String),
}

impl Label {
    /// Labels offered to the user, in display order.
    pub const ALL: [Self; 4] = [Self::Red, Self::Green, Self::Blue, Self::Yellow];

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Yellow => "yellow",
            Self::Other(raw) => raw,
        }
    }

    /// Terminal glyph for the label, `None` for unrecognized labels.
    #[must_use]
    pub const fn glyph(&self) -> Option<&'static str> {
        match self {
            Self::Red => Some("\u{1F534}"),
            Self::Green => Some("\u{1F7E2}"),
            Self::Blue => Some("\u{1F535}"),
            Self::Yellow => Some("\u{1F7E1}"),
            Self::Other(_) => None,
        }
    }

    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for Label {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "red" => Self::Red,
            "green" => Self::Green,
            "blue" => Self::Blue,
            "yellow" => Self::Yellow,
            _ => Self::Other(raw),
        }
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        match label {
            Label::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = ParseEnumError;

    /// Parses one of the user-selectable labels. Unknown names are rejected
    /// here even though they survive deserialization.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from(s.trim().to_ascii_lowercase()) {
            Self::Other(_) => Err(ParseEnumError {
                expected: "label",
                got: s.to_string(),
            }),
            known => Ok(known),
        }
    }
}

/// One to-do entry, in its persisted shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub key: ItemKey,
    pub description: String,
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl Item {
    #[must_use]
    pub fn new(key: ItemKey, description: impl Into<String>, labels: Vec<Label>) -> Self {
        let mut item = Self {
            key,
            description: description.into(),
            status: false,
            labels: Vec::with_capacity(labels.len()),
        };
        for label in labels {
            if !item.labels.contains(&label) {
                item.labels.push(label);
            }
        }
        item
    }

    #[must_use]
    pub fn has_label(&self, label: &Label) -> bool {
        self.labels.contains(label)
    }

    /// Add `label` if absent, remove it if present. Returns whether the label
    /// is set afterwards.
    pub fn toggle_label(&mut self, label: Label) -> bool {
        if let Some(pos) = self.labels.iter().position(|l| *l == label) {
            self.labels.remove(pos);
            false
        } else {
            self.labels.push(label);
            true
        }
    }

    #[must_use]
    pub const fn section(&self) -> super::Section {
        super::Section::of_status(self.status)
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}
