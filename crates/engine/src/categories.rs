//! Spending and income categories.
//!
//! Categories are a closed set. Free text coming from clients is matched once,
//! at the input boundary, ignoring case and accents, so the rest of the engine
//! only ever compares enum values.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Housing,
    Food,
    Transport,
    Leisure,
    Health,
    Income,
    /// Explicit bucket for anything that fits nowhere else.
    Other,
}

impl Category {
    /// Canonical order used by charts.
    pub const ALL: [Category; 7] = [
        Category::Housing,
        Category::Transport,
        Category::Food,
        Category::Leisure,
        Category::Health,
        Category::Other,
        Category::Income,
    ];

    /// Display label, also used on the wire.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Housing => "Moradia",
            Self::Food => "Alimentação",
            Self::Transport => "Transporte",
            Self::Leisure => "Lazer",
            Self::Health => "Saúde",
            Self::Income => "Receita",
            Self::Other => "Outros",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Housing => "housing",
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Leisure => "leisure",
            Self::Health => "health",
            Self::Income => "income",
            Self::Other => "other",
        }
    }

    fn canonical_rank(self) -> usize {
        Self::ALL
            .iter()
            .position(|c| *c == self)
            .unwrap_or(Self::ALL.len())
    }

    /// Compares by chart order instead of declaration order.
    #[must_use]
    pub fn canonical_cmp(self, other: Self) -> std::cmp::Ordering {
        self.canonical_rank().cmp(&other.canonical_rank())
    }
}

/// Lowercases and strips accents (`"Saúde"` -> `"saude"`).
fn fold_label(value: &str) -> String {
    value
        .trim()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Category {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold_label(s).as_str() {
            "moradia" | "housing" => Ok(Self::Housing),
            "alimentacao" | "food" => Ok(Self::Food),
            "transporte" | "transport" => Ok(Self::Transport),
            "lazer" | "leisure" => Ok(Self::Leisure),
            "saude" | "health" => Ok(Self::Health),
            "receita" | "income" => Ok(Self::Income),
            "outros" | "other" => Ok(Self::Other),
            _ => Err(EngineError::InvalidCategory(s.trim().to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
