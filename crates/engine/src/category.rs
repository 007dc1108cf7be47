use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Classification label of an expense.
///
/// The four presets are what the add form offers; anything else the server
/// returns is kept verbatim as [`Category::Custom`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Food,
    Travel,
    Shopping,
    Other,
    Custom(String),
}

impl Category {
    /// Categories offered by the add/update form, in display order.
    pub const PRESETS: [Category; 4] = [
        Category::Food,
        Category::Travel,
        Category::Shopping,
        Category::Other,
    ];

    pub fn label(&self) -> &str {
        match self {
            Self::Food => "Food",
            Self::Travel => "Travel",
            Self::Shopping => "Shopping",
            Self::Other => "Other",
            Self::Custom(label) => label,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidCategory("empty category".to_string()));
        }
        let category = match trimmed.to_ascii_lowercase().as_str() {
            "food" => Self::Food,
            "travel" => Self::Travel,
            "shopping" => Self::Shopping,
            "other" => Self::Other,
            _ => Self::Custom(trimmed.to_string()),
        };
        Ok(category)
    }
}

impl TryFrom<String> for Category {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Custom(label) => label,
            preset => preset.label().to_string(),
        }
    }
}
