//! Store categories known to the backend.

use serde::{Deserialize, Serialize};

/// Store category.
///
/// The backend identifies categories by a small integer id; the form sends
/// that id as `categoryId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreCategory {
    #[default]
    Restaurant,
    Retail,
    Grocery,
    Electronics,
    Fashion,
}

impl StoreCategory {
    /// All categories in display order.
    pub const ALL: [Self; 5] = [
        Self::Restaurant,
        Self::Retail,
        Self::Grocery,
        Self::Electronics,
        Self::Fashion,
    ];

    /// Backend category id.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Restaurant => 1,
            Self::Retail => 2,
            Self::Grocery => 3,
            Self::Electronics => 4,
            Self::Fashion => 5,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Restaurant => "Restaurant",
            Self::Retail => "Retail",
            Self::Grocery => "Grocery",
            Self::Electronics => "Electronics",
            Self::Fashion => "Fashion",
        }
    }

    /// Look a category up by its backend id.
    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    /// Look a category up by the id as submitted in a form.
    #[must_use]
    pub fn from_form_value(value: &str) -> Option<Self> {
        value.trim().parse::<u8>().ok().and_then(Self::from_id)
    }
}

impl std::fmt::Display for StoreCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
