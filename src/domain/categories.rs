//! Post categories: a closed set of stable identifiers with display labels.
//!
//! Posts persist the English identifier (`"Design"`). Older collections that
//! stored the Vietnamese label (`"Thiết kế"`) still load, and values outside
//! the set are carried verbatim so a foreign collection is never discarded.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::DomainError;

/// Label of the "every category" filter entry.
pub const ALL_LABEL: &str = "Tất cả";

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Category {
    #[default]
    Technology,
    Lifestyle,
    Travel,
    Food,
    Design,
    /// A persisted value outside the known set. Never matches a category filter.
    Other(String),
}

impl Category {
    /// Known categories in filter-bar order.
    pub fn known() -> [Category; 5] {
        [
            Category::Technology,
            Category::Lifestyle,
            Category::Travel,
            Category::Food,
            Category::Design,
        ]
    }

    /// Lowercase identifier used on the command line and in logs.
    pub fn id(&self) -> &str {
        match self {
            Category::Technology => "technology",
            Category::Lifestyle => "lifestyle",
            Category::Travel => "travel",
            Category::Food => "food",
            Category::Design => "design",
            Category::Other(raw) => raw.as_str(),
        }
    }

    /// Value written into the `posts` slot.
    pub fn persisted(&self) -> &str {
        match self {
            Category::Technology => "Technology",
            Category::Lifestyle => "Lifestyle",
            Category::Travel => "Travel",
            Category::Food => "Food",
            Category::Design => "Design",
            Category::Other(raw) => raw.as_str(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Category::Technology => "Công nghệ",
            Category::Lifestyle => "Đời sống",
            Category::Travel => "Du lịch",
            Category::Food => "Ẩm thực",
            Category::Design => "Thiết kế",
            Category::Other(raw) => raw.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Other(_))
    }

    /// Resolve a persisted value, falling back to [`Category::Other`].
    pub fn from_persisted(raw: &str) -> Self {
        Self::lookup(raw).unwrap_or_else(|| Category::Other(raw.to_string()))
    }

    fn lookup(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::known().into_iter().find(|candidate| {
            candidate.id().eq_ignore_ascii_case(value) || candidate.label() == value
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::lookup(value).ok_or_else(|| DomainError::unknown_category(value))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.persisted())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Category::from_persisted(&raw))
    }
}

/// Category selection of the archive page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: &Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => selected.is_known() && selected == category,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_LABEL,
            CategoryFilter::Only(category) => category.label(),
        }
    }

    /// Entries of the filter bar, the sentinel first.
    pub fn options() -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(Category::known().into_iter().map(CategoryFilter::Only))
            .collect()
    }
}

impl FromStr for CategoryFilter {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") || trimmed == ALL_LABEL {
            return Ok(CategoryFilter::All);
        }
        trimmed.parse().map(CategoryFilter::Only)
    }
}
