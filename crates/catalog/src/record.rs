use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const FIELD_NAME: &str = "상호명";
pub const FIELD_ADDRESS: &str = "주소";
pub const FIELD_MENU: &str = "대표메뉴";
pub const FIELD_CONTACT: &str = "연락처";
pub const FIELD_CUISINE: &str = "음식 종류";
pub const FIELD_PRICE: &str = "가격대";

/// Column keys every persisted or uploaded row must carry, in file order.
pub const REQUIRED_FIELDS: [&str; 6] = [
    FIELD_NAME,
    FIELD_ADDRESS,
    FIELD_MENU,
    FIELD_CONTACT,
    FIELD_CUISINE,
    FIELD_PRICE,
];

/// One restaurant entry. `name` acts as the key for update, delete and merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "상호명")]
    pub name: String,
    #[serde(rename = "주소")]
    pub address: String,
    #[serde(rename = "대표메뉴")]
    pub menu: String,
    #[serde(rename = "연락처")]
    pub contact: String,
    #[serde(rename = "음식 종류")]
    pub cuisine: CuisineType,
    #[serde(rename = "가격대")]
    pub price: PriceTier,
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        menu: impl Into<String>,
        contact: impl Into<String>,
        cuisine: CuisineType,
        price: PriceTier,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            menu: menu.into(),
            contact: contact.into(),
            cuisine,
            price,
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum CuisineType {
    #[default]
    #[serde(rename = "한식")]
    Korean,
    #[serde(rename = "중식")]
    Chinese,
    #[serde(rename = "일식")]
    Japanese,
    #[serde(rename = "양식")]
    Western,
    #[serde(rename = "기타")]
    Other,
}

impl CuisineType {
    pub const ALL: [CuisineType; 5] = [
        CuisineType::Korean,
        CuisineType::Chinese,
        CuisineType::Japanese,
        CuisineType::Western,
        CuisineType::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            CuisineType::Korean => "한식",
            CuisineType::Chinese => "중식",
            CuisineType::Japanese => "일식",
            CuisineType::Western => "양식",
            CuisineType::Other => "기타",
        }
    }

    const fn english(self) -> &'static str {
        match self {
            CuisineType::Korean => "korean",
            CuisineType::Chinese => "chinese",
            CuisineType::Japanese => "japanese",
            CuisineType::Western => "western",
            CuisineType::Other => "other",
        }
    }
}

impl fmt::Display for CuisineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CuisineType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        CuisineType::ALL
            .into_iter()
            .find(|c| c.label() == s || c.english().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::InvalidLabel {
                field: FIELD_CUISINE,
                value: s.to_string(),
            })
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum PriceTier {
    #[serde(rename = "저렴")]
    Low,
    #[default]
    #[serde(rename = "보통")]
    Medium,
    #[serde(rename = "고급")]
    High,
}

impl PriceTier {
    pub const ALL: [PriceTier; 3] = [PriceTier::Low, PriceTier::Medium, PriceTier::High];

    pub const fn label(self) -> &'static str {
        match self {
            PriceTier::Low => "저렴",
            PriceTier::Medium => "보통",
            PriceTier::High => "고급",
        }
    }

    const fn english(self) -> &'static str {
        match self {
            PriceTier::Low => "low",
            PriceTier::Medium => "medium",
            PriceTier::High => "high",
        }
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PriceTier {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PriceTier::ALL
            .into_iter()
            .find(|p| p.label() == s || p.english().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::InvalidLabel {
                field: FIELD_PRICE,
                value: s.to_string(),
            })
    }
}

/// Partial edit applied on top of an existing record, the way the edit form
/// pre-fills every field from the selected row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<CuisineType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceTier>,
}

impl RecordPatch {
    #[must_use]
    pub fn apply(self, base: &Record) -> Record {
        Record {
            name: self.name.unwrap_or_else(|| base.name.clone()),
            address: self.address.unwrap_or_else(|| base.address.clone()),
            menu: self.menu.unwrap_or_else(|| base.menu.clone()),
            contact: self.contact.unwrap_or_else(|| base.contact.clone()),
            cuisine: self.cuisine.unwrap_or(base.cuisine),
            price: self.price.unwrap_or(base.price),
        }
    }
}
