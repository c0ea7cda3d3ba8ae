//! Search requests and the result envelope returned by the engine.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::hash::Hasher;
use twox_hash::XxHash64;

use crate::facet::{ActiveFilterSet, FilterValue};
use crate::types::ListingRecord;

pub const DEFAULT_LIMIT: usize = 10;

/// Recognised sort keys. Anything unrecognised parses as `Relevance`, which
/// keeps the input order.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum SortKey {
    #[default]
    Relevance,
    Date,
    Rating,
    PriceLow,
    PriceHigh,
    Popularity,
}

impl SortKey {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" | "newest" => Self::Date,
            "rating" => Self::Rating,
            "price_low" => Self::PriceLow,
            "price_high" => Self::PriceHigh,
            "popularity" | "popular" => Self::Popularity,
            _ => Self::Relevance,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Date => "date",
            Self::Rating => "rating",
            Self::PriceLow => "price_low",
            Self::PriceHigh => "price_high",
            Self::Popularity => "popularity",
        }
    }

    /// The price aliases carry their own direction and ignore `SortOrder`.
    pub fn fixed_order(self) -> Option<SortOrder> {
        match self {
            Self::PriceLow => Some(SortOrder::Asc),
            Self::PriceHigh => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

impl From<String> for SortKey {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&str> for SortKey {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("asc") { Self::Asc } else { Self::Desc }
    }
}

/// A full search request: free text, facet constraints, ordering and page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchQuery {
    pub text: String,
    pub filters: ActiveFilterSet,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    /// 1-based.
    #[serde(deserialize_with = "lenient_count")]
    pub page: usize,
    #[serde(deserialize_with = "lenient_count")]
    pub limit: usize,
}

/// Reads a page number or size from any JSON value. Negative, zero and
/// non-numeric input all come out as 0, which `effective_page` and
/// `effective_limit` clamp to 1.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n > 0.0 => Ok(n.min(usize::MAX as f64) as usize),
        _ => Ok(0),
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            filters: ActiveFilterSet::new(),
            sort_by: SortKey::Relevance,
            sort_order: SortOrder::Desc,
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_filter(mut self, id: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.set_filter(id, value);
        self
    }

    pub fn sorted_by(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort_by = key;
        self.sort_order = order;
        self
    }

    pub fn paged(mut self, page: usize, limit: usize) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }

    /// `page` clamped to at least 1.
    pub fn effective_page(&self) -> usize {
        self.page.max(1)
    }

    /// `limit` clamped to at least 1.
    pub fn effective_limit(&self) -> usize {
        self.limit.max(1)
    }
}

/// Count for one option of a facet over the facet's self-excluding base set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionCount {
    pub value: FilterValue,
    pub label: String,
    pub count: usize,
    pub selected: bool,
}

/// Histogram for one declared facet.
///
/// `total` is the number of records matching the text query and every other
/// active facet, i.e. what the result would hold if this facet were cleared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacetCounts {
    pub id: String,
    pub total: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionCount>,
}

impl FacetCounts {
    pub fn count_for(&self, value: &FilterValue) -> Option<usize> {
        self.options.iter().find(|o| &o.value == value).map(|o| o.count)
    }

    pub fn count_for_label(&self, label: &str) -> Option<usize> {
        self.options.iter().find(|o| o.label == label).map(|o| o.count)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub items: Vec<ListingRecord>,
    pub total_count: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub facets: Vec<FacetCounts>,
}

impl SearchResult {
    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|r| r.id.as_str()).collect()
    }

    pub fn facet(&self, id: &str) -> Option<&FacetCounts> {
        self.facets.iter().find(|f| f.id == id)
    }

    /// Stable 64-bit digest of the serialized result; equal results hash equal.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = XxHash64::with_seed(0);
        if let Ok(bytes) = serde_json::to_vec(self) {
            hasher.write(&bytes);
        }
        hasher.finish()
    }
}
