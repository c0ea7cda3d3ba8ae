//! Listing records: the polymorphic items every search screen operates on.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type ListingId = String;
pub type Payload = Map<String, Value>;

/// Tag of the listing union. Kind-specific fields live in `ListingRecord::payload`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ListingKind {
    #[default]
    Service,
    Project,
    Freelancer,
    Message,
}

impl ListingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Project => "project",
            Self::Freelancer => "freelancer",
            Self::Message => "message",
        }
    }
}

/// A listing price: a single amount (hourly rate, fixed fee) or a budget range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Price {
    Fixed(f64),
    Range { min: f64, max: f64 },
}

impl Price {
    /// Lower and upper bound, swapped into order if the range was stored inverted.
    pub fn bounds(self) -> (f64, f64) {
        match self {
            Self::Fixed(p) => (p, p),
            Self::Range { min, max } if min <= max => (min, max),
            Self::Range { min, max } => (max, min),
        }
    }

    pub fn low(self) -> f64 {
        self.bounds().0
    }

    pub fn high(self) -> f64 {
        self.bounds().1
    }
}

/// One searchable item.
///
/// The named fields are the projection shared by every listing kind and are
/// what the engine reads. Anything else the source carries (delivery time,
/// skills, budget notes, thread ids) rides along in `payload` untouched and
/// can still be addressed by a facet through [`ListingRecord::field`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    pub id: ListingId,
    #[serde(default)]
    pub kind: ListingKind,
    pub title: String,
    #[serde(default, alias = "content")]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(
        default,
        alias = "hourlyRate",
        alias = "rate",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "reviewCount", skip_serializing_if = "Option::is_none")]
    pub popularity: Option<u64>,
    #[serde(default, alias = "author", skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub payload: Payload,
}

impl ListingRecord {
    pub fn new(id: impl Into<ListingId>, kind: ListingKind, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            description: String::new(),
            category: String::new(),
            location: None,
            rating: None,
            price: None,
            created_at: None,
            popularity: None,
            provider: None,
            payload: Payload::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_popularity(mut self, popularity: u64) -> Self {
        self.popularity = Some(popularity);
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_payload(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Resolve a facet field name against the projection, then the payload.
    ///
    /// Returns `None` when the record has no value for the field, which never
    /// satisfies a constraint.
    pub fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::Text(&self.id)),
            "kind" => Some(FieldValue::Text(self.kind.as_str())),
            "title" => Some(FieldValue::Text(&self.title)),
            "description" | "content" => Some(FieldValue::Text(&self.description)),
            "category" => Some(FieldValue::Text(&self.category)),
            "location" => self.location.as_deref().map(FieldValue::Text),
            "rating" => self.rating.map(FieldValue::Number),
            "price" | "hourlyRate" | "rate" => self.price.map(|p| match p {
                Price::Fixed(v) => FieldValue::Number(v),
                Price::Range { .. } => {
                    let (lo, hi) = p.bounds();
                    FieldValue::Range(lo, hi)
                }
            }),
            "createdAt" | "date" => self.created_at.map(FieldValue::Date),
            "popularity" | "reviewCount" => self.popularity.map(|p| FieldValue::Number(p as f64)),
            "provider" | "author" => self.provider.as_deref().map(FieldValue::Text),
            other => self.payload.get(other).and_then(FieldValue::from_json),
        }
    }
}

/// A borrowed view of one record field, as seen by facet predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Range(f64, f64),
    Bool(bool),
    Date(DateTime<Utc>),
    List(Vec<&'a str>),
}

impl<'a> FieldValue<'a> {
    pub fn from_json(value: &'a Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Text(s)),
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Array(items) => {
                Some(Self::List(items.iter().filter_map(Value::as_str).collect()))
            }
            Value::Object(obj) => {
                let min = obj.get("min").and_then(Value::as_f64)?;
                let max = obj.get("max").and_then(Value::as_f64)?;
                Some(if min <= max { Self::Range(min, max) } else { Self::Range(max, min) })
            }
            Value::Null => None,
        }
    }

    /// Numeric interval covered by the field; a plain number is a point.
    pub fn as_interval(&self) -> Option<(f64, f64)> {
        match self {
            Self::Number(n) => Some((*n, *n)),
            Self::Range(lo, hi) => Some((*lo, *hi)),
            Self::Text(s) => s.trim().parse::<f64>().ok().map(|n| (n, n)),
            _ => None,
        }
    }

    /// Dates stored in the payload arrive as strings (RFC 3339 or `YYYY-MM-DD`).
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(d) => Some(*d),
            Self::Text(s) => parse_date(s),
            _ => None,
        }
    }
}

pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
