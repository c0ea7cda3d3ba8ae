//! Facet declarations and the user's active filter selection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::types::parse_date;

/// The kind of control a facet renders as, which also fixes how its
/// constraint narrows the result set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FacetKind {
    Text,
    SingleSelect,
    MultiSelect,
    NumericRange,
    Date,
    Boolean,
    StarRating,
}

impl FacetKind {
    pub fn is_selectable(self) -> bool {
        matches!(self, Self::SingleSelect | Self::MultiSelect)
    }
}

/// `{min, max}` constraint; a missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NumericRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl NumericRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Bounds with an inverted pair swapped back into order.
    pub fn normalized(self) -> (Option<f64>, Option<f64>) {
        match (self.min, self.max) {
            (Some(lo), Some(hi)) if lo > hi => (Some(hi), Some(lo)),
            bounds => bounds,
        }
    }
}

/// `{from, to}` constraint, inclusive on both ends.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    pub fn normalized(self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        match (self.from, self.to) {
            (Some(a), Some(b)) if a > b => (Some(b), Some(a)),
            bounds => bounds,
        }
    }
}

/// A value chosen for one facet. The shape follows the facet kind: scalar
/// for text and single-select, list for multi-select, bounds for ranges and
/// dates, boolean, or an integer star threshold.
///
/// Deserialization never fails on a well-formed JSON value: shapes that fit
/// no variant come out as `Null` and are dropped like a cleared filter.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
    Range(NumericRange),
    Dates(DateRange),
    Null,
}

impl FilterValue {
    /// Read a filter value from arbitrary JSON.
    ///
    /// Arrays are always lists (scalar items are stringified), objects with
    /// only `min`/`max` are numeric ranges and objects with only `from`/`to`
    /// are date ranges whose bounds go through [`parse_date`].
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            Value::String(s) => Self::Text(s.clone()),
            Value::Array(items) => Self::List(items.iter().filter_map(list_item).collect()),
            Value::Object(obj) => bounds_from_json(obj).unwrap_or(Self::Null),
        }
    }

    /// `null`, `""` and `[]` mean "no constraint".
    pub fn is_cleared(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(", ")),
            Self::Range(r) => match r.normalized() {
                (Some(lo), Some(hi)) => write!(f, "{lo}..{hi}"),
                (Some(lo), None) => write!(f, "{lo}.."),
                (None, Some(hi)) => write!(f, "..{hi}"),
                (None, None) => f.write_str(".."),
            },
            Self::Dates(d) => {
                let (from, to) = d.normalized();
                let day = |d: Option<DateTime<Utc>>| {
                    d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
                };
                write!(f, "{}..{}", day(from), day(to))
            }
            Self::Null => Ok(()),
        }
    }
}

impl<'de> Deserialize<'de> for FilterValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| Self::from_json(&value))
    }
}

fn list_item(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn bounds_from_json(obj: &Map<String, Value>) -> Option<FilterValue> {
    let only = |keys: [&str; 2]| obj.keys().all(|k| keys.contains(&k.as_str()));
    if only(["min", "max"]) {
        let bound = |key: &str| match obj.get(key) {
            None | Some(Value::Null) => Some(None),
            Some(Value::Number(n)) => n.as_f64().map(Some),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok().map(Some),
            Some(_) => None,
        };
        return Some(NumericRange::new(bound("min")?, bound("max")?).into());
    }
    if only(["from", "to"]) {
        let bound = |key: &str| match obj.get(key) {
            None | Some(Value::Null) => Some(None),
            Some(Value::String(s)) => parse_date(s.trim()).map(Some),
            Some(_) => None,
        };
        return Some(DateRange::new(bound("from")?, bound("to")?).into());
    }
    None
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<u32> for FilterValue {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_string).collect())
    }
}

impl From<NumericRange> for FilterValue {
    fn from(r: NumericRange) -> Self {
        Self::Range(r)
    }
}

impl From<DateRange> for FilterValue {
    fn from(d: DateRange) -> Self {
        Self::Dates(d)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// One enumerated choice of a selectable facet. `value` is the constraint
/// that choosing this option would set, so range buckets and star thresholds
/// are declared the same way as plain categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacetOption {
    pub value: FilterValue,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl FacetOption {
    pub fn new(value: impl Into<FilterValue>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into(), count: None }
    }
}

/// Declares one filterable dimension of a search context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacetDefinition {
    pub id: String,
    pub kind: FacetKind,
    /// Record field the facet reads; defaults to `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FacetOption>,
}

impl FacetDefinition {
    pub fn new(id: impl Into<String>, kind: FacetKind) -> Self {
        Self { id: id.into(), kind, field: None, label: None, options: Vec::new() }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_option(mut self, value: impl Into<FilterValue>, label: impl Into<String>) -> Self {
        self.options.push(FacetOption::new(value, label));
        self
    }

    pub fn field_name(&self) -> &str {
        self.field.as_deref().unwrap_or(&self.id)
    }
}

/// The user's current selection, keyed by facet id.
///
/// A key is present only while it carries a real constraint: every write goes
/// through [`ActiveFilterSet::set_filter`], and deserialization drops cleared
/// values the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, FilterValue>", into = "BTreeMap<String, FilterValue>")]
pub struct ActiveFilterSet {
    filters: BTreeMap<String, FilterValue>,
}

impl ActiveFilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the constraint for `id`, or remove it when `value` is null,
    /// an empty string or an empty list. Returns whether `id` is now present.
    pub fn set_filter(&mut self, id: impl Into<String>, value: impl Into<FilterValue>) -> bool {
        let id = id.into();
        let value = value.into();
        if value.is_cleared() {
            self.filters.remove(&id);
            false
        } else {
            self.filters.insert(id, value);
            true
        }
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn get(&self, id: &str) -> Option<&FilterValue> {
        self.filters.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.filters.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.filters.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<BTreeMap<String, FilterValue>> for ActiveFilterSet {
    fn from(map: BTreeMap<String, FilterValue>) -> Self {
        let mut set = Self::new();
        for (id, value) in map {
            set.set_filter(id, value);
        }
        set
    }
}

impl From<ActiveFilterSet> for BTreeMap<String, FilterValue> {
    fn from(set: ActiveFilterSet) -> Self {
        set.filters
    }
}
