//! Facet constraints compiled into predicates over record fields.

use chrono::{DateTime, Utc};

use gigsearch_core::facet::{FacetKind, FilterValue};
use gigsearch_core::types::FieldValue;

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Scalar {
    fn from_filter(value: &FilterValue) -> Option<Self> {
        match value {
            FilterValue::Text(s) => Some(Self::Text(s.clone())),
            FilterValue::Number(n) => Some(Self::Number(*n)),
            FilterValue::Bool(b) => Some(Self::Bool(*b)),
            _ => None,
        }
    }

    fn matches(&self, field: &FieldValue<'_>) -> bool {
        match (self, field) {
            (Self::Text(s), FieldValue::Text(t)) => s == t,
            (Self::Text(s), FieldValue::List(items)) => items.iter().any(|t| s == t),
            (Self::Text(s), FieldValue::Number(n)) => parsed_number(s, *n),
            (Self::Text(s), FieldValue::Bool(b)) => s.trim().parse::<bool>().is_ok_and(|v| v == *b),
            (Self::Number(n), FieldValue::Number(m)) => same_number(*n, *m),
            (Self::Number(n), FieldValue::Text(t)) => parsed_number(t, *n),
            (Self::Bool(b), FieldValue::Bool(c)) => b == c,
            (Self::Bool(b), FieldValue::Text(t)) => t.trim().parse::<bool>().is_ok_and(|v| v == *b),
            _ => false,
        }
    }
}

fn same_number(a: f64, b: f64) -> bool {
    (a - b).abs() <= f64::EPSILON
}

fn parsed_number(text: &str, n: f64) -> bool {
    text.trim().parse::<f64>().is_ok_and(|v| same_number(v, n))
}

/// A constraint ready to test against records.
///
/// Built once per query from a facet kind and the chosen value. Values whose
/// shape does not fit the kind compile to `None` and the constraint is
/// dropped rather than rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Contains(String),
    OneOf(Vec<Scalar>),
    Between { min: Option<f64>, max: Option<f64> },
    Is(bool),
    AtLeast(f64),
    Within { from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>> },
}

impl Predicate {
    pub fn compile(kind: FacetKind, value: &FilterValue) -> Option<Self> {
        if value.is_cleared() {
            return None;
        }
        match kind {
            FacetKind::Text => match value {
                FilterValue::Text(s) => Some(Self::Contains(s.to_lowercase())),
                FilterValue::Number(n) => Some(Self::Contains(n.to_string())),
                _ => None,
            },
            FacetKind::SingleSelect | FacetKind::MultiSelect => match value {
                FilterValue::List(items) => {
                    Some(Self::OneOf(items.iter().map(|s| Scalar::Text(s.clone())).collect()))
                }
                other => Scalar::from_filter(other).map(|s| Self::OneOf(vec![s])),
            },
            FacetKind::NumericRange => match value {
                FilterValue::Range(r) => {
                    let (min, max) = r.normalized();
                    Some(Self::Between { min, max })
                }
                FilterValue::Number(n) => Some(Self::Between { min: Some(*n), max: Some(*n) }),
                _ => None,
            },
            FacetKind::Boolean => value.as_bool().map(Self::Is),
            FacetKind::StarRating => value.as_number().map(|n| Self::AtLeast(n.floor())),
            FacetKind::Date => match value {
                FilterValue::Dates(d) => {
                    let (from, to) = d.normalized();
                    Some(Self::Within { from, to })
                }
                _ => None,
            },
        }
    }

    /// A record with no value for the field never matches.
    pub fn test(&self, field: Option<FieldValue<'_>>) -> bool {
        let Some(field) = field else { return false };
        match self {
            Self::Contains(needle) => match &field {
                FieldValue::Text(t) => t.to_lowercase().contains(needle.as_str()),
                FieldValue::List(items) => {
                    items.iter().any(|t| t.to_lowercase().contains(needle.as_str()))
                }
                FieldValue::Number(n) => n.to_string().contains(needle.as_str()),
                _ => false,
            },
            Self::OneOf(scalars) => scalars.iter().any(|s| s.matches(&field)),
            Self::Between { min, max } => field.as_interval().is_some_and(|(lo, hi)| {
                min.map_or(true, |m| hi >= m) && max.map_or(true, |m| lo <= m)
            }),
            Self::Is(b) => match field {
                FieldValue::Bool(c) => c == *b,
                FieldValue::Text(t) => t.trim().parse::<bool>().is_ok_and(|c| c == *b),
                _ => false,
            },
            Self::AtLeast(threshold) => field.as_interval().is_some_and(|(_, hi)| hi >= *threshold),
            Self::Within { from, to } => field.as_date().is_some_and(|d| {
                from.map_or(true, |f| d >= f) && to.map_or(true, |t| d <= t)
            }),
        }
    }
}
