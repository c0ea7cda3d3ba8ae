//! Per-facet option histograms.

use std::collections::HashMap;

use gigsearch_core::facet::{FacetDefinition, FilterValue};
use gigsearch_core::query::{FacetCounts, OptionCount};
use gigsearch_core::types::{FieldValue, ListingRecord};

use crate::predicate::Predicate;

/// Count each option of `facet` over `base`, the records that pass the text
/// query and every active constraint except this facet's own.
///
/// Declared options are counted by the predicate selecting them would apply.
/// Select facets without declared options list the distinct values present
/// in `base`, most frequent first.
pub fn count_facet(
    records: &[ListingRecord],
    facet: &FacetDefinition,
    base: &[usize],
    active: Option<&FilterValue>,
) -> FacetCounts {
    let options = if !facet.options.is_empty() {
        facet
            .options
            .iter()
            .map(|option| {
                let count = Predicate::compile(facet.kind, &option.value).map_or(0, |p| {
                    base.iter().filter(|&&i| p.test(records[i].field(facet.field_name()))).count()
                });
                OptionCount {
                    value: option.value.clone(),
                    label: option.label.clone(),
                    count,
                    selected: is_selected(&option.value, active),
                }
            })
            .collect()
    } else if facet.kind.is_selectable() {
        distinct_values(records, facet.field_name(), base)
            .into_iter()
            .map(|(value, count)| {
                let value = FilterValue::Text(value);
                let selected = is_selected(&value, active);
                OptionCount { label: value.to_string(), value, count, selected }
            })
            .collect()
    } else {
        Vec::new()
    };
    FacetCounts { id: facet.id.clone(), total: base.len(), options }
}

fn is_selected(option: &FilterValue, active: Option<&FilterValue>) -> bool {
    match (active, option) {
        (None, _) => false,
        (Some(FilterValue::List(items)), FilterValue::Text(v)) => items.contains(v),
        (Some(value), _) => value == option,
    }
}

fn distinct_values(records: &[ListingRecord], field: &str, base: &[usize]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut bump = |value: &str| {
        if value.is_empty() {
            return;
        }
        match slots.get(value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(value.to_string(), counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    };
    for &i in base {
        match records[i].field(field) {
            Some(FieldValue::Text(t)) => bump(t),
            Some(FieldValue::List(items)) => {
                for (k, item) in items.iter().enumerate() {
                    if !items[..k].contains(item) {
                        bump(item);
                    }
                }
            }
            _ => {}
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
