use std::cmp::Ordering;

use gigsearch_core::query::{SortKey, SortOrder};
use gigsearch_core::types::{ListingRecord, Price};

/// Stable sort of `indices` (positions into `records`) by `key`.
///
/// Records lacking the sort field go last in either direction. `Relevance`
/// leaves the order untouched.
pub fn sort_indices(
    records: &[ListingRecord],
    indices: &mut [usize],
    key: SortKey,
    order: SortOrder,
) {
    if key == SortKey::Relevance {
        return;
    }
    let order = key.fixed_order().unwrap_or(order);
    indices.sort_by(|&a, &b| compare(&records[a], &records[b], key, order));
}

fn compare(a: &ListingRecord, b: &ListingRecord, key: SortKey, order: SortOrder) -> Ordering {
    match key {
        SortKey::Relevance => Ordering::Equal,
        SortKey::Date => directed(a.created_at, b.created_at, order, Ord::cmp),
        SortKey::Rating => directed(a.rating, b.rating, order, f64::total_cmp),
        SortKey::PriceLow => {
            directed(a.price.map(Price::low), b.price.map(Price::low), order, f64::total_cmp)
        }
        SortKey::PriceHigh => {
            directed(a.price.map(Price::high), b.price.map(Price::high), order, f64::total_cmp)
        }
        SortKey::Popularity => directed(a.popularity, b.popularity, order, Ord::cmp),
    }
}

fn directed<T>(
    a: Option<T>,
    b: Option<T>,
    order: SortOrder,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => match order {
            SortOrder::Asc => cmp(&x, &y),
            SortOrder::Desc => cmp(&y, &x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
