//! Search analytics: what people searched for and how often it came up empty.
//!
//! Owned by the host session; nothing here is shared or persisted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use gigsearch_core::query::{SearchQuery, SearchResult, SortKey};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchEvent {
    pub text: String,
    pub facets: Vec<String>,
    pub sort_by: SortKey,
    pub page: usize,
    pub total_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryCount {
    pub text: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacetUsage {
    pub id: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_searches: usize,
    pub zero_result_searches: usize,
    pub top_queries: Vec<QueryCount>,
    pub facet_usage: Vec<FacetUsage>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchAnalytics {
    events: Vec<SearchEvent>,
}

impl SearchAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, query: &SearchQuery, result: &SearchResult) {
        self.events.push(SearchEvent {
            text: normalize(&query.text),
            facets: query.filters.ids().map(str::to_string).collect(),
            sort_by: query.sort_by,
            page: result.current_page,
            total_count: result.total_count,
        });
    }

    pub fn events(&self) -> &[SearchEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Aggregate recorded events. Query texts are compared after trimming,
    /// lowercasing and collapsing whitespace; empty texts are not ranked.
    /// Lists are ordered by count, then alphabetically, and truncated to `top_n`.
    pub fn summary(&self, top_n: usize) -> AnalyticsSummary {
        let mut queries: BTreeMap<&str, usize> = BTreeMap::new();
        let mut facets: BTreeMap<&str, usize> = BTreeMap::new();
        for event in &self.events {
            if !event.text.is_empty() {
                *queries.entry(event.text.as_str()).or_insert(0) += 1;
            }
            for id in &event.facets {
                *facets.entry(id.as_str()).or_insert(0) += 1;
            }
        }
        let mut top_queries: Vec<QueryCount> = queries
            .into_iter()
            .map(|(text, count)| QueryCount { text: text.to_string(), count })
            .collect();
        top_queries.sort_by(|a, b| b.count.cmp(&a.count));
        top_queries.truncate(top_n);

        let mut facet_usage: Vec<FacetUsage> = facets
            .into_iter()
            .map(|(id, count)| FacetUsage { id: id.to_string(), count })
            .collect();
        facet_usage.sort_by(|a, b| b.count.cmp(&a.count));
        facet_usage.truncate(top_n);

        AnalyticsSummary {
            total_searches: self.events.len(),
            zero_result_searches: self.events.iter().filter(|e| e.total_count == 0).count(),
            top_queries,
            facet_usage,
        }
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace().map(str::to_lowercase).collect::<Vec<_>>().join(" ")
}
