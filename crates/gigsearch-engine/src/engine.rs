//! The filter, sort and paginate pipeline.

use gigsearch_core::config::SearchConfig;
use gigsearch_core::facet::{ActiveFilterSet, FacetDefinition};
use gigsearch_core::query::{SearchQuery, SearchResult};
use gigsearch_core::traits::SearchEngine;
use gigsearch_core::types::ListingRecord;

use crate::facets::count_facet;
use crate::paginate::page_window;
use crate::predicate::Predicate;
use crate::sort::sort_indices;
use crate::text::{matches_text, normalize_query};

/// Stateless engine over in-memory listings.
///
/// Every screen (service browse, project and freelancer search) is the same
/// engine with a different facet set.
#[derive(Debug, Clone)]
pub struct FacetedSearchEngine {
    max_limit: Option<usize>,
    facet_counts: bool,
}

impl Default for FacetedSearchEngine {
    fn default() -> Self {
        Self { max_limit: None, facet_counts: true }
    }
}

struct ActiveConstraint<'a> {
    facet: usize,
    field: &'a str,
    predicate: Predicate,
}

/// A text-matching record together with the one facet it fails, if any.
/// Records failing two or more facets can't appear in any facet's base set.
struct Candidate {
    index: usize,
    failed: Option<usize>,
}

impl FacetedSearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap page sizes; applied after `limit` is clamped to at least 1.
    pub fn with_max_limit(mut self, max_limit: usize) -> Self {
        self.max_limit = Some(max_limit.max(1));
        self
    }

    /// Skip histogram computation; `SearchResult::facets` comes back empty.
    pub fn without_facet_counts(mut self) -> Self {
        self.facet_counts = false;
        self
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new().with_max_limit(config.max_limit)
    }

    pub fn evaluate(
        &self,
        records: &[ListingRecord],
        query: &SearchQuery,
        facets: &[FacetDefinition],
    ) -> SearchResult {
        let page = query.effective_page();
        let limit = match self.max_limit {
            Some(max) => query.effective_limit().min(max),
            None => query.effective_limit(),
        };
        let needle = normalize_query(&query.text);
        let constraints = compile_constraints(&query.filters, facets);

        let mut matched = Vec::new();
        let mut candidates = Vec::new();
        for (index, record) in records.iter().enumerate() {
            if !matches_text(record, &needle) {
                continue;
            }
            let mut failed = None;
            let mut failures = 0usize;
            for c in &constraints {
                if !c.predicate.test(record.field(c.field)) {
                    failures += 1;
                    failed = Some(c.facet);
                    if failures > 1 {
                        break;
                    }
                }
            }
            match failures {
                0 => {
                    matched.push(index);
                    candidates.push(Candidate { index, failed: None });
                }
                1 => candidates.push(Candidate { index, failed }),
                _ => {}
            }
        }

        let total_count = matched.len();
        sort_indices(records, &mut matched, query.sort_by, query.sort_order);
        let window = page_window(total_count, page, limit);
        let items: Vec<ListingRecord> =
            matched[window.range.clone()].iter().map(|&i| records[i].clone()).collect();

        let facet_counts = if self.facet_counts {
            facets
                .iter()
                .enumerate()
                .map(|(f, def)| {
                    let base: Vec<usize> = candidates
                        .iter()
                        .filter(|c| c.failed.is_none() || c.failed == Some(f))
                        .map(|c| c.index)
                        .collect();
                    count_facet(records, def, &base, query.filters.get(&def.id))
                })
                .collect()
        } else {
            Vec::new()
        };

        tracing::debug!(
            records = records.len(),
            text_matches = candidates.len(),
            constraints = constraints.len(),
            total_count,
            page,
            limit,
            sort = query.sort_by.as_str(),
            "evaluated search"
        );

        SearchResult {
            items,
            total_count,
            current_page: page,
            total_pages: window.total_pages,
            facets: facet_counts,
        }
    }
}

impl SearchEngine for FacetedSearchEngine {
    fn evaluate(
        &self,
        records: &[ListingRecord],
        query: &SearchQuery,
        facets: &[FacetDefinition],
    ) -> SearchResult {
        Self::evaluate(self, records, query, facets)
    }
}

/// Evaluate with default settings: no page-size cap, facet counts included.
pub fn evaluate(
    records: &[ListingRecord],
    query: &SearchQuery,
    facets: &[FacetDefinition],
) -> SearchResult {
    FacetedSearchEngine::new().evaluate(records, query, facets)
}

fn compile_constraints<'a>(
    filters: &ActiveFilterSet,
    facets: &'a [FacetDefinition],
) -> Vec<ActiveConstraint<'a>> {
    let mut constraints = Vec::with_capacity(filters.len());
    for (id, value) in filters.iter() {
        let Some(facet) = facets.iter().position(|f| f.id == id) else {
            tracing::trace!(facet = id, "ignoring filter for undeclared facet");
            continue;
        };
        let def = &facets[facet];
        match Predicate::compile(def.kind, value) {
            Some(predicate) => {
                constraints.push(ActiveConstraint { facet, field: def.field_name(), predicate });
            }
            None => {
                tracing::debug!(
                    facet = id,
                    value = %value,
                    "ignoring filter value that does not fit the facet kind"
                );
            }
        }
    }
    constraints
}
