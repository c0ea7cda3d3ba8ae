//! gigsearch-engine
//!
//! Faceted filter, sort and paginate over in-memory listings. See
//! [`FacetedSearchEngine::evaluate`] for the pipeline and [`analytics`] for
//! per-session query statistics.

pub mod analytics;
pub mod engine;
pub mod facets;
pub mod paginate;
pub mod predicate;
pub mod sort;
pub mod text;

pub use analytics::{AnalyticsSummary, SearchAnalytics, SearchEvent};
pub use engine::{evaluate, FacetedSearchEngine};
