use std::path::PathBuf;

use crate::catalog;
use crate::error::Result;
use crate::facet::FacetDefinition;
use crate::query::{SearchQuery, SearchResult};
use crate::types::ListingRecord;

/// Supplies the records a search screen works over.
pub trait ListingSource: Send + Sync {
    fn listings(&self) -> Result<Vec<ListingRecord>>;
}

pub trait SearchEngine: Send + Sync {
    /// Pure and total: identical inputs give identical results, inputs are
    /// never mutated.
    fn evaluate(
        &self,
        records: &[ListingRecord],
        query: &SearchQuery,
        facets: &[FacetDefinition],
    ) -> SearchResult;
}

impl ListingSource for Vec<ListingRecord> {
    fn listings(&self) -> Result<Vec<ListingRecord>> {
        Ok(self.clone())
    }
}

/// Listings read from a JSON file or a directory of JSON files on every call.
#[derive(Debug, Clone)]
pub struct JsonListingSource {
    path: PathBuf,
}

impl JsonListingSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ListingSource for JsonListingSource {
    fn listings(&self) -> Result<Vec<ListingRecord>> {
        catalog::load_listings(&self.path)
    }
}
