use std::env;

use gigsearch_core::catalog::sample_services;
use gigsearch_core::contexts::SearchContext;
use gigsearch_core::query::{SearchQuery, SortKey, SortOrder};
use gigsearch_engine::{evaluate, SearchAnalytics};

// Run a few browse-screen queries over the sample catalog and print the
// facet sidebar the way the services page renders it.
// Usage:
//   cargo run -p gigsearch-engine --example browse -- [text] [category]

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let text = args.first().cloned().unwrap_or_default();
    let category = args.get(1).cloned().unwrap_or_default();

    let records = sample_services();
    let facets = SearchContext::Services.facets();
    let mut analytics = SearchAnalytics::new();

    let query = SearchQuery::new()
        .with_text(text)
        .with_filter("category", category)
        .sorted_by(SortKey::Rating, SortOrder::Desc)
        .paged(1, 5);
    let result = evaluate(&records, &query, &facets);
    analytics.record(&query, &result);

    println!("Services browse\n===============");
    println!(
        "{} matches, page {}/{}\n",
        result.total_count, result.current_page, result.total_pages
    );
    for r in &result.items {
        println!("  {:<8} {:<45} {:>4.1}", r.id, r.title, r.rating.unwrap_or_default());
    }
    for facet in &result.facets {
        println!("\n{} ({})", facet.id, facet.total);
        for o in &facet.options {
            println!("  {}{} -> {}", if o.selected { "* " } else { "  " }, o.label, o.count);
        }
    }
    let summary = analytics.summary(3);
    println!(
        "\nsearches recorded: {}, empty: {}",
        summary.total_searches, summary.zero_result_searches
    );
}
