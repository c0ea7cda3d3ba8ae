use gigsearch_core::catalog::sample_services;
use gigsearch_core::contexts::SearchContext;
use gigsearch_core::query::{SearchQuery, SortKey, SortOrder};
use gigsearch_engine::{evaluate, SearchAnalytics};

#[test]
fn summary_counts_queries_and_empty_results() {
    let records = sample_services();
    let facets = SearchContext::Services.facets();
    let mut analytics = SearchAnalytics::new();

    let queries = [
        SearchQuery::new().with_text("Tutor"),
        SearchQuery::new().with_text("  tutor "),
        SearchQuery::new().with_text("submarine"),
        SearchQuery::new().with_text("design").with_filter("category", "Design"),
        SearchQuery::new().with_filter("category", "Music").with_filter("verified", true),
        SearchQuery::new().sorted_by(SortKey::PriceHigh, SortOrder::Desc),
    ];
    for query in &queries {
        let result = evaluate(&records, query, &facets);
        analytics.record(query, &result);
    }

    assert_eq!(analytics.len(), 6);
    let summary = analytics.summary(2);
    assert_eq!(summary.total_searches, 6);
    assert_eq!(summary.zero_result_searches, 2);
    assert_eq!(summary.top_queries.len(), 2);
    assert_eq!(summary.top_queries[0].text, "tutor");
    assert_eq!(summary.top_queries[0].count, 2);
    assert_eq!(summary.top_queries[1].text, "design");
    assert_eq!(summary.facet_usage[0].id, "category");
    assert_eq!(summary.facet_usage[0].count, 2);
}

#[test]
fn events_capture_the_query_shape() {
    let records = sample_services();
    let mut analytics = SearchAnalytics::new();
    let query = SearchQuery::new()
        .with_filter("verified", true)
        .with_filter("category", "Programming")
        .sorted_by(SortKey::Rating, SortOrder::Desc)
        .paged(1, 1);
    let result = evaluate(&records, &query, &SearchContext::Services.facets());
    analytics.record(&query, &result);

    let event = &analytics.events()[0];
    assert_eq!(event.facets, vec!["category".to_string(), "verified".to_string()]);
    assert_eq!(event.sort_by, SortKey::Rating);
    assert_eq!(event.total_count, 2);
    assert_eq!(event.page, 1);
    assert!(event.text.is_empty());
}

#[test]
fn empty_analytics_summarise_to_zero() {
    let summary = SearchAnalytics::new().summary(5);
    assert_eq!(summary.total_searches, 0);
    assert!(summary.top_queries.is_empty());
    assert!(summary.facet_usage.is_empty());
}
