use std::fs;
use tempfile::TempDir;

use gigsearch_core::catalog::{load_facets, load_listings, sample_services};
use gigsearch_core::config::{resolve_with_base, Config};
use gigsearch_core::contexts::SearchContext;
use gigsearch_core::error::Error;
use gigsearch_core::facet::{DateRange, FacetKind, FilterValue, NumericRange};
use gigsearch_core::query::{SearchQuery, SearchResult, SortKey};
use gigsearch_core::traits::{JsonListingSource, ListingSource};
use gigsearch_core::types::{parse_date, FieldValue, ListingKind, ListingRecord, Price};

#[test]
fn sample_catalog_has_ten_services() {
    let records = sample_services();
    assert_eq!(records.len(), 10);
    let programming = records.iter().filter(|r| r.category == "Programming").count();
    let teaching = records.iter().filter(|r| r.category == "Teaching").count();
    assert_eq!((programming, teaching), (2, 2));
    assert!(records.iter().all(|r| r.rating.is_some_and(|x| (4.6..=5.0).contains(&x))));
    let mut ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 10, "ids are unique");
}

#[test]
fn listing_json_accepts_source_field_names() {
    let raw = r#"{
        "id": "svc-x",
        "title": "Piano Lessons",
        "content": "Classical and jazz piano",
        "category": "Music",
        "hourlyRate": 55,
        "reviewCount": 12,
        "author": "Nina Simone",
        "createdAt": "2024-04-01T10:00:00Z",
        "deliveryTime": "Weekly",
        "payload": {"languages": ["English", "French"]}
    }"#;
    let record: ListingRecord = serde_json::from_str(raw).expect("record json");
    assert_eq!(record.kind, ListingKind::Service);
    assert_eq!(record.description, "Classical and jazz piano");
    assert_eq!(record.price, Some(Price::Fixed(55.0)));
    assert_eq!(record.popularity, Some(12));
    assert_eq!(record.provider.as_deref(), Some("Nina Simone"));
    assert!(record.created_at.is_some());
    assert_eq!(record.field("languages"), Some(FieldValue::List(vec!["English", "French"])));
    assert_eq!(record.field("deliveryTime"), None);
}

#[test]
fn field_lookup_prefers_projection() {
    let record = ListingRecord::new("p-1", ListingKind::Project, "Data pipeline")
        .with_price(Price::Range { min: 2000.0, max: 800.0 })
        .with_popularity(7)
        .with_payload("remote", true)
        .with_payload("budget", serde_json::json!({"min": 1, "max": 2}));
    assert_eq!(record.field("kind"), Some(FieldValue::Text("project")));
    assert_eq!(record.field("price"), Some(FieldValue::Range(800.0, 2000.0)));
    assert_eq!(record.field("popularity"), Some(FieldValue::Number(7.0)));
    assert_eq!(record.field("remote"), Some(FieldValue::Bool(true)));
    assert_eq!(record.field("budget"), Some(FieldValue::Range(1.0, 2.0)));
    assert_eq!(record.field("rating"), None);
}

#[test]
fn filter_values_deserialize_by_shape() {
    let parse = |s: &str| serde_json::from_str::<FilterValue>(s).expect("filter json");
    assert_eq!(parse("true"), FilterValue::Bool(true));
    assert_eq!(parse("4"), FilterValue::Number(4.0));
    assert_eq!(parse("\"Design\""), FilterValue::Text("Design".into()));
    assert_eq!(parse("[\"a\",\"b\"]"), FilterValue::from(vec!["a", "b"]));
    assert_eq!(parse("{\"min\": 10}"), FilterValue::Range(NumericRange::new(Some(10.0), None)));
    assert!(matches!(parse("{\"from\": \"2024-01-01T00:00:00Z\"}"), FilterValue::Dates(_)));
    assert_eq!(parse("null"), FilterValue::Null);
    assert!(parse("null").is_cleared());
}

#[test]
fn filter_values_keep_arrays_as_lists_and_accept_plain_dates() {
    let parse = |s: &str| serde_json::from_str::<FilterValue>(s).expect("filter json");
    assert_eq!(parse("[5]"), FilterValue::from(vec!["5"]));
    assert_eq!(parse("[4, 5]"), FilterValue::from(vec!["4", "5"]));
    assert_eq!(parse("[\"rust\", 2, true]"), FilterValue::from(vec!["rust", "2", "true"]));
    assert_eq!(
        parse("{\"from\": \"2024-02-01\", \"to\": \"2024-02-27\"}"),
        FilterValue::from(DateRange::new(parse_date("2024-02-01"), parse_date("2024-02-27")))
    );
    assert_eq!(
        parse("{\"min\": \"25\", \"max\": null}"),
        FilterValue::from(NumericRange::new(Some(25.0), None))
    );

    // Shapes that fit no constraint come out cleared instead of failing.
    assert_eq!(parse("{\"from\": \"last tuesday\"}"), FilterValue::Null);
    assert_eq!(parse("{\"min\": 1, \"to\": \"2024-01-01\"}"), FilterValue::Null);
    assert_eq!(parse("{\"gte\": 3}"), FilterValue::Null);
}

#[test]
fn query_json_drops_unusable_filters_and_clamps_paging() {
    let raw = r#"{
        "text": "tutor",
        "filters": {"createdAt": {"from": "2024-02-01", "to": "2024-02-27"}, "rating": {"gte": 4}},
        "page": -1,
        "limit": 0
    }"#;
    let query: SearchQuery = serde_json::from_str(raw).expect("query json");
    assert_eq!(query.filters.ids().collect::<Vec<_>>(), vec!["createdAt"]);
    assert_eq!((query.page, query.limit), (0, 0));
    assert_eq!((query.effective_page(), query.effective_limit()), (1, 1));

    let query: SearchQuery =
        serde_json::from_str(r#"{"page": "3", "limit": -20}"#).expect("query json");
    assert_eq!((query.effective_page(), query.effective_limit()), (3, 1));
}

#[test]
fn sort_keys_fall_back_to_relevance() {
    assert_eq!(SortKey::parse("price_high"), SortKey::PriceHigh);
    assert_eq!(SortKey::parse("Rating"), SortKey::Rating);
    assert_eq!(SortKey::parse("random"), SortKey::Relevance);
    assert_eq!(SortKey::parse(""), SortKey::Relevance);
    assert_eq!(serde_json::to_string(&SortKey::PriceLow).expect("json"), "\"price_low\"");
}

#[test]
fn search_contexts_declare_unique_facets() {
    for ctx in [SearchContext::Services, SearchContext::Projects, SearchContext::Freelancers] {
        let facets = ctx.facets();
        let mut ids: Vec<&str> = facets.iter().map(|f| f.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), facets.len(), "{} facet ids are unique", ctx.as_str());
        assert_eq!(facets[0].id, "category");
    }
    let projects = SearchContext::Projects.facets();
    let budget = projects.iter().find(|f| f.id == "budget").expect("budget facet");
    assert_eq!(budget.kind, FacetKind::NumericRange);
    assert_eq!(budget.field_name(), "price");
    assert!(matches!("freelancer".parse::<SearchContext>(), Ok(SearchContext::Freelancers)));
    assert!(matches!("gigs".parse::<SearchContext>(), Err(Error::NotFound(_))));
}

#[test]
fn load_listings_from_file_and_directory() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path();
    let records = sample_services();
    let json = |slice: &[ListingRecord]| serde_json::to_string(slice).expect("json");
    fs::write(dir.join("b.json"), json(&records[5..])).expect("write b");
    fs::create_dir(dir.join("a")).expect("mkdir");
    fs::write(dir.join("a").join("first.json"), json(&records[..5])).expect("write a");
    fs::write(dir.join("notes.txt"), "not a catalog").expect("write txt");

    let from_dir = load_listings(dir).expect("load dir");
    assert_eq!(from_dir, records, "files concatenate in path order");

    let from_file = load_listings(&dir.join("b.json")).expect("load file");
    assert_eq!(from_file.len(), 5);

    let source = JsonListingSource::new(dir.join("b.json"));
    assert_eq!(source.listings().expect("source"), from_file);
}

#[test]
fn load_listings_reports_missing_and_malformed_input() {
    let tmp = TempDir::new().expect("tempdir");
    assert!(matches!(load_listings(&tmp.path().join("missing.json")), Err(Error::NotFound(_))));

    let bad = tmp.path().join("bad.json");
    fs::write(&bad, "{ not json").expect("write");
    assert!(matches!(load_listings(&bad), Err(Error::Json(_))));

    let empty = TempDir::new().expect("tempdir");
    assert!(load_listings(empty.path()).expect("empty dir").is_empty());
}

#[cfg(unix)]
#[test]
fn load_listings_follows_links_and_skips_dangling_ones() {
    use std::os::unix::fs::symlink;

    let tmp = TempDir::new().expect("tempdir");
    let store = TempDir::new().expect("tempdir");
    let records = sample_services();
    let target = store.path().join("linked.json");
    fs::write(&target, serde_json::to_string(&records[..3]).expect("json")).expect("write");
    symlink(&target, tmp.path().join("a.json")).expect("symlink");
    symlink(store.path().join("gone.json"), tmp.path().join("b.json")).expect("dangling symlink");

    let loaded = load_listings(tmp.path()).expect("dangling entries are skipped");
    assert_eq!(loaded, records[..3].to_vec());
}

#[test]
fn load_facets_round_trips_context_definitions() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("facets.json");
    let facets = SearchContext::Services.facets();
    fs::write(&path, serde_json::to_string_pretty(&facets).expect("json")).expect("write");
    assert_eq!(load_facets(&path).expect("facets"), facets);
}

#[test]
fn config_merges_env_specific_file() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path();
    let base = "[search]\ndefault_limit = 12\nmax_limit = 60\n\n\
                [data]\nlistings_path = \"data/listings\"\n";
    fs::write(dir.join("config.toml"), base).expect("write config");
    let test = "[search]\nmax_limit = 24\n\n[logging]\nlevel = \"debug\"\n";
    fs::write(dir.join("config.test.toml"), test).expect("write test config");

    let config = Config::load_from(dir, "test").expect("config");
    let settings = config.settings();
    assert_eq!(settings.search.default_limit, 12);
    assert_eq!(settings.search.max_limit, 24);
    assert_eq!(settings.logging.level, "debug");
    assert_eq!(settings.search.default_sort_key(), SortKey::Relevance);
    assert_eq!(config.listings_path(), Some(dir.join("data/listings")));
    assert_eq!(config.facets_path(), None);
    assert_eq!(config.get::<usize>("search.default_limit").expect("key"), 12);
}

#[test]
fn config_defaults_without_files() {
    let tmp = TempDir::new().expect("tempdir");
    let config = Config::load_from(tmp.path(), "dev").expect("config");
    assert_eq!(config.settings().search.default_limit, 10);
    assert_eq!(config.settings().search.max_limit, 100);
    assert!(!config.settings().logging.json);
}

#[test]
fn config_rejects_inconsistent_limits() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("config.toml");
    fs::write(&path, "[search]\ndefault_limit = 50\nmax_limit = 20\n").expect("write");
    assert!(matches!(Config::load_from(tmp.path(), "dev"), Err(Error::InvalidConfig(_))));

    fs::write(&path, "[logging]\nlevel = \"loud\"\n").expect("write");
    assert!(matches!(Config::load_from(tmp.path(), "dev"), Err(Error::InvalidConfig(_))));
}

#[test]
fn logging_level_warning_maps_to_warn_directive() {
    let tmp = TempDir::new().expect("tempdir");
    fs::write(tmp.path().join("config.toml"), "[logging]\nlevel = \"WARNING\"\n").expect("write");
    let config = Config::load_from(tmp.path(), "dev").expect("config");
    assert_eq!(config.settings().logging.filter_directive(), "warn");
    assert_eq!(config.settings().logging.level, "WARNING");
}

#[test]
fn resolve_keeps_absolute_paths() {
    let tmp = TempDir::new().expect("tempdir");
    let abs = tmp.path().join("x.json");
    assert_eq!(resolve_with_base(std::path::Path::new("/elsewhere"), abs.to_string_lossy()), abs);
    assert_eq!(resolve_with_base(tmp.path(), "y.json"), tmp.path().join("y.json"));
}

#[test]
fn fingerprint_tracks_content() {
    let result = SearchResult {
        items: sample_services(),
        total_count: 10,
        current_page: 1,
        total_pages: 1,
        facets: vec![],
    };
    let same = result.clone();
    let mut other = result.clone();
    other.items.swap(0, 1);
    assert_eq!(result.fingerprint(), same.fingerprint());
    assert_ne!(result.fingerprint(), other.fingerprint());
}
