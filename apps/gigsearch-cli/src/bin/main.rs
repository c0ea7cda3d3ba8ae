use std::env;
use std::path::PathBuf;

use gigsearch_core::catalog::{load_facets, load_listings, sample_services};
use gigsearch_core::config::{expand_path, Config, LoggingConfig};
use gigsearch_core::contexts::SearchContext;
use gigsearch_core::facet::{DateRange, FacetDefinition, FacetKind, FilterValue, NumericRange};
use gigsearch_core::query::{SearchQuery, SearchResult, SortKey, SortOrder};
use gigsearch_core::types::{parse_date, ListingRecord};
use gigsearch_engine::FacetedSearchEngine;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: gigsearch <search|facets|sample> [args...]

  search [TEXT] [--context services|projects|freelancers] [--data PATH]
         [--facets-file PATH] [--filter ID=VALUE]... [--sort KEY]
         [--order asc|desc] [--page N] [--limit N] [--json] [--show-facets]
  facets [--context ...]
  sample

Filter values: min..max is a range (either side may be empty), true/false a
boolean, a number a number; a,b is a list for multi-select facets only. An
empty value clears the filter.";

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_env("GIGSEARCH_LOG")
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directive()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Interpret a command-line filter value by its shape. Commas only split
/// values for multi-select facets, so "Madrid, Spain" stays one location.
fn parse_filter_value(raw: &str, kind: Option<FacetKind>) -> FilterValue {
    let raw = raw.trim();
    if raw.is_empty() {
        return FilterValue::Null;
    }
    if kind == Some(FacetKind::MultiSelect) {
        let items: Vec<&str> = raw.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
        return items.into();
    }
    if let Ok(b) = raw.parse::<bool>() {
        return FilterValue::Bool(b);
    }
    if let Some((lo, hi)) = raw.split_once("..") {
        let (lo, hi) = (lo.trim(), hi.trim());
        let number =
            |s: &str| if s.is_empty() { Some(None) } else { s.parse::<f64>().ok().map(Some) };
        if let (Some(min), Some(max)) = (number(lo), number(hi)) {
            return NumericRange::new(min, max).into();
        }
        let date = |s: &str| if s.is_empty() { Some(None) } else { parse_date(s).map(Some) };
        if let (Some(from), Some(to)) = (date(lo), date(hi)) {
            return DateRange::new(from, to).into();
        }
    }
    match raw.parse::<f64>() {
        Ok(n) => FilterValue::Number(n),
        Err(_) => FilterValue::Text(raw.to_string()),
    }
}

/// `--page`/`--limit` value; negatives clamp to 0 and then to 1 in the query.
fn parse_count(raw: &str, flag: &str) -> anyhow::Result<usize> {
    let n: i64 = raw
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{flag} expects an integer, got '{raw}': {e}"))?;
    Ok(usize::try_from(n).unwrap_or(0))
}

struct SearchArgs {
    context: SearchContext,
    data: Option<PathBuf>,
    facets_file: Option<PathBuf>,
    /// Raw `ID=VALUE` pairs, parsed once the facet definitions are known.
    filters: Vec<(String, String)>,
    query: SearchQuery,
    json: bool,
    show_facets: bool,
}

fn next_value<'a>(args: &'a [String], i: usize, flag: &str) -> anyhow::Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("{flag} requires a value"))
}

fn parse_search_args(args: &[String], config: &Config) -> anyhow::Result<SearchArgs> {
    let search = &config.settings().search;
    let mut parsed = SearchArgs {
        context: SearchContext::default(),
        data: None,
        facets_file: None,
        filters: Vec::new(),
        query: SearchQuery::new()
            .paged(1, search.default_limit)
            .sorted_by(search.default_sort_key(), SortOrder::Desc),
        json: false,
        show_facets: false,
    };
    let mut words: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--json" => parsed.json = true,
            "--show-facets" => parsed.show_facets = true,
            "--context" | "--data" | "--facets-file" | "--filter" | "--sort" | "--order"
            | "--page" | "--limit" => {
                let value = next_value(args, i, flag)?;
                match flag {
                    "--context" => parsed.context = value.parse()?,
                    "--data" => parsed.data = Some(expand_path(value)),
                    "--facets-file" => parsed.facets_file = Some(expand_path(value)),
                    "--filter" => {
                        let (id, raw) = value.split_once('=').ok_or_else(|| {
                            anyhow::anyhow!("--filter expects ID=VALUE, got '{value}'")
                        })?;
                        parsed.filters.push((id.trim().to_string(), raw.to_string()));
                    }
                    "--sort" => parsed.query.sort_by = SortKey::parse(value),
                    "--order" => parsed.query.sort_order = SortOrder::parse(value),
                    "--page" => parsed.query.page = parse_count(value, flag)?,
                    _ => parsed.query.limit = parse_count(value, flag)?,
                }
                i += 1;
            }
            s if s.starts_with("--") => anyhow::bail!("Unknown flag: {s}"),
            s => words.push(s),
        }
        i += 1;
    }
    parsed.query.text = words.join(" ");
    Ok(parsed)
}

/// Apply `ID=VALUE` pairs in order through `set_filter`, so a later empty
/// value clears an earlier one.
fn apply_filters(
    query: &mut SearchQuery,
    filters: &[(String, String)],
    facets: &[FacetDefinition],
) {
    for (id, raw) in filters {
        let kind = facets.iter().find(|f| &f.id == id).map(|f| f.kind);
        query.filters.set_filter(id.as_str(), parse_filter_value(raw, kind));
    }
}

fn load_records(data: Option<PathBuf>, config: &Config) -> anyhow::Result<Vec<ListingRecord>> {
    match data.or_else(|| config.listings_path()) {
        Some(path) => Ok(load_listings(&path)?),
        None => {
            tracing::info!("no listings path configured, using the sample catalog");
            Ok(sample_services())
        }
    }
}

fn load_facet_definitions(
    file: Option<PathBuf>,
    context: SearchContext,
    config: &Config,
) -> anyhow::Result<Vec<FacetDefinition>> {
    match file.or_else(|| config.facets_path()) {
        Some(path) => Ok(load_facets(&path)?),
        None => Ok(context.facets()),
    }
}

fn print_result(result: &SearchResult, show_facets: bool) {
    println!(
        "Found {} results (page {}/{})",
        result.total_count, result.current_page, result.total_pages
    );
    for (i, r) in result.items.iter().enumerate() {
        let rating = r.rating.map_or_else(|| "-".to_string(), |x| format!("{x:.1}"));
        let price = r.price.map_or_else(
            || "-".to_string(),
            |p| match p.bounds() {
                (lo, hi) if (hi - lo).abs() < f64::EPSILON => format!("${lo:.0}"),
                (lo, hi) => format!("${lo:.0}-${hi:.0}"),
            },
        );
        println!(
            "{:>3}. [{}] {}  category={} rating={} price={}",
            i + 1,
            r.id,
            r.title,
            r.category,
            rating,
            price
        );
        if let Some(provider) = &r.provider {
            println!("     by {provider}");
        }
    }
    if show_facets {
        println!("\nFacets:");
        for facet in &result.facets {
            println!("  {} ({} in scope)", facet.id, facet.total);
            for o in &facet.options {
                let mark = if o.selected { "[x]" } else { "[ ]" };
                println!("    {mark} {} -> {}", o.label, o.count);
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {e}");
        e
    })?;
    init_logging(&config.settings().logging);

    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("{USAGE}");
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    match cmd.as_str() {
        "search" => {
            let mut parsed = parse_search_args(&args, &config)?;
            let records = load_records(parsed.data, &config)?;
            let facets = load_facet_definitions(parsed.facets_file, parsed.context, &config)?;
            apply_filters(&mut parsed.query, &parsed.filters, &facets);
            let engine = FacetedSearchEngine::from_config(&config.settings().search);
            let result = engine.evaluate(&records, &parsed.query, &facets);
            if parsed.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result, parsed.show_facets);
            }
        }
        "facets" => {
            let context = match args.iter().position(|a| a == "--context") {
                Some(i) => next_value(&args, i, "--context")?.parse()?,
                None => SearchContext::default(),
            };
            println!("{}", serde_json::to_string_pretty(&context.facets())?);
        }
        "sample" => println!("{}", serde_json::to_string_pretty(&sample_services())?),
        "-h" | "--help" | "help" => println!("{USAGE}"),
        _ => {
            eprintln!("Unknown command: {cmd}\n\n{USAGE}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gigsearch_engine::evaluate;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn test_config() -> Config {
        let dir = tempfile::TempDir::new().expect("tempdir");
        Config::load_from(dir.path(), "test").expect("config")
    }

    #[test]
    fn filter_values_parse_by_shape() {
        assert_eq!(parse_filter_value("", None), FilterValue::Null);
        assert_eq!(parse_filter_value("true", None), FilterValue::Bool(true));
        assert_eq!(parse_filter_value("4", None), FilterValue::Number(4.0));
        assert_eq!(
            parse_filter_value("Programming", Some(FacetKind::SingleSelect)),
            FilterValue::Text("Programming".into())
        );
        assert_eq!(
            parse_filter_value("rust, go", Some(FacetKind::MultiSelect)),
            FilterValue::from(vec!["rust", "go"])
        );
        assert_eq!(
            parse_filter_value("25..50", Some(FacetKind::NumericRange)),
            FilterValue::from(NumericRange::new(Some(25.0), Some(50.0)))
        );
        assert_eq!(
            parse_filter_value("..50", None),
            FilterValue::from(NumericRange::new(None, Some(50.0)))
        );
        assert_eq!(
            parse_filter_value("2024-02-01..2024-02-29", Some(FacetKind::Date)),
            FilterValue::from(DateRange::new(parse_date("2024-02-01"), parse_date("2024-02-29")))
        );
    }

    #[test]
    fn commas_stay_inside_single_select_values() {
        assert_eq!(
            parse_filter_value("Madrid, Spain", Some(FacetKind::SingleSelect)),
            FilterValue::Text("Madrid, Spain".into())
        );

        let config = test_config();
        let mut parsed = parse_search_args(&args(&["--filter", "location=Madrid, Spain"]), &config)
            .expect("args");
        let facets = SearchContext::Services.facets();
        apply_filters(&mut parsed.query, &parsed.filters, &facets);
        let result = evaluate(&sample_services(), &parsed.query, &facets);
        assert_eq!(result.ids(), vec!["svc-2"]);
    }

    #[test]
    fn later_empty_filter_clears_earlier_one() {
        let config = test_config();
        let raw = args(&["--filter", "category=Design", "--filter", "category="]);
        let mut parsed = parse_search_args(&raw, &config).expect("args");
        apply_filters(&mut parsed.query, &parsed.filters, &SearchContext::Services.facets());
        assert!(parsed.query.filters.is_empty());
    }

    #[test]
    fn page_and_limit_flags_clamp_or_fail() {
        let config = test_config();
        let raw = args(&["web", "--limit", "-3", "--page", "0", "dev"]);
        let parsed = parse_search_args(&raw, &config).expect("args");
        assert_eq!(parsed.query.text, "web dev");
        assert_eq!(parsed.query.effective_limit(), 1);
        assert_eq!(parsed.query.effective_page(), 1);

        assert!(parse_search_args(&args(&["--page", "abc"]), &config).is_err());
        assert!(parse_search_args(&args(&["--limit"]), &config).is_err());
    }
}
