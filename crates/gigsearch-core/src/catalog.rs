//! Listing catalogs: the built-in sample data and JSON files on disk.

use chrono::{DateTime, TimeZone, Utc};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::facet::FacetDefinition;
use crate::types::{ListingKind, ListingRecord, Price};

fn day(year: i32, month: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, d, 0, 0, 0).single().unwrap_or_default()
}

/// The ten mock services the browse screen ships with.
pub fn sample_services() -> Vec<ListingRecord> {
    let service = |id: &str, title: &str, category: &str| {
        ListingRecord::new(id, ListingKind::Service, title).with_category(category)
    };
    vec![
        service("svc-1", "Full-Stack Web Development", "Programming")
            .with_description(
                "React and Node.js applications built end to end, from database design to \
                 deployment.",
            )
            .with_provider("Alex Chen")
            .with_location("San Francisco, CA")
            .with_rating(4.9)
            .with_price(Price::Fixed(85.0))
            .with_popularity(127)
            .with_created_at(day(2024, 1, 15))
            .with_payload("verified", true)
            .with_payload("deliveryTime", "2-4 weeks"),
        service("svc-2", "Spanish-English Translation", "Translation")
            .with_description("Certified translation of legal, medical and business documents.")
            .with_provider("Maria Garcia")
            .with_location("Madrid, Spain")
            .with_rating(4.8)
            .with_price(Price::Fixed(45.0))
            .with_popularity(89)
            .with_created_at(day(2024, 2, 3))
            .with_payload("verified", true)
            .with_payload("deliveryTime", "1-3 days"),
        service("svc-3", "Logo & Brand Identity Design", "Design")
            .with_description(
                "Distinctive logos, color palettes and brand guidelines for startups.",
            )
            .with_provider("Sam Rivera")
            .with_location("Austin, TX")
            .with_rating(5.0)
            .with_price(Price::Fixed(75.0))
            .with_popularity(203)
            .with_created_at(day(2024, 1, 28))
            .with_payload("verified", false)
            .with_payload("deliveryTime", "1 week"),
        service("svc-4", "Math Tutoring for High School and College", "Teaching")
            .with_description(
                "Algebra, calculus and statistics sessions with worked examples and practice sets.",
            )
            .with_provider("Priya Patel")
            .with_location("Remote")
            .with_rating(4.7)
            .with_price(Price::Fixed(40.0))
            .with_popularity(64)
            .with_created_at(day(2024, 3, 10))
            .with_payload("verified", true)
            .with_payload("deliveryTime", "Flexible"),
        service("svc-5", "Guitar Lessons for Beginners", "Music")
            .with_description("Acoustic and electric guitar fundamentals, chords and first songs.")
            .with_provider("Jordan Lee")
            .with_location("Nashville, TN")
            .with_rating(4.9)
            .with_price(Price::Fixed(35.0))
            .with_popularity(58)
            .with_created_at(day(2024, 2, 20))
            .with_payload("verified", false)
            .with_payload("deliveryTime", "Weekly"),
        service("svc-6", "Mobile App Development for iOS and Android", "Programming")
            .with_description("Native and cross-platform apps with Swift, Kotlin or Flutter.")
            .with_provider("Wei Zhang")
            .with_location("Seattle, WA")
            .with_rating(4.8)
            .with_price(Price::Fixed(95.0))
            .with_popularity(142)
            .with_created_at(day(2024, 3, 2))
            .with_payload("verified", true)
            .with_payload("deliveryTime", "4-8 weeks"),
        service("svc-7", "Blog Posts and Copywriting", "Writing")
            .with_description("SEO-friendly articles, landing page copy and newsletters.")
            .with_provider("Emma Wilson")
            .with_location("London, UK")
            .with_rating(4.6)
            .with_price(Price::Fixed(50.0))
            .with_popularity(76)
            .with_created_at(day(2024, 1, 5))
            .with_payload("verified", false)
            .with_payload("deliveryTime", "3-5 days"),
        service("svc-8", "Private Chef and Meal Prep", "Cooking")
            .with_description("Weekly meal plans and in-home cooking for families and events.")
            .with_provider("Luca Rossi")
            .with_location("New York, NY")
            .with_rating(4.8)
            .with_price(Price::Fixed(60.0))
            .with_popularity(41)
            .with_created_at(day(2024, 2, 14))
            .with_payload("verified", true)
            .with_payload("deliveryTime", "Same week"),
        service("svc-9", "Portrait and Event Photography", "Photography")
            .with_description("Headshots, weddings and corporate events with edited galleries.")
            .with_provider("Aisha Khan")
            .with_location("Chicago, IL")
            .with_rating(4.9)
            .with_price(Price::Fixed(120.0))
            .with_popularity(95)
            .with_created_at(day(2024, 3, 18))
            .with_payload("verified", true)
            .with_payload("deliveryTime", "1-2 weeks"),
        service("svc-10", "Conversational English Lessons", "Teaching")
            .with_description(
                "Online ESL tutor for adults: speaking practice, pronunciation and interview prep.",
            )
            .with_provider("Tom Baker")
            .with_location("Remote")
            .with_rating(4.7)
            .with_price(Price::Fixed(30.0))
            .with_popularity(112)
            .with_created_at(day(2024, 2, 27))
            .with_payload("verified", false)
            .with_payload("deliveryTime", "Flexible"),
    ]
}

/// Read listings from a JSON array file, or from every `*.json` file under a
/// directory, concatenated in path order. Symlinks are followed; entries that
/// cannot be read (dangling links, permission errors) are logged and skipped.
pub fn load_listings(path: &Path) -> Result<Vec<ListingRecord>> {
    if !path.exists() {
        return Err(Error::NotFound(path.display().to_string()));
    }
    if path.is_file() {
        let records = read_json_array(path)?;
        tracing::info!(path = %path.display(), count = records.len(), "loaded listings");
        return Ok(records);
    }
    let files = list_json_files(path);
    if files.is_empty() {
        tracing::warn!(dir = %path.display(), "no .json files found");
        return Ok(vec![]);
    }
    let mut all = Vec::new();
    for file in &files {
        let records: Vec<ListingRecord> = read_json_array(file)?;
        tracing::debug!(file = %file.display(), count = records.len(), "read listing file");
        all.extend(records);
    }
    tracing::info!(files = files.len(), count = all.len(), "loaded listings");
    Ok(all)
}

pub fn load_facets(path: &Path) -> Result<Vec<FacetDefinition>> {
    if !path.is_file() {
        return Err(Error::NotFound(path.display().to_string()));
    }
    read_json_array(path)
}

fn read_json_array<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(serde_json::from_str(&raw)?)
}

fn list_json_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                let path = err.path().map(|p| p.display().to_string()).unwrap_or_default();
                tracing::warn!(path = %path, error = %err, "skipping unreadable catalog entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    files.sort();
    files
}
