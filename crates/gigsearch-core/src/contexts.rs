//! Built-in facet sets for the marketplace's search screens.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;
use crate::facet::{FacetDefinition, FacetKind, NumericRange};

pub const SERVICE_CATEGORIES: [&str; 8] = [
    "Programming",
    "Translation",
    "Design",
    "Teaching",
    "Music",
    "Writing",
    "Cooking",
    "Photography",
];

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SearchContext {
    #[default]
    Services,
    Projects,
    Freelancers,
}

impl SearchContext {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::Projects => "projects",
            Self::Freelancers => "freelancers",
        }
    }

    /// Facet definitions in rendering order.
    pub fn facets(self) -> Vec<FacetDefinition> {
        match self {
            Self::Services => vec![
                category_facet(),
                FacetDefinition::new("location", FacetKind::SingleSelect).with_label("Location"),
                rating_facet(),
                FacetDefinition::new("price", FacetKind::NumericRange)
                    .with_label("Hourly rate")
                    .with_option(NumericRange::new(None, Some(25.0)), "Under $25")
                    .with_option(NumericRange::new(Some(25.0), Some(50.0)), "$25 - $50")
                    .with_option(NumericRange::new(Some(50.0), Some(100.0)), "$50 - $100")
                    .with_option(NumericRange::new(Some(100.0), None), "$100+"),
                FacetDefinition::new("verified", FacetKind::Boolean)
                    .with_label("Verified providers")
                    .with_option(true, "Verified only"),
                FacetDefinition::new("createdAt", FacetKind::Date).with_label("Listed"),
            ],
            Self::Projects => vec![
                category_facet(),
                FacetDefinition::new("budget", FacetKind::NumericRange)
                    .with_field("price")
                    .with_label("Budget")
                    .with_option(NumericRange::new(None, Some(500.0)), "Under $500")
                    .with_option(NumericRange::new(Some(500.0), Some(2000.0)), "$500 - $2,000")
                    .with_option(NumericRange::new(Some(2000.0), None), "$2,000+"),
                FacetDefinition::new("skills", FacetKind::MultiSelect).with_label("Skills"),
                FacetDefinition::new("remote", FacetKind::Boolean)
                    .with_label("Remote")
                    .with_option(true, "Remote"),
                FacetDefinition::new("posted", FacetKind::Date)
                    .with_field("createdAt")
                    .with_label("Posted"),
            ],
            Self::Freelancers => vec![
                category_facet(),
                FacetDefinition::new("skills", FacetKind::MultiSelect).with_label("Skills"),
                rating_facet(),
                FacetDefinition::new("rate", FacetKind::NumericRange)
                    .with_field("price")
                    .with_label("Hourly rate")
                    .with_option(NumericRange::new(None, Some(50.0)), "Under $50")
                    .with_option(NumericRange::new(Some(50.0), None), "$50+"),
                FacetDefinition::new("location", FacetKind::SingleSelect).with_label("Location"),
                FacetDefinition::new("available", FacetKind::Boolean)
                    .with_label("Availability")
                    .with_option(true, "Available now"),
            ],
        }
    }
}

impl FromStr for SearchContext {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "services" | "service" => Ok(Self::Services),
            "projects" | "project" => Ok(Self::Projects),
            "freelancers" | "freelancer" => Ok(Self::Freelancers),
            other => Err(Error::NotFound(format!("search context '{other}'"))),
        }
    }
}

fn category_facet() -> FacetDefinition {
    let facet = FacetDefinition::new("category", FacetKind::SingleSelect).with_label("Category");
    SERVICE_CATEGORIES.iter().fold(facet, |f, c| f.with_option(*c, *c))
}

fn rating_facet() -> FacetDefinition {
    let facet = FacetDefinition::new("rating", FacetKind::StarRating).with_label("Rating");
    (1..=4u32).rev().fold(facet, |f, n| f.with_option(n, format!("{n}+ stars")))
}
