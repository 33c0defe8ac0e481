//! Domain types for listing data and tracked artifacts.
//!
//! The cleaning rules only look at a handful of known columns. [`ListingColumn`]
//! is the schema descriptor for those columns; everything else in the dataset is
//! carried through untouched.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Columns the cleaning rules know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingColumn {
    ReviewsPerMonth,
    Price,
    Longitude,
    Latitude,
    LastReview,
}

impl ListingColumn {
    pub const ALL: [ListingColumn; 5] = [
        ListingColumn::ReviewsPerMonth,
        ListingColumn::Price,
        ListingColumn::Longitude,
        ListingColumn::Latitude,
        ListingColumn::LastReview,
    ];

    /// Header name of the column in the CSV file.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingColumn::ReviewsPerMonth => "reviews_per_month",
            ListingColumn::Price => "price",
            ListingColumn::Longitude => "longitude",
            ListingColumn::Latitude => "latitude",
            ListingColumn::LastReview => "last_review",
        }
    }
}

impl fmt::Display for ListingColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rectangular geographic bounding box, inclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_longitude: f64,
    pub max_longitude: f64,
    pub min_latitude: f64,
    pub max_latitude: f64,
}

impl GeoBounds {
    /// Bounding box around New York City.
    pub const NEW_YORK_CITY: GeoBounds = GeoBounds {
        min_longitude: -74.25,
        max_longitude: -73.50,
        min_latitude: 40.5,
        max_latitude: 41.2,
    };

    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        (self.min_longitude..=self.max_longitude).contains(&longitude)
            && (self.min_latitude..=self.max_latitude).contains(&latitude)
    }
}

/// Closed price interval `min <= price <= max`.
///
/// An inverted range (`min > max`) is valid and simply retains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

impl PriceRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min as f64 && price <= self.max as f64
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

/// Version selector of an artifact reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactAlias {
    Latest,
    Version(u32),
}

impl fmt::Display for ArtifactAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactAlias::Latest => f.write_str("latest"),
            ArtifactAlias::Version(v) => write!(f, "v{}", v),
        }
    }
}

impl FromStr for ArtifactAlias {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "latest" {
            return Ok(ArtifactAlias::Latest);
        }
        s.strip_prefix('v')
            .and_then(|n| n.parse::<u32>().ok())
            .map(ArtifactAlias::Version)
            .ok_or_else(|| format!("Unknown artifact alias: {}. Use 'latest' or 'vN'", s))
    }
}

/// Reference to a versioned artifact, written `name`, `name:latest` or `name:vN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    pub name: String,
    pub alias: ArtifactAlias,
}

impl ArtifactRef {
    pub fn latest(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: ArtifactAlias::Latest,
        }
    }
}

/// Artifact names become directory names in the local store.
pub(crate) fn validate_artifact_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Artifact name must not be empty".to_string());
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(format!("Invalid artifact name: {}", name));
    }
    Ok(())
}

impl FromStr for ArtifactRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, alias) = match s.rsplit_once(':') {
            Some((name, alias)) => (name, alias.parse::<ArtifactAlias>()?),
            None => (s, ArtifactAlias::Latest),
        };
        validate_artifact_name(name)?;
        Ok(Self {
            name: name.to_string(),
            alias,
        })
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.alias)
    }
}

/// Metadata attached to an artifact before it is published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub artifact_type: String,
    pub description: String,
}

impl ArtifactDescriptor {
    pub fn new(
        name: impl Into<String>,
        artifact_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            artifact_type: artifact_type.into(),
            description: description.into(),
        }
    }
}

/// A concrete artifact version as stored by the tracking service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactVersion {
    pub name: String,
    pub version: u32,
    pub digest: String,
    pub size_bytes: u64,
}

impl fmt::Display for ArtifactVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:v{}", self.name, self.version)
    }
}
