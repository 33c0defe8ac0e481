//! Core domain types shared by the pipeline, the transforms and the tracker.

pub mod domain;

pub use domain::{
    ArtifactAlias, ArtifactDescriptor, ArtifactRef, ArtifactVersion, GeoBounds, ListingColumn,
    PriceRange,
};
