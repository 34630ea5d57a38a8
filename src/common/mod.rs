//! Identifier types shared by the search and fetch stages

pub mod ids;

pub use ids::PubMedId;
