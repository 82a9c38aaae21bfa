//! The upstream interface for recommendation fetching.
//!
//! Concrete adapters (HTTP clients for content catalogs) live with the
//! host application; the core only sees this trait and caches whatever
//! it returns.

use thiserror::Error;

/// One suggestion as delivered by an upstream catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationItem {
    /// The upstream's own identifier; part of the cache uniqueness key.
    pub external_id: String,
    pub title: String,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub image_url: Option<String>,
    pub release_date: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("upstream rejected the request: {0}")]
    Upstream(String),

    #[error("no API key configured")]
    MissingApiKey,
}

/// An external content catalog the cache layer treats as opaque.
pub trait RecommendationSource {
    fn fetch(
        &self,
        category: &str,
        period: &str,
        genre: Option<&str>,
        page: u32,
    ) -> Result<Vec<RecommendationItem>, SourceError>;
}
