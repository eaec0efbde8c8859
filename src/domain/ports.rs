use crate::config::OutputFormat;
use crate::domain::model::RawPage;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Fetches page content for a URL.
///
/// `fetch_static` performs a plain network fetch; `fetch_rendered` executes
/// the page's scripts and returns the resulting DOM. The choice between the
/// two is made by the pipeline, not the fetcher.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_static(&self, url: &str) -> Result<RawPage>;
    async fn fetch_rendered(&self, url: &str) -> Result<RawPage>;
}

pub trait ExtractConfig: Send + Sync {
    fn url(&self) -> &str;
    fn output_format(&self) -> OutputFormat;
    fn timeout_secs(&self) -> u64;
    /// Per-site name-order policy: swap the split name halves when the source
    /// page presents "Lastname Firstname".
    fn swap_names(&self) -> bool;
    /// Known team names used to disambiguate team tokens folded into a
    /// combined name blob.
    fn known_teams(&self) -> &[String];
}
