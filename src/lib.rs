//! # web-results
//!
//! Extracts structured race-result records from heterogeneous, often
//! JavaScript-rendered HTML result pages and renders them into the fixed
//! plain-text layout the downstream orienteering-results parser consumes.
//!
//! The pipeline runs in five stateless stages: fetch (static markup with a
//! rendered-DOM fallback), locate the result-bearing region, extract raw
//! field tuples, normalize them into canonical records, and render the
//! output block.
//!
//! ## Example
//!
//! ```rust,ignore
//! use web_results::{CliConfig, ExtractionPipeline, HttpFetcher};
//!
//! async fn extract(config: CliConfig) -> web_results::Result<String> {
//!     let fetcher = HttpFetcher::new(config.timeout)?;
//!     ExtractionPipeline::new(fetcher, config).run().await
//! }
//! ```

pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{CliConfig, OutputFormat};
pub use core::fetch::HttpFetcher;
pub use core::pipeline::ExtractionPipeline;
pub use domain::model::{EventMetadata, RawPage, RawRecord, ResultRecord, ResultRegion};
pub use domain::ports::{ExtractConfig, PageFetcher};
pub use utils::error::{ExtractError, Result};
