pub mod extract;
pub mod fetch;
pub mod locate;
pub mod metadata;
pub mod normalize;
pub mod pipeline;
pub mod render;

pub use crate::domain::model::{
    EventMetadata, RawPage, RawRecord, ResultRecord, ResultRegion,
};
pub use crate::domain::ports::{ExtractConfig, PageFetcher};
pub use crate::utils::error::Result;
