use crate::config::OutputFormat;
use crate::core::extract::{Extraction, RecordExtractor};
use crate::core::fetch::is_bootstrap_shell;
use crate::core::locate::ContentLocator;
use crate::core::metadata::recover_metadata;
use crate::core::normalize::{FieldNormalizer, NormalizePolicy};
use crate::core::render;
use crate::domain::model::{RawRecord, ResultRecord, ResultRegion};
use crate::domain::ports::{ExtractConfig, PageFetcher};
use crate::utils::error::{ExtractError, Result};

/// Drives one extraction request through the stages: fetch, locate, extract,
/// normalize, render. Stateless between runs; a caller that wants retry
/// restarts the whole pipeline.
pub struct ExtractionPipeline<F: PageFetcher, C: ExtractConfig> {
    fetcher: F,
    config: C,
    locator: ContentLocator,
    extractor: RecordExtractor,
}

impl<F: PageFetcher, C: ExtractConfig> ExtractionPipeline<F, C> {
    pub fn new(fetcher: F, config: C) -> Self {
        Self {
            fetcher,
            config,
            locator: ContentLocator::new(),
            extractor: RecordExtractor::new(),
        }
    }

    pub async fn run(&self) -> Result<String> {
        let url = self.config.url();

        let mut page = self.fetcher.fetch_static(url).await?;
        let mut regions = self.locator.locate(&page);

        // The static→rendered fallback is the only automatic recovery path:
        // taken when no region was located or the markup looks like a JS
        // shell. Regions already located in the static markup are kept as
        // the fallback; a sparse but extractable page must not fail just
        // because the rendered attempt does.
        if regions.is_empty() || is_bootstrap_shell(&page.content) {
            tracing::info!("Static markup is sparse or empty, attempting rendered DOM");
            match self.fetcher.fetch_rendered(url).await {
                Ok(rendered) => {
                    let rendered_regions = self.locator.locate(&rendered);
                    if !rendered_regions.is_empty() {
                        page = rendered;
                        regions = rendered_regions;
                    }
                }
                Err(e) if regions.is_empty() => return Err(e),
                Err(e) => {
                    tracing::warn!("Rendered fetch failed, keeping static regions: {}", e);
                }
            }
        }
        if regions.is_empty() {
            return Err(ExtractError::NoRegionFound);
        }
        tracing::debug!(
            "{} candidate region(s) located, best score {}",
            regions.len(),
            regions[0].score
        );

        let extraction = self.extract_first(&regions)?;
        tracing::info!(
            "Extracted {} record(s), skipped {} row(s)",
            extraction.records.len(),
            extraction.skipped
        );

        match self.config.output_format() {
            OutputFormat::Raw => Ok(render_raw(&extraction.records)),
            OutputFormat::Parsed => {
                let records = self.normalize_all(&extraction.records)?;
                Ok(serde_json::to_string_pretty(&records)?)
            }
            OutputFormat::Display => {
                let records = self.normalize_all(&extraction.records)?;
                let metadata = recover_metadata(&page);
                Ok(render::render(metadata.as_ref(), &records))
            }
        }
    }

    /// Regions arrive priority-ordered; the first one that extracts wins.
    fn extract_first(&self, regions: &[ResultRegion]) -> Result<Extraction> {
        let mut last_err = None;
        for region in regions {
            match self.extractor.extract(region) {
                Ok(extraction) => return Ok(extraction),
                Err(e) => {
                    tracing::debug!("Region rejected: {}", e);
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or(ExtractError::NoRegionFound))
    }

    fn normalize_all(&self, raw_records: &[RawRecord]) -> Result<Vec<ResultRecord>> {
        let normalizer = FieldNormalizer::new(NormalizePolicy {
            swap_names: self.config.swap_names(),
            known_teams: self.config.known_teams().to_vec(),
        });
        let records = raw_records
            .iter()
            .map(|raw| normalizer.normalize(raw))
            .collect::<Result<Vec<_>>>()?;

        let mut last_rank = 0;
        for record in &records {
            if record.rank <= last_rank {
                return Err(ExtractError::NormalizationError {
                    message: format!(
                        "ranks must be strictly increasing: {} after {}",
                        record.rank, last_rank
                    ),
                });
            }
            last_rank = record.rank;
        }
        Ok(records)
    }
}

fn render_raw(records: &[RawRecord]) -> String {
    records
        .iter()
        .map(|r| {
            let mut parts = vec![r.rank.clone(), r.name.clone()];
            if let Some(team) = &r.team {
                parts.push(team.clone());
            }
            parts.push(r.time.clone());
            if let Some(gap) = &r.gap {
                parts.push(gap.clone());
            }
            parts.join("    ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
