use clap::Parser;
use web_results::utils::{logger, validation::Validate};
use web_results::{CliConfig, ExtractionPipeline, HttpFetcher};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting web-results extractor");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }

    let fetcher = match HttpFetcher::new(config.timeout) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    let pipeline = ExtractionPipeline::new(fetcher, config);

    match pipeline.run().await {
        Ok(output) => {
            tracing::info!("Extraction completed");
            println!("{}", output);
        }
        Err(e) => {
            tracing::error!("Extraction failed in the {} stage: {}", e.stage(), e);
            eprintln!("Error ({} stage): {}", e.stage(), e);
            std::process::exit(e.exit_code());
        }
    }
}
