use crate::domain::ports::ExtractConfig;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Rendered text block in the downstream parser layout.
    Display,
    /// Unprocessed raw field tuples, one line each.
    Raw,
    /// Canonical records with field labels, as JSON.
    Parsed,
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "web-results")]
#[command(about = "Extract race results from web pages")]
pub struct CliConfig {
    /// URL of the race results page
    pub url: String,

    #[arg(long, value_enum, default_value = "display")]
    pub format: OutputFormat,

    #[arg(long, default_value = "30", help = "Request timeout in seconds")]
    pub timeout: u64,

    #[arg(
        long,
        help = "Swap name halves for sites that list 'Lastname Firstname'"
    )]
    pub swap_names: bool,

    #[arg(
        long,
        value_delimiter = ',',
        help = "Known team names, used to split teams out of combined name fields"
    )]
    pub teams: Vec<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ExtractConfig for CliConfig {
    fn url(&self) -> &str {
        &self.url
    }

    fn output_format(&self) -> OutputFormat {
        self.format
    }

    fn timeout_secs(&self) -> u64 {
        self.timeout
    }

    fn swap_names(&self) -> bool {
        self.swap_names
    }

    fn known_teams(&self) -> &[String] {
        &self.teams
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("url", &self.url)?;
        validate_positive_number("timeout", self.timeout, 1)?;
        Ok(())
    }
}
