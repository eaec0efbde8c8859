use regex::Regex;

use crate::core::locate::CLOCK_SHAPE;
use crate::domain::model::{RawRecord, ResultRecord};
use crate::utils::error::{ExtractError, Result};

/// Finnish "no time" placeholder that some sources leave in the team slot.
const NO_TIME_PLACEHOLDER: &str = "ei aikaa";

/// Per-site normalization policy.
#[derive(Debug, Clone, Default)]
pub struct NormalizePolicy {
    /// Swap the split name halves for sites listing "Lastname Firstname".
    pub swap_names: bool,
    /// Team names that may be reclaimed from a combined name blob.
    pub known_teams: Vec<String>,
}

/// Splits and validates raw field tuples into canonical records.
pub struct FieldNormalizer {
    policy: NormalizePolicy,
    clock_re: Regex,
    gap_re: Regex,
}

impl FieldNormalizer {
    pub fn new(policy: NormalizePolicy) -> Self {
        Self {
            policy,
            clock_re: Regex::new(&format!("^{}$", CLOCK_SHAPE)).expect("static regex"),
            gap_re: Regex::new(&format!(r"^\+\s*({})$", CLOCK_SHAPE)).expect("static regex"),
        }
    }

    pub fn normalize(&self, raw: &RawRecord) -> Result<ResultRecord> {
        let rank_token = raw.rank.trim().trim_end_matches('.');
        let rank: u32 = rank_token.parse().map_err(|_| ExtractError::NormalizationError {
            message: format!("rank is not a positive integer: '{}'", raw.rank),
        })?;
        if rank == 0 {
            return Err(ExtractError::NormalizationError {
                message: "rank must be 1-based".to_string(),
            });
        }

        let time = raw.time.trim().to_string();
        if !self.clock_re.is_match(&time) {
            return Err(ExtractError::NormalizationError {
                message: format!("time does not match the clock shape: '{}'", raw.time),
            });
        }

        let mut team = raw
            .team
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        if team.eq_ignore_ascii_case(NO_TIME_PLACEHOLDER) {
            team.clear();
        }

        let mut name = raw.name.split_whitespace().collect::<Vec<_>>().join(" ");
        if team.is_empty() {
            if let Some((remainder, reclaimed)) = self.split_known_team(&name) {
                name = remainder;
                team = reclaimed;
            }
        }

        let (first_name, last_name) = self.split_name(&name)?;

        // The leader carries no gap by definition.
        let gap = if rank == 1 {
            String::new()
        } else {
            self.normalize_gap(raw.gap.as_deref())?
        };

        Ok(ResultRecord {
            rank,
            first_name,
            last_name,
            team,
            time,
            gap,
        })
    }

    /// Splits a name blob on the first whitespace run: first token is the
    /// first name, the remainder the last name. The swap policy flips the
    /// two for sites with inverted order.
    fn split_name(&self, name: &str) -> Result<(String, String)> {
        let (first, last) = match name.split_once(' ') {
            Some((first, last)) => (first.to_string(), last.to_string()),
            None if !name.is_empty() => (name.to_string(), String::new()),
            None => {
                return Err(ExtractError::NormalizationError {
                    message: "record has no name field".to_string(),
                })
            }
        };
        if self.policy.swap_names {
            Ok((last, first))
        } else {
            Ok((first, last))
        }
    }

    /// Reclaims a known team name folded into the end of a name blob, as
    /// long as at least two name tokens remain.
    fn split_known_team(&self, name: &str) -> Option<(String, String)> {
        let tokens: Vec<&str> = name.split_whitespace().collect();
        for team in &self.policy.known_teams {
            let team_tokens: Vec<&str> = team.split_whitespace().collect();
            if team_tokens.is_empty() || tokens.len() < team_tokens.len() + 2 {
                continue;
            }
            let split_at = tokens.len() - team_tokens.len();
            let matches = tokens[split_at..]
                .iter()
                .zip(&team_tokens)
                .all(|(a, b)| a.eq_ignore_ascii_case(b));
            if matches {
                return Some((tokens[..split_at].join(" "), team.clone()));
            }
        }
        None
    }

    /// A missing gap is fine; a present one must match the gap shape.
    fn normalize_gap(&self, gap: Option<&str>) -> Result<String> {
        let Some(gap) = gap else {
            return Ok(String::new());
        };
        let trimmed = gap.trim();
        if trimmed.is_empty() {
            return Ok(String::new());
        }
        match self.gap_re.captures(trimmed) {
            Some(caps) => Ok(format!("+ {}", &caps[1])),
            None => Err(ExtractError::NormalizationError {
                message: format!("gap does not match the clock shape: '{}'", gap),
            }),
        }
    }
}
