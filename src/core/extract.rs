use regex::Regex;
use scraper::{Html, Selector};

use crate::core::locate::{element_text, CLOCK_SHAPE};
use crate::domain::model::{RawRecord, RegionKind, ResultRegion};
use crate::utils::error::{ExtractError, Result};

/// Extraction outcome: the decomposed rows plus a diagnostic count of rows
/// that failed row-level decomposition (header rows included).
#[derive(Debug)]
pub struct Extraction {
    pub records: Vec<RawRecord>,
    pub skipped: usize,
}

/// Converts a located region into an ordered sequence of raw field tuples.
pub struct RecordExtractor {
    time_re: Regex,
    column_re: Regex,
    line_re: Regex,
    row_sel: Selector,
    cell_sel: Selector,
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordExtractor {
    pub fn new() -> Self {
        let line_pattern = format!(
            r"^(?P<rank>\d+)\.?\s+(?P<name>\D+?)\s+(?P<time>{clock})(?:\s+(?P<gap>\+\s*{clock}))?$",
            clock = CLOCK_SHAPE
        );
        Self {
            time_re: Regex::new(&format!(r"\b{}\b", CLOCK_SHAPE)).expect("static regex"),
            column_re: Regex::new(r"\s{2,}").expect("static regex"),
            line_re: Regex::new(&line_pattern).expect("static regex"),
            row_sel: Selector::parse("tr").expect("static selector"),
            cell_sel: Selector::parse("td, th").expect("static selector"),
        }
    }

    pub fn extract(&self, region: &ResultRegion) -> Result<Extraction> {
        let (records, skipped) = match region.kind {
            RegionKind::Table => self.extract_table(&region.content),
            RegionKind::TextBlock => self.extract_text(&region.content),
        };
        if records.is_empty() {
            return Err(ExtractError::ExtractionError { skipped });
        }
        if skipped > 0 {
            tracing::debug!("Skipped {} undecomposable row(s)", skipped);
        }
        Ok(Extraction { records, skipped })
    }

    fn extract_table(&self, content: &str) -> (Vec<RawRecord>, usize) {
        let fragment = Html::parse_fragment(content);
        let mut records = Vec::new();
        let mut skipped = 0;
        for row in fragment.select(&self.row_sel) {
            let cells: Vec<String> = row
                .select(&self.cell_sel)
                .map(|c| element_text(&c))
                .collect();
            if cells.is_empty() {
                continue;
            }
            match self.decompose(&cells) {
                Some(record) => records.push(record),
                None => skipped += 1,
            }
        }
        (records, skipped)
    }

    fn extract_text(&self, content: &str) -> (Vec<RawRecord>, usize) {
        let mut records = Vec::new();
        let mut skipped = 0;
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            // Column-shaped lines reuse the table cell logic; single-spaced
            // lines fall back to the row pattern.
            let columns: Vec<String> = self
                .column_re
                .split(line)
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
            let record = if columns.len() >= 3 {
                self.decompose(&columns)
            } else {
                self.decompose_line(line)
            };
            match record {
                Some(record) => records.push(record),
                None => skipped += 1,
            }
        }
        (records, skipped)
    }

    /// Maps cells to fields by column role: the first numeric-only cell is
    /// the rank, the last clock-shaped cell (ignoring `+`-prefixed ones) is
    /// the time, a trailing `+`-prefixed cell is the gap, and the cells in
    /// between are name and team. A single in-between cell stays a combined
    /// "name + team" blob for the normalizer to split.
    fn decompose(&self, cells: &[String]) -> Option<RawRecord> {
        let rank_idx = cells.iter().position(|c| is_rank_token(c))?;

        let mut time_idx = None;
        for (i, cell) in cells.iter().enumerate().skip(rank_idx + 1) {
            if !cell.trim_start().starts_with('+') && self.time_re.is_match(cell) {
                time_idx = Some(i);
            }
        }
        let time_idx = time_idx?;
        let time = self.time_re.find(&cells[time_idx])?.as_str().to_string();

        let gap = cells[time_idx + 1..]
            .iter()
            .find(|c| c.trim_start().starts_with('+') && self.time_re.is_match(c))
            .map(|c| c.trim().to_string());

        // Clock-shaped cells between rank and time are split times, not
        // names or teams.
        let between: Vec<&String> = cells[rank_idx + 1..time_idx]
            .iter()
            .filter(|c| !self.time_re.is_match(c))
            .collect();
        let (name, team) = match between.as_slice() {
            [] => return None,
            [blob] => ((*blob).clone(), None),
            [names @ .., team] => (
                names.iter().map(|n| n.as_str()).collect::<Vec<_>>().join(" "),
                Some((*team).clone()),
            ),
        };

        Some(RawRecord {
            rank: cells[rank_idx].trim().trim_end_matches('.').to_string(),
            name,
            team,
            time,
            gap,
        })
    }

    fn decompose_line(&self, line: &str) -> Option<RawRecord> {
        let caps = self.line_re.captures(line)?;
        Some(RawRecord {
            rank: caps["rank"].to_string(),
            name: caps["name"].trim().to_string(),
            team: None,
            time: caps["time"].to_string(),
            gap: caps.name("gap").map(|g| g.as_str().to_string()),
        })
    }
}

fn is_rank_token(cell: &str) -> bool {
    let token = cell.trim().trim_end_matches('.');
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_region(content: &str) -> ResultRegion {
        ResultRegion {
            kind: RegionKind::Table,
            content: content.to_string(),
            score: 1,
        }
    }

    fn text_region(content: &str) -> ResultRegion {
        ResultRegion {
            kind: RegionKind::TextBlock,
            content: content.to_string(),
            score: 1,
        }
    }

    #[test]
    fn table_row_with_separate_team_column() {
        let html = r#"<table>
            <tr><th>Sija</th><th>Nimi</th><th>Seura</th><th>Aika</th></tr>
            <tr><td>1</td><td>Orrainen Severi</td><td>HyRa</td><td>56:27</td></tr>
        </table>"#;
        let extraction = RecordExtractor::new().extract(&table_region(html)).unwrap();
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.skipped, 1); // header row
        let record = &extraction.records[0];
        assert_eq!(record.rank, "1");
        assert_eq!(record.name, "Orrainen Severi");
        assert_eq!(record.team.as_deref(), Some("HyRa"));
        assert_eq!(record.time, "56:27");
        assert_eq!(record.gap, None);
    }

    #[test]
    fn table_row_with_combined_name_blob_and_gap() {
        let html = r#"<table>
            <tr><td>2.</td><td>Pasi Romppainen</td><td>56:29</td><td>+ 0:02</td></tr>
        </table>"#;
        let extraction = RecordExtractor::new().extract(&table_region(html)).unwrap();
        let record = &extraction.records[0];
        assert_eq!(record.rank, "2");
        assert_eq!(record.name, "Pasi Romppainen");
        assert_eq!(record.team, None);
        assert_eq!(record.time, "56:29");
        assert_eq!(record.gap.as_deref(), Some("+ 0:02"));
    }

    #[test]
    fn table_row_picks_last_time_column() {
        // Split columns before the total must not be mistaken for the time.
        let html = r#"<table>
            <tr><td>1</td><td>Viero Jukka</td><td>HyRa</td><td>35:02</td><td>1:15:08</td></tr>
        </table>"#;
        let extraction = RecordExtractor::new().extract(&table_region(html)).unwrap();
        let record = &extraction.records[0];
        assert_eq!(record.time, "1:15:08");
        assert_eq!(record.name, "Viero Jukka");
        assert_eq!(record.team.as_deref(), Some("HyRa"));
    }

    #[test]
    fn region_with_only_undecomposable_rows_fails() {
        let html = r#"<table>
            <tr><th>Sija</th><th>Nimi</th><th>Aika</th></tr>
            <tr><td>Ei</td><td>tuloksia</td><td>saatavilla</td></tr>
        </table>"#;
        let err = RecordExtractor::new()
            .extract(&table_region(html))
            .unwrap_err();
        match err {
            ExtractError::ExtractionError { skipped } => assert_eq!(skipped, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn text_line_with_columns_and_gap() {
        let extraction = RecordExtractor::new()
            .extract(&text_region(
                "7    Aaltonen Tero        1:25:55    + 29:28",
            ))
            .unwrap();
        let record = &extraction.records[0];
        assert_eq!(record.rank, "7");
        assert_eq!(record.name, "Aaltonen Tero");
        assert_eq!(record.team, None);
        assert_eq!(record.time, "1:25:55");
        assert_eq!(record.gap.as_deref(), Some("+ 29:28"));
    }

    #[test]
    fn text_line_with_team_column() {
        let extraction = RecordExtractor::new()
            .extract(&text_region("8    Poussu Jukka    KoKe    1:30:11"))
            .unwrap();
        let record = &extraction.records[0];
        assert_eq!(record.name, "Poussu Jukka");
        assert_eq!(record.team.as_deref(), Some("KoKe"));
        assert_eq!(record.time, "1:30:11");
    }

    #[test]
    fn single_spaced_line_uses_fallback_pattern() {
        let extraction = RecordExtractor::new()
            .extract(&text_region("3. Bob Wilson 49:22"))
            .unwrap();
        let record = &extraction.records[0];
        assert_eq!(record.rank, "3");
        assert_eq!(record.name, "Bob Wilson");
        assert_eq!(record.team, None);
        assert_eq!(record.time, "49:22");
    }

    #[test]
    fn skipped_rows_are_counted_but_tolerated() {
        let block = "Tulokset\n1    Orrainen Severi    HyRa    56:27\nEi aikaa";
        let extraction = RecordExtractor::new().extract(&text_region(block)).unwrap();
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.skipped, 2);
    }
}
