use std::collections::HashMap;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::domain::model::{RawPage, RegionKind, ResultRegion};

/// Clock-time token shape shared by the locator, extractor and normalizer:
/// `MM:SS` or `H:MM:SS`.
pub const CLOCK_SHAPE: &str = r"\d{1,2}:\d{2}(?::\d{2})?";

/// Minimum column count for a table to be a plausible result table.
const MIN_TABLE_COLUMNS: usize = 3;

/// Minimum number of shape-matching siblings for a repeated-sibling group.
const MIN_SIBLING_ROWS: usize = 2;

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Flattened text of an element, child chunks joined by single spaces.
pub(crate) fn element_text(el: &ElementRef) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Visible text chunks of a document, one per text node, scripts and styles
/// excluded. Multi-space runs inside a chunk are preserved so column-shaped
/// text survives flattening.
pub(crate) fn visible_text_lines(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut lines = Vec::new();
    for node in document.tree.nodes() {
        if let Some(text) = node.value().as_text() {
            let parent_name = node
                .parent()
                .and_then(|p| p.value().as_element().map(|e| e.name().to_string()));
            if matches!(parent_name.as_deref(), Some("script" | "style" | "title")) {
                continue;
            }
            for line in text.split('\n') {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    lines.push(trimmed.to_string());
                }
            }
        }
    }
    lines
}

/// One locating strategy: inspect a page and return zero or more candidate
/// regions, highest priority first. Returning nothing is not an error.
pub trait LocateStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn attempt(&self, page: &RawPage) -> Vec<ResultRegion>;
}

/// Priority-ordered list of locating strategies. The first strategy that
/// yields any candidate wins; later strategies are only consulted when the
/// earlier ones come up empty.
pub struct ContentLocator {
    strategies: Vec<Box<dyn LocateStrategy>>,
}

impl Default for ContentLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentLocator {
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(TableScan::new()),
                Box::new(SiblingScan::new()),
                Box::new(TextScan::new()),
            ],
        }
    }

    pub fn locate(&self, page: &RawPage) -> Vec<ResultRegion> {
        for strategy in &self.strategies {
            let regions = strategy.attempt(page);
            tracing::debug!(
                "{} scan found {} candidate region(s)",
                strategy.name(),
                regions.len()
            );
            if !regions.is_empty() {
                return regions;
            }
        }
        Vec::new()
    }
}

/// Enumerates `<table>` elements and scores them by column-count plausibility
/// and presence of clock-time-shaped cells.
struct TableScan {
    time_re: Regex,
    table_sel: Selector,
    row_sel: Selector,
    cell_sel: Selector,
}

impl TableScan {
    fn new() -> Self {
        Self {
            time_re: Regex::new(CLOCK_SHAPE).expect("static regex"),
            table_sel: selector("table"),
            row_sel: selector("tr"),
            cell_sel: selector("td, th"),
        }
    }

    fn score_table(&self, table: &ElementRef) -> u32 {
        let mut max_columns = 0;
        let mut time_cells = 0usize;
        for row in table.select(&self.row_sel) {
            let cells: Vec<String> = row.select(&self.cell_sel).map(|c| element_text(&c)).collect();
            max_columns = max_columns.max(cells.len());
            time_cells += cells.iter().filter(|c| self.time_re.is_match(c)).count();
        }
        if max_columns < MIN_TABLE_COLUMNS || time_cells == 0 {
            return 0;
        }
        max_columns as u32 * 10 + time_cells.min(100) as u32
    }
}

impl LocateStrategy for TableScan {
    fn name(&self) -> &'static str {
        "table"
    }

    fn attempt(&self, page: &RawPage) -> Vec<ResultRegion> {
        let document = Html::parse_document(&page.content);
        let mut regions: Vec<ResultRegion> = document
            .select(&self.table_sel)
            .filter_map(|table| {
                let score = self.score_table(&table);
                (score > 0).then(|| ResultRegion {
                    kind: RegionKind::Table,
                    content: table.html(),
                    score,
                })
            })
            .collect();
        regions.sort_by(|a, b| b.score.cmp(&a.score));
        regions
    }
}

/// Groups sibling elements sharing a tag + class signature under a common
/// parent; a group is a candidate when enough siblings flatten into a
/// row-shaped line (leading integer plus a time token). Covers div-based
/// result grids on pages without true tables.
struct SiblingScan {
    time_re: Regex,
}

impl SiblingScan {
    fn new() -> Self {
        Self {
            time_re: Regex::new(CLOCK_SHAPE).expect("static regex"),
        }
    }

    fn row_line(el: &ElementRef) -> String {
        el.text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("    ")
    }

    fn is_row_shaped(&self, line: &str) -> bool {
        let mut tokens = line.split_whitespace();
        let leads_with_rank = tokens
            .next()
            .map(|t| {
                let t = t.trim_end_matches('.');
                !t.is_empty() && t.chars().all(|c| c.is_ascii_digit())
            })
            .unwrap_or(false);
        leads_with_rank && self.time_re.is_match(line)
    }
}

impl LocateStrategy for SiblingScan {
    fn name(&self) -> &'static str {
        "sibling"
    }

    fn attempt(&self, page: &RawPage) -> Vec<ResultRegion> {
        let document = Html::parse_document(&page.content);
        let mut regions = Vec::new();

        for node in document.tree.nodes() {
            let Some(parent) = ElementRef::wrap(node) else {
                continue;
            };
            // Table internals belong to the table scan.
            if matches!(parent.value().name(), "table" | "thead" | "tbody") {
                continue;
            }

            let mut groups: HashMap<(String, String), Vec<String>> = HashMap::new();
            for child in parent.children().filter_map(ElementRef::wrap) {
                let signature = (
                    child.value().name().to_string(),
                    child.value().attr("class").unwrap_or("").to_string(),
                );
                groups.entry(signature).or_default().push(Self::row_line(&child));
            }

            for rows in groups.into_values() {
                let matching: Vec<String> = rows
                    .into_iter()
                    .filter(|r| self.is_row_shaped(r))
                    .collect();
                if matching.len() >= MIN_SIBLING_ROWS {
                    regions.push(ResultRegion {
                        kind: RegionKind::TextBlock,
                        score: matching.len() as u32,
                        content: matching.join("\n"),
                    });
                }
            }
        }

        regions.sort_by(|a, b| b.score.cmp(&a.score));
        regions
    }
}

/// Last resort: scan the page's flattened text for result-shaped lines.
struct TextScan {
    line_re: Regex,
}

impl TextScan {
    fn new() -> Self {
        let pattern = format!(r"^\d+\.?\s+[^\s\d].*?{}", CLOCK_SHAPE);
        Self {
            line_re: Regex::new(&pattern).expect("static regex"),
        }
    }
}

impl LocateStrategy for TextScan {
    fn name(&self) -> &'static str {
        "text"
    }

    fn attempt(&self, page: &RawPage) -> Vec<ResultRegion> {
        let matching: Vec<String> = visible_text_lines(&page.content)
            .into_iter()
            .filter(|line| self.line_re.is_match(line))
            .collect();
        if matching.is_empty() {
            return Vec::new();
        }
        vec![ResultRegion {
            kind: RegionKind::TextBlock,
            score: matching.len() as u32,
            content: matching.join("\n"),
        }]
    }
}
