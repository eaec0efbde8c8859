use serde::{Deserialize, Serialize};

/// How the page content was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Plain HTTP fetch, markup as served.
    Static,
    /// DOM snapshot taken after the page's scripts ran.
    Rendered,
}

/// Fetched page content, one per extraction request.
#[derive(Debug, Clone)]
pub struct RawPage {
    pub kind: PageKind,
    pub content: String,
    pub url: String,
}

impl RawPage {
    pub fn new(kind: PageKind, content: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Table,
    TextBlock,
}

/// A candidate chunk of a page believed to hold result rows.
///
/// `score` is the priority ordinal used to pick among multiple candidates;
/// higher scores are tried first.
#[derive(Debug, Clone)]
pub struct ResultRegion {
    pub kind: RegionKind,
    pub content: String,
    pub score: u32,
}

/// Untyped field tuple as pulled directly from a region.
///
/// This is the boundary contract between extraction strategies and the
/// normalizer: `name` may still be a combined "name + team" blob, and
/// `team`/`gap` are absent when the source row did not carry them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub rank: String,
    pub name: String,
    pub team: Option<String>,
    pub time: String,
    pub gap: Option<String>,
}

/// Canonical, validated result entry ready for rendering.
///
/// `rank` is 1-based and strictly increasing within a result set (gaps are
/// allowed since DNS/DNF entries may be absent from the page). `gap` is
/// either empty or formatted as `+ MM:SS` / `+ H:MM:SS`; rank 1 never
/// carries one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub rank: u32,
    pub first_name: String,
    pub last_name: String,
    pub team: String,
    pub time: String,
    pub gap: String,
}

/// Optional event header block recovered from the page.
///
/// All fields are independently optional; the renderer omits the lines it
/// cannot fill rather than emitting placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventMetadata {
    pub title: Option<String>,
    pub class_code: Option<String>,
    pub distance: Option<String>,
    pub accepted: Option<u32>,
    pub rejected: Option<u32>,
    pub dnf: Option<u32>,
    pub total: Option<u32>,
}

impl EventMetadata {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.class_code.is_none()
            && self.distance.is_none()
            && self.accepted.is_none()
            && self.rejected.is_none()
            && self.dnf.is_none()
            && self.total.is_none()
    }
}
