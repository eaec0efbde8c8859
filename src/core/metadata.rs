use regex::Regex;
use scraper::{Html, Selector};

use crate::core::locate::{element_text, visible_text_lines};
use crate::domain::model::{EventMetadata, RawPage};

#[derive(Debug, Clone, Copy)]
enum Counter {
    Accepted,
    Rejected,
    Dnf,
    Total,
}

/// Label → counter-field lookup. Additional locales or site-specific labels
/// are added here rather than scattered through the scan.
const COUNTER_LABELS: &[(&str, Counter)] = &[
    ("hyväksytty", Counter::Accepted),
    ("accepted", Counter::Accepted),
    ("hylätty", Counter::Rejected),
    ("rejected", Counter::Rejected),
    ("disqualified", Counter::Rejected),
    ("keskeytti", Counter::Dnf),
    ("dnf", Counter::Dnf),
    ("osallistujat", Counter::Total),
    ("participants", Counter::Total),
];

/// Recovers the optional event header block from a fetched page. Absence of
/// any recognizable header data yields `None`, never an error.
pub fn recover_metadata(page: &RawPage) -> Option<EventMetadata> {
    let distance_re = Regex::new(r"^\d+(?:[.,]\d+)?\s*km$").expect("static regex");
    let class_re = Regex::new(r"^[A-ZÅÄÖ]{1,3}\d{0,2}$").expect("static regex");

    let mut meta = EventMetadata {
        title: page_title(&page.content),
        ..EventMetadata::default()
    };

    for line in visible_text_lines(&page.content) {
        if let Some((label, rest)) = line.split_once(char::is_whitespace) {
            if let Some(counter) = lookup_counter(label) {
                if let Ok(count) = rest.trim().parse::<u32>() {
                    assign(&mut meta, counter, count);
                    continue;
                }
            }
        }
        if meta.distance.is_none() && distance_re.is_match(line.trim()) {
            meta.distance = Some(line.trim().to_string());
        } else if meta.class_code.is_none() && class_re.is_match(line.trim()) {
            meta.class_code = Some(line.trim().to_string());
        }
    }

    if meta.is_empty() {
        None
    } else {
        Some(meta)
    }
}

fn lookup_counter(label: &str) -> Option<Counter> {
    let label = label.trim().to_lowercase();
    COUNTER_LABELS
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, counter)| *counter)
}

fn assign(meta: &mut EventMetadata, counter: Counter, count: u32) {
    let slot = match counter {
        Counter::Accepted => &mut meta.accepted,
        Counter::Rejected => &mut meta.rejected,
        Counter::Dnf => &mut meta.dnf,
        Counter::Total => &mut meta.total,
    };
    if slot.is_none() {
        *slot = Some(count);
    }
}

/// Event title: the first page heading, falling back to the document title.
fn page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let h1_sel = Selector::parse("h1").expect("static selector");
    let title_sel = Selector::parse("title").expect("static selector");

    document
        .select(&h1_sel)
        .next()
        .map(|el| element_text(&el))
        .filter(|t| !t.is_empty())
        .or_else(|| {
            document
                .select(&title_sel)
                .next()
                .map(|el| element_text(&el))
                .filter(|t| !t.is_empty())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PageKind;

    fn page(html: &str) -> RawPage {
        RawPage::new(PageKind::Static, html, "http://test.local/results")
    }

    #[test]
    fn recovers_finnish_header_block() {
        let html = r#"
            <html><head><title>Tulospalvelu</title></head><body>
            <h1>Hyvinkään Iltarastit 2025, Paukunharju/2024</h1>
            <p>A</p>
            <p>6.53 km</p>
            <p>Hyväksytty 9</p>
            <p>Hylätty 0</p>
            <p>Keskeytti 1</p>
            <p>Osallistujat 10</p>
            </body></html>"#;
        let meta = recover_metadata(&page(html)).unwrap();
        assert_eq!(
            meta.title.as_deref(),
            Some("Hyvinkään Iltarastit 2025, Paukunharju/2024")
        );
        assert_eq!(meta.class_code.as_deref(), Some("A"));
        assert_eq!(meta.distance.as_deref(), Some("6.53 km"));
        assert_eq!(meta.accepted, Some(9));
        assert_eq!(meta.rejected, Some(0));
        assert_eq!(meta.dnf, Some(1));
        assert_eq!(meta.total, Some(10));
    }

    #[test]
    fn recognizes_english_labels() {
        let html = r#"<body>
            <p>Accepted 12</p>
            <p>Participants 15</p>
        </body>"#;
        let meta = recover_metadata(&page(html)).unwrap();
        assert_eq!(meta.accepted, Some(12));
        assert_eq!(meta.total, Some(15));
        assert_eq!(meta.rejected, None);
    }

    #[test]
    fn falls_back_to_document_title() {
        let html = "<html><head><title>Iltarastit</title></head><body><p>Hyväksytty 3</p></body></html>";
        let meta = recover_metadata(&page(html)).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Iltarastit"));
    }

    #[test]
    fn page_without_header_yields_none() {
        let html = "<html><body><div>1 Name 56:27</div></body></html>";
        assert!(recover_metadata(&page(html)).is_none());
    }

    #[test]
    fn first_counter_occurrence_wins() {
        let html = "<body><p>Hyväksytty 9</p><p>Hyväksytty 4</p></body>";
        let meta = recover_metadata(&page(html)).unwrap();
        assert_eq!(meta.accepted, Some(9));
    }
}
