use crate::domain::model::{EventMetadata, ResultRecord};

/// Serializes the optional event header and the normalized records into the
/// text layout the downstream parser consumes. Whitespace-run splitting is
/// the contract: fields are joined with four-space separators and empty
/// fields are dropped rather than padded.
pub fn render(metadata: Option<&EventMetadata>, records: &[ResultRecord]) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(meta) = metadata {
        if let Some(title) = &meta.title {
            lines.push(title.clone());
        }
        if let Some(class_code) = &meta.class_code {
            lines.push(class_code.clone());
        }
        if let Some(distance) = &meta.distance {
            lines.push(distance.clone());
        }
        for (label, value) in [
            ("Hyväksytty", meta.accepted),
            ("Hylätty", meta.rejected),
            ("Keskeytti", meta.dnf),
            ("Osallistujat", meta.total),
        ] {
            if let Some(count) = value {
                lines.push(format!("{} {}", label, count));
            }
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
    }

    for record in records {
        lines.push(render_record(record));
    }

    lines.join("\n")
}

fn render_record(record: &ResultRecord) -> String {
    let name = format!("{} {}", record.first_name, record.last_name);
    let mut parts = vec![record.rank.to_string(), name.trim().to_string()];
    if !record.team.is_empty() {
        parts.push(record.team.clone());
    }
    parts.push(record.time.clone());
    if !record.gap.is_empty() {
        parts.push(record.gap.clone());
    }
    format!("    {}", parts.join("    "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(rank: u32, first: &str, last: &str, team: &str, time: &str, gap: &str) -> ResultRecord {
        ResultRecord {
            rank,
            first_name: first.to_string(),
            last_name: last.to_string(),
            team: team.to_string(),
            time: time.to_string(),
            gap: gap.to_string(),
        }
    }

    #[test]
    fn renders_records_with_and_without_team_and_gap() {
        let records = vec![
            record(1, "Orrainen", "Severi", "HyRa", "56:27", ""),
            record(7, "Aaltonen", "Tero", "", "1:25:55", "+ 29:28"),
        ];
        let output = render(None, &records);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "    1    Orrainen Severi    HyRa    56:27");
        assert_eq!(lines[1], "    7    Aaltonen Tero    1:25:55    + 29:28");
    }

    #[test]
    fn header_lines_come_from_metadata() {
        let meta = EventMetadata {
            title: Some("Hyvinkään Iltarastit 2025, Paukunharju/2024".to_string()),
            class_code: Some("A".to_string()),
            distance: Some("6.53 km".to_string()),
            accepted: Some(9),
            rejected: Some(0),
            dnf: Some(0),
            total: Some(9),
        };
        let records = vec![record(1, "Orrainen", "Severi", "HyRa", "56:27", "")];
        let output = render(Some(&meta), &records);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Hyvinkään Iltarastit 2025, Paukunharju/2024");
        assert_eq!(lines[1], "A");
        assert_eq!(lines[2], "6.53 km");
        assert_eq!(lines[3], "Hyväksytty 9");
        assert_eq!(lines[4], "Hylätty 0");
        assert_eq!(lines[5], "Keskeytti 0");
        assert_eq!(lines[6], "Osallistujat 9");
        assert_eq!(lines[7], "");
        assert!(lines[8].starts_with("    1    "));
    }

    #[test]
    fn partial_metadata_omits_missing_lines() {
        let meta = EventMetadata {
            distance: Some("6.53 km".to_string()),
            accepted: Some(9),
            ..EventMetadata::default()
        };
        let output = render(Some(&meta), &[]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "6.53 km");
        assert_eq!(lines[1], "Hyväksytty 9");
    }

    #[test]
    fn output_round_trips_through_whitespace_splitting() {
        let records = vec![
            record(1, "Orrainen", "Severi", "HyRa", "56:27", ""),
            record(2, "Pasi", "Romppainen", "Hyvinkään Rasti", "56:29", "+ 0:02"),
            record(7, "Aaltonen", "Tero", "", "1:25:55", "+ 29:28"),
        ];
        let output = render(None, &records);
        for (line, original) in output.lines().zip(&records) {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            assert_eq!(tokens[0], original.rank.to_string());
            assert_eq!(tokens[1], original.first_name);
            assert_eq!(tokens[2], original.last_name);
            assert!(line.contains(&original.time));
            if original.gap.is_empty() {
                assert!(!line.contains('+'));
            } else {
                assert!(line.ends_with(&original.gap));
            }
            if !original.team.is_empty() {
                assert!(line.contains(&original.team));
            }
        }
    }

    #[test]
    fn ranks_render_in_input_order() {
        let records = vec![
            record(1, "A", "B", "", "10:00", ""),
            record(3, "C", "D", "", "11:00", "+ 1:00"),
            record(4, "E", "F", "", "12:00", "+ 2:00"),
        ];
        let output = render(None, &records);
        let ranks: Vec<u32> = output
            .lines()
            .filter_map(|l| l.split_whitespace().next())
            .filter_map(|t| t.parse().ok())
            .collect();
        assert_eq!(ranks, vec![1, 3, 4]);
        assert!(ranks.windows(2).all(|w| w[0] < w[1]));
    }
}
