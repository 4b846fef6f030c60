//! CSV encoder for report tables
//!
//! Writes a header row, then each section: an optional heading row (heading in
//! the first cell, remaining cells empty) followed by its data rows. Fields
//! that contain a comma, quote or line break are quoted, with embedded quotes
//! doubled. Lines end with `\n`.

use super::ReportTable;

/// Encode a table as UTF-8 CSV
pub fn encode(table: &ReportTable) -> Vec<u8> {
    let mut out = String::new();
    let width = table.headers.len();

    write_record(&mut out, table.headers.iter().map(String::as_str));

    for section in &table.sections {
        if let Some(heading) = &section.heading {
            let padding = std::iter::repeat_n("", width.saturating_sub(1));
            write_record(&mut out, std::iter::once(heading.as_str()).chain(padding));
        }
        for row in &section.rows {
            write_record(&mut out, row.iter().map(String::as_str));
        }
    }

    out.into_bytes()
}

fn write_record<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_field(out, field);
    }
    out.push('\n');
}

fn write_field(out: &mut String, field: &str) {
    let needs_quotes = field
        .chars()
        .any(|c| matches!(c, ',' | '"' | '\n' | '\r'));

    if needs_quotes {
        out.push('"');
        for c in field.chars() {
            if c == '"' {
                out.push('"');
            }
            out.push(c);
        }
        out.push('"');
    } else {
        out.push_str(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportSection;

    fn table(sections: Vec<ReportSection>) -> ReportTable {
        ReportTable {
            title: "ignored".into(),
            headers: vec!["Name".into(), "Notes".into(), "Hours".into()],
            sections,
        }
    }

    fn encoded(sections: Vec<ReportSection>) -> String {
        String::from_utf8(encode(&table(sections))).unwrap_or_default()
    }

    #[test]
    fn header_only_when_no_rows() {
        assert_eq!(encoded(vec![]), "Name,Notes,Hours\n");
    }

    #[test]
    fn plain_fields_are_not_quoted() {
        let out = encoded(vec![ReportSection {
            heading: None,
            rows: vec![vec!["Alice".into(), "gardening".into(), "1:30".into()]],
        }]);

        assert_eq!(out, "Name,Notes,Hours\nAlice,gardening,1:30\n");
    }

    #[test]
    fn special_characters_are_quoted_and_escaped() {
        let out = encoded(vec![ReportSection {
            heading: None,
            rows: vec![vec![
                "Smith, Jo".into(),
                "said \"hi\"".into(),
                "line\nbreak".into(),
            ]],
        }]);

        assert_eq!(
            out,
            "Name,Notes,Hours\n\"Smith, Jo\",\"said \"\"hi\"\"\",\"line\nbreak\"\n"
        );
    }

    #[test]
    fn section_headings_are_padded_to_table_width() {
        let out = encoded(vec![
            ReportSection {
                heading: Some("GARDENING".into()),
                rows: vec![vec!["Alice".into(), "".into(), "1:00".into()]],
            },
            ReportSection {
                heading: Some("COOKING".into()),
                rows: vec![],
            },
        ]);

        assert_eq!(
            out,
            "Name,Notes,Hours\nGARDENING,,\nAlice,,1:00\nCOOKING,,\n"
        );
    }

    #[test]
    fn non_ascii_is_written_as_utf8() {
        let out = encoded(vec![ReportSection {
            heading: None,
            rows: vec![vec!["Núria".into(), "café".into(), "0:30".into()]],
        }]);

        assert!(out.contains("Núria,café,0:30"));
    }
}
