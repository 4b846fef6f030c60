//! PDF encoder for report tables
//!
//! Produces a PDF 1.4 document on A4 pages using the built-in Helvetica
//! fonts, so no font data is embedded. The document carries no creation date,
//! producer or file identifier: identical tables encode to identical bytes.
//!
//! Layout: the title on the first page, the header row at the top of every
//! page, section headings in bold, and a page counter in the footer. Cell text
//! that does not fit its column is cut and ends in `...`.

use super::ReportTable;
use std::fmt::Write as _;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 40.0;
/// Average Helvetica glyph width as a fraction of the font size
const GLYPH_WIDTH: f32 = 0.5;
const CELL_PADDING: f32 = 4.0;
/// Longest cell (in characters) that still widens its column
const MAX_COLUMN_CHARS: usize = 40;

const MIN_FONT_SIZE: f32 = 4.0;
const MAX_FONT_SIZE: f32 = 24.0;

/// PDF rendering options
#[derive(Clone, Debug)]
pub struct PdfOptions {
    /// Body font size in points
    pub font_size: f32,
}

/// One printed line of the table body
enum Line<'a> {
    Heading(&'a str),
    Row(&'a [String]),
}

struct Layout {
    font_size: f32,
    line_height: f32,
    column_x: Vec<f32>,
    column_chars: Vec<usize>,
}

impl Layout {
    fn new(table: &ReportTable, font_size: f32) -> Self {
        let columns = table.headers.len().max(1);
        let usable = PAGE_WIDTH - 2.0 * MARGIN;

        // Columns get space in proportion to their longest (capped) cell
        let mut weights = vec![1usize; columns];
        let rows = table.sections.iter().flat_map(|s| s.rows.iter());
        for cells in std::iter::once(&table.headers).chain(rows) {
            for (i, cell) in cells.iter().take(columns).enumerate() {
                weights[i] = weights[i].max(cell.chars().count().min(MAX_COLUMN_CHARS));
            }
        }
        let total: usize = weights.iter().sum();

        let mut column_x = Vec::with_capacity(columns);
        let mut column_chars = Vec::with_capacity(columns);
        let mut x = MARGIN;
        for weight in &weights {
            let width = usable * (*weight as f32) / (total as f32);
            column_x.push(x);
            let chars = ((width - CELL_PADDING) / (font_size * GLYPH_WIDTH)).floor();
            column_chars.push(chars.max(1.0) as usize);
            x += width;
        }

        Self {
            font_size,
            line_height: font_size * 1.4,
            column_x,
            column_chars,
        }
    }

    fn title_size(&self) -> f32 {
        self.font_size * 1.6
    }

    /// Title characters that fit across the page at the title size
    fn title_chars(&self) -> usize {
        let usable = PAGE_WIDTH - 2.0 * MARGIN;
        (usable / (self.title_size() * GLYPH_WIDTH)).floor().max(1.0) as usize
    }

    /// Lines that fit between the header row and the footer
    fn lines_per_page(&self, first_page: bool) -> usize {
        let mut available = PAGE_HEIGHT - 2.0 * MARGIN - self.line_height * 2.0;
        if first_page {
            available -= self.title_size() * 2.0;
        }
        (available / self.line_height).floor().max(0.0) as usize
    }
}

/// Encode a table as a PDF document
///
/// Fails only when the options cannot produce a usable page.
pub fn encode(table: &ReportTable, options: &PdfOptions) -> Result<Vec<u8>, String> {
    let font_size = options.font_size;
    if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&font_size) {
        return Err(format!(
            "font size {} outside {}..={}",
            font_size, MIN_FONT_SIZE, MAX_FONT_SIZE
        ));
    }

    let layout = Layout::new(table, font_size);
    let pages = paginate(table, &layout)?;
    let page_count = pages.len();

    let streams: Vec<String> = pages
        .iter()
        .enumerate()
        .map(|(index, lines)| page_stream(table, &layout, lines, index, page_count))
        .collect();

    Ok(assemble(&streams))
}

fn paginate<'a>(table: &'a ReportTable, layout: &Layout) -> Result<Vec<Vec<Line<'a>>>, String> {
    let mut lines = Vec::new();
    for section in &table.sections {
        if let Some(heading) = &section.heading {
            lines.push(Line::Heading(heading));
        }
        for row in &section.rows {
            lines.push(Line::Row(row));
        }
    }

    let mut pages: Vec<Vec<Line<'a>>> = vec![Vec::new()];
    for line in lines {
        let capacity = layout.lines_per_page(pages.len() == 1);
        if capacity == 0 {
            return Err("page has no room for table rows".to_string());
        }
        if pages.last().map_or(0, Vec::len) >= capacity {
            pages.push(Vec::new());
        }
        if let Some(page) = pages.last_mut() {
            page.push(line);
        }
    }

    Ok(pages)
}

fn page_stream(
    table: &ReportTable,
    layout: &Layout,
    lines: &[Line<'_>],
    index: usize,
    page_count: usize,
) -> String {
    let mut out = String::new();
    let mut y = PAGE_HEIGHT - MARGIN;

    if index == 0 {
        y -= layout.title_size();
        let title = fit(&table.title, layout.title_chars());
        text(&mut out, "F2", layout.title_size(), MARGIN, y, &title);
        y -= layout.title_size();
    }

    y -= layout.line_height;
    for (i, header) in table.headers.iter().enumerate() {
        let cell = fit(header, layout.column_chars[i]);
        text(&mut out, "F2", layout.font_size, layout.column_x[i], y, &cell);
    }
    let rule_y = y - layout.font_size * 0.4;
    let _ = writeln!(
        out,
        "0.5 w {} {} m {} {} l S",
        num(MARGIN),
        num(rule_y),
        num(PAGE_WIDTH - MARGIN),
        num(rule_y)
    );

    for line in lines {
        y -= layout.line_height;
        match line {
            Line::Heading(heading) => {
                let limit: usize = layout.column_chars.iter().sum();
                text(&mut out, "F2", layout.font_size, MARGIN, y, &fit(heading, limit));
            }
            Line::Row(cells) => {
                for (i, cell) in cells.iter().take(layout.column_x.len()).enumerate() {
                    let cell = fit(cell, layout.column_chars[i]);
                    text(&mut out, "F1", layout.font_size, layout.column_x[i], y, &cell);
                }
            }
        }
    }

    let footer = format!("Page {} of {}", index + 1, page_count);
    let footer_x = PAGE_WIDTH - MARGIN - footer.len() as f32 * layout.font_size * GLYPH_WIDTH;
    text(
        &mut out,
        "F1",
        layout.font_size,
        footer_x,
        MARGIN - layout.font_size,
        &footer,
    );

    out
}

/// Emit one positioned text run
fn text(out: &mut String, font: &str, size: f32, x: f32, y: f32, value: &str) {
    let _ = writeln!(
        out,
        "BT /{} {} Tf 1 0 0 1 {} {} Tm ({}) Tj ET",
        font,
        num(size),
        num(x),
        num(y),
        escape_text(value)
    );
}

/// Cut `value` to at most `max_chars` characters, marking the cut with `...`
fn fit(value: &str, max_chars: usize) -> String {
    // Line breaks would corrupt the single-line layout
    let value: String = value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    if value.chars().count() <= max_chars {
        return value;
    }
    if max_chars <= 3 {
        return value.chars().take(max_chars).collect();
    }
    let mut cut: String = value.chars().take(max_chars - 3).collect();
    cut.push_str("...");
    cut
}

/// Fixed two-decimal formatting keeps coordinates byte-stable
fn num(value: f32) -> String {
    let formatted = format!("{:.2}", value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Escape a string for a PDF literal, encoding it as WinAnsi
///
/// Characters outside WinAnsi become `?`.
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => match win_ansi_byte(c) {
                Some(byte) => {
                    let _ = write!(out, "\\{:03o}", byte);
                }
                None => out.push('?'),
            },
        }
    }
    out
}

fn win_ansi_byte(c: char) -> Option<u8> {
    let code = c as u32;
    if (0xA0..=0xFF).contains(&code) {
        return Some(code as u8);
    }
    let byte = match c {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

/// Wrap page content streams into a complete document with a cross-reference table
fn assemble(streams: &[String]) -> Vec<u8> {
    // Objects: 1 catalog, 2 page tree, 3-4 fonts, then a (page, contents) pair per page
    let page_ids: Vec<usize> = (0..streams.len()).map(|i| 5 + 2 * i).collect();

    let mut objects: Vec<Vec<u8>> = Vec::with_capacity(4 + 2 * streams.len());
    objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());

    let kids: Vec<String> = page_ids.iter().map(|id| format!("{} 0 R", id)).collect();
    objects.push(
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            streams.len()
        )
        .into_bytes(),
    );
    for base_font in ["Helvetica", "Helvetica-Bold"] {
        objects.push(
            format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                base_font
            )
            .into_bytes(),
        );
    }

    for (stream, page_id) in streams.iter().zip(&page_ids) {
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                num(PAGE_WIDTH),
                num(PAGE_HEIGHT),
                page_id + 1
            )
            .into_bytes(),
        );
        objects.push(
            format!(
                "<< /Length {} >>\nstream\n{}endstream",
                stream.len(),
                stream
            )
            .into_bytes(),
        );
    }

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in &offsets {
        let _ = write!(xref, "{:010} 00000 n \n", offset);
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    );
    out.extend_from_slice(xref.as_bytes());

    out
}
