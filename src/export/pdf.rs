//! A small PDF 1.4 writer for mood reports.
//!
//! Uses only the base-14 Helvetica fonts with WinAnsi encoding, uncompressed
//! content streams and no timestamps or random ids, so output depends on the
//! report alone. Characters outside WinAnsi (emoji among them) print as `?`,
//! which is why the entries table shows each mood's color as a swatch.

use super::{Report, ReportRow, Rgb};
use crate::constants::{REPORT_EMPTY_TEXT, REPORT_GRID_COLOR, REPORT_HEADER_COLOR};

/// US Letter, in points.
pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 54.0;
const CELL_PADDING: f32 = 4.0;
const TABLE_FONT_SIZE: f32 = 9.0;
const LINE_FACTOR: f32 = 1.25;
/// Rough average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.55;

const SUMMARY_COLUMNS: [f32; 2] = [160.0, 60.0];
const ENTRY_COLUMNS: [f32; 4] = [80.0, 120.0, 44.0, 260.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

enum Cell {
    Text(String),
    Swatch(Rgb),
}

/// A cell wrapped to its column: the lines it prints, or a swatch.
enum Block {
    Lines(Vec<String>),
    Swatch(Rgb),
}

impl Block {
    fn lines(&self) -> usize {
        match self {
            Block::Lines(lines) => lines.len().max(1),
            Block::Swatch(_) => 1,
        }
    }
}

/// The drawing operators of one page.
#[derive(Debug, Default)]
struct Page {
    content: String,
}

impl Page {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.content.push_str(&format!(
            "{:.3} {:.3} {:.3} rg\n{:.2} {:.2} {:.2} {:.2} re f\n",
            color.r, color.g, color.b, x, y, w, h
        ));
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.content.push_str(&format!(
            "0.5 w\n{:.3} {:.3} {:.3} RG\n{:.2} {:.2} {:.2} {:.2} re S\n",
            color.r, color.g, color.b, x, y, w, h
        ));
    }

    fn text(&mut self, x: f32, y: f32, font: Font, size: f32, text: &str) {
        self.content.push_str(&format!(
            "0 0 0 rg\nBT\n/{} {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
            font.resource(),
            size,
            x,
            y,
            encode_text(text)
        ));
    }
}

/// Flows paragraphs and tables down the page, breaking onto new pages.
struct Layout {
    finished: Vec<Page>,
    page: Page,
    y: f32,
}

impl Layout {
    fn new() -> Self {
        Layout {
            finished: Vec::new(),
            page: Page::default(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn new_page(&mut self) {
        self.finished.push(std::mem::take(&mut self.page));
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Starts a new page if `height` doesn't fit.
    fn ensure_space(&mut self, height: f32) {
        if self.y - height < MARGIN && self.y < PAGE_HEIGHT - MARGIN {
            self.new_page();
        }
    }

    fn paragraph(&mut self, font: Font, size: f32, text: &str) {
        let line_height = size * LINE_FACTOR;
        self.ensure_space(line_height);
        self.page.text(MARGIN, self.y - size, font, size, text);
        self.y -= line_height;
    }

    fn spacer(&mut self, height: f32) {
        self.y -= height;
    }

    /// Draws a table, repeating the header on every page it spans.
    ///
    /// A row that fits on a fresh page is never split. A taller one is cut
    /// between wrapped lines and continues on the following pages.
    fn table(&mut self, widths: &[f32], header: &[&str], rows: &[Vec<Cell>]) {
        let header_row: Vec<Block> = header
            .iter()
            .map(|h| Block::Lines(vec![h.to_string()]))
            .collect();
        let header_color = hex_or_black(REPORT_HEADER_COLOR);
        let header_height = row_height(&header_row);
        let page_capacity = lines_in(PAGE_HEIGHT - 2.0 * MARGIN - header_height);

        self.ensure_space(header_height + row_height_for(1));
        self.draw_row(widths, &header_row, Font::Bold, Some(header_color));

        for row in rows {
            let mut pending = wrap_row(widths, row);
            loop {
                let needed = row_lines(&pending);
                let room = lines_in(self.y - MARGIN);
                if needed <= room {
                    self.draw_row(widths, &pending, Font::Regular, None);
                    break;
                }
                if needed > page_capacity && room > 0 {
                    let rest = split_row(&mut pending, room);
                    self.draw_row(widths, &pending, Font::Regular, None);
                    pending = rest;
                }
                self.new_page();
                self.draw_row(widths, &header_row, Font::Bold, Some(header_color));
            }
        }
    }

    fn draw_row(&mut self, widths: &[f32], cells: &[Block], font: Font, background: Option<Rgb>) {
        let height = row_height(cells);
        let bottom = self.y - height;
        let grid = hex_or_black(REPORT_GRID_COLOR);
        let line_height = TABLE_FONT_SIZE * LINE_FACTOR;

        let mut x = MARGIN;
        for (cell, width) in cells.iter().zip(widths) {
            if let Some(color) = background {
                self.page.fill_rect(x, bottom, *width, height, color);
            }
            match cell {
                Block::Lines(lines) => {
                    for (i, line) in lines.iter().enumerate() {
                        let baseline =
                            self.y - CELL_PADDING - TABLE_FONT_SIZE - i as f32 * line_height;
                        self.page
                            .text(x + CELL_PADDING, baseline, font, TABLE_FONT_SIZE, line);
                    }
                }
                Block::Swatch(color) => {
                    let size = TABLE_FONT_SIZE;
                    self.page.fill_rect(
                        x + CELL_PADDING,
                        self.y - CELL_PADDING - size,
                        *width - 2.0 * CELL_PADDING,
                        size,
                        *color,
                    );
                }
            }
            self.page.stroke_rect(x, bottom, *width, height, grid);
            x += width;
        }

        self.y = bottom;
    }

    fn finish(mut self) -> Vec<Page> {
        self.finished.push(self.page);
        self.finished
    }
}

fn hex_or_black(hex: &str) -> Rgb {
    Rgb::from_hex(hex).unwrap_or(Rgb::BLACK)
}

fn wrap_row(widths: &[f32], cells: &[Cell]) -> Vec<Block> {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| match cell {
            Cell::Text(text) => Block::Lines(wrap_text(text, chars_per_line(*width))),
            Cell::Swatch(color) => Block::Swatch(*color),
        })
        .collect()
}

fn row_lines(cells: &[Block]) -> usize {
    cells.iter().map(Block::lines).max().unwrap_or(1)
}

fn row_height_for(lines: usize) -> f32 {
    lines as f32 * TABLE_FONT_SIZE * LINE_FACTOR + 2.0 * CELL_PADDING
}

fn row_height(cells: &[Block]) -> f32 {
    row_height_for(row_lines(cells))
}

/// How many table lines a row may have and still fit in `height`.
fn lines_in(height: f32) -> usize {
    let usable = height - 2.0 * CELL_PADDING;
    if usable <= 0.0 {
        return 0;
    }
    (usable / (TABLE_FONT_SIZE * LINE_FACTOR)).floor() as usize
}

/// Keeps the first `keep` lines of every cell in `row` and returns the rest.
/// Swatches stay with the first part.
fn split_row(row: &mut [Block], keep: usize) -> Vec<Block> {
    row.iter_mut()
        .map(|block| match block {
            Block::Lines(lines) => Block::Lines(lines.split_off(keep.min(lines.len()))),
            Block::Swatch(_) => Block::Lines(Vec::new()),
        })
        .collect()
}

fn chars_per_line(width: f32) -> usize {
    let usable = width - 2.0 * CELL_PADDING;
    ((usable / (TABLE_FONT_SIZE * AVG_GLYPH_WIDTH)).floor() as usize).max(1)
}

/// Greedy word wrap to at most `max_chars` characters per line. Words longer
/// than a line are split. Always returns at least one line.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let current_len = current.chars().count();
        let needed = if current.is_empty() { word.len() } else { current_len + 1 + word.len() };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Encodes `text` as the body of a PDF literal string in WinAnsi.
fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '\t' | '\n' | '\r' => out.push(' '),
            '\u{a0}'..='\u{ff}' => out.push_str(&format!("\\{:03o}", c as u32)),
            _ => match winansi_extra(c) {
                Some(code) => out.push_str(&format!("\\{:03o}", code)),
                None => out.push('?'),
            },
        }
    }
    out
}

/// WinAnsi codes in 0x80..0x9f for common typographic characters.
fn winansi_extra(c: char) -> Option<u8> {
    Some(match c {
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        _ => return None,
    })
}

/// Lays out `report` and serializes it.
pub fn render_report(report: &Report) -> Vec<u8> {
    let mut layout = Layout::new();

    layout.paragraph(Font::Bold, 20.0, &report.title);
    layout.spacer(4.0);
    layout.paragraph(Font::Regular, 10.0, &report.timeframe);
    layout.spacer(12.0);

    if !report.summary.is_empty() {
        layout.paragraph(Font::Bold, 14.0, "Summary");
        layout.spacer(4.0);
        let rows: Vec<Vec<Cell>> = report
            .summary
            .iter()
            .map(|row| vec![Cell::Text(row.label.clone()), Cell::Text(row.count.to_string())])
            .collect();
        layout.table(&SUMMARY_COLUMNS, &["Mood", "Count"], &rows);
        layout.spacer(12.0);
    }

    layout.paragraph(Font::Bold, 14.0, "Entries");
    layout.spacer(4.0);
    if report.rows.is_empty() {
        layout.paragraph(Font::Regular, 10.0, REPORT_EMPTY_TEXT);
    } else {
        let rows: Vec<Vec<Cell>> = report.rows.iter().map(entry_cells).collect();
        layout.table(&ENTRY_COLUMNS, &["Date", "Mood", "Color", "Note"], &rows);
    }

    serialize(&layout.finish(), &report.title)
}

fn entry_cells(row: &ReportRow) -> Vec<Cell> {
    vec![
        Cell::Text(row.date.clone()),
        Cell::Text(row.label.clone()),
        Cell::Swatch(row.color),
        Cell::Text(row.note.clone()),
    ]
}

/// Writes the object graph, cross-reference table and trailer.
///
/// Object layout: 1 catalog, 2 page tree, 3-4 fonts, then a page object and
/// its content stream per page, then the info dictionary.
fn serialize(pages: &[Page], title: &str) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = Vec::new();

    out.extend_from_slice(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n");

    let first_page_id = 5;
    let info_id = first_page_id + 2 * pages.len();

    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", first_page_id + 2 * i))
        .collect();

    push_object(&mut out, &mut offsets, "<< /Type /Catalog /Pages 2 0 R >>");
    push_object(
        &mut out,
        &mut offsets,
        &format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        ),
    );
    push_object(
        &mut out,
        &mut offsets,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    );
    push_object(
        &mut out,
        &mut offsets,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
    );

    for (i, page) in pages.iter().enumerate() {
        let content_id = first_page_id + 2 * i + 1;
        push_object(
            &mut out,
            &mut offsets,
            &format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                PAGE_WIDTH, PAGE_HEIGHT, content_id
            ),
        );
        push_object(
            &mut out,
            &mut offsets,
            &format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                page.content.len(),
                page.content
            ),
        );
    }

    push_object(
        &mut out,
        &mut offsets,
        &format!("<< /Title ({}) /Producer (moodlog) >>", encode_text(title)),
    );

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", offsets.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            offsets.len() + 1,
            info_id,
            xref_offset
        )
        .as_bytes(),
    );

    out
}

/// Appends the next numbered object; ids follow push order starting at 1.
fn push_object(out: &mut Vec<u8>, offsets: &mut Vec<usize>, body: &str) {
    offsets.push(out.len());
    let id = offsets.len();
    out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", id, body).as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{ReportRow, SummaryRow};

    fn report(rows: usize) -> Report {
        Report {
            title: "Mood Report".to_string(),
            timeframe: "From 2024-03-01 to 2024-03-31".to_string(),
            summary: if rows == 0 {
                vec![]
            } else {
                vec![SummaryRow {
                    label: "Happy".to_string(),
                    count: rows,
                }]
            },
            rows: (0..rows)
                .map(|i| ReportRow {
                    date: format!("2024-03-{:02}", i % 28 + 1),
                    label: "Happy".to_string(),
                    color: Rgb::from_hex("#22c55e").unwrap(),
                    note: "a fine day (mostly)".to_string(),
                })
                .collect(),
        }
    }

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn test_document_structure() {
        let bytes = render_report(&report(3));
        let text = as_text(&bytes);

        assert!(bytes.starts_with(b"%PDF-1.4\n"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains("/Count 1 "));
        assert!(text.contains("(Mood Report) Tj"));
        assert!(text.contains("(Summary) Tj"));
        assert!(text.contains("(a fine day \\(mostly\\)) Tj"));
    }

    #[test]
    fn test_empty_report_says_so() {
        let text = as_text(&render_report(&report(0)));
        assert!(text.contains("(No entries recorded for this period.) Tj"));
        assert!(!text.contains("(Summary) Tj"));
    }

    #[test]
    fn test_output_is_deterministic() {
        assert_eq!(
            render_report(&report(40)),
            render_report(&report(40))
        );
    }

    #[test]
    fn test_long_reports_paginate() {
        let text = as_text(&render_report(&report(120)));
        assert!(!text.contains("/Count 1 "));
        assert!(text.matches("/Type /Page ").count() >= 3);
    }

    /// The `y` operand of every `Td` in the document.
    fn text_positions(text: &str) -> Vec<f32> {
        text.lines()
            .filter_map(|line| line.strip_suffix(" Td"))
            .map(|operands| operands.split(' ').nth(1).unwrap().parse().unwrap())
            .collect()
    }

    #[test]
    fn test_row_taller_than_a_page_continues_on_next_pages() {
        let mut long = report(1);
        long.summary.clear();
        long.rows[0].label = "word ".repeat(2000);

        let text = as_text(&render_report(&long));
        let positions = text_positions(&text);

        assert!(text.matches("/Type /Page ").count() > 1);
        assert!(positions.iter().all(|y| *y >= MARGIN - 0.01), "text drawn below the margin");
        assert_eq!(text.matches("word").count(), 2000);
        // The header repeats on every page the row spans.
        assert_eq!(
            text.matches("(Date) Tj").count(),
            text.matches("/Type /Page ").count()
        );
    }

    #[test]
    fn test_paginated_text_stays_on_the_page() {
        let text = as_text(&render_report(&report(120)));
        assert!(text_positions(&text)
            .iter()
            .all(|y| *y >= MARGIN - 0.01 && *y <= PAGE_HEIGHT));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let bytes = render_report(&report(2));
        let text = as_text(&bytes);
        let xref_at = text.rfind("xref\n").unwrap();
        let first_entry = text[xref_at..].lines().nth(3).unwrap();
        let offset: usize = first_entry[..10].parse().unwrap();
        assert!(bytes[offset..].starts_with(b"1 0 obj"));
    }

    #[test]
    fn test_encode_text() {
        assert_eq!(encode_text("a(b)c\\"), "a\\(b\\)c\\\\");
        assert_eq!(encode_text("café"), "caf\\351");
        assert_eq!(encode_text("it’s"), "it\\222s");
        assert_eq!(encode_text("😀"), "?");
        assert_eq!(encode_text("line\nbreak"), "line break");
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("hi abcdefghij", 4), vec!["hi", "abcd", "efgh", "ij"]);
    }
}
