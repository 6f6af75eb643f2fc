//! A minimal PDF 1.4 writer for monospaced text pages.
//!
//! Pages are A4 with a single Courier font in WinAnsi encoding, so text must already be
//! restricted to Latin-1 (see [`super::sanitize`]). Characters outside it are written as `?`.

const PAGE_WIDTH: u32 = 595;
const PAGE_HEIGHT: u32 = 842;
const MARGIN: u32 = 50;
const FONT_SIZE: u32 = 10;
const LEADING: u32 = 12;
const FOOTER_FONT_SIZE: u32 = 8;
const FOOTER_Y: u32 = 30;

const CATALOG: usize = 1;
const PAGES: usize = 2;
const FONT: usize = 3;

pub(crate) fn render(pages: &[Vec<String>]) -> Vec<u8> {
    let mut pdf = Writer::default();
    let total = pages.len();
    // Each page takes two objects: the page itself and its content stream
    let page_ids: Vec<usize> = (0..total).map(|i| FONT + 1 + i * 2).collect();

    pdf.object(
        CATALOG,
        format!("<< /Type /Catalog /Pages {PAGES} 0 R >>").as_bytes(),
    );

    let kids = page_ids
        .iter()
        .map(|id| format!("{id} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");
    pdf.object(
        PAGES,
        format!("<< /Type /Pages /Kids [{kids}] /Count {total} >>").as_bytes(),
    );

    pdf.object(
        FONT,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Courier /Encoding /WinAnsiEncoding >>",
    );

    for (number, (lines, id)) in pages.iter().zip(&page_ids).enumerate() {
        let content = content_stream(lines, number + 1, total);
        let content_id = id + 1;

        pdf.object(
            *id,
            format!(
                "<< /Type /Page /Parent {PAGES} 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 {FONT} 0 R >> >> /Contents {content_id} 0 R >>"
            )
            .as_bytes(),
        );

        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend_from_slice(&content);
        stream.extend_from_slice(b"\nendstream");
        pdf.object(content_id, &stream);
    }

    pdf.finish()
}

fn content_stream(lines: &[String], page: usize, total: usize) -> Vec<u8> {
    let top = PAGE_HEIGHT - MARGIN;
    let mut out = format!("BT\n/F1 {FONT_SIZE} Tf\n{LEADING} TL\n{MARGIN} {top} Td\n").into_bytes();

    for line in lines {
        push_string(&mut out, line);
        out.extend_from_slice(b" Tj\nT*\n");
    }
    out.extend_from_slice(b"ET\n");

    out.extend_from_slice(
        format!("BT\n/F1 {FOOTER_FONT_SIZE} Tf\n{MARGIN} {FOOTER_Y} Td\n").as_bytes(),
    );
    push_string(&mut out, &format!("Seite {page}/{total}"));
    out.extend_from_slice(b" Tj\nET");

    out
}

/// Append `text` as a PDF literal string.
fn push_string(out: &mut Vec<u8>, text: &str) {
    out.push(b'(');
    for c in text.chars() {
        let byte = u8::try_from(u32::from(c)).unwrap_or(b'?');
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out.push(b')');
}

#[derive(Default)]
struct Writer {
    buf: Vec<u8>,
    /// Byte offset of each object, indexed by object number minus one
    offsets: Vec<usize>,
}

impl Writer {
    fn object(&mut self, id: usize, body: &[u8]) {
        if self.buf.is_empty() {
            self.buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        }
        if self.offsets.len() < id {
            self.offsets.resize(id, 0);
        }
        if let Some(slot) = self.offsets.get_mut(id - 1) {
            *slot = self.buf.len();
        }

        self.buf
            .extend_from_slice(format!("{id} 0 obj\n").as_bytes());
        self.buf.extend_from_slice(body);
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    fn finish(mut self) -> Vec<u8> {
        let xref = self.buf.len();
        let size = self.offsets.len() + 1;

        let mut table = format!("xref\n0 {size}\n0000000000 65535 f \n");
        for offset in &self.offsets {
            table.push_str(&format!("{offset:010} 00000 n \n"));
        }
        table.push_str(&format!(
            "trailer\n<< /Size {size} /Root {CATALOG} 0 R >>\nstartxref\n{xref}\n%%EOF\n"
        ));

        self.buf.extend_from_slice(table.as_bytes());
        self.buf
    }
}
