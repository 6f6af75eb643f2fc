//! Printable documents built from export blocks.
//!
//! Layout is line based: every block is sanitized to the renderer's Latin-1 repertoire, wrapped
//! to the configured width, followed by a separator and then packed into pages so that a block
//! which fits on one page is never split.

use std::{fs, path::Path};

use chrono::NaiveDateTime;
use tracing::debug;

use crate::{Error, Result, export::separator, repository::config::DocumentConfig};

mod pdf;

/// A laid out document: pages of lines ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pages: Vec<Vec<String>>,
}

impl Document {
    /// Lay out export blocks (see [`crate::export::format_patient`]) according to `cfg`.
    pub fn layout<S: AsRef<str>>(blocks: &[S], cfg: &DocumentConfig) -> Self {
        let blocks = blocks
            .iter()
            .map(|block| {
                let mut lines: Vec<String> = block
                    .as_ref()
                    .lines()
                    .flat_map(|line| wrap(&sanitize(line), cfg.line_width()))
                    .collect();
                lines.push(separator());
                lines
            })
            .collect();

        Self {
            pages: paginate(blocks, cfg.lines_per_page()),
        }
    }

    pub fn pages(&self) -> &[Vec<String>] {
        &self.pages
    }

    /// Encode as a PDF file.
    pub fn render_pdf(&self) -> Vec<u8> {
        pdf::render(&self.pages)
    }

    /// Write the PDF to `path`, creating missing parent directories.
    pub fn write(&self, path: &Path) -> Result<()> {
        let document_error = |source| Error::Document {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(document_error)?;
        }
        fs::write(path, self.render_pdf()).map_err(document_error)?;

        debug!(
            "Wrote {} page document to {}",
            self.pages.len(),
            path.display()
        );

        Ok(())
    }
}

/// File name for a document exported at `now`.
pub fn file_name(now: NaiveDateTime) -> String {
    now.format("Patienten_Export_%Y%m%d_%H%M%S.pdf").to_string()
}

/// Replace typographic punctuation with ASCII and anything else outside Latin-1 with `?`.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        match replacement(c) {
            Some(ascii) => out.push_str(ascii),
            None if c == '\t' => out.push_str("    "),
            None if c.is_control() || u32::from(c) > 0xFF => out.push('?'),
            None => out.push(c),
        }
    }

    out
}

fn replacement(c: char) -> Option<&'static str> {
    Some(match c {
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}'
        | '\u{2212}' => "-",
        '\u{2192}' | '\u{2794}' | '\u{279C}' => "->",
        '\u{2190}' => "<-",
        '\u{2194}' => "<->",
        '\u{21D2}' => "=>",
        '\u{2191}' => "^",
        '\u{2193}' => "v",
        '\u{2022}' | '\u{2023}' | '\u{2043}' | '\u{25CF}' | '\u{25AA}' | '\u{00B7}' => "*",
        '\u{2713}' | '\u{2714}' | '\u{2705}' => "x",
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => "\"",
        '\u{2026}' => "...",
        '\u{2264}' => "<=",
        '\u{2265}' => ">=",
        '\u{2248}' => "~",
        _ => return None,
    })
}

/// Break `line` into pieces of at most `width` characters, preferring the last space in range.
/// Continuation lines repeat the original indentation unless it would take half the width.
pub fn wrap(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let chars: Vec<char> = line.trim_end().chars().collect();

    let indent = chars.iter().take_while(|c| **c == ' ').count();
    let indent = if indent.saturating_mul(2) >= width {
        0
    } else {
        indent
    };

    let mut lines = Vec::new();
    let mut rest: &[char] = &chars;
    let mut prefix = 0;

    loop {
        let room = width.saturating_sub(prefix);
        if rest.len() <= room {
            lines.push(compose(prefix, rest));
            break;
        }

        let (window, _) = rest.split_at(room);
        let cut = window
            .iter()
            .rposition(|c| *c == ' ')
            .filter(|&at| window.iter().take(at).any(|c| *c != ' '))
            .unwrap_or(room);

        let (head, tail) = rest.split_at(cut);
        lines.push(compose(prefix, head));

        let skip = tail.iter().take_while(|c| **c == ' ').count();
        let (_, tail) = tail.split_at(skip);
        if tail.is_empty() {
            break;
        }

        rest = tail;
        prefix = indent;
    }

    lines
}

fn compose(indent: usize, chars: &[char]) -> String {
    let text: String = chars.iter().collect();
    format!("{}{}", " ".repeat(indent), text.trim_end())
}

/// Pack blocks of lines into pages of at most `lines_per_page` lines.
///
/// A block that fits in the space left on the current page goes there. A block that doesn't fit
/// but would fit on a page of its own starts a new page. A block longer than a page starts on a
/// fresh page and flows over as many as it needs. There is always at least one page.
pub fn paginate(blocks: Vec<Vec<String>>, lines_per_page: usize) -> Vec<Vec<String>> {
    let capacity = lines_per_page.max(1);
    let mut pages = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for block in blocks {
        let remaining = capacity.saturating_sub(current.len());
        if block.len() > remaining && !current.is_empty() {
            pages.push(std::mem::take(&mut current));
        }

        for line in block {
            if current.len() >= capacity {
                pages.push(std::mem::take(&mut current));
            }
            current.push(line);
        }
    }

    if !current.is_empty() || pages.is_empty() {
        pages.push(current);
    }

    pages
}
