//! Extraction of `<h1>`..`<h6>` elements from HTML.
//!
//! This is a scanner rather than a parser: headings are found with regular
//! expressions, which is enough for generated or hand-written pages but will
//! be fooled by headings inside comments or `<script>` blocks.

use std::{
    fmt, fs,
    io::{self, BufWriter, Write},
    ops::Range,
    path::Path,
    sync::LazyLock,
};

use regex::Regex;

use crate::{
    domain::{Heading, HeadingSource, Level},
    storage::LoadError,
};

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h([1-6])(\s[^>]*)?>(.*?)</h([1-6])\s*>").expect("valid heading pattern")
});

static ID_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)id\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid id pattern")
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

/// An HTML document and the heading elements found in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlDocument {
    source: String,
    headings: Vec<Heading>,
    elements: Vec<Element>,
}

/// The parts of a heading element needed to write an identifier back.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Element {
    /// One-based line of the opening tag.
    line: usize,
    /// Byte offset just past `<hN`.
    name_end: usize,
    /// Byte range of the `id` attribute's value, if the element has one.
    id_value: Option<Range<usize>>,
}

impl HtmlDocument {
    /// Parses a document, collecting headings of every level.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self::parse_up_to(html, Level::MAX)
    }

    /// Parses a document, collecting headings no deeper than `max_level`.
    #[must_use]
    pub fn parse_up_to(html: &str, max_level: Level) -> Self {
        let mut headings = Vec::new();
        let mut elements = Vec::new();

        for captures in HEADING.captures_iter(html) {
            let (Some(open), Some(close)) = (captures.get(1), captures.get(4)) else {
                continue;
            };
            // `<h2>...</h3>` is not a heading element
            if open.as_str() != close.as_str() {
                continue;
            }
            let Ok(level) = open.as_str().parse::<Level>() else {
                continue;
            };
            if level > max_level {
                continue;
            }

            let whole = captures.get(0).map_or(0..0, |m| m.range());
            let id_value = captures.get(2).and_then(|attributes| {
                let offset = attributes.start();
                ID_ATTRIBUTE.captures(attributes.as_str()).and_then(|id| {
                    (1..=3)
                        .find_map(|group| id.get(group))
                        .map(|value| offset + value.start()..offset + value.end())
                })
            });
            let id = id_value.clone().map(|range| decode_entities(&html[range]));
            let text = captures
                .get(3)
                .map_or_else(String::new, |inner| text_content(inner.as_str()));

            headings.push(Heading { level, id, text });
            elements.push(Element {
                line: html[..whole.start].matches('\n').count() + 1,
                name_end: open.end(),
                id_value,
            });
        }

        tracing::trace!("found {} html headings", headings.len());

        Self {
            source: html.to_string(),
            headings,
            elements,
        }
    }

    /// Loads a document from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    pub fn load(path: &Path, max_level: Level) -> Result<Self, LoadError> {
        let html = fs::read_to_string(path).map_err(|io_error| match io_error.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound,
            _ => LoadError::Io(io_error),
        })?;
        Ok(Self::parse_up_to(&html, max_level))
    }

    /// Writes the document, including any identifiers assigned since it was
    /// parsed, to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written to.
    pub fn save_to_path(&self, file_path: &Path) -> io::Result<()> {
        let file = fs::File::create(file_path)?;
        let mut writer = BufWriter::new(file);
        write!(writer, "{self}")?;
        writer.flush()
    }

    /// The headings of the document, in order.
    #[must_use]
    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    /// The one-based line number of the heading at `index`.
    #[must_use]
    pub fn line_of(&self, index: usize) -> Option<usize> {
        self.elements.get(index).map(|element| element.line)
    }

    /// Edits that bring the source in line with the current identifiers, in
    /// source order.
    fn edits(&self) -> impl Iterator<Item = (Range<usize>, String)> + '_ {
        self.headings
            .iter()
            .zip(&self.elements)
            .filter_map(|(heading, element)| {
                let id = heading.anchor()?;
                let escaped = escape_attribute(id.as_str());
                match &element.id_value {
                    Some(range) if self.source[range.clone()].is_empty() => {
                        Some((range.clone(), escaped))
                    }
                    Some(_) => None,
                    None => Some((
                        element.name_end..element.name_end,
                        format!(" id=\"{escaped}\""),
                    )),
                }
            })
    }
}

impl fmt::Display for HtmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cursor = 0;
        for (range, replacement) in self.edits() {
            f.write_str(&self.source[cursor..range.start])?;
            f.write_str(&replacement)?;
            cursor = range.end;
        }
        f.write_str(&self.source[cursor..])
    }
}

impl HeadingSource for HtmlDocument {
    fn headings_mut(&mut self) -> &mut [Heading] {
        &mut self.headings
    }
}

/// The text of an element's inner HTML, with tags removed, entities decoded
/// and whitespace collapsed.
fn text_content(inner: &str) -> String {
    let stripped = TAG.replace_all(inner, "");
    decode_entities(&stripped)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
