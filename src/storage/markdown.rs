use std::{
    fmt,
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
    str::FromStr,
};

use crate::{
    domain::{Heading, HeadingSource, Level},
    storage::LoadError,
};

/// A markdown document and the ATX headings (`#`..`######`) found in it.
///
/// Headings inside fenced code blocks are ignored. A trailing `{#id}`
/// attribute on a heading is taken as its identifier.
///
/// When the document is written back, headings that were given an
/// identifier after parsing gain a `{#id}` attribute so that links to them
/// resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownDocument {
    lines: Vec<Line>,
    headings: Vec<Heading>,
    locations: Vec<Location>,
}

/// A source line and the terminator that followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    content: String,
    ending: LineEnding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineEnding {
    Lf,
    CrLf,
    /// The last line of a file without a trailing newline.
    Missing,
}

impl LineEnding {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Missing => "",
        }
    }
}

impl Line {
    fn split(text: &str) -> Vec<Self> {
        text.split_inclusive('\n')
            .map(|chunk| {
                let (content, ending) = if let Some(content) = chunk.strip_suffix("\r\n") {
                    (content, LineEnding::CrLf)
                } else if let Some(content) = chunk.strip_suffix('\n') {
                    (content, LineEnding::Lf)
                } else {
                    (chunk, LineEnding::Missing)
                };
                Self {
                    content: content.to_string(),
                    ending,
                }
            })
            .collect()
    }
}

/// Where a heading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Location {
    /// Zero-based line index.
    line: usize,
    /// Whether the source line already carried an identifier.
    had_id: bool,
}

impl MarkdownDocument {
    /// Parses a document, collecting headings of every level.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::parse_up_to(text, Level::MAX)
    }

    /// Parses a document, collecting headings no deeper than `max_level`.
    #[must_use]
    pub fn parse_up_to(text: &str, max_level: Level) -> Self {
        Self::from_lines(Line::split(text), max_level)
    }

    pub(crate) fn read<R: Read>(reader: R, max_level: Level) -> io::Result<Self> {
        let text = io::read_to_string(reader)?;
        Ok(Self::parse_up_to(&text, max_level))
    }

    fn from_lines(lines: Vec<Line>, max_level: Level) -> Self {
        let mut headings = Vec::new();
        let mut locations = Vec::new();
        let mut fence: Option<Fence> = None;

        for (line_index, line) in lines.iter().enumerate() {
            let line = line.content.as_str();
            if let Some(open) = fence {
                if open.is_closed_by(line) {
                    fence = None;
                }
                continue;
            }
            if let Some(open) = Fence::opened_by(line) {
                fence = Some(open);
                continue;
            }

            let Some(atx) = parse_atx(line) else {
                continue;
            };
            if atx.level > max_level {
                continue;
            }

            locations.push(Location {
                line: line_index,
                had_id: atx.id.is_some(),
            });
            headings.push(Heading {
                level: atx.level,
                id: atx.id.map(str::to_string),
                text: atx.text.to_string(),
            });
        }

        tracing::trace!("found {} markdown headings", headings.len());

        Self {
            lines,
            headings,
            locations,
        }
    }

    /// Loads a document from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    pub fn load(path: &Path, max_level: Level) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|io_error| match io_error.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound,
            _ => LoadError::Io(io_error),
        })?;

        Ok(Self::read(BufReader::new(file), max_level)?)
    }

    /// Writes the document, including any identifiers assigned since it was
    /// parsed, to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written to.
    pub fn save_to_path(&self, file_path: &Path) -> io::Result<()> {
        let file = File::create(file_path)?;
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
        self.locations.get(index).map(|location| location.line + 1)
    }

    fn rendered_line(&self, line_index: usize) -> Option<String> {
        let position = self
            .locations
            .iter()
            .position(|location| location.line == line_index)?;
        if self.locations[position].had_id {
            return None;
        }

        let heading = &self.headings[position];
        let id = heading.anchor()?;
        let hashes = "#".repeat(usize::from(heading.level.get()));
        let indent = leading_spaces(&self.lines[line_index].content);

        Some(if heading.text.is_empty() {
            format!("{:indent$}{hashes} {{#{id}}}", "")
        } else {
            format!("{:indent$}{hashes} {} {{#{id}}}", "", heading.text)
        })
    }
}

impl FromStr for MarkdownDocument {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for MarkdownDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (line_index, line) in self.lines.iter().enumerate() {
            match self.rendered_line(line_index) {
                Some(rendered) => f.write_str(&rendered)?,
                None => f.write_str(&line.content)?,
            }
            f.write_str(line.ending.as_str())?;
        }
        Ok(())
    }
}

impl HeadingSource for MarkdownDocument {
    fn headings_mut(&mut self) -> &mut [Heading] {
        &mut self.headings
    }
}

/// An ATX heading line, borrowed from its source.
#[derive(Debug, PartialEq, Eq)]
struct Atx<'a> {
    level: Level,
    text: &'a str,
    id: Option<&'a str>,
}

/// Parses an ATX heading such as `## Usage ##` or `### Notes {#notes}`.
fn parse_atx(line: &str) -> Option<Atx<'_>> {
    if leading_spaces(line) > 3 {
        return None;
    }
    let trimmed = line.trim_start_matches(' ');

    let after_hashes = trimmed.trim_start_matches('#');
    let hashes = trimmed.len() - after_hashes.len();
    let level = u8::try_from(hashes).ok().and_then(|n| Level::new(n).ok())?;

    // `#hashtag` is not a heading
    if !(after_hashes.is_empty() || after_hashes.starts_with([' ', '\t'])) {
        return None;
    }

    let mut text = strip_closing_sequence(after_hashes.trim());
    let mut id = None;
    if let Some((before, attribute)) = split_id_attribute(text) {
        text = before;
        id = Some(attribute);
    }

    Some(Atx { level, text, id })
}

/// Removes an optional closing run of `#`, which must be preceded by
/// whitespace.
fn strip_closing_sequence(content: &str) -> &str {
    let without = content.trim_end_matches('#');
    if without.len() == content.len() {
        content
    } else if without.is_empty() {
        ""
    } else if without.ends_with([' ', '\t']) {
        without.trim_end()
    } else {
        content
    }
}

/// Splits `Title {#id}` into `("Title", "id")`.
fn split_id_attribute(content: &str) -> Option<(&str, &str)> {
    let inner = content.strip_suffix('}')?;
    let start = inner.rfind("{#")?;
    let id = &inner[start + 2..];
    if id.is_empty() || id.contains(char::is_whitespace) {
        return None;
    }
    Some((inner[..start].trim_end(), id))
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// An open fenced code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: char,
    length: usize,
}

impl Fence {
    fn opened_by(line: &str) -> Option<Self> {
        if leading_spaces(line) > 3 {
            return None;
        }
        let trimmed = line.trim_start_matches(' ');
        let marker = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
        let length = trimmed.len() - trimmed.trim_start_matches(marker).len();
        (length >= 3).then_some(Self { marker, length })
    }

    fn is_closed_by(self, line: &str) -> bool {
        Self::opened_by(line).is_some_and(|close| {
            let rest = line.trim().trim_start_matches(self.marker);
            close.marker == self.marker && close.length >= self.length && rest.is_empty()
        })
    }
}
