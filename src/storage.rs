use std::{
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::domain::{Heading, HeadingSource, Level};

mod html;
mod markdown;

pub use html::HtmlDocument;
pub use markdown::MarkdownDocument;

/// Errors that can occur when loading a document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The document was not found.
    #[error("file not found")]
    NotFound,
    /// An I/O error occurred.
    #[error("failed to read document")]
    Io(#[from] io::Error),
    /// The file extension is not one of the supported formats.
    #[error("unsupported document format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// The formats headings can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Markdown, with ATX headings.
    Markdown,
    /// HTML, with `<h1>`..`<h6>` elements.
    Html,
}

impl Format {
    /// Infers the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension().and_then(OsStr::to_str)?;
        match extension.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

/// A document of any supported format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    /// A markdown document.
    Markdown(MarkdownDocument),
    /// An HTML document.
    Html(HtmlDocument),
}

impl Document {
    /// Loads the document at `path`, choosing the format from its extension.
    ///
    /// Headings deeper than `max_level` are not collected.
    ///
    /// # Errors
    ///
    /// Returns an error if the format is not supported, or if the file cannot
    /// be read.
    pub fn open(path: &Path, max_level: Level) -> Result<Self, LoadError> {
        match Format::from_path(path) {
            Some(Format::Markdown) => MarkdownDocument::load(path, max_level).map(Self::Markdown),
            Some(Format::Html) => HtmlDocument::load(path, max_level).map(Self::Html),
            None => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// The format of the document.
    #[must_use]
    pub const fn format(&self) -> Format {
        match self {
            Self::Markdown(_) => Format::Markdown,
            Self::Html(_) => Format::Html,
        }
    }

    /// The headings of the document, in order.
    #[must_use]
    pub fn headings(&self) -> &[Heading] {
        match self {
            Self::Markdown(document) => document.headings(),
            Self::Html(document) => document.headings(),
        }
    }

    /// The one-based line number of the heading at `index`.
    #[must_use]
    pub fn line_of(&self, index: usize) -> Option<usize> {
        match self {
            Self::Markdown(document) => document.line_of(index),
            Self::Html(document) => document.line_of(index),
        }
    }

    /// Writes the document, including any assigned identifiers, to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written to.
    pub fn save_to_path(&self, path: &Path) -> io::Result<()> {
        match self {
            Self::Markdown(document) => document.save_to_path(path),
            Self::Html(document) => document.save_to_path(path),
        }
    }
}

impl HeadingSource for Document {
    fn headings_mut(&mut self) -> &mut [Heading] {
        match self {
            Self::Markdown(document) => document.headings_mut(),
            Self::Html(document) => document.headings_mut(),
        }
    }
}

/// Collects every supported document below `root`, in a stable order.
///
/// If `root` is not a directory it is returned as is, whatever its extension,
/// so that loading it reports the problem. Hidden directories (such as `.git`)
/// are skipped.
#[must_use]
pub fn collect_document_paths(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        return vec![root.to_path_buf()];
    }

    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| Format::from_path(entry.path()).is_some())
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_str().is_some_and(|name| name.starts_with('.'))
}
