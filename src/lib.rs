//! Tables of contents from document headings.
//!
//! Headings are read from a [`HeadingSource`] (a parsed markdown or HTML
//! document, or just a list of [`Heading`]s), checked to be properly nested,
//! and folded into an [`Outline`] of links.
//!
//! ```
//! use heading_outline::{Level, Heading, generate_toc};
//!
//! let level = |n| Level::new(n).unwrap();
//! let mut headings = vec![
//!     Heading::new(level(1), "Guide"),
//!     Heading::new(level(2), "Install"),
//!     Heading::new(level(2), "Usage"),
//! ];
//!
//! let outline = generate_toc(&mut headings).unwrap();
//! assert_eq!(outline.roots()[0].children.len(), 2);
//! assert_eq!(headings[1].id.as_deref(), Some("toc-1"));
//! ```

pub mod domain;
pub use domain::{
    Config, Generator, Heading, HeadingSource, Level, Link, Outline, OutlineNode, TocError,
    generate_toc, is_valid_hierarchy,
};

/// Reading headings from markdown and HTML files.
pub mod storage;
pub use storage::{Document, HtmlDocument, LoadError, MarkdownDocument};
