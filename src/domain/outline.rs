//! The nested table of contents produced from a heading sequence.

use std::fmt::Write as _;

use non_empty_string::NonEmptyString;
use serde::Serialize;

/// A link to a heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// The identifier of the heading the link points at.
    pub target: NonEmptyString,
    /// The text of the link.
    pub label: String,
}

impl Link {
    /// The fragment reference of the link, e.g. `#toc-0`.
    #[must_use]
    pub fn href(&self) -> String {
        format!("#{}", self.target)
    }
}

/// An entry of the table of contents, along with the entries nested below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineNode {
    /// The link to the heading.
    pub link: Link,
    /// Entries for the headings one level deeper, in document order.
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// Creates a node with no children.
    #[must_use]
    pub const fn new(link: Link) -> Self {
        Self {
            link,
            children: Vec::new(),
        }
    }
}

/// A table of contents.
///
/// This is the list of top-level entries; deeper headings hang off their
/// parents as [`OutlineNode::children`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Outline(Vec<OutlineNode>);

impl Outline {
    /// The top-level entries.
    #[must_use]
    pub fn roots(&self) -> &[OutlineNode] {
        &self.0
    }

    /// The total number of entries, at every depth.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether the outline has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over every link in pre-order, which is document order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: vec![self.0.iter()],
        }
    }

    /// Renders the outline as nested HTML lists.
    ///
    /// Each level is a `<ul>`, each entry an `<li>` holding an `<a>` and, if
    /// it has children, the nested `<ul>`. No whitespace is emitted.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        write_html(&mut html, &self.0);
        html
    }

    /// Renders the outline as a nested markdown list of links.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut markdown = String::new();
        write_markdown(&mut markdown, &self.0, 0);
        markdown
    }
}

impl From<Vec<OutlineNode>> for Outline {
    fn from(roots: Vec<OutlineNode>) -> Self {
        Self(roots)
    }
}

impl<'a> IntoIterator for &'a Outline {
    type Item = &'a Link;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Pre-order iterator over the links of an [`Outline`].
#[derive(Debug)]
pub struct Iter<'a> {
    stack: Vec<std::slice::Iter<'a, OutlineNode>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Link;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            if let Some(node) = top.next() {
                self.stack.push(node.children.iter());
                return Some(&node.link);
            }
            self.stack.pop();
        }
    }
}

fn write_html(out: &mut String, nodes: &[OutlineNode]) {
    out.push_str("<ul>");
    for node in nodes {
        let _ = write!(
            out,
            "<li><a href=\"#{}\">{}</a>",
            escape_html(node.link.target.as_str()),
            escape_html(&node.link.label)
        );
        if !node.children.is_empty() {
            write_html(out, &node.children);
        }
        out.push_str("</li>");
    }
    out.push_str("</ul>");
}

fn write_markdown(out: &mut String, nodes: &[OutlineNode], depth: usize) {
    for node in nodes {
        let _ = writeln!(
            out,
            "{:indent$}- [{}]({})",
            "",
            escape_markdown(&node.link.label),
            node.link.href(),
            indent = depth * 2
        );
        write_markdown(out, &node.children, depth + 1);
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn escape_markdown(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}
