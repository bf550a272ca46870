use non_empty_string::NonEmptyString;

use crate::domain::Level;

/// A single heading, as found in a document.
///
/// Headings are kept in document order. The only field the outline builder
/// ever touches is [`Heading::id`], which it fills in when it is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// The nesting level of the heading.
    pub level: Level,

    /// The anchor identifier of the heading, if it has one.
    pub id: Option<String>,

    /// The text content of the heading.
    pub text: String,
}

impl Heading {
    /// Creates a heading without an identifier.
    pub fn new(level: Level, text: impl Into<String>) -> Self {
        Self {
            level,
            id: None,
            text: text.into(),
        }
    }

    /// Sets the identifier of the heading.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Returns the identifier, treating an empty string the same as a missing
    /// one.
    #[must_use]
    pub fn anchor(&self) -> Option<NonEmptyString> {
        self.id
            .as_ref()
            .and_then(|id| NonEmptyString::new(id.clone()).ok())
    }

    /// Returns the existing identifier, or assigns `fallback` and returns it.
    pub(crate) fn ensure_anchor(
        &mut self,
        fallback: impl FnOnce() -> NonEmptyString,
    ) -> NonEmptyString {
        if let Some(anchor) = self.anchor() {
            return anchor;
        }
        let anchor = fallback();
        self.id = Some(anchor.to_string());
        anchor
    }
}

/// Something headings can be read from, such as a parsed document.
///
/// The headings are exposed mutably because generating an outline may assign
/// identifiers to headings that do not have one. Implementors are expected to
/// keep those identifiers so that the links of the outline resolve.
pub trait HeadingSource {
    /// Returns the headings in document order.
    fn headings_mut(&mut self) -> &mut [Heading];
}

impl HeadingSource for [Heading] {
    fn headings_mut(&mut self) -> &mut [Heading] {
        self
    }
}

impl HeadingSource for Vec<Heading> {
    fn headings_mut(&mut self) -> &mut [Heading] {
        self
    }
}

impl<T: HeadingSource + ?Sized> HeadingSource for &mut T {
    fn headings_mut(&mut self) -> &mut [Heading] {
        (**self).headings_mut()
    }
}
