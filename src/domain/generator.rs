use tracing::instrument;

use crate::domain::{Config, HeadingSource, Outline, builder::build_siblings, hierarchy};

/// Reasons a table of contents could not be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TocError {
    /// The source contains no headings.
    #[error("Empty container")]
    EmptyContainer,
    /// The headings skip a level, or rise above the first heading's level.
    #[error("Invalid heading hierarchy")]
    InvalidHierarchy,
}

/// Generates tables of contents using a given [`Config`].
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: Config,
}

impl Generator {
    /// Creates a generator with the given configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Generates the table of contents of `source`.
    ///
    /// Headings of `source` without an identifier are assigned one, so that
    /// every link in the outline resolves. On failure a warning is logged and
    /// the headings are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TocError::EmptyContainer`] if `source` has no headings, and
    /// [`TocError::InvalidHierarchy`] if they are not properly nested.
    #[instrument(level = "debug", skip_all)]
    pub fn generate<S>(&self, mut source: S) -> Result<Outline, TocError>
    where
        S: HeadingSource,
    {
        let headings = source.headings_mut();

        if headings.is_empty() {
            let error = TocError::EmptyContainer;
            tracing::warn!("{error}");
            return Err(error);
        }

        if !hierarchy::is_valid_hierarchy(headings) {
            let error = TocError::InvalidHierarchy;
            tracing::warn!("{error}");
            return Err(error);
        }

        let (roots, _) = build_siblings(headings, 0, &self.config);
        Ok(Outline::from(roots))
    }
}

/// Generates the table of contents of `source` with the default
/// configuration.
///
/// See [`Generator::generate`].
///
/// # Errors
///
/// Returns an error if `source` has no headings or an invalid hierarchy.
pub fn generate_toc<S: HeadingSource>(source: S) -> Result<Outline, TocError> {
    Generator::default().generate(source)
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use super::*;
    use crate::domain::{Heading, Level};

    /// Collects everything a subscriber writes.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes)
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Runs `f` with a subscriber that records events of every level.
    fn with_logs<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);
        (result, captured.lines())
    }

    fn headings(spec: &[(u8, &str)]) -> Vec<Heading> {
        spec.iter()
            .map(|&(level, text)| Heading::new(Level::new(level).unwrap(), text))
            .collect()
    }

    #[test]
    fn empty_container() {
        let mut headings: Vec<Heading> = Vec::new();
        let (result, logs) = with_logs(|| generate_toc(&mut headings));

        assert_eq!(result, Err(TocError::EmptyContainer));
        assert_eq!(logs.len(), 1);
        assert!(logs[0].ends_with("Empty container"), "{logs:?}");
    }

    #[test]
    fn invalid_hierarchy() {
        let mut headings = headings(&[(2, "1"), (3, "1-1"), (1, "2")]);
        let (result, logs) = with_logs(|| generate_toc(&mut headings));

        assert_eq!(result, Err(TocError::InvalidHierarchy));
        assert_eq!(logs.len(), 1);
        assert!(logs[0].ends_with("Invalid heading hierarchy"), "{logs:?}");
        assert!(headings.iter().all(|heading| heading.id.is_none()));
    }

    #[test]
    fn skipped_level_is_invalid() {
        let mut headings = headings(&[(1, "Title"), (3, "Invalid Subtitle")]);
        let (result, logs) = with_logs(|| generate_toc(&mut headings));

        assert_eq!(result, Err(TocError::InvalidHierarchy));
        assert_eq!(logs.len(), 1);
    }

    #[test]
    fn nested_outline() {
        let mut headings = headings(&[(1, "1"), (2, "1-1"), (3, "1-1-1"), (2, "1-2"), (1, "2")]);
        let (result, logs) = with_logs(|| generate_toc(&mut headings));

        let outline = result.unwrap();
        assert!(logs.is_empty());
        assert_eq!(outline.len(), 5);
        assert_eq!(
            outline.to_html(),
            "<ul><li><a href=\"#toc-0\">1</a><ul><li><a href=\"#toc-1\">1-1</a><ul><li><a \
             href=\"#toc-2\">1-1-1</a></li></ul></li><li><a \
             href=\"#toc-3\">1-2</a></li></ul></li><li><a href=\"#toc-4\">2</a></li></ul>"
        );
    }

    #[test]
    fn nested_outline_rooted_at_h2() {
        let mut headings = headings(&[(2, "1"), (3, "1-1"), (2, "2"), (2, "3"), (3, "3-1")]);
        let outline = generate_toc(&mut headings).unwrap();

        assert_eq!(
            outline.to_html(),
            "<ul><li><a href=\"#toc-0\">1</a><ul><li><a \
             href=\"#toc-1\">1-1</a></li></ul></li><li><a href=\"#toc-2\">2</a></li><li><a \
             href=\"#toc-3\">3</a><ul><li><a href=\"#toc-4\">3-1</a></li></ul></li></ul>"
        );
    }

    #[test]
    fn assigns_missing_ids() {
        let mut headings = headings(&[(1, "Title"), (2, "Subtitle 1")]);
        generate_toc(&mut headings).unwrap();

        assert_eq!(headings[0].id.as_deref(), Some("toc-0"));
        assert_eq!(headings[1].id.as_deref(), Some("toc-1"));
    }

    #[test]
    fn uses_generator_config() {
        let mut config = Config::default();
        config.set_id_prefix("sec-");
        let generator = Generator::new(config);

        let outline = generator.generate(headings(&[(1, "a"), (2, "b")])).unwrap();

        let targets: Vec<_> = outline.iter().map(|link| link.target.to_string()).collect();
        assert_eq!(targets, ["sec-0", "sec-1"]);
        assert_eq!(generator.config().id_prefix(), "sec-");
    }
}
