use std::{io, path::Path};

use serde::{Deserialize, Serialize};

use crate::domain::Level;

/// Configuration for outline generation.
///
/// This struct controls how missing identifiers and labels are generated, and
/// which headings are collected from documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Prefix of generated identifiers.
    ///
    /// A heading at position `n` without an identifier is given
    /// `{id_prefix}{n}`, e.g. `toc-3`.
    id_prefix: String,

    /// Word used to label headings that have no text.
    ///
    /// A heading at position `n` with empty text is labelled
    /// `{fallback_label} {n}`, e.g. `Heading 3`.
    fallback_label: String,

    /// The deepest heading level collected from documents.
    ///
    /// Headings below this level are ignored entirely, as if they were body
    /// text.
    pub max_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id_prefix: default_id_prefix(),
            fallback_label: default_fallback_label(),
            max_level: Level::MAX,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        toml::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Loads the configuration at `path`, falling back to the defaults if
    /// there is no file there.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Read(e)) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            result => result,
        }
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(ConfigError::Write)
    }

    /// Serializes the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Returns the prefix of generated identifiers.
    #[must_use]
    pub fn id_prefix(&self) -> &str {
        &self.id_prefix
    }

    /// Sets the prefix of generated identifiers.
    ///
    /// An empty prefix is ignored, since identifiers made only of digits are
    /// awkward anchors.
    pub fn set_id_prefix(&mut self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        if !prefix.is_empty() {
            self.id_prefix = prefix;
        }
    }

    /// Returns the word used to label headings without text.
    #[must_use]
    pub fn fallback_label(&self) -> &str {
        &self.fallback_label
    }

    /// The identifier assigned to the heading at `index`.
    #[must_use]
    pub fn generated_id(&self, index: usize) -> String {
        format!("{}{index}", self.id_prefix)
    }

    /// The label given to the heading at `index` when it has no text.
    #[must_use]
    pub fn generated_label(&self, index: usize) -> String {
        format!("{} {index}", self.fallback_label)
    }
}

fn default_id_prefix() -> String {
    "toc-".to_string()
}

fn default_fallback_label() -> String {
    "Heading".to_string()
}

const fn default_max_level() -> Level {
    Level::MAX
}

/// Errors that can occur when reading or writing the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file: {0}")]
    Read(#[source] io::Error),
    /// The configuration file is not valid.
    #[error("Failed to parse config file: {0}")]
    Parse(#[source] toml::de::Error),
    /// The configuration could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] toml::ser::Error),
    /// The configuration file could not be written.
    #[error("Failed to write config file: {0}")]
    Write(#[source] io::Error),
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_id_prefix")]
        id_prefix: String,

        #[serde(default = "default_fallback_label")]
        fallback_label: String,

        #[serde(default = "default_max_level")]
        max_level: Level,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                id_prefix,
                fallback_label,
                max_level,
            } => {
                let mut config = Self {
                    fallback_label,
                    max_level,
                    ..Self::default()
                };
                config.set_id_prefix(id_prefix);
                config
            }
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            id_prefix: config.id_prefix,
            fallback_label: config.fallback_label,
            max_level: config.max_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nid_prefix = \"section-\"\nfallback_label = \"Untitled\"\n\
              max_level = 3\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.id_prefix(), "section-");
        assert_eq!(config.fallback_label(), "Untitled");
        assert_eq!(config.max_level, Level::new(3).unwrap());
        assert_eq!(config.generated_id(4), "section-4");
        assert_eq!(config.generated_label(4), "Untitled 4");
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(matches!(error, ConfigError::Read(_)));
        assert!(error.to_string().starts_with("Failed to read config file:"));
        assert_eq!(Config::load_or_default(&missing).unwrap(), Config::default());
    }

    #[test]
    fn load_or_default_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nid_prefix = \"sec-\"\nmax_level = 9\n")
            .unwrap();

        let error = Config::load_or_default(file.path()).unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nmax_level = 9\n").unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.to_string().starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
        assert_eq!(actual.generated_id(0), "toc-0");
        assert_eq!(actual.generated_label(0), "Heading 0");
    }

    #[test]
    fn empty_prefix_keeps_default() {
        let config: Config = toml::from_str("_version = \"1\"\nid_prefix = \"\"\n").unwrap();
        assert_eq!(config.id_prefix(), "toc-");
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("toc.toml");

        let mut config = Config::default();
        config.set_id_prefix("h-");
        config.max_level = Level::new(4).unwrap();
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
