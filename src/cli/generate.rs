use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use heading_outline::{Config, Document, Generator, Outline};
use tracing::instrument;

#[derive(Debug, Parser)]
#[command(about = "Print the table of contents of a markdown or HTML document")]
pub struct Generate {
    /// The document to read
    path: PathBuf,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "markdown")]
    format: OutputFormat,

    /// Write generated heading identifiers back into the document
    #[arg(long)]
    write: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// A nested list of markdown links
    #[default]
    Markdown,
    /// Nested `<ul>` lists of links
    Html,
    /// The outline as JSON
    Json,
}

impl Generate {
    #[instrument(level = "debug", skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let mut document = Document::open(&self.path, config.max_level)
            .with_context(|| format!("failed to open {}", self.path.display()))?;

        let outline = Generator::new(config.clone())
            .generate(&mut document)
            .with_context(|| {
                format!("cannot build a table of contents for {}", self.path.display())
            })?;

        println!("{}", render(&outline, self.format)?);

        if self.write {
            document
                .save_to_path(&self.path)
                .with_context(|| format!("failed to write {}", self.path.display()))?;
            tracing::info!("Wrote heading identifiers to {}", self.path.display());
        }

        Ok(())
    }
}

fn render(outline: &Outline, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Markdown => outline.to_markdown().trim_end().to_string(),
        OutputFormat::Html => outline.to_html(),
        OutputFormat::Json => serde_json::to_string_pretty(outline)?,
    })
}
