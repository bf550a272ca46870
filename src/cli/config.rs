use std::path::Path;

use heading_outline::Config;
use tracing::instrument;

use crate::cli::terminal::Colorize;

#[derive(Debug, clap::Parser)]
/// Show or create the configuration file
///
/// Available configuration keys:
///   `id_prefix`       Prefix of generated heading identifiers (default: toc-)
///   `fallback_label`  Label of headings without text (default: Heading)
///   `max_level`       Deepest heading level collected (default: 6)
pub struct Command {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show the configuration in effect
    Show,

    /// Write a configuration file with the default values
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

impl Command {
    #[instrument]
    pub fn run(self, config_path: &Path) -> anyhow::Result<()> {
        match self.command {
            ConfigCommand::Show => Self::show_config(config_path),
            ConfigCommand::Init { force } => Self::init_config(config_path, force),
        }
    }

    fn show_config(config_path: &Path) -> anyhow::Result<()> {
        let (config, source) = if config_path.exists() {
            (
                Config::load(config_path)?,
                config_path.display().to_string(),
            )
        } else {
            (Config::default(), "defaults".to_string())
        };

        println!("Configuration ({}):", source.dim());
        println!("  id_prefix: {:?}", config.id_prefix());
        println!("  fallback_label: {:?}", config.fallback_label());
        println!("  max_level: {}", config.max_level);
        Ok(())
    }

    fn init_config(config_path: &Path, force: bool) -> anyhow::Result<()> {
        if config_path.exists() && !force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                config_path.display()
            );
        }

        Config::default().save(config_path)?;
        println!("{} {}", "Created".success(), config_path.display());
        Ok(())
    }
}
