use std::path::{Path, PathBuf};

mod check;
mod config;
mod generate;
mod terminal;

use anyhow::Context;
use check::Check;
use clap::ArgAction;
use generate::Generate;
use heading_outline::Config;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the configuration file
    #[arg(short, long, default_value = "toc.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command.run(&self.config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Print the table of contents of a document
    Generate(Generate),

    /// Check that documents have a well-formed heading hierarchy
    ///
    /// A hierarchy is well formed when no heading descends more than one
    /// level below the previous heading, and no heading is shallower than
    /// the first one.
    Check(Check),

    /// Show or create the configuration file
    Config(config::Command),
}

impl Command {
    fn run(self, config_path: &Path) -> anyhow::Result<()> {
        match self {
            Self::Generate(command) => command.run(&load_config(config_path)?)?,
            Self::Check(command) => command.run(&load_config(config_path)?)?,
            Self::Config(command) => command.run(config_path)?,
        }
        Ok(())
    }
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    Config::load_or_default(path)
        .with_context(|| format!("invalid configuration in {}", path.display()))
}
