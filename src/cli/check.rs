use std::{
    path::{Path, PathBuf},
    process,
};

use clap::Parser;
use heading_outline::{
    Config, Document, TocError, domain::find_violation, storage::collect_document_paths,
};
use rayon::prelude::*;
use serde::Serialize;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Check the heading hierarchy of documents")]
pub struct Check {
    /// Documents, or directories to search for markdown and HTML documents
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Only report documents with problems
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// The outcome of checking one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Report {
    path: PathBuf,
    #[serde(flatten)]
    status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Status {
    Valid {
        headings: usize,
    },
    Empty,
    Invalid {
        #[serde(skip_serializing_if = "Option::is_none")]
        line: Option<usize>,
        problem: String,
    },
    Unreadable {
        error: String,
    },
}

impl Status {
    const fn is_ok(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

impl Check {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let paths: Vec<PathBuf> = self
            .paths
            .iter()
            .flat_map(|path| collect_document_paths(path))
            .collect();
        tracing::debug!("checking {} documents", paths.len());

        let reports: Vec<Report> = paths
            .into_par_iter()
            .map(|path| {
                let status = check_document(&path, config);
                Report { path, status }
            })
            .collect();

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
            OutputFormat::Table => print_table(&reports, self.quiet),
        }

        if !reports.iter().all(|report| report.status.is_ok()) {
            process::exit(1);
        }

        Ok(())
    }
}

fn check_document(path: &Path, config: &Config) -> Status {
    let document = match Document::open(path, config.max_level) {
        Ok(document) => document,
        Err(e) => {
            tracing::debug!("Failed to load {}: {e:?}", path.display());
            return Status::Unreadable {
                error: e.to_string(),
            };
        }
    };

    let headings = document.headings();
    if headings.is_empty() {
        return Status::Empty;
    }

    match find_violation(headings) {
        None => Status::Valid {
            headings: headings.len(),
        },
        Some(violation) => Status::Invalid {
            line: document.line_of(violation.index),
            problem: format!("{}: {violation}", TocError::InvalidHierarchy),
        },
    }
}

fn print_table(reports: &[Report], quiet: bool) {
    for report in reports {
        let path = report.path.display().to_string();
        match &report.status {
            Status::Valid { headings } => {
                if !quiet {
                    let count = format!("({headings} headings)");
                    println!("{} {path} {}", "ok".success(), count.dim());
                }
            }
            Status::Empty => {
                println!("{} {path}: {}", "empty".warning(), TocError::EmptyContainer);
            }
            Status::Invalid { line, problem } => {
                let location = line.map_or_else(|| path.clone(), |line| format!("{path}:{line}"));
                println!("{} {location}: {problem}", "invalid".warning());
            }
            Status::Unreadable { error } => {
                println!("{} {path}: {error}", "error".warning());
            }
        }
    }

    if !quiet {
        let valid = reports.iter().filter(|report| report.status.is_ok()).count();
        println!();
        println!("{valid}/{} documents valid", reports.len());
    }
}
