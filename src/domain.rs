//! Domain models for table of contents generation.
//!
//! This module contains the heading and outline types, the hierarchy
//! validator, and the outline builder.

mod builder;
pub use builder::build_siblings;

mod config;
pub use config::{Config, ConfigError};

mod generator;
pub use generator::{Generator, TocError, generate_toc};

mod heading;
pub use heading::{Heading, HeadingSource};

pub mod hierarchy;
pub use hierarchy::{Violation, ViolationKind, find_violation, is_valid_hierarchy};

mod level;
pub use level::{InvalidLevel, Level};

mod outline;
pub use outline::{Iter, Link, Outline, OutlineNode};
