//! CLI module
//!
//! Command-line interface for browsing paginated REST APIs.
//!
//! # Commands
//!
//! - `fetch` - GET one resource (with retries)
//! - `iter` - Stream every document of a Tastypie collection
//! - `post` - Create a resource and print its location

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{parse_param, Runner};
