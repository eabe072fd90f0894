//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Foundations for clients of paginated REST APIs
#[derive(Parser, Debug)]
#[command(name = "forest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Full path to the API, e.g. http://manager.scielo.org/api/v1/
    #[arg(short, long, global = true)]
    pub api_uri: Option<String>,

    /// Connector settings file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Username for Tastypie API key auth
    #[arg(short, long, global = true, requires = "api_key")]
    pub username: Option<String>,

    /// API key for Tastypie API key auth
    #[arg(short = 'k', long, global = true, requires = "username")]
    pub api_key: Option<String>,

    /// Verify TLS certificates on https URLs
    #[arg(long, global = true)]
    pub verify_tls: bool,

    /// Retries on connection errors and 503 responses
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Seconds of backoff per retry already made
    #[arg(long, global = true)]
    pub retry_factor: Option<f64>,

    /// Documents requested per page
    #[arg(long, global = true)]
    pub items_per_request: Option<u32>,

    /// User agent override
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// GET one resource
    Fetch {
        /// Resource path below the API root, e.g. journals/70
        resource: String,

        /// Query parameter (key=value, repeatable)
        #[arg(short, long = "param")]
        params: Vec<String>,
    },

    /// Stream every document of a collection
    Iter {
        /// Collection path below the API root, e.g. journals
        resource: String,

        /// Query parameter (key=value, repeatable)
        #[arg(short, long = "param")]
        params: Vec<String>,

        /// Stop after this many documents
        #[arg(long)]
        max_docs: Option<usize>,
    },

    /// Create a resource
    Post {
        /// Collection path below the API root
        resource: String,

        /// JSON document to send
        data: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}
