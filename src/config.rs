//! Command-line and environment configuration

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::limits::Limits;
use crate::loaders::FetchConfig;

/// Top-level command line
#[derive(Parser, Debug)]
#[command(name = "xsd-docs")]
#[command(author, version, about = "Extract documentation from XML Schema documents", long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP conversion service
    Serve(ServeArgs),

    /// Extract documentation from a schema file or URL and print it as JSON
    Extract(ExtractArgs),
}

/// Options for the `serve` subcommand
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "XSD_DOCS_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    #[command(flatten)]
    pub fetch: FetchArgs,
}

impl ServeArgs {
    /// Address to bind, as `host:port`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Options for the `extract` subcommand
#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Schema file path or http(s) URL
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Pretty print the output
    #[arg(long)]
    pub pretty: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub fetch: FetchArgs,
}

/// Options shared by every subcommand that loads schemas
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Timeout in seconds for fetching a schema
    #[arg(long, env = "XSD_DOCS_FETCH_TIMEOUT", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Maximum schema size in bytes
    #[arg(long, env = "XSD_DOCS_MAX_SCHEMA_SIZE", default_value_t = Limits::default().max_xml_size)]
    pub max_schema_size: usize,
}

impl FetchArgs {
    /// Loader settings from these options
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig::default()
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_limits(Limits::default().with_max_xml_size(self.max_schema_size))
    }
}
