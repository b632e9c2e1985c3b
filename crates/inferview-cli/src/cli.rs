//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inferview: upload CSV files for type inference and view the results
#[derive(Parser)]
#[command(name = "inferview")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Base URL of the inference service (overrides INFERVIEW_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds (overrides INFERVIEW_TIMEOUT_SECS)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload a CSV file for analysis
    Upload {
        /// Path to the CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Show the analysis once the upload succeeds
        #[arg(long)]
        show: bool,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Show the analysis stored under an id
    Show {
        /// Analysis id returned by `upload`
        #[arg(value_name = "ID")]
        id: String,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Render a saved analysis response without contacting the service
    Render {
        /// Path to a JSON analysis or upload response
        #[arg(value_name = "JSON_FILE")]
        file: PathBuf,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Classify dtype tags
    Classify {
        /// Dtype tags as reported by the service (e.g. "int64", "datetime64[ns]")
        #[arg(value_name = "TAG", required = true)]
        tags: Vec<String>,
    },
}

/// Options shared by the commands that render a result.
#[derive(clap::Args, Clone, Debug)]
pub struct DisplayArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    /// Number of rows to show
    #[arg(short, long, default_value_t = inferview::DEFAULT_PREVIEW_ROWS)]
    pub rows: usize,

    /// Show every row
    #[arg(long, conflicts_with = "rows")]
    pub all: bool,
}

impl DisplayArgs {
    /// Row limit, or `None` for every row.
    pub fn row_limit(&self) -> Option<usize> {
        if self.all { None } else { Some(self.rows) }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use table, csv, or json.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
