use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "symdex")]
#[command(author, version, about = "Export-symbol index for auto-import suggestions")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default .symdex/config.toml in the current directory
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Scan the project once and report the symbol count
    Scan {
        /// Show the completion notification when the scan finishes
        #[arg(short, long)]
        notify: bool,
    },

    /// Scan, then keep the index current as files change
    Watch {
        /// Debounce delay in milliseconds (defaults to the configured value)
        #[arg(short, long)]
        debounce_ms: Option<u64>,
    },

    /// Look up symbols by name
    Find {
        /// Symbol name
        query: String,

        /// Case-insensitive prefix match instead of an exact name
        #[arg(short, long)]
        prefix: bool,

        /// Maximum number of results to print
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show index statistics and metrics
    Stats {
        /// Output in Prometheus format
        #[arg(long)]
        prometheus: bool,
    },
}
