//! Command-line interface.

mod commands;

use std::path::Path;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::Overrides;

pub use commands::{cmd_page, cmd_select, run};

#[derive(Debug, Parser)]
#[command(name = "artcat", version, about = "Browse and bulk-select artworks from a paginated catalog")]
pub struct Cli {
    /// Catalog endpoint (overrides the config file)
    #[arg(long, global = true, env = "ARTCAT_BASE_FETCH_URL")]
    pub base_url: Option<String>,

    /// User agent (defaults to artcat/<version>)
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// Request timeout in seconds (no timeout by default)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive browser (default)
    Browse,

    /// Print one page of the catalog
    Page {
        /// 1-based page number
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },

    /// Select the first N records across pages and print their titles
    Select {
        /// Number of records; must be a positive integer
        #[arg(allow_hyphen_values = true)]
        count: String,
    },
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            user_agent: self.user_agent.clone(),
            request_timeout: self.timeout,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let default = if self.verbose {
            "artcat=debug"
        } else {
            "artcat=info"
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    }

    /// Log to stderr for one-shot commands.
    pub fn init_logging(&self) {
        tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_writer(std::io::stderr)
            .init();
    }

    /// Log to a file so the browser's screen stays clean.
    pub fn init_file_logging(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init();
        Ok(())
    }
}
