use anyhow::Result;
use clap::Parser;

use artcat::cli::{self, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    cli::run(args).await
}
