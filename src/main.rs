mod app;
mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    env_logger::init();

    let cli = cli::Cli::parse();
    app::run(cli).inspect_err(|e| log::error!("{e:#}"))
}
