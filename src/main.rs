//! Binary crate for the `weather-silver` command-line tool.
//!
//! Set `RUST_LOG=info` (or `debug`) to see what the pipeline is doing.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cmd = cli::Cli::parse();
    cmd.run()
}
