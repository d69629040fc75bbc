//! CLI entry point for wave function collapse generation

use clap::Parser;
use tilewave::io::cli::{Cli, FileProcessor};

fn main() -> tilewave::Result<()> {
    let cli = Cli::parse();
    cli.init_logger()?;
    let mut processor = FileProcessor::new(cli);
    processor.process()
}
