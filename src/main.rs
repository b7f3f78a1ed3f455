//! CLI entry point for the raster row reordering tool

use clap::Parser;
use leaforder::io::cli::{Cli, FileProcessor};

fn main() -> leaforder::Result<()> {
    let cli = Cli::parse();
    cli.init_logging();
    let mut processor = FileProcessor::new(cli);
    processor.process()
}
