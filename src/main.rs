//! CLI entry point for wavefunction collapse tile-grid generation

use clap::Parser;
use wavetile::io::cli::{Cli, Runner};
use wavetile::io::logging::init_tracing;

fn main() -> wavetile::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity, cli.quiet);
    let mut runner = Runner::new(cli);
    runner.run()
}
