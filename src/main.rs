use anyhow::Result;
use clap::Parser;

use snusbase::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    snusbase::output::set_quiet(cli.global.quiet);

    snusbase::cli::run(cli)
}
