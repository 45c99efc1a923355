//! NSD CLI - Command line tool for snow drift estimates from hourly weather series.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "nsd-cli",
    version,
    about = "Snow drift transport (Tabler 2003) toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: nsd_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("nsd-cli {}", env!("CARGO_PKG_VERSION"));
    nsd_cmd::run(cli.command)
}
