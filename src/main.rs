use clap::Parser;
use nestroute::cli::{run_cli, Cli};
use nestroute::logging::{init_logging_with_config, LogConfig};

fn main() -> anyhow::Result<()> {
    init_logging_with_config(&LogConfig::from_env())?;
    run_cli(Cli::parse())
}
