use anyhow::{Context, Result};
use clap::Parser;

use timely_cli::{Cli, Config, logging, platform_probe, spawn_probe, tui};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_from(cli.config.as_deref())
        .context("failed to load configuration")?
        .with_cli_overrides(&cli);

    logging::init(&config.log_file, cli.verbose).context("failed to initialize logging")?;
    tracing::debug!(?config, "loaded configuration");

    let target = timely_core::parse_target(&config.target)
        .with_context(|| format!("unknown target time {:?}", config.target))?;

    let startup_rx = config.boot_probe.then(|| spawn_probe(platform_probe()));

    tui::run(target, startup_rx).context("terminal session failed")?;

    println!("Enjoy your day !");
    Ok(())
}
