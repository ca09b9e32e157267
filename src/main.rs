use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use oled_stats::cli::{Cli, Commands, ConfigCommands, VERSION_WITH_BUILD};
use oled_stats::core::{
    blank_and_power_off, install_signal_handler, MetricsSampler, ShutdownToken, Ssd1306Transport,
    SysinfoSource,
};
use oled_stats::screens::dashboard;
use oled_stats::utils::{AppConfig, Aligner};
use oled_stats::{AgentContext, App};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => AppConfig::config_path()?,
    };

    let mut config = AppConfig::load_from(&config_path)?;
    cli.overrides.apply(&mut config);

    match cli.command {
        None | Some(Commands::Run) => {
            handle_run(config)?;
        }
        Some(Commands::Print { ruler, json }) => {
            handle_print(config, ruler, json)?;
        }
        Some(Commands::Clear) => {
            handle_clear(config)?;
        }
        Some(Commands::Config { command }) => {
            handle_config(command, config, &config_path)?;
        }
    }

    Ok(())
}

/// Log to stderr; RUST_LOG wins over --verbose
fn init_logging(verbose: bool) {
    let default = if verbose { "oled_stats=debug" } else { "oled_stats=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_run(config: AppConfig) -> Result<()> {
    config.validate().context("Invalid configuration")?;
    tracing::info!("oled-stats {}", VERSION_WITH_BUILD);

    let shutdown = ShutdownToken::new();
    install_signal_handler(&shutdown)?;

    App::new(AgentContext::new(config, shutdown)).run()
}

fn handle_print(config: AppConfig, ruler: bool, json: bool) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    let sampler = MetricsSampler::new(
        SysinfoSource::new(&config.thermal_zone),
        config.update_interval(),
        config.network_interface.clone(),
    );

    if json {
        let output = serde_json::to_string_pretty(sampler.stats())
            .context("Failed to serialize stats")?;
        println!("{}", output);
        return Ok(());
    }

    let aligner = Aligner::new(config.display_length);
    for line in dashboard::console_lines(sampler.stats(), &aligner, ruler) {
        println!("{}", line);
    }

    Ok(())
}

/// Only the bus settings matter here; text and sampling settings are not checked
fn handle_clear(config: AppConfig) -> Result<()> {
    let mut transport = Ssd1306Transport::init(
        Path::new(&config.i2c_bus),
        config.oled_width,
        config.oled_height,
        config.i2c_address,
    )
    .context("Failed to initialize OLED")?;

    blank_and_power_off(&mut transport, config.oled_width, config.oled_height)
        .context("Failed to clear OLED")?;

    println!("Display cleared");
    Ok(())
}

fn handle_config(command: ConfigCommands, config: AppConfig, path: &Path) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            print!("{}", config.to_toml()?);
            if let Err(e) = config.validate() {
                eprintln!("\nWarning: {:#}", e);
            }
        }
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "Config file already exists at {} (use --force to overwrite)",
                    path.display()
                );
            }
            AppConfig::default().save_to(path)?;
            println!("✓ Wrote default configuration to {}", path.display());
        }
        ConfigCommands::Path => {
            println!("{}", path.display());
        }
    }

    Ok(())
}
