//! Config command
//!
//! Usage: resident config show

use std::path::Path;

use anyhow::Context;
use clap::{Args, Subcommand};
use resident_proxy::ProxyConfig;

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,
    /// Check the configuration and error catalog without contacting any service
    Check,
}

pub fn execute(config_path: Option<&Path>, args: ConfigArgs) -> anyhow::Result<bool> {
    let config = ProxyConfig::load(config_path).context("loading configuration")?;

    match args.command {
        ConfigCommand::Show => {
            print!("{}", config.to_toml()?);
        }
        ConfigCommand::Check => {
            let catalog = config.build_catalog().context("building error catalog")?;
            println!("✓ configuration valid ({} catalog entries)", catalog.entries().count());
        }
    }
    Ok(true)
}
