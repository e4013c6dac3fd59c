// Starter configuration

use std::path::Path;

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use soda_sdk::{ContractAddresses, SdkConfig};

use super::utils::{parse_addr, success};

#[derive(Clone, Copy, ValueEnum)]
pub enum Network {
    Sepolia,
    Localnet,
}

#[derive(Args)]
pub struct InitConfigCmd {
    #[arg(long, value_enum, default_value = "sepolia")]
    network: Network,

    #[arg(long)]
    pool_manager: String,

    #[arg(long)]
    position_manager: String,

    #[arg(long)]
    swap_router: String,

    /// Wrapped native token (defaults to Sepolia WETH)
    #[arg(long)]
    wrapped_native: Option<String>,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

pub fn execute(cmd: InitConfigCmd, path: &str) -> Result<()> {
    if Path::new(path).exists() && !cmd.force {
        bail!("{path} already exists (use --force to overwrite)");
    }

    let contracts = ContractAddresses {
        pool_manager: parse_addr(&cmd.pool_manager)?,
        position_manager: parse_addr(&cmd.position_manager)?,
        swap_router: parse_addr(&cmd.swap_router)?,
    };
    let mut config = match cmd.network {
        Network::Sepolia => SdkConfig::sepolia(contracts),
        Network::Localnet => SdkConfig::localnet(contracts),
    };
    if let Some(wrapped_native) = cmd.wrapped_native {
        config = config.with_wrapped_native(parse_addr(&wrapped_native)?);
    }
    config.validate()?;
    config.save(path)?;

    success(&format!("Wrote {path}"));
    Ok(())
}
