// Position commands

use anyhow::Result;
use clap::Args;
use soda_sdk::soda_core::format::{FormattedPosition, PositionSummary};
use soda_sdk::soda_core::validation::CreatePositionForm;
use soda_sdk::SodaClient;

use super::utils::{info, parse_addr, parse_id, print_outcome, report, with_progress};

#[derive(Args)]
pub struct PositionsCmd {
    /// Owner to list (defaults to the connected account)
    #[arg(long)]
    owner: Option<String>,
}

#[derive(Args)]
pub struct MintCmd {
    #[arg(long)]
    token0: String,

    #[arg(long)]
    token1: String,

    /// Pool index within the pair
    #[arg(long)]
    index: String,

    /// Amount of token0 (decimal)
    #[arg(long, default_value = "")]
    amount0: String,

    /// Amount of token1 (decimal)
    #[arg(long, default_value = "")]
    amount1: String,
}

#[derive(Args)]
pub struct PositionIdCmd {
    /// Position id
    id: String,
}

pub fn print_positions(positions: &[FormattedPosition], summary: &PositionSummary) {
    println!(
        "{:<8} {:<16} {:<6} {:<6} {:>14} {:<26} {:<13} {:>12} {:>12}",
        "ID", "PAIR", "INDEX", "FEE", "LIQUIDITY", "PRICE RANGE", "STATUS", "OWED0", "OWED1"
    );
    for position in positions {
        println!(
            "{:<8} {:<16} {:<6} {:<6} {:>14} {:<26} {:<13} {:>12} {:>12}",
            position.id.to_string(),
            position.pair_label,
            position.index,
            position.fee_label,
            position.liquidity,
            position.price_range,
            position.status.label(),
            position.tokens_owed0,
            position.tokens_owed1
        );
    }
    println!(
        "{} position(s), {} in range, {} with tokens to collect",
        summary.total, summary.in_range, summary.with_fees
    );
}

pub async fn list(cmd: PositionsCmd, client: &SodaClient) -> Result<()> {
    let owner = match cmd.owner {
        Some(owner) => parse_addr(&owner)?,
        None => client.account().await?,
    };
    let positions = client.positions.positions_of(owner).await?;
    if positions.is_empty() {
        info(&format!("No open positions for {owner}"));
        return Ok(());
    }
    let summary = soda_sdk::soda_core::format::summarize(&positions);
    print_positions(&positions, &summary);
    Ok(())
}

pub async fn mint(cmd: MintCmd, client: SodaClient) -> Result<()> {
    let form = CreatePositionForm {
        token0: cmd.token0,
        token1: cmd.token1,
        index: cmd.index,
        amount0: cmd.amount0,
        amount1: cmd.amount1,
    };
    info("Adding liquidity...");
    let client = with_progress(client);
    let outcome = client.mint(&form).await.map_err(report)?;
    print_outcome(&client, &outcome);
    Ok(())
}

pub async fn collect(cmd: PositionIdCmd, client: SodaClient) -> Result<()> {
    let id = parse_id(&cmd.id)?;
    info(&format!("Collecting position {id}..."));
    let client = with_progress(client);
    let outcome = client.collect(id).await.map_err(report)?;
    print_outcome(&client, &outcome);
    Ok(())
}

pub async fn burn(cmd: PositionIdCmd, client: SodaClient) -> Result<()> {
    let id = parse_id(&cmd.id)?;
    info(&format!("Burning position {id}..."));
    let client = with_progress(client);
    let outcome = client.burn(id).await.map_err(report)?;
    print_outcome(&client, &outcome);
    Ok(())
}
