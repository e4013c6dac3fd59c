// Pool commands

use alloy_primitives::Address;
use anyhow::Result;
use clap::Args;
use soda_sdk::soda_core::format::FormattedPool;
use soda_sdk::soda_core::validation::CreatePoolForm;
use soda_sdk::soda_core::TokenPair;
use soda_sdk::SodaClient;

use super::utils::{info, parse_addr, print_outcome, report, with_progress};

#[derive(Args)]
pub struct PoolsCmd {
    /// Only pools of this pair (token0 address)
    #[arg(long, requires = "token1")]
    token0: Option<String>,

    /// Only pools of this pair (token1 address)
    #[arg(long, requires = "token0")]
    token1: Option<String>,
}

#[derive(Args)]
pub struct CreatePoolCmd {
    /// Lower-sorting token address
    #[arg(long)]
    token0: String,

    /// Higher-sorting token address
    #[arg(long)]
    token1: String,

    /// Fee tier: 500, 3000 or 10000
    #[arg(long, default_value = "3000")]
    fee: String,

    #[arg(long, allow_hyphen_values = true)]
    tick_lower: String,

    #[arg(long, allow_hyphen_values = true)]
    tick_upper: String,

    /// Tick the initial price is derived from
    #[arg(long, allow_hyphen_values = true, default_value = "0")]
    init_tick: String,
}

fn print_pools(pools: &[FormattedPool]) {
    println!(
        "{:<6} {:<16} {:<7} {:>10} {:>18} {:<28} {:>12}",
        "INDEX", "PAIR", "FEE", "TICK", "PRICE", "RANGE", "LIQUIDITY"
    );
    for pool in pools {
        println!(
            "{:<6} {:<16} {:<7} {:>10} {:>18} {:<28} {:>12}",
            pool.index,
            pool.pair_label,
            pool.fee_label,
            pool.tick,
            pool.current_price,
            pool.price_range,
            pool.liquidity
        );
    }
}

pub async fn list(cmd: PoolsCmd, client: &SodaClient) -> Result<()> {
    let pools = match (cmd.token0, cmd.token1) {
        (Some(token0), Some(token1)) => {
            let pair = TokenPair::new(parse_addr(&token0)?, parse_addr(&token1)?)?;
            client.pools.pool_options(&pair).await?
        }
        _ => client.pools.formatted_pools().await?,
    };
    if pools.is_empty() {
        info("No pools found");
        return Ok(());
    }
    print_pools(&pools);
    Ok(())
}

pub async fn pairs(client: &SodaClient) -> Result<()> {
    let pairs = client.pools.get_pairs().await?;
    let tokens: Vec<_> = pairs.iter().flat_map(|p| [p.token0, p.token1]).collect();
    let metas = client.tokens.metadata_batch(&tokens).await;
    for pair in pairs {
        let symbol = |token: Address| {
            metas
                .get(&token)
                .map(|m| m.display_name())
                .unwrap_or_else(|| token.to_string())
        };
        println!("{}/{}  {}", symbol(pair.token0), symbol(pair.token1), pair.id());
    }
    Ok(())
}

pub async fn tokens(client: &SodaClient) -> Result<()> {
    let tokens = client.pools.tradable_tokens().await?;
    if tokens.is_empty() {
        info("No tradable tokens");
        return Ok(());
    }
    for token in tokens {
        println!("{:<10} {:>3}  {}", token.symbol, token.decimals, token.address);
    }
    Ok(())
}

pub async fn create(cmd: CreatePoolCmd, client: SodaClient) -> Result<()> {
    let form = CreatePoolForm {
        token0: cmd.token0,
        token1: cmd.token1,
        fee: cmd.fee,
        tick_lower: cmd.tick_lower,
        tick_upper: cmd.tick_upper,
        init_tick: cmd.init_tick,
    };
    info("Creating pool...");
    let client = with_progress(client);
    let outcome = client.create_pool(&form).await.map_err(report)?;
    print_outcome(&client, &outcome);
    Ok(())
}
