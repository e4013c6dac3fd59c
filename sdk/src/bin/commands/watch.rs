// Watch pools and positions

use anyhow::Result;
use clap::Args;
use soda_sdk::SodaClient;

use super::positions::print_positions;
use super::utils::{info, parse_addr};

#[derive(Args)]
pub struct WatchCmd {
    /// Also refresh this owner's positions (defaults to the connected account)
    #[arg(long)]
    owner: Option<String>,

    /// Pools only
    #[arg(long)]
    no_positions: bool,
}

pub async fn execute(cmd: WatchCmd, client: &SodaClient) -> Result<()> {
    let mut pools = client.watch_pools();
    let mut positions = if cmd.no_positions {
        None
    } else {
        let owner = match cmd.owner {
            Some(owner) => parse_addr(&owner)?,
            None => client.account().await?,
        };
        Some(client.watch_positions(owner))
    };

    info("Watching; press Ctrl+C to stop");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = pools.changed() => {
                if !changed {
                    break;
                }
                if let Some(list) = pools.latest().as_ref() {
                    info(&format!("{} pool(s)", list.len()));
                    for pool in list {
                        println!(
                            "  #{} {} {} price {} liquidity {}",
                            pool.index, pool.pair_label, pool.fee_label, pool.current_price, pool.liquidity
                        );
                    }
                }
            }
            changed = async {
                match positions.as_mut() {
                    Some(handle) => handle.changed().await,
                    None => std::future::pending().await,
                }
            } => {
                if !changed {
                    break;
                }
                if let Some((list, summary)) = positions.as_ref().and_then(|h| h.latest().clone()) {
                    print_positions(&list, &summary);
                }
            }
        }
    }

    info("Stopped");
    Ok(())
}
