//! Direct-pair router
//!
//! Swaps route through the pools of one pair. A route is the list of
//! available pools joining the two tokens, deepest first.

use alloy_primitives::Address;
use soda_core::{address_key, RawPool};

use crate::error::{SdkError, SdkResult};

/// Pools a swap between two tokens goes through
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub token_in: Address,
    pub token_out: Address,
    pub pools: Vec<RawPool>,
}

impl Route {
    /// `indexPath` argument for the swap router
    pub fn index_path(&self) -> Vec<u32> {
        self.pools.iter().map(|pool| pool.index).collect()
    }

    /// Total liquidity across the route's pools
    pub fn liquidity(&self) -> u128 {
        self.pools
            .iter()
            .fold(0u128, |acc, pool| acc.saturating_add(pool.liquidity))
    }

    /// Human-readable route summary
    pub fn summary(&self) -> String {
        let indices: Vec<String> = self.index_path().iter().map(u32::to_string).collect();
        format!(
            "{} -> {} via pool(s) [{}]",
            self.token_in,
            self.token_out,
            indices.join(", ")
        )
    }
}

/// Pools that can route swaps: initialized and holding liquidity
pub fn available_pools(pools: &[RawPool]) -> Vec<RawPool> {
    pools.iter().filter(|pool| pool.is_available()).cloned().collect()
}

/// Available pools joining `token_in` and `token_out` in either
/// orientation, sorted by liquidity, highest first.
pub fn find_route(pools: &[RawPool], token_in: Address, token_out: Address) -> SdkResult<Route> {
    if token_in == token_out {
        return Err(SdkError::NoRoute(token_in.to_string(), token_out.to_string()));
    }

    let key_in = address_key(&token_in);
    let key_out = address_key(&token_out);
    let mut matching: Vec<RawPool> = pools
        .iter()
        .filter(|pool| pool.is_available())
        .filter(|pool| {
            let key0 = address_key(&pool.token0);
            let key1 = address_key(&pool.token1);
            (key0 == key_in && key1 == key_out) || (key0 == key_out && key1 == key_in)
        })
        .cloned()
        .collect();

    if matching.is_empty() {
        return Err(SdkError::NoRoute(token_in.to_string(), token_out.to_string()));
    }
    matching.sort_by(|a, b| b.liquidity.cmp(&a.liquidity));

    Ok(Route {
        token_in,
        token_out,
        pools: matching,
    })
}
