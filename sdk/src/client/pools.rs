use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use soda_core::format::{format_pool_list, pool_options, FormattedPool};
use soda_core::{CreatePoolParams, RawPool, TokenMeta, TokenPair, TxKind};
use tracing::{debug, info};

use super::tokens::TokenService;
use crate::chain::{read, ChainClient, TransactionRequest};
use crate::contracts::{i32_to_i24, u256_to_u160, u32_to_u24, IPoolManager};
use crate::error::SdkResult;
use crate::router::{available_pools, find_route, Route};

/// Service for pool reads and pool creation
pub struct PoolService {
    chain: Arc<dyn ChainClient>,
    tokens: Arc<TokenService>,
    pool_manager: Address,
}

impl PoolService {
    pub fn new(chain: Arc<dyn ChainClient>, tokens: Arc<TokenService>, pool_manager: Address) -> Self {
        Self {
            chain,
            tokens,
            pool_manager,
        }
    }

    /// Every pool the manager knows about, raw
    pub async fn get_all_pools(&self) -> SdkResult<Vec<RawPool>> {
        let ret = read(self.chain.as_ref(), self.pool_manager, &IPoolManager::getAllPoolsCall {}).await?;
        let pools: Vec<RawPool> = ret.poolsInfo.iter().map(RawPool::from).collect();
        debug!("Fetched {} pools", pools.len());
        Ok(pools)
    }

    /// Distinct token pairs with at least one pool
    pub async fn get_pairs(&self) -> SdkResult<Vec<TokenPair>> {
        let ret = read(self.chain.as_ref(), self.pool_manager, &IPoolManager::getPairsCall {}).await?;
        Ok(ret.pairs.iter().map(TokenPair::from).collect())
    }

    /// Metadata for every token in `pools`
    pub async fn pool_tokens(&self, pools: &[RawPool]) -> HashMap<Address, TokenMeta> {
        let tokens: Vec<Address> = pools
            .iter()
            .flat_map(|pool| [pool.token0, pool.token1])
            .collect();
        self.tokens.metadata_batch(&tokens).await
    }

    /// Display rows for the pool list. Pools with an unsupported fee or
    /// unreadable token metadata are left out.
    pub async fn formatted_pools(&self) -> SdkResult<Vec<FormattedPool>> {
        let pools = self.get_all_pools().await?;
        let tokens = self.pool_tokens(&pools).await;
        Ok(format_pool_list(&pools, &tokens))
    }

    /// Pools of one pair, for the position form's pool picker
    pub async fn pool_options(&self, pair: &TokenPair) -> SdkResult<Vec<FormattedPool>> {
        let formatted = self.formatted_pools().await?;
        Ok(pool_options(&formatted, &pair.token0, &pair.token1))
    }

    /// Pools that can route swaps
    pub async fn available_pools(&self) -> SdkResult<Vec<RawPool>> {
        Ok(available_pools(&self.get_all_pools().await?))
    }

    /// Tokens that appear in at least one available pool
    pub async fn tradable_tokens(&self) -> SdkResult<Vec<TokenMeta>> {
        let pools = self.available_pools().await?;
        let metas = self.pool_tokens(&pools).await;
        let mut tokens: Vec<TokenMeta> = metas.into_values().collect();
        tokens.sort_by(|a, b| a.symbol.cmp(&b.symbol).then(a.address.cmp(&b.address)));
        Ok(tokens)
    }

    pub async fn find_route(&self, token_in: Address, token_out: Address) -> SdkResult<Route> {
        let pools = self.get_all_pools().await?;
        find_route(
            &pools,
            self.tokens.resolve(token_in),
            self.tokens.resolve(token_out),
        )
    }

    /// Current tick of each pool, keyed by `(token0, token1, index)`
    pub async fn pool_ticks(&self) -> SdkResult<HashMap<(Address, Address, u32), i32>> {
        Ok(self
            .get_all_pools()
            .await?
            .into_iter()
            .map(|pool| ((pool.token0, pool.token1, pool.index), pool.tick))
            .collect())
    }

    /// `createAndInitializePoolIfNecessary` transaction for validated params
    pub fn create_pool_request(&self, params: &CreatePoolParams) -> SdkResult<TransactionRequest> {
        info!(
            "Creating pool {} fee {} ticks [{}, {}]",
            params.pair.id(),
            params.fee.fee(),
            params.tick_lower,
            params.tick_upper
        );
        let call = IPoolManager::createAndInitializePoolIfNecessaryCall {
            params: IPoolManager::CreateAndInitializeParams {
                token0: params.pair.token0,
                token1: params.pair.token1,
                fee: u32_to_u24(params.fee.fee())?,
                tickLower: i32_to_i24(params.tick_lower)?,
                tickUpper: i32_to_i24(params.tick_upper)?,
                sqrtPriceX96: u256_to_u160(params.sqrt_price_x96)?,
            },
        };
        Ok(TransactionRequest::of(TxKind::CreatePool, self.pool_manager, &call).with_value(U256::ZERO))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::IERC20;
    use crate::testing::MockChain;
    use alloy_primitives::address;
    use alloy_sol_types::SolCall;
    use soda_core::{FeeTier, SEPOLIA_WETH};

    const MANAGER: Address = address!("00000000000000000000000000000000000000a1");
    const A: Address = address!("1000000000000000000000000000000000000001");
    const B: Address = address!("2000000000000000000000000000000000000002");

    fn raw(index: u32, fee: u32, liquidity: u128) -> RawPool {
        RawPool {
            pool: Address::with_last_byte(0x40 + index as u8),
            token0: A,
            token1: B,
            index,
            fee,
            fee_protocol: 0,
            tick_lower: -600,
            tick_upper: 600,
            tick: 0,
            sqrt_price_x96: U256::from(1u8) << 96,
            liquidity,
        }
    }

    fn service(chain: Arc<MockChain>) -> PoolService {
        let tokens = Arc::new(TokenService::new(chain.clone(), SEPOLIA_WETH));
        PoolService::new(chain, tokens, MANAGER)
    }

    fn seed(chain: &MockChain, pools: &[RawPool]) {
        let infos: Vec<IPoolManager::PoolInfo> = pools
            .iter()
            .map(|p| IPoolManager::PoolInfo::try_from(p).unwrap())
            .collect();
        chain.on_call::<IPoolManager::getAllPoolsCall>(
            MANAGER,
            IPoolManager::getAllPoolsCall::abi_encode_returns(&(infos,)),
        );
        for (token, symbol) in [(A, "AAA"), (B, "BBB")] {
            chain.on_call::<IERC20::symbolCall>(token, IERC20::symbolCall::abi_encode_returns(&(symbol.to_string(),)));
            chain.on_call::<IERC20::decimalsCall>(token, IERC20::decimalsCall::abi_encode_returns(&(18u8,)));
        }
    }

    #[tokio::test]
    async fn test_formatted_pools_drop_unsupported_fee() {
        let chain = Arc::new(MockChain::default());
        seed(&chain, &[raw(0, 3_000, 1), raw(1, 2_500, 1), raw(2, 500, 0)]);

        let pools = service(chain).formatted_pools().await.unwrap();
        let indices: Vec<u32> = pools.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(pools[0].fee, FeeTier::Medium);
        assert_eq!(pools[1].fee, FeeTier::Low);
        assert_eq!(pools[0].pair_label, "AAA/BBB");
    }

    #[tokio::test]
    async fn test_raw_pools_decode() {
        let chain = Arc::new(MockChain::default());
        let mut pool = raw(7, 10_000, 42);
        pool.tick = -1_234;
        seed(&chain, &[pool.clone()]);
        assert_eq!(service(chain).get_all_pools().await.unwrap(), vec![pool]);
    }

    #[test]
    fn test_create_pool_request_targets_manager() {
        let chain = Arc::new(MockChain::default());
        let params = CreatePoolParams {
            pair: TokenPair::new(A, B).unwrap(),
            fee: FeeTier::Medium,
            tick_lower: -600,
            tick_upper: 600,
            sqrt_price_x96: U256::from(1u8) << 96,
        };
        let request = service(chain).create_pool_request(&params).unwrap();
        assert_eq!(request.kind, TxKind::CreatePool);
        assert_eq!(request.to, MANAGER);
        assert!(request
            .data
            .starts_with(&IPoolManager::createAndInitializePoolIfNecessaryCall::SELECTOR));
    }
}
