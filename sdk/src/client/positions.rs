use std::sync::Arc;

use alloy_primitives::{Address, U256};
use soda_core::format::{format_position, open_positions_for, summarize, FormattedPosition, PositionSummary};
use soda_core::{RawPosition, TokenMeta, TxKind};
use tracing::debug;

use super::pools::PoolService;
use super::tokens::TokenService;
use crate::chain::{read, ChainClient, TransactionRequest};
use crate::contracts::IPositionManager;
use crate::error::SdkResult;

/// Mint arguments after unit conversion
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintParams {
    pub token0: Address,
    pub token1: Address,
    pub index: u32,
    pub amount0_desired: U256,
    pub amount1_desired: U256,
    pub recipient: Address,
    /// Unix seconds
    pub deadline: u64,
}

/// Service for liquidity positions
pub struct PositionService {
    chain: Arc<dyn ChainClient>,
    tokens: Arc<TokenService>,
    pools: Arc<PoolService>,
    position_manager: Address,
}

impl PositionService {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        tokens: Arc<TokenService>,
        pools: Arc<PoolService>,
        position_manager: Address,
    ) -> Self {
        Self {
            chain,
            tokens,
            pools,
            position_manager,
        }
    }

    pub fn position_manager(&self) -> Address {
        self.position_manager
    }

    pub async fn get_all_positions(&self) -> SdkResult<Vec<RawPosition>> {
        let ret = read(
            self.chain.as_ref(),
            self.position_manager,
            &IPositionManager::getAllPositionsCall {},
        )
        .await?;
        Ok(ret.positionInfo.iter().map(RawPosition::from).collect())
    }

    /// Open positions of `owner`, formatted. In-range status uses the
    /// owning pool's tick when the pool list is readable.
    pub async fn positions_of(&self, owner: Address) -> SdkResult<Vec<FormattedPosition>> {
        let raw = self.get_all_positions().await?;
        let open = open_positions_for(&owner, &raw);
        debug!("{} of {} positions open for {}", open.len(), raw.len(), owner);
        if open.is_empty() {
            return Ok(Vec::new());
        }

        let ticks = match self.pools.pool_ticks().await {
            Ok(ticks) => ticks,
            Err(e) => {
                debug!("Pool ticks unavailable, using liquidity for status: {}", e);
                Default::default()
            }
        };
        let tokens: Vec<Address> = open
            .iter()
            .flat_map(|p| [p.pool.pair.token0, p.pool.pair.token1])
            .collect();
        let metas = self.tokens.metadata_batch(&tokens).await;

        Ok(open
            .iter()
            .map(|position| {
                let pair = position.pool.pair;
                let token0 = metas
                    .get(&pair.token0)
                    .cloned()
                    .unwrap_or_else(|| TokenMeta::unknown(pair.token0));
                let token1 = metas
                    .get(&pair.token1)
                    .cloned()
                    .unwrap_or_else(|| TokenMeta::unknown(pair.token1));
                let tick = ticks
                    .get(&(pair.token0, pair.token1, position.pool.index))
                    .copied();
                format_position(position, &token0, &token1, tick)
            })
            .collect())
    }

    /// Positions of the connected account with their summary
    pub async fn my_positions(&self) -> SdkResult<(Vec<FormattedPosition>, PositionSummary)> {
        let owner = self.chain.require_account().await?;
        let positions = self.positions_of(owner).await?;
        let summary = summarize(&positions);
        Ok((positions, summary))
    }

    pub fn mint_request(&self, params: &MintParams) -> TransactionRequest {
        let call = IPositionManager::mintCall {
            params: IPositionManager::MintParams {
                token0: params.token0,
                token1: params.token1,
                index: params.index,
                amount0Desired: params.amount0_desired,
                amount1Desired: params.amount1_desired,
                recipient: params.recipient,
                deadline: U256::from(params.deadline),
            },
        };
        TransactionRequest::of(TxKind::Mint, self.position_manager, &call)
    }

    pub fn collect_request(&self, position_id: U256, recipient: Address) -> TransactionRequest {
        TransactionRequest::of(
            TxKind::Collect,
            self.position_manager,
            &IPositionManager::collectCall {
                positionId: position_id,
                recipient,
            },
        )
    }

    pub fn burn_request(&self, position_id: U256) -> TransactionRequest {
        TransactionRequest::of(
            TxKind::Burn,
            self.position_manager,
            &IPositionManager::burnCall {
                positionId: position_id,
            },
        )
    }
}
