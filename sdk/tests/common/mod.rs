//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{address, Address, U256};
use alloy_sol_types::SolCall;
use soda_sdk::contracts::{IERC20, IPoolManager, IPositionManager, ISwapRouter};
use soda_sdk::soda_core::{RawPool, RawPosition, SEPOLIA_WETH};
use soda_sdk::testing::MockChain;
use soda_sdk::{ContractAddresses, SdkConfig, SodaClient};

pub const OWNER: Address = address!("00000000000000000000000000000000000000f1");
pub const POOL_MANAGER: Address = address!("00000000000000000000000000000000000000a1");
pub const POSITION_MANAGER: Address = address!("00000000000000000000000000000000000000a2");
pub const SWAP_ROUTER: Address = address!("00000000000000000000000000000000000000a3");

pub const TOKEN_A: Address = address!("1000000000000000000000000000000000000001");
pub const TOKEN_B: Address = address!("2000000000000000000000000000000000000002");
pub const WETH: Address = SEPOLIA_WETH;

pub fn contracts() -> ContractAddresses {
    ContractAddresses {
        pool_manager: POOL_MANAGER,
        position_manager: POSITION_MANAGER,
        swap_router: SWAP_ROUTER,
    }
}

pub fn config() -> SdkConfig {
    SdkConfig::localnet(contracts())
}

/// Mock chain with a connected wallet and the two test tokens deployed
pub fn chain() -> Arc<MockChain> {
    let chain = Arc::new(MockChain::default().with_account(OWNER));
    deploy_token(&chain, TOKEN_A, "AAA", 18);
    deploy_token(&chain, TOKEN_B, "BBB", 6);
    deploy_token(&chain, WETH, "WETH", 18);
    chain
}

pub fn client(chain: &Arc<MockChain>) -> SodaClient {
    SodaClient::with_chain(chain.clone(), config())
}

pub fn deploy_token(chain: &MockChain, token: Address, symbol: &str, decimals: u8) {
    chain.set_code(token, vec![0x60, 0x80]);
    chain.on_call::<IERC20::symbolCall>(token, IERC20::symbolCall::abi_encode_returns(&(symbol.to_string(),)));
    chain.on_call::<IERC20::decimalsCall>(token, IERC20::decimalsCall::abi_encode_returns(&(decimals,)));
    chain.on_call::<IERC20::totalSupplyCall>(
        token,
        IERC20::totalSupplyCall::abi_encode_returns(&(U256::from(10u8).pow(U256::from(30u8)),)),
    );
}

pub fn set_balance(chain: &MockChain, token: Address, amount: U256) {
    chain.on_call::<IERC20::balanceOfCall>(token, IERC20::balanceOfCall::abi_encode_returns(&(amount,)));
}

pub fn set_allowance(chain: &MockChain, token: Address, amount: U256) {
    chain.on_call::<IERC20::allowanceCall>(token, IERC20::allowanceCall::abi_encode_returns(&(amount,)));
}

pub fn set_quote(chain: &MockChain, amount_out: U256) {
    chain.on_call::<ISwapRouter::quoteExactInputCall>(
        SWAP_ROUTER,
        ISwapRouter::quoteExactInputCall::abi_encode_returns(&(amount_out,)),
    );
}

pub fn pool(token0: Address, token1: Address, index: u32, fee: u32, liquidity: u128) -> RawPool {
    RawPool {
        pool: Address::with_last_byte(0x40 + index as u8),
        token0,
        token1,
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

pub fn set_pools(chain: &MockChain, pools: &[RawPool]) {
    let infos: Vec<IPoolManager::PoolInfo> = pools
        .iter()
        .map(|p| IPoolManager::PoolInfo::try_from(p).unwrap())
        .collect();
    chain.on_call::<IPoolManager::getAllPoolsCall>(
        POOL_MANAGER,
        IPoolManager::getAllPoolsCall::abi_encode_returns(&(infos,)),
    );
}

pub fn position(id: u64, owner: Address, liquidity: u128, ticks: (i32, i32), owed0: u128) -> RawPosition {
    RawPosition {
        id: U256::from(id),
        owner,
        token0: TOKEN_A,
        token1: TOKEN_B,
        index: 0,
        fee: 3_000,
        liquidity,
        tick_lower: ticks.0,
        tick_upper: ticks.1,
        tokens_owed0: owed0,
        tokens_owed1: 0,
        fee_growth_inside0_last_x128: U256::ZERO,
        fee_growth_inside1_last_x128: U256::ZERO,
    }
}

pub fn set_positions(chain: &MockChain, positions: &[RawPosition]) {
    let infos: Vec<IPositionManager::PositionInfo> = positions
        .iter()
        .map(|p| IPositionManager::PositionInfo::try_from(p).unwrap())
        .collect();
    chain.on_call::<IPositionManager::getAllPositionsCall>(
        POSITION_MANAGER,
        IPositionManager::getAllPositionsCall::abi_encode_returns(&(infos,)),
    );
}

/// `amount` whole tokens in base units
pub fn units(amount: u64, decimals: u8) -> U256 {
    U256::from(amount) * U256::from(10u8).pow(U256::from(decimals))
}

/// Yield to spawned tasks until `condition` holds
pub async fn wait_until<F, Fut>(mut condition: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..200 {
        if condition().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached");
}

/// Let spawned tasks run without advancing anything observable
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
