pub mod forms;
pub mod pools;
pub mod positions;
pub mod swap;
pub mod tokens;

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use soda_core::format::{FormattedPool, FormattedPosition, PositionSummary};
use soda_core::validation::{CreatePoolForm, CreatePositionForm, SwapForm};
use tokio::sync::mpsc;
use tracing::info;

use crate::chain::ChainClient;
use crate::config::SdkConfig;
use crate::error::{SdkError, SdkResult};
use crate::poll::{spawn_poll, PollHandle};
use crate::quote::QuoteFetcher;
use crate::rpc::JsonRpcClient;
use crate::sequencer::{ActionOutcome, ActionPlan, SequencerEvent, TransactionSequencer};

pub use forms::{deadline_in, FormOrchestrator, PreparedSwap};
pub use pools::PoolService;
pub use positions::{MintParams, PositionService};
pub use swap::{SwapParams, SwapService};
pub use tokens::{TokenCheck, TokenService};

/// Main Soda DEX client with service-based architecture
pub struct SodaClient {
    pub chain: Arc<dyn ChainClient>,
    pub config: SdkConfig,
    /// ERC20 reads and approvals
    pub tokens: Arc<TokenService>,
    pub pools: Arc<PoolService>,
    pub positions: Arc<PositionService>,
    pub swap: SwapService,
    pub quotes: Arc<QuoteFetcher>,
    pub forms: FormOrchestrator,
    /// Sequences approve -> action transactions
    pub sequencer: TransactionSequencer,
}

impl SodaClient {
    /// Client over JSON-RPC at `config.rpc_url`
    pub fn connect(config: SdkConfig) -> SdkResult<Self> {
        config.validate()?;
        let rpc = Arc::new(JsonRpcClient::with_settings(config.rpc_url.clone(), &config.rpc));
        Ok(Self::with_chain(rpc, config))
    }

    /// Client over any [`ChainClient`]
    pub fn with_chain(chain: Arc<dyn ChainClient>, config: SdkConfig) -> Self {
        let contracts = config.contracts;
        let tokens = Arc::new(TokenService::new(chain.clone(), config.wrapped_native));
        let pools = Arc::new(PoolService::new(chain.clone(), tokens.clone(), contracts.pool_manager));
        let positions = Arc::new(PositionService::new(
            chain.clone(),
            tokens.clone(),
            pools.clone(),
            contracts.position_manager,
        ));
        let quotes = Arc::new(QuoteFetcher::new(
            chain.clone(),
            contracts.swap_router,
            config.wrapped_native,
        ));

        Self {
            swap: SwapService::new(tokens.clone(), contracts.swap_router),
            forms: FormOrchestrator::new(
                tokens.clone(),
                pools.clone(),
                quotes.clone(),
                config.defaults.deadline_minutes,
            ),
            sequencer: TransactionSequencer::new(chain.clone()),
            chain,
            config,
            tokens,
            pools,
            positions,
            quotes,
        }
    }

    /// Publish sequencer notifications on a channel
    pub fn with_events(mut self, sender: mpsc::UnboundedSender<SequencerEvent>) -> Self {
        self.sequencer = TransactionSequencer::new(self.chain.clone()).with_events(sender);
        self
    }

    /// Fail unless the endpoint serves the configured chain
    pub async fn check_chain(&self) -> SdkResult<()> {
        let chain_id = self.chain.chain_id().await?;
        if chain_id != self.config.chain_id {
            return Err(SdkError::Config(format!(
                "invalid chain_id: got {chain_id}, expected {}",
                self.config.chain_id
            )));
        }
        Ok(())
    }

    pub async fn account(&self) -> SdkResult<Address> {
        self.chain.require_account().await
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Validate the create-pool form and send `createAndInitializePoolIfNecessary`
    pub async fn create_pool(&self, form: &CreatePoolForm) -> SdkResult<ActionOutcome> {
        self.account().await?;
        let params = self.forms.create_pool(form).await?;
        let request = self.pools.create_pool_request(&params)?;
        self.sequencer.execute(ActionPlan::single(request)).await
    }

    /// Validate the position form, approve each token short on allowance
    /// for the exact desired amount, then mint
    pub async fn mint(&self, form: &CreatePositionForm) -> SdkResult<ActionOutcome> {
        let owner = self.account().await?;
        let params = self.forms.create_position(form, owner).await?;
        let spender = self.positions.position_manager();

        let missing = self
            .tokens
            .missing_allowances(
                owner,
                spender,
                &[
                    (params.token0, params.amount0_desired),
                    (params.token1, params.amount1_desired),
                ],
            )
            .await?;
        let approvals = missing
            .into_iter()
            .map(|(token, amount)| self.tokens.approve_request(token, spender, amount))
            .collect();

        let request = self.positions.mint_request(&params);
        self.sequencer
            .execute(ActionPlan::with_approvals(approvals, request))
            .await
    }

    /// Prepare a swap (route, quote, balance) without sending anything
    pub async fn prepare_swap(&self, form: &SwapForm) -> SdkResult<PreparedSwap> {
        let owner = self.account().await?;
        self.forms.swap(form, owner).await
    }

    /// Approve the router if needed, then `exactInput`
    pub async fn swap(&self, form: &SwapForm) -> SdkResult<(PreparedSwap, ActionOutcome)> {
        let owner = self.account().await?;
        let prepared = self.forms.swap(form, owner).await?;
        info!(
            "Swapping {} {} for at least {} {} via {}",
            form.sell_amount.trim(),
            prepared.token_in.symbol,
            soda_core::math::format_amount(prepared.params.amount_out_minimum, prepared.token_out.decimals),
            prepared.token_out.symbol,
            prepared.route.summary()
        );

        let approvals = self
            .swap
            .approvals_for(owner, prepared.params.token_in, prepared.params.amount_in)
            .await?;
        let request = self.swap.exact_input_request(&prepared.params)?;
        let outcome = self
            .sequencer
            .execute(ActionPlan::with_approvals(approvals, request))
            .await?;
        Ok((prepared, outcome))
    }

    pub async fn collect(&self, position_id: U256) -> SdkResult<ActionOutcome> {
        let owner = self.account().await?;
        let request = self.positions.collect_request(position_id, owner);
        self.sequencer.execute(ActionPlan::single(request)).await
    }

    pub async fn burn(&self, position_id: U256) -> SdkResult<ActionOutcome> {
        let request = self.positions.burn_request(position_id);
        self.sequencer.execute(ActionPlan::single(request)).await
    }

    /// Reset `spender`'s allowance on `token` to zero
    pub async fn revoke(&self, token: Address, spender: Address) -> SdkResult<ActionOutcome> {
        let request = self.swap.revoke_request(token, spender);
        self.sequencer.execute(ActionPlan::single(request)).await
    }

    // ========================================================================
    // Refresh loops
    // ========================================================================

    /// Refresh the formatted pool list on the configured interval
    pub fn watch_pools(&self) -> PollHandle<Vec<FormattedPool>> {
        let pools = self.pools.clone();
        spawn_poll("pools", self.config.polling.pools_interval(), move || {
            let pools = pools.clone();
            async move { pools.formatted_pools().await }
        })
    }

    /// Refresh `owner`'s positions on the configured interval
    pub fn watch_positions(&self, owner: Address) -> PollHandle<(Vec<FormattedPosition>, PositionSummary)> {
        let positions = self.positions.clone();
        spawn_poll("positions", self.config.polling.positions_interval(), move || {
            let positions = positions.clone();
            async move {
                let list = positions.positions_of(owner).await?;
                let summary = soda_core::format::summarize(&list);
                Ok((list, summary))
            }
        })
    }

    /// Explorer link for a transaction hash, when an explorer is configured
    pub fn tx_link(&self, outcome: &ActionOutcome) -> Option<String> {
        self.config.tx_url(&outcome.hash().to_string())
    }
}
