/// Soda DEX SDK
///
/// Async client for a concentrated-liquidity DEX whose pools are addressed by
/// `(token0, token1, index)`. Provides:
/// - Pool and position listings, formatted for display
/// - Create-pool, mint, collect, burn and swap flows
/// - Approve-then-act transaction sequencing
/// - Swap quotes from router simulation
pub mod chain;
pub mod client;
pub mod config;
pub mod contracts;
pub mod error;
pub mod poll;
pub mod quote;
pub mod router;
pub mod rpc;
pub mod sequencer;
pub mod testing;

pub use chain::{CallRequest, ChainClient, TransactionReceipt, TransactionRequest};
pub use client::*;
pub use config::*;
pub use error::{SdkError, SdkResult};
pub use quote::{Quote, QuoteFetcher, QuoteOutcome, QuoteRequest};
pub use router::{find_route, Route};
pub use rpc::JsonRpcClient;
pub use sequencer::{ActionOutcome, ActionPlan, SequencerEvent, TransactionSequencer};

// Re-export the domain crate
pub use soda_core;
