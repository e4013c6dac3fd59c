//! Lightweight Ethereum JSON-RPC client
//!
//! Implements only the methods the SDK needs, on top of a blocking `ureq`
//! agent driven from `spawn_blocking`. Signing is delegated to the node or
//! wallet proxy behind the endpoint (`eth_accounts` / `eth_sendTransaction`).

use std::time::Duration;

use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::chain::{CallRequest, ChainClient, TransactionReceipt, TransactionRequest};
use crate::config::RpcSettings;
use crate::error::{SdkError, SdkResult};

/// JSON-RPC client for an EVM node
pub struct JsonRpcClient {
    url: String,
    agent: ureq::Agent,
    receipt_poll_interval: Duration,
    receipt_timeout: Duration,
}

/// RPC response wrapper
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    #[serde(default)]
    id: Option<u64>,
    result: Option<T>,
    error: Option<RpcError>,
}

/// RPC error structure
#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Receipt fields we read
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: B256,
    block_number: Option<String>,
    status: Option<String>,
}

fn parse_quantity(value: &str) -> SdkResult<u64> {
    u64::from_str_radix(value.trim_start_matches("0x"), 16)
        .map_err(|e| SdkError::Rpc(format!("invalid quantity {value}: {e}")))
}

fn call_object(request: &CallRequest) -> Value {
    let mut object = json!({
        "to": request.to.to_string(),
        "data": request.data.to_string(),
    });
    if let Some(from) = request.from {
        object["from"] = json!(from.to_string());
    }
    if !request.value.is_zero() {
        object["value"] = json!(format!("0x{:x}", request.value));
    }
    object
}

impl JsonRpcClient {
    /// Create a new client with default timeouts
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_settings(url, &RpcSettings::default())
    }

    pub fn with_settings(url: impl Into<String>, settings: &RpcSettings) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(settings.connect_timeout_secs))
            .timeout_read(Duration::from_secs(settings.read_timeout_secs))
            .build();

        Self {
            url: url.into(),
            agent,
            receipt_poll_interval: Duration::from_millis(settings.receipt_poll_interval_ms),
            receipt_timeout: Duration::from_secs(settings.receipt_timeout_secs),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post(&self, body: String) -> SdkResult<String> {
        // Use blocking call since ureq is sync
        let response = tokio::task::spawn_blocking({
            let agent = self.agent.clone();
            let url = self.url.clone();

            move || {
                let response = agent
                    .post(&url)
                    .set("Content-Type", "application/json")
                    .send_string(&body)?;
                let text = response.into_string()?;
                Ok::<String, ureq::Error>(text)
            }
        })
        .await?;

        response.map_err(|e| SdkError::Rpc(e.to_string()))
    }

    /// Make a JSON-RPC call whose result may be `null`
    async fn call_optional<T>(&self, method: &str, params: Value) -> SdkResult<Option<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let request_body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });

        debug!("RPC call: {} with params: {}", method, params);

        let response_body = self.post(request_body.to_string()).await?;
        let rpc_response: RpcResponse<T> = serde_json::from_str(&response_body)?;

        if let Some(error) = rpc_response.error {
            return Err(SdkError::Rpc(format!("{} ({})", error.message, error.code)));
        }

        Ok(rpc_response.result)
    }

    /// Make a JSON-RPC call
    async fn call_method<T>(&self, method: &str, params: Value) -> SdkResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        self.call_optional(method, params)
            .await?
            .ok_or_else(|| SdkError::Rpc(format!("No result in {method} response")))
    }

    /// Send `eth_call`s as one JSON-RPC batch; results come back in request order
    async fn eth_call_batch(&self, requests: &[CallRequest]) -> SdkResult<Vec<SdkResult<Bytes>>> {
        let batch: Vec<Value> = requests
            .iter()
            .enumerate()
            .map(|(id, request)| {
                json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "method": "eth_call",
                    "params": [call_object(request), "latest"]
                })
            })
            .collect();

        debug!("RPC batch: {} eth_call(s)", batch.len());

        let response_body = self.post(Value::Array(batch).to_string()).await?;
        let responses: Vec<RpcResponse<Bytes>> = serde_json::from_str(&response_body)?;

        let mut results: Vec<SdkResult<Bytes>> = (0..requests.len())
            .map(|_| Err(SdkError::Rpc("missing batch response".to_string())))
            .collect();
        for response in responses {
            let Some(slot) = response.id.and_then(|id| results.get_mut(id as usize)) else {
                continue;
            };
            *slot = match (response.result, response.error) {
                (_, Some(error)) => Err(SdkError::Rpc(format!("{} ({})", error.message, error.code))),
                (Some(data), None) => Ok(data),
                (None, None) => Err(SdkError::Rpc("empty eth_call result".to_string())),
            };
        }
        Ok(results)
    }
}

#[async_trait]
impl ChainClient for JsonRpcClient {
    async fn chain_id(&self) -> SdkResult<u64> {
        let id: String = self.call_method("eth_chainId", json!([])).await?;
        parse_quantity(&id)
    }

    async fn account(&self) -> SdkResult<Option<Address>> {
        let accounts: Vec<Address> = self.call_method("eth_accounts", json!([])).await?;
        Ok(accounts.into_iter().next())
    }

    async fn get_code(&self, address: Address) -> SdkResult<Bytes> {
        self.call_method("eth_getCode", json!([address.to_string(), "latest"]))
            .await
    }

    async fn call(&self, request: CallRequest) -> SdkResult<Bytes> {
        self.call_method("eth_call", json!([call_object(&request), "latest"]))
            .await
    }

    async fn call_batch(&self, requests: Vec<CallRequest>) -> Vec<SdkResult<Bytes>> {
        if requests.is_empty() {
            return Vec::new();
        }
        match self.eth_call_batch(&requests).await {
            Ok(results) => results,
            Err(e) => {
                warn!("Batch call failed, falling back to single calls: {}", e);
                let mut results = Vec::with_capacity(requests.len());
                for request in requests {
                    results.push(self.call(request).await);
                }
                results
            }
        }
    }

    async fn send_transaction(&self, from: Address, request: &TransactionRequest) -> SdkResult<B256> {
        let mut tx = json!({
            "from": from.to_string(),
            "to": request.to.to_string(),
            "data": request.data.to_string(),
        });
        if !request.value.is_zero() {
            tx["value"] = json!(format!("0x{:x}", request.value));
        }
        self.call_method("eth_sendTransaction", json!([tx]))
            .await
            .map_err(|e| SdkError::TransactionRejected {
                kind: request.kind,
                reason: e.to_string(),
            })
    }

    async fn wait_for_receipt(&self, hash: B256) -> SdkResult<TransactionReceipt> {
        let started = tokio::time::Instant::now();
        loop {
            let receipt: Option<RpcReceipt> = self
                .call_optional("eth_getTransactionReceipt", json!([hash.to_string()]))
                .await?;

            if let Some(receipt) = receipt {
                let block_number = match receipt.block_number.as_deref() {
                    Some(n) => Some(parse_quantity(n)?),
                    None => None,
                };
                return Ok(TransactionReceipt {
                    hash: receipt.transaction_hash,
                    block_number,
                    success: receipt.status.as_deref() == Some("0x1"),
                });
            }

            if started.elapsed() >= self.receipt_timeout {
                return Err(SdkError::ReceiptTimeout(hash));
            }
            tokio::time::sleep(self.receipt_poll_interval).await;
        }
    }
}
