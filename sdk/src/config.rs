use std::fs;
use std::time::Duration;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use soda_core::{
    DEFAULT_DEADLINE_MINUTES, DEFAULT_SLIPPAGE_PERCENT, MAX_DEADLINE_MINUTES, POOLS_REFRESH_SECS,
    POSITIONS_REFRESH_SECS, SEPOLIA_WETH,
};

use crate::error::{SdkError, SdkResult};

/// SDK configuration loaded from a TOML file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SdkConfig {
    /// JSON-RPC endpoint of the node or wallet proxy
    pub rpc_url: String,

    /// Expected chain id; checked on connect
    pub chain_id: u64,

    /// Block explorer base URL for transaction links
    #[serde(default)]
    pub explorer_url: Option<String>,

    /// Token the native-coin placeholder resolves to
    #[serde(default = "default_wrapped_native")]
    pub wrapped_native: Address,

    /// Deployed DEX contracts
    pub contracts: ContractAddresses,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub rpc: RpcSettings,

    #[serde(default)]
    pub defaults: TradeDefaults,
}

/// DEX contract addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContractAddresses {
    pub pool_manager: Address,
    pub position_manager: Address,
    pub swap_router: Address,
}

/// Refresh intervals for listings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    pub pools_interval_secs: u64,
    pub positions_interval_secs: u64,
}

/// Transport settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcSettings {
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub receipt_poll_interval_ms: u64,
    pub receipt_timeout_secs: u64,
}

/// Defaults applied to swaps and mints
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TradeDefaults {
    pub slippage_percent: f64,
    pub deadline_minutes: u64,
}

fn default_wrapped_native() -> Address {
    SEPOLIA_WETH
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            pools_interval_secs: POOLS_REFRESH_SECS,
            positions_interval_secs: POSITIONS_REFRESH_SECS,
        }
    }
}

impl Default for RpcSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            read_timeout_secs: 30,
            receipt_poll_interval_ms: 1_000,
            receipt_timeout_secs: 300,
        }
    }
}

impl Default for TradeDefaults {
    fn default() -> Self {
        Self {
            slippage_percent: DEFAULT_SLIPPAGE_PERCENT,
            deadline_minutes: DEFAULT_DEADLINE_MINUTES,
        }
    }
}

impl PollingConfig {
    pub fn pools_interval(&self) -> Duration {
        Duration::from_secs(self.pools_interval_secs)
    }

    pub fn positions_interval(&self) -> Duration {
        Duration::from_secs(self.positions_interval_secs)
    }
}

impl SdkConfig {
    pub fn sepolia(contracts: ContractAddresses) -> Self {
        Self {
            rpc_url: "https://ethereum-sepolia-rpc.publicnode.com".to_string(),
            chain_id: 11_155_111,
            explorer_url: Some("https://sepolia.etherscan.io".to_string()),
            contracts,
            wrapped_native: SEPOLIA_WETH,
            polling: PollingConfig::default(),
            rpc: RpcSettings::default(),
            defaults: TradeDefaults::default(),
        }
    }

    pub fn localnet(contracts: ContractAddresses) -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31_337,
            explorer_url: None,
            rpc: RpcSettings {
                receipt_poll_interval_ms: 200,
                receipt_timeout_secs: 60,
                ..RpcSettings::default()
            },
            ..Self::sepolia(contracts)
        }
    }

    pub fn with_rpc_url(mut self, url: String) -> Self {
        self.rpc_url = url;
        self
    }

    pub fn with_wrapped_native(mut self, wrapped_native: Address) -> Self {
        self.wrapped_native = wrapped_native;
        self
    }

    /// Load configuration from TOML file
    pub fn load(path: &str) -> SdkResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("Failed to read config file {path}: {e}")))?;

        let config: SdkConfig = toml::from_str(&content)
            .map_err(|e| SdkError::Config(format!("Failed to parse config file {path}: {e}")))?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: &str) -> SdkResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SdkError::Config(format!("Failed to serialize config: {e}")))?;
        fs::write(path, content)
            .map_err(|e| SdkError::Config(format!("Failed to write config file {path}: {e}")))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SdkResult<()> {
        if self.rpc_url.trim().is_empty() {
            return Err(invalid("rpc_url", "empty", "a non-empty URL"));
        }

        for (name, address) in [
            ("contracts.pool_manager", self.contracts.pool_manager),
            ("contracts.position_manager", self.contracts.position_manager),
            ("contracts.swap_router", self.contracts.swap_router),
            ("wrapped_native", self.wrapped_native),
        ] {
            if address == Address::ZERO {
                return Err(invalid(name, "0x0", "a deployed contract address"));
            }
        }

        if self.polling.pools_interval_secs == 0 {
            return Err(invalid("polling.pools_interval_secs", "0", "greater than 0"));
        }
        if self.polling.positions_interval_secs == 0 {
            return Err(invalid("polling.positions_interval_secs", "0", "greater than 0"));
        }

        if self.rpc.receipt_poll_interval_ms == 0 {
            return Err(invalid("rpc.receipt_poll_interval_ms", "0", "greater than 0"));
        }
        if self.rpc.receipt_timeout_secs == 0 {
            return Err(invalid("rpc.receipt_timeout_secs", "0", "greater than 0"));
        }

        let slippage = self.defaults.slippage_percent;
        if !(0.0..100.0).contains(&slippage) {
            return Err(invalid(
                "defaults.slippage_percent",
                &slippage.to_string(),
                "within [0, 100)",
            ));
        }
        let deadline = self.defaults.deadline_minutes;
        if deadline == 0 || deadline > MAX_DEADLINE_MINUTES {
            return Err(invalid(
                "defaults.deadline_minutes",
                &deadline.to_string(),
                &format!("within [1, {MAX_DEADLINE_MINUTES}]"),
            ));
        }

        Ok(())
    }

    /// Transaction link on the configured explorer
    pub fn tx_url(&self, hash: &str) -> Option<String> {
        self.explorer_url
            .as_ref()
            .map(|base| format!("{}/tx/{hash}", base.trim_end_matches('/')))
    }
}

fn invalid(field: &str, value: &str, expected: &str) -> SdkError {
    SdkError::Config(format!("invalid {field}: got {value}, expected {expected}"))
}
