//! Token metadata and pair ordering

use alloy_primitives::Address;

use crate::constants::{FALLBACK_DECIMALS, FALLBACK_SYMBOL, NATIVE_TOKEN_PLACEHOLDER};
use crate::errors::{CoreError, CoreResult};
use crate::format::shorten_address;

/// ERC20 metadata needed for display and unit conversion
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenMeta {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenMeta {
    pub fn new(address: Address, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            address,
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Metadata used when the token contract does not answer
    pub fn unknown(address: Address) -> Self {
        Self::new(address, FALLBACK_SYMBOL, FALLBACK_DECIMALS)
    }

    /// Symbol, or a shortened address when the symbol is empty
    pub fn display_name(&self) -> String {
        if self.symbol.is_empty() {
            shorten_address(&self.address)
        } else {
            self.symbol.clone()
        }
    }
}

/// Lowercase hex form of an address, the ordering key for token pairs
pub fn address_key(address: &Address) -> String {
    address.to_string().to_lowercase()
}

/// Whether `a` sorts strictly below `b` by lowercase hex
pub fn sorts_before(a: &Address, b: &Address) -> bool {
    address_key(a) < address_key(b)
}

/// Replace the native-coin placeholder with its wrapped token
pub fn resolve_native(token: Address, wrapped_native: Address) -> Address {
    if token == NATIVE_TOKEN_PLACEHOLDER {
        wrapped_native
    } else {
        token
    }
}

/// Two tokens in canonical order (token0 < token1)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenPair {
    pub token0: Address,
    pub token1: Address,
}

impl TokenPair {
    /// Build a pair that must already be sorted
    pub fn new(token0: Address, token1: Address) -> CoreResult<Self> {
        if !sorts_before(&token0, &token1) {
            return Err(CoreError::UnsortedTokens);
        }
        Ok(Self { token0, token1 })
    }

    /// Build a pair from two distinct tokens in any order
    pub fn sorted(a: Address, b: Address) -> CoreResult<Self> {
        if a == b {
            return Err(CoreError::UnsortedTokens);
        }
        if sorts_before(&a, &b) {
            Ok(Self { token0: a, token1: b })
        } else {
            Ok(Self { token0: b, token1: a })
        }
    }

    /// Whether the pair joins `a` and `b` in either orientation
    pub fn matches(&self, a: &Address, b: &Address) -> bool {
        (self.token0 == *a && self.token1 == *b) || (self.token0 == *b && self.token1 == *a)
    }

    /// Stable identifier, `token0-token1` in lowercase hex
    pub fn id(&self) -> String {
        format!("{}-{}", address_key(&self.token0), address_key(&self.token1))
    }
}
