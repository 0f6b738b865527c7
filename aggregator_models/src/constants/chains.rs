use error_stack::{Report, report};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::error::Error;

/// Sentinel address the aggregator uses for the chain's native asset
pub const NATIVE_TOKEN_EVM_ADDRESS: &str = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee";
pub const EVM_NULL_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

pub const NATIVE_TOKEN_EVM_ADDRESSES: [&str; 2] = [NATIVE_TOKEN_EVM_ADDRESS, EVM_NULL_ADDRESS];

pub fn is_native_token_evm_address(address: &str) -> bool {
    NATIVE_TOKEN_EVM_ADDRESSES.contains(&address.trim().to_lowercase().as_str())
}

pub const WETH_ADDRESS: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
pub const WMATIC_ADDRESS: &str = "0x0d500b1d8e8ef31e21c99d1db9a6444d3adf1270";
pub const WBNB_ADDRESS: &str = "0xbb4cdb9cbd36b01bd1cbaebf2de08d9173bc095c";
pub const WAVAX_ADDRESS: &str = "0xb31f66aa3c1e785363f0875a1b74e27b85fd66c7";
pub const WFTM_ADDRESS: &str = "0x21be370d5312f44cb42ce377bc9b8a0cef1a4c83";
pub const WCRO_ADDRESS: &str = "0x5c7f8a570d578ed84e63fdfa7b1ee72deae1ae23";

/// EVM networks served by the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr, EnumIter, Hash)]
#[repr(u32)]
pub enum ChainId {
    Ethereum = 1,
    Cronos = 25,
    Bsc = 56,
    Polygon = 137,
    Fantom = 250,
    Avalanche = 43114,
}

impl ChainId {
    pub fn supported_chains() -> Vec<ChainId> {
        ChainId::iter().collect()
    }

    /// Path segment the aggregator API uses for this network
    pub fn aggregator_path(&self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Cronos => "cronos",
            Self::Bsc => "bsc",
            Self::Polygon => "polygon",
            Self::Fantom => "fantom",
            Self::Avalanche => "avalanche",
        }
    }

    pub fn is_native_token(self, address: &str) -> bool {
        is_native_token_evm_address(address)
    }

    pub fn wrapped_native_token_address(self) -> &'static str {
        match self {
            ChainId::Ethereum => WETH_ADDRESS,
            ChainId::Cronos => WCRO_ADDRESS,
            ChainId::Bsc => WBNB_ADDRESS,
            ChainId::Polygon => WMATIC_ADDRESS,
            ChainId::Fantom => WFTM_ADDRESS,
            ChainId::Avalanche => WAVAX_ADDRESS,
        }
    }

    /// Replaces the native asset sentinel with the wrapped token, which is what route discovery expects
    pub fn routable_token_address(self, address: &str) -> String {
        if self.is_native_token(address) {
            self.wrapped_native_token_address().to_string()
        } else {
            address.to_string()
        }
    }
}

impl TryFrom<u32> for ChainId {
    type Error = Report<Error>;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        serde_json::from_str(&value.to_string()).map_err(|e| {
            Report::new(Error::ChainError(format!("Unsupported chain ID {value}")))
                .attach_printable(format!("Failed to parse chain ID: {e}"))
        })
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Ethereum => write!(f, "Ethereum"),
            Self::Cronos => write!(f, "Cronos"),
            Self::Bsc => write!(f, "BSC"),
            Self::Polygon => write!(f, "Polygon"),
            Self::Fantom => write!(f, "Fantom"),
            Self::Avalanche => write!(f, "Avalanche"),
        }
    }
}

impl TryFrom<&str> for ChainId {
    type Error = Report<Error>;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "Ethereum" | "ethereum" | "1" => Ok(Self::Ethereum),
            "Cronos" | "cronos" | "25" => Ok(Self::Cronos),
            "Bsc" | "BSC" | "bsc" | "56" => Ok(Self::Bsc),
            "Polygon" | "polygon" | "Matic" | "137" => Ok(Self::Polygon),
            "Fantom" | "fantom" | "250" => Ok(Self::Fantom),
            "Avalanche" | "avalanche" | "43114" => Ok(Self::Avalanche),
            _ => Err(report!(Error::ChainError(format!(
                "Invalid chain name: {value}"
            )))),
        }
    }
}
