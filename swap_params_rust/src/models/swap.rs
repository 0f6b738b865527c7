use crate::error::{Error, EstimatorResult};
use crate::models::fee::{ChargeFeeBy, FeeDescriptor};
use crate::models::route::TradeRoute;
use crate::utils::uint::{U256, dec_string};
use aggregator_models::constants::chains::ChainId;
use error_stack::report;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;

/// Route discovery request: always the post-fee input amount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    pub chain_id: ChainId,
    pub token_in: String,
    pub token_out: String,
    pub amount_in: U256,
}

/// What a route provider knows about the swap before encoding
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteResult {
    /// Quoted or declared output in base units
    pub output_amount: Option<U256>,
    pub raw_executor_data: Option<Value>,
    pub is_use_swap_simple_mode: Option<bool>,
    pub trade_route: Option<TradeRoute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeConfig {
    #[serde(with = "dec_string")]
    pub min_amount_out: U256,
    pub recipient: String,
    /// Milliseconds since the epoch
    pub deadline: u64,
}

/// Body of the encoding call
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapDataRequest {
    pub chain_id: ChainId,
    pub currency_in_address: String,
    pub currency_in_decimals: u8,
    #[serde(with = "dec_string")]
    pub amount_in: U256,
    pub currency_out_address: String,
    pub currency_out_decimals: u8,
    pub trade_config: TradeConfig,
    pub fee_config: Option<FeeDescriptor>,
    pub custom_trade_route: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapV2Parameters {
    pub method_names: Vec<String>,
    pub value: String,
    pub args: Vec<Value>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapDataResponse {
    pub swap_v2_parameters: Option<SwapV2Parameters>,
    pub raw_executor_data: Option<Value>,
    pub is_use_swap_simple_mode: Option<bool>,
    pub trade_route: Option<Value>,
}

/// The router call, opaque past this layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapCallParameters {
    /// Interchangeable entry points, any of them can be called
    pub method_names: Vec<String>,
    /// Native currency to attach, hex or decimal
    pub value: String,
    pub args: Vec<Value>,
}

impl From<SwapV2Parameters> for SwapCallParameters {
    fn from(parameters: SwapV2Parameters) -> Self {
        Self {
            method_names: parameters.method_names,
            value: parameters.value,
            args: parameters.args,
        }
    }
}

impl SwapCallParameters {
    pub fn joined_method_names(&self) -> String {
        self.method_names.join(",")
    }

    /// `"0"`, `"0x0"` and friends
    pub fn is_zero_value(&self) -> bool {
        let value = self.value.trim();
        let digits = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .unwrap_or(value);
        digits.trim_start_matches('0').is_empty()
    }

    /// Shapes the parameters into a call against `router`, attaching value only when non-zero
    pub fn to_contract_call(&self, router: &str, from: &str) -> EstimatorResult<ContractCall> {
        let method = self.method_names.first().cloned().ok_or_else(|| {
            report!(Error::ResponseError).attach_printable("Swap parameters carry no method name")
        })?;

        Ok(ContractCall {
            to: router.to_string(),
            from: from.to_string(),
            method,
            args: self.args.clone(),
            value: (!self.is_zero_value()).then(|| self.value.clone()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractCall {
    pub to: String,
    pub from: String,
    pub method: String,
    pub args: Vec<Value>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargedFee {
    pub leg: ChargeFeeBy,
    pub amount: U256,
    /// `amount` in the charged token's decimal units
    pub display: String,
}

/// Everything one submission produces
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledSwap {
    pub call_parameters: SwapCallParameters,
    pub raw_executor_data: Option<Value>,
    pub is_use_swap_simple_mode: Option<bool>,
    pub trade_route: Option<Value>,
    pub amount_in: U256,
    pub amount_in_after_fee: U256,
    pub min_amount_out: U256,
    pub deadline: u64,
    pub charged_fee: Option<ChargedFee>,
}
