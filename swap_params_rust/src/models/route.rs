use crate::error::{Error, EstimatorResult};
use crate::utils::uint::{U256, dec_string};
use aggregator_models::network::{JsonLimits, validate_and_parse_json};
use error_stack::{ResultExt, report};
use serde::{Deserialize, Serialize};

/// Route text is operator-supplied, keep it small and shallow
pub const CUSTOM_ROUTE_LIMITS: JsonLimits = JsonLimits {
    max_size: 64 * 1024,
    max_depth: 8,
};

pub const DEFAULT_CUSTOM_TRADE_ROUTE: &str = r#"[
  [
    {
      "pool": "0xe84ec9cde7f8e45c68668437634c1c0b2de3296c",
      "tokenIn": "0xbb4cdb9cbd36b01bd1cbaebf2de08d9173bc095c",
      "tokenOut": "0xfe56d5892bdffc7bf58f2e84be1b2c32d21c308b",
      "swapAmount": "1000000000000",
      "amountOut": "0",
      "limitReturnAmount": "0",
      "maxPrice": "115792089237316195423570985008687907853269984665640564039457584007913129639935",
      "exchange": "kyberswap",
      "poolLength": 2,
      "poolType": "dmm"
    }
  ]
]"#;

/// One pool traversal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRouteHop {
    pub pool: String,
    pub token_in: String,
    pub token_out: String,
    #[serde(with = "dec_string")]
    pub swap_amount: U256,
    #[serde(with = "dec_string")]
    pub amount_out: U256,
    #[serde(with = "dec_string")]
    pub limit_return_amount: U256,
    #[serde(with = "dec_string")]
    pub max_price: U256,
    pub exchange: String,
    pub pool_length: u32,
    pub pool_type: String,
}

/// Alternative path-groups, each an ordered list of hops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeRoute(pub Vec<Vec<TradeRouteHop>>);

impl TradeRoute {
    /// Parses custom route text. Every failure is `InvalidRouteFormat`.
    pub fn parse(text: &str) -> EstimatorResult<Self> {
        let route: TradeRoute = validate_and_parse_json(text.trim().as_bytes(), CUSTOM_ROUTE_LIMITS)
            .change_context_lazy(|| {
                Error::InvalidRouteFormat(
                    "expected a JSON array of path-groups, each an array of hop objects"
                        .to_string(),
                )
            })?;

        if route.0.is_empty() {
            return Err(report!(Error::InvalidRouteFormat(
                "route has no path-groups".to_string()
            )));
        }
        if let Some(index) = route.0.iter().position(|path| path.is_empty()) {
            return Err(report!(Error::InvalidRouteFormat(format!(
                "path-group {index} has no hops"
            ))));
        }

        Ok(route)
    }

    pub fn paths(&self) -> &[Vec<TradeRouteHop>] {
        &self.0
    }

    pub fn hop_count(&self) -> usize {
        self.0.iter().map(Vec::len).sum()
    }

    /// Sum of the final hop's `amountOut` over all path-groups, `None` when nothing is declared
    pub fn declared_amount_out(&self) -> EstimatorResult<Option<U256>> {
        let mut total = U256::zero();
        for hop in self.0.iter().filter_map(|path| path.last()) {
            total = total.checked_add(hop.amount_out).ok_or_else(|| {
                report!(Error::InvalidRouteFormat(
                    "declared amountOut overflows 256 bits".to_string()
                ))
            })?;
        }
        Ok((!total.is_zero()).then_some(total))
    }
}

/// Where the execution route comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteSource {
    /// Ask the aggregator to discover a route
    Live,
    /// Caller-declared route text, trusted verbatim
    Custom(String),
}

impl RouteSource {
    pub fn custom_route_text(&self) -> Option<&str> {
        match self {
            RouteSource::Live => None,
            RouteSource::Custom(text) => Some(text),
        }
    }
}
