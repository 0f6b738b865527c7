use crate::error::{Error, EstimatorResult};
use crate::models::intent::{MinAmountOut, SwapIntent, TokenSpec, TradeOptions};
use crate::models::swap::{
    QuoteResult, RouteRequest, SwapDataRequest, SwapDataResponse, SwapV2Parameters,
};
use crate::routers::AggregatorApi;
use crate::utils::uint::U256;
use aggregator_models::constants::chains::ChainId;
use async_trait::async_trait;
use error_stack::report;
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub fn init_tracing_in_tests() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().json().pretty().with_ansi(true))
        .try_init()
        .ok();
}

/// Native BSC into KNC, 18 decimals on both legs
pub fn test_intent(amount_in: &str) -> SwapIntent {
    SwapIntent {
        chain_id: ChainId::Bsc,
        token_in: TokenSpec {
            address: "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE".to_string(),
            decimals: 18,
        },
        token_out: TokenSpec {
            address: "0xfe56d5892BDffC7BF58f2E84BE1b2C32D21C308b".to_string(),
            decimals: 18,
        },
        amount_in: amount_in.to_string(),
    }
}

/// 0.5% slippage, manual minimum output of one base unit
pub fn test_options() -> TradeOptions {
    TradeOptions {
        slippage: Decimal::new(5, 1),
        min_amount_out: MinAmountOut::default(),
        recipient: "0x16368dD7e94f177B8C2c028Ef42289113D328121".to_string(),
        deadline_minutes: 20,
    }
}

/// In-memory aggregator counting calls and keeping every request it saw
pub struct FakeAggregator {
    output_amount: Option<U256>,
    swap_data: Option<SwapDataResponse>,
    route_calls: AtomicUsize,
    swap_data_calls: AtomicUsize,
    route_requests: Mutex<Vec<RouteRequest>>,
    swap_data_requests: Mutex<Vec<SwapDataRequest>>,
}

impl FakeAggregator {
    pub fn quoting(output_amount: u64) -> Self {
        Self {
            output_amount: Some(U256::from(output_amount)),
            swap_data: None,
            route_calls: AtomicUsize::new(0),
            swap_data_calls: AtomicUsize::new(0),
            route_requests: Mutex::new(vec![]),
            swap_data_requests: Mutex::new(vec![]),
        }
    }

    /// Every call fails as an unreachable service would
    pub fn failing() -> Self {
        Self {
            output_amount: None,
            ..Self::quoting(0)
        }
    }

    pub fn with_swap_data(mut self, response: SwapDataResponse) -> Self {
        self.swap_data = Some(response);
        self
    }

    pub fn default_swap_data() -> SwapDataResponse {
        SwapDataResponse {
            swap_v2_parameters: Some(SwapV2Parameters {
                method_names: vec!["swap".to_string(), "swapSimpleMode".to_string()],
                value: "0x0".to_string(),
                args: vec![
                    json!("0x617Dee16B86534a5d792A4d7A62FB491B544111E"),
                    json!(["0xbb4cdb9cbd36b01bd1cbaebf2de08d9173bc095c"]),
                    json!("0x"),
                ],
            }),
            raw_executor_data: None,
            is_use_swap_simple_mode: Some(false),
            trade_route: None,
        }
    }

    pub fn route_calls(&self) -> usize {
        self.route_calls.load(Ordering::SeqCst)
    }

    pub fn swap_data_calls(&self) -> usize {
        self.swap_data_calls.load(Ordering::SeqCst)
    }

    pub fn route_requests(&self) -> Vec<RouteRequest> {
        self.route_requests.lock().unwrap().clone()
    }

    pub fn swap_data_requests(&self) -> Vec<SwapDataRequest> {
        self.swap_data_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AggregatorApi for FakeAggregator {
    async fn get_route(&self, request: &RouteRequest) -> EstimatorResult<QuoteResult> {
        self.route_calls.fetch_add(1, Ordering::SeqCst);
        self.route_requests.lock().unwrap().push(request.clone());

        let output_amount = self.output_amount.ok_or_else(|| {
            report!(Error::QuoteUnavailable("connection refused".to_string()))
        })?;
        Ok(QuoteResult {
            output_amount: Some(output_amount),
            ..QuoteResult::default()
        })
    }

    async fn get_swap_data(&self, request: &SwapDataRequest) -> EstimatorResult<SwapDataResponse> {
        self.swap_data_calls.fetch_add(1, Ordering::SeqCst);
        self.swap_data_requests.lock().unwrap().push(request.clone());

        if self.output_amount.is_none() {
            return Err(report!(Error::QuoteUnavailable(
                "connection refused".to_string()
            )));
        }
        if let Some(response) = &self.swap_data {
            return Ok(response.clone());
        }

        // Native input is paid as call value, like the real encoder does
        let mut response = Self::default_swap_data();
        if request.chain_id.is_native_token(&request.currency_in_address) {
            if let Some(parameters) = response.swap_v2_parameters.as_mut() {
                parameters.value = format!("0x{:x}", request.amount_in);
            }
        }
        Ok(response)
    }
}
