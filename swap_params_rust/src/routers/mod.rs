pub mod constants;
pub mod custom_route;
pub mod estimate;
pub mod kyberswap;
pub mod swap;

use crate::error::EstimatorResult;
use crate::models::route::{RouteSource, TradeRoute};
use crate::models::swap::{QuoteResult, RouteRequest, SwapDataRequest, SwapDataResponse};
use async_trait::async_trait;

/// The remote aggregation service, seen from the pipeline
#[async_trait]
pub trait AggregatorApi: Send + Sync {
    /// Live route discovery for the post-fee input amount
    async fn get_route(&self, request: &RouteRequest) -> EstimatorResult<QuoteResult>;

    /// Final encoded call parameters
    async fn get_swap_data(&self, request: &SwapDataRequest) -> EstimatorResult<SwapDataResponse>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderType {
    Live,
    Static,
}

/// Where quotes come from for one submission
pub enum RouteProvider<'a> {
    Live(&'a dyn AggregatorApi),
    /// Caller-declared route, never sent to route discovery
    Static(TradeRoute),
}

impl<'a> RouteProvider<'a> {
    /// Static when a custom route is present. Route text is parsed here, before any network call.
    pub fn new(api: &'a dyn AggregatorApi, source: &RouteSource) -> EstimatorResult<Self> {
        Ok(match source {
            RouteSource::Live => RouteProvider::Live(api),
            RouteSource::Custom(text) => RouteProvider::Static(TradeRoute::parse(text)?),
        })
    }

    pub fn provider_type(&self) -> ProviderType {
        match self {
            RouteProvider::Live(_) => ProviderType::Live,
            RouteProvider::Static(_) => ProviderType::Static,
        }
    }

    pub async fn quote(&self, request: &RouteRequest) -> EstimatorResult<QuoteResult> {
        match self {
            RouteProvider::Live(api) => api.get_route(request).await,
            RouteProvider::Static(route) => custom_route::static_quote(route),
        }
    }
}
