use super::{requests::KyberSwapRouteQuery, responses::KyberSwapRouteResponse};
use crate::{
    config::SwapParamsConfig,
    error::{Error, EstimatorResult},
    models::swap::{QuoteResult, RouteRequest, SwapDataRequest, SwapDataResponse},
    routers::{AggregatorApi, constants::CLIENT_ID_HEADER},
};
use aggregator_models::constants::chains::ChainId;
use aggregator_models::network::client_rate_limit::Client;
use aggregator_models::network::http::{
    HttpMethod, handle_reqwest_response, value_to_sorted_querystring,
};
use async_trait::async_trait;
use error_stack::ResultExt;
use serde_json::Value;

pub struct KyberSwapClient {
    client: Client,
    api_url: String,
    swap_parameters_path: String,
    client_id: Option<String>,
}

impl KyberSwapClient {
    pub fn new(config: &SwapParamsConfig) -> EstimatorResult<Self> {
        let client = Client::new(config.rate_limit, config.rate_limit_burst)
            .change_context(Error::ModelsError)
            .attach_printable("Error building KyberSwap http client")?;

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &SwapParamsConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            swap_parameters_path: config.swap_parameters_path.trim_matches('/').to_string(),
            client_id: config.client_id.clone(),
        }
    }

    fn route_url(&self, chain_id: ChainId) -> String {
        format!("{}/{}/route", self.api_url, chain_id.aggregator_path())
    }

    fn swap_parameters_url(&self, chain_id: ChainId) -> String {
        format!(
            "{}/{}/{}",
            self.api_url,
            chain_id.aggregator_path(),
            self.swap_parameters_path
        )
    }

    /// Every failure on the way (transport, HTTP status, body) is a `QuoteUnavailable`
    pub async fn send_kyberswap_request(
        &self,
        url: &str,
        query: Option<Value>,
        body: Option<Value>,
        method: HttpMethod,
    ) -> EstimatorResult<Value> {
        let unavailable = || Error::QuoteUnavailable(format!("KyberSwap {} {url} failed", method.as_str()));

        let url = match query {
            Some(query) => {
                let query = value_to_sorted_querystring(&query).change_context(Error::ModelsError)?;
                format!("{url}?{query}")
            }
            None => url.to_string(),
        };

        let mut request = match method {
            HttpMethod::GET => self.client.inner_client().get(&url),
            HttpMethod::POST => self.client.inner_client().post(&url),
        };
        if let Some(client_id) = &self.client_id {
            request = request.header(CLIENT_ID_HEADER, client_id);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let request = request
            .build()
            .change_context(Error::ReqwestError)
            .attach_printable("Error building KyberSwap request")?;

        tracing::debug!(method = method.as_str(), %url, "Sending KyberSwap request");
        let response = self
            .client
            .execute(request)
            .await
            .change_context(Error::ReqwestError)
            .attach_printable("Error in KyberSwap request")
            .change_context_lazy(unavailable)?;

        // Status and body reach the operator as a printable attachment
        handle_reqwest_response(response).await.map_err(|report| {
            let detail = report.current_context().to_string();
            report
                .change_context(Error::ModelsError)
                .attach_printable(detail)
                .change_context(unavailable())
        })
    }
}

#[async_trait]
impl AggregatorApi for KyberSwapClient {
    async fn get_route(&self, request: &RouteRequest) -> EstimatorResult<QuoteResult> {
        let query = serde_json::to_value(KyberSwapRouteQuery::from(request))
            .change_context_lazy(|| Error::SerdeSerialize("route query".to_string()))?;

        let response = self
            .send_kyberswap_request(
                &self.route_url(request.chain_id),
                Some(query),
                None,
                HttpMethod::GET,
            )
            .await?;

        let route_response: KyberSwapRouteResponse = serde_json::from_value(response)
            .change_context_lazy(|| {
                Error::QuoteUnavailable("malformed KyberSwap route response".to_string())
            })?;
        let quote = route_response.into_quote_result()?;

        tracing::info!(
            chain = %request.chain_id,
            amount_in = %request.amount_in,
            output_amount = ?quote.output_amount,
            "KyberSwap route quoted"
        );
        Ok(quote)
    }

    async fn get_swap_data(&self, request: &SwapDataRequest) -> EstimatorResult<SwapDataResponse> {
        let body = serde_json::to_value(request)
            .change_context_lazy(|| Error::SerdeSerialize("swap parameters request".to_string()))?;

        let response = self
            .send_kyberswap_request(
                &self.swap_parameters_url(request.chain_id),
                None,
                Some(body),
                HttpMethod::POST,
            )
            .await?;

        serde_json::from_value(response).change_context_lazy(|| {
            Error::QuoteUnavailable("malformed KyberSwap swap parameters response".to_string())
        })
    }
}
