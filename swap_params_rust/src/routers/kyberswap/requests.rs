use crate::models::swap::RouteRequest;
use serde::{Deserialize, Serialize};

/// Query of the route discovery endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KyberSwapRouteQuery {
    pub amount_in: String,
    pub token_in: String,
    pub token_out: String,
}

impl From<&RouteRequest> for KyberSwapRouteQuery {
    /// The router only knows the wrapped native token
    fn from(request: &RouteRequest) -> Self {
        Self {
            amount_in: request.amount_in.to_string(),
            token_in: request.chain_id.routable_token_address(&request.token_in),
            token_out: request.chain_id.routable_token_address(&request.token_out),
        }
    }
}
