use crate::error::{Error, EstimatorResult};
use crate::models::route::TradeRoute;
use crate::models::swap::QuoteResult;
use crate::utils::uint::U256;
use error_stack::report;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Route discovery answer. Only the fields the pipeline reads are typed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KyberSwapRouteResponse {
    /// Decimal string or plain number
    pub output_amount: Option<Value>,
    pub raw_executor_data: Option<Value>,
    pub is_use_swap_simple_mode: Option<bool>,
    pub swaps: Option<Value>,
    /// Present on error payloads
    pub message: Option<String>,
    pub code: Option<Value>,
}

fn parse_amount(value: &Value) -> Option<U256> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    U256::from_dec_str(&text).ok()
}

impl KyberSwapRouteResponse {
    pub fn into_quote_result(self) -> EstimatorResult<QuoteResult> {
        let Some(raw_amount) = self.output_amount else {
            let reason = self
                .message
                .unwrap_or_else(|| "route response has no outputAmount".to_string());
            return Err(report!(Error::QuoteUnavailable(reason)));
        };
        let output_amount = parse_amount(&raw_amount).ok_or_else(|| {
            report!(Error::QuoteUnavailable(format!(
                "outputAmount {raw_amount} is not a base-unit integer"
            )))
        })?;

        // Route echo is informative only, an unexpected shape is dropped
        let trade_route = self
            .swaps
            .and_then(|swaps| serde_json::from_value::<TradeRoute>(swaps).ok());

        Ok(QuoteResult {
            output_amount: Some(output_amount),
            raw_executor_data: self.raw_executor_data,
            is_use_swap_simple_mode: self.is_use_swap_simple_mode,
            trade_route,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> EstimatorResult<QuoteResult> {
        serde_json::from_value::<KyberSwapRouteResponse>(value)
            .unwrap()
            .into_quote_result()
    }

    #[test]
    fn test_output_amount_as_string_or_number() {
        let quote = parse(json!({"outputAmount": "2000000"})).unwrap();
        assert_eq!(quote.output_amount, Some(U256::from(2_000_000u64)));

        let quote = parse(json!({"outputAmount": 2000000, "isUseSwapSimpleMode": true})).unwrap();
        assert_eq!(quote.output_amount, Some(U256::from(2_000_000u64)));
        assert_eq!(quote.is_use_swap_simple_mode, Some(true));
    }

    #[test]
    fn test_unknown_swaps_shape_is_ignored() {
        let quote = parse(json!({"outputAmount": "10", "swaps": {"unexpected": true}})).unwrap();
        assert!(quote.trade_route.is_none());
    }

    #[test]
    fn test_error_payloads_are_unavailable_quotes() {
        let err = parse(json!({"code": 4008, "message": "route not found"})).unwrap_err();
        assert_eq!(
            err.current_context(),
            &Error::QuoteUnavailable("route not found".to_string())
        );

        for body in [json!({}), json!({"outputAmount": "1.5"}), json!({"outputAmount": null})] {
            let err = parse(body).unwrap_err();
            assert!(matches!(err.current_context(), Error::QuoteUnavailable(_)));
        }
    }
}
