use crate::error::{Error, EstimatorResult};
use crate::models::fee::FeeConfig;
use crate::models::intent::{SwapIntent, TradeOptions};
use crate::models::route::RouteSource;
use crate::models::swap::{QuoteResult, RouteRequest};
use crate::routers::{AggregatorApi, ProviderType, RouteProvider};
use crate::utils::fee::{apply_input_fee, apply_output_fee};
use crate::utils::limit_amount::{compute_min_amount_out, get_slippage_percentage};
use crate::utils::number_conversion::normalize;
use crate::utils::uint::U256;
use error_stack::{ResultExt, report};
use rust_decimal::Decimal;

/// Input leg after normalization and input-leg fee
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreparedInput {
    pub amount_in: U256,
    pub amount_in_after_fee: U256,
    pub input_fee: U256,
}

pub fn prepare_input(
    intent: &SwapIntent,
    fee_config: Option<&FeeConfig>,
) -> EstimatorResult<PreparedInput> {
    let amount_in = normalize(&intent.amount_in, intent.token_in.decimals)
        .attach_printable("Input amount")?;
    if amount_in.is_zero() {
        return Err(report!(Error::InvalidAmount(
            "input amount must be greater than zero".to_string()
        )));
    }

    let (amount_in_after_fee, input_fee) =
        apply_input_fee(amount_in, fee_config, intent.token_in.decimals)?;
    if amount_in_after_fee.is_zero() {
        return Err(report!(Error::InvalidAmount(format!(
            "input fee {input_fee} consumes the whole input amount"
        ))));
    }

    tracing::debug!(
        amount = %intent.amount_in,
        %amount_in,
        %amount_in_after_fee,
        %input_fee,
        "Normalized input amount"
    );

    Ok(PreparedInput {
        amount_in,
        amount_in_after_fee,
        input_fee,
    })
}

pub fn route_request(intent: &SwapIntent, amount_in_after_fee: U256) -> RouteRequest {
    RouteRequest {
        chain_id: intent.chain_id,
        token_in: intent.token_in.address.clone(),
        token_out: intent.token_out.address.clone(),
        amount_in: amount_in_after_fee,
    }
}

/// Quote plus the minimum output derived from it
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMinAmountOut {
    pub quote: QuoteResult,
    pub quoted_output: U256,
    /// Output-leg fee taken off `quoted_output`
    pub output_fee: U256,
    pub min_amount_out: U256,
}

pub async fn derive_min_amount_out(
    provider: &RouteProvider<'_>,
    request: &RouteRequest,
    fee_config: Option<&FeeConfig>,
    decimals_out: u8,
    slippage: Decimal,
) -> EstimatorResult<DerivedMinAmountOut> {
    let quote = provider.quote(request).await?;
    let quoted_output = quote.output_amount.ok_or_else(|| {
        report!(Error::InvalidMinimumOutput(
            "route declares no output amount, set the minimum output manually".to_string()
        ))
    })?;

    let (_, output_fee) = apply_output_fee(quoted_output, fee_config, decimals_out)?;
    let min_amount_out = compute_min_amount_out(quoted_output, fee_config, decimals_out, slippage)?;

    tracing::info!(
        provider = ?provider.provider_type(),
        %quoted_output,
        %output_fee,
        %slippage,
        %min_amount_out,
        "Derived minimum output"
    );

    Ok(DerivedMinAmountOut {
        quote,
        quoted_output,
        output_fee,
        min_amount_out,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct MinAmountOutEstimate {
    pub provider: ProviderType,
    pub amount_in: U256,
    pub amount_in_after_fee: U256,
    pub quoted_output: U256,
    pub output_fee: U256,
    pub min_amount_out: U256,
    /// Effective tolerance between the quote and `min_amount_out`, fees included
    pub implied_slippage: Option<Decimal>,
    pub quote: QuoteResult,
}

/// Quotes the intent and derives the minimum output without assembling a transaction
pub async fn update_min_amount_out(
    api: &dyn AggregatorApi,
    intent: &SwapIntent,
    fee_config: Option<&FeeConfig>,
    options: &TradeOptions,
    route_source: &RouteSource,
) -> EstimatorResult<MinAmountOutEstimate> {
    let input = prepare_input(intent, fee_config)?;
    let provider = RouteProvider::new(api, route_source)?;
    let request = route_request(intent, input.amount_in_after_fee);

    let derived = derive_min_amount_out(
        &provider,
        &request,
        fee_config,
        intent.token_out.decimals,
        options.slippage,
    )
    .await?;

    Ok(MinAmountOutEstimate {
        provider: provider.provider_type(),
        amount_in: input.amount_in,
        amount_in_after_fee: input.amount_in_after_fee,
        quoted_output: derived.quoted_output,
        output_fee: derived.output_fee,
        min_amount_out: derived.min_amount_out,
        implied_slippage: get_slippage_percentage(derived.quoted_output, derived.min_amount_out),
        quote: derived.quote,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fee::ChargeFeeBy;
    use crate::models::route::DEFAULT_CUSTOM_TRADE_ROUTE;
    use crate::tests::{FakeAggregator, init_tracing_in_tests, test_intent, test_options};

    #[tokio::test]
    async fn test_update_min_amount_out_live() {
        init_tracing_in_tests();
        let api = FakeAggregator::quoting(2_000_000);
        let estimate = update_min_amount_out(
            &api,
            &test_intent("0.000001"),
            None,
            &test_options(),
            &RouteSource::Live,
        )
        .await
        .unwrap();

        assert_eq!(estimate.provider, ProviderType::Live);
        assert_eq!(estimate.amount_in, U256::from(1_000_000_000_000u64));
        assert_eq!(estimate.quoted_output, U256::from(2_000_000u64));
        assert_eq!(estimate.min_amount_out, U256::from(1_990_050u64));
        assert_eq!(estimate.implied_slippage.unwrap().round_dp(2), Decimal::new(50, 2));
        assert_eq!(api.route_calls(), 1);
        assert_eq!(api.swap_data_calls(), 0);
    }

    #[tokio::test]
    async fn test_route_sees_post_fee_input() {
        let api = FakeAggregator::quoting(2_000_000);
        let fee = FeeConfig {
            charge_fee_by: ChargeFeeBy::CurrencyIn,
            fee_receiver: "0xDa0D8fF1bE1F78c5d349722A5800622EA31CD5dd".to_string(),
            fee_amount: "8".to_string(),
            is_in_bps: true,
        };
        update_min_amount_out(
            &api,
            &test_intent("0.000001"),
            Some(&fee),
            &test_options(),
            &RouteSource::Live,
        )
        .await
        .unwrap();

        let requests = api.route_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].amount_in, U256::from(999_200_000_000u64));
    }

    #[tokio::test]
    async fn test_custom_route_without_declared_output() {
        let api = FakeAggregator::quoting(2_000_000);
        let err = update_min_amount_out(
            &api,
            &test_intent("0.000001"),
            None,
            &test_options(),
            &RouteSource::Custom(DEFAULT_CUSTOM_TRADE_ROUTE.to_string()),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.current_context(),
            Error::InvalidMinimumOutput(_)
        ));
        assert_eq!(api.route_calls(), 0);
    }

    #[tokio::test]
    async fn test_custom_route_with_declared_output() {
        let api = FakeAggregator::quoting(1);
        let route = DEFAULT_CUSTOM_TRADE_ROUTE
            .replace(r#""amountOut": "0""#, r#""amountOut": "1000000""#);
        let estimate = update_min_amount_out(
            &api,
            &test_intent("0.000001"),
            None,
            &test_options(),
            &RouteSource::Custom(route),
        )
        .await
        .unwrap();

        assert_eq!(estimate.provider, ProviderType::Static);
        assert_eq!(estimate.min_amount_out, U256::from(995_025u64));
        assert!(estimate.quote.trade_route.is_some());
        assert_eq!(api.route_calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_amount_never_reaches_the_network() {
        let api = FakeAggregator::quoting(2_000_000);
        for amount in ["abc", "0", "0.0000000000000000001"] {
            let err = update_min_amount_out(
                &api,
                &test_intent(amount),
                None,
                &test_options(),
                &RouteSource::Live,
            )
            .await
            .unwrap_err();
            assert!(
                matches!(err.current_context(), Error::InvalidAmount(_)),
                "{amount}"
            );
        }
        assert_eq!(api.route_calls(), 0);
    }
}
