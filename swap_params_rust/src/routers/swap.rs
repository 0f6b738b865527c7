use crate::error::{Error, EstimatorResult};
use crate::models::fee::FeeConfig;
use crate::models::intent::{MinAmountOut, SwapIntent, TradeOptions};
use crate::models::route::RouteSource;
use crate::models::swap::{AssembledSwap, ChargedFee, SwapCallParameters, SwapDataRequest, TradeConfig};
use crate::routers::estimate::{derive_min_amount_out, prepare_input, route_request};
use crate::routers::{AggregatorApi, RouteProvider};
use crate::utils::fee::{compute_fee, fee_descriptor};
use crate::utils::get_timestamp_millis;
use crate::utils::limit_amount::validate_min_amount_out;
use crate::utils::number_conversion::denormalize;
use crate::utils::uint::U256;
use error_stack::report;

/// Runs the whole pipeline for one submission.
///
/// Amount, fee, route text and a manual minimum output are all validated
/// before the first network call. A derived minimum output costs one route
/// quote; the encoding call is always made.
pub async fn assemble(
    api: &dyn AggregatorApi,
    intent: &SwapIntent,
    fee_config: Option<&FeeConfig>,
    options: &TradeOptions,
    route_source: &RouteSource,
) -> EstimatorResult<AssembledSwap> {
    let input = prepare_input(intent, fee_config)?;
    let descriptor = fee_config
        .map(|fee| fee_descriptor(fee, intent.token_in.decimals, intent.token_out.decimals))
        .transpose()?;
    let provider = RouteProvider::new(api, route_source)?;
    if options.recipient.trim().is_empty() {
        return Err(report!(Error::InvalidRecipient(
            "recipient address is empty".to_string()
        )));
    }

    let (min_amount_out, output_fee, quote) = match &options.min_amount_out {
        MinAmountOut::Manual(value) => {
            let min_amount_out = validate_min_amount_out(value)?;
            // Bps output fees depend on a quote that is not fetched here
            let output_fee = match fee_config {
                Some(fee) if fee.charges_output() && !fee.is_in_bps => {
                    Some(compute_fee(U256::zero(), Some(fee), intent.token_out.decimals)?)
                }
                _ => None,
            };
            (min_amount_out, output_fee, None)
        }
        MinAmountOut::Derived => {
            let request = route_request(intent, input.amount_in_after_fee);
            let derived = derive_min_amount_out(
                &provider,
                &request,
                fee_config,
                intent.token_out.decimals,
                options.slippage,
            )
            .await?;
            (derived.min_amount_out, Some(derived.output_fee), Some(derived.quote))
        }
    };

    let deadline = options.deadline_at(get_timestamp_millis()?);
    let request = SwapDataRequest {
        chain_id: intent.chain_id,
        currency_in_address: intent.token_in.address.clone(),
        currency_in_decimals: intent.token_in.decimals,
        amount_in: input.amount_in_after_fee,
        currency_out_address: intent.token_out.address.clone(),
        currency_out_decimals: intent.token_out.decimals,
        trade_config: TradeConfig {
            min_amount_out,
            recipient: options.recipient.clone(),
            deadline,
        },
        fee_config: descriptor,
        custom_trade_route: route_source.custom_route_text().map(str::to_string),
    };

    tracing::info!(
        chain = %intent.chain_id,
        provider = ?provider.provider_type(),
        amount_in = %request.amount_in,
        %min_amount_out,
        deadline,
        "Requesting swap parameters"
    );
    let response = api.get_swap_data(&request).await?;

    let parameters = response.swap_v2_parameters.ok_or_else(|| {
        report!(Error::QuoteUnavailable(
            "aggregator returned no swap parameters".to_string()
        ))
    })?;
    let call_parameters = SwapCallParameters::from(parameters);
    if call_parameters.method_names.is_empty() {
        return Err(report!(Error::QuoteUnavailable(
            "aggregator returned no method names".to_string()
        )));
    }
    if !intent.is_native_in() && !call_parameters.is_zero_value() {
        tracing::warn!(
            value = %call_parameters.value,
            token_in = %intent.token_in.address,
            "Non-native input with a non-zero call value"
        );
    }

    let charged_fee = fee_config.and_then(|fee| {
        let (amount, decimals) = if fee.charges_input() {
            (input.input_fee, intent.token_in.decimals)
        } else {
            (output_fee?, intent.token_out.decimals)
        };
        Some(ChargedFee {
            leg: fee.charge_fee_by,
            amount,
            display: denormalize(amount, decimals),
        })
    });

    // Prefer the aggregator's echo, fall back to what the provider resolved
    let trade_route = response.trade_route.or_else(|| {
        quote
            .as_ref()
            .and_then(|quote| quote.trade_route.as_ref())
            .and_then(|route| serde_json::to_value(route).ok())
    });
    let raw_executor_data = response
        .raw_executor_data
        .or_else(|| quote.as_ref().and_then(|quote| quote.raw_executor_data.clone()));
    let is_use_swap_simple_mode = response
        .is_use_swap_simple_mode
        .or_else(|| quote.as_ref().and_then(|quote| quote.is_use_swap_simple_mode));

    tracing::info!(
        methods = %call_parameters.joined_method_names(),
        value = %call_parameters.value,
        args = call_parameters.args.len(),
        "Swap parameters assembled"
    );

    Ok(AssembledSwap {
        call_parameters,
        raw_executor_data,
        is_use_swap_simple_mode,
        trade_route,
        amount_in: input.amount_in,
        amount_in_after_fee: input.amount_in_after_fee,
        min_amount_out,
        deadline,
        charged_fee,
    })
}
