use crate::error::EstimatorResult;
use crate::models::route::TradeRoute;
use crate::models::swap::QuoteResult;

/// Quote for a caller-declared route. Amounts are taken as given.
pub fn static_quote(route: &TradeRoute) -> EstimatorResult<QuoteResult> {
    let output_amount = route.declared_amount_out()?;
    tracing::debug!(
        paths = route.paths().len(),
        hops = route.hop_count(),
        ?output_amount,
        "Using custom trade route"
    );

    Ok(QuoteResult {
        output_amount,
        raw_executor_data: None,
        is_use_swap_simple_mode: None,
        trade_route: Some(route.clone()),
    })
}
