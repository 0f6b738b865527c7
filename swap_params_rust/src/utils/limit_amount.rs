use crate::error::{Error, EstimatorResult};
use crate::models::fee::FeeConfig;
use crate::utils::fee::apply_output_fee;
use crate::utils::number_conversion::parse_decimal;
use crate::utils::uint::{U256, mul_div_round_half_up, pow10};
use error_stack::{ResultExt, report};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses an operator-entered slippage percentage (`"0.5"` = 0.5%)
pub fn parse_slippage(input: &str) -> EstimatorResult<Decimal> {
    let slippage = Decimal::from_str(input.trim())
        .change_context_lazy(|| Error::InvalidAmount(format!("{input:?} is not a slippage percentage")))?;
    if slippage.is_sign_negative() {
        return Err(report!(Error::InvalidAmount(format!(
            "slippage {slippage} is negative"
        ))));
    }
    Ok(slippage.normalize())
}

/// Minimum acceptable output for a quoted output.
///
/// The output-leg fee is deducted first, then the remainder is divided by
/// `1 + slippage / 100` and rounded half up. A result below one base unit
/// rejects the submission.
pub fn compute_min_amount_out(
    quoted_output: U256,
    fee_config: Option<&FeeConfig>,
    decimals_out: u8,
    slippage_percent: Decimal,
) -> EstimatorResult<U256> {
    if slippage_percent.is_sign_negative() {
        return Err(report!(Error::InvalidAmount(format!(
            "slippage {slippage_percent} is negative"
        ))));
    }
    let (amount_after_fee, _) = apply_output_fee(quoted_output, fee_config, decimals_out)?;

    // 1 + s/100 == (100 * 10^k + m) / (100 * 10^k) for s == m / 10^k
    let slippage = parse_decimal(&slippage_percent.normalize().to_string())
        .change_context(Error::InvalidAmount(format!(
            "slippage {slippage_percent} is not a plain decimal"
        )))?;
    let hundred_percent = pow10(slippage.scale)?
        .checked_mul(U256::from(100u8))
        .ok_or_else(|| report!(Error::InvalidAmount("slippage is too precise".to_string())))?;
    let divisor = hundred_percent
        .checked_add(slippage.mantissa)
        .ok_or_else(|| report!(Error::InvalidAmount("slippage is too large".to_string())))?;

    let min_amount_out = mul_div_round_half_up(amount_after_fee, hundred_percent, divisor)
        .change_context(Error::InvalidMinimumOutput(
            "minimum output does not fit in 256 bits".to_string(),
        ))?;
    ensure_positive(min_amount_out)?;

    Ok(min_amount_out)
}

/// Checks an operator-supplied minimum output: a positive integer in base units
pub fn validate_min_amount_out(input: &str) -> EstimatorResult<U256> {
    let invalid = || {
        Error::InvalidMinimumOutput(format!(
            "{:?} is not a positive integer amount",
            input.trim()
        ))
    };
    let parsed = parse_decimal(input).change_context_lazy(invalid)?;
    if !parsed.is_integer() {
        return Err(report!(invalid()));
    }
    ensure_positive(parsed.mantissa)?;
    Ok(parsed.mantissa)
}

fn ensure_positive(min_amount_out: U256) -> EstimatorResult<()> {
    if min_amount_out.is_zero() {
        return Err(report!(Error::InvalidMinimumOutput(
            "minimum output must be at least one base unit".to_string()
        )));
    }
    Ok(())
}

/// Slippage percentage implied by a limit against an estimate, rounded to 6 places
pub fn get_slippage_percentage(amount_estimated: U256, amount_limit: U256) -> Option<Decimal> {
    if amount_estimated.is_zero() || amount_limit.is_zero() || amount_limit > amount_estimated {
        return None;
    }
    // Decimal holds 96 bits, only the leading digits matter here
    let shift = amount_estimated.bits().saturating_sub(90);
    let est = Decimal::from_str(&(amount_estimated >> shift).to_string()).ok()?;
    let lim = Decimal::from_str(&(amount_limit >> shift).to_string()).ok()?;
    if lim.is_zero() {
        return None;
    }
    Some(((est / lim - Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(6))
}
