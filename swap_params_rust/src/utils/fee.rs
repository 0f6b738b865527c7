use crate::error::{Error, EstimatorResult};
use crate::models::fee::{FeeConfig, FeeDescriptor};
use crate::utils::number_conversion::{denormalize, normalize, parse_decimal};
use crate::utils::uint::{U256, mul_div, pow10};
use error_stack::{ResultExt, report};

/// 100% in basis points
pub const BPS_BASE: u64 = 10_000;

/// Fee in base units for `base_amount` on the leg with `leg_decimals`.
///
/// Bps fees are `base_amount * fee_amount / 10000`, truncated. Flat fees are
/// the fee amount normalized with `leg_decimals`, whatever `base_amount` is.
pub fn compute_fee(
    base_amount: U256,
    fee_config: Option<&FeeConfig>,
    leg_decimals: u8,
) -> EstimatorResult<U256> {
    let Some(fee_config) = fee_config else {
        return Ok(U256::zero());
    };

    if fee_config.is_in_bps {
        let bps = parse_decimal(&fee_config.fee_amount).attach_printable("Fee amount in bps")?;
        let divisor = pow10(bps.scale)
            .ok()
            .and_then(|scale| scale.checked_mul(U256::from(BPS_BASE)))
            .ok_or_else(|| {
                report!(Error::InvalidAmount(format!(
                    "fee amount {} has too many fractional digits",
                    fee_config.fee_amount
                )))
            })?;
        mul_div(base_amount, bps.mantissa, divisor).change_context(Error::InvalidAmount(
            format!("fee of {} bps overflows", fee_config.fee_amount),
        ))
    } else {
        normalize(&fee_config.fee_amount, leg_decimals).attach_printable("Flat fee amount")
    }
}

/// Takes an input-leg fee off `amount_in` before routing. Returns `(amount_after_fee, fee)`.
pub fn apply_input_fee(
    amount_in: U256,
    fee_config: Option<&FeeConfig>,
    decimals_in: u8,
) -> EstimatorResult<(U256, U256)> {
    let fee_config = fee_config.filter(|fee| fee.charges_input());
    let fee = compute_fee(amount_in, fee_config, decimals_in)?;
    let amount_after_fee = amount_in.checked_sub(fee).ok_or_else(|| {
        report!(Error::InvalidAmount(format!(
            "fee {fee} exceeds input amount {amount_in}"
        )))
    })?;

    Ok((amount_after_fee, fee))
}

/// Takes an output-leg fee off a quoted output. Returns `(amount_after_fee, fee)`.
pub fn apply_output_fee(
    amount_out: U256,
    fee_config: Option<&FeeConfig>,
    decimals_out: u8,
) -> EstimatorResult<(U256, U256)> {
    let fee_config = fee_config.filter(|fee| fee.charges_output());
    let fee = compute_fee(amount_out, fee_config, decimals_out)?;
    let amount_after_fee = amount_out.checked_sub(fee).ok_or_else(|| {
        report!(Error::InvalidMinimumOutput(format!(
            "fee {fee} exceeds quoted output {amount_out}"
        )))
    })?;

    Ok((amount_after_fee, fee))
}

/// Fee as the encoder expects it: bps verbatim, flat amounts in base units of the charged leg
pub fn fee_descriptor(
    fee_config: &FeeConfig,
    decimals_in: u8,
    decimals_out: u8,
) -> EstimatorResult<FeeDescriptor> {
    let fee_amount = if fee_config.is_in_bps {
        // validated here so a bad value never reaches the network
        parse_decimal(&fee_config.fee_amount).attach_printable("Fee amount in bps")?;
        fee_config.fee_amount.trim().to_string()
    } else {
        let decimals = fee_config.leg_decimals(decimals_in, decimals_out);
        normalize(&fee_config.fee_amount, decimals)
            .attach_printable("Flat fee amount")?
            .to_string()
    };

    Ok(FeeDescriptor {
        charge_fee_by: fee_config.charge_fee_by,
        fee_receiver: fee_config.fee_receiver.clone(),
        fee_amount,
        is_in_bps: fee_config.is_in_bps,
    })
}

/// Operator-facing description of the configured fee
pub fn fee_preview(
    fee_config: &FeeConfig,
    decimals_in: u8,
    decimals_out: u8,
) -> EstimatorResult<String> {
    let descriptor = fee_descriptor(fee_config, decimals_in, decimals_out)?;
    if fee_config.is_in_bps {
        let bps = parse_decimal(&fee_config.fee_amount)?;
        // bps / 100 is the percentage, i.e. two more fractional digits
        let percent = denormalize(
            bps.mantissa,
            (bps.scale + 2).min(u8::MAX as u32) as u8,
        );
        Ok(format!("{} bps ({percent}%)", descriptor.fee_amount))
    } else {
        Ok(format!(
            "= {} base units of {}",
            descriptor.fee_amount, fee_config.charge_fee_by
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fee::ChargeFeeBy;

    fn fee(charge_fee_by: ChargeFeeBy, fee_amount: &str, is_in_bps: bool) -> FeeConfig {
        FeeConfig {
            charge_fee_by,
            fee_receiver: "0xDa0D8fF1bE1F78c5d349722A5800622EA31CD5dd".to_string(),
            fee_amount: fee_amount.to_string(),
            is_in_bps,
        }
    }

    #[test]
    fn test_no_fee_config_is_free() {
        assert_eq!(
            compute_fee(U256::from(1_000u64), None, 18).unwrap(),
            U256::zero()
        );
    }

    #[test]
    fn test_bps_fee() {
        let config = fee(ChargeFeeBy::CurrencyIn, "8", true);
        let fee = compute_fee(U256::from(1_000_000_000_000u64), Some(&config), 18).unwrap();
        assert_eq!(fee, U256::from(800_000_000u64));
    }

    #[test]
    fn test_fractional_bps_fee_truncates() {
        // 0.5 bps of 12345 = 0.61725
        let config = fee(ChargeFeeBy::CurrencyIn, "0.5", true);
        let fee = compute_fee(U256::from(12_345u64), Some(&config), 18).unwrap();
        assert_eq!(fee, U256::zero());

        // 0.5 bps of 1e9 = 50000
        let fee = compute_fee(U256::from(1_000_000_000u64), Some(&config), 18).unwrap();
        assert_eq!(fee, U256::from(50_000u64));
    }

    #[test]
    fn test_flat_fee_ignores_base_amount() {
        let config = fee(ChargeFeeBy::CurrencyIn, "1", false);
        for base in [0u64, 1, 1_000_000] {
            let fee = compute_fee(U256::from(base), Some(&config), 18).unwrap();
            assert_eq!(fee, U256::from(1_000_000_000_000_000_000u128));
        }
    }

    #[test]
    fn test_malformed_fee_amount() {
        let config = fee(ChargeFeeBy::CurrencyIn, "eight", true);
        let err = compute_fee(U256::from(1u8), Some(&config), 18).unwrap_err();
        assert!(matches!(err.current_context(), Error::InvalidAmount(_)));
    }

    #[test]
    fn test_apply_input_fee_only_for_input_leg() {
        let amount = U256::from(1_000_000_000_000u64);

        let input_fee = fee(ChargeFeeBy::CurrencyIn, "8", true);
        let (after, charged) = apply_input_fee(amount, Some(&input_fee), 18).unwrap();
        assert_eq!(charged, U256::from(800_000_000u64));
        assert_eq!(after, U256::from(999_200_000_000u64));

        let output_fee = fee(ChargeFeeBy::CurrencyOut, "8", true);
        let (after, charged) = apply_input_fee(amount, Some(&output_fee), 18).unwrap();
        assert_eq!(charged, U256::zero());
        assert_eq!(after, amount);
    }

    #[test]
    fn test_input_fee_larger_than_amount() {
        let config = fee(ChargeFeeBy::CurrencyIn, "1", false);
        let err = apply_input_fee(U256::from(10u8), Some(&config), 6).unwrap_err();
        assert!(matches!(err.current_context(), Error::InvalidAmount(_)));
    }

    #[test]
    fn test_apply_output_fee() {
        let quoted = U256::from(2_000_000u64);

        let bps = fee(ChargeFeeBy::CurrencyOut, "8", true);
        let (after, charged) = apply_output_fee(quoted, Some(&bps), 6).unwrap();
        assert_eq!(charged, U256::from(1_600u64));
        assert_eq!(after, U256::from(1_998_400u64));

        let flat = fee(ChargeFeeBy::CurrencyOut, "0.5", false);
        let (after, _) = apply_output_fee(quoted, Some(&flat), 6).unwrap();
        assert_eq!(after, U256::from(1_500_000u64));

        let too_much = fee(ChargeFeeBy::CurrencyOut, "3", false);
        let err = apply_output_fee(quoted, Some(&too_much), 6).unwrap_err();
        assert!(matches!(
            err.current_context(),
            Error::InvalidMinimumOutput(_)
        ));
    }

    #[test]
    fn test_fee_descriptor_normalizes_flat_fees_per_leg() {
        let flat_in = fee(ChargeFeeBy::CurrencyIn, "1.5", false);
        assert_eq!(
            fee_descriptor(&flat_in, 18, 6).unwrap().fee_amount,
            "1500000000000000000"
        );

        let flat_out = fee(ChargeFeeBy::CurrencyOut, "1.5", false);
        assert_eq!(fee_descriptor(&flat_out, 18, 6).unwrap().fee_amount, "1500000");

        let bps = fee(ChargeFeeBy::CurrencyOut, " 8 ", true);
        let descriptor = fee_descriptor(&bps, 18, 6).unwrap();
        assert_eq!(descriptor.fee_amount, "8");
        assert!(descriptor.is_in_bps);
    }

    #[test]
    fn test_fee_preview() {
        let bps = fee(ChargeFeeBy::CurrencyIn, "8", true);
        assert_eq!(fee_preview(&bps, 18, 18).unwrap(), "8 bps (0.08%)");

        let flat = fee(ChargeFeeBy::CurrencyOut, "2", false);
        assert_eq!(
            fee_preview(&flat, 18, 6).unwrap(),
            "= 2000000 base units of currency_out"
        );
    }
}
