use crate::error::{Error, EstimatorResult};
use crate::utils::uint::{U256, pow10};
use error_stack::{ResultExt, report};

/// Exact value of a decimal string: `mantissa / 10^scale`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDecimal {
    pub mantissa: U256,
    /// Number of significant fractional digits, trailing zeros removed
    pub scale: u32,
}

impl ParsedDecimal {
    pub fn is_integer(&self) -> bool {
        self.scale == 0
    }
}

/// Parses a non-negative plain decimal (`"12"`, `"0.000001"`, `"1."`, `".5"`).
/// Signs, exponents, separators and empty input are rejected.
pub fn parse_decimal(s: &str) -> EstimatorResult<ParsedDecimal> {
    let s = s.trim();
    let invalid = || report!(Error::InvalidAmount(format!("{s:?} is not a non-negative decimal")));

    let (integer_part, fraction_part) = match s.split_once('.') {
        Some((integer_part, fraction_part)) => (integer_part, fraction_part),
        None => (s, ""),
    };
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if integer_part.is_empty() && fraction_part.is_empty() {
        return Err(invalid());
    }
    if !all_digits(integer_part) || !all_digits(fraction_part) {
        return Err(invalid());
    }

    let fraction_part = fraction_part.trim_end_matches('0');
    let digits = format!("{integer_part}{fraction_part}");
    let digits = digits.trim_start_matches('0');
    let mantissa = if digits.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(digits)
            .map_err(|_| invalid())
            .attach_printable("Value does not fit in 256 bits")?
    };

    Ok(ParsedDecimal {
        mantissa,
        scale: fraction_part.len() as u32,
    })
}

/// Converts a human-entered decimal amount into integer base units.
///
/// `normalize("0.000001", 18) == 10^12`. Amounts carrying more significant
/// fractional digits than `decimals` are rejected, not truncated.
pub fn normalize(amount: &str, decimals: u8) -> EstimatorResult<U256> {
    let parsed = parse_decimal(amount)?;
    let decimals = u32::from(decimals);
    if parsed.scale > decimals {
        return Err(report!(Error::InvalidAmount(format!(
            "{} has more than {decimals} fractional digits",
            amount.trim()
        ))));
    }
    if parsed.mantissa.is_zero() {
        return Ok(U256::zero());
    }

    let too_large = format!("{} is too large for {decimals} decimals", amount.trim());
    let factor =
        pow10(decimals - parsed.scale).change_context(Error::InvalidAmount(too_large.clone()))?;
    parsed
        .mantissa
        .checked_mul(factor)
        .ok_or_else(|| report!(Error::InvalidAmount(too_large)))
}

/// Inverse of [`normalize`]: renders base units as a decimal string without trailing zeros
pub fn denormalize(base_units: U256, decimals: u8) -> String {
    let digits = base_units.to_string();
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return digits;
    }

    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (integer_part, fraction_part) = padded.split_at(padded.len() - decimals);
    let fraction_part = fraction_part.trim_end_matches('0');
    if fraction_part.is_empty() {
        integer_part.to_string()
    } else {
        format!("{integer_part}.{fraction_part}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(value: u128) -> U256 {
        U256::from(value)
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("0.000001", 18).unwrap(), u(1_000_000_000_000));
        assert_eq!(normalize("123.456789", 6).unwrap(), u(123_456_789));
        assert_eq!(normalize("1", 18).unwrap(), u(1_000_000_000_000_000_000));
        assert_eq!(normalize("0", 18).unwrap(), U256::zero());
        assert_eq!(normalize(" 42 ", 0).unwrap(), u(42));
        assert_eq!(normalize(".5", 1).unwrap(), u(5));
        assert_eq!(normalize("2.", 2).unwrap(), u(200));
    }

    #[test]
    fn test_normalize_ignores_trailing_fraction_zeros() {
        assert_eq!(normalize("1.500000", 2).unwrap(), u(150));
    }

    #[test]
    fn test_normalize_rejects_malformed_input() {
        for input in ["", ".", "abc", "-1", "+1", "1e18", "1.2.3", "1,5", "0x10", "NaN"] {
            let err = normalize(input, 18).unwrap_err();
            assert!(
                matches!(err.current_context(), Error::InvalidAmount(_)),
                "{input:?} should be an invalid amount"
            );
        }
    }

    #[test]
    fn test_normalize_rejects_excess_precision() {
        let err = normalize("0.0000001", 6).unwrap_err();
        assert!(matches!(err.current_context(), Error::InvalidAmount(_)));
    }

    #[test]
    fn test_normalize_rejects_overflow() {
        let err = normalize("1", 78).unwrap_err();
        assert!(matches!(err.current_context(), Error::InvalidAmount(_)));

        let huge = "9".repeat(80);
        let err = normalize(&huge, 0).unwrap_err();
        assert!(matches!(err.current_context(), Error::InvalidAmount(_)));
    }

    #[test]
    fn test_normalize_zero_with_wide_decimals() {
        assert_eq!(normalize("0", 78).unwrap(), U256::zero());
        assert_eq!(normalize("0.00", u8::MAX).unwrap(), U256::zero());
    }

    #[test]
    fn test_denormalize() {
        assert_eq!(denormalize(u(1_000_000_000_000), 18), "0.000001");
        assert_eq!(denormalize(u(123_456_789), 6), "123.456789");
        assert_eq!(denormalize(u(1_000_000_000_000_000_000), 18), "1");
        assert_eq!(denormalize(U256::zero(), 18), "0");
        assert_eq!(denormalize(u(42), 0), "42");
        assert_eq!(denormalize(u(150), 2), "1.5");
    }

    #[test]
    fn test_round_trip_is_numerically_exact() {
        let cases = [
            ("0.000001", 18, "0.000001"),
            ("1.50", 6, "1.5"),
            ("000123.4500", 4, "123.45"),
            ("987654321.123456789012345678", 18, "987654321.123456789012345678"),
            ("7", 0, "7"),
        ];
        for (input, decimals, expected) in cases {
            let base_units = normalize(input, decimals).unwrap();
            assert_eq!(denormalize(base_units, decimals), expected, "{input}");
        }
    }

    #[test]
    fn test_parse_decimal() {
        let parsed = parse_decimal("0.50").unwrap();
        assert_eq!(parsed, ParsedDecimal { mantissa: u(5), scale: 1 });
        assert!(!parsed.is_integer());
        assert!(parse_decimal("10.000").unwrap().is_integer());
    }
}
