use crate::error::{Error, EstimatorResult};
use error_stack::report;
use uint::construct_uint;

construct_uint! {
    pub struct U256(4);
}

construct_uint! {
    /// Intermediate width for products of two `U256` values
    pub struct U512(8);
}

impl From<U256> for U512 {
    fn from(value: U256) -> Self {
        let mut words = [0u64; 8];
        words[..4].copy_from_slice(&value.0);
        U512(words)
    }
}

fn narrow(value: U512) -> EstimatorResult<U256> {
    if value.bits() > 256 {
        return Err(report!(Error::Unknown).attach_printable("Result too large to fit in U256"));
    }
    let mut words = [0u64; 4];
    words.copy_from_slice(&value.0[..4]);
    Ok(U256(words))
}

/// Computes `(value * multiplier) / divisor`, truncating toward zero
pub fn mul_div(value: U256, multiplier: U256, divisor: U256) -> EstimatorResult<U256> {
    if divisor.is_zero() {
        return Err(report!(Error::Unknown).attach_printable("Dividing by zero"));
    }
    narrow(U512::from(value) * U512::from(multiplier) / U512::from(divisor))
}

/// Computes `(value * multiplier) / divisor` rounded to the nearest integer, ties up
pub fn mul_div_round_half_up(
    value: U256,
    multiplier: U256,
    divisor: U256,
) -> EstimatorResult<U256> {
    if divisor.is_zero() {
        return Err(report!(Error::Unknown).attach_printable("Dividing by zero"));
    }
    let numerator = U512::from(value) * U512::from(multiplier);
    let divisor = U512::from(divisor);
    let quotient = numerator / divisor;
    let remainder = numerator % divisor;
    let rounded = if remainder * U512::from(2u8) >= divisor {
        quotient + U512::one()
    } else {
        quotient
    };
    narrow(rounded)
}

/// `10^exponent`, failing instead of wrapping
pub fn pow10(exponent: u32) -> EstimatorResult<U256> {
    U256::from(10u8)
        .checked_pow(U256::from(exponent))
        .ok_or_else(|| {
            report!(Error::Unknown).attach_printable(format!("10^{exponent} overflows U256"))
        })
}

/// (De)serializes `U256` as a base-10 string. Plain JSON numbers are accepted on input.
pub mod dec_string {
    use super::U256;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let text = match &raw {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            other => {
                return Err(D::Error::custom(format!(
                    "expected a base-10 integer, got {other}"
                )));
            }
        };
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(D::Error::custom(format!(
                "expected a base-10 integer, got {text:?}"
            )));
        }
        U256::from_dec_str(&text)
            .map_err(|e| D::Error::custom(format!("invalid base-10 integer {text:?}: {e:?}")))
    }
}
