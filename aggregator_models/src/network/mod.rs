pub mod client_rate_limit;
pub mod http;

use std::{num::NonZeroU32, time::Duration};

use crate::error::{Error, ModelResult};
use error_stack::report;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitWindow {
    PerSecond(NonZeroU32),
    PerMinute(NonZeroU32),
    Custom { period: Duration },
}

impl RateLimitWindow {
    /// - `<n>s` → PerSecond(n)
    /// - `<n>m` → PerMinute(n)
    /// - `<n>h` → one request every n hours
    /// - `<n>d` → one request every n days
    pub fn from_string(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.len() < 2 {
            return None;
        }

        let (num_str, unit) = s.split_at(s.len() - 1);
        let number = NonZeroU32::new(num_str.parse().ok()?)?;

        match unit {
            "s" => Some(RateLimitWindow::PerSecond(number)),
            "m" => Some(RateLimitWindow::PerMinute(number)),
            "h" => Some(RateLimitWindow::Custom {
                period: Duration::from_secs(number.get() as u64 * 3600),
            }),
            "d" => Some(RateLimitWindow::Custom {
                period: Duration::from_secs(number.get() as u64 * 86400),
            }),
            _ => None,
        }
    }
}

/// Bounds applied to untrusted JSON before handing it to serde
#[derive(Debug, Clone, Copy)]
pub struct JsonLimits {
    pub max_size: usize,
    pub max_depth: usize,
}

/// Walks the raw bytes once and returns the deepest array/object nesting,
/// bailing out as soon as `max_depth` is crossed
fn json_nesting_depth(data: &[u8], max_depth: usize) -> ModelResult<usize> {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut inside_string = false;
    let mut escaped = false;

    for (position, byte) in data.iter().enumerate() {
        if inside_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => inside_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => inside_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
                if deepest > max_depth {
                    return Err(report!(Error::SerdeDeserialize(format!(
                        "JSON depth limit exceeded at position {position}: max {max_depth}"
                    ))));
                }
            }
            b'}' | b']' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    report!(Error::SerdeDeserialize(format!(
                        "Invalid JSON: unmatched closing bracket at position {position}"
                    )))
                })?;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(report!(Error::SerdeDeserialize(format!(
            "Invalid JSON: {depth} unmatched opening brackets"
        ))));
    }
    if inside_string {
        return Err(report!(Error::SerdeDeserialize(
            "Invalid JSON: unterminated string literal".to_string()
        )));
    }

    Ok(deepest)
}

pub fn validate_and_parse_json<T>(data: &[u8], limits: JsonLimits) -> ModelResult<T>
where
    T: DeserializeOwned,
{
    if data.len() > limits.max_size {
        return Err(report!(Error::PayloadTooLarge(format!(
            "{} bytes (max: {})",
            data.len(),
            limits.max_size
        ))));
    }

    json_nesting_depth(data, limits.max_depth)?;

    serde_json::from_slice(data)
        .map_err(|e| report!(Error::SerdeDeserialize(format!("JSON parsing error: {e}"))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const LIMITS: JsonLimits = JsonLimits {
        max_size: 1024,
        max_depth: 3,
    };

    #[test]
    fn test_rate_limit_window_from_string() {
        let five = NonZeroU32::new(5).unwrap();
        assert_eq!(
            RateLimitWindow::from_string("5s"),
            Some(RateLimitWindow::PerSecond(five))
        );
        assert_eq!(
            RateLimitWindow::from_string("5m"),
            Some(RateLimitWindow::PerMinute(five))
        );
        assert_eq!(
            RateLimitWindow::from_string("2h"),
            Some(RateLimitWindow::Custom {
                period: Duration::from_secs(7200)
            })
        );
        assert_eq!(RateLimitWindow::from_string("0s"), None);
        assert_eq!(RateLimitWindow::from_string("s"), None);
        assert_eq!(RateLimitWindow::from_string("10x"), None);
        assert_eq!(RateLimitWindow::from_string(""), None);
    }

    #[test]
    fn test_parse_within_limits() {
        let parsed: Value = validate_and_parse_json(br#"[[{"a": "]]"}]]"#, LIMITS).unwrap();
        assert_eq!(parsed[0][0]["a"], "]]");
    }

    #[test]
    fn test_escaped_quotes_do_not_end_strings() {
        let parsed: Value = validate_and_parse_json(br#"{"a": "x\"[[[["}"#, LIMITS).unwrap();
        assert_eq!(parsed["a"], "x\"[[[[");
    }

    #[test]
    fn test_rejects_deep_nesting() {
        let err = validate_and_parse_json::<Value>(b"[[[[1]]]]", LIMITS).unwrap_err();
        assert!(matches!(err.current_context(), Error::SerdeDeserialize(_)));
    }

    #[test]
    fn test_rejects_oversized_payload() {
        let data = vec![b' '; 2048];
        let err = validate_and_parse_json::<Value>(&data, LIMITS).unwrap_err();
        assert!(matches!(err.current_context(), Error::PayloadTooLarge(_)));
    }

    #[test]
    fn test_rejects_unbalanced_brackets() {
        assert!(validate_and_parse_json::<Value>(b"[[1]", LIMITS).is_err());
        assert!(validate_and_parse_json::<Value>(b"[1]]", LIMITS).is_err());
    }
}
