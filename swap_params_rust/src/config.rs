use crate::error::{Error, EstimatorResult};
use crate::routers::constants::{DEFAULT_SWAP_PARAMETERS_PATH, KYBERSWAP_BASE_API_URL};
use aggregator_models::network::RateLimitWindow;
use error_stack::report;
use std::num::NonZeroU32;

pub const API_URL_VAR: &str = "KYBERSWAP_API_URL";
pub const SWAP_PARAMETERS_PATH_VAR: &str = "KYBERSWAP_SWAP_PARAMETERS_PATH";
pub const CLIENT_ID_VAR: &str = "KYBERSWAP_CLIENT_ID";
pub const RATE_LIMIT_VAR: &str = "KYBERSWAP_RATE_LIMIT";
pub const RATE_LIMIT_BURST_VAR: &str = "KYBERSWAP_RATE_LIMIT_BURST";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapParamsConfig {
    pub api_url: String,
    /// Path segment of the encoding endpoint, after the chain slug
    pub swap_parameters_path: String,
    pub client_id: Option<String>,
    pub rate_limit: Option<RateLimitWindow>,
    pub rate_limit_burst: Option<NonZeroU32>,
}

impl Default for SwapParamsConfig {
    fn default() -> Self {
        Self {
            api_url: KYBERSWAP_BASE_API_URL.to_string(),
            swap_parameters_path: DEFAULT_SWAP_PARAMETERS_PATH.to_string(),
            client_id: None,
            rate_limit: None,
            rate_limit_burst: None,
        }
    }
}

impl SwapParamsConfig {
    /// Reads the process environment. Call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> EstimatorResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> EstimatorResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let api_url = var(API_URL_VAR)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(report!(Error::ConfigError(format!(
                "{API_URL_VAR} must be an http(s) url, got {api_url:?}"
            ))));
        }

        let swap_parameters_path = var(SWAP_PARAMETERS_PATH_VAR)
            .map(|path| path.trim_matches('/').to_string())
            .unwrap_or(defaults.swap_parameters_path);

        let rate_limit = match var(RATE_LIMIT_VAR) {
            Some(raw) => Some(RateLimitWindow::from_string(&raw).ok_or_else(|| {
                report!(Error::ConfigError(format!(
                    "{RATE_LIMIT_VAR} must look like 10s, 100m, 1h or 1d, got {raw:?}"
                )))
            })?),
            None => None,
        };

        let rate_limit_burst = match var(RATE_LIMIT_BURST_VAR) {
            Some(raw) => Some(
                raw.parse::<u32>()
                    .ok()
                    .and_then(NonZeroU32::new)
                    .ok_or_else(|| {
                        report!(Error::ConfigError(format!(
                            "{RATE_LIMIT_BURST_VAR} must be a positive integer, got {raw:?}"
                        )))
                    })?,
            ),
            None => None,
        };

        Ok(Self {
            api_url,
            swap_parameters_path,
            client_id: var(CLIENT_ID_VAR),
            rate_limit,
            rate_limit_burst,
        })
    }
}
