// https://docs.kyberswap.com/kyberswap-solutions/kyberswap-aggregator/aggregator-api-specification
pub const KYBERSWAP_BASE_API_URL: &str = "https://aggregator-api.kyberswap.com";

pub const DEFAULT_SWAP_PARAMETERS_PATH: &str = "swap-parameters";

pub const KYBERSWAP_ROUTER_ADDRESS: &str = "0xdf1a1b60f2d438842916c0adc43748768353ec25";

pub const DEFAULT_DEADLINE_MINUTES: u64 = 20;

pub const CLIENT_ID_HEADER: &str = "x-client-id";
