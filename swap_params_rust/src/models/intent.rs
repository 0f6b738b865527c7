use aggregator_models::constants::chains::ChainId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpec {
    /// Token address, or the native asset sentinel
    pub address: String,
    pub decimals: u8,
}

/// What the operator wants to swap, exactly as entered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapIntent {
    pub chain_id: ChainId,
    pub token_in: TokenSpec,
    pub token_out: TokenSpec,
    /// Human-entered decimal amount of `token_in`
    pub amount_in: String,
}

impl SwapIntent {
    pub fn is_native_in(&self) -> bool {
        self.chain_id.is_native_token(&self.token_in.address)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinAmountOut {
    /// Operator-supplied base-unit integer, used verbatim once validated
    Manual(String),
    /// Quote the route and derive it from slippage
    Derived,
}

impl Default for MinAmountOut {
    fn default() -> Self {
        MinAmountOut::Manual("1".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeOptions {
    /// Percentage, `0.5` means 0.5%
    pub slippage: Decimal,
    pub min_amount_out: MinAmountOut,
    pub recipient: String,
    /// Offset from submission time
    pub deadline_minutes: u64,
}

impl TradeOptions {
    /// Absolute deadline in milliseconds since the epoch
    pub fn deadline_at(&self, now_millis: u64) -> u64 {
        now_millis.saturating_add(self.deadline_minutes.saturating_mul(60_000))
    }
}
