use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Which leg of the swap pays the partner fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChargeFeeBy {
    CurrencyIn,
    CurrencyOut,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    pub charge_fee_by: ChargeFeeBy,
    pub fee_receiver: String,
    /// Basis points when `is_in_bps`, otherwise a decimal amount of the charged leg
    pub fee_amount: String,
    pub is_in_bps: bool,
}

impl FeeConfig {
    pub fn charges_input(&self) -> bool {
        self.charge_fee_by == ChargeFeeBy::CurrencyIn
    }

    pub fn charges_output(&self) -> bool {
        self.charge_fee_by == ChargeFeeBy::CurrencyOut
    }

    /// Decimals of the leg the fee is charged against
    pub fn leg_decimals(&self, decimals_in: u8, decimals_out: u8) -> u8 {
        match self.charge_fee_by {
            ChargeFeeBy::CurrencyIn => decimals_in,
            ChargeFeeBy::CurrencyOut => decimals_out,
        }
    }
}

/// Fee as sent to the encoding endpoint. Flat amounts are already in base units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeDescriptor {
    pub charge_fee_by: ChargeFeeBy,
    pub fee_receiver: String,
    pub fee_amount: String,
    pub is_in_bps: bool,
}
