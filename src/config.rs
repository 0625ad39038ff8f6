use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{AmortizationError, Result};

/// largest supported number of decimal places for the rounding unit
pub const MAX_CURRENCY_SCALE: u32 = 10;

/// amortization configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationConfig {
    /// decimal places of the smallest currency unit (2 for cents)
    #[serde(default = "default_currency_scale")]
    pub currency_scale: u32,
}

fn default_currency_scale() -> u32 {
    2
}

impl Default for AmortizationConfig {
    fn default() -> Self {
        Self::cents()
    }
}

impl AmortizationConfig {
    /// round to hundredths (yuan/fen, dollar/cent)
    pub fn cents() -> Self {
        Self {
            currency_scale: default_currency_scale(),
        }
    }

    /// round to whole units, for currencies without a minor unit
    pub fn whole_units() -> Self {
        Self { currency_scale: 0 }
    }

    /// parse and validate a json configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.currency_scale > MAX_CURRENCY_SCALE {
            return Err(AmortizationError::configuration(format!(
                "currency scale {} exceeds maximum {}",
                self.currency_scale, MAX_CURRENCY_SCALE
            )));
        }
        Ok(())
    }

    /// round a finalized amount to the currency unit, half-up
    pub fn round(&self, amount: Money) -> Money {
        amount.round_to(self.currency_scale)
    }
}
