use serde::{Deserialize, Serialize};

use crate::EngineError;

/// ISO currency code carried by users and their expenses.
///
/// The engine never converts between currencies: an expense must be declared
/// in the currency of the user who owns it.
///
/// ## Minor units
///
/// Amounts are stored as an `i64` number of **minor units** (see `Amount`).
/// Every supported currency uses 2 fraction digits, so `10.50 USD` ⇄ `1050`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Rub,
}

impl Currency {
    /// Canonical currency code, also used as display label.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Rub => "RUB",
        }
    }

    /// Number of fraction digits used when formatting amounts.
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Usd | Currency::Eur | Currency::Rub => 2,
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    /// Parses a raw code coming from an untrusted boundary (request body,
    /// storage row).
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "RUB" => Ok(Currency::Rub),
            _ => Err(EngineError::UnrecognizedCurrency(value.to_string())),
        }
    }
}
