//! Supported Currencies
//!
//! Listing prices may be stored in one of a closed set of currencies. The
//! home currency (ETB) is the one the rate provider quotes against.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::SharedError;

/// Currency code a price is stored or displayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Ethiopian Birr, the home currency
    #[default]
    Etb,
    /// US Dollar
    Usd,
    /// UAE Dirham
    Aed,
}

impl Currency {
    /// Every supported currency, home first
    pub const ALL: [Currency; 3] = [Currency::Etb, Currency::Usd, Currency::Aed];

    /// The currency listing prices are natively quoted against
    pub const fn home() -> Self {
        Currency::Etb
    }

    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Etb => "ETB",
            Currency::Usd => "USD",
            Currency::Aed => "AED",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Currency::Etb => "Ethiopian Birr",
            Currency::Usd => "US Dollar",
            Currency::Aed => "UAE Dirham",
        }
    }

    pub fn is_home(&self) -> bool {
        *self == Self::home()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SharedError::validation("currency", format!("Unsupported currency '{}'", s)))
    }
}
