//! Type-safe price representation using decimal arithmetic.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price from a whole-unit amount.
    #[must_use]
    pub fn whole(amount: i64, currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::from(amount), currency_code)
    }

    /// Format rounded to whole units with thousands separators (e.g., "$1,140").
    #[must_use]
    pub fn display_whole(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let units = rounded.mantissa();
        let sign = if units < 0 { "-" } else { "" };
        format!(
            "{sign}{}{}",
            self.currency_code.symbol(),
            group_thousands(units.unsigned_abs())
        )
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

/// Insert a comma between each group of three digits.
fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    CAD,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::CAD | Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::CAD => "CAD",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CAD" => Ok(Self::CAD),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            _ => Err(format!("unsupported currency: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_whole_groups_thousands() {
        assert_eq!(Price::whole(1140, CurrencyCode::CAD).display_whole(), "$1,140");
        assert_eq!(Price::whole(12_500, CurrencyCode::CAD).display_whole(), "$12,500");
        assert_eq!(
            Price::whole(1_000_000, CurrencyCode::USD).display_whole(),
            "$1,000,000"
        );
        assert_eq!(Price::whole(900, CurrencyCode::CAD).display_whole(), "$900");
    }

    #[test]
    fn test_display_whole_rounds_half_away_from_zero() {
        let price = Price::new(Decimal::new(11395, 1), CurrencyCode::CAD);
        assert_eq!(price.display_whole(), "$1,140");

        let price = Price::new(Decimal::new(-25, 1), CurrencyCode::CAD);
        assert_eq!(price.display_whole(), "-$3");
    }

    #[test]
    fn test_display_two_decimals() {
        let price = Price::new(Decimal::new(1999, 2), CurrencyCode::GBP);
        assert_eq!(price.to_string(), "£19.99");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("cad".parse::<CurrencyCode>().unwrap(), CurrencyCode::CAD);
        assert!("JPY".parse::<CurrencyCode>().is_err());
    }
}
