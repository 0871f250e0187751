//! Static subscription tiers shown on the pricing page.

use serde::Serialize;

use hvac_dash_core::{CurrencyCode, Price};

/// A subscription tier. Prices are monthly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub name: &'static str,
    pub monthly_price: Price,
    /// Formatted price, e.g. `$3,000`.
    pub display_price: String,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub cta: &'static str,
    /// Rendered as the recommended tier.
    pub highlight: bool,
}

impl PricingTier {
    fn new(
        name: &'static str,
        amount: i64,
        description: &'static str,
        features: &'static [&'static str],
        cta: &'static str,
        highlight: bool,
    ) -> Self {
        let monthly_price = Price::whole(amount, CurrencyCode::CAD);
        Self {
            name,
            display_price: monthly_price.display_whole(),
            monthly_price,
            description,
            features,
            cta,
            highlight,
        }
    }

    /// All tiers, cheapest first.
    #[must_use]
    pub fn all() -> Vec<Self> {
        vec![
            Self::new(
                "Starter",
                1_000,
                "Essential digital twin capabilities for small teams.",
                &[
                    "Basic Digital Twin Models",
                    "5 User Accounts",
                    "Standard Support",
                    "Weekly Reports",
                ],
                "Get Started",
                false,
            ),
            Self::new(
                "GTA Enterprise Implementation",
                3_000,
                "Full compliance & optimization suite for Toronto HVAC.",
                &[
                    "All Starter Features",
                    "GTA Regulatory Compliance Suite",
                    "Grid Peak-Shaving Integration",
                    "Enbridge Rebate Auto-Filing",
                    "Priority 24/7 Support",
                    "Advanced Risk Analytics",
                ],
                "Contact Sales",
                true,
            ),
            Self::new(
                "Enterprise",
                10_000,
                "Custom solutions for large-scale operations.",
                &[
                    "Everything in GTA Enterprise",
                    "Custom API Integration",
                    "Dedicated Account Manager",
                    "On-premise Deployment Option",
                    "White-label Branding",
                    "Unlimited Users",
                ],
                "Contact Sales",
                false,
            ),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_one_highlighted_tier() {
        let tiers = PricingTier::all();
        assert_eq!(tiers.len(), 3);
        let highlighted: Vec<_> = tiers.iter().filter(|t| t.highlight).collect();
        assert_eq!(highlighted.len(), 1);
        assert_eq!(highlighted.first().unwrap().name, "GTA Enterprise Implementation");
    }

    #[test]
    fn test_display_prices() {
        let prices: Vec<_> = PricingTier::all()
            .into_iter()
            .map(|t| t.display_price)
            .collect();
        assert_eq!(prices, vec!["$1,000", "$3,000", "$10,000"]);
    }
}
