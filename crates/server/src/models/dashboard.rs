//! Aggregate figures for the dashboard widgets.

use std::collections::BTreeMap;

use serde::Serialize;

use hvac_dash_core::{CurrencyCode, Price, RiskBand, RoiAssumptions, RoiProjection};

use super::{Grant, Lead, Settings};

/// How many leads the "recent leads" widget shows.
pub const RECENT_LEADS_LIMIT: usize = 5;

/// Everything the dashboard home page renders, computed server-side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub company_name: Option<String>,
    pub total_leads: usize,
    pub high_risk_leads: usize,
    pub average_risk_score: f64,
    pub risk_bands: RiskBandCounts,
    pub leads_by_status: BTreeMap<String, usize>,
    pub leads_by_territory: BTreeMap<String, usize>,
    /// Newest first.
    pub recent_leads: Vec<Lead>,
    pub grants: GrantTotals,
    pub roi: RoiReport,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskBandCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantTotals {
    pub programs: usize,
    pub eligible: i64,
    pub active: i64,
    pub potential_value: i64,
}

/// ROI projection together with the inputs it was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiReport {
    pub assumptions: RoiAssumptions,
    pub projection: RoiProjection,
    pub currency: CurrencyCode,
    /// Total savings formatted in whole units, e.g. `$1,140`.
    pub display: String,
}

impl RoiReport {
    #[must_use]
    pub fn new(assumptions: RoiAssumptions, currency: CurrencyCode) -> Self {
        let projection = assumptions.project();
        let display = Price::new(projection.total_annual_savings, currency).display_whole();
        Self {
            assumptions,
            projection,
            currency,
            display,
        }
    }

    /// Report using the stored assumptions and currency.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        let currency = settings
            .currency
            .as_deref()
            .and_then(|c| c.parse().ok())
            .unwrap_or_default();
        Self::new(settings.roi_assumptions(), currency)
    }
}

impl RiskBandCounts {
    fn record(&mut self, band: RiskBand) {
        match band {
            RiskBand::Low => self.low += 1,
            RiskBand::Medium => self.medium += 1,
            RiskBand::High => self.high += 1,
        }
    }
}

impl GrantTotals {
    #[must_use]
    pub fn from_grants(grants: &[Grant]) -> Self {
        grants.iter().fold(
            Self {
                programs: grants.len(),
                ..Self::default()
            },
            |mut totals, grant| {
                totals.eligible += i64::from(grant.eligible_count);
                totals.active += i64::from(grant.active_count);
                totals.potential_value += grant.potential_value();
                totals
            },
        )
    }
}

impl DashboardSummary {
    /// Compute the summary from the full lead and grant lists.
    #[must_use]
    pub fn build(leads: &[Lead], grants: &[Grant], settings: &Settings) -> Self {
        let mut risk_bands = RiskBandCounts::default();
        let mut leads_by_status = BTreeMap::new();
        let mut leads_by_territory = BTreeMap::new();
        let mut risk_total: i64 = 0;

        for lead in leads {
            risk_bands.record(lead.risk_band());
            *leads_by_status.entry(lead.status.clone()).or_insert(0) += 1;
            *leads_by_territory
                .entry(lead.territory.clone())
                .or_insert(0) += 1;
            risk_total += i64::from(lead.risk_score);
        }

        #[allow(clippy::cast_precision_loss)] // lead counts stay far below 2^52
        let average_risk_score = if leads.is_empty() {
            0.0
        } else {
            risk_total as f64 / leads.len() as f64
        };

        let mut recent_leads = leads.to_vec();
        recent_leads.sort_by(|a, b| b.id.as_i32().cmp(&a.id.as_i32()));
        recent_leads.truncate(RECENT_LEADS_LIMIT);

        Self {
            company_name: settings.company_name.clone(),
            total_leads: leads.len(),
            high_risk_leads: risk_bands.high,
            average_risk_score,
            risk_bands,
            leads_by_status,
            leads_by_territory,
            recent_leads,
            grants: GrantTotals::from_grants(grants),
            roi: RoiReport::from_settings(settings),
        }
    }
}
