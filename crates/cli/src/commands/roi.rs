//! Print the ROI projection for a set of assumptions.

use hvac_dash_core::{CurrencyCode, RoiAssumptions};
use hvac_dash_server::models::RoiReport;

use super::CliError;

/// Build the report, falling back to the default assumptions for any value
/// not given.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for negative amounts.
pub fn report(
    truck_roll_cost: Option<i64>,
    energy_waste: Option<i64>,
) -> Result<RoiReport, CliError> {
    for (name, value) in [
        ("--truck-roll-cost", truck_roll_cost),
        ("--energy-waste", energy_waste),
    ] {
        if let Some(v) = value.filter(|v| *v < 0) {
            return Err(CliError::InvalidArgument(format!(
                "{name} cannot be negative, got {v}"
            )));
        }
    }

    let defaults = RoiAssumptions::default();
    let assumptions = RoiAssumptions {
        truck_roll_cost: truck_roll_cost.map_or(defaults.truck_roll_cost, Into::into),
        energy_waste_cost: energy_waste.map_or(defaults.energy_waste_cost, Into::into),
    };

    Ok(RoiReport::new(assumptions, CurrencyCode::default()))
}

/// Print the projection to stdout.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for negative amounts.
pub fn run(truck_roll_cost: Option<i64>, energy_waste: Option<i64>) -> Result<(), CliError> {
    let report = report(truck_roll_cost, energy_waste)?;
    let projection = report.projection;

    #[allow(clippy::print_stdout)]
    {
        println!(
            "Truck roll savings:  {} (12 x {} x 30%)",
            projection.truck_roll_savings, report.assumptions.truck_roll_cost
        );
        println!(
            "Energy savings:      {} ({} x 20%)",
            projection.energy_savings, report.assumptions.energy_waste_cost
        );
        println!("Total annual savings: {}", report.display);
    }

    Ok(())
}
