//! SECR scope-1/scope-2 carbon baseline from annual fuel consumption and
//! fleet mileage, with reporting-threshold flags.

use crate::compliance::{validate_energy_kwh, validate_floor_area};
use crate::core::factors::{
    CI_ELECTRICITY_KG_PER_KWH, CI_GAS_KG_PER_KWH, CI_LPG_KG_PER_KWH, CI_OIL_KG_PER_KWH,
    FLEET_KWH_EQUIVALENT_PER_MILE,
};
use crate::core::units::KILOGRAMS_PER_TONNE;
use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};

/// Total footprint above which customers and investors typically start
/// asking for reduction plans, tCO2e.
pub const SUPPLY_CHAIN_PRESSURE_THRESHOLD_T: f64 = 50.0;
/// Annual energy above which the SECR large-undertaking energy test
/// applies, kWh.
pub const MANDATORY_REPORTING_ENERGY_KWH: f64 = 40_000.0;
/// Ceiling on plausible annual fleet mileage.
const MAX_FLEET_MILES: f64 = 10_000_000.;

/// Annual activity data for one organisation. All energies in kWh;
/// unused fuels stay at zero.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct CarbonBaselineInputs {
    pub elec_kwh: f64,
    pub gas_kwh: f64,
    pub oil_kwh: f64,
    pub lpg_kwh: f64,
    pub fleet_miles: f64,
    pub floor_area_m2: Option<f64>,
}

/// Per-fuel emission breakdown, tCO2e.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FuelBreakdown {
    pub electricity_scope2_tco2e: f64,
    pub gas_scope1_tco2e: f64,
    pub oil_scope1_tco2e: f64,
    pub lpg_scope1_tco2e: f64,
    pub fleet_scope1_tco2e: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SecrThresholdCheck {
    pub mandatory_reporter: bool,
    pub supply_chain_pressure: bool,
    pub pas2060_candidacy: bool,
    pub note: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CarbonBaseline {
    pub scope1_tco2e: f64,
    pub scope2_tco2e: f64,
    pub total_tco2e: f64,
    pub breakdown: FuelBreakdown,
    /// kg CO2e per m² of floor area; `None` when no area was given.
    pub intensity_kgco2_m2: Option<f64>,
    /// Sum of all fuel kWh, including the fleet kWh-equivalent.
    pub annual_energy_kwh: f64,
    pub secr_threshold_check: SecrThresholdCheck,
}

pub fn calculate_carbon_baseline(
    inputs: &CarbonBaselineInputs,
) -> Result<CarbonBaseline, ValidationError> {
    validate_energy_kwh("elec_kwh", inputs.elec_kwh)?;
    validate_energy_kwh("gas_kwh", inputs.gas_kwh)?;
    validate_energy_kwh("oil_kwh", inputs.oil_kwh)?;
    validate_energy_kwh("lpg_kwh", inputs.lpg_kwh)?;
    if inputs.fleet_miles < 0. {
        return Err(ValidationError::Negative {
            field: "fleet_miles",
            value: inputs.fleet_miles,
        });
    }
    if inputs.fleet_miles > MAX_FLEET_MILES {
        return Err(ValidationError::OutOfRange {
            field: "fleet_miles",
            value: inputs.fleet_miles,
            min: 0.,
            max: MAX_FLEET_MILES,
        });
    }
    if let Some(floor_area_m2) = inputs.floor_area_m2 {
        validate_floor_area(floor_area_m2)?;
    }

    let kg_per_tonne = KILOGRAMS_PER_TONNE as f64;
    let fleet_kwh = inputs.fleet_miles * FLEET_KWH_EQUIVALENT_PER_MILE;
    let breakdown = FuelBreakdown {
        electricity_scope2_tco2e: inputs.elec_kwh * CI_ELECTRICITY_KG_PER_KWH / kg_per_tonne,
        gas_scope1_tco2e: inputs.gas_kwh * CI_GAS_KG_PER_KWH / kg_per_tonne,
        oil_scope1_tco2e: inputs.oil_kwh * CI_OIL_KG_PER_KWH / kg_per_tonne,
        lpg_scope1_tco2e: inputs.lpg_kwh * CI_LPG_KG_PER_KWH / kg_per_tonne,
        // Diesel fleet is weighted with the gas oil factor.
        fleet_scope1_tco2e: fleet_kwh * CI_OIL_KG_PER_KWH / kg_per_tonne,
    };

    let scope1_tco2e = breakdown.gas_scope1_tco2e
        + breakdown.oil_scope1_tco2e
        + breakdown.lpg_scope1_tco2e
        + breakdown.fleet_scope1_tco2e;
    let scope2_tco2e = breakdown.electricity_scope2_tco2e;
    let total_tco2e = scope1_tco2e + scope2_tco2e;
    let annual_energy_kwh =
        inputs.elec_kwh + inputs.gas_kwh + inputs.oil_kwh + inputs.lpg_kwh + fleet_kwh;

    Ok(CarbonBaseline {
        scope1_tco2e,
        scope2_tco2e,
        total_tco2e,
        breakdown,
        intensity_kgco2_m2: inputs
            .floor_area_m2
            .map(|area| total_tco2e * kg_per_tonne / area),
        annual_energy_kwh,
        secr_threshold_check: threshold_check(total_tco2e, annual_energy_kwh),
    })
}

fn threshold_check(total_tco2e: f64, annual_energy_kwh: f64) -> SecrThresholdCheck {
    let mandatory_reporter = annual_energy_kwh > MANDATORY_REPORTING_ENERGY_KWH;
    let supply_chain_pressure = total_tco2e > SUPPLY_CHAIN_PRESSURE_THRESHOLD_T;
    let pas2060_candidacy = total_tco2e > 0.;

    let mut notes = vec![format!("Total footprint {total_tco2e:.1} tCO2e.")];
    notes.push(if mandatory_reporter {
        format!(
            "Annual energy exceeds {MANDATORY_REPORTING_ENERGY_KWH:.0} kWh: SECR disclosure applies if the company meets the large-undertaking tests."
        )
    } else {
        "Below the SECR energy threshold for large undertakings.".to_string()
    });
    if supply_chain_pressure {
        notes.push(format!(
            "Footprint exceeds {SUPPLY_CHAIN_PRESSURE_THRESHOLD_T:.0} tCO2e: expect supply-chain and tender carbon-disclosure requests."
        ));
    }
    if pas2060_candidacy {
        notes.push(
            "A quantified baseline exists, so PAS 2060 carbon-neutrality certification is open."
                .to_string(),
        );
    }

    SecrThresholdCheck {
        mandatory_reporter,
        supply_chain_pressure,
        pas2060_candidacy,
        note: notes.join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn zero_inputs_produce_zero_emissions() {
        let baseline = calculate_carbon_baseline(&CarbonBaselineInputs::default()).unwrap();
        assert_eq!(baseline.total_tco2e, 0.);
        assert_eq!(baseline.scope1_tco2e, 0.);
        assert_eq!(baseline.scope2_tco2e, 0.);
        assert_eq!(baseline.annual_energy_kwh, 0.);
        assert!(!baseline.secr_threshold_check.pas2060_candidacy);
    }

    #[rstest]
    fn electricity_is_scope_2_at_the_grid_factor() {
        let baseline = calculate_carbon_baseline(&CarbonBaselineInputs {
            elec_kwh: 1_000_000.,
            ..Default::default()
        })
        .unwrap();
        assert_relative_eq!(baseline.scope2_tco2e, 204.82, max_relative = 1e-3);
        assert_eq!(baseline.scope1_tco2e, 0.);
    }

    #[rstest]
    fn gas_is_scope_1() {
        let baseline = calculate_carbon_baseline(&CarbonBaselineInputs {
            gas_kwh: 1_000_000.,
            ..Default::default()
        })
        .unwrap();
        assert_relative_eq!(baseline.scope1_tco2e, 183.16, max_relative = 1e-3);
        assert_eq!(baseline.scope2_tco2e, 0.);
    }

    #[rstest]
    fn scopes_are_attributed_per_fuel() {
        let baseline = calculate_carbon_baseline(&CarbonBaselineInputs {
            elec_kwh: 100_000.,
            gas_kwh: 80_000.,
            ..Default::default()
        })
        .unwrap();
        assert_relative_eq!(
            baseline.scope2_tco2e,
            100_000. * CI_ELECTRICITY_KG_PER_KWH / 1_000.,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            baseline.scope1_tco2e,
            80_000. * CI_GAS_KG_PER_KWH / 1_000.,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            baseline.total_tco2e,
            baseline.scope1_tco2e + baseline.scope2_tco2e,
            max_relative = 1e-9
        );
    }

    #[rstest]
    fn fleet_miles_contribute_to_scope_1() {
        let without_fleet = calculate_carbon_baseline(&CarbonBaselineInputs {
            gas_kwh: 50_000.,
            ..Default::default()
        })
        .unwrap();
        let with_fleet = calculate_carbon_baseline(&CarbonBaselineInputs {
            gas_kwh: 50_000.,
            fleet_miles: 10_000.,
            ..Default::default()
        })
        .unwrap();
        assert!(with_fleet.scope1_tco2e > without_fleet.scope1_tco2e);
        assert_relative_eq!(
            with_fleet.breakdown.fleet_scope1_tco2e,
            10_000. * FLEET_KWH_EQUIVALENT_PER_MILE * CI_OIL_KG_PER_KWH / 1_000.,
            max_relative = 1e-9
        );
    }

    #[rstest]
    fn intensity_requires_a_floor_area() {
        let with_area = calculate_carbon_baseline(&CarbonBaselineInputs {
            elec_kwh: 100_000.,
            floor_area_m2: Some(500.),
            ..Default::default()
        })
        .unwrap();
        let intensity = with_area.intensity_kgco2_m2.unwrap();
        assert_relative_eq!(
            intensity,
            with_area.total_tco2e * 1_000. / 500.,
            max_relative = 1e-9
        );

        let without_area = calculate_carbon_baseline(&CarbonBaselineInputs {
            elec_kwh: 100_000.,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(without_area.intensity_kgco2_m2, None);
    }

    #[rstest]
    fn annual_energy_aggregates_all_fuels() {
        let baseline = calculate_carbon_baseline(&CarbonBaselineInputs {
            elec_kwh: 50_000.,
            gas_kwh: 30_000.,
            oil_kwh: 10_000.,
            ..Default::default()
        })
        .unwrap();
        assert_relative_eq!(baseline.annual_energy_kwh, 90_000., max_relative = 1e-9);
    }

    #[rstest]
    fn supply_chain_pressure_flags_above_fifty_tonnes() {
        let large = calculate_carbon_baseline(&CarbonBaselineInputs {
            elec_kwh: 300_000.,
            ..Default::default()
        })
        .unwrap();
        let small = calculate_carbon_baseline(&CarbonBaselineInputs {
            elec_kwh: 10_000.,
            ..Default::default()
        })
        .unwrap();
        assert!(large.secr_threshold_check.supply_chain_pressure);
        assert!(large.secr_threshold_check.mandatory_reporter);
        assert!(!small.secr_threshold_check.supply_chain_pressure);
        assert!(!small.secr_threshold_check.mandatory_reporter);
        assert!(!large.secr_threshold_check.note.is_empty());
    }

    #[rstest]
    fn negative_energy_is_rejected() {
        let result = calculate_carbon_baseline(&CarbonBaselineInputs {
            elec_kwh: -1.,
            ..Default::default()
        });
        assert_eq!(
            result,
            Err(ValidationError::Negative {
                field: "elec_kwh",
                value: -1.
            })
        );
    }

    #[rstest]
    fn non_positive_floor_area_is_rejected() {
        let result = calculate_carbon_baseline(&CarbonBaselineInputs {
            elec_kwh: 100_000.,
            floor_area_m2: Some(-50.),
            ..Default::default()
        });
        assert!(matches!(
            result,
            Err(ValidationError::NonPositive {
                field: "floor_area_m2",
                ..
            })
        ));
    }
}
