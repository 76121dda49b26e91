//! Steady-state thermal load calculator.
//!
//! One evaluation takes a building, an intervention scenario and the
//! outdoor temperature, and produces annual energy, carbon and financial
//! figures relative to the building's declared baseline. The physics is a
//! closed-form transmission + infiltration balance with a capped solar
//! credit; the modelled figure is used only as a reduction *ratio* applied
//! to the declared baseline, never reported as the baseline itself.

use crate::core::factors::{
    AIR_VOLUMETRIC_HEAT_CAPACITY_WH_PER_M3_K, ANNUAL_HEATING_HOURS, BASELINE_INFILTRATION_ACH,
    CI_ELECTRICITY_KG_PER_KWH, ELECTRICITY_TARIFF_GBP_PER_KWH, HEATING_SETPOINT_C,
    MIN_CARBON_SAVING_DENOMINATOR_T, MIN_REDUCTION_RATIO, MODEL_DIVERGENCE_WARN_THRESHOLD,
    SOLAR_APERTURE_FACTOR, SOLAR_IRRADIANCE_KWH_PER_M2_YR, SOLAR_USEFUL_FRACTION,
};
use crate::core::geometry::EnvelopeGeometry;
use crate::core::units::{
    kilowatt_hours_to_megawatt_hours, round_to_tenth, watt_hours_to_megawatt_hours,
    KILOWATT_HOURS_PER_MEGAWATT_HOUR,
};
use crate::errors::ValidationError;
use crate::input::{Building, Scenario};
use serde::Serialize;
use tracing::warn;

/// Output of one (building, scenario, weather) evaluation. Ephemeral -
/// recomputed per request, never persisted. Ratios are decimals; callers
/// convert to percentages at the presentation boundary.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ThermalResult {
    pub baseline_energy_mwh: f64,
    pub scenario_energy_mwh: f64,
    pub energy_saving_mwh: f64,
    pub energy_saving_frac: f64,
    pub baseline_carbon_t: f64,
    pub scenario_carbon_t: f64,
    pub carbon_saving_t: f64,
    pub annual_saving_gbp: f64,
    pub install_cost_gbp: f64,
    /// `None` when the scenario produces no positive annual saving:
    /// payback is not calculable, rather than zero or infinite.
    pub payback_years: Option<f64>,
    /// £ per tonne CO2e avoided; `None` when there is no install cost.
    pub cost_per_tonne_gbp: Option<f64>,
    /// On-site generation actually credited against demand.
    pub renewable_offset_mwh: f64,
    /// Modelled-demand ratio applied to the declared baseline, clamped to
    /// [0.35, 1.0].
    pub reduction_ratio: f64,
    /// What the physics formula gives for the unmodified building. Kept
    /// alongside the declared baseline so the model-vs-declared gap is
    /// visible rather than hidden.
    pub modelled_baseline_mwh: f64,
    /// Signed relative gap between modelled and declared baseline.
    pub model_divergence_frac: f64,
    pub u_wall: f64,
    pub u_roof: f64,
    pub u_glazing: f64,
}

pub fn calculate_thermal_load(
    building: &Building,
    scenario: &Scenario,
    outdoor_temp_c: f64,
) -> Result<ThermalResult, ValidationError> {
    building.check_valid()?;

    let geometry = EnvelopeGeometry::of(building);
    let declared_baseline_mwh = building.baseline_energy_mwh;

    let modelled_baseline_mwh =
        modelled_demand_mwh(building, &Scenario::default(), &geometry, outdoor_temp_c);
    let model_divergence_frac =
        (modelled_baseline_mwh - declared_baseline_mwh) / declared_baseline_mwh;
    if model_divergence_frac.abs() > MODEL_DIVERGENCE_WARN_THRESHOLD {
        warn!(
            modelled_baseline_mwh,
            declared_baseline_mwh,
            "steady-state model diverges from the declared baseline; scenario figures are scaled to the declared value"
        );
    }

    let (scenario_energy_mwh, reduction_ratio) = if scenario.is_baseline() {
        // Declared-baseline override: the baseline scenario reproduces the
        // declared figure exactly so displayed baselines stay stable.
        (declared_baseline_mwh, 1.0)
    } else {
        let modelled_mwh = modelled_demand_mwh(building, scenario, &geometry, outdoor_temp_c);
        let reduction_ratio = if modelled_baseline_mwh > f64::EPSILON {
            (modelled_mwh / modelled_baseline_mwh).clamp(MIN_REDUCTION_RATIO, 1.0)
        } else {
            1.0
        };
        let adjusted_mwh = declared_baseline_mwh * reduction_ratio;
        let final_mwh =
            (adjusted_mwh - kilowatt_hours_to_megawatt_hours(scenario.renewable_kwh)).max(0.);
        (final_mwh, reduction_ratio)
    };

    let energy_saving_mwh = declared_baseline_mwh - scenario_energy_mwh;
    let renewable_offset_mwh = declared_baseline_mwh * reduction_ratio - scenario_energy_mwh;

    let annual_saving_gbp = energy_saving_mwh
        * KILOWATT_HOURS_PER_MEGAWATT_HOUR as f64
        * ELECTRICITY_TARIFF_GBP_PER_KWH;
    let carbon_saving_t = round_to_tenth(energy_saving_mwh * CI_ELECTRICITY_KG_PER_KWH);

    let payback_years = (annual_saving_gbp > 0.)
        .then(|| scenario.install_cost_gbp / annual_saving_gbp);
    let cost_per_tonne_gbp = (scenario.install_cost_gbp > 0.).then(|| {
        scenario.install_cost_gbp
            / (energy_saving_mwh * CI_ELECTRICITY_KG_PER_KWH).max(MIN_CARBON_SAVING_DENOMINATOR_T)
    });

    Ok(ThermalResult {
        baseline_energy_mwh: declared_baseline_mwh,
        scenario_energy_mwh,
        energy_saving_mwh,
        energy_saving_frac: energy_saving_mwh / declared_baseline_mwh,
        baseline_carbon_t: round_to_tenth(declared_baseline_mwh * CI_ELECTRICITY_KG_PER_KWH),
        scenario_carbon_t: round_to_tenth(scenario_energy_mwh * CI_ELECTRICITY_KG_PER_KWH),
        carbon_saving_t,
        annual_saving_gbp,
        install_cost_gbp: scenario.install_cost_gbp,
        payback_years,
        cost_per_tonne_gbp,
        renewable_offset_mwh,
        reduction_ratio,
        modelled_baseline_mwh,
        model_divergence_frac,
        u_wall: building.u_value_wall * scenario.u_wall_factor,
        u_roof: building.u_value_roof * scenario.u_roof_factor,
        u_glazing: building.u_value_glazing * scenario.u_glazing_factor,
    })
}

/// Annual heating demand of the building under the scenario's factors, in
/// MWh: fabric transmission plus infiltration over the heating
/// degree-hours, less the credited fraction of solar gain.
fn modelled_demand_mwh(
    building: &Building,
    scenario: &Scenario,
    geometry: &EnvelopeGeometry,
    outdoor_temp_c: f64,
) -> f64 {
    let u_wall = building.u_value_wall * scenario.u_wall_factor;
    let u_roof = building.u_value_roof * scenario.u_roof_factor;
    let u_glazing = building.u_value_glazing * scenario.u_glazing_factor;

    // No cooling-load modelling: the degree difference floors at zero.
    let delta_t = (HEATING_SETPOINT_C - outdoor_temp_c).max(0.);
    let degree_hours = delta_t * ANNUAL_HEATING_HOURS;

    let transmission_wh = (u_wall * geometry.wall_area_m2
        + u_roof * geometry.roof_area_m2
        + u_glazing * geometry.glazing_area_m2)
        * degree_hours;

    let effective_ach = BASELINE_INFILTRATION_ACH * (1.0 - scenario.infiltration_reduction);
    let infiltration_wh =
        AIR_VOLUMETRIC_HEAT_CAPACITY_WH_PER_M3_K * effective_ach * geometry.volume_m3 * degree_hours;

    // Only a fraction of the transmitted solar gain is credited against
    // demand; the rest arrives outside the heating window and is dumped.
    let credited_solar_kwh = SOLAR_IRRADIANCE_KWH_PER_M2_YR
        * geometry.glazing_area_m2
        * SOLAR_APERTURE_FACTOR
        * (1.0 - scenario.solar_gain_reduction)
        * SOLAR_USEFUL_FRACTION;

    (watt_hours_to_megawatt_hours(transmission_wh + infiltration_wh)
        - kilowatt_hours_to_megawatt_hours(credited_solar_kwh))
    .max(0.)
}
