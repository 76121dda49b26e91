//! EPC band estimation. A SAP-like 0-100 score is derived from energy-use
//! intensity and fabric U-values relative to the regulatory targets for
//! the building's category; this is an approximation for screening, not
//! the statutory SAP/SBEM calculation.

use crate::compliance::{
    validate_energy_kwh, validate_floor_area, validate_u_value, BuildingCategory, EpcBand,
};
use crate::errors::ValidationError;
use serde::Serialize;

/// Points of score lost per kWh/m²/yr of energy-use intensity.
const EUI_SCORE_SLOPE: f64 = 0.18;
/// Points lost per unit of relative U-value excess over target.
const ELEMENT_PENALTY_WEIGHT: f64 = 4.0;
/// Cap on the score penalty any single fabric element can attract.
const ELEMENT_PENALTY_CAP: f64 = 8.0;
/// Assumed glazed fraction of the facade when none is supplied.
const DEFAULT_GLAZING_RATIO: f64 = 0.30;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EpcEstimate {
    pub sap_score: f64,
    pub epc_band: EpcBand,
    pub eui_kwh_m2: f64,
    /// Band E or better: lettable under MEES today.
    pub mees_compliant_now: bool,
    /// Band C or better: meets the proposed 2028 MEES floor.
    pub mees_2028_compliant: bool,
    /// Ordinal band distance to C; zero when already C or better.
    pub mees_gap_bands: u8,
    pub recommendation: String,
}

pub fn estimate_epc_rating(
    floor_area_m2: f64,
    annual_energy_kwh: f64,
    u_wall: f64,
    u_roof: f64,
    u_glazing: f64,
    glazing_ratio: Option<f64>,
    building_type: BuildingCategory,
) -> Result<EpcEstimate, ValidationError> {
    validate_floor_area(floor_area_m2)?;
    validate_energy_kwh("annual_energy_kwh", annual_energy_kwh)?;
    validate_u_value("u_wall", u_wall)?;
    validate_u_value("u_roof", u_roof)?;
    validate_u_value("u_glazing", u_glazing)?;
    let glazing_ratio = glazing_ratio.unwrap_or(DEFAULT_GLAZING_RATIO);
    if glazing_ratio <= 0. || glazing_ratio >= 1. {
        return Err(ValidationError::OutOfRange {
            field: "glazing_ratio",
            value: glazing_ratio,
            min: 0.,
            max: 1.,
        });
    }

    let eui_kwh_m2 = annual_energy_kwh / floor_area_m2;
    let targets = building_type.fabric_targets();

    // More glazing gives the glazing element proportionally more influence
    // on the score.
    let glazing_weight = glazing_ratio / DEFAULT_GLAZING_RATIO;
    let fabric_penalty = element_penalty(u_wall, targets.wall, 1.0)
        + element_penalty(u_roof, targets.roof, 1.0)
        + element_penalty(u_glazing, targets.glazing, glazing_weight);

    let sap_score = (100. - eui_kwh_m2 * EUI_SCORE_SLOPE - fabric_penalty).clamp(1., 100.);
    let epc_band = EpcBand::from_score(sap_score);

    let mees_gap_bands = epc_band.bands_to(EpcBand::C);
    Ok(EpcEstimate {
        sap_score,
        epc_band,
        eui_kwh_m2,
        mees_compliant_now: epc_band <= EpcBand::E,
        mees_2028_compliant: epc_band <= EpcBand::C,
        mees_gap_bands,
        recommendation: recommendation_for(epc_band, mees_gap_bands),
    })
}

fn element_penalty(actual_u: f64, target_u: f64, weight: f64) -> f64 {
    let relative_excess = ((actual_u - target_u) / target_u).max(0.);
    (relative_excess * ELEMENT_PENALTY_WEIGHT * weight).min(ELEMENT_PENALTY_CAP)
}

fn recommendation_for(band: EpcBand, gap_bands: u8) -> String {
    match band {
        EpcBand::A | EpcBand::B => {
            "Performance is ahead of the 2028 MEES trajectory; maintain the fabric and review again at the next regulatory update.".to_string()
        }
        EpcBand::C => {
            "Meets the proposed 2028 MEES floor; modest fabric or controls upgrades would build headroom against future tightening.".to_string()
        }
        EpcBand::D | EpcBand::E => format!(
            "Lettable under MEES today but {gap_bands} band(s) short of the proposed 2028 floor of band C; plan fabric upgrades within this review cycle."
        ),
        EpcBand::F | EpcBand::G => format!(
            "Below the current MEES minimum of band E: the property cannot be lawfully let without improvement or a registered exemption. {gap_bands} band(s) short of band C."
        ),
    }
}
