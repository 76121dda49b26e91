//! MEES gap-to-target planning: given a current SAP score and a target
//! band, walk an ordered catalogue of retrofit measures until the
//! projected score meets the band threshold.

use crate::compliance::EpcBand;
use crate::errors::ValidationError;
use serde::Serialize;

/// One retrofit measure: expected SAP-point lift, installed cost range
/// and the regulation or scheme that governs it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RetrofitMeasure {
    pub name: &'static str,
    pub sap_lift: f64,
    pub cost_low_gbp: u32,
    pub cost_high_gbp: u32,
    pub regulation: &'static str,
}

/// Measure catalogue in recommended install order (quick wins first).
pub const MEES_MEASURES: [RetrofitMeasure; 8] = [
    RetrofitMeasure {
        name: "LED lighting upgrade",
        sap_lift: 3.0,
        cost_low_gbp: 1_500,
        cost_high_gbp: 6_000,
        regulation: "MEES / EPC recommendation report",
    },
    RetrofitMeasure {
        name: "Heating controls (TRVs and zoning)",
        sap_lift: 4.0,
        cost_low_gbp: 800,
        cost_high_gbp: 3_500,
        regulation: "Part L 2021",
    },
    RetrofitMeasure {
        name: "Loft insulation top-up to 300 mm",
        sap_lift: 6.0,
        cost_low_gbp: 1_000,
        cost_high_gbp: 4_000,
        regulation: "Part L 2021",
    },
    RetrofitMeasure {
        name: "Cavity wall insulation",
        sap_lift: 8.0,
        cost_low_gbp: 2_500,
        cost_high_gbp: 9_000,
        regulation: "Part L 2021",
    },
    RetrofitMeasure {
        name: "Condensing boiler replacement",
        sap_lift: 9.0,
        cost_low_gbp: 3_000,
        cost_high_gbp: 7_500,
        regulation: "Boiler Plus 2018",
    },
    RetrofitMeasure {
        name: "Double glazing throughout",
        sap_lift: 7.0,
        cost_low_gbp: 6_000,
        cost_high_gbp: 15_000,
        regulation: "Part L 2021",
    },
    RetrofitMeasure {
        name: "Solar PV (4 kWp)",
        sap_lift: 10.0,
        cost_low_gbp: 5_500,
        cost_high_gbp: 9_000,
        regulation: "MCS / Smart Export Guarantee",
    },
    RetrofitMeasure {
        name: "Air-source heat pump",
        sap_lift: 12.0,
        cost_low_gbp: 8_000,
        cost_high_gbp: 16_000,
        regulation: "Boiler Upgrade Scheme",
    },
];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GapPlan {
    pub target_band: EpcBand,
    pub target_sap: f64,
    /// SAP points short of the target; zero when already compliant.
    pub sap_gap: f64,
    pub recommended_measures: Vec<RetrofitMeasure>,
    pub total_cost_low_gbp: u32,
    pub total_cost_high_gbp: u32,
    /// Whether the catalogue's total lift can close the gap at all.
    pub achievable: bool,
}

pub fn mees_gap_analysis(current_sap: f64, target_band: &str) -> Result<GapPlan, ValidationError> {
    let target_band: EpcBand = target_band.parse()?;
    let target_sap = target_band.threshold();

    let sap_gap = (target_sap - current_sap).max(0.);
    if sap_gap == 0. {
        return Ok(GapPlan {
            target_band,
            target_sap,
            sap_gap,
            recommended_measures: Vec::new(),
            total_cost_low_gbp: 0,
            total_cost_high_gbp: 0,
            achievable: true,
        });
    }

    // Greedy walk of the catalogue in order until the projected lift
    // closes the gap; bounded by the catalogue size.
    let mut recommended_measures = Vec::new();
    let mut accumulated_lift = 0.;
    for measure in MEES_MEASURES {
        if accumulated_lift >= sap_gap {
            break;
        }
        accumulated_lift += measure.sap_lift;
        recommended_measures.push(measure);
    }

    Ok(GapPlan {
        target_band,
        target_sap,
        sap_gap,
        total_cost_low_gbp: recommended_measures.iter().map(|m| m.cost_low_gbp).sum(),
        total_cost_high_gbp: recommended_measures.iter().map(|m| m.cost_high_gbp).sum(),
        achievable: accumulated_lift >= sap_gap,
        recommended_measures,
    })
}
