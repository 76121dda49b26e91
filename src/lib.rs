#![allow(clippy::too_many_arguments)]

pub mod compliance;
pub mod core;
pub mod errors;
pub mod input;
pub mod output;
pub mod segments;

#[macro_use]
extern crate is_close;

pub use crate::core::thermal::{calculate_thermal_load, ThermalResult};
pub use crate::errors::{EngineError, ValidationError};
pub use crate::input::{ingest_for_processing, Building, ProjectInput, Scenario};

use crate::compliance::epc::{estimate_epc_rating, EpcEstimate};
use crate::compliance::mees::{mees_gap_analysis, GapPlan};
use crate::compliance::part_l::{part_l_compliance_check, PartLReport};
use crate::compliance::secr::{calculate_carbon_baseline, CarbonBaseline, CarbonBaselineInputs};
use crate::compliance::BuildingCategory;
use crate::output::Output;
use crate::segments::{segment_handler, scenario_catalogue, ComplianceCheck, SegmentKind};
use anyhow::{anyhow, bail};
use csv::WriterBuilder;
use indexmap::IndexMap;
use itertools::Itertools;
use rayon::prelude::*;
use tracing::info;

/// UK annual mean outdoor temperature, used when no weather collaborator
/// supplies a figure.
pub const DEFAULT_OUTDOOR_TEMP_C: f64 = 10.5;

/// MEES planning target band used by segment reports.
const MEES_PLAN_TARGET_BAND: &str = "C";

/// Evaluate every scenario against the building. Scenarios are
/// independent pure evaluations, so they are computed in parallel; the
/// returned list preserves the input ordering.
pub fn run_assessment(
    building: &Building,
    scenarios: &IndexMap<String, Scenario>,
    outdoor_temp_c: f64,
) -> Result<Vec<(String, ThermalResult)>, EngineError> {
    building.check_valid()?;

    let entries: Vec<(&String, &Scenario)> = scenarios.iter().collect();
    let results = entries
        .into_par_iter()
        .map(|(name, scenario)| {
            calculate_thermal_load(building, scenario, outdoor_temp_c)
                .map(|result| (name.clone(), result))
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    Ok(results)
}

/// Compliance results for one building; only the requested checks are
/// populated.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct ComplianceSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epc: Option<EpcEstimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mees: Option<GapPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_l: Option<PartLReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secr: Option<CarbonBaseline>,
}

/// Run the selected compliance checks over the building's physical
/// parameters and its annual energy. The MEES plan takes its current SAP
/// score from the EPC estimate and targets band C.
pub fn run_compliance(
    building: &Building,
    annual_energy_kwh: f64,
    checks: &[ComplianceCheck],
) -> Result<ComplianceSummary, EngineError> {
    building.check_valid()?;
    let category = BuildingCategory::from_tag(&building.building_type);

    let mut summary = ComplianceSummary::default();
    if checks.contains(&ComplianceCheck::Epc) || checks.contains(&ComplianceCheck::Mees) {
        let estimate = estimate_epc_rating(
            building.floor_area_m2,
            annual_energy_kwh,
            building.u_value_wall,
            building.u_value_roof,
            building.u_value_glazing,
            Some(building.glazing_ratio),
            category,
        )?;
        if checks.contains(&ComplianceCheck::Mees) {
            summary.mees = Some(mees_gap_analysis(estimate.sap_score, MEES_PLAN_TARGET_BAND)?);
        }
        if checks.contains(&ComplianceCheck::Epc) {
            summary.epc = Some(estimate);
        }
    }
    for check in checks {
        match check {
            ComplianceCheck::Epc | ComplianceCheck::Mees => {}
            ComplianceCheck::PartL => {
                summary.part_l = Some(part_l_compliance_check(
                    building.u_value_wall,
                    building.u_value_roof,
                    building.u_value_glazing,
                    building.floor_area_m2,
                    annual_energy_kwh,
                    category,
                )?);
            }
            ComplianceCheck::Secr => {
                // The declared annual energy is grid electricity as far as
                // the engine is concerned, consistent with the carbon
                // factor used by the thermal calculator.
                summary.secr = Some(calculate_carbon_baseline(&CarbonBaselineInputs {
                    elec_kwh: annual_energy_kwh,
                    floor_area_m2: Some(building.floor_area_m2),
                    ..Default::default()
                })?);
            }
        }
    }

    Ok(summary)
}

/// Explicit assessment context: which segment, which of its registered
/// buildings, which whitelisted scenarios and what outdoor temperature.
/// Replaces any notion of ambient session state — the engine itself holds
/// none.
#[derive(Clone, Debug)]
pub struct AssessmentContext {
    pub segment: SegmentKind,
    pub building: String,
    pub scenarios: Vec<String>,
    pub outdoor_temp_c: f64,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct SegmentReport {
    /// `None` for ad-hoc project-file assessments outside any segment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<SegmentKind>,
    pub building: String,
    pub results: Vec<(String, ThermalResult)>,
    pub compliance: ComplianceSummary,
}

impl AssessmentContext {
    pub fn run(&self) -> anyhow::Result<SegmentReport> {
        let handler = segment_handler(self.segment);
        let building = handler.building_registry().get(&self.building).ok_or_else(|| {
            anyhow!(
                "unknown building \"{}\" for segment {} (registered: {})",
                self.building,
                self.segment,
                handler.building_registry().keys().join(", ")
            )
        })?;

        let whitelist = handler.scenario_whitelist();
        let mut scenarios = IndexMap::new();
        for name in &self.scenarios {
            if !whitelist.contains(&name.as_str()) {
                bail!(
                    "scenario \"{name}\" is not whitelisted for segment {} (allowed: {})",
                    self.segment,
                    whitelist.iter().join(", ")
                );
            }
            let scenario = scenario_catalogue()
                .get(name)
                .ok_or_else(|| anyhow!("scenario \"{name}\" missing from the catalogue"))?;
            scenarios.insert(name.clone(), scenario.clone());
        }

        info!(
            segment = %self.segment,
            building = %self.building,
            scenario_count = scenarios.len(),
            "running segment assessment"
        );

        let results = run_assessment(building, &scenarios, self.outdoor_temp_c)?;
        let annual_energy_kwh = building.baseline_energy_mwh
            * crate::core::units::KILOWATT_HOURS_PER_MEGAWATT_HOUR as f64;
        let compliance = run_compliance(building, annual_energy_kwh, handler.compliance_checks())?;

        Ok(SegmentReport {
            segment: Some(self.segment),
            building: self.building.clone(),
            results,
            compliance,
        })
    }
}

/// Write the per-scenario results table (CSV) and the compliance summary
/// (JSON) for a set of reports through the given output sink.
pub fn write_assessment_report(
    output: &impl Output,
    reports: &[SegmentReport],
) -> anyhow::Result<()> {
    if output.is_noop() {
        return Ok(());
    }

    let mut writer = WriterBuilder::new().from_writer(output.writer_for_report_key("results.csv")?);
    writer.write_record([
        "building",
        "scenario",
        "baseline_energy_mwh",
        "scenario_energy_mwh",
        "energy_saving_mwh",
        "energy_saving_frac",
        "carbon_saving_t",
        "annual_saving_gbp",
        "install_cost_gbp",
        "payback_years",
        "cost_per_tonne_gbp",
        "renewable_offset_mwh",
    ])?;
    for report in reports {
        for (scenario_name, result) in &report.results {
            writer.write_record([
                report.building.clone(),
                scenario_name.clone(),
                result.baseline_energy_mwh.to_string(),
                result.scenario_energy_mwh.to_string(),
                result.energy_saving_mwh.to_string(),
                result.energy_saving_frac.to_string(),
                result.carbon_saving_t.to_string(),
                result.annual_saving_gbp.to_string(),
                result.install_cost_gbp.to_string(),
                result
                    .payback_years
                    .map(|years| years.to_string())
                    .unwrap_or_default(),
                result
                    .cost_per_tonne_gbp
                    .map(|cost| cost.to_string())
                    .unwrap_or_default(),
                result.renewable_offset_mwh.to_string(),
            ])?;
        }
    }
    writer.flush()?;

    let compliance_writer = output.writer_for_report_key("compliance.json")?;
    let summaries: IndexMap<&String, &ComplianceSummary> = reports
        .iter()
        .map(|report| (&report.building, &report.compliance))
        .collect();
    serde_json::to_writer_pretty(compliance_writer, &summaries)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::SinkOutput;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    pub fn context() -> AssessmentContext {
        AssessmentContext {
            segment: SegmentKind::UniversityHe,
            building: "Campus Library".to_string(),
            scenarios: vec!["Baseline".to_string(), "Fabric Upgrade".to_string()],
            outdoor_temp_c: DEFAULT_OUTDOOR_TEMP_C,
        }
    }

    #[rstest]
    fn assessment_preserves_scenario_ordering(context: AssessmentContext) {
        let report = context.run().unwrap();
        let names: Vec<&str> = report.results.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["Baseline", "Fabric Upgrade"]);
        let (_, baseline) = &report.results[0];
        assert_eq!(baseline.energy_saving_mwh, 0.);
        let (_, fabric) = &report.results[1];
        assert!(fabric.energy_saving_mwh > 0.);
    }

    #[rstest]
    fn segment_report_runs_the_declared_compliance_checks(context: AssessmentContext) {
        let report = context.run().unwrap();
        // University segment: EPC + MEES + SECR, no Part L.
        assert!(report.compliance.epc.is_some());
        assert!(report.compliance.mees.is_some());
        assert!(report.compliance.secr.is_some());
        assert!(report.compliance.part_l.is_none());
    }

    #[rstest]
    fn unknown_building_is_reported_with_candidates(mut context: AssessmentContext) {
        context.building = "Sports Hall".to_string();
        let error = context.run().unwrap_err().to_string();
        assert!(error.contains("Sports Hall"));
        assert!(error.contains("Campus Library"));
    }

    #[rstest]
    fn non_whitelisted_scenario_is_rejected() {
        let context = AssessmentContext {
            segment: SegmentKind::CommercialLandlord,
            building: "City Centre Office".to_string(),
            scenarios: vec!["Deep Retrofit".to_string()],
            outdoor_temp_c: DEFAULT_OUTDOOR_TEMP_C,
        };
        let error = context.run().unwrap_err().to_string();
        assert!(error.contains("not whitelisted"));
    }

    #[rstest]
    fn run_compliance_populates_only_requested_checks() {
        let registry = segment_handler(SegmentKind::IndividualSelfBuild).building_registry();
        let (_, building) = registry.first().unwrap();
        let summary =
            run_compliance(building, 18_000., &[ComplianceCheck::PartL]).unwrap();
        assert!(summary.part_l.is_some());
        assert!(summary.epc.is_none());
        assert!(summary.mees.is_none());
        assert!(summary.secr.is_none());
    }

    #[rstest]
    fn mees_plan_feeds_from_the_epc_estimate() {
        let registry = segment_handler(SegmentKind::CommercialLandlord).building_registry();
        let (_, building) = registry.first().unwrap();
        let summary = run_compliance(
            building,
            building.baseline_energy_mwh * 1_000.,
            &[ComplianceCheck::Epc, ComplianceCheck::Mees],
        )
        .unwrap();
        let epc = summary.epc.unwrap();
        let mees = summary.mees.unwrap();
        assert_eq!(mees.target_sap, 69.);
        assert_eq!(mees.sap_gap, (69. - epc.sap_score).max(0.));
    }

    #[rstest]
    fn report_writing_skips_noop_sinks(context: AssessmentContext) {
        let report = context.run().unwrap();
        write_assessment_report(&SinkOutput, &[report]).unwrap();
    }
}
