//! Part L 2021 limiting-fabric check and Future Homes Standard readiness.

use crate::compliance::{validate_energy_kwh, validate_floor_area, BuildingCategory};
use crate::core::factors::PRIMARY_ENERGY_FACTOR;
use crate::errors::ValidationError;
use itertools::Itertools;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Future Homes Standard ceiling on delivered energy intensity,
/// kWh/m²/yr. Readiness is judged on delivered energy; the primary-energy
/// estimate is reported alongside for information.
pub const FHS_DELIVERED_ENERGY_CEILING_KWH_M2: f64 = 35.0;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum FabricElement {
    Wall,
    Roof,
    Glazing,
}

impl Display for FabricElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FabricElement::Wall => "External wall",
            FabricElement::Roof => "Roof",
            FabricElement::Glazing => "Glazing",
        };
        write!(f, "{name}")
    }
}

/// One element's verdict. The gap is signed and reported even when the
/// element complies (a negative gap is headroom).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComplianceItem {
    pub element: FabricElement,
    pub actual_u: f64,
    pub target_u: f64,
    pub pass: bool,
    pub gap: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PartLReport {
    /// True only if every fabric element meets its limiting U-value.
    pub part_l_2021_pass: bool,
    pub fhs_ready: bool,
    pub primary_energy_est_kwh_m2: f64,
    pub fhs_threshold_kwh_m2: f64,
    pub regs_label: &'static str,
    pub compliance_items: Vec<ComplianceItem>,
    pub overall_verdict: String,
    pub improvement_actions: Vec<String>,
}

pub fn part_l_compliance_check(
    u_wall: f64,
    u_roof: f64,
    u_glazing: f64,
    floor_area_m2: f64,
    annual_energy_kwh: f64,
    building_type: BuildingCategory,
) -> Result<PartLReport, ValidationError> {
    validate_floor_area(floor_area_m2)?;
    validate_energy_kwh("annual_energy_kwh", annual_energy_kwh)?;
    for (field, value) in [
        ("u_wall", u_wall),
        ("u_roof", u_roof),
        ("u_glazing", u_glazing),
    ] {
        if value <= 0. {
            return Err(ValidationError::NonPositive { field, value });
        }
    }

    let targets = building_type.fabric_targets();
    let compliance_items: Vec<ComplianceItem> = [
        (FabricElement::Wall, u_wall, targets.wall),
        (FabricElement::Roof, u_roof, targets.roof),
        (FabricElement::Glazing, u_glazing, targets.glazing),
    ]
    .into_iter()
    .map(|(element, actual_u, target_u)| ComplianceItem {
        element,
        actual_u,
        target_u,
        pass: actual_u <= target_u,
        gap: actual_u - target_u,
    })
    .collect();

    let eui_kwh_m2 = annual_energy_kwh / floor_area_m2;
    let primary_energy_est_kwh_m2 = eui_kwh_m2 * PRIMARY_ENERGY_FACTOR;
    let fhs_ready = eui_kwh_m2 <= FHS_DELIVERED_ENERGY_CEILING_KWH_M2;
    let part_l_2021_pass = compliance_items.iter().all(|item| item.pass);

    let mut improvement_actions: Vec<String> = compliance_items
        .iter()
        .filter(|item| !item.pass)
        .map(|item| {
            format!(
                "Upgrade {} to achieve U <= {:.2} W/m²K (currently {:.2}, gap {:.2})",
                item.element.to_string().to_lowercase(),
                item.target_u,
                item.actual_u,
                item.gap,
            )
        })
        .collect();
    if !fhs_ready {
        improvement_actions.push(format!(
            "Reduce delivered energy intensity to <= {FHS_DELIVERED_ENERGY_CEILING_KWH_M2:.0} kWh/m²/yr for Future Homes Standard readiness (currently {eui_kwh_m2:.0})"
        ));
    }

    let overall_verdict = if part_l_2021_pass && fhs_ready {
        "Compliant with the Part L 2021 limiting fabric values and within the Future Homes Standard energy ceiling.".to_string()
    } else if part_l_2021_pass {
        "Fabric meets the Part L 2021 limiting values, but delivered energy exceeds the Future Homes Standard ceiling.".to_string()
    } else {
        let failing = compliance_items
            .iter()
            .filter(|item| !item.pass)
            .map(|item| item.element.to_string().to_lowercase())
            .join(", ");
        format!("Does not meet the Part L 2021 limiting fabric values: {failing} out of specification.")
    };

    Ok(PartLReport {
        part_l_2021_pass,
        fhs_ready,
        primary_energy_est_kwh_m2,
        fhs_threshold_kwh_m2: FHS_DELIVERED_ENERGY_CEILING_KWH_M2,
        regs_label: regs_label(building_type),
        compliance_items,
        overall_verdict,
        improvement_actions,
    })
}

fn regs_label(building_type: BuildingCategory) -> &'static str {
    match building_type {
        BuildingCategory::Residential => "Part L 2021 (England) — new dwellings",
        BuildingCategory::NonDomestic => "Part L 2021 (England) — buildings other than dwellings",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn compliant_residential_build_passes_with_no_actions() {
        let report = part_l_compliance_check(
            0.18,
            0.11,
            1.2,
            120.,
            4_200.,
            BuildingCategory::Residential,
        )
        .unwrap();
        assert!(report.part_l_2021_pass);
        assert!(report.fhs_ready);
        assert!(report.compliance_items.iter().all(|item| item.pass));
        assert_eq!(report.improvement_actions, Vec::<String>::new());
    }

    #[rstest]
    fn non_compliant_build_fails_with_actions() {
        let report = part_l_compliance_check(
            1.6,
            2.0,
            2.8,
            120.,
            18_000.,
            BuildingCategory::Residential,
        )
        .unwrap();
        assert!(!report.part_l_2021_pass);
        assert!(!report.fhs_ready);
        let failing = report
            .compliance_items
            .iter()
            .filter(|item| !item.pass)
            .count();
        assert_eq!(failing, 3);
        // One action per failing element plus one for FHS.
        assert_eq!(report.improvement_actions.len(), 4);
        assert!(!report.overall_verdict.is_empty());
    }

    #[rstest]
    fn gap_is_signed_and_reported_when_compliant() {
        let report = part_l_compliance_check(
            0.50,
            0.30,
            2.0,
            120.,
            12_000.,
            BuildingCategory::Residential,
        )
        .unwrap();
        let wall = report
            .compliance_items
            .iter()
            .find(|item| item.element == FabricElement::Wall)
            .unwrap();
        assert_relative_eq!(wall.gap, 0.50 - 0.18, max_relative = 1e-9);

        let compliant = part_l_compliance_check(
            0.15,
            0.11,
            1.2,
            120.,
            4_000.,
            BuildingCategory::Residential,
        )
        .unwrap();
        let wall = compliant
            .compliance_items
            .iter()
            .find(|item| item.element == FabricElement::Wall)
            .unwrap();
        assert!(wall.pass);
        assert_relative_eq!(wall.gap, -0.03, max_relative = 1e-9);
    }

    #[rstest]
    fn primary_energy_is_estimated_from_delivered_energy() {
        let report = part_l_compliance_check(
            0.18,
            0.11,
            1.2,
            100.,
            10_000.,
            BuildingCategory::Residential,
        )
        .unwrap();
        assert_relative_eq!(report.primary_energy_est_kwh_m2, 250.0, max_relative = 1e-9);
        assert_eq!(report.fhs_threshold_kwh_m2, 35.);
    }

    #[rstest]
    fn non_domestic_targets_are_looser() {
        let report = part_l_compliance_check(
            0.25,
            0.15,
            1.4,
            500.,
            50_000.,
            BuildingCategory::NonDomestic,
        )
        .unwrap();
        assert!(report.part_l_2021_pass);

        let domestic = part_l_compliance_check(
            0.25,
            0.15,
            1.4,
            500.,
            50_000.,
            BuildingCategory::Residential,
        )
        .unwrap();
        assert!(!domestic.part_l_2021_pass);
    }

    #[rstest]
    fn rejects_non_positive_floor_area() {
        let result =
            part_l_compliance_check(0.18, 0.11, 1.2, 0., 10_000., BuildingCategory::Residential);
        assert_eq!(
            result,
            Err(ValidationError::NonPositive {
                field: "floor_area_m2",
                value: 0.
            })
        );
    }

    #[rstest]
    fn rejects_non_positive_u_value() {
        let result = part_l_compliance_check(
            -0.5,
            0.11,
            1.2,
            120.,
            10_000.,
            BuildingCategory::Residential,
        );
        assert_eq!(
            result,
            Err(ValidationError::NonPositive {
                field: "u_wall",
                value: -0.5
            })
        );
    }

    #[rstest]
    fn regs_label_tracks_the_category() {
        let residential = part_l_compliance_check(
            0.18,
            0.11,
            1.2,
            120.,
            4_200.,
            BuildingCategory::Residential,
        )
        .unwrap();
        assert!(residential.regs_label.contains("dwellings"));
        let non_domestic = part_l_compliance_check(
            0.18,
            0.11,
            1.2,
            120.,
            4_200.,
            BuildingCategory::NonDomestic,
        )
        .unwrap();
        assert!(non_domestic.regs_label.contains("other than dwellings"));
    }
}
