//! Customer-segment capability: each segment carries a static building
//! registry, a scenario whitelist and the compliance checks its report
//! runs. Handlers are selected through an explicit enum-keyed table built
//! at startup — no runtime name resolution.

use crate::input::{Building, Scenario};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum SegmentKind {
    UniversityHe,
    CommercialLandlord,
    SmbIndustrial,
    IndividualSelfBuild,
}

impl SegmentKind {
    pub const ALL: [SegmentKind; 4] = [
        SegmentKind::UniversityHe,
        SegmentKind::CommercialLandlord,
        SegmentKind::SmbIndustrial,
        SegmentKind::IndividualSelfBuild,
    ];

    pub fn id(self) -> &'static str {
        match self {
            SegmentKind::UniversityHe => "university_he",
            SegmentKind::CommercialLandlord => "commercial_landlord",
            SegmentKind::SmbIndustrial => "smb_industrial",
            SegmentKind::IndividualSelfBuild => "individual_selfbuild",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }
}

impl Display for SegmentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Which compliance sub-operations a segment's report runs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum ComplianceCheck {
    Epc,
    Mees,
    PartL,
    Secr,
}

pub trait SegmentHandler: Send + Sync {
    fn display_label(&self) -> &'static str;
    fn building_registry(&self) -> &IndexMap<String, Building>;
    fn scenario_whitelist(&self) -> &'static [&'static str];
    fn compliance_checks(&self) -> &'static [ComplianceCheck];
}

pub fn segment_handler(kind: SegmentKind) -> &'static dyn SegmentHandler {
    SEGMENT_REGISTRY
        .get(&kind)
        .expect("segment registry is built over every SegmentKind")
        .as_ref()
}

/// Scenario catalogue shared across segments; each segment whitelists the
/// subset applicable to its stock.
pub fn scenario_catalogue() -> &'static IndexMap<String, Scenario> {
    &SCENARIO_CATALOGUE
}

struct UniversityHeSegment;
struct CommercialLandlordSegment;
struct SmbIndustrialSegment;
struct IndividualSelfBuildSegment;

impl SegmentHandler for UniversityHeSegment {
    fn display_label(&self) -> &'static str {
        "University / Higher Education"
    }

    fn building_registry(&self) -> &IndexMap<String, Building> {
        &UNIVERSITY_BUILDINGS
    }

    fn scenario_whitelist(&self) -> &'static [&'static str] {
        &[
            "Baseline",
            "Fabric Upgrade",
            "Solar Glass",
            "Heat Pump + Solar PV",
            "Deep Retrofit",
        ]
    }

    fn compliance_checks(&self) -> &'static [ComplianceCheck] {
        &[ComplianceCheck::Epc, ComplianceCheck::Mees, ComplianceCheck::Secr]
    }
}

impl SegmentHandler for CommercialLandlordSegment {
    fn display_label(&self) -> &'static str {
        "Commercial Landlord"
    }

    fn building_registry(&self) -> &IndexMap<String, Building> {
        &LANDLORD_BUILDINGS
    }

    fn scenario_whitelist(&self) -> &'static [&'static str] {
        &["Baseline", "Fabric Upgrade", "Solar Glass"]
    }

    fn compliance_checks(&self) -> &'static [ComplianceCheck] {
        &[ComplianceCheck::Epc, ComplianceCheck::Mees]
    }
}

impl SegmentHandler for SmbIndustrialSegment {
    fn display_label(&self) -> &'static str {
        "SMB Industrial"
    }

    fn building_registry(&self) -> &IndexMap<String, Building> {
        &INDUSTRIAL_BUILDINGS
    }

    fn scenario_whitelist(&self) -> &'static [&'static str] {
        &["Baseline", "Fabric Upgrade", "Heat Pump + Solar PV"]
    }

    fn compliance_checks(&self) -> &'static [ComplianceCheck] {
        &[ComplianceCheck::PartL, ComplianceCheck::Secr]
    }
}

impl SegmentHandler for IndividualSelfBuildSegment {
    fn display_label(&self) -> &'static str {
        "Individual Self-Build"
    }

    fn building_registry(&self) -> &IndexMap<String, Building> {
        &SELF_BUILD_BUILDINGS
    }

    fn scenario_whitelist(&self) -> &'static [&'static str] {
        &[
            "Baseline",
            "Fabric Upgrade",
            "Heat Pump + Solar PV",
            "Deep Retrofit",
        ]
    }

    fn compliance_checks(&self) -> &'static [ComplianceCheck] {
        &[ComplianceCheck::PartL]
    }
}

fn building(
    floor_area_m2: f64,
    height_m: f64,
    glazing_ratio: f64,
    u_value_wall: f64,
    u_value_roof: f64,
    u_value_glazing: f64,
    baseline_energy_mwh: f64,
    occupancy_hours: f64,
    description: &str,
    built_year: &str,
    building_type: &str,
) -> Building {
    Building {
        floor_area_m2,
        height_m,
        glazing_ratio,
        u_value_wall,
        u_value_roof,
        u_value_glazing,
        baseline_energy_mwh,
        occupancy_hours,
        description: description.to_string(),
        built_year: built_year.to_string(),
        building_type: building_type.to_string(),
    }
}

lazy_static! {
    static ref UNIVERSITY_BUILDINGS: IndexMap<String, Building> = IndexMap::from([
        (
            "Campus Library".to_string(),
            building(
                8_500., 4.5, 0.35, 1.8, 2.1, 2.8, 487., 3_500.,
                "Main campus library — five floors, heavily glazed",
                "Pre-1990",
                "Library / Learning Hub",
            ),
        ),
        (
            "Arts & Humanities Building".to_string(),
            building(
                11_200., 5.0, 0.28, 2.1, 1.9, 3.1, 623., 4_000.,
                "Humanities faculty with lecture theatres",
                "Pre-1985",
                "Teaching / Lecture",
            ),
        ),
        (
            "Science Block".to_string(),
            building(
                6_800., 4.0, 0.30, 1.6, 1.7, 2.6, 391., 3_200.,
                "Science laboratories, lab-heavy usage",
                "Pre-1995",
                "Laboratory / Research",
            ),
        ),
    ]);

    static ref LANDLORD_BUILDINGS: IndexMap<String, Building> = IndexMap::from([
        (
            "City Centre Office".to_string(),
            building(
                2_400., 3.2, 0.40, 1.7, 1.8, 2.8, 288., 2_600.,
                "Multi-let office over six storeys",
                "Pre-2000",
                "Office / Multi-let",
            ),
        ),
        (
            "Retail Parade Unit".to_string(),
            building(
                850., 3.5, 0.45, 2.0, 2.2, 3.0, 96., 3_100.,
                "Ground-floor retail with full-height shopfront glazing",
                "Pre-1995",
                "Retail",
            ),
        ),
    ]);

    static ref INDUSTRIAL_BUILDINGS: IndexMap<String, Building> = IndexMap::from([
        (
            "Fabrication Workshop".to_string(),
            building(
                1_800., 6.0, 0.10, 2.3, 2.5, 3.4, 265., 2_400.,
                "Steel-framed workshop, minimal glazing",
                "Pre-1990",
                "Industrial / Fabrication",
            ),
        ),
        (
            "Distribution Warehouse".to_string(),
            building(
                5_200., 8.0, 0.08, 2.4, 2.6, 3.5, 540., 2_000.,
                "High-bay warehouse with dock doors",
                "Pre-2005",
                "Industrial / Storage",
            ),
        ),
    ]);

    static ref SELF_BUILD_BUILDINGS: IndexMap<String, Building> = IndexMap::from([
        (
            "3-Bed Detached (120 m²)".to_string(),
            building(
                120., 2.7, 0.20, 1.6, 2.0, 2.8, 18.0, 5_500.,
                "Typical self-build three-bed detached",
                "Pre-2021",
                "Residential / Self-Build",
            ),
        ),
        (
            "2-Bed Semi-Detached (85 m²)".to_string(),
            building(
                85., 2.6, 0.18, 1.8, 2.2, 3.0, 12.5, 5_500.,
                "Typical self-build two-bed semi",
                "Pre-2021",
                "Residential / Self-Build",
            ),
        ),
    ]);

    static ref SCENARIO_CATALOGUE: IndexMap<String, Scenario> = IndexMap::from([
        ("Baseline".to_string(), Scenario::default()),
        (
            "Fabric Upgrade".to_string(),
            Scenario {
                u_wall_factor: 0.6,
                u_roof_factor: 0.6,
                u_glazing_factor: 0.4,
                infiltration_reduction: 0.30,
                install_cost_gbp: 50_000.,
                ..Default::default()
            },
        ),
        (
            "Solar Glass".to_string(),
            Scenario {
                u_glazing_factor: 0.55,
                solar_gain_reduction: 0.15,
                infiltration_reduction: 0.05,
                renewable_kwh: 42_000.,
                install_cost_gbp: 280_000.,
                ..Default::default()
            },
        ),
        (
            "Heat Pump + Solar PV".to_string(),
            Scenario {
                renewable_kwh: 65_000.,
                install_cost_gbp: 120_000.,
                ..Default::default()
            },
        ),
        (
            "Deep Retrofit".to_string(),
            Scenario {
                u_wall_factor: 0.35,
                u_roof_factor: 0.30,
                u_glazing_factor: 0.35,
                solar_gain_reduction: 0.10,
                infiltration_reduction: 0.50,
                renewable_kwh: 30_000.,
                install_cost_gbp: 450_000.,
                ..Default::default()
            },
        ),
    ]);

    static ref SEGMENT_REGISTRY: IndexMap<SegmentKind, Box<dyn SegmentHandler>> = {
        let mut registry: IndexMap<SegmentKind, Box<dyn SegmentHandler>> = IndexMap::new();
        registry.insert(SegmentKind::UniversityHe, Box::new(UniversityHeSegment));
        registry.insert(
            SegmentKind::CommercialLandlord,
            Box::new(CommercialLandlordSegment),
        );
        registry.insert(SegmentKind::SmbIndustrial, Box::new(SmbIndustrialSegment));
        registry.insert(
            SegmentKind::IndividualSelfBuild,
            Box::new(IndividualSelfBuildSegment),
        );
        registry
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn registry_covers_every_segment() {
        for kind in SegmentKind::ALL {
            let handler = segment_handler(kind);
            assert!(!handler.display_label().is_empty());
            assert!(!handler.building_registry().is_empty());
            assert!(!handler.compliance_checks().is_empty());
        }
    }

    #[rstest]
    fn segment_ids_round_trip() {
        for kind in SegmentKind::ALL {
            assert_eq!(SegmentKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(SegmentKind::from_id("real_estate_developer"), None);
    }

    #[rstest]
    fn every_registered_building_is_valid() {
        for kind in SegmentKind::ALL {
            for (name, building) in segment_handler(kind).building_registry() {
                assert!(
                    building.check_valid().is_ok(),
                    "registry building {name} is invalid"
                );
            }
        }
    }

    #[rstest]
    fn every_whitelist_entry_resolves_and_includes_the_baseline() {
        for kind in SegmentKind::ALL {
            let whitelist = segment_handler(kind).scenario_whitelist();
            assert!(whitelist.contains(&"Baseline"));
            for name in whitelist {
                assert!(
                    scenario_catalogue().contains_key(*name),
                    "whitelisted scenario {name} missing from catalogue"
                );
            }
        }
    }

    #[rstest]
    fn catalogue_baseline_is_the_identity_scenario() {
        assert!(scenario_catalogue()["Baseline"].is_baseline());
        assert!(!scenario_catalogue()["Deep Retrofit"].is_baseline());
    }

    #[rstest]
    fn self_build_segment_runs_part_l_only() {
        let checks = segment_handler(SegmentKind::IndividualSelfBuild).compliance_checks();
        assert_eq!(checks, &[ComplianceCheck::PartL]);
    }
}
