//! Regulatory compliance evaluator: EPC/SAP estimation, MEES gap
//! analysis, Part L 2021 / Future Homes Standard checks and the SECR
//! carbon baseline. Operates purely on physical and energy summary
//! numbers; it has no dependency on the thermal load calculator and can
//! run standalone.

pub mod epc;
pub mod mees;
pub mod part_l;
pub mod secr;

use crate::errors::ValidationError;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Ceiling on plausible annual energy inputs, kWh.
pub const MAX_ANNUAL_ENERGY_KWH: f64 = 100_000_000.;
/// Ceiling on plausible floor areas, m².
pub const MAX_FLOOR_AREA_M2: f64 = 1_000_000.;
/// Ceiling on plausible fabric U-values, W/m²K.
pub const MAX_PLAUSIBLE_U_VALUE: f64 = 6.0;

/// EPC band letters, best to worst. The discriminant is the band's rank
/// in the threshold table.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum EpcBand {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

/// SAP band table: minimum score for each band, descending.
pub const EPC_BANDS: [(f64, EpcBand); 7] = [
    (92., EpcBand::A),
    (81., EpcBand::B),
    (69., EpcBand::C),
    (55., EpcBand::D),
    (39., EpcBand::E),
    (21., EpcBand::F),
    (1., EpcBand::G),
];

impl EpcBand {
    /// Minimum SAP score for this band.
    pub fn threshold(self) -> f64 {
        EPC_BANDS[self as usize].0
    }

    pub fn from_score(score: f64) -> Self {
        EPC_BANDS
            .iter()
            .find(|(threshold, _)| score >= *threshold)
            .map(|(_, band)| *band)
            .unwrap_or(EpcBand::G)
    }

    /// Ordinal distance to a better-or-equal target band; zero when this
    /// band already meets the target.
    pub fn bands_to(self, target: EpcBand) -> u8 {
        (self as u8).saturating_sub(target as u8)
    }
}

impl Display for EpcBand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            EpcBand::A => "A",
            EpcBand::B => "B",
            EpcBand::C => "C",
            EpcBand::D => "D",
            EpcBand::E => "E",
            EpcBand::F => "F",
            EpcBand::G => "G",
        };
        write!(f, "{letter}")
    }
}

impl FromStr for EpcBand {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(EpcBand::A),
            "B" => Ok(EpcBand::B),
            "C" => Ok(EpcBand::C),
            "D" => Ok(EpcBand::D),
            "E" => Ok(EpcBand::E),
            "F" => Ok(EpcBand::F),
            "G" => Ok(EpcBand::G),
            _ => Err(ValidationError::InvalidTargetBand {
                band: s.to_string(),
            }),
        }
    }
}

/// Regulatory target set selector, classified from the free-form
/// `building_type` tag. Residential fabric targets are stricter than
/// non-domestic ones, so the same physical U-values score lower on the
/// residential scale.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum BuildingCategory {
    Residential,
    NonDomestic,
}

impl BuildingCategory {
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.to_lowercase();
        let residential_markers = [
            "self-build",
            "self build",
            "selfbuild",
            "residential",
            "individual",
            "dwelling",
        ];
        if residential_markers.iter().any(|marker| tag.contains(marker)) {
            BuildingCategory::Residential
        } else {
            BuildingCategory::NonDomestic
        }
    }

    pub fn fabric_targets(self) -> &'static FabricTargets {
        match self {
            BuildingCategory::Residential => &DOMESTIC_FABRIC_TARGETS,
            BuildingCategory::NonDomestic => &NON_DOMESTIC_FABRIC_TARGETS,
        }
    }
}

/// Element U-value targets for one regulatory regime, W/m²K.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FabricTargets {
    pub wall: f64,
    pub roof: f64,
    pub glazing: f64,
}

/// Part L 2021 notional dwelling specification.
pub const DOMESTIC_FABRIC_TARGETS: FabricTargets = FabricTargets {
    wall: 0.18,
    roof: 0.11,
    glazing: 1.2,
};

/// Part L 2021 Volume 2, buildings other than dwellings.
pub const NON_DOMESTIC_FABRIC_TARGETS: FabricTargets = FabricTargets {
    wall: 0.26,
    roof: 0.18,
    glazing: 1.6,
};

pub fn validate_floor_area(value: f64) -> Result<(), ValidationError> {
    if value <= 0. {
        return Err(ValidationError::NonPositive {
            field: "floor_area_m2",
            value,
        });
    }
    if value > MAX_FLOOR_AREA_M2 {
        return Err(ValidationError::OutOfRange {
            field: "floor_area_m2",
            value,
            min: 0.,
            max: MAX_FLOOR_AREA_M2,
        });
    }
    Ok(())
}

pub fn validate_u_value(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value <= 0. || value > MAX_PLAUSIBLE_U_VALUE {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min: 0.,
            max: MAX_PLAUSIBLE_U_VALUE,
        });
    }
    Ok(())
}

/// Annual energy figures may legitimately be zero (an unused fuel), but
/// never negative or implausibly large.
pub fn validate_energy_kwh(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value < 0. {
        return Err(ValidationError::Negative { field, value });
    }
    if value > MAX_ANNUAL_ENERGY_KWH {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min: 0.,
            max: MAX_ANNUAL_ENERGY_KWH,
        });
    }
    Ok(())
}
