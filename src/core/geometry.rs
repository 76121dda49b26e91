use crate::input::Building;
use serde::Serialize;

/// Envelope areas and volume derived from the building's plan footprint.
///
/// Geometry is always derived, never stored: a square-plan perimeter of
/// `4·√floor_area` with the facade split between opaque wall and glazing
/// by the glazing ratio. This keeps the area fields internally consistent
/// with the footprint by construction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EnvelopeGeometry {
    pub perimeter_m: f64,
    pub wall_area_m2: f64,
    pub glazing_area_m2: f64,
    pub roof_area_m2: f64,
    pub volume_m3: f64,
}

impl EnvelopeGeometry {
    pub fn of(building: &Building) -> Self {
        let perimeter_m = 4.0 * building.floor_area_m2.sqrt();
        let facade_area_m2 = perimeter_m * building.height_m;

        Self {
            perimeter_m,
            wall_area_m2: facade_area_m2 * (1.0 - building.glazing_ratio),
            glazing_area_m2: facade_area_m2 * building.glazing_ratio,
            roof_area_m2: building.floor_area_m2,
            volume_m3: building.floor_area_m2 * building.height_m,
        }
    }
}
