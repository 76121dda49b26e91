use crate::compliance::MAX_PLAUSIBLE_U_VALUE;
use crate::errors::{EngineError, ValidationError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use std::io::{BufReader, Read};

/// Plausible bounds on the supplied outdoor temperature, °C.
const OUTDOOR_TEMP_RANGE_C: (f64, f64) = (-50., 50.);

pub fn ingest_for_processing(json: impl Read) -> Result<ProjectInput, EngineError> {
    let input: ProjectInput = serde_json::from_reader(BufReader::new(json))?;
    input.building.check_valid()?;
    let (min, max) = OUTDOOR_TEMP_RANGE_C;
    if !(min..=max).contains(&input.outdoor_temp_c) {
        return Err(EngineError::InvalidRequest(ValidationError::OutOfRange {
            field: "outdoor_temp_c",
            value: input.outdoor_temp_c,
            min,
            max,
        }));
    }
    for (name, scenario) in &input.scenarios {
        scenario.validate().map_err(|errors| {
            EngineError::InvalidProject(format!("scenario \"{name}\": {errors}"))
        })?;
    }

    Ok(input)
}

/// One assessment request as read from a project file: a building, the
/// intervention scenarios to evaluate against it, and the outdoor
/// temperature supplied by the weather collaborator.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectInput {
    pub building: Building,
    pub scenarios: IndexMap<String, Scenario>,
    pub outdoor_temp_c: f64,
}

/// Physical description of one structure. Constructed once from a
/// registry or an input form and immutable thereafter; the engine never
/// mutates it. Envelope areas are derived (see
/// [`crate::core::geometry::EnvelopeGeometry`]), never stored.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Building {
    pub floor_area_m2: f64,
    pub height_m: f64,
    /// Fraction of the external facade that is glazed.
    pub glazing_ratio: f64,
    pub u_value_wall: f64,
    pub u_value_roof: f64,
    pub u_value_glazing: f64,
    /// Declared measured/estimated annual consumption. The baseline
    /// scenario reproduces this figure exactly rather than re-deriving it
    /// from the physics formula.
    pub baseline_energy_mwh: f64,
    pub occupancy_hours: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub built_year: String,
    /// Free-form tag; drives which regulatory target set the compliance
    /// evaluator selects (see [`crate::compliance::BuildingCategory`]).
    pub building_type: String,
}

impl Building {
    /// Fail-fast validation with the offending field name and value.
    /// Out-of-range inputs are errors, never clamped.
    pub fn check_valid(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("floor_area_m2", self.floor_area_m2),
            ("height_m", self.height_m),
            ("baseline_energy_mwh", self.baseline_energy_mwh),
            ("occupancy_hours", self.occupancy_hours),
        ] {
            if value <= 0. {
                return Err(ValidationError::NonPositive { field, value });
            }
        }
        if self.glazing_ratio <= 0. || self.glazing_ratio >= 1. {
            return Err(ValidationError::OutOfRange {
                field: "glazing_ratio",
                value: self.glazing_ratio,
                min: 0.,
                max: 1.,
            });
        }
        for (field, value) in [
            ("u_value_wall", self.u_value_wall),
            ("u_value_roof", self.u_value_roof),
            ("u_value_glazing", self.u_value_glazing),
        ] {
            if value <= 0. || value > MAX_PLAUSIBLE_U_VALUE {
                return Err(ValidationError::OutOfRange {
                    field,
                    value,
                    min: 0.,
                    max: MAX_PLAUSIBLE_U_VALUE,
                });
            }
        }

        Ok(())
    }
}

/// An intervention definition, independent of any building. Multiplicative
/// factors apply to the building's own U-values; reductions to its solar
/// gain and infiltration. Static configuration, read-only once loaded.
///
/// Factors above 1.0 (an intervention that worsens performance) are
/// accepted and reported faithfully, not rejected.
#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default = "default_unity_factor")]
    #[validate(exclusive_minimum = 0.)]
    #[validate(maximum = 5.)]
    pub u_wall_factor: f64,
    #[serde(default = "default_unity_factor")]
    #[validate(exclusive_minimum = 0.)]
    #[validate(maximum = 5.)]
    pub u_roof_factor: f64,
    #[serde(default = "default_unity_factor")]
    #[validate(exclusive_minimum = 0.)]
    #[validate(maximum = 5.)]
    pub u_glazing_factor: f64,
    #[serde(default)]
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub solar_gain_reduction: f64,
    #[serde(default)]
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub infiltration_reduction: f64,
    /// Annual on-site generation credited against demand, kWh.
    #[serde(default)]
    #[validate(minimum = 0.)]
    pub renewable_kwh: f64,
    #[serde(default)]
    #[validate(minimum = 0.)]
    pub install_cost_gbp: f64,
}

fn default_unity_factor() -> f64 {
    1.0
}

impl Default for Scenario {
    /// The distinguished baseline scenario: identity factors, no
    /// reductions, no generation, no cost.
    fn default() -> Self {
        Self {
            u_wall_factor: 1.0,
            u_roof_factor: 1.0,
            u_glazing_factor: 1.0,
            solar_gain_reduction: 0.0,
            infiltration_reduction: 0.0,
            renewable_kwh: 0.0,
            install_cost_gbp: 0.0,
        }
    }
}

impl Scenario {
    /// Whether this is the distinguished baseline scenario, for which the
    /// calculator returns the building's declared baseline energy
    /// unchanged instead of the modelled figure.
    pub fn is_baseline(&self) -> bool {
        is_close!(self.u_wall_factor, 1.0)
            && is_close!(self.u_roof_factor, 1.0)
            && is_close!(self.u_glazing_factor, 1.0)
            && is_close!(self.solar_gain_reduction, 0.0)
            && is_close!(self.infiltration_reduction, 0.0)
            && self.renewable_kwh == 0.0
            && self.install_cost_gbp == 0.0
    }
}
