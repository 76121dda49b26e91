//! Physical assumptions and emission/tariff factors used by the thermal
//! load calculator and the carbon baseline. This is the single
//! authoritative constant set (BEIS 2023 / SAP 10.2 basis); annual
//! regulatory updates are made here, never in algorithm code.

/// Internal heating setpoint, CIBSE Guide A comfort criterion.
pub const HEATING_SETPOINT_C: f64 = 21.0;

/// Annual hours over which the heating degree difference is applied.
/// Published UK seasonal assumption; this model is steady-state, not a
/// weather-file integral.
pub const ANNUAL_HEATING_HOURS: f64 = 5_800.;

/// Whole-building infiltration rate for unimproved stock, in air changes
/// per hour. CIBSE Guide A, pre-retrofit naturally-ventilated buildings.
pub const BASELINE_INFILTRATION_ACH: f64 = 1.2;

/// Volumetric heat capacity of air, Wh/(m³·K). SAP 10.2 ventilation heat
/// loss coefficient.
pub const AIR_VOLUMETRIC_HEAT_CAPACITY_WH_PER_M3_K: f64 = 0.33;

/// UK average annual solar irradiance on the glazed facade, kWh/m²/yr.
pub const SOLAR_IRRADIANCE_KWH_PER_M2_YR: f64 = 950.;

/// Fraction of incident irradiance transmitted through glazing and frame.
pub const SOLAR_APERTURE_FACTOR: f64 = 0.4;

/// Fraction of transmitted solar gain credited against heating demand;
/// the remainder is assumed to arrive outside the heating demand window
/// and is dumped as excess heat.
pub const SOLAR_USEFUL_FRACTION: f64 = 0.3;

/// Floor on the modelled-vs-baseline reduction ratio: no intervention may
/// claim more than a 65% real-world improvement.
pub const MIN_REDUCTION_RATIO: f64 = 0.35;

/// Relative model-vs-declared baseline divergence above which a warning
/// is logged alongside the result.
pub const MODEL_DIVERGENCE_WARN_THRESHOLD: f64 = 0.25;

// Emission factors, kg CO2e per kWh. BEIS/DESNZ 2023 conversion factors.
pub const CI_ELECTRICITY_KG_PER_KWH: f64 = 0.20482; // grid average
pub const CI_GAS_KG_PER_KWH: f64 = 0.18316; // natural gas, gross CV
pub const CI_OIL_KG_PER_KWH: f64 = 0.24677; // gas oil, gross CV
pub const CI_LPG_KG_PER_KWH: f64 = 0.21449; // LPG, gross CV

/// kWh-equivalent of one fleet mile (average diesel fleet, BEIS 2023).
/// Fleet emissions are weighted with the gas oil factor.
pub const FLEET_KWH_EQUIVALENT_PER_MILE: f64 = 1.05;

/// Unit electricity tariff, £/kWh. Ofgem 2023 non-domestic average.
pub const ELECTRICITY_TARIFF_GBP_PER_KWH: f64 = 0.245;

/// Floor on the carbon-saving denominator when deriving cost per tonne
/// avoided, in tonnes.
pub const MIN_CARBON_SAVING_DENOMINATOR_T: f64 = 0.01;

/// SAP 10.2 primary energy factor for delivered electricity.
pub const PRIMARY_ENERGY_FACTOR: f64 = 2.5;
