pub const WATTS_PER_KILOWATT: u32 = 1_000;
pub const KILOWATT_HOURS_PER_MEGAWATT_HOUR: u32 = 1_000;
pub const WATT_HOURS_PER_MEGAWATT_HOUR: u32 = 1_000_000;
pub const KILOGRAMS_PER_TONNE: u32 = 1_000;
pub const HOURS_PER_DAY: u32 = 24;
pub const DAYS_PER_YEAR: u32 = 365;

pub(crate) fn watt_hours_to_megawatt_hours(watt_hours: f64) -> f64 {
    watt_hours / WATT_HOURS_PER_MEGAWATT_HOUR as f64
}

pub(crate) fn kilowatt_hours_to_megawatt_hours(kilowatt_hours: f64) -> f64 {
    kilowatt_hours / KILOWATT_HOURS_PER_MEGAWATT_HOUR as f64
}

/// Round to one decimal place, as carbon tonnages are reported.
pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.).round() / 10.
}
