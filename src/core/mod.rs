pub mod factors;
pub mod geometry;
pub mod thermal;
pub mod units;
