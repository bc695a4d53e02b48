//! Physical Constants for Hydraulic Models
//!
//! Fundamental constants used by the cavitation and efficiency models.

/// Standard gravitational acceleration (m/s²).
///
/// Source: CGPM 1901, ISO 80000-3
pub const GRAVITY_M_PER_S2: f64 = 9.80665;

/// Density of fresh water (kg/m³).
///
/// Nominal value; varies by <0.5% between 0°C and 30°C.
pub const WATER_DENSITY_KG_PER_M3: f64 = 1000.0;

/// Standard atmospheric pressure at sea level (kPa).
///
/// Source: International Standard Atmosphere (ISA)
pub const ATMOSPHERIC_PRESSURE_KPA: f64 = 101.325;

/// Water temperature assumed when none is measured (°C).
pub const DEFAULT_WATER_TEMP_C: f64 = 20.0;

/// Magnus-Tetens prefactor for saturation vapor pressure (kPa).
///
/// `p_v = 0.61078 * exp(17.27 * T / (T + 237.3))`
///
/// Source: Tetens (1930), Murray (1967)
pub const MAGNUS_PREFACTOR_KPA: f64 = 0.61078;

/// Magnus-Tetens temperature coefficient (dimensionless).
pub const MAGNUS_A: f64 = 17.27;

/// Magnus-Tetens temperature offset (°C).
pub const MAGNUS_B_C: f64 = 237.3;

/// Design hydraulic efficiency assumed when none is provided (fraction).
pub const DEFAULT_DESIGN_EFFICIENCY: f64 = 0.92;
