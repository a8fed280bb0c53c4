//! The per-instant trajectory record shared by every segment kind.

use serde::Serialize;

/// Flight phase category passed through to the propulsion model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlightPhase {
    Takeoff,
    Climb,
    Cruise,
    Idle,
}

/// One instant of a simulated trajectory.
///
/// Every field is optional: a segment fills in what it knows and leaves the
/// rest unset. Unset fields are skipped on serialization and compare equal
/// only to other unset fields, so missing data never leaks into arithmetic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlightPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub true_airspeed_m_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equivalent_airspeed_m_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mach: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mass_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ground_distance_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cl: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_phase: Option<FlightPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thrust_n: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thrust_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sfc_kg_n_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slope_angle_rad: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceleration_m_s2: Option<f64>,
}
