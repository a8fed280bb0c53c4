//! Propulsion model interface consumed by the mission segments, plus a
//! simple parametric turbofan for tests and quick studies.

use mission_atmosphere::Atmosphere;
use mission_core::FlightPhase;
use mission_core::constants::SEA_LEVEL_DENSITY;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PropulsionError {
    #[error("thrust rate must lie in (0, 1], got {0}")]
    InvalidThrustRate(f64),
    #[error("propulsion model failure: {0}")]
    Model(String),
}

/// How the engine is being commanded for one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThrustSetting {
    /// Required net thrust (N); the model reports the rate achieving it.
    Thrust(f64),
    /// Throttle ratio in (0, 1]; the model reports the resulting thrust.
    ThrustRate(f64),
}

/// Engine response at one operating point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnginePerformance {
    /// Specific fuel consumption (kg·N⁻¹·s⁻¹).
    pub sfc_kg_n_s: f64,
    /// Realized throttle ratio.
    pub thrust_rate: f64,
    /// Realized net thrust (N).
    pub thrust_n: f64,
}

/// Black-box propulsion collaborator.
///
/// Implementations must be side-effect-free with respect to the segment's
/// state and reentrant, so a single model can back several segments at once.
pub trait PropulsionModel {
    /// Engine behavior at the given flight condition, commanded either by
    /// thrust or by thrust rate (exactly one, carried by `setting`).
    fn compute_flight_point(
        &self,
        mach: f64,
        altitude_m: f64,
        phase: FlightPhase,
        setting: ThrustSetting,
    ) -> Result<EnginePerformance, PropulsionError>;
}

/// Parametric turbofan: sea-level static thrust derated by the ambient
/// density ratio, SFC rising mildly with Mach, idle heavily derated.
#[derive(Debug, Clone)]
pub struct SimpleTurbofan {
    pub max_thrust_n: f64,
    pub cruise_sfc_kg_n_s: f64,
}

impl SimpleTurbofan {
    fn available_thrust(&self, altitude_m: f64, phase: FlightPhase) -> f64 {
        let density_ratio = Atmosphere::new(altitude_m).density_kg_m3 / SEA_LEVEL_DENSITY;
        let phase_factor = match phase {
            FlightPhase::Idle => 0.07,
            _ => 1.0,
        };
        self.max_thrust_n * density_ratio * phase_factor
    }

    fn sfc(&self, mach: f64) -> f64 {
        self.cruise_sfc_kg_n_s * (0.7 + 0.3 * mach.abs())
    }
}

impl PropulsionModel for SimpleTurbofan {
    fn compute_flight_point(
        &self,
        mach: f64,
        altitude_m: f64,
        phase: FlightPhase,
        setting: ThrustSetting,
    ) -> Result<EnginePerformance, PropulsionError> {
        let available = self.available_thrust(altitude_m, phase);
        let (thrust_rate, thrust_n) = match setting {
            ThrustSetting::ThrustRate(rate) => {
                if !(0.0..=1.0).contains(&rate) || rate == 0.0 {
                    return Err(PropulsionError::InvalidThrustRate(rate));
                }
                (rate, rate * available)
            }
            ThrustSetting::Thrust(thrust) => (thrust / available, thrust),
        };
        Ok(EnginePerformance {
            sfc_kg_n_s: self.sfc(mach),
            thrust_rate,
            thrust_n,
        })
    }
}
