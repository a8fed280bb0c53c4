//! Flight-mission segment integrators.
//!
//! A segment simulates one leg of a mission (climb, cruise, acceleration) by
//! time-marching physical state (altitude, speed, mass, distance) against a
//! propulsion model and a drag polar until a segment-specific target
//! condition is reached. The shared marching loop, bounds enforcement, and
//! the optimal-altitude search live in [`segment`]; each segment kind only
//! supplies its physics hooks.

pub mod acceleration;
pub mod climb;
pub mod cruise;
mod manual_thrust;
pub mod segment;

pub use acceleration::AccelerationSegment;
pub use climb::{ClimbSegment, OPTIMAL_ALTITUDE};
pub use cruise::OptimalCruiseSegment;
pub use segment::{SegmentOptions, SegmentPhysics, optimal_altitude};

use mission_core::solvers::SolverError;
use mission_propulsion::PropulsionError;
use thiserror::Error;

/// Failure modes of a segment computation.
#[derive(Debug, Error)]
pub enum SegmentError {
    /// A step left the configured speed envelope; fatal, never retried.
    #[error("true airspeed {value:.3} m/s outside bounds [{min}, {max}] m/s")]
    SpeedOutOfBounds { value: f64, min: f64, max: f64 },
    /// A step left the configured altitude envelope; fatal, never retried.
    #[error("altitude {value:.1} m outside bounds [{min}, {max}] m")]
    AltitudeOutOfBounds { value: f64, min: f64, max: f64 },
    /// The optimal-altitude search did not converge; callers may retry
    /// with a different seed altitude.
    #[error("optimal-altitude search failed: {0}")]
    OptimalAltitude(#[from] SolverError),
    /// Propulsion collaborator failure, passed through unmodified.
    #[error(transparent)]
    Propulsion(#[from] PropulsionError),
    #[error("flight point is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("target does not define `{0}`")]
    MissingTarget(&'static str),
    #[error("cruise mach must be positive, got {0}")]
    InvalidCruiseMach(f64),
    #[error("segment exceeded {0} integration steps without reaching its target")]
    ExceededMaxSteps(usize),
}
