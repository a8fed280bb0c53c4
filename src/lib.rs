//! Flight-mission segment integrator for aircraft overall design studies.
//!
//! The heavy lifting lives in the member crates; this facade re-exports
//! their public surface so callers depend on a single crate: the
//! [`FlightPoint`] record and atmosphere/polar/propulsion collaborators,
//! and the three segment integrators ([`OptimalCruiseSegment`],
//! [`ClimbSegment`], [`AccelerationSegment`]).

pub use mission_atmosphere::{Atmosphere, eas_to_tas, tas_to_eas};
pub use mission_core::{FlightPhase, FlightPoint, constants, solvers, units};
pub use mission_polar::{Polar, PolarError};
pub use mission_propulsion::{
    EnginePerformance, PropulsionError, PropulsionModel, SimpleTurbofan, ThrustSetting,
};
pub use mission_segments::{
    AccelerationSegment, ClimbSegment, OPTIMAL_ALTITUDE, OptimalCruiseSegment, SegmentError,
    SegmentOptions, SegmentPhysics, optimal_altitude,
};

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
