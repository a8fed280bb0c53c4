//! Climb segment at constant speed, to a fixed altitude or to the
//! lift/drag-optimal altitude.

use mission_atmosphere::{Atmosphere, eas_to_tas};
use mission_core::FlightPoint;
use mission_core::constants::G0;
use mission_polar::Polar;
use mission_propulsion::PropulsionModel;

use crate::SegmentError;
use crate::manual_thrust::ManualThrustCore;
use crate::segment::{SegmentOptions, SegmentPhysics, field, march, optimal_altitude};

/// Sentinel target altitude meaning "climb to the altitude of maximum
/// lift-to-drag ratio". The actual target is then re-solved from the current
/// mass and Mach at every iteration.
pub const OPTIMAL_ALTITUDE: f64 = -10_000.0;

/// Tight altitude tolerance so repeated runs terminate on the same step.
const ALTITUDE_TOLERANCE_M: f64 = 1e-7;

/// Climbs at constant speed (true or equivalent airspeed, whichever the
/// target carries) until the target altitude is reached. All excess thrust
/// goes into climb rate; acceleration is pinned to zero.
pub struct ClimbSegment<'a, P: PropulsionModel> {
    core: ManualThrustCore<'a, P>,
    cruise_mach: Option<f64>,
}

impl<'a, P: PropulsionModel> ClimbSegment<'a, P> {
    pub fn new(propulsion: &'a P, polar: &'a Polar, reference_area_m2: f64) -> Self {
        let mut core = ManualThrustCore::new(propulsion, polar, reference_area_m2);
        core.options = SegmentOptions::for_phase(mission_core::FlightPhase::Climb);
        ClimbSegment {
            core,
            cruise_mach: None,
        }
    }

    /// Throttle ratio held for the whole segment (default 1.0).
    pub fn with_thrust_rate(mut self, thrust_rate: f64) -> Self {
        self.core.thrust_rate = thrust_rate;
        self
    }

    /// Mach ceiling clipping the true airspeed achieved at each new
    /// altitude (default: no ceiling).
    pub fn with_cruise_mach(mut self, cruise_mach: f64) -> Self {
        self.cruise_mach = Some(cruise_mach);
        self
    }

    pub fn with_options(mut self, options: SegmentOptions) -> Self {
        self.core.options = options;
        self
    }

    /// Run the segment from `start` until the target altitude is attained.
    ///
    /// The starting true airspeed is decided from whichever speed the
    /// target carries (equivalent airspeed converted at the start altitude,
    /// true airspeed taken verbatim); any speed set on `start` is ignored. A target
    /// altitude of [`OPTIMAL_ALTITUDE`] makes the climb chase the
    /// lift/drag-optimal altitude as a moving target.
    pub fn compute(
        &self,
        start: &FlightPoint,
        target: &FlightPoint,
    ) -> Result<Vec<FlightPoint>, SegmentError> {
        let run = ClimbRun {
            segment: self,
            optimal: target.altitude_m == Some(OPTIMAL_ALTITUDE),
        };
        march(&run, start, target)
    }
}

/// One `compute` invocation of a climb segment, carrying the per-call
/// decision between a fixed and a re-solved target altitude.
struct ClimbRun<'r, 'a, P: PropulsionModel> {
    segment: &'r ClimbSegment<'a, P>,
    optimal: bool,
}

impl<P: PropulsionModel> SegmentPhysics for ClimbRun<'_, '_, P> {
    fn options(&self) -> &SegmentOptions {
        &self.segment.core.options
    }

    fn setup(
        &self,
        start: &mut FlightPoint,
        target: &mut FlightPoint,
    ) -> Result<(), SegmentError> {
        if let Some(mach) = self.segment.cruise_mach {
            if mach <= 0.0 {
                return Err(SegmentError::InvalidCruiseMach(mach));
            }
        }
        let start_altitude = field(start.altitude_m, "altitude_m")?;
        field(start.mass_kg, "mass_kg")?;

        start.true_airspeed_m_s = if let Some(eas) = target.equivalent_airspeed_m_s {
            Some(eas_to_tas(eas, start_altitude))
        } else if let Some(speed) = target.true_airspeed_m_s {
            Some(speed)
        } else {
            return Err(SegmentError::MissingTarget(
                "true_airspeed_m_s or equivalent_airspeed_m_s",
            ));
        };

        if !self.optimal && target.altitude_m.is_none() {
            return Err(SegmentError::MissingTarget("altitude_m"));
        }
        Ok(())
    }

    fn target_is_attained(
        &self,
        current: &FlightPoint,
        target: &mut FlightPoint,
    ) -> Result<bool, SegmentError> {
        if self.optimal {
            let mass = field(current.mass_kg, "mass_kg")?;
            let mach = field(current.mach, "mach")?;
            target.altitude_m = Some(optimal_altitude(
                self.segment.core.polar,
                self.segment.core.reference_area_m2,
                mass,
                mach,
                current.altitude_m,
            )?);
        }
        let altitude = field(current.altitude_m, "altitude_m")?;
        let target_altitude = field(target.altitude_m, "altitude_m")?;
        Ok((altitude - target_altitude).abs() <= ALTITUDE_TOLERANCE_M)
    }

    fn compute_next_point(
        &self,
        current: &FlightPoint,
        target: &FlightPoint,
    ) -> Result<FlightPoint, SegmentError> {
        let mut next = self.segment.core.next_point(current, target)?;
        if let Some(limit) = self.segment.cruise_mach {
            let altitude = field(next.altitude_m, "altitude_m")?;
            let speed = field(next.true_airspeed_m_s, "true_airspeed_m_s")?;
            let ceiling = limit * Atmosphere::new(altitude).speed_of_sound_m_s();
            next.true_airspeed_m_s = Some(speed.min(ceiling));
        }
        Ok(next)
    }

    fn complete_point(&self, point: &mut FlightPoint) -> Result<(), SegmentError> {
        self.segment.core.complete_point(point, |mass, drag, thrust| {
            ((thrust - drag) / (mass * G0), 0.0)
        })
    }
}
