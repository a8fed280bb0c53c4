//! Level-flight acceleration segment.

use mission_atmosphere::eas_to_tas;
use mission_core::FlightPoint;
use mission_polar::Polar;
use mission_propulsion::PropulsionModel;

use crate::SegmentError;
use crate::manual_thrust::ManualThrustCore;
use crate::segment::{SegmentOptions, SegmentPhysics, field, march};

/// Tight speed tolerance so repeated runs terminate on the same step.
const SPEED_TOLERANCE_M_S: f64 = 1e-7;

/// Accelerates (or decelerates) at constant altitude until the target true
/// airspeed is reached. All excess thrust goes into acceleration; the slope
/// angle is pinned to zero.
pub struct AccelerationSegment<'a, P: PropulsionModel> {
    core: ManualThrustCore<'a, P>,
}

impl<'a, P: PropulsionModel> AccelerationSegment<'a, P> {
    pub fn new(propulsion: &'a P, polar: &'a Polar, reference_area_m2: f64) -> Self {
        AccelerationSegment {
            core: ManualThrustCore::new(propulsion, polar, reference_area_m2),
        }
    }

    /// Throttle ratio held for the whole segment (default 1.0).
    pub fn with_thrust_rate(mut self, thrust_rate: f64) -> Self {
        self.core.thrust_rate = thrust_rate;
        self
    }

    pub fn with_options(mut self, options: SegmentOptions) -> Self {
        self.core.options = options;
        self
    }

    /// Run the segment from `start` until the target speed is attained.
    ///
    /// `start` must define true airspeed, altitude, and mass; `target` must
    /// define a speed, either true or equivalent.
    pub fn compute(
        &self,
        start: &FlightPoint,
        target: &FlightPoint,
    ) -> Result<Vec<FlightPoint>, SegmentError> {
        march(self, start, target)
    }
}

impl<P: PropulsionModel> SegmentPhysics for AccelerationSegment<'_, P> {
    fn options(&self) -> &SegmentOptions {
        &self.core.options
    }

    fn setup(
        &self,
        start: &mut FlightPoint,
        target: &mut FlightPoint,
    ) -> Result<(), SegmentError> {
        field(start.true_airspeed_m_s, "true_airspeed_m_s")?;
        field(start.mass_kg, "mass_kg")?;
        let start_altitude = field(start.altitude_m, "altitude_m")?;

        // Altitude is constant here, so a target given as EAS converts to a
        // fixed TAS once; the gap then closes in true airspeed only.
        if target.true_airspeed_m_s.is_none() {
            if let Some(eas) = target.equivalent_airspeed_m_s {
                target.true_airspeed_m_s = Some(eas_to_tas(eas, start_altitude));
            }
        }
        target.equivalent_airspeed_m_s = None;
        if target.true_airspeed_m_s.is_none() {
            return Err(SegmentError::MissingTarget(
                "true_airspeed_m_s or equivalent_airspeed_m_s",
            ));
        }
        Ok(())
    }

    fn target_is_attained(
        &self,
        current: &FlightPoint,
        target: &mut FlightPoint,
    ) -> Result<bool, SegmentError> {
        let speed = field(current.true_airspeed_m_s, "true_airspeed_m_s")?;
        let target_speed = field(target.true_airspeed_m_s, "true_airspeed_m_s")?;
        Ok((speed - target_speed).abs() <= SPEED_TOLERANCE_M_S)
    }

    fn compute_next_point(
        &self,
        current: &FlightPoint,
        target: &FlightPoint,
    ) -> Result<FlightPoint, SegmentError> {
        self.core.next_point(current, target)
    }

    fn complete_point(&self, point: &mut FlightPoint) -> Result<(), SegmentError> {
        self.core
            .complete_point(point, |mass, drag, thrust| (0.0, (thrust - drag) / mass))
    }
}
