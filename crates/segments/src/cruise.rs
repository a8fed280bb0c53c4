//! Cruise at fixed Mach with the altitude continuously re-optimized for
//! maximum lift-to-drag ratio.

use mission_atmosphere::{Atmosphere, tas_to_eas};
use mission_core::FlightPoint;
use mission_core::constants::G0;
use mission_polar::Polar;
use mission_propulsion::{PropulsionModel, ThrustSetting};

use crate::SegmentError;
use crate::segment::{SegmentOptions, SegmentPhysics, field, march, optimal_altitude};

/// Ground-distance tolerance closing the segment (m).
const DISTANCE_TOLERANCE_M: f64 = 1.0;

/// Quasi-steady cruise: level per step, with the altitude re-solved every
/// completion so the cruise tracks the mass-dependent lift/drag optimum.
pub struct OptimalCruiseSegment<'a, P: PropulsionModel> {
    propulsion: &'a P,
    polar: &'a Polar,
    reference_area_m2: f64,
    cruise_mach: f64,
    options: SegmentOptions,
}

impl<'a, P: PropulsionModel> OptimalCruiseSegment<'a, P> {
    pub fn new(
        propulsion: &'a P,
        polar: &'a Polar,
        reference_area_m2: f64,
        cruise_mach: f64,
    ) -> Self {
        OptimalCruiseSegment {
            propulsion,
            polar,
            reference_area_m2,
            cruise_mach,
            options: SegmentOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SegmentOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the segment from `start` until the target distance is covered.
    ///
    /// `target.ground_distance_m` is the *additional* distance to cover from
    /// the start point. `start` must define altitude (used to seed the first
    /// altitude optimization) and mass.
    pub fn compute(
        &self,
        start: &FlightPoint,
        target: &FlightPoint,
    ) -> Result<Vec<FlightPoint>, SegmentError> {
        march(self, start, target)
    }
}

impl<P: PropulsionModel> SegmentPhysics for OptimalCruiseSegment<'_, P> {
    fn options(&self) -> &SegmentOptions {
        &self.options
    }

    fn setup(
        &self,
        start: &mut FlightPoint,
        target: &mut FlightPoint,
    ) -> Result<(), SegmentError> {
        if self.cruise_mach <= 0.0 {
            return Err(SegmentError::InvalidCruiseMach(self.cruise_mach));
        }
        field(start.altitude_m, "altitude_m")?;
        field(start.mass_kg, "mass_kg")?;

        let additional = target
            .ground_distance_m
            .ok_or(SegmentError::MissingTarget("ground_distance_m"))?;
        let start_distance = field(start.ground_distance_m, "ground_distance_m")?;
        target.ground_distance_m = Some(additional + start_distance);
        Ok(())
    }

    fn target_is_attained(
        &self,
        current: &FlightPoint,
        target: &mut FlightPoint,
    ) -> Result<bool, SegmentError> {
        let distance = field(current.ground_distance_m, "ground_distance_m")?;
        let target_distance = field(target.ground_distance_m, "ground_distance_m")?;
        Ok((distance - target_distance).abs() <= DISTANCE_TOLERANCE_M)
    }

    fn compute_next_point(
        &self,
        current: &FlightPoint,
        target: &FlightPoint,
    ) -> Result<FlightPoint, SegmentError> {
        let time = field(current.time_s, "time_s")?;
        let speed = field(current.true_airspeed_m_s, "true_airspeed_m_s")?;
        let mass = field(current.mass_kg, "mass_kg")?;
        let distance = field(current.ground_distance_m, "ground_distance_m")?;
        let sfc = field(current.sfc_kg_n_s, "sfc_kg_n_s")?;
        let thrust = field(current.thrust_n, "thrust_n")?;
        let target_distance = field(target.ground_distance_m, "ground_distance_m")?;

        let remaining = target_distance - distance;
        let time_step = self.options.time_step_s.min(remaining / speed);

        Ok(FlightPoint {
            time_s: Some(time + time_step),
            // Carried over as the seed of the next altitude optimization.
            altitude_m: current.altitude_m,
            true_airspeed_m_s: current.true_airspeed_m_s,
            mass_kg: Some(mass - sfc * thrust * time_step),
            ground_distance_m: Some(distance + speed * time_step),
            ..Default::default()
        })
    }

    fn complete_point(&self, point: &mut FlightPoint) -> Result<(), SegmentError> {
        let mass = field(point.mass_kg, "mass_kg")?;
        let altitude = optimal_altitude(
            self.polar,
            self.reference_area_m2,
            mass,
            self.cruise_mach,
            point.altitude_m,
        )?;

        let atmosphere = Atmosphere::new(altitude);
        let speed = self.cruise_mach * atmosphere.speed_of_sound_m_s();
        let dynamic_pressure = 0.5 * atmosphere.density_kg_m3 * speed * speed;
        let cl = mass * G0 / (dynamic_pressure * self.reference_area_m2);
        let cd = self.polar.cd(cl);
        let drag = cd * dynamic_pressure * self.reference_area_m2;
        let performance = self.propulsion.compute_flight_point(
            self.cruise_mach,
            altitude,
            self.options.flight_phase,
            ThrustSetting::Thrust(drag),
        )?;

        point.altitude_m = Some(altitude);
        point.true_airspeed_m_s = Some(speed);
        point.equivalent_airspeed_m_s = Some(tas_to_eas(speed, altitude));
        point.mach = Some(self.cruise_mach);
        point.flight_phase = Some(self.options.flight_phase);
        point.cl = Some(cl);
        point.cd = Some(cd);
        point.sfc_kg_n_s = Some(performance.sfc_kg_n_s);
        point.thrust_rate = Some(performance.thrust_rate);
        point.thrust_n = Some(performance.thrust_n);
        // Level, quasi-steady flight by definition of the segment.
        point.slope_angle_rad = Some(0.0);
        point.acceleration_m_s2 = Some(0.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mission_propulsion::SimpleTurbofan;

    fn polar() -> Polar {
        let cl: Vec<f64> = (0..=30).map(|i| i as f64 * 0.05).collect();
        let cd: Vec<f64> = cl.iter().map(|c| 0.02 + 0.05 * c * c).collect();
        Polar::new(&cl, &cd).unwrap()
    }

    fn engine() -> SimpleTurbofan {
        SimpleTurbofan {
            max_thrust_n: 200_000.0,
            cruise_sfc_kg_n_s: 1.5e-5,
        }
    }

    #[test]
    fn zero_additional_distance_yields_one_point() {
        let engine = engine();
        let polar = polar();
        let segment = OptimalCruiseSegment::new(&engine, &polar, 120.0, 0.78);

        let start = FlightPoint {
            altitude_m: Some(10_000.0),
            mass_kg: Some(70_000.0),
            ground_distance_m: Some(250_000.0),
            ..Default::default()
        };
        let target = FlightPoint {
            ground_distance_m: Some(0.0),
            ..Default::default()
        };
        let trajectory = segment.compute(&start, &target).unwrap();
        assert_eq!(trajectory.len(), 1);
        assert_eq!(trajectory[0].ground_distance_m, Some(250_000.0));
        assert_eq!(trajectory[0].mach, Some(0.78));
    }

    #[test]
    fn distanceless_target_is_rejected() {
        let engine = engine();
        let polar = polar();
        let segment = OptimalCruiseSegment::new(&engine, &polar, 120.0, 0.78);

        let start = FlightPoint {
            altitude_m: Some(10_000.0),
            mass_kg: Some(70_000.0),
            ..Default::default()
        };
        let result = segment.compute(&start, &FlightPoint::default());
        assert!(matches!(result, Err(SegmentError::MissingTarget(_))));
    }

    #[test]
    fn nonpositive_cruise_mach_is_rejected() {
        let engine = engine();
        let polar = polar();
        let segment = OptimalCruiseSegment::new(&engine, &polar, 120.0, 0.0);

        let start = FlightPoint {
            altitude_m: Some(10_000.0),
            mass_kg: Some(70_000.0),
            ..Default::default()
        };
        let target = FlightPoint {
            ground_distance_m: Some(1_000.0),
            ..Default::default()
        };
        let result = segment.compute(&start, &target);
        assert!(matches!(result, Err(SegmentError::InvalidCruiseMach(_))));
    }
}
