//! Shared step computation for thrust-rate-driven segments (climb and
//! acceleration).

use mission_atmosphere::{Atmosphere, eas_to_tas, tas_to_eas};
use mission_core::FlightPoint;
use mission_core::constants::G0;
use mission_polar::Polar;
use mission_propulsion::{PropulsionModel, ThrustSetting};

use crate::SegmentError;
use crate::segment::{SegmentOptions, field};

/// Common state and step physics of the thrust-rate-driven segment kinds.
///
/// The two kinds differ only in how slope angle and acceleration split the
/// excess thrust, supplied per completion through `gamma_and_acceleration`.
pub(crate) struct ManualThrustCore<'a, P: PropulsionModel> {
    pub propulsion: &'a P,
    pub polar: &'a Polar,
    pub reference_area_m2: f64,
    pub thrust_rate: f64,
    pub options: SegmentOptions,
}

impl<'a, P: PropulsionModel> ManualThrustCore<'a, P> {
    pub fn new(propulsion: &'a P, polar: &'a Polar, reference_area_m2: f64) -> Self {
        ManualThrustCore {
            propulsion,
            polar,
            reference_area_m2,
            thrust_rate: 1.0,
            options: SegmentOptions::default(),
        }
    }

    /// Advance the raw physical state by one time step.
    ///
    /// The step is the smallest of the configured default and two local
    /// estimates bounding how fast the speed and altitude gaps to the target
    /// close. A negative estimate means the local derivative points away
    /// from the target; it is logged and the default step used instead.
    pub fn next_point(
        &self,
        current: &FlightPoint,
        target: &FlightPoint,
    ) -> Result<FlightPoint, SegmentError> {
        let time = field(current.time_s, "time_s")?;
        let altitude = field(current.altitude_m, "altitude_m")?;
        let speed = field(current.true_airspeed_m_s, "true_airspeed_m_s")?;
        let mass = field(current.mass_kg, "mass_kg")?;
        let distance = field(current.ground_distance_m, "ground_distance_m")?;
        let slope = field(current.slope_angle_rad, "slope_angle_rad")?;
        let acceleration = field(current.acceleration_m_s2, "acceleration_m_s2")?;
        let sfc = field(current.sfc_kg_n_s, "sfc_kg_n_s")?;
        let thrust = field(current.thrust_n, "thrust_n")?;

        let mut time_step = self.options.time_step_s;
        if let Some(target_speed) = target.true_airspeed_m_s {
            if acceleration.abs() > f64::EPSILON {
                let estimate = (target_speed - speed) / acceleration;
                if estimate < 0.0 {
                    log::warn!(
                        "speed-derived time step is negative ({estimate:.3} s): \
                         acceleration points away from the target; using the default step"
                    );
                } else {
                    time_step = time_step.min(estimate);
                }
            }
        }
        if let Some(target_altitude) = target.altitude_m {
            let climb_rate = speed * slope.sin();
            if climb_rate.abs() > f64::EPSILON {
                let estimate = (target_altitude - altitude) / climb_rate;
                if estimate < 0.0 {
                    log::warn!(
                        "altitude-derived time step is negative ({estimate:.3} s): \
                         slope points away from the target; using the default step"
                    );
                } else {
                    time_step = time_step.min(estimate);
                }
            }
        }

        let next_altitude = altitude + time_step * speed * slope.sin();
        let next_speed = match target.equivalent_airspeed_m_s {
            // Constant-EAS policy: the true airspeed tracks the target EAS
            // at the new altitude.
            Some(eas) => eas_to_tas(eas, next_altitude),
            None => speed + time_step * acceleration,
        };

        Ok(FlightPoint {
            time_s: Some(time + time_step),
            altitude_m: Some(next_altitude),
            true_airspeed_m_s: Some(next_speed),
            mass_kg: Some(mass - sfc * thrust * time_step),
            ground_distance_m: Some(distance + speed * time_step * slope.cos()),
            ..Default::default()
        })
    }

    /// Fill the derived fields of a point: Mach, EAS, engine response in
    /// thrust-rate mode, lift-balance CL, polar CD, and the kind-specific
    /// slope/acceleration split of the excess thrust.
    pub fn complete_point(
        &self,
        point: &mut FlightPoint,
        gamma_and_acceleration: impl Fn(f64, f64, f64) -> (f64, f64),
    ) -> Result<(), SegmentError> {
        let altitude = field(point.altitude_m, "altitude_m")?;
        let speed = field(point.true_airspeed_m_s, "true_airspeed_m_s")?;
        let mass = field(point.mass_kg, "mass_kg")?;

        let atmosphere = Atmosphere::new(altitude);
        let mach = speed / atmosphere.speed_of_sound_m_s();
        let performance = self.propulsion.compute_flight_point(
            mach,
            altitude,
            self.options.flight_phase,
            ThrustSetting::ThrustRate(self.thrust_rate),
        )?;

        let dynamic_pressure = 0.5 * atmosphere.density_kg_m3 * speed * speed;
        let cl = mass * G0 / (dynamic_pressure * self.reference_area_m2);
        let cd = self.polar.cd(cl);
        let drag = cd * dynamic_pressure * self.reference_area_m2;
        let (slope, acceleration) = gamma_and_acceleration(mass, drag, performance.thrust_n);

        point.mach = Some(mach);
        point.equivalent_airspeed_m_s = Some(tas_to_eas(speed, altitude));
        point.flight_phase = Some(self.options.flight_phase);
        point.cl = Some(cl);
        point.cd = Some(cd);
        point.sfc_kg_n_s = Some(performance.sfc_kg_n_s);
        point.thrust_rate = Some(performance.thrust_rate);
        point.thrust_n = Some(performance.thrust_n);
        point.slope_angle_rad = Some(slope);
        point.acceleration_m_s2 = Some(acceleration);
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

    fn level_point(speed: f64, acceleration: f64) -> FlightPoint {
        FlightPoint {
            time_s: Some(0.0),
            altitude_m: Some(0.0),
            true_airspeed_m_s: Some(speed),
            mass_kg: Some(60_000.0),
            ground_distance_m: Some(0.0),
            slope_angle_rad: Some(0.0),
            acceleration_m_s2: Some(acceleration),
            sfc_kg_n_s: Some(1.5e-5),
            thrust_n: Some(150_000.0),
            ..Default::default()
        }
    }

    #[test]
    fn negative_speed_estimate_falls_back_to_default_step() {
        let engine = SimpleTurbofan {
            max_thrust_n: 200_000.0,
            cruise_sfc_kg_n_s: 1.5e-5,
        };
        let polar = polar();
        let core = ManualThrustCore::new(&engine, &polar, 120.0);

        // Positive acceleration but the target speed lies behind us.
        let current = level_point(120.0, 2.0);
        let target = FlightPoint {
            true_airspeed_m_s: Some(100.0),
            ..Default::default()
        };
        let next = core.next_point(&current, &target).unwrap();
        assert_eq!(next.time_s, Some(0.5), "default step expected");
    }

    #[test]
    fn speed_estimate_shortens_final_step() {
        let engine = SimpleTurbofan {
            max_thrust_n: 200_000.0,
            cruise_sfc_kg_n_s: 1.5e-5,
        };
        let polar = polar();
        let core = ManualThrustCore::new(&engine, &polar, 120.0);

        // 0.4 m/s short of the target at 2 m/s²: 0.2 s beats the default.
        let current = level_point(149.6, 2.0);
        let target = FlightPoint {
            true_airspeed_m_s: Some(150.0),
            ..Default::default()
        };
        let next = core.next_point(&current, &target).unwrap();
        assert!((next.time_s.unwrap() - 0.2).abs() < 1e-12);
        assert!((next.true_airspeed_m_s.unwrap() - 150.0).abs() < 1e-12);
    }

    #[test]
    fn mass_decreases_by_fuel_burn() {
        let engine = SimpleTurbofan {
            max_thrust_n: 200_000.0,
            cruise_sfc_kg_n_s: 1.5e-5,
        };
        let polar = polar();
        let core = ManualThrustCore::new(&engine, &polar, 120.0);

        let current = level_point(120.0, 2.0);
        let target = FlightPoint::default();
        let next = core.next_point(&current, &target).unwrap();
        let expected = 60_000.0 - 1.5e-5 * 150_000.0 * 0.5;
        assert!((next.mass_kg.unwrap() - expected).abs() < 1e-9);
    }
}
