//! Shared segment state machine: the marching loop, bounds enforcement, and
//! the optimal-altitude root-finder.

use mission_atmosphere::Atmosphere;
use mission_core::FlightPoint;
use mission_core::constants::G0;
use mission_core::flight_point::FlightPhase;
use mission_core::solvers::find_root;
use mission_polar::Polar;

use crate::SegmentError;

/// Iteration budget for the optimal-altitude secant search.
const ALTITUDE_ROOT_MAX_ITER: usize = 100;
/// Seed used when the caller has no altitude guess.
const DEFAULT_ALTITUDE_GUESS_M: f64 = 10_000.0;

/// Tuning knobs common to every segment kind.
///
/// Values are fixed at construction and read-only during `compute`; there is
/// no shared default state between segment instances.
#[derive(Debug, Clone)]
pub struct SegmentOptions {
    /// Default integration time step (s).
    pub time_step_s: f64,
    /// Phase reported to the propulsion model.
    pub flight_phase: FlightPhase,
    /// Permitted altitude envelope (m); leaving it aborts the segment.
    pub altitude_bounds_m: (f64, f64),
    /// Permitted true-airspeed envelope (m/s); leaving it aborts the segment.
    pub speed_bounds_m_s: (f64, f64),
    /// Hard cap on integration steps, so a non-terminating target condition
    /// surfaces an error instead of spinning.
    pub max_steps: usize,
}

impl SegmentOptions {
    pub fn for_phase(flight_phase: FlightPhase) -> Self {
        SegmentOptions {
            time_step_s: 0.5,
            flight_phase,
            altitude_bounds_m: (-100.0, 40_000.0),
            speed_bounds_m_s: (0.0, 1_000.0),
            max_steps: 1_000_000,
        }
    }
}

impl Default for SegmentOptions {
    fn default() -> Self {
        SegmentOptions::for_phase(FlightPhase::Cruise)
    }
}

/// The variability points of the marching loop. Everything else — start
/// normalization, iteration, bounds checks, trajectory assembly — is shared.
pub trait SegmentPhysics {
    /// Options governing the shared loop.
    fn options(&self) -> &SegmentOptions;

    /// Validate the start point and rewrite the target where the segment
    /// kind calls for it (start-relative distances, speed policies).
    fn setup(&self, start: &mut FlightPoint, target: &mut FlightPoint)
    -> Result<(), SegmentError>;

    /// Whether the segment is done. May rewrite the target: a climb toward
    /// the lift/drag-optimal altitude re-solves its target every iteration.
    fn target_is_attained(
        &self,
        current: &FlightPoint,
        target: &mut FlightPoint,
    ) -> Result<bool, SegmentError>;

    /// Advance the raw physical state {time, altitude, speed, mass,
    /// distance} by one step; the result is not yet completed.
    fn compute_next_point(
        &self,
        current: &FlightPoint,
        target: &FlightPoint,
    ) -> Result<FlightPoint, SegmentError>;

    /// Fill the derived aerodynamic and propulsion fields of a point from
    /// its physical state.
    fn complete_point(&self, point: &mut FlightPoint) -> Result<(), SegmentError>;
}

/// Run a segment to completion and return its trajectory.
///
/// The first trajectory point is the normalized, completed start; every
/// subsequent point has passed the bounds check before being appended.
pub(crate) fn march<S: SegmentPhysics>(
    segment: &S,
    start: &FlightPoint,
    target: &FlightPoint,
) -> Result<Vec<FlightPoint>, SegmentError> {
    let options = segment.options();

    let mut current = start.clone();
    let mut target = target.clone();
    if current.time_s.is_none() {
        current.time_s = Some(0.0);
    }
    if current.ground_distance_m.is_none() {
        current.ground_distance_m = Some(0.0);
    }
    segment.setup(&mut current, &mut target)?;
    segment.complete_point(&mut current)?;

    let mut trajectory = vec![current.clone()];
    let mut steps = 0usize;
    while !segment.target_is_attained(&current, &mut target)? {
        if steps >= options.max_steps {
            return Err(SegmentError::ExceededMaxSteps(options.max_steps));
        }
        steps += 1;

        let mut next = segment.compute_next_point(&current, &target)?;
        segment.complete_point(&mut next)?;
        check_bounds(options, &next)?;
        trajectory.push(next.clone());
        current = next;
    }
    Ok(trajectory)
}

fn check_bounds(options: &SegmentOptions, point: &FlightPoint) -> Result<(), SegmentError> {
    if let Some(speed) = point.true_airspeed_m_s {
        let (min, max) = options.speed_bounds_m_s;
        if speed < min || speed > max {
            return Err(SegmentError::SpeedOutOfBounds {
                value: speed,
                min,
                max,
            });
        }
    }
    if let Some(altitude) = point.altitude_m {
        let (min, max) = options.altitude_bounds_m;
        if altitude < min || altitude > max {
            return Err(SegmentError::AltitudeOutOfBounds {
                value: altitude,
                min,
                max,
            });
        }
    }
    Ok(())
}

/// Read a field that the marching loop guarantees to be set by this stage.
pub(crate) fn field(value: Option<f64>, name: &'static str) -> Result<f64, SegmentError> {
    value.ok_or(SegmentError::MissingField(name))
}

/// Altitude at which the air density matches flying at the polar's optimal
/// CL for the given mass and Mach.
///
/// Solved by a secant search seeded at `altitude_guess_m` (10 km when the
/// caller has none) and 1 km below it. Non-convergence is surfaced, never
/// looped on; callers may retry with a different seed.
pub fn optimal_altitude(
    polar: &Polar,
    reference_area_m2: f64,
    mass_kg: f64,
    mach: f64,
    altitude_guess_m: Option<f64>,
) -> Result<f64, SegmentError> {
    let guess = altitude_guess_m.unwrap_or(DEFAULT_ALTITUDE_GUESS_M);
    let optimal_cl = polar.optimal_cl();
    let density_mismatch = |altitude: f64| {
        let atmosphere = Atmosphere::new(altitude);
        let speed = mach * atmosphere.speed_of_sound_m_s();
        atmosphere.density_kg_m3
            - 2.0 * mass_kg * G0 / (reference_area_m2 * speed * speed * optimal_cl)
    };
    let root = find_root(
        density_mismatch,
        guess,
        guess - 1_000.0,
        1e-9,
        ALTITUDE_ROOT_MAX_ITER,
    )?;
    Ok(root)
}
