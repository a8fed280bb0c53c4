//! Aerodynamic drag polar: smooth CL-to-CD interpolation plus the
//! precomputed lift/drag-optimal lift coefficient.

use mission_core::solvers::{self, SolverError};
use thiserror::Error;

/// Iteration budget for the optimal-CL search.
const OPTIMUM_MAX_ITER: usize = 200;

#[derive(Debug, Error)]
pub enum PolarError {
    #[error("CL and CD definition vectors differ in length ({cl} vs {cd})")]
    LengthMismatch { cl: usize, cd: usize },
    #[error("a polar needs at least 3 definition points, got {0}")]
    TooFewPoints(usize),
    #[error("CL definition points must be strictly increasing")]
    NonMonotonicCl,
    #[error("degenerate polar: CD is not strictly positive at the lift/drag optimum")]
    DegenerateLiftDrag,
    #[error("optimal-CL search failed: {0}")]
    Solver(#[from] SolverError),
}

/// Immutable CL-to-CD model of a lifting surface.
///
/// Interpolation is piecewise quadratic through the definition points; the
/// boundary parabolas extrapolate beyond the sampled CL range, so `cd` is
/// total over all finite inputs.
#[derive(Debug, Clone)]
pub struct Polar {
    cl: Vec<f64>,
    cd: Vec<f64>,
    optimal_cl: f64,
}

impl Polar {
    /// Build a polar from matching CL/CD definition vectors and precompute
    /// the CL of maximum lift-to-drag ratio.
    ///
    /// Fails when the vectors are unusable or the L/D objective is
    /// degenerate (CD reaching zero would mean infinite lift-to-drag, which
    /// is a data error, not a flyable polar).
    pub fn new(cl: &[f64], cd: &[f64]) -> Result<Self, PolarError> {
        if cl.len() != cd.len() {
            return Err(PolarError::LengthMismatch {
                cl: cl.len(),
                cd: cd.len(),
            });
        }
        if cl.len() < 3 {
            return Err(PolarError::TooFewPoints(cl.len()));
        }
        if cl.windows(2).any(|w| w[1] <= w[0]) {
            return Err(PolarError::NonMonotonicCl);
        }

        let mut polar = Polar {
            cl: cl.to_vec(),
            cd: cd.to_vec(),
            optimal_cl: 0.0,
        };

        // Maximize CL/CD, seeded at the first definition point. A CD probe
        // at or below zero flags the polar as degenerate.
        let mut degenerate = false;
        let objective = |candidate: f64| {
            let drag = polar.interpolate(candidate);
            if drag <= 0.0 {
                degenerate = true;
                return f64::MAX;
            }
            -candidate / drag
        };
        let optimum = solvers::minimize(objective, cl[0], OPTIMUM_MAX_ITER)?;
        if degenerate || polar.interpolate(optimum) <= 0.0 {
            return Err(PolarError::DegenerateLiftDrag);
        }
        polar.optimal_cl = optimum;
        Ok(polar)
    }

    /// Drag coefficient for the given lift coefficient. Values outside the
    /// defined CL range are extrapolated; this never fails.
    pub fn cd(&self, cl: f64) -> f64 {
        self.interpolate(cl)
    }

    /// Drag coefficients for a batch of lift coefficients.
    pub fn cd_values(&self, cl: &[f64]) -> Vec<f64> {
        cl.iter().map(|&c| self.interpolate(c)).collect()
    }

    /// The CL maximizing CL/CD, fixed at construction.
    pub fn optimal_cl(&self) -> f64 {
        self.optimal_cl
    }

    /// Quadratic Lagrange interpolation through the three definition points
    /// nearest to `x`; the boundary windows double as extrapolants.
    fn interpolate(&self, x: f64) -> f64 {
        let n = self.cl.len();
        let upper = self.cl.partition_point(|&c| c <= x);
        let window = upper.saturating_sub(1).min(n - 3);

        let (x0, x1, x2) = (
            self.cl[window],
            self.cl[window + 1],
            self.cl[window + 2],
        );
        let (y0, y1, y2) = (
            self.cd[window],
            self.cd[window + 1],
            self.cd[window + 2],
        );

        y0 * (x - x1) * (x - x2) / ((x0 - x1) * (x0 - x2))
            + y1 * (x - x0) * (x - x2) / ((x1 - x0) * (x1 - x2))
            + y2 * (x - x0) * (x - x1) / ((x2 - x0) * (x2 - x1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// cd = 0.02 + 0.05 cl², sampled densely: analytic optimum at √0.4.
    fn quadratic_polar() -> Polar {
        let cl: Vec<f64> = (0..=30).map(|i| i as f64 * 0.05).collect();
        let cd: Vec<f64> = cl.iter().map(|c| 0.02 + 0.05 * c * c).collect();
        Polar::new(&cl, &cd).unwrap()
    }

    #[test]
    fn interpolation_reproduces_quadratic_drag_law() {
        let polar = quadratic_polar();
        for &cl in &[0.0, 0.123, 0.5, 0.777, 1.49] {
            let expected = 0.02 + 0.05 * cl * cl;
            assert!(
                (polar.cd(cl) - expected).abs() < 1e-12,
                "cd({cl}) = {}",
                polar.cd(cl)
            );
        }
    }

    #[test]
    fn extrapolation_beyond_range_is_total() {
        let polar = quadratic_polar();
        for &cl in &[-0.5, 2.0, 10.0] {
            let expected = 0.02 + 0.05 * cl * cl;
            assert!(
                (polar.cd(cl) - expected).abs() < 1e-9,
                "cd({cl}) = {}",
                polar.cd(cl)
            );
        }
    }

    #[test]
    fn optimal_cl_matches_analytic_optimum() {
        let polar = quadratic_polar();
        let expected = (0.02_f64 / 0.05).sqrt();
        assert!(
            (polar.optimal_cl() - expected).abs() < 1e-5,
            "optimal_cl = {}",
            polar.optimal_cl()
        );
    }

    #[test]
    fn optimum_minimizes_drag_per_lift_over_samples() {
        let polar = quadratic_polar();
        let at_optimum = polar.cd(polar.optimal_cl()) / polar.optimal_cl();
        let mut cl = 0.05;
        while cl <= 1.5 {
            assert!(polar.cd(cl) / cl >= at_optimum - 1e-9, "beaten at cl = {cl}");
            cl += 0.05;
        }
    }

    #[test]
    fn zero_drag_polar_fails_construction() {
        let cl = [0.0, 0.5, 1.0, 1.5];
        let cd = [0.0, 0.0, 0.0, 0.0];
        assert!(matches!(
            Polar::new(&cl, &cd),
            Err(PolarError::DegenerateLiftDrag)
        ));
    }

    #[test]
    fn validation_rejects_malformed_inputs() {
        assert!(matches!(
            Polar::new(&[0.0, 0.5], &[0.02, 0.03, 0.04]),
            Err(PolarError::LengthMismatch { .. })
        ));
        assert!(matches!(
            Polar::new(&[0.0, 0.5], &[0.02, 0.03]),
            Err(PolarError::TooFewPoints(2))
        ));
        assert!(matches!(
            Polar::new(&[0.0, 0.5, 0.4], &[0.02, 0.03, 0.04]),
            Err(PolarError::NonMonotonicCl)
        ));
    }

    #[test]
    fn cd_values_matches_scalar_queries() {
        let polar = quadratic_polar();
        let query = [0.1, 0.6, 1.2];
        let batch = polar.cd_values(&query);
        for (q, b) in query.iter().zip(&batch) {
            assert_eq!(polar.cd(*q), *b);
        }
    }
}
