//! Scalar root-finding and 1-D minimization used by the polar and the
//! optimal-altitude search.

use thiserror::Error;

/// Golden ratio step used by the section search.
const GOLDEN: f64 = 0.618_033_988_749_894_8;

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("solver stalled: objective is flat between successive iterates")]
    Stalled,
    #[error("solver did not converge within {limit} iterations")]
    MaxIterations { limit: usize },
}

/// Secant-method root finder seeded with two nearby guesses.
///
/// Returns the abscissa where `f` crosses zero, to within `x_tol`. The
/// iteration is capped at `max_iter`; a flat secant denominator (no usable
/// slope between iterates) is reported as [`SolverError::Stalled`] rather
/// than dividing by zero.
pub fn find_root<F>(
    mut f: F,
    x0: f64,
    x1: f64,
    x_tol: f64,
    max_iter: usize,
) -> Result<f64, SolverError>
where
    F: FnMut(f64) -> f64,
{
    let mut a = x0;
    let mut b = x1;
    let mut fa = f(a);
    let mut fb = f(b);

    for _ in 0..max_iter {
        if fb == 0.0 {
            return Ok(b);
        }
        let denom = fb - fa;
        if denom.abs() < f64::EPSILON * (fa.abs() + fb.abs()).max(1.0) {
            return Err(SolverError::Stalled);
        }
        let next = b - fb * (b - a) / denom;
        if (next - b).abs() <= x_tol {
            return Ok(next);
        }
        a = b;
        fa = fb;
        b = next;
        fb = f(b);
    }
    Err(SolverError::MaxIterations { limit: max_iter })
}

/// Unconstrained 1-D minimizer: bracket expansion from a seed, then
/// golden-section refinement.
///
/// Returns the abscissa of the minimum of `f`. Both the bracketing walk and
/// the section search carry explicit iteration caps so a pathological
/// objective surfaces an error instead of spinning.
pub fn minimize<F>(mut f: F, seed: f64, max_iter: usize) -> Result<f64, SolverError>
where
    F: FnMut(f64) -> f64,
{
    // Walk downhill with a growing step until the objective turns back up.
    let mut step = 0.1_f64.max(seed.abs() * 0.1);
    let mut x_mid = seed;
    let mut f_mid = f(x_mid);

    let (mut lo, mut hi) = {
        let mut x_next = x_mid + step;
        let mut f_next = f(x_next);
        if f_next > f_mid {
            // Downhill is the other way.
            step = -step;
            x_next = x_mid + step;
            f_next = f(x_next);
        }
        let mut iterations = 0;
        while f_next < f_mid {
            iterations += 1;
            if iterations > max_iter {
                return Err(SolverError::MaxIterations { limit: max_iter });
            }
            step *= 2.0;
            x_mid = x_next;
            f_mid = f_next;
            x_next = x_mid + step;
            f_next = f(x_next);
        }
        (x_next.min(x_mid - step), x_next.max(x_mid - step))
    };

    // Golden-section refinement inside the bracket.
    let mut c = hi - GOLDEN * (hi - lo);
    let mut d = lo + GOLDEN * (hi - lo);
    let mut fc = f(c);
    let mut fd = f(d);
    for _ in 0..max_iter {
        if (hi - lo).abs() < 1e-10 * (1.0 + lo.abs() + hi.abs()) {
            return Ok(0.5 * (lo + hi));
        }
        if fc < fd {
            hi = d;
            d = c;
            fd = fc;
            c = hi - GOLDEN * (hi - lo);
            fc = f(c);
        } else {
            lo = c;
            c = d;
            fc = fd;
            d = lo + GOLDEN * (hi - lo);
            fd = f(d);
        }
    }
    Err(SolverError::MaxIterations { limit: max_iter })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secant_finds_cubic_root() {
        let root = find_root(|x| x * x * x - 2.0, 1.0, 1.5, 1e-12, 100).unwrap();
        assert!((root - 2.0_f64.cbrt()).abs() < 1e-9, "root = {root}");
    }

    #[test]
    fn secant_reports_flat_objective() {
        let result = find_root(|_| 1.0, 0.0, 1.0, 1e-12, 100);
        assert!(matches!(result, Err(SolverError::Stalled)));
    }

    #[test]
    fn secant_respects_iteration_cap() {
        // Oscillating sign with no root keeps the secant hopping.
        let result = find_root(|x| x.sin() + 2.0, 0.0, 1.0, 1e-15, 5);
        assert!(result.is_err());
    }

    #[test]
    fn golden_section_minimizes_shifted_parabola() {
        let x = minimize(|x| (x - 3.25) * (x - 3.25) + 1.0, 0.0, 200).unwrap();
        assert!((x - 3.25).abs() < 1e-6, "x = {x}");
    }

    #[test]
    fn minimizer_walks_downhill_in_both_directions() {
        let x = minimize(|x| (x + 7.5) * (x + 7.5), 0.0, 200).unwrap();
        assert!((x + 7.5).abs() < 1e-6, "x = {x}");
    }
}
