//! Newton-Raphson solver for Kepler's equation `E − e·sin(E) = M`.

/// Convergence threshold on the Newton step (radians).
pub const DEFAULT_KEPLER_TOLERANCE: f64 = 1e-8;

/// Iteration cap; the only bounded-work guard in the solver.
pub const DEFAULT_KEPLER_MAX_ITERATIONS: u32 = 50;

/// Solver output with diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    /// Eccentric anomaly E (radians). The last iterate when not converged.
    pub eccentric_anomaly: f64,
    pub iterations: u32,
    pub converged: bool,
}

/// Solve for E, reporting iteration count and convergence.
///
/// Starts from `M` (or π for e ≥ 0.8, where `M` is a poor first guess).
/// When `max_iterations` is reached without the step falling below
/// `tolerance`, the last iterate is returned with `converged = false`.
pub fn solve_kepler_detailed(m: f64, e: f64, tolerance: f64, max_iterations: u32) -> KeplerSolution {
    let mut ea = if e < 0.8 { m } else { std::f64::consts::PI };

    for iteration in 1..=max_iterations {
        let f = ea - e * ea.sin() - m;
        let fp = 1.0 - e * ea.cos();
        let delta = f / fp;
        ea -= delta;
        if delta.abs() < tolerance {
            return KeplerSolution {
                eccentric_anomaly: ea,
                iterations: iteration,
                converged: true,
            };
        }
    }

    KeplerSolution {
        eccentric_anomaly: ea,
        iterations: max_iterations,
        converged: false,
    }
}

/// Solve Kepler's equation for the eccentric anomaly E (radians).
///
/// Never fails: on non-convergence the last iterate is returned as-is.
pub fn solve_kepler(m: f64, e: f64, tolerance: f64, max_iterations: u32) -> f64 {
    solve_kepler_detailed(m, e, tolerance, max_iterations).eccentric_anomaly
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn residual(ea: f64, e: f64, m: f64) -> f64 {
        ea - e * ea.sin() - m
    }

    #[test]
    fn circular_orbit_is_identity() {
        let sol = solve_kepler_detailed(1.234, 0.0, DEFAULT_KEPLER_TOLERANCE, 50);
        assert!(sol.converged);
        assert!((sol.eccentric_anomaly - 1.234).abs() < 1e-12);
    }

    #[test]
    fn meeus_example_30a() {
        // Meeus 30.a: e = 0.100, M = 5° → E = 5.554589°
        let ea = solve_kepler(5.0_f64.to_radians(), 0.1, 1e-12, 50);
        assert!((ea.to_degrees() - 5.554_589).abs() < 1e-6, "E = {}", ea.to_degrees());
    }

    #[test]
    fn residual_small_across_grid() {
        for &e in &[0.0, 0.01, 0.2, 0.5, 0.9, 0.97] {
            for k in 0..24 {
                let m = k as f64 * PI / 12.0;
                let sol = solve_kepler_detailed(m, e, DEFAULT_KEPLER_TOLERANCE, 50);
                assert!(sol.converged, "e={e} M={m}");
                assert!(residual(sol.eccentric_anomaly, e, m).abs() < 1e-7, "e={e} M={m}");
            }
        }
    }

    #[test]
    fn capped_iterations_return_last_iterate() {
        let sol = solve_kepler_detailed(0.3, 0.9, 1e-300, 3);
        assert!(!sol.converged);
        assert_eq!(sol.iterations, 3);
        assert!(sol.eccentric_anomaly.is_finite());
    }

    #[test]
    fn zero_iterations_returns_initial_guess() {
        let sol = solve_kepler_detailed(0.3, 0.1, DEFAULT_KEPLER_TOLERANCE, 0);
        assert!(!sol.converged);
        assert_eq!(sol.eccentric_anomaly, 0.3);
    }
}
