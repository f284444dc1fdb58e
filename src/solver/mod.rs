//!
//! Generic one-dimensional root finding
//!

use serde::Serialize;

use crate::config::SolverConfig;

/// Halvings before bisection gives up, enough to exhaust `f64` precision on any bracket.
const BISECTION_MAX_ITERATIONS: usize = 1100;

///
/// The value of a residual function at a point.
///
/// - `Feasible`: The residual is defined at the point
/// - `Infeasible`: The point lies outside the residual's domain
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    Feasible(f64),
    Infeasible,
}

impl Evaluation {
    ///
    /// # Returns:
    /// - The residual, if the point was feasible and the residual is a finite number
    ///
    pub fn value(self) -> Option<f64> {
        match self {
            Evaluation::Feasible(value) if value.is_finite() => Some(value),
            _ => None,
        }
    }
}

///
/// Why the root finder stopped iterating.
///
/// - `Converged`: The residual magnitude dropped below the tolerance
/// - `IterationsExhausted`: The iteration budget ran out first
/// - `DerivativeVanished`: The residual was flat at the current point, so no step could be taken
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RootStatus {
    Converged,
    IterationsExhausted,
    DerivativeVanished,
}

///
/// The method which produced a root.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RootMethod {
    Newton,
    Bisection,
}

///
/// The outcome of a root search. The root is always the last point reached, whether or not the
/// search converged, so callers must check `status` themselves.
///
/// # Fields:
/// - `root`: The last point reached
/// - `status`: Why the search stopped
/// - `method`: Which method produced `root`
/// - `iterations`: The number of iterations performed, over all methods
/// - `residual`: The residual at `root`, or `None` if `root` is infeasible
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RootReport {
    pub root: f64,
    pub status: RootStatus,
    pub method: RootMethod,
    pub iterations: usize,
    pub residual: Option<f64>,
}

impl RootReport {
    pub fn converged(&self) -> bool {
        self.status == RootStatus::Converged
    }
}

///
/// Drives a residual to zero with Newton's method, estimating the derivative with a
/// forward finite difference. After every step the point is clamped to `lower_bound`.
/// Infeasible points are never stepped from, instead the search is pulled halfway back
/// towards the last feasible point seen, or towards `lower_bound` if there is none yet.
///
/// # Parameters:
/// - `residual`: The function to find a root of
/// - `initial_guess`: The starting point
/// - `lower_bound`: The smallest point the search may visit
/// - `config`: The tolerance, iteration budget and difference step
///
/// # Returns:
/// - A `RootReport` for the last point reached
///
pub fn find_root<F>(residual: F, initial_guess: f64, lower_bound: f64, config: &SolverConfig) -> RootReport
where
    F: Fn(f64) -> Evaluation,
{
    let tolerance = config.tolerance();
    let step = config.step();

    let mut x = initial_guess.max(lower_bound);
    let mut last_feasible: Option<f64> = None;
    let mut status = RootStatus::IterationsExhausted;
    let mut iterations = 0;

    let pull_back = |x: f64, last_feasible: Option<f64>| {
        let anchor = last_feasible.unwrap_or(lower_bound);
        anchor + (x - anchor) / 2.
    };

    while iterations < config.max_iterations() {
        iterations += 1;

        let f = match residual(x).value() {
            Some(f) => f,
            None => {
                x = pull_back(x, last_feasible);
                continue;
            }
        };
        last_feasible = Some(x);

        if f.abs() < tolerance {
            status = RootStatus::Converged;
            break;
        }

        // forward difference, or backward when the forward point leaves the domain
        let derivative = match residual(x + step).value() {
            Some(ahead) => (ahead - f) / step,
            None => match residual(x - step).value() {
                Some(behind) => (f - behind) / step,
                None => {
                    x = pull_back(x, None);
                    continue;
                }
            },
        };

        if derivative == 0. {
            status = RootStatus::DerivativeVanished;
            break;
        }

        let next = x - f / derivative;
        x = if next.is_finite() { next.max(lower_bound) } else { pull_back(x, last_feasible) };
    }

    let residual_at_root = residual(x).value();
    if status == RootStatus::IterationsExhausted && residual_at_root.is_some_and(|f| f.abs() < tolerance) {
        status = RootStatus::Converged;
    }

    tracing::trace!(root = x, ?status, iterations, "newton search finished");

    RootReport { root: x, status, method: RootMethod::Newton, iterations, residual: residual_at_root }
}

///
/// Runs `find_root`, and when it fails to converge and the configuration allows it, falls back
/// to bisecting a bracket known to contain a sign change of the residual. The bisection is only
/// attempted if both ends of the bracket are feasible and their residuals differ in sign,
/// otherwise the Newton report is returned unchanged.
///
/// # Parameters:
/// - `residual`: The function to find a root of
/// - `initial_guess`: The starting point of the Newton search
/// - `lower_bound`: The smallest point the Newton search may visit
/// - `bracket`: The (lower, upper) ends of the bisection interval
/// - `config`: The solver configuration
///
/// # Returns:
/// - A `RootReport` from whichever method finished last
///
pub fn find_root_bracketed<F>(residual: F, initial_guess: f64, lower_bound: f64, bracket: (f64, f64), config: &SolverConfig) -> RootReport
where
    F: Fn(f64) -> Evaluation,
{
    let newton = find_root(&residual, initial_guess, lower_bound, config);
    if newton.converged() || !config.bisection_fallback() {
        return newton;
    }

    match bisect(&residual, bracket, config) {
        Some(mut report) => {
            report.iterations += newton.iterations;
            tracing::debug!(root = report.root, status = ?report.status, "newton search failed, bisection fallback used");
            report
        }
        None => newton,
    }
}

///
/// Bisects an interval with a sign change of the residual until the residual is within tolerance.
/// Bisection has its own iteration budget, independent of the Newton budget in `config`.
///
/// # Parameters:
/// - `residual`: The function to find a root of
/// - `bracket`: The (lower, upper) ends of the interval
/// - `config`: The solver configuration
///
/// # Returns:
/// - A `RootReport` if the interval brackets a root
/// - `None` if either end is infeasible, or both ends have the same sign
///
fn bisect<F>(residual: &F, bracket: (f64, f64), config: &SolverConfig) -> Option<RootReport>
where
    F: Fn(f64) -> Evaluation,
{
    let (mut lo, mut hi) = bracket;
    if !(lo.is_finite() && hi.is_finite() && lo < hi) {
        return None;
    }

    let mut f_lo = residual(lo).value()?;
    let f_hi = residual(hi).value()?;

    for (root, f) in [(lo, f_lo), (hi, f_hi)] {
        if f.abs() < config.tolerance() {
            return Some(RootReport { root, status: RootStatus::Converged, method: RootMethod::Bisection, iterations: 0, residual: Some(f) });
        }
    }

    if f_lo.signum() == f_hi.signum() {
        return None;
    }

    let mut best = if f_lo.abs() < f_hi.abs() { (lo, f_lo) } else { (hi, f_hi) };
    let mut iterations = 0;

    while iterations < BISECTION_MAX_ITERATIONS {
        iterations += 1;

        let mid = lo + (hi - lo) / 2.;
        if mid <= lo || mid >= hi {
            break;
        }
        let Some(f_mid) = residual(mid).value() else {
            break;
        };

        if f_mid.abs() < best.1.abs() {
            best = (mid, f_mid);
        }
        if f_mid.abs() < config.tolerance() {
            return Some(RootReport { root: mid, status: RootStatus::Converged, method: RootMethod::Bisection, iterations, residual: Some(f_mid) });
        }

        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Some(RootReport { root: best.0, status: RootStatus::IterationsExhausted, method: RootMethod::Bisection, iterations, residual: Some(best.1) })
}


#[cfg(test)]
mod tests {
    use super::*;

    fn feasible(f: impl Fn(f64) -> f64) -> impl Fn(f64) -> Evaluation {
        move |x| Evaluation::Feasible(f(x))
    }

    #[test]
    fn square_root_of_two() {
        let report = find_root(feasible(|x| x * x - 2.), 1., 0., &SolverConfig::default());
        assert!(report.converged());
        assert_eq!(report.method, RootMethod::Newton);
        assert!((report.root - 2_f64.sqrt()).abs() < 1e-6);
        assert!(report.residual.unwrap().abs() < 1e-6);
    }

    #[test]
    fn converged_guess_takes_one_iteration() {
        let report = find_root(feasible(|x| x - 3.), 3., 0., &SolverConfig::default());
        assert!(report.converged());
        assert_eq!(report.iterations, 1);
        assert_eq!(report.root, 3.);
    }

    #[test]
    fn flat_residual_stops() {
        let report = find_root(feasible(|_| 1.), 5., 0., &SolverConfig::default());
        assert_eq!(report.status, RootStatus::DerivativeVanished);
        assert_eq!(report.root, 5.);
    }

    #[test]
    fn clamped_at_lower_bound() {
        // root at -1 is below the bound, so the search parks on the bound
        let config = SolverConfig::default().with_max_iterations(20);
        let report = find_root(feasible(|x| x + 1.), 4., 0.5, &config);
        assert_eq!(report.status, RootStatus::IterationsExhausted);
        assert_eq!(report.iterations, 20);
        assert_eq!(report.root, 0.5);
        assert_eq!(report.residual, Some(1.5));
    }

    #[test]
    fn infeasible_guess_is_pulled_back() {
        // defined on [0, 10] only, with a root at 4
        let residual = |x: f64| if x > 10. { Evaluation::Infeasible } else { Evaluation::Feasible(x - 4.) };
        let report = find_root(residual, 100., 0., &SolverConfig::default());
        assert!(report.converged());
        assert!((report.root - 4.).abs() < 1e-6);
    }

    #[test]
    fn backward_difference_at_domain_edge() {
        // defined up to 10 only, so the forward neighbour of 10 is infeasible
        let residual = |x: f64| if x > 10. { Evaluation::Infeasible } else { Evaluation::Feasible(x - 9.) };
        let report = find_root(residual, 10., 0., &SolverConfig::default());

        // a pull back would have landed on 5 and needed more steps
        assert!(report.converged());
        assert_eq!(report.iterations, 2);
        assert!((report.root - 9.).abs() < 1e-6);
    }

    #[test]
    fn isolated_point_is_pulled_towards_bound() {
        // neither neighbour is feasible, so no derivative can be estimated
        let residual = |x: f64| if x == 8. { Evaluation::Feasible(3.) } else { Evaluation::Infeasible };
        let config = SolverConfig::default().with_max_iterations(1);
        let report = find_root(residual, 8., 2., &config);

        assert_eq!(report.status, RootStatus::IterationsExhausted);
        assert_eq!(report.root, 5.);
        assert_eq!(report.residual, None);
    }

    #[test]
    fn infinite_residual_counts_as_infeasible() {
        assert_eq!(Evaluation::Feasible(f64::INFINITY).value(), None);
        assert_eq!(Evaluation::Feasible(f64::NAN).value(), None);
        assert_eq!(Evaluation::Infeasible.value(), None);
        assert_eq!(Evaluation::Feasible(2.).value(), Some(2.));
    }

    #[test]
    fn bisection_recovers_flat_start() {
        // flat to the right of 10, so Newton started there cannot move
        let residual = feasible(|x: f64| if x > 10. { 1. } else { x - 5. });
        let config = SolverConfig::default();

        let newton = find_root(&residual, 20., 0., &config);
        assert_eq!(newton.status, RootStatus::DerivativeVanished);

        let report = find_root_bracketed(&residual, 20., 0., (0., 20.), &config);
        assert!(report.converged());
        assert_eq!(report.method, RootMethod::Bisection);
        assert!(report.residual.unwrap().abs() < 1e-6);
        assert!(report.iterations > newton.iterations);
    }

    #[test]
    fn bisection_disabled() {
        let residual = feasible(|x: f64| if x > 10. { 1. } else { x - 5. });
        let config = SolverConfig::default().with_bisection_fallback(false);

        let report = find_root_bracketed(&residual, 20., 0., (0., 20.), &config);
        assert_eq!(report.status, RootStatus::DerivativeVanished);
        assert_eq!(report.method, RootMethod::Newton);
    }

    #[test]
    fn bisection_needs_a_sign_change() {
        let residual = feasible(|_| 1.);
        assert!(bisect(&residual, (0., 1.), &SolverConfig::default()).is_none());
        assert!(bisect(&residual, (1., 0.), &SolverConfig::default()).is_none());
    }
}
