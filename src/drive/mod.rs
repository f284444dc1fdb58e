//!
//! Inverse solvers for a two-wheel belt drive
//!

pub mod error;

use std::f64::consts::PI;

use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use crate::config::SolverConfig;
use crate::geometry::error::GeometryError;
use crate::geometry::{self, BeltSolution, WrapAngles, belt_length, ensure_positive, radii, wrap_angles};
use crate::solver::{self, Evaluation, RootReport};
use error::SolveError;

/// Smallest radius the circumference solver may try.
const MIN_RADIUS: f64 = 0.1;
/// Margin kept between the center distance and the radius delta, so `asin` stays defined.
const DISTANCE_MARGIN: f64 = 1e-6;

///
/// Identifies one of the two wheels of the drive.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wheel {
    First,
    Second,
}

impl Wheel {
    ///
    /// # Returns:
    /// - The short name of the wheel's circumference, as shown to users
    ///
    pub fn label(&self) -> &'static str {
        match self {
            Wheel::First => "C1",
            Wheel::Second => "C2",
        }
    }
}

///
/// A solved center distance. The center distance solver is best-effort by default, so the
/// root finder's report is kept alongside the distance for callers to inspect.
///
/// # Fields:
/// - `distance`: The center distance reached
/// - `wrap_angles`: The wrap angles at `distance`
/// - `report`: The root finder's report, including its convergence status
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceSolution {
    pub distance: f64,
    pub wrap_angles: WrapAngles,
    pub report: RootReport,
}

impl DistanceSolution {
    pub fn converged(&self) -> bool {
        self.report.converged()
    }

    ///
    /// # Returns:
    /// - The distance and wrap angles, without the solver report
    ///
    pub fn as_solution(&self) -> BeltSolution {
        BeltSolution { value: self.distance, wrap_angles: self.wrap_angles }
    }
}

///
/// Rejects configurations assembled with the `with_*` setters that no search could finish with.
///
fn ensure_usable(config: &SolverConfig) -> Result<(), SolveError> {
    config.validate().map_err(|err| SolveError::InvalidConfig(err.to_string()))
}

///
/// Builds the belt length residual for a fixed pair of radii, as a function of center distance.
///
fn distance_residual(r1: f64, r2: f64, length: f64) -> impl Fn(f64) -> Evaluation {
    let delta = (r1 - r2).abs();

    move |distance: f64| {
        if distance <= delta {
            return Evaluation::Infeasible;
        }

        match wrap_angles(r1, r2, distance) {
            Ok(angles) => Evaluation::Feasible(belt_length(r1, r2, distance, &angles) - length),
            Err(_) => Evaluation::Infeasible,
        }
    }
}

///
/// Calculates the center distance at which a belt of a given length fits two wheels.
///
/// # Parameters:
/// - `c1`: The circumference of wheel 1
/// - `c2`: The circumference of wheel 2
/// - `length`: The belt length
/// - `config`: The solver configuration
///
/// # Returns:
/// - The center distance and wrap angles. Unless `require_convergence` is configured this is a
/// best effort, check `DistanceSolution::converged`
/// - A `SolveError` if an input or the configuration is invalid, or convergence was required and
/// not reached
///
pub fn solve_center_distance(c1: f64, c2: f64, length: f64, config: &SolverConfig) -> Result<DistanceSolution, SolveError> {
    ensure_usable(config)?;
    ensure_positive("circumference C1", c1)?;
    ensure_positive("circumference C2", c2)?;
    ensure_positive("belt length L", length)?;

    let r = radii(c1, c2);
    let delta = r.delta();

    let initial_guess = f64::max(delta + 1., r.first + r.second);
    let lower_bound = delta + DISTANCE_MARGIN;
    // the belt is never shorter than twice the distance, so length / 2 is past the root
    let bracket = (lower_bound, f64::max(length / 2., lower_bound));

    let report = solver::find_root_bracketed(distance_residual(r.first, r.second, length), initial_guess, lower_bound, bracket, config);

    if !report.converged() {
        if config.require_convergence() {
            return Err(SolveError::ConvergenceFailure { residual: report.residual, iterations: report.iterations, status: report.status });
        }
        tracing::warn!(c1, c2, length, distance = report.root, status = ?report.status, residual = ?report.residual, "center distance did not converge, returning best effort");
    }

    let wrap_angles = wrap_angles(r.first, r.second, report.root)?;
    tracing::debug!(c1, c2, length, distance = report.root, iterations = report.iterations, "solved center distance");

    Ok(DistanceSolution { distance: report.root, wrap_angles, report })
}

///
/// Calculates the circumference of one wheel, given the other wheel, the belt length and the
/// center distance.
///
/// # Parameters:
/// - `known_c`: The circumference of the known wheel
/// - `length`: The belt length
/// - `distance`: The distance between the wheel axes
/// - `unknown`: Which wheel the circumference is solved for, the other is `known_c`
/// - `config`: The solver configuration
///
/// # Returns:
/// - The unknown circumference, with the wrap angles of the solved drive. The first angle always
/// belongs to wheel 1
/// - A `SolveError` if an input or the configuration is invalid, or no circumference satisfies
/// the belt length
///
pub fn solve_unknown_circumference(known_c: f64, length: f64, distance: f64, unknown: Wheel, config: &SolverConfig) -> Result<BeltSolution, SolveError> {
    ensure_usable(config)?;
    ensure_positive("circumference C", known_c)?;
    ensure_positive("belt length L", length)?;
    ensure_positive("center distance D", distance)?;

    let r_known = known_c / (2. * PI);
    let arrange = move |r_unknown: f64| match unknown {
        Wheel::First => (r_unknown, r_known),
        Wheel::Second => (r_known, r_unknown),
    };

    let residual = move |r_unknown: f64| {
        let (r1, r2) = arrange(r_unknown);
        match wrap_angles(r1, r2, distance) {
            Ok(angles) => Evaluation::Feasible(belt_length(r1, r2, distance, &angles) - length),
            Err(_) => Evaluation::Infeasible,
        }
    };

    // the radius can only differ from the known one by the center distance, pulled in slightly
    // so both ends survive rounding
    let reach = distance * (1. - 1e-9);
    let bracket = (f64::max(MIN_RADIUS, r_known - reach), r_known + reach);

    let report = solver::find_root_bracketed(residual, r_known + 1., MIN_RADIUS, bracket, config);

    match report.residual {
        Some(f) if f.abs() < config.tolerance() => {},
        _ => {
            tracing::debug!(known_c, length, distance, ?unknown, status = ?report.status, "unknown circumference did not converge");
            return Err(SolveError::ConvergenceFailure { residual: report.residual, iterations: report.iterations, status: report.status });
        }
    }

    let (r1, r2) = arrange(report.root);
    let wrap_angles = wrap_angles(r1, r2, distance)?;
    let value = 2. * PI * report.root;

    tracing::debug!(known_c, length, distance, ?unknown, circumference = value, "solved unknown circumference");

    Ok(BeltSolution { value, wrap_angles })
}

///
/// Calculates belt lengths for many drives in parallel.
///
/// # Parameters:
/// - `drives`: (C1, C2, D) for each drive
///
/// # Returns:
/// - One result per drive, in input order
///
pub fn forward_belt_lengths(drives: &[(f64, f64, f64)]) -> Vec<Result<BeltSolution, GeometryError>> {
    drives
        .par_iter()
        .map(|&(c1, c2, distance)| geometry::forward_belt_length(c1, c2, distance))
        .collect()
}

///
/// Solves center distances for many drives in parallel.
///
/// # Parameters:
/// - `drives`: (C1, C2, L) for each drive
/// - `config`: The solver configuration shared by every solve
///
/// # Returns:
/// - One result per drive, in input order
///
pub fn solve_center_distances(drives: &[(f64, f64, f64)], config: &SolverConfig) -> Vec<Result<DistanceSolution, SolveError>> {
    drives
        .par_iter()
        .map(|&(c1, c2, length)| solve_center_distance(c1, c2, length, config))
        .collect()
}

///
/// Solves unknown circumferences for many drives in parallel.
///
/// # Parameters:
/// - `drives`: (known C, L, D, unknown wheel) for each drive
/// - `config`: The solver configuration shared by every solve
///
/// # Returns:
/// - One result per drive, in input order
///
pub fn solve_unknown_circumferences(drives: &[(f64, f64, f64, Wheel)], config: &SolverConfig) -> Vec<Result<BeltSolution, SolveError>> {
    drives
        .par_iter()
        .map(|&(known_c, length, distance, unknown)| solve_unknown_circumference(known_c, length, distance, unknown, config))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::forward_belt_length;
    use crate::solver::{RootMethod, RootStatus};

    fn circumference(radius: f64) -> f64 {
        2. * PI * radius
    }

    fn assert_relative(actual: f64, expected: f64, tolerance: f64) {
        assert!(((actual - expected) / expected).abs() < tolerance, "expected {}, got {}", expected, actual);
    }

    #[test]
    fn center_distance_of_reference_drive() {
        let (c1, c2) = (circumference(10.), circumference(5.));
        let length = forward_belt_length(c1, c2, 20.).unwrap().value;

        let solution = solve_center_distance(c1, c2, length, &SolverConfig::default()).unwrap();
        assert!(solution.converged());
        assert_eq!(solution.report.method, RootMethod::Newton);
        assert_relative(solution.distance, 20., 1e-6);
        assert!((solution.wrap_angles.first_degrees() - 208.96).abs() < 0.01);
        assert!((solution.as_solution().value - solution.distance).abs() < 1e-15);
    }

    #[test]
    fn center_distance_of_equal_wheels() {
        let c = circumference(4.);
        let solution = solve_center_distance(c, c, c + 50., &SolverConfig::default()).unwrap();
        assert!(solution.converged());
        assert_relative(solution.distance, 25., 1e-6);
        assert!((solution.wrap_angles.first_degrees() - 180.).abs() < 1e-9);
    }

    #[test]
    fn center_distance_best_effort() {
        // shorter than the belt needed to wrap both wheels at all
        let (c1, c2) = (circumference(10.), circumference(5.));
        let solution = solve_center_distance(c1, c2, 10., &SolverConfig::default()).unwrap();

        assert!(!solution.converged());
        assert!(solution.distance >= 5.);
        assert!(solution.report.residual.unwrap() > 0.);
    }

    #[test]
    fn center_distance_required_convergence() {
        let (c1, c2) = (circumference(10.), circumference(5.));
        let config = SolverConfig::default().with_require_convergence(true);

        let err = solve_center_distance(c1, c2, 10., &config).unwrap_err();
        assert!(matches!(err, SolveError::ConvergenceFailure { .. }));
    }

    #[test]
    fn second_circumference_of_reference_drive() {
        let (c1, c2) = (circumference(10.), circumference(5.));
        let length = forward_belt_length(c1, c2, 20.).unwrap().value;

        let solution = solve_unknown_circumference(c1, length, 20., Wheel::Second, &SolverConfig::default()).unwrap();
        assert_relative(solution.value, c2, 1e-6);
        assert!(solution.wrap_angles.first > PI);
    }

    #[test]
    fn first_circumference_of_reference_drive() {
        let (c1, c2) = (circumference(10.), circumference(5.));
        let length = forward_belt_length(c1, c2, 20.).unwrap().value;

        // wheel 2 is known, so wheel 1 is solved for and keeps the larger wrap angle
        let solution = solve_unknown_circumference(c2, length, 20., Wheel::First, &SolverConfig::default()).unwrap();
        assert_relative(solution.value, c1, 1e-6);
        assert!((solution.wrap_angles.first_degrees() - 208.96).abs() < 0.01);
    }

    #[test]
    fn circumference_unreachable_length() {
        let err = solve_unknown_circumference(circumference(10.), 10., 20., Wheel::Second, &SolverConfig::default()).unwrap_err();
        match err {
            SolveError::ConvergenceFailure { residual, .. } => assert!(residual.unwrap() > 0.),
            other => panic!("unexpected error {}", other),
        }
    }

    #[test]
    fn circumference_recovered_by_bisection() {
        // the initial guess lies outside the feasible window when the distance is below 1
        let (c1, c2) = (circumference(3.), circumference(2.7));
        let length = forward_belt_length(c1, c2, 0.5).unwrap().value;

        let config = SolverConfig::default().with_max_iterations(3);
        let solution = solve_unknown_circumference(c1, length, 0.5, Wheel::Second, &config).unwrap();
        assert_relative(solution.value, c2, 1e-6);
    }

    #[test]
    fn circumference_without_fallback() {
        let (c1, c2) = (circumference(3.), circumference(2.7));
        let length = forward_belt_length(c1, c2, 0.5).unwrap().value;

        let config = SolverConfig::default().with_max_iterations(3).with_bisection_fallback(false);
        let err = solve_unknown_circumference(c1, length, 0.5, Wheel::Second, &config).unwrap_err();
        assert!(matches!(err, SolveError::ConvergenceFailure { status: RootStatus::IterationsExhausted, .. }));
    }

    #[test]
    fn invalid_inputs() {
        let config = SolverConfig::default();
        assert!(matches!(solve_center_distance(-1., 10., 100., &config), Err(SolveError::Geometry(GeometryError::InvalidInput { .. }))));
        assert!(matches!(solve_unknown_circumference(10., 0., 10., Wheel::First, &config), Err(SolveError::Geometry(_))));
    }

    #[test]
    fn unusable_config_rejected() {
        let (c1, c2) = (circumference(10.), circumference(5.));
        let length = forward_belt_length(c1, c2, 20.).unwrap().value;

        let flat_step = SolverConfig::default().with_step(0.);
        let err = solve_center_distance(c1, c2, length, &flat_step).unwrap_err();
        assert!(matches!(err, SolveError::InvalidConfig(_)));
        assert!(err.to_string().contains("`step`"));

        let no_tolerance = SolverConfig::default().with_tolerance(f64::NAN);
        let err = solve_unknown_circumference(c1, length, 20., Wheel::Second, &no_tolerance).unwrap_err();
        assert!(matches!(err, SolveError::InvalidConfig(_)));

        let results = solve_center_distances(&[(c1, c2, length)], &flat_step);
        assert!(matches!(results[0], Err(SolveError::InvalidConfig(_))));
    }

    #[test]
    fn batches_match_single_solves() {
        let config = SolverConfig::default();
        let drives = [(30., 60., 25.), (60., 30., 25.), (50., 50., 10.), (100., 10., 1.)];

        let lengths = forward_belt_lengths(&drives);
        assert!(matches!(lengths[3], Err(GeometryError::InfeasibleGeometry { .. })));

        let inverse: Vec<(f64, f64, f64)> = drives[..3].iter().zip(&lengths).map(|(&(c1, c2, _), l)| (c1, c2, l.as_ref().unwrap().value)).collect();
        for (solution, &(_, _, distance)) in solve_center_distances(&inverse, &config).iter().zip(&drives) {
            assert_relative(solution.as_ref().unwrap().distance, distance, 1e-3);
        }

        let circumferences: Vec<(f64, f64, f64, Wheel)> = inverse.iter().zip(&drives).map(|(&(c1, _, l), &(_, _, d))| (c1, l, d, Wheel::Second)).collect();
        for (solution, &(_, c2, _)) in solve_unknown_circumferences(&circumferences, &config).iter().zip(&drives) {
            assert_relative(solution.as_ref().unwrap().value, c2, 1e-3);
        }
    }
}
