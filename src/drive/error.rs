use thiserror::Error;

use crate::geometry::error::GeometryError;
use crate::solver::RootStatus;

///
/// All errors emitted from the inverse solvers.
/// The error messages can be displayed to users on the frontend. Format nicely please.
///
/// - `Geometry`: When the inputs describe an impossible drive, see `GeometryError`
/// - `ConvergenceFailure`: When no solution satisfying the belt length was found
///     Parameters:
///     - `residual`: The belt length error at the last point reached, `None` if that point was
///     itself infeasible
///     - `iterations`: The number of iterations performed
///     - `status`: Why the root finder stopped
/// - `InvalidConfig`: When the solver configuration cannot drive a search, see `SolverConfig::validate`
///
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("Could not converge after {} iterations ({:?}, remaining belt length error {}). Check the parameters are reasonable.", .iterations, .status, display_residual(.residual))]
    ConvergenceFailure { residual: Option<f64>, iterations: usize, status: RootStatus },

    #[error("{}", .0)]
    InvalidConfig(String),
}

fn display_residual(residual: &Option<f64>) -> String {
    match residual {
        Some(value) => format!("{:.6}", value),
        None => "undefined".to_owned(),
    }
}
