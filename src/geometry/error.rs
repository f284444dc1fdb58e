use thiserror::Error;

///
/// All errors emitted from the geometry module.
/// The error messages can be displayed to users on the frontend. Format nicely please.
///
/// - `InfeasibleGeometry`: When the belt cannot physically span the two wheels, because the
/// center distance is smaller than the difference of the radii
///     Parameters:
///     - `distance`: The requested center distance
///     - `delta`: The absolute difference of the two radii
/// - `InvalidInput`: When a length is zero, negative or not a number
///     Parameters:
///     - `name`: The quantity which was invalid
///     - `value`: The rejected value
///
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("The center distance {distance} cannot be smaller than the difference of the wheel radii ({delta}).")]
    InfeasibleGeometry { distance: f64, delta: f64 },

    #[error("The {name} must be a positive number, got {value}.")]
    InvalidInput { name: &'static str, value: f64 },
}
