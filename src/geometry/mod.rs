//!
//! Closed-form geometry of an open belt wrapped around two wheels
//!

pub mod error;

use std::f64::consts::PI;

use serde::Serialize;
use error::GeometryError;

/// Relative slack, in machine epsilons, granted when comparing the center distance to the radius delta.
const BOUNDARY_ULPS: f64 = 4.;

///
/// The radii of both wheels, in the same unit as the circumferences they were derived from.
///
/// # Fields:
/// - `first`: The radius of wheel 1
/// - `second`: The radius of wheel 2
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Radii {
    pub first: f64,
    pub second: f64,
}

impl Radii {
    ///
    /// # Returns:
    /// - The absolute difference between the two radii
    ///
    pub fn delta(&self) -> f64 {
        (self.first - self.second).abs()
    }
}

///
/// The angular contact of the belt on both wheels. The larger wheel is always wrapped by more
/// than half a turn, as the belt bends in towards the smaller wheel on both tangent runs.
///
/// # Fields:
/// - `first`: The wrap angle on wheel 1, in radians
/// - `second`: The wrap angle on wheel 2, in radians
/// - `delta`: The absolute difference of the radii the angles were computed from
/// - `theta`: The half-wrap offset, `asin(delta / distance)`
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WrapAngles {
    pub first: f64,
    pub second: f64,
    pub delta: f64,
    pub theta: f64,
}

impl WrapAngles {
    pub fn first_degrees(&self) -> f64 {
        self.first.to_degrees()
    }

    pub fn second_degrees(&self) -> f64 {
        self.second.to_degrees()
    }
}

///
/// A solved scalar, along with the wrap angles of the geometry it was solved for. The angles are
/// reported so frontends can display them next to the result.
///
/// # Fields:
/// - `value`: The solved quantity, e.g. a belt length or a circumference
/// - `wrap_angles`: The wrap angles of the final geometry
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeltSolution {
    pub value: f64,
    pub wrap_angles: WrapAngles,
}

///
/// Converts two circumferences into radii.
///
/// # Parameters:
/// - `c1`: The circumference of wheel 1
/// - `c2`: The circumference of wheel 2
///
/// # Returns:
/// - The radii of both wheels
///
pub fn radii(c1: f64, c2: f64) -> Radii {
    Radii { first: c1 / (2. * PI), second: c2 / (2. * PI) }
}

///
/// Calculates the wrap angles of the belt on both wheels.
///
/// # Parameters:
/// - `r1`: The radius of wheel 1
/// - `r2`: The radius of wheel 2
/// - `distance`: The distance between the wheel axes
///
/// # Returns:
/// - The wrap angles, with the radius delta and half-wrap offset used to compute them
/// - `InfeasibleGeometry` if the belt cannot span the wheels at this distance
///
pub fn wrap_angles(r1: f64, r2: f64, distance: f64) -> Result<WrapAngles, GeometryError> {
    let delta = (r1 - r2).abs();

    // a distance a few ulps short of delta is the half-turn boundary after rounding
    if distance < delta * (1. - BOUNDARY_ULPS * f64::EPSILON) {
        return Err(GeometryError::InfeasibleGeometry { distance, delta });
    }

    let ratio = delta / distance;
    if !ratio.is_finite() || ratio < 0. {
        return Err(GeometryError::InfeasibleGeometry { distance, delta });
    }
    let theta = ratio.min(1.).asin();

    let (first, second) = if r1 > r2 {
        (PI + 2. * theta, PI - 2. * theta)
    } else {
        (PI - 2. * theta, PI + 2. * theta)
    };

    Ok(WrapAngles { first, second, delta, theta })
}

///
/// Calculates the length of both straight belt runs between the wheels.
///
/// # Parameters:
/// - `distance`: The distance between the wheel axes
/// - `delta`: The absolute difference of the radii, a `delta` past `distance` counts as equal
///
pub fn tangent_length(distance: f64, delta: f64) -> f64 {
    2. * f64::sqrt(f64::max(f64::powi(distance, 2) - f64::powi(delta, 2), 0.))
}

///
/// Calculates the total belt length: both arcs in contact with the wheels, plus both straight
/// runs.
///
/// # Parameters:
/// - `r1`: The radius of wheel 1
/// - `r2`: The radius of wheel 2
/// - `distance`: The distance between the wheel axes
/// - `angles`: The wrap angles for this geometry, see `wrap_angles`
///
/// # Returns:
/// - The belt length
///
pub fn belt_length(r1: f64, r2: f64, distance: f64, angles: &WrapAngles) -> f64 {
    angles.first * r1 + angles.second * r2 + tangent_length(distance, angles.delta)
}

///
/// Calculates the belt length required for two wheels at a given center distance.
///
/// # Parameters:
/// - `c1`: The circumference of wheel 1
/// - `c2`: The circumference of wheel 2
/// - `distance`: The distance between the wheel axes
///
/// # Returns:
/// - The belt length, with the wrap angles on both wheels
/// - A `GeometryError` if an input is invalid, or the belt cannot span the wheels
///
pub fn forward_belt_length(c1: f64, c2: f64, distance: f64) -> Result<BeltSolution, GeometryError> {
    ensure_positive("circumference C1", c1)?;
    ensure_positive("circumference C2", c2)?;
    ensure_positive("center distance D", distance)?;

    let r = radii(c1, c2);
    let wrap_angles = wrap_angles(r.first, r.second, distance)?;
    let value = belt_length(r.first, r.second, distance, &wrap_angles);

    tracing::debug!(c1, c2, distance, length = value, "computed belt length");

    Ok(BeltSolution { value, wrap_angles })
}

///
/// Checks a user supplied length is a finite, positive number.
///
/// # Parameters:
/// - `name`: The name of the quantity, used in the error message
/// - `value`: The value to check
///
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<(), GeometryError> {
    if value.is_finite() && value > 0. {
        Ok(())
    } else {
        Err(GeometryError::InvalidInput { name, value })
    }
}
