use nalgebra::{Point2, Vector2};

use crate::geometry::error::GeometryError;
use crate::geometry::{WrapAngles, ensure_positive, radii, wrap_angles};

///
/// A straight belt run between the two wheels.
///
/// # Fields:
/// - `start`: The tangent point on wheel 1
/// - `end`: The tangent point on wheel 2
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeltRun {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl BeltRun {
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }
}

///
/// The planar layout of a belt drive. Wheel 1 sits at the origin and wheel 2 on the positive
/// x axis, y grows downwards as on an image.
///
/// # Fields:
/// - `first_center`: The axis of wheel 1
/// - `second_center`: The axis of wheel 2
/// - `first_radius`: The radius of wheel 1
/// - `second_radius`: The radius of wheel 2
/// - `upper`: The belt run above the axes
/// - `lower`: The belt run below the axes
/// - `wrap_angles`: The wrap angles of the drive
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveLayout {
    pub first_center: Point2<f64>,
    pub second_center: Point2<f64>,
    pub first_radius: f64,
    pub second_radius: f64,
    pub upper: BeltRun,
    pub lower: BeltRun,
    pub wrap_angles: WrapAngles,
}

impl DriveLayout {
    ///
    /// Lays out a drive from its circumferences and center distance.
    ///
    /// # Parameters:
    /// - `c1`: The circumference of wheel 1
    /// - `c2`: The circumference of wheel 2
    /// - `distance`: The distance between the wheel axes
    ///
    /// # Returns:
    /// - A new `DriveLayout` instance
    /// - A `GeometryError` if the drive is impossible
    ///
    pub fn new(c1: f64, c2: f64, distance: f64) -> Result<DriveLayout, GeometryError> {
        ensure_positive("circumference C1", c1)?;
        ensure_positive("circumference C2", c2)?;
        ensure_positive("center distance D", distance)?;

        let r = radii(c1, c2);
        let wrap_angles = wrap_angles(r.first, r.second, distance)?;

        let first_center = Point2::new(0., 0.);
        let second_center = Point2::new(distance, 0.);

        // a run touching both wheels has a unit normal n with (O2 - O1) . n = r1 - r2
        let cos_phi = ((r.first - r.second) / distance).clamp(-1., 1.);
        let sin_phi = f64::sqrt(1. - cos_phi * cos_phi);

        let run = |normal: Vector2<f64>| BeltRun {
            start: first_center + normal * r.first,
            end: second_center + normal * r.second,
        };

        Ok(DriveLayout {
            first_center,
            second_center,
            first_radius: r.first,
            second_radius: r.second,
            upper: run(Vector2::new(cos_phi, -sin_phi)),
            lower: run(Vector2::new(cos_phi, sin_phi)),
            wrap_angles,
        })
    }

    ///
    /// # Returns:
    /// - The (min, max) corners of the box enclosing both wheels
    ///
    pub fn bounds(&self) -> (Point2<f64>, Point2<f64>) {
        let half_height = self.first_radius.max(self.second_radius);
        (
            Point2::new(-self.first_radius, -half_height),
            Point2::new(self.second_center.x + self.second_radius, half_height),
        )
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    use crate::geometry::{forward_belt_length, tangent_length};

    #[test]
    fn tangent_points_touch_both_wheels() {
        let layout = DriveLayout::new(2. * PI * 10., 2. * PI * 5., 20.).unwrap();

        for run in [layout.upper, layout.lower] {
            assert!(((run.start - layout.first_center).norm() - 10.).abs() < 1e-9);
            assert!(((run.end - layout.second_center).norm() - 5.).abs() < 1e-9);

            // the run is perpendicular to the radius at both ends
            let direction = run.end - run.start;
            assert!(direction.dot(&(run.start - layout.first_center)).abs() < 1e-9);
            assert!(direction.dot(&(run.end - layout.second_center)).abs() < 1e-9);
        }
    }

    #[test]
    fn runs_match_belt_length() {
        let (c1, c2, distance) = (2. * PI * 10., 2. * PI * 5., 20.);
        let layout = DriveLayout::new(c1, c2, distance).unwrap();

        assert!((layout.upper.length() + layout.lower.length() - tangent_length(distance, 5.)).abs() < 1e-9);

        // the back of wheel 1, between the two tangent points, is its wrap angle
        let upper = layout.upper.start - layout.first_center;
        let lower = layout.lower.start - layout.first_center;
        let front = upper.angle(&lower);
        assert!((2. * PI - front - layout.wrap_angles.first).abs() < 1e-9);

        let arcs = layout.wrap_angles.first * layout.first_radius + layout.wrap_angles.second * layout.second_radius;
        let total = arcs + layout.upper.length() + layout.lower.length();
        assert!((total - forward_belt_length(c1, c2, distance).unwrap().value).abs() < 1e-9);
    }

    #[test]
    fn bounds_enclose_both_wheels() {
        let layout = DriveLayout::new(2. * PI * 4., 2. * PI * 6., 15.).unwrap();
        let (min, max) = layout.bounds();
        assert!((min.x + 4.).abs() < 1e-9 && (min.y + 6.).abs() < 1e-9);
        assert!((max.x - 21.).abs() < 1e-9 && (max.y - 6.).abs() < 1e-9);
    }

    #[test]
    fn impossible_layout() {
        assert!(DriveLayout::new(2. * PI * 10., 2. * PI * 5., 4.).is_err());
    }
}
