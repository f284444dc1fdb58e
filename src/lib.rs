//!
//! Geometry and numerical solvers for a two-wheel, open belt drive
//!

pub mod config;
pub mod drive;
pub mod geometry;
pub mod locale;
pub mod preview;
pub mod solver;
