//!
//! Image-based preview generation of a belt drive layout
//!

pub mod canvas;
pub mod error;
pub mod layout;

use canvas::PreviewCanvas;
use error::PreviewError;
use layout::DriveLayout;

/// Width of a generated preview, in pixels.
pub const PREVIEW_WIDTH: u32 = 800;
/// Blank border around the drive, as a fraction of its width.
const MARGIN: f64 = 0.05;

///
/// Draws both wheels and both belt runs of a layout onto a new canvas, scaled to fit `width`
/// pixels.
///
/// # Parameters:
/// - `layout`: The drive layout to draw
/// - `width`: The width of the image, in pixels
///
/// # Returns:
/// - A canvas holding the drawing
///
pub fn render_layout(layout: &DriveLayout, width: u32) -> PreviewCanvas {
    let (min, max) = layout.bounds();
    let margin = (max.x - min.x) * MARGIN;

    let drive_width = max.x - min.x + 2. * margin;
    let drive_height = max.y - min.y + 2. * margin;
    let scale = width as f64 / drive_width;
    let height = (drive_height * scale).ceil() as u32;

    let mut canvas = PreviewCanvas::new(width, height, scale, (min.x - margin, min.y - margin));

    canvas.circle(layout.first_center.x, layout.first_center.y, layout.first_radius);
    canvas.circle(layout.second_center.x, layout.second_center.y, layout.second_radius);
    for run in [layout.upper, layout.lower] {
        canvas.line(run.start.x, run.start.y, run.end.x, run.end.y);
    }

    canvas
}

///
/// Lays out a drive, draws it and saves the image as a PNG.
///
/// # Parameters:
/// - `c1`: The circumference of wheel 1
/// - `c2`: The circumference of wheel 2
/// - `distance`: The distance between the wheel axes
/// - `path`: The path to save the preview image to - *no checks are done to confirm the directory exists*
///
/// # Returns:
/// - Void if the preview was generated and saved
/// - A `PreviewError` explaining why the preview could not be generated
///
pub fn generate_preview(c1: f64, c2: f64, distance: f64, path: &str) -> Result<(), PreviewError> {
    let layout = DriveLayout::new(c1, c2, distance)?;
    let canvas = render_layout(&layout, PREVIEW_WIDTH);

    canvas.save(path).map_err(|source| PreviewError::Image { path: path.to_owned(), source })?;
    tracing::info!(path, width = canvas.width, height = canvas.height, "saved drive preview");

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn render_fits_width() {
        let layout = DriveLayout::new(2. * PI * 10., 2. * PI * 5., 20.).unwrap();
        let canvas = render_layout(&layout, 400);

        assert_eq!(canvas.width, 400);
        assert!(canvas.height > 0 && canvas.height < 400);
        assert!(canvas.buffer.pixels().any(|p| p.0[0] < 128));
    }

    #[test]
    fn saves_png() {
        let path = std::env::temp_dir().join(format!("beltdrive-preview-{}.png", std::process::id()));
        let path = path.to_str().unwrap();

        generate_preview(2. * PI * 10., 2. * PI * 5., 20., path).unwrap();
        let image = image::open(path).unwrap();
        let _ = std::fs::remove_file(path);

        assert_eq!(image.width(), PREVIEW_WIDTH);
    }

    #[test]
    fn impossible_drive() {
        let err = generate_preview(2. * PI * 10., 2. * PI * 5., 1., "unused.png").unwrap_err();
        assert!(matches!(err, PreviewError::Geometry(_)));
    }
}
