use image::GrayImage;
use image::Luma;
use imageproc::drawing::{draw_antialiased_line_segment_mut, draw_hollow_circle_mut};
use imageproc::pixelops::interpolate;

///
/// A canvas image with appropriate handling methods, to generate previews of belt drives.
/// Drawing calls take drive coordinates, which are offset by `origin` and multiplied by `scale`
/// to find pixels.
///
/// # Fields:
/// - `width`: The width of the image, in pixels
/// - `height`: The height of the image, in pixels
/// - `scale`: Pixels per unit of length
/// - `origin`: The drive coordinates of the top left pixel
///
pub struct PreviewCanvas {
    pub width: u32,
    pub height: u32,
    pub scale: f64,
    pub origin: (f64, f64),

    pub buffer: GrayImage,
}

impl PreviewCanvas {
    ///
    /// Creates a new instance of the image canvas, with a white image buffer.
    ///
    /// # Parameters:
    /// - `width`: The width of the image, in pixels
    /// - `height`: The height of the image, in pixels
    /// - `scale`: Pixels per unit of length
    /// - `origin`: The drive coordinates of the top left pixel
    ///
    /// # Returns:
    /// - A new `PreviewCanvas` instance
    ///
    pub fn new(width: u32, height: u32, scale: f64, origin: (f64, f64)) -> PreviewCanvas {
        let buffer = GrayImage::from_pixel(width.max(1), height.max(1), Luma([255]));

        PreviewCanvas { width: buffer.width(), height: buffer.height(), scale, origin, buffer }
    }

    ///
    /// Saves the preview to a PNG file on the disk.
    ///
    /// # Parameters:
    /// - `path`: The path to save the image file to
    ///
    pub fn save(&self, path: &str) -> Result<(), image::ImageError> {
        self.buffer.save_with_format(path, image::ImageFormat::Png)
    }

    ///
    /// Draws an antialiased line between two points on the canvas. This function respects `scale`.
    ///
    /// # Parameters:
    /// - `x1` and `y1`: The x/y of the first point on the line
    /// - `x2` and `y2`: The x/y of the second point on the line
    ///
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let (start, end) = (self.to_pixel(x1, y1), self.to_pixel(x2, y2));
        draw_antialiased_line_segment_mut(&mut self.buffer, start, end, Luma([0]), interpolate);
    }

    ///
    /// Draws the outline of a circle. This function respects `scale`.
    ///
    /// # Parameters:
    /// - `x` and `y`: The center of the circle
    /// - `radius`: The radius of the circle
    ///
    pub fn circle(&mut self, x: f64, y: f64, radius: f64) {
        let center = self.to_pixel(x, y);
        let radius = (radius * self.scale).round().max(1.) as i32;
        draw_hollow_circle_mut(&mut self.buffer, center, radius, Luma([0]));
    }

    ///
    /// Moves and scales drive coordinates onto the pixel grid.
    ///
    /// # Parameters:
    /// - `x`: The drive x value
    /// - `y`: The drive y value
    ///
    fn to_pixel(&self, x: f64, y: f64) -> (i32, i32) {
        (
            ((x - self.origin.0) * self.scale).floor() as i32,
            ((y - self.origin.1) * self.scale).floor() as i32,
        )
    }
}
