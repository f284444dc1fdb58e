use thiserror::Error;

use crate::geometry::error::GeometryError;

///
/// All errors emitted while generating a preview image.
///
/// - `Geometry`: When the drive could not be laid out
/// - `Image`: When the image could not be written
///     Parameters:
///     - `path`: The requested output path
///     - `source`: The underlying image error
///
#[derive(Error, Debug)]
pub enum PreviewError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("Could not save the preview to {}: {}", .path, .source)]
    Image { path: String, source: image::ImageError },
}
