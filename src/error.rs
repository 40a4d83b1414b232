use thiserror::Error;

/// Errors raised by the clustering core and its image boundary.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed clustering or segmentation input. Raised before any state is touched.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Image has no pixels")]
    EmptyImage,
}

/// Type alias for Result with our custom error type
pub type Result<T> = std::result::Result<T, Error>;
