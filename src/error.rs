use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied value is outside the operation's contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A direction was requested from a zero-length edge or vector.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn invalid_argument(m: impl Into<String>) -> Error {
    Error::InvalidArgument(m.into())
}

pub fn degenerate(m: impl Into<String>) -> Error {
    Error::DegenerateGeometry(m.into())
}
