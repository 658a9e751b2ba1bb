use thiserror::Error;

/// Errors that can occur while reading font programs.
#[derive(Error, Debug)]
pub enum FontError {
    #[error("font I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid font data")]
    InvalidFont,

    #[error("no font found for `{0}`")]
    NotFound(String),
}

/// Errors returned by family registration.
///
/// None of these are fatal: the family record stays present but
/// uninitialized, and registration may be retried with corrected input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("font family `{0}` is already loaded")]
    AlreadyLoaded(String),

    #[error("font family `{0}` declares no faces")]
    NoFaces(String),

    #[error("invalid family configuration: {0}")]
    InvalidConfiguration(String),
}

/// Convenient result alias for font-related operations.
pub type Result<T> = std::result::Result<T, FontError>;
