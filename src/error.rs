//! Error types for the visibility engine
//!
//! This module defines the error types used throughout the crate,
//! covering scene assembly, hierarchy construction and the
//! occlusion-query backend.

use std::fmt;

/// Result type for visibility engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Visibility engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Occlusion-query backend error (driver failure, exhausted query handles)
    BackendError(String),

    /// Scene assembly misuse (out-of-order calls, malformed vertex data)
    InvalidScene(String),

    /// Hierarchy construction failed (e.g. scene without geometries)
    BuildFailed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidScene(msg) => write!(f, "Invalid scene: {}", msg),
            Error::BuildFailed(msg) => write!(f, "Build failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Construct an [`Error::InvalidScene`], logging it with source information.
///
/// # Example
///
/// ```no_run
/// # use vistree::vis_err;
/// # let index = 3;
/// let err = vis_err!("vistree::SceneData", "geometry index {} out of range", index);
/// ```
#[macro_export]
macro_rules! vis_err {
    ($source:expr, $($arg:tt)*) => {{
        $crate::vis_error!($source, $($arg)*);
        $crate::error::Error::InvalidScene(format!($($arg)*))
    }};
}

/// Return early with a [`vis_err!`].
#[macro_export]
macro_rules! vis_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::vis_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
