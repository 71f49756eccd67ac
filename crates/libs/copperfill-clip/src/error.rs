use std::error::Error;
use std::fmt;
use std::result;

/// Custom result type for clipping operations.
pub type Result<T> = result::Result<T, ClipError>;

/// Errors the clipping engine can report.
///
/// Geometric degeneracies (empty inputs, collapsed contours) are not errors;
/// they simply produce empty results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipError {
    /// A coordinate magnitude exceeds [`HI_RANGE`](crate::types::HI_RANGE),
    /// which would overflow the exact intersection arithmetic.
    CoordinateOutOfRange,
    /// An open path was handed to an operation requiring closed polygons.
    OpenPathsNotSupported,
}

impl fmt::Display for ClipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipError::CoordinateOutOfRange => {
                write!(f, "coordinate value outside allowed range")
            }
            ClipError::OpenPathsNotSupported => {
                write!(f, "open paths are not supported for this operation")
            }
        }
    }
}

impl Error for ClipError {}
