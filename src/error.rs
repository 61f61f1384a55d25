//! Error taxonomy for tick, label and gridline computation.
//!
//! Geometry inconsistencies found while building gridlines are *not* errors:
//! they are reported through `tracing::warn!` and the offending gridline is
//! skipped.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the placement engine and its configuration surface.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The external WCS transform failed or returned non-finite values.
    #[error("projection error: {0}")]
    Projection(String),

    /// A latitude folded into the forbidden (90°, 270°) band.
    #[error("latitude out of range: {degrees}°{minutes}'{seconds}\" does not fold into [-90, 90]")]
    InvalidLatitude {
        degrees: i64,
        minutes: i64,
        seconds: f64,
    },

    /// An explicit tick spacing cannot be shown faithfully with the label format.
    #[error(
        "label format {format:?} cannot display a tick spacing of {spacing} \
         (the spacing must be a multiple of {precision})"
    )]
    InconsistentSpacing {
        spacing: String,
        format: String,
        precision: String,
    },

    /// Unparseable label format string.
    #[error("invalid label format: {0}")]
    InvalidFormat(String),

    /// Unknown label style name.
    #[error("invalid label style {0:?} (expected plain, colons or latex)")]
    InvalidStyle(String),

    /// An angle was constructed from NaN or an infinite value.
    #[error("non-finite angle: {0}")]
    NonFiniteAngle(f64),

    /// Labels requested on an edge that does not belong to the axis.
    #[error("invalid label edge: {0}")]
    InvalidEdge(String),

    /// Inverted or non-finite viewport bounds, or a bad zoom factor.
    #[error("invalid viewport: {0}")]
    InvalidViewport(String),

    /// Non-positive, non-finite or unparseable spacing value.
    #[error("invalid spacing: {0}")]
    InvalidSpacing(String),
}
