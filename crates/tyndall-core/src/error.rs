//! Error taxonomy for the scattering engine.
//!
//! Everything here is a *configuration* error: it is detected while an
//! object is being constructed, before any series evaluation starts.
//! Numerical edge conditions (near-singular coefficient denominators,
//! infinite wavefront curvature at zero propagation distance) are not
//! errors — they propagate as computed IEEE values.

use thiserror::Error;

/// Errors raised while constructing sources, scatterers, or detectors.
#[derive(Debug, Clone, Error)]
pub enum ScatterError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid source: {0}")]
    InvalidSource(String),

    #[error("invalid detector: {0}")]
    InvalidDetector(String),

    #[error("unknown mode identifier '{0}' (expected LP/HG/LG/NC followed by two digits)")]
    UnknownMode(String),
}
