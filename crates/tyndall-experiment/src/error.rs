//! Sweep-level error type.

use thiserror::Error;

use tyndall_core::ScatterError;

use crate::measure::Measure;
use crate::parameters::ScattererFamily;

/// Errors raised while validating or running a sweep.
///
/// Per-cell construction failures surface as [`ExperimentError::Scatter`];
/// everything else is caught before any cell is evaluated.
#[derive(Debug, Clone, Error)]
pub enum ExperimentError {
    #[error("axis `{axis}` of the {set} set is empty")]
    EmptyAxis { set: &'static str, axis: &'static str },

    #[error(
        "axis `{axis}` of the {set} set holds {got} values; sequential mode needs {expected} (or 1 to broadcast)"
    )]
    SequentialLengthMismatch {
        set: &'static str,
        axis: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("measure `{measure}` is not defined for {family} scatterers")]
    UnsupportedMeasure {
        measure: Measure,
        family: ScattererFamily,
    },

    #[error("measure `{measure}` requires a detector")]
    MissingDetector { measure: Measure },

    #[error("unknown measure `{0}`")]
    UnknownMeasure(String),

    #[error("result tensor shape mismatch: {0}")]
    Shape(String),

    #[error(transparent)]
    Scatter(#[from] ScatterError),
}
