//! # Tyndall Experiment
//!
//! Parameter sweeps over the scattering solvers in `tyndall-core`. An
//! [`Experiment`] bundles value lists for the source, the scatterer and
//! optionally the detector, then evaluates a [`Measure`] either over
//! the full Cartesian product of the axes (a dense tensor) or stepwise
//! with all axes advancing together (a vector).
//!
//! Axis order in factorial results is fixed: source axes, then
//! scatterer axes, then detector axes when the measure involves the
//! detector. [`Experiment::axis_names`] reports the order.

pub mod address;
pub mod error;
pub mod measure;
pub mod parameters;
pub mod sweep;

pub use error::ExperimentError;
pub use measure::Measure;
pub use parameters::{
    CoreShellSet, CylinderSet, DetectorSet, ScattererFamily, ScattererSet, SourceSet, SphereSet,
};
pub use sweep::Experiment;
