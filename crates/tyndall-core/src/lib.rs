//! Core single-configuration engine for the Tyndall scattering suite.
//!
//! Everything in this crate evaluates one fully-specified optical
//! configuration: a plane-polarised Gaussian source, one scatterer
//! (homogeneous sphere, infinite cylinder at normal incidence, or
//! core-shell sphere), and optionally one fiber-coupled detector. The
//! Lorenz-Mie partial-wave coefficients are computed once per scatterer
//! and every derived quantity (efficiencies, cross-sections, far-field
//! amplitudes, modal coupling) reads from that cached series.
//!
//! Parameter sweeps over these configurations live in the companion
//! `tyndall-experiment` crate.
//!
//! ## Modules
//!
//! - [`source`]: Gaussian beam parameterisation and vacuum constants.
//! - [`scatterer`]: Mie coefficient recurrences and the [`Scatterer`] trait.
//! - [`detector`]: fiber/free-space detectors and modal coupling.
//! - [`modes`]: LP / HG / LG / sampling mode field templates.
//! - [`mesh`]: Fibonacci cap and full-steradian angular grids.
//! - [`special`]: Bessel and Hankel evaluations backing the recurrences.
//! - [`error`]: construction-time error type.
//!
//! ## Conventions
//!
//! Lengths are arbitrary but must share one unit across a configuration
//! (wavelength, diameters, shell widths). Angles are radians. Complex
//! refractive indices follow the `n + ik` convention with `k >= 0` for
//! absorbing media.

pub mod detector;
pub mod error;
pub mod mesh;
pub mod modes;
pub mod scatterer;
pub mod source;
pub mod special;

pub use detector::Detector;
pub use error::ScatterError;
pub use mesh::{FibonacciMesh, FullSteradian};
pub use modes::{BeamFrame, ModeFamily, ModeId};
pub use scatterer::{CoreShell, Cylinder, Scatterer, ScattererKind, Sphere};
pub use source::Gaussian;
