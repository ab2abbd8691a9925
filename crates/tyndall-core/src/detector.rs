//! Detectors and modal coupling.
//!
//! A detector is an aperture of given numerical aperture looking at the
//! scatterer from a direction set by two tilt offsets, plus a mode
//! template sampled over that aperture. Coupling comes in four flavours
//! along two independent switches:
//!
//! - `coherent`: project the field onto the template before squaring
//!   (fiber-coupled detection); otherwise sum intensities (photodiode).
//! - `mean_coupling`: normalise to a per-solid-angle average instead of
//!   reporting the raw collected power.
//!
//! An optional polarisation filter at angle $\psi$ weighs the two
//! spherical field components by $\sin^2\psi$ and $\cos^2\psi$ before
//! they are combined.

use num_complex::Complex64;

use crate::error::ScatterError;
use crate::mesh::{na_to_angle, FibonacciMesh};
use crate::modes::ModeId;
use crate::scatterer::Scatterer;

#[derive(Debug, Clone)]
pub struct Detector {
    mode: ModeId,
    sampling: usize,
    numerical_aperture: f64,
    phi_offset: f64,
    gamma_offset: f64,
    rotation: f64,
    polarization_filter: Option<f64>,
    coherent: bool,
    mean_coupling: bool,
    mesh: FibonacciMesh,
    scalar_field: Vec<Complex64>,
}

impl Detector {
    /// Build a detector and sample its mode template over the aperture.
    ///
    /// Angles are radians. `numerical_aperture` must lie in `(0, 2)`:
    /// values above 1 reach into the back hemisphere (see
    /// [`na_to_angle`]). `sampling` sets the number of aperture points.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mode: ModeId,
        sampling: usize,
        numerical_aperture: f64,
        phi_offset: f64,
        gamma_offset: f64,
        rotation: f64,
        polarization_filter: Option<f64>,
        coherent: bool,
        mean_coupling: bool,
    ) -> Result<Self, ScatterError> {
        if sampling == 0 {
            return Err(ScatterError::InvalidDetector(
                "sampling must be at least 1".to_string(),
            ));
        }
        if !(numerical_aperture > 0.0 && numerical_aperture < 2.0) {
            return Err(ScatterError::InvalidDetector(format!(
                "numerical aperture must lie in (0, 2), got {numerical_aperture}"
            )));
        }

        let mesh = FibonacciMesh::new(
            sampling,
            na_to_angle(numerical_aperture),
            phi_offset,
            gamma_offset,
            rotation,
        );
        let scalar_field = mode.sample(&mesh.base_x, &mesh.base_y);

        Ok(Self {
            mode,
            sampling,
            numerical_aperture,
            phi_offset,
            gamma_offset,
            rotation,
            polarization_filter,
            coherent,
            mean_coupling,
            mesh,
            scalar_field,
        })
    }

    pub fn mode(&self) -> ModeId {
        self.mode
    }

    pub fn sampling(&self) -> usize {
        self.sampling
    }

    pub fn numerical_aperture(&self) -> f64 {
        self.numerical_aperture
    }

    pub fn phi_offset(&self) -> f64 {
        self.phi_offset
    }

    pub fn gamma_offset(&self) -> f64 {
        self.gamma_offset
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn polarization_filter(&self) -> Option<f64> {
        self.polarization_filter
    }

    pub fn coherent(&self) -> bool {
        self.coherent
    }

    pub fn mean_coupling(&self) -> bool {
        self.mean_coupling
    }

    /// Aperture point set.
    pub fn mesh(&self) -> &FibonacciMesh {
        &self.mesh
    }

    /// Mode template sampled on the aperture points.
    pub fn scalar_field(&self) -> &[Complex64] {
        &self.scalar_field
    }

    /// Power coupled from the scatterer's far field into this detector.
    ///
    /// Raw couplings are in the source amplitude's power units; mean
    /// couplings are per-steradian averages over the aperture.
    pub fn coupling(&self, scatterer: &impl Scatterer) -> f64 {
        let (e_phi, e_theta) = scatterer.fields_at(&self.mesh.phi, &self.mesh.theta, 1.0);

        let (mut component_theta, mut component_phi) = if self.coherent {
            let mut projection_theta = Complex64::new(0.0, 0.0);
            let mut projection_phi = Complex64::new(0.0, 0.0);
            for (template, (et, ep)) in self.scalar_field.iter().zip(e_theta.iter().zip(&e_phi)) {
                projection_theta += template.conj() * et;
                projection_phi += template.conj() * ep;
            }
            (projection_theta.norm_sqr(), projection_phi.norm_sqr())
        } else {
            (
                e_theta.iter().map(|v| v.norm_sqr()).sum(),
                e_phi.iter().map(|v| v.norm_sqr()).sum(),
            )
        };

        if let Some(psi) = self.polarization_filter {
            component_theta *= psi.sin().powi(2);
            component_phi *= psi.cos().powi(2);
        }
        let total = component_theta + component_phi;

        if self.mean_coupling {
            if self.coherent {
                let energy: f64 = e_theta.iter().map(|v| v.norm_sqr()).sum::<f64>()
                    + e_phi.iter().map(|v| v.norm_sqr()).sum::<f64>();
                total / energy
            } else {
                total * self.mesh.d_omega / self.mesh.omega
            }
        } else {
            total * self.mesh.d_omega
        }
    }
}
