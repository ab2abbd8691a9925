//! Homogeneous sphere.

use num_complex::Complex64;

use crate::error::ScatterError;
use crate::source::Gaussian;

use super::{
    close_coefficients, log_derivative, mie_g, mie_qback, mie_qext, mie_qforward, mie_qsca,
    mie_s1s2, wiscombe_order, Scatterer,
};

/// Mie solution for a homogeneous sphere in a non-absorbing medium.
///
/// The coefficient series is evaluated at construction; the struct is
/// then an immutable bundle of source, geometry and series that every
/// observable reads from.
#[derive(Debug, Clone)]
pub struct Sphere {
    source: Gaussian,
    diameter: f64,
    index: Complex64,
    medium_index: f64,
    size_parameter: f64,
    area: f64,
    max_order: usize,
    an: Vec<Complex64>,
    bn: Vec<Complex64>,
}

impl Sphere {
    /// Build the solution for a sphere of `diameter` and refractive
    /// `index` embedded in a medium of real index `medium_index`.
    ///
    /// `max_order` overrides the convergence criterion when given;
    /// `None` retains [`wiscombe_order`] terms.
    pub fn new(
        diameter: f64,
        index: Complex64,
        medium_index: f64,
        source: Gaussian,
        max_order: Option<usize>,
    ) -> Result<Self, ScatterError> {
        if !(diameter > 0.0) {
            return Err(ScatterError::InvalidGeometry(format!(
                "sphere diameter must be positive, got {diameter}"
            )));
        }
        if !(medium_index > 0.0) {
            return Err(ScatterError::InvalidGeometry(format!(
                "medium index must be positive, got {medium_index}"
            )));
        }

        let size_parameter = source.wavenumber * medium_index * diameter / 2.0;
        let relative_index = index / medium_index;
        let max_order = max_order.unwrap_or_else(|| wiscombe_order(size_parameter));

        let derivatives = log_derivative(relative_index * size_parameter, max_order);
        let (an, bn) = close_coefficients(
            &derivatives,
            &derivatives,
            relative_index,
            size_parameter,
            max_order,
        );

        Ok(Self {
            source,
            diameter,
            index,
            medium_index,
            size_parameter,
            area: std::f64::consts::PI * (diameter / 2.0).powi(2),
            max_order,
            an,
            bn,
        })
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn index(&self) -> Complex64 {
        self.index
    }

    pub fn medium_index(&self) -> f64 {
        self.medium_index
    }

    /// Electric multipole coefficients, order `n` at slot `n - 1`.
    pub fn an(&self) -> &[Complex64] {
        &self.an
    }

    /// Magnetic multipole coefficients, order `n` at slot `n - 1`.
    pub fn bn(&self) -> &[Complex64] {
        &self.bn
    }

    /// Backscattering efficiency (radar cross-section convention).
    pub fn qback(&self) -> f64 {
        mie_qback(&self.an, &self.bn, self.size_parameter)
    }

    /// Forward-lobe efficiency, the `qback` sum without the alternation.
    pub fn qforward(&self) -> f64 {
        mie_qforward(&self.an, &self.bn, self.size_parameter)
    }

    /// Back-to-forward ratio `qback / qforward`.
    pub fn qratio(&self) -> f64 {
        self.qback() / self.qforward()
    }

    pub fn cback(&self) -> f64 {
        self.qback() * self.area
    }

    pub fn cforward(&self) -> f64 {
        self.qforward() * self.area
    }

    pub fn cratio(&self) -> f64 {
        self.qratio() * self.area
    }
}

impl Scatterer for Sphere {
    fn source(&self) -> &Gaussian {
        &self.source
    }

    fn max_order(&self) -> usize {
        self.max_order
    }

    fn size_parameter(&self) -> f64 {
        self.size_parameter
    }

    fn area(&self) -> f64 {
        self.area
    }

    fn qsca(&self) -> f64 {
        mie_qsca(&self.an, &self.bn, self.size_parameter)
    }

    fn qext(&self) -> f64 {
        mie_qext(&self.an, &self.bn, self.size_parameter)
    }

    fn g(&self) -> f64 {
        mie_g(&self.an, &self.bn, self.size_parameter, self.qsca())
    }

    fn s1s2(&self, phi: f64) -> (Complex64, Complex64) {
        let mu = (phi + std::f64::consts::FRAC_PI_2).cos();
        mie_s1s2(&self.an, &self.bn, mu)
    }
}
