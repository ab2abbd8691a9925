//! Infinite circular cylinder at normal incidence.
//!
//! The cylindrical problem separates into two independent polarisations:
//! TM (electric field along the axis) scatters through the `b1n` series,
//! TE through `a2n`. The cross arrays `a1n` and `b2n` vanish identically
//! at normal incidence but are kept so the four-array coefficient layout
//! matches the oblique-incidence literature. Scalar observables blend the
//! two polarisations by the Jones-vector intensity split of the source.

use num_complex::Complex64;

use crate::error::ScatterError;
use crate::source::Gaussian;
use crate::special::{bessel_j_array, hankel1_array};

use super::{wiscombe_order, Scatterer};

#[derive(Debug, Clone)]
pub struct Cylinder {
    source: Gaussian,
    diameter: f64,
    index: Complex64,
    medium_index: f64,
    size_parameter: f64,
    max_order: usize,
    a1n: Vec<Complex64>,
    b1n: Vec<Complex64>,
    a2n: Vec<Complex64>,
    b2n: Vec<Complex64>,
}

fn derivative(values: &[Complex64], n: usize, z: Complex64) -> Complex64 {
    if n == 0 {
        -values[1]
    } else {
        values[n - 1] - (n as f64 / z) * values[n]
    }
}

impl Cylinder {
    /// Build the solution for a cylinder of `diameter` and refractive
    /// `index`, illuminated at normal incidence. Cross-sections are per
    /// unit length.
    pub fn new(
        diameter: f64,
        index: Complex64,
        medium_index: f64,
        source: Gaussian,
        max_order: Option<usize>,
    ) -> Result<Self, ScatterError> {
        if !(diameter > 0.0) {
            return Err(ScatterError::InvalidGeometry(format!(
                "cylinder diameter must be positive, got {diameter}"
            )));
        }
        if !(medium_index > 0.0) {
            return Err(ScatterError::InvalidGeometry(format!(
                "medium index must be positive, got {medium_index}"
            )));
        }

        let size_parameter = source.wavenumber * medium_index * diameter / 2.0;
        let m = index / medium_index;
        let max_order = max_order.unwrap_or_else(|| wiscombe_order(size_parameter));

        let x = Complex64::new(size_parameter, 0.0);
        let interior = bessel_j_array(max_order + 1, m * x);
        let exterior = hankel1_array(max_order + 1, size_parameter);

        let mut b1n = Vec::with_capacity(max_order + 1);
        let mut a2n = Vec::with_capacity(max_order + 1);
        for n in 0..=max_order {
            let jm = interior[n];
            let jm_prime = derivative(&interior, n, m * x);
            let h = exterior[n];
            let h_prime = derivative(&exterior, n, x);
            let jx = Complex64::new(h.re, 0.0);
            let jx_prime = Complex64::new(h_prime.re, 0.0);

            b1n.push((jm * jx_prime - m * jm_prime * jx) / (jm * h_prime - m * jm_prime * h));
            a2n.push((m * jm * jx_prime - jm_prime * jx) / (m * jm * h_prime - jm_prime * h));
        }

        Ok(Self {
            source,
            diameter,
            index,
            medium_index,
            size_parameter,
            max_order,
            a1n: vec![Complex64::new(0.0, 0.0); max_order + 1],
            b1n,
            a2n,
            b2n: vec![Complex64::new(0.0, 0.0); max_order + 1],
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

    /// TM cross coefficients, identically zero at normal incidence.
    pub fn a1n(&self) -> &[Complex64] {
        &self.a1n
    }

    /// TM coefficients, order `n` at slot `n`.
    pub fn b1n(&self) -> &[Complex64] {
        &self.b1n
    }

    /// TE coefficients, order `n` at slot `n`.
    pub fn a2n(&self) -> &[Complex64] {
        &self.a2n
    }

    /// TE cross coefficients, identically zero at normal incidence.
    pub fn b2n(&self) -> &[Complex64] {
        &self.b2n
    }

    /// Blend per-polarisation values by the source's intensity split.
    fn process_polarization(&self, tm: f64, te: f64) -> f64 {
        let [jones_x, jones_y] = self.source.jones_vector;
        tm * jones_x.norm_sqr() + te * jones_y.norm_sqr()
    }

    fn qsca_polarized(&self, a: &[Complex64], b: &[Complex64], c0: Complex64) -> f64 {
        let mut sum = c0.norm_sqr();
        for n in 1..=self.max_order {
            sum += 2.0 * (a[n].norm_sqr() + b[n].norm_sqr());
        }
        2.0 / self.size_parameter * sum
    }

    fn qext_polarized(&self, c: &[Complex64]) -> f64 {
        let mut sum = c[0];
        for n in 1..=self.max_order {
            sum += 2.0 * c[n];
        }
        2.0 / self.size_parameter * sum.re
    }
}

impl Scatterer for Cylinder {
    fn source(&self) -> &Gaussian {
        &self.source
    }

    fn max_order(&self) -> usize {
        self.max_order
    }

    fn size_parameter(&self) -> f64 {
        self.size_parameter
    }

    /// Shadow width per unit length.
    fn area(&self) -> f64 {
        self.diameter
    }

    fn qsca(&self) -> f64 {
        let tm = self.qsca_polarized(&self.a1n, &self.b1n, self.b1n[0]);
        let te = self.qsca_polarized(&self.a2n, &self.b2n, self.a2n[0]);
        self.process_polarization(tm, te)
    }

    fn qext(&self) -> f64 {
        let tm = self.qext_polarized(&self.b1n);
        let te = self.qext_polarized(&self.a2n);
        self.process_polarization(tm, te)
    }

    fn g(&self) -> f64 {
        self.g_from_fields(1000)
    }

    fn s1s2(&self, phi: f64) -> (Complex64, Complex64) {
        let angle = std::f64::consts::PI - (phi + std::f64::consts::FRAC_PI_2);
        let mut t1 = self.b1n[0];
        let mut t2 = self.a2n[0];
        for n in 1..=self.max_order {
            let harmonic = 2.0 * (n as f64 * angle).cos();
            t1 += harmonic * self.b1n[n];
            t2 += harmonic * self.a2n[n];
        }
        (t1, t2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn source_with_jones(jones: [Complex64; 2]) -> Gaussian {
        Gaussian::new(0.633, jones, 0.2, 1.0).unwrap()
    }

    fn tm_source() -> Gaussian {
        source_with_jones([Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)])
    }

    #[test]
    fn rejects_degenerate_geometry() {
        assert!(Cylinder::new(0.0, Complex64::new(1.5, 0.0), 1.0, tm_source(), None).is_err());
        assert!(Cylinder::new(0.3, Complex64::new(1.5, 0.0), -1.0, tm_source(), None).is_err());
    }

    #[test]
    fn cross_polarisation_arrays_vanish_at_normal_incidence() {
        let cylinder =
            Cylinder::new(0.3, Complex64::new(1.5, 0.0), 1.0, tm_source(), None).unwrap();
        assert!(cylinder.a1n().iter().all(|c| c.norm() == 0.0));
        assert!(cylinder.b2n().iter().all(|c| c.norm() == 0.0));
        assert_eq!(cylinder.b1n().len(), cylinder.max_order() + 1);
    }

    #[test]
    fn jones_vector_mixes_the_polarised_efficiencies() {
        let index = Complex64::new(1.5, 0.0);
        let tm = Cylinder::new(0.3, index, 1.0, tm_source(), None).unwrap();
        let te = Cylinder::new(
            0.3,
            index,
            1.0,
            source_with_jones([Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)]),
            None,
        )
        .unwrap();
        let inv_sqrt2 = std::f64::consts::FRAC_1_SQRT_2;
        let diagonal = Cylinder::new(
            0.3,
            index,
            1.0,
            source_with_jones([Complex64::new(inv_sqrt2, 0.0), Complex64::new(inv_sqrt2, 0.0)]),
            None,
        )
        .unwrap();
        assert_relative_eq!(
            diagonal.qsca(),
            (tm.qsca() + te.qsca()) / 2.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            diagonal.qext(),
            (tm.qext() + te.qext()) / 2.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn lossless_cylinder_conserves_energy_in_both_polarisations() {
        let index = Complex64::new(1.5, 0.0);
        for jones in [
            [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
            [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
        ] {
            let cylinder =
                Cylinder::new(0.3, index, 1.0, source_with_jones(jones), None).unwrap();
            assert_relative_eq!(cylinder.qext(), cylinder.qsca(), max_relative = 1e-10);
            assert_abs_diff_eq!(cylinder.qabs(), 0.0, epsilon = 1e-11);
        }
    }

    #[test]
    fn shadow_area_is_the_diameter() {
        let cylinder =
            Cylinder::new(0.3, Complex64::new(1.5, 0.0), 1.0, tm_source(), None).unwrap();
        assert_abs_diff_eq!(cylinder.area(), 0.3);
        assert_relative_eq!(cylinder.csca(), cylinder.qsca() * 0.3, max_relative = 1e-15);
    }
}
