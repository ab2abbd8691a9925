//! Detector mode-field templates.
//!
//! A coherent detector projects the scattered far field onto the spatial
//! profile of the mode its fiber (or free-space optic) supports. Profiles
//! are identified by a four-character code: a family tag and two digits,
//! e.g. `LP01`, `HG10`, `LG02`, `NC00`.
//!
//! - `LP`: linearly-polarised fiber modes, $J_\ell(r \, j_{\ell,m}) \cos(\ell \theta)$
//!   with $j_{\ell,m}$ the m-th zero of $J_\ell$.
//! - `HG`: Hermite-Gauss free-space modes on Cartesian axes.
//! - `LG`: Laguerre-Gauss free-space modes on polar axes.
//! - `NC`: a uniform template for non-coherent (bare photodiode) collection.
//!
//! Templates are evaluated on the detector-plane coordinates of a
//! [`FibonacciMesh`](crate::mesh::FibonacciMesh), rescaled so the farthest
//! point sits at unit radius, and all but `NC` are normalised to unit
//! discrete L2 energy.

use num_complex::Complex64;

use crate::error::ScatterError;
use crate::special::{bessel_j, bessel_j_zero};

/// Longitudinal evaluation frame for the Gaussian mode families.
///
/// Wavelength and waist are expressed in the same rescaled units as the
/// detector-plane coordinates. The defaults place the plane at the waist.
#[derive(Debug, Clone, Copy)]
pub struct BeamFrame {
    pub wavelength: f64,
    pub waist_radius: f64,
    pub z: f64,
}

impl Default for BeamFrame {
    fn default() -> Self {
        Self { wavelength: 1.55, waist_radius: 0.3, z: 0.0 }
    }
}

impl BeamFrame {
    /// Beam radius $w(z)$.
    pub fn width(&self) -> f64 {
        let spread = self.z * self.wavelength / (std::f64::consts::PI * self.waist_radius.powi(2));
        self.waist_radius * (1.0 + spread * spread).sqrt()
    }

    /// Wavefront curvature radius $R(z)$; infinite at the waist.
    pub fn curvature(&self) -> f64 {
        if self.z == 0.0 {
            return f64::INFINITY;
        }
        let rayleigh = std::f64::consts::PI * self.waist_radius.powi(2) / (self.z * self.wavelength);
        self.z * (1.0 + rayleigh * rayleigh)
    }

    /// Accumulated Gouy phase at `z`.
    pub fn gouy(&self) -> f64 {
        (self.z * std::f64::consts::PI / (self.wavelength * self.waist_radius.powi(2))).atan()
    }
}

/// Mode family tag, the first two characters of a mode identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeFamily {
    LinearlyPolarized,
    HermiteGauss,
    LaguerreGauss,
    NonCoherent,
}

impl std::fmt::Display for ModeFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            ModeFamily::LinearlyPolarized => "LP",
            ModeFamily::HermiteGauss => "HG",
            ModeFamily::LaguerreGauss => "LG",
            ModeFamily::NonCoherent => "NC",
        };
        f.write_str(tag)
    }
}

/// A parsed mode identifier.
///
/// The digit pair reads positionally from the code: azimuthal then radial
/// order for `LP` and `LG`, x then y order for `HG`, ignored for `NC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeId {
    pub family: ModeFamily,
    pub number_0: u8,
    pub number_1: u8,
}

impl ModeId {
    /// Parse a four-character code such as `"LP01"`.
    ///
    /// `LP` requires a radial order of at least 1 (fiber mode counting
    /// starts at the first Bessel zero).
    pub fn parse(code: &str) -> Result<Self, ScatterError> {
        let bytes = code.as_bytes();
        if bytes.len() != 4 {
            return Err(ScatterError::UnknownMode(code.to_string()));
        }
        let family = match &bytes[..2] {
            b"LP" => ModeFamily::LinearlyPolarized,
            b"HG" => ModeFamily::HermiteGauss,
            b"LG" => ModeFamily::LaguerreGauss,
            b"NC" => ModeFamily::NonCoherent,
            _ => return Err(ScatterError::UnknownMode(code.to_string())),
        };
        if !bytes[2].is_ascii_digit() || !bytes[3].is_ascii_digit() {
            return Err(ScatterError::UnknownMode(code.to_string()));
        }
        let number_0 = bytes[2] - b'0';
        let number_1 = bytes[3] - b'0';
        if family == ModeFamily::LinearlyPolarized && number_1 == 0 {
            return Err(ScatterError::UnknownMode(code.to_string()));
        }
        Ok(Self { family, number_0, number_1 })
    }

    /// Evaluate the template on detector-plane coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `x` and `y` differ in length.
    pub fn sample(&self, x: &[f64], y: &[f64]) -> Vec<Complex64> {
        assert_eq!(x.len(), y.len());
        if self.family == ModeFamily::NonCoherent {
            return vec![Complex64::new(1.0, 0.0); x.len()];
        }

        let (xn, yn) = rescale_to_unit_disc(x, y);
        let field = match self.family {
            ModeFamily::LinearlyPolarized => {
                lp_mode_field(self.number_0 as usize, self.number_1 as usize, &xn, &yn)
            }
            ModeFamily::HermiteGauss => {
                hg_mode_field(self.number_0 as usize, self.number_1 as usize, &xn, &yn)
            }
            ModeFamily::LaguerreGauss => {
                lg_mode_field(self.number_0 as usize, self.number_1 as usize, &xn, &yn)
            }
            ModeFamily::NonCoherent => unreachable!(),
        };
        normalize_l2(field)
    }
}

impl std::fmt::Display for ModeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.family, self.number_0, self.number_1)
    }
}

/// Rescale coordinates so the farthest sample lies at radius 1.
fn rescale_to_unit_disc(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut max_norm = 0.0_f64;
    for (&xi, &yi) in x.iter().zip(y) {
        max_norm = max_norm.max((xi * xi + yi * yi).sqrt());
    }
    if max_norm == 0.0 {
        max_norm = 1.0;
    }
    (
        x.iter().map(|v| v / max_norm).collect(),
        y.iter().map(|v| v / max_norm).collect(),
    )
}

fn normalize_l2(mut field: Vec<Complex64>) -> Vec<Complex64> {
    let energy: f64 = field.iter().map(|v| v.norm_sqr()).sum();
    if energy > 0.0 {
        let scale = energy.sqrt();
        for v in field.iter_mut() {
            *v /= scale;
        }
    }
    field
}

fn lp_mode_field(azimuthal: usize, radial: usize, x: &[f64], y: &[f64]) -> Vec<Complex64> {
    let zero = bessel_j_zero(azimuthal, radial);
    x.iter()
        .zip(y)
        .map(|(&xi, &yi)| {
            let r = (xi * xi + yi * yi).sqrt();
            let theta = yi.atan2(xi);
            let amplitude = bessel_j(azimuthal, Complex64::new(r * zero, 0.0)).re
                * (azimuthal as f64 * theta).cos();
            Complex64::new(amplitude, 0.0)
        })
        .collect()
}

fn hg_mode_field(n: usize, m: usize, x: &[f64], y: &[f64]) -> Vec<Complex64> {
    let frame = BeamFrame::default();
    let w = frame.width();
    let curvature = frame.curvature();
    let gouy = frame.gouy();
    let k = 2.0 * std::f64::consts::PI / frame.wavelength;
    let sqrt2 = std::f64::consts::SQRT_2;

    x.iter()
        .zip(y)
        .map(|(&xi, &yi)| {
            let r_sq = xi * xi + yi * yi;
            let amplitude = hermite(n, sqrt2 * xi / w)
                * hermite(m, sqrt2 * yi / w)
                * (-r_sq / (w * w)).exp();
            let phase = -k * r_sq / (2.0 * curvature) + (n + m) as f64 * gouy;
            Complex64::from_polar(amplitude, phase)
        })
        .collect()
}

fn lg_mode_field(azimuthal: usize, radial: usize, x: &[f64], y: &[f64]) -> Vec<Complex64> {
    let frame = BeamFrame::default();
    let w = frame.width();
    let curvature = frame.curvature();
    let gouy = frame.gouy();
    let k = 2.0 * std::f64::consts::PI / frame.wavelength;
    let sqrt2 = std::f64::consts::SQRT_2;

    x.iter()
        .zip(y)
        .map(|(&xi, &yi)| {
            let r_sq = xi * xi + yi * yi;
            let r = r_sq.sqrt();
            let theta = yi.atan2(xi);
            let laguerre = laguerre_assoc(azimuthal, radial, 2.0 * r_sq / (w * w));
            let amplitude =
                (sqrt2 * r / w).powi(radial as i32) * laguerre * (-r_sq / (w * w)).exp();
            let phase = radial as f64 * theta - k * r_sq / (2.0 * curvature)
                + (2 * azimuthal + radial + 1) as f64 * gouy;
            Complex64::new(amplitude * phase.cos(), 0.0)
        })
        .collect()
}

/// Physicists' Hermite polynomial $H_n(x)$.
fn hermite(order: usize, x: f64) -> f64 {
    if order == 0 {
        return 1.0;
    }
    let mut below = 1.0;
    let mut current = 2.0 * x;
    for c in 1..order {
        let next = 2.0 * x * current - 2.0 * c as f64 * below;
        below = current;
        current = next;
    }
    current
}

/// Laguerre polynomial $L_n(x)$.
fn laguerre(order: usize, x: f64) -> f64 {
    if order == 0 {
        return 1.0;
    }
    let mut below = 1.0;
    let mut current = 1.0 - x;
    for c in 1..order {
        let cf = c as f64;
        let next = ((2.0 * cf + 1.0 - x) * current - cf * below) / (cf + 1.0);
        below = current;
        current = next;
    }
    current
}

/// Associated Laguerre polynomial $L_n^m(x)$.
fn laguerre_assoc(degree: usize, order: usize, x: f64) -> f64 {
    if order == 0 {
        return laguerre(degree, x);
    }
    if degree == 0 {
        return 1.0;
    }
    let m = order as f64;
    let mut below = 1.0;
    let mut current = m + 1.0 - x;
    for c in 1..degree {
        let cf = c as f64;
        let next = ((2.0 * cf + m + 1.0 - x) * current - (cf + m) * below) / (cf + 1.0);
        below = current;
        current = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn polynomial_recurrences_match_closed_forms() {
        assert_abs_diff_eq!(hermite(0, 0.8), 1.0);
        assert_abs_diff_eq!(hermite(2, 1.3), 4.0 * 1.3 * 1.3 - 2.0, epsilon = 1e-14);
        assert_abs_diff_eq!(hermite(3, 0.5), -5.0, epsilon = 1e-14);
        assert_abs_diff_eq!(laguerre(2, 0.7), -0.155, epsilon = 1e-14);
        assert_relative_eq!(laguerre(3, 2.0), -1.0 / 3.0, max_relative = 1e-13);
        assert_abs_diff_eq!(laguerre_assoc(1, 1, 0.4), 2.0 - 0.4, epsilon = 1e-14);
        assert_abs_diff_eq!(laguerre_assoc(2, 1, 1.0), 0.5, epsilon = 1e-14);
        assert_abs_diff_eq!(laguerre_assoc(0, 3, 9.0), 1.0);
    }

    #[test]
    fn identifier_round_trips_through_display() {
        for code in ["LP01", "LP23", "HG00", "HG11", "LG02", "NC00"] {
            let id = ModeId::parse(code).unwrap();
            assert_eq!(id.to_string(), code);
        }
    }

    #[test]
    fn malformed_identifiers_are_rejected() {
        for code in ["LP00", "LP1", "LP012", "XX01", "lp01", "HGa1", "HG1b", ""] {
            assert!(
                matches!(ModeId::parse(code), Err(ScatterError::UnknownMode(_))),
                "{code:?} should not parse"
            );
        }
    }

    #[test]
    fn coherent_templates_carry_unit_energy() {
        let mesh = crate::mesh::FibonacciMesh::new(120, 0.3, 0.0, 0.0, 0.0);
        for code in ["LP01", "LP11", "HG10", "LG01"] {
            let id = ModeId::parse(code).unwrap();
            let field = id.sample(&mesh.base_x, &mesh.base_y);
            let energy: f64 = field.iter().map(|v| v.norm_sqr()).sum();
            assert_relative_eq!(energy, 1.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn non_coherent_template_is_plain_ones() {
        let id = ModeId::parse("NC00").unwrap();
        let field = id.sample(&[0.0, 0.1, -0.2], &[0.3, 0.0, 0.1]);
        assert!(field.iter().all(|v| *v == Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn lp_template_respects_azimuthal_symmetry() {
        // The farthest point fixes the rescaling; the others sit at half
        // radius where the template is far from its boundary zero.
        let id = ModeId::parse("LP01").unwrap();
        let field = id.sample(&[1.0, 0.5, 0.0, -0.5, 0.0], &[0.0, 0.0, 0.5, 0.0, -0.5]);
        assert!(field[1].re.abs() > 1e-3);
        for v in &field[2..] {
            assert_abs_diff_eq!(v.re, field[1].re, epsilon = 1e-14);
        }
        // LP11 flips sign across the y axis and vanishes on it.
        let id = ModeId::parse("LP11").unwrap();
        let field = id.sample(&[1.0, 0.5, -0.5, 0.0], &[0.0, 0.0, 0.0, 0.5]);
        assert!(field[1].re.abs() > 1e-3);
        assert_abs_diff_eq!(field[1].re, -field[2].re, epsilon = 1e-14);
        assert_abs_diff_eq!(field[3].re, 0.0, epsilon = 1e-14);
    }

    #[test]
    fn waist_frame_has_flat_wavefront() {
        let frame = BeamFrame::default();
        assert_eq!(frame.curvature(), f64::INFINITY);
        assert_eq!(frame.gouy(), 0.0);
        assert_abs_diff_eq!(frame.width(), frame.waist_radius);
        let downstream = BeamFrame { z: 0.4, ..BeamFrame::default() };
        assert!(downstream.width() > downstream.waist_radius);
        assert!(downstream.curvature().is_finite());
    }
}
