//! Plane-polarised Gaussian illumination.

use num_complex::Complex64;

use crate::error::ScatterError;

/// Speed of light in vacuum, m/s.
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Vacuum permittivity, F/m.
pub const VACUUM_PERMITTIVITY: f64 = 8.8541878128e-12;

/// A focused Gaussian beam described by its waist-plane properties.
///
/// The scattering recurrences only use the wavenumber and the Jones
/// vector; the field amplitude matters once absolute coupled powers are
/// requested. With the wavelength in metres and the power in watts the
/// amplitude comes out in V/m via
/// $E_0 = \sqrt{2 I_0 / (c \varepsilon_0)}$ with the peak intensity
/// $I_0 = 2P / (\pi w_0^2)$ at the waist $w_0 = \lambda / (\pi \mathrm{NA})$.
#[derive(Debug, Clone)]
pub struct Gaussian {
    /// Vacuum wavelength, same length unit as the scatterer geometry.
    pub wavelength: f64,
    /// Transverse polarisation state `[j_x, j_y]`.
    pub jones_vector: [Complex64; 2],
    /// Numerical aperture of the focusing optic.
    pub numerical_aperture: f64,
    /// Total beam power.
    pub optical_power: f64,
    /// Peak electric field amplitude at the waist.
    pub amplitude: f64,
    /// Vacuum wavenumber $k = 2\pi / \lambda$.
    pub wavenumber: f64,
}

impl Gaussian {
    pub fn new(
        wavelength: f64,
        jones_vector: [Complex64; 2],
        numerical_aperture: f64,
        optical_power: f64,
    ) -> Result<Self, ScatterError> {
        if !(wavelength > 0.0) {
            return Err(ScatterError::InvalidSource(format!(
                "wavelength must be positive, got {wavelength}"
            )));
        }
        if !(numerical_aperture > 0.0) {
            return Err(ScatterError::InvalidSource(format!(
                "numerical aperture must be positive, got {numerical_aperture}"
            )));
        }
        if !(optical_power > 0.0) {
            return Err(ScatterError::InvalidSource(format!(
                "optical power must be positive, got {optical_power}"
            )));
        }

        let waist = wavelength / (std::f64::consts::PI * numerical_aperture);
        let intensity = 2.0 * optical_power / (std::f64::consts::PI * waist * waist);
        let amplitude = (2.0 * intensity / (SPEED_OF_LIGHT * VACUUM_PERMITTIVITY)).sqrt();

        Ok(Self {
            wavelength,
            jones_vector,
            numerical_aperture,
            optical_power,
            amplitude,
            wavenumber: 2.0 * std::f64::consts::PI / wavelength,
        })
    }
}
