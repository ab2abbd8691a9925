//! Concentric core-shell sphere.

use num_complex::Complex64;

use crate::error::ScatterError;
use crate::source::Gaussian;

use super::{
    close_coefficients, log_derivative, mie_g, mie_qback, mie_qext, mie_qforward, mie_qsca,
    mie_s1s2, riccati_psi_chi_complex, wiscombe_order, Scatterer,
};

/// Mie solution for a sphere with one concentric coating.
///
/// The core's logarithmic derivative is carried through the shell into
/// effective derivatives `dns`/`gns` at the outer boundary, after which
/// the coefficients close exactly like a homogeneous sphere of the shell
/// material. Both homogeneous limits (shell index equal to core or to
/// medium) reduce to the corresponding plain sphere.
#[derive(Debug, Clone)]
pub struct CoreShell {
    source: Gaussian,
    core_diameter: f64,
    shell_width: f64,
    core_index: Complex64,
    shell_index: Complex64,
    medium_index: f64,
    core_size_parameter: f64,
    size_parameter: f64,
    area: f64,
    max_order: usize,
    an: Vec<Complex64>,
    bn: Vec<Complex64>,
}

impl CoreShell {
    /// Build the solution for a core of `core_diameter` coated by a
    /// shell of radial thickness `shell_width`.
    pub fn new(
        core_diameter: f64,
        shell_width: f64,
        core_index: Complex64,
        shell_index: Complex64,
        medium_index: f64,
        source: Gaussian,
        max_order: Option<usize>,
    ) -> Result<Self, ScatterError> {
        if !(core_diameter > 0.0) {
            return Err(ScatterError::InvalidGeometry(format!(
                "core diameter must be positive, got {core_diameter}"
            )));
        }
        if !(shell_width > 0.0) {
            return Err(ScatterError::InvalidGeometry(format!(
                "shell width must be positive, got {shell_width}"
            )));
        }
        if !(medium_index > 0.0) {
            return Err(ScatterError::InvalidGeometry(format!(
                "medium index must be positive, got {medium_index}"
            )));
        }

        let outer_radius = core_diameter / 2.0 + shell_width;
        let scale = source.wavenumber * medium_index;
        let core_size_parameter = scale * core_diameter / 2.0;
        let size_parameter = scale * outer_radius;
        let m_core = core_index / medium_index;
        let m_shell = shell_index / medium_index;
        let max_order = max_order.unwrap_or_else(|| wiscombe_order(size_parameter));

        let u = m_core * core_size_parameter;
        let v = m_shell * core_size_parameter;
        let w = m_shell * size_parameter;
        let m_rel = m_shell / m_core;

        let du = log_derivative(u, max_order);
        let dv = log_derivative(v, max_order);
        let dw = log_derivative(w, max_order);
        let (psi_v, chi_v) = riccati_psi_chi_complex(v, max_order);
        let (psi_w, chi_w) = riccati_psi_chi_complex(w, max_order);

        let mut dns = vec![Complex64::new(0.0, 0.0); max_order + 1];
        let mut gns = vec![Complex64::new(0.0, 0.0); max_order + 1];
        for n in 1..=max_order {
            let pv = psi_v[n + 1];
            let cv = chi_v[n + 1];
            let pw = psi_w[n + 1];
            let cw = chi_w[n + 1];
            let fv = pv / cv;
            let shared = (pw / pv) / cv;
            let uu = m_rel * du[n] - dv[n];
            let vv = du[n] / m_rel - dv[n];
            dns[n] = (uu * fv / pw) / (uu * (pw - cw * fv) + shared) + dw[n];
            gns[n] = (vv * fv / pw) / (vv * (pw - cw * fv) + shared) + dw[n];
        }

        let (an, bn) = close_coefficients(&dns, &gns, m_shell, size_parameter, max_order);

        Ok(Self {
            source,
            core_diameter,
            shell_width,
            core_index,
            shell_index,
            medium_index,
            core_size_parameter,
            size_parameter,
            area: std::f64::consts::PI * outer_radius * outer_radius,
            max_order,
            an,
            bn,
        })
    }

    pub fn core_diameter(&self) -> f64 {
        self.core_diameter
    }

    pub fn shell_width(&self) -> f64 {
        self.shell_width
    }

    pub fn core_index(&self) -> Complex64 {
        self.core_index
    }

    pub fn shell_index(&self) -> Complex64 {
        self.shell_index
    }

    pub fn medium_index(&self) -> f64 {
        self.medium_index
    }

    /// Size parameter of the core boundary.
    pub fn core_size_parameter(&self) -> f64 {
        self.core_size_parameter
    }

    /// Electric multipole coefficients, order `n` at slot `n - 1`.
    pub fn an(&self) -> &[Complex64] {
        &self.an
    }

    /// Magnetic multipole coefficients, order `n` at slot `n - 1`.
    pub fn bn(&self) -> &[Complex64] {
        &self.bn
    }

    pub fn qback(&self) -> f64 {
        mie_qback(&self.an, &self.bn, self.size_parameter)
    }

    pub fn qforward(&self) -> f64 {
        mie_qforward(&self.an, &self.bn, self.size_parameter)
    }

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

impl Scatterer for CoreShell {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scatterer::Sphere;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn visible_source() -> Gaussian {
        Gaussian::new(
            0.633,
            [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
            0.2,
            1.0,
        )
        .unwrap()
    }

    #[test]
    fn rejects_degenerate_geometry() {
        let m = Complex64::new(1.5, 0.0);
        assert!(CoreShell::new(0.0, 0.05, m, m, 1.0, visible_source(), None).is_err());
        assert!(CoreShell::new(0.2, 0.0, m, m, 1.0, visible_source(), None).is_err());
        assert!(CoreShell::new(0.2, -0.1, m, m, 1.0, visible_source(), None).is_err());
        assert!(CoreShell::new(0.2, 0.05, m, m, 0.0, visible_source(), None).is_err());
    }

    #[test]
    fn uniform_index_reduces_to_the_outer_sphere() {
        let m = Complex64::new(1.5, 0.0);
        let coated = CoreShell::new(0.2, 0.05, m, m, 1.0, visible_source(), None).unwrap();
        let solid = Sphere::new(0.3, m, 1.0, visible_source(), None).unwrap();
        assert_relative_eq!(coated.size_parameter(), solid.size_parameter(), max_relative = 1e-15);
        assert_relative_eq!(coated.qsca(), solid.qsca(), max_relative = 1e-12);
        assert_relative_eq!(coated.qext(), solid.qext(), max_relative = 1e-12);
        assert_relative_eq!(coated.g(), solid.g(), max_relative = 1e-12);
        for (c, s) in coated.an().iter().zip(solid.an()) {
            assert_abs_diff_eq!((c - s).norm(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn index_matched_shell_reduces_to_the_bare_core() {
        let core = Complex64::new(1.5, 0.0);
        let shell = Complex64::new(1.0, 0.0);
        let coated = CoreShell::new(0.2, 0.05, core, shell, 1.0, visible_source(), None).unwrap();
        let bare = Sphere::new(0.2, core, 1.0, visible_source(), None).unwrap();
        // The efficiencies normalise to different geometric areas, so
        // compare cross-sections.
        assert_relative_eq!(coated.csca(), bare.csca(), max_relative = 1e-8);
        assert_relative_eq!(coated.cext(), bare.cext(), max_relative = 1e-8);
    }

    #[test]
    fn vanishing_shell_reduces_to_the_bare_core() {
        let core = Complex64::new(1.5, 0.0);
        let shell = Complex64::new(1.3, 0.0);
        let coated = CoreShell::new(0.2, 1e-9, core, shell, 1.0, visible_source(), None).unwrap();
        let bare = Sphere::new(0.2, core, 1.0, visible_source(), None).unwrap();
        // Residual deviation scales with k·width, ~1e-8 here.
        assert_relative_eq!(coated.qsca(), bare.qsca(), max_relative = 1e-6);
        assert_relative_eq!(coated.qext(), bare.qext(), max_relative = 1e-6);
        assert_relative_eq!(coated.g(), bare.g(), max_relative = 1e-6);
    }

    #[test]
    fn boundary_size_parameters_are_ordered() {
        let coated = CoreShell::new(
            0.2,
            0.05,
            Complex64::new(1.5, 0.0),
            Complex64::new(1.3, 0.0),
            1.0,
            visible_source(),
            None,
        )
        .unwrap();
        assert!(coated.core_size_parameter() < coated.size_parameter());
        assert_relative_eq!(coated.core_size_parameter(), 0.9926043139304244, max_relative = 1e-12);
        assert_relative_eq!(coated.size_parameter(), 1.4889064708956366, max_relative = 1e-12);
        assert_relative_eq!(
            coated.area(),
            std::f64::consts::PI * 0.15 * 0.15,
            max_relative = 1e-15
        );
    }
}
