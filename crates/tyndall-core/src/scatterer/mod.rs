//! Lorenz-Mie partial-wave solvers.
//!
//! Each geometry computes its partial-wave coefficients once at
//! construction with the classic recurrences: a downward logarithmic
//! derivative for the interior argument, upward Riccati-Bessel functions
//! for the exterior one. Every observable (efficiencies, cross-sections,
//! far-field amplitudes, asymmetry factor) is then a short sum over the
//! cached series, exposed uniformly through the [`Scatterer`] trait.
//!
//! Elevation angles follow the detector convention: the far-field point
//! $(\varphi, \theta)$ has scattering angle $\varphi + \pi/2$ from the
//! propagation axis, so $\mu = \cos(\varphi + \pi/2)$.

use num_complex::Complex64;

use crate::mesh::FullSteradian;
use crate::source::Gaussian;

mod core_shell;
mod cylinder;
mod sphere;

pub use core_shell::CoreShell;
pub use cylinder::Cylinder;
pub use sphere::Sphere;

/// Series length for a converged Mie sum at size parameter `x`,
/// $\lceil x + 4 x^{1/3} \rceil + 16$.
pub fn wiscombe_order(size_parameter: f64) -> usize {
    (size_parameter + 4.0 * size_parameter.cbrt()).ceil() as usize + 16
}

/// Logarithmic derivative $D_n(z) = \psi'_n(z) / \psi_n(z)$ for orders
/// `0..=order`, by downward recurrence seeded well above `order`.
pub(crate) fn log_derivative(z: Complex64, order: usize) -> Vec<Complex64> {
    let start = order.max(z.norm().ceil() as usize) + 16;
    let mut d = vec![Complex64::new(0.0, 0.0); start + 1];
    for n in (1..=start).rev() {
        let ratio = n as f64 / z;
        d[n - 1] = ratio - 1.0 / (d[n] + ratio);
    }
    d.truncate(order + 1);
    d
}

/// Riccati-Bessel $\psi_n = x j_n(x)$ and $\chi_n = -x y_n(x)$ by upward
/// recurrence. Index `i` holds order `i - 1`: the extra leading slot
/// carries the order $-1$ seed the coefficient quotients need.
pub(crate) fn riccati_psi_chi(x: f64, order: usize) -> (Vec<f64>, Vec<f64>) {
    let mut psi = vec![0.0; order + 2];
    let mut chi = vec![0.0; order + 2];
    psi[0] = x.cos();
    psi[1] = x.sin();
    chi[0] = -x.sin();
    chi[1] = x.cos();
    for i in 2..=order + 1 {
        let factor = (2 * i - 3) as f64 / x;
        psi[i] = factor * psi[i - 1] - psi[i - 2];
        chi[i] = factor * chi[i - 1] - chi[i - 2];
    }
    (psi, chi)
}

/// Complex-argument variant of [`riccati_psi_chi`], used by the
/// core-shell solver at the shell's interior arguments.
pub(crate) fn riccati_psi_chi_complex(
    z: Complex64,
    order: usize,
) -> (Vec<Complex64>, Vec<Complex64>) {
    let mut psi = vec![Complex64::new(0.0, 0.0); order + 2];
    let mut chi = vec![Complex64::new(0.0, 0.0); order + 2];
    psi[0] = z.cos();
    psi[1] = z.sin();
    chi[0] = -z.sin();
    chi[1] = z.cos();
    for i in 2..=order + 1 {
        let factor = (2 * i - 3) as f64 / z;
        psi[i] = factor * psi[i - 1] - psi[i - 2];
        chi[i] = factor * chi[i - 1] - chi[i - 2];
    }
    (psi, chi)
}

/// Close coefficient quotients against the exterior Riccati-Bessel
/// functions. `da` and `db` are the effective logarithmic derivatives
/// entering the electric and magnetic quotients, indexed by order with
/// slot 0 unused; for a homogeneous sphere they are the same array.
pub(crate) fn close_coefficients(
    da: &[Complex64],
    db: &[Complex64],
    m: Complex64,
    x: f64,
    order: usize,
) -> (Vec<Complex64>, Vec<Complex64>) {
    let (psi, chi) = riccati_psi_chi(x, order);
    let mut an = Vec::with_capacity(order);
    let mut bn = Vec::with_capacity(order);
    for n in 1..=order {
        let ratio = n as f64 / x;
        let psi_n = psi[n + 1];
        let psi_below = psi[n];
        let xi_n = Complex64::new(psi[n + 1], -chi[n + 1]);
        let xi_below = Complex64::new(psi[n], -chi[n]);
        let ea = da[n] / m + ratio;
        let eb = db[n] * m + ratio;
        an.push((ea * psi_n - psi_below) / (ea * xi_n - xi_below));
        bn.push((eb * psi_n - psi_below) / (eb * xi_n - xi_below));
    }
    (an, bn)
}

/// $Q_{ext} = (2/x^2) \sum_n (2n+1) \Re(a_n + b_n)$.
pub(crate) fn mie_qext(an: &[Complex64], bn: &[Complex64], x: f64) -> f64 {
    let sum: f64 = an
        .iter()
        .zip(bn)
        .enumerate()
        .map(|(i, (a, b))| (2 * (i + 1) + 1) as f64 * (a.re + b.re))
        .sum();
    2.0 / (x * x) * sum
}

/// $Q_{sca} = (2/x^2) \sum_n (2n+1) (|a_n|^2 + |b_n|^2)$.
pub(crate) fn mie_qsca(an: &[Complex64], bn: &[Complex64], x: f64) -> f64 {
    let sum: f64 = an
        .iter()
        .zip(bn)
        .enumerate()
        .map(|(i, (a, b))| (2 * (i + 1) + 1) as f64 * (a.norm_sqr() + b.norm_sqr()))
        .sum();
    2.0 / (x * x) * sum
}

/// $Q_{back} = |\sum_n (2n+1) (-1)^n (a_n - b_n)|^2 / x^2$.
pub(crate) fn mie_qback(an: &[Complex64], bn: &[Complex64], x: f64) -> f64 {
    let mut sum = Complex64::new(0.0, 0.0);
    for (i, (a, b)) in an.iter().zip(bn).enumerate() {
        let n = i + 1;
        let weight = (2 * n + 1) as f64 * if n % 2 == 0 { 1.0 } else { -1.0 };
        sum += weight * (a - b);
    }
    sum.norm_sqr() / (x * x)
}

/// $Q_{fwd} = |\sum_n (2n+1) (a_n + b_n)|^2 / x^2$.
pub(crate) fn mie_qforward(an: &[Complex64], bn: &[Complex64], x: f64) -> f64 {
    let mut sum = Complex64::new(0.0, 0.0);
    for (i, (a, b)) in an.iter().zip(bn).enumerate() {
        sum += (2 * (i + 1) + 1) as f64 * (a + b);
    }
    sum.norm_sqr() / (x * x)
}

/// Asymmetry factor from the coefficient cross terms.
pub(crate) fn mie_g(an: &[Complex64], bn: &[Complex64], x: f64, qsca: f64) -> f64 {
    let mut sum = 0.0;
    for i in 0..an.len() {
        let n = (i + 1) as f64;
        if i + 1 < an.len() {
            sum += n * (n + 2.0) / (n + 1.0)
                * (an[i] * an[i + 1].conj() + bn[i] * bn[i + 1].conj()).re;
        }
        sum += (2.0 * n + 1.0) / (n * (n + 1.0)) * (an[i] * bn[i].conj()).re;
    }
    4.0 / (x * x * qsca) * sum
}

/// Far-field amplitudes $S_1$, $S_2$ at $\mu = \cos(\varphi + \pi/2)$
/// from the angular functions $\pi_n$, $\tau_n$.
pub(crate) fn mie_s1s2(an: &[Complex64], bn: &[Complex64], mu: f64) -> (Complex64, Complex64) {
    let mut s1 = Complex64::new(0.0, 0.0);
    let mut s2 = Complex64::new(0.0, 0.0);
    let mut pi_below = 0.0;
    let mut pi_n = 1.0;
    for (i, (a, b)) in an.iter().zip(bn).enumerate() {
        let n = (i + 1) as f64;
        let tau = n * mu * pi_n - (n + 1.0) * pi_below;
        let prefactor = (2.0 * n + 1.0) / (n * (n + 1.0));
        s1 += prefactor * (a * pi_n + b * tau);
        s2 += prefactor * (a * tau + b * pi_n);
        let pi_above = ((2.0 * n + 1.0) * mu * pi_n - (n + 1.0) * pi_below) / n;
        pi_below = pi_n;
        pi_n = pi_above;
    }
    (s1, s2)
}

/// Common interface over the scatterer geometries.
///
/// Required methods read the cached partial-wave series; the provided
/// ones derive the remaining observables from them. All efficiencies are
/// dimensionless; cross-sections carry the square of the geometry's
/// length unit (cylinders report per unit length).
pub trait Scatterer {
    /// Illumination the coefficients were computed for.
    fn source(&self) -> &Gaussian;

    /// Number of partial waves retained.
    fn max_order(&self) -> usize;

    /// Size parameter of the outer boundary.
    fn size_parameter(&self) -> f64;

    /// Geometric cross-section normalising the efficiencies.
    fn area(&self) -> f64;

    fn qsca(&self) -> f64;

    fn qext(&self) -> f64;

    /// Asymmetry factor $\langle \cos\theta \rangle$.
    fn g(&self) -> f64;

    /// Far-field amplitudes at elevation `phi` (radians).
    fn s1s2(&self, phi: f64) -> (Complex64, Complex64);

    fn qabs(&self) -> f64 {
        self.qext() - self.qsca()
    }

    /// Radiation-pressure efficiency $Q_{ext} - g \, Q_{sca}$.
    fn qpr(&self) -> f64 {
        self.qext() - self.g() * self.qsca()
    }

    fn csca(&self) -> f64 {
        self.qsca() * self.area()
    }

    fn cext(&self) -> f64 {
        self.qext() * self.area()
    }

    fn cabs(&self) -> f64 {
        self.qabs() * self.area()
    }

    fn cpr(&self) -> f64 {
        self.qpr() * self.area()
    }

    /// Outgoing spherical-wave factor at distance `radius`,
    /// $E_0 e^{-ikr} / (kr)$.
    fn propagator(&self, radius: f64) -> Complex64 {
        let source = self.source();
        Complex64::from_polar(
            source.amplitude / (source.wavenumber * radius),
            -source.wavenumber * radius,
        )
    }

    /// Scattered far field resolved onto the spherical unit vectors at
    /// each `(phi, theta)` direction.
    ///
    /// # Panics
    ///
    /// Panics if `phi` and `theta` differ in length.
    fn fields_at(
        &self,
        phi: &[f64],
        theta: &[f64],
        radius: f64,
    ) -> (Vec<Complex64>, Vec<Complex64>) {
        assert_eq!(phi.len(), theta.len());
        let [jones_x, jones_y] = self.source().jones_vector;
        let propagator = self.propagator(radius);
        let mut e_phi = Vec::with_capacity(phi.len());
        let mut e_theta = Vec::with_capacity(phi.len());
        for (&elevation, &azimuth) in phi.iter().zip(theta) {
            let (s1, s2) = self.s1s2(elevation);
            let (sin_t, cos_t) = azimuth.sin_cos();
            e_phi.push(propagator * s1 * (jones_x * cos_t + jones_y * sin_t));
            e_theta.push(propagator * s2 * (jones_x * sin_t - jones_y * cos_t));
        }
        (e_phi, e_theta)
    }

    /// Asymmetry factor recovered by integrating the sampled intensity
    /// over the sphere, for geometries without a closed-form sum.
    fn g_from_fields(&self, sampling: usize) -> f64 {
        let grid = FullSteradian::new(sampling);
        let mut phi = Vec::with_capacity(sampling * sampling);
        let mut theta = Vec::with_capacity(sampling * sampling);
        for &p in &grid.phi {
            for &t in &grid.theta {
                phi.push(p);
                theta.push(t);
            }
        }
        let (e_phi, e_theta) = self.fields_at(&phi, &theta, 1.0);
        let intensity: Vec<f64> = e_phi
            .iter()
            .zip(&e_theta)
            .map(|(ep, et)| ep.norm_sqr() + et.norm_sqr())
            .collect();
        (grid.cos_integral(&intensity) / grid.integral(&intensity)).abs()
    }
}

/// A scatterer of any supported geometry.
///
/// Sweeps hold these; single-configuration work can use the concrete
/// types directly.
#[derive(Debug, Clone)]
pub enum ScattererKind {
    Sphere(Sphere),
    Cylinder(Cylinder),
    CoreShell(CoreShell),
}

impl Scatterer for ScattererKind {
    fn source(&self) -> &Gaussian {
        match self {
            ScattererKind::Sphere(s) => s.source(),
            ScattererKind::Cylinder(c) => c.source(),
            ScattererKind::CoreShell(c) => c.source(),
        }
    }

    fn max_order(&self) -> usize {
        match self {
            ScattererKind::Sphere(s) => s.max_order(),
            ScattererKind::Cylinder(c) => c.max_order(),
            ScattererKind::CoreShell(c) => c.max_order(),
        }
    }

    fn size_parameter(&self) -> f64 {
        match self {
            ScattererKind::Sphere(s) => s.size_parameter(),
            ScattererKind::Cylinder(c) => c.size_parameter(),
            ScattererKind::CoreShell(c) => c.size_parameter(),
        }
    }

    fn area(&self) -> f64 {
        match self {
            ScattererKind::Sphere(s) => s.area(),
            ScattererKind::Cylinder(c) => c.area(),
            ScattererKind::CoreShell(c) => c.area(),
        }
    }

    fn qsca(&self) -> f64 {
        match self {
            ScattererKind::Sphere(s) => s.qsca(),
            ScattererKind::Cylinder(c) => c.qsca(),
            ScattererKind::CoreShell(c) => c.qsca(),
        }
    }

    fn qext(&self) -> f64 {
        match self {
            ScattererKind::Sphere(s) => s.qext(),
            ScattererKind::Cylinder(c) => c.qext(),
            ScattererKind::CoreShell(c) => c.qext(),
        }
    }

    fn g(&self) -> f64 {
        match self {
            ScattererKind::Sphere(s) => s.g(),
            ScattererKind::Cylinder(c) => c.g(),
            ScattererKind::CoreShell(c) => c.g(),
        }
    }

    fn s1s2(&self, phi: f64) -> (Complex64, Complex64) {
        match self {
            ScattererKind::Sphere(s) => s.s1s2(phi),
            ScattererKind::Cylinder(c) => c.s1s2(phi),
            ScattererKind::CoreShell(c) => c.s1s2(phi),
        }
    }
}

impl From<Sphere> for ScattererKind {
    fn from(value: Sphere) -> Self {
        ScattererKind::Sphere(value)
    }
}

impl From<Cylinder> for ScattererKind {
    fn from(value: Cylinder) -> Self {
        ScattererKind::Cylinder(value)
    }
}

impl From<CoreShell> for ScattererKind {
    fn from(value: CoreShell) -> Self {
        ScattererKind::CoreShell(value)
    }
}
