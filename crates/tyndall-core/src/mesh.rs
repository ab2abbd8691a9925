//! Angular sampling grids for far-field integration.
//!
//! Detector coupling integrates the scattered field over the solid angle
//! a collection aperture subtends. [`FibonacciMesh`] distributes a fixed
//! number of quasi-uniform points over that spherical cap, so every point
//! carries the same differential solid angle and sums replace quadrature
//! weights. [`FullSteradian`] is a plain separable grid over the whole
//! sphere, used where an actual $4\pi$ integral is needed (asymmetry
//! factor from sampled intensity).

/// Half-angle of the collection cone for a numerical aperture.
///
/// Apertures up to `NA = 1` map to $\arcsin(\mathrm{NA})$. Values in
/// `(1, 2)` address the back hemisphere: `NA - 1` is treated as the sine
/// of the angle past $\pi/2$.
pub fn na_to_angle(na: f64) -> f64 {
    if na <= 1.0 {
        na.asin()
    } else {
        (na - 1.0).asin() + std::f64::consts::FRAC_PI_2
    }
}

fn rotate_x(points: &mut [[f64; 3]], angle: f64) {
    let (s, c) = angle.sin_cos();
    for p in points.iter_mut() {
        let (y, z) = (p[1], p[2]);
        p[1] = c * y - s * z;
        p[2] = s * y + c * z;
    }
}

fn rotate_y(points: &mut [[f64; 3]], angle: f64) {
    let (s, c) = angle.sin_cos();
    for p in points.iter_mut() {
        let (x, z) = (p[0], p[2]);
        p[0] = c * x + s * z;
        p[2] = -s * x + c * z;
    }
}

fn rotate_z(points: &mut [[f64; 3]], angle: f64) {
    let (s, c) = angle.sin_cos();
    for p in points.iter_mut() {
        let (x, y) = (p[0], p[1]);
        p[0] = c * x - s * y;
        p[1] = s * x + c * y;
    }
}

/// Quasi-uniform point set on a spherical cap.
///
/// A Fibonacci lattice is laid over the full sphere with enough points
/// that the first `sampling` of them tile the cap of half-angle
/// `max_angle` around the optical axis; each point then represents the
/// identical solid angle [`FibonacciMesh::d_omega`]. The cap is spun by
/// `rotation` about the axis (the in-plane coordinates are captured at
/// that stage for mode-field evaluation), then tilted onto the requested
/// viewing direction by `gamma_offset` and `phi_offset`.
#[derive(Debug, Clone)]
pub struct FibonacciMesh {
    /// Elevation of each point, $\varphi = \arcsin z \in [-\pi/2, \pi/2]$.
    pub phi: Vec<f64>,
    /// Azimuth of each point, $\theta = \operatorname{atan2}(y, x)$.
    pub theta: Vec<f64>,
    /// In-plane x coordinate of each point before the tilt rotations.
    pub base_x: Vec<f64>,
    /// In-plane y coordinate of each point before the tilt rotations.
    pub base_y: Vec<f64>,
    /// Solid angle represented by one point, `omega / sampling`.
    pub d_omega: f64,
    /// Total solid angle of the cap.
    pub omega: f64,
    /// Number of points.
    pub sampling: usize,
    /// Cap half-angle in radians.
    pub max_angle: f64,
}

impl FibonacciMesh {
    /// Build the cap mesh. Angles are radians; `max_angle` must be
    /// positive (a zero aperture subtends no solid angle).
    pub fn new(
        sampling: usize,
        max_angle: f64,
        phi_offset: f64,
        gamma_offset: f64,
        rotation: f64,
    ) -> Self {
        let omega = (2.0 * std::f64::consts::PI * (max_angle.cos() - 1.0)).abs();
        let d_omega = omega / sampling as f64;

        let full_count = ((sampling as f64) * 4.0 * std::f64::consts::PI / omega).ceil() as usize;
        let full_count = full_count.max(2);
        let golden = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());

        let mut points = Vec::with_capacity(sampling);
        for i in 0..sampling {
            let z = 1.0 - 2.0 * i as f64 / (full_count - 1) as f64;
            let radius = (1.0 - z * z).max(0.0).sqrt();
            let t = golden * i as f64;
            points.push([radius * t.cos(), radius * t.sin(), z]);
        }

        rotate_z(&mut points, rotation);
        let base_x: Vec<f64> = points.iter().map(|p| p[0]).collect();
        let base_y: Vec<f64> = points.iter().map(|p| p[1]).collect();

        rotate_x(&mut points, gamma_offset);
        rotate_y(&mut points, phi_offset);

        let phi: Vec<f64> = points.iter().map(|p| p[2].clamp(-1.0, 1.0).asin()).collect();
        let theta: Vec<f64> = points.iter().map(|p| p[1].atan2(p[0])).collect();

        Self { phi, theta, base_x, base_y, d_omega, omega, sampling, max_angle }
    }
}

/// Separable midpoint grid over the full sphere.
///
/// `sampling` cells along elevation and azimuth each, $S^2$ cells total.
/// Scalar samples are laid out elevation-major: index `p * sampling + t`
/// holds elevation row `p`, azimuth column `t`.
#[derive(Debug, Clone)]
pub struct FullSteradian {
    /// Cell-centre elevations over $[-\pi/2, \pi/2]$.
    pub phi: Vec<f64>,
    /// Cell-centre azimuths over $[-\pi, \pi]$.
    pub theta: Vec<f64>,
    /// Elevation step $\pi / S$.
    pub d_phi: f64,
    /// Azimuth step $2\pi / S$.
    pub d_theta: f64,
    /// Cells per axis.
    pub sampling: usize,
}

impl FullSteradian {
    pub fn new(sampling: usize) -> Self {
        let d_phi = std::f64::consts::PI / sampling as f64;
        let d_theta = 2.0 * std::f64::consts::PI / sampling as f64;
        let phi = (0..sampling)
            .map(|p| -std::f64::consts::FRAC_PI_2 + d_phi / 2.0 + p as f64 * d_phi)
            .collect();
        let theta = (0..sampling)
            .map(|t| -std::f64::consts::PI + d_theta / 2.0 + t as f64 * d_theta)
            .collect();
        Self { phi, theta, d_phi, d_theta, sampling }
    }

    /// $\int f \, d\Omega$ over the sphere with the polar Jacobian.
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != sampling * sampling`.
    pub fn integral(&self, values: &[f64]) -> f64 {
        assert_eq!(values.len(), self.sampling * self.sampling);
        let mut total = 0.0;
        for (p, &phi) in self.phi.iter().enumerate() {
            let weight = (phi + std::f64::consts::FRAC_PI_2).sin();
            for t in 0..self.sampling {
                total += values[p * self.sampling + t] * weight;
            }
        }
        total * self.d_phi * self.d_theta
    }

    /// $\int f \cos\varphi' \, d\Omega$ where $\varphi'$ is the polar
    /// angle from the propagation axis; the forward-weighted moment used
    /// by the asymmetry factor.
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != sampling * sampling`.
    pub fn cos_integral(&self, values: &[f64]) -> f64 {
        assert_eq!(values.len(), self.sampling * self.sampling);
        let mut total = 0.0;
        for (p, &phi) in self.phi.iter().enumerate() {
            let polar = phi + std::f64::consts::FRAC_PI_2;
            let weight = polar.sin() * polar.cos();
            for t in 0..self.sampling {
                total += values[p * self.sampling + t] * weight;
            }
        }
        total * self.d_phi * self.d_theta
    }
}
