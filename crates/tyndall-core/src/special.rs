//! Cylindrical Bessel and Hankel functions for the scattering series.
//!
//! The coefficient recurrences need $J_n(z)$ and $J'_n(z)$ at complex
//! argument (the interior field sees the complex relative index) and
//! $H^{(1)}_n(x) = J_n(x) + i Y_n(x)$ at the real external size parameter.
//! LP fiber-mode templates additionally need the zeros $j_{\nu,k}$ of
//! $J_\nu$.
//!
//! $J_n$ is evaluated by Miller's downward recurrence normalised with
//! $J_0(z) + 2\sum_k J_{2k}(z) = 1$, which is stable for every order the
//! engine requests. $Y_n$ (real argument only) uses the ascending series
//! for $Y_0, Y_1$ up to `x = 12` and the Hankel asymptotic expansion above,
//! then the upward recurrence, which is stable for $Y$.

use num_complex::Complex64;

const EULER_GAMMA: f64 = 0.5772156649015328606;

/// Rescale guard for the downward recurrence. Intermediates grow while
/// recursing down; dividing everything by the running normalisation at the
/// end cancels the scale, so clamping magnitudes keeps the sweep finite
/// without changing the result.
const RESCALE_THRESHOLD: f64 = 1e100;
const RESCALE_FACTOR: f64 = 1e-100;

/// Evaluate $J_0(z) \dots J_{n_{max}}(z)$ at complex argument.
///
/// Downward (Miller) recurrence from a trial value at an order comfortably
/// above both `n_max` and `|z|`, normalised with the even-order sum rule.
/// `J_n(0)` is `1` for `n = 0` and `0` otherwise.
pub fn bessel_j_array(n_max: usize, z: Complex64) -> Vec<Complex64> {
    let mut out = vec![Complex64::new(0.0, 0.0); n_max + 1];
    let magnitude = z.norm();
    if magnitude == 0.0 {
        out[0] = Complex64::new(1.0, 0.0);
        return out;
    }

    let mut start =
        n_max.max(magnitude.ceil() as usize) + 16 + (4.0 * magnitude.cbrt()).ceil() as usize;
    if start % 2 == 1 {
        start += 1;
    }

    let mut above = Complex64::new(0.0, 0.0); // J_{k+1}
    let mut current = Complex64::new(1e-30, 0.0); // trial J_k
    let mut norm = Complex64::new(0.0, 0.0);

    for k in (0..=start).rev() {
        if k <= n_max {
            out[k] = current;
        }
        if k == 0 {
            norm += current;
        } else if k % 2 == 0 {
            norm += 2.0 * current;
        }
        if k > 0 {
            let below = (2.0 * k as f64 / z) * current - above;
            above = current;
            current = below;
            if current.re.abs() > RESCALE_THRESHOLD || current.im.abs() > RESCALE_THRESHOLD {
                above *= RESCALE_FACTOR;
                current *= RESCALE_FACTOR;
                norm *= RESCALE_FACTOR;
                for value in out.iter_mut() {
                    *value *= RESCALE_FACTOR;
                }
            }
        }
    }

    for value in out.iter_mut() {
        *value /= norm;
    }
    out
}

/// Evaluate a single $J_n(z)$.
pub fn bessel_j(n: usize, z: Complex64) -> Complex64 {
    bessel_j_array(n, z)[n]
}

/// Evaluate $J'_n(z) = J_{n-1}(z) - (n/z) J_n(z)$, with $J'_0 = -J_1$.
///
/// At `z = 0` the limit values are used: $J'_1(0) = 1/2$, zero otherwise.
pub fn bessel_j_prime(n: usize, z: Complex64) -> Complex64 {
    if z.norm() == 0.0 {
        if n == 1 {
            return Complex64::new(0.5, 0.0);
        }
        return Complex64::new(0.0, 0.0);
    }
    let values = bessel_j_array(n.max(1), z);
    if n == 0 {
        return -values[1];
    }
    values[n - 1] - (n as f64 / z) * values[n]
}

/// Ascending series for $Y_0(x)$, $Y_1(x)$, reliable for `x <= 12`.
fn bessel_y01_series(x: f64) -> (f64, f64) {
    let j = bessel_j_array(1, Complex64::new(x, 0.0));
    let (j0, j1) = (j[0].re, j[1].re);
    let log_term = (x / 2.0).ln() + EULER_GAMMA;
    let q = x * x / 4.0;

    // Y0: harmonic-number series
    let mut sum = 0.0;
    let mut term = 1.0;
    let mut harmonic = 0.0;
    for k in 1..60 {
        let kf = k as f64;
        term *= q / (kf * kf);
        harmonic += 1.0 / kf;
        let contribution = if k % 2 == 1 { term * harmonic } else { -term * harmonic };
        sum += contribution;
        if contribution.abs() < 1e-18 * sum.abs() + 1e-300 {
            break;
        }
    }
    let y0 = (2.0 / std::f64::consts::PI) * (log_term * j0 + sum);

    // Y1: paired-harmonic series over (x/2)^{2k+1} / (k! (k+1)!)
    let mut sum = 0.0;
    let mut term = x / 2.0;
    let mut h_k = 0.0;
    let mut h_k1 = 1.0;
    for k in 0..60 {
        let kf = k as f64;
        let contribution = if k % 2 == 0 {
            (h_k + h_k1) * term
        } else {
            -(h_k + h_k1) * term
        };
        sum += contribution;
        term *= q / ((kf + 1.0) * (kf + 2.0));
        h_k += 1.0 / (kf + 1.0);
        h_k1 += 1.0 / (kf + 2.0);
        if contribution.abs() < 1e-18 * sum.abs() + 1e-300 {
            break;
        }
    }
    let y1 = (2.0 / std::f64::consts::PI) * log_term * j1
        - 2.0 / (std::f64::consts::PI * x)
        - sum / std::f64::consts::PI;

    (y0, y1)
}

/// Auxiliary sums $P_n(x)$, $Q_n(x)$ of the Hankel asymptotic expansion,
/// truncated adaptively at the smallest term (the series is divergent; the
/// smallest term bounds the error).
fn hankel_pq(n: usize, x: f64) -> (f64, f64) {
    let mu = 4.0 * (n * n) as f64;
    let mut p = 1.0;
    let mut q = 0.0;
    let mut term = 1.0;
    let mut previous = f64::INFINITY;
    for k in 1..40usize {
        let kf = k as f64;
        term *= (mu - (2.0 * kf - 1.0).powi(2)) / (kf * 8.0 * x);
        if term.abs() >= previous && k > 2 {
            break;
        }
        previous = term.abs();
        if k % 2 == 1 {
            // Q picks up a1, -a3, +a5, ...
            q += if ((k - 1) / 2) % 2 == 0 { term } else { -term };
        } else {
            // P picks up -a2, +a4, ...
            p += if (k / 2) % 2 == 0 { term } else { -term };
        }
    }
    (p, q)
}

/// Evaluate $Y_0(x) \dots Y_{n_{max}}(x)$ for real positive argument.
///
/// # Panics
///
/// Panics if `x <= 0` — $Y_n$ has a branch cut along the negative axis and
/// the engine never evaluates it there.
pub fn bessel_y_array(n_max: usize, x: f64) -> Vec<f64> {
    assert!(x > 0.0, "Y_n requires a positive real argument, got {x}");

    let (y0, y1) = if x <= 12.0 {
        bessel_y01_series(x)
    } else {
        let (p0, q0) = hankel_pq(0, x);
        let (p1, q1) = hankel_pq(1, x);
        let factor = (2.0 / (std::f64::consts::PI * x)).sqrt();
        let chi0 = x - std::f64::consts::FRAC_PI_4;
        let chi1 = x - 3.0 * std::f64::consts::FRAC_PI_4;
        (
            factor * (p0 * chi0.sin() + q0 * chi0.cos()),
            factor * (p1 * chi1.sin() + q1 * chi1.cos()),
        )
    };

    let mut out = vec![0.0; n_max + 1];
    out[0] = y0;
    if n_max >= 1 {
        out[1] = y1;
    }
    for k in 1..n_max {
        out[k + 1] = (2.0 * k as f64 / x) * out[k] - out[k - 1];
    }
    out
}

/// Evaluate $H^{(1)}_0(x) \dots H^{(1)}_{n_{max}}(x)$ for real positive
/// argument.
///
/// # Panics
///
/// Panics if `x <= 0` (see [`bessel_y_array`]).
pub fn hankel1_array(n_max: usize, x: f64) -> Vec<Complex64> {
    let j = bessel_j_array(n_max, Complex64::new(x, 0.0));
    let y = bessel_y_array(n_max, x);
    (0..=n_max).map(|k| Complex64::new(j[k].re, y[k])).collect()
}

/// The `rank`-th positive zero $j_{\nu,k}$ of $J_\nu$ (`rank` counts from 1).
///
/// McMahon's asymptotic expansion (three correction terms) seeds a Newton
/// iteration on $J_\nu$; six steps are ample for every (order, rank) the
/// LP mode templates request.
///
/// # Panics
///
/// Panics if `rank == 0`.
pub fn bessel_j_zero(order: usize, rank: usize) -> f64 {
    assert!(rank >= 1, "Bessel zeros are counted from rank 1");

    let mu = 4.0 * (order * order) as f64;
    let beta = (rank as f64 + 0.5 * order as f64 - 0.25) * std::f64::consts::PI;
    let e = 8.0 * beta;
    let mut z = beta
        - (mu - 1.0) / e
        - 4.0 * (mu - 1.0) * (7.0 * mu - 31.0) / (3.0 * e.powi(3))
        - 32.0 * (mu - 1.0) * (83.0 * mu * mu - 982.0 * mu + 3779.0) / (15.0 * e.powi(5));

    for _ in 0..6 {
        let values = bessel_j_array(order.max(1), Complex64::new(z, 0.0));
        let jn = values[order].re;
        let slope = if order == 0 {
            -values[1].re
        } else {
            values[order - 1].re - (order as f64 / z) * values[order].re
        };
        let step = jn / slope;
        z -= step;
        if step.abs() < 1e-14 * z {
            break;
        }
    }
    z
}
