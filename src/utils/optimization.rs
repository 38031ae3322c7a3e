//! Derivative-free minimisation for model parameter estimation.

use std::cmp::Ordering;

/// Result of Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// The best point found.
    pub optimal_point: Vec<f64>,
    /// Objective value at the best point.
    pub optimal_value: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the simplex met the tolerance before `max_iter`.
    pub converged: bool,
}

/// Configuration for Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Convergence tolerance on relative objective spread and simplex size.
    pub tolerance: f64,
    /// Reflection coefficient.
    pub alpha: f64,
    /// Expansion coefficient.
    pub gamma: f64,
    /// Contraction coefficient.
    pub rho: f64,
    /// Shrink coefficient.
    pub sigma: f64,
    /// Initial simplex step, relative to the coordinate when non-zero.
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

/// Box constraints applied by clamping every candidate point.
struct Bounds<'a>(Option<&'a [(f64, f64)]>);

impl Bounds<'_> {
    fn clamp(&self, mut point: Vec<f64>) -> Vec<f64> {
        if let Some(bounds) = self.0 {
            for (x, &(lo, hi)) in point.iter_mut().zip(bounds) {
                *x = x.clamp(lo, hi);
            }
        }
        point
    }
}

/// Point along the ray from `from` through `to`: `from + t (to - from)`.
fn along(from: &[f64], to: &[f64], t: f64) -> Vec<f64> {
    from.iter().zip(to).map(|(f, x)| f + t * (x - f)).collect()
}

fn by_value(a: &(Vec<f64>, f64), b: &(Vec<f64>, f64)) -> Ordering {
    a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal)
}

/// Minimise `objective` with the Nelder-Mead simplex method.
///
/// The objective may return `f64::INFINITY` to reject a region; such points
/// are never preferred over finite ones.
///
/// # Example
/// ```
/// use caseload_forecast::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] + 1.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     NelderMeadConfig::default(),
/// );
///
/// assert!(result.converged);
/// assert!((result.optimal_point[0] - 2.0).abs() < 0.01);
/// assert!((result.optimal_point[1] + 1.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let bounds = Bounds(bounds);
    let eval = |point: Vec<f64>| {
        let value = objective(&point);
        let value = if value.is_nan() { f64::INFINITY } else { value };
        (point, value)
    };

    let start = bounds.clamp(initial.to_vec());
    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
    simplex.push(eval(start.clone()));
    for i in 0..n {
        let mut vertex = start.clone();
        vertex[i] += if vertex[i].abs() > 1e-10 {
            config.initial_step * vertex[i].abs()
        } else {
            config.initial_step
        };
        simplex.push(eval(bounds.clamp(vertex)));
    }

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        simplex.sort_by(by_value);
        let best = simplex[0].1;
        let worst = simplex[n].1;

        if !best.is_finite() {
            break;
        }
        iterations += 1;

        let spread_ok = worst.is_finite() && worst - best < config.tolerance * (1.0 + best.abs());
        let size = simplex
            .iter()
            .skip(1)
            .map(|(v, _)| {
                v.iter()
                    .zip(&simplex[0].0)
                    .map(|(a, b)| (a - b).powi(2))
                    .sum::<f64>()
                    .sqrt()
            })
            .fold(0.0, f64::max);
        if spread_ok || size < config.tolerance {
            converged = true;
            break;
        }

        let mut centroid = vec![0.0; n];
        for (vertex, _) in &simplex[..n] {
            for (c, x) in centroid.iter_mut().zip(vertex) {
                *c += x / n as f64;
            }
        }

        let reflected = eval(bounds.clamp(along(&centroid, &simplex[n].0, -config.alpha)));

        if reflected.1 < best {
            let expanded = eval(bounds.clamp(along(&centroid, &reflected.0, config.gamma)));
            simplex[n] = if expanded.1 < reflected.1 {
                expanded
            } else {
                reflected
            };
            continue;
        }

        if reflected.1 < simplex[n - 1].1 {
            simplex[n] = reflected;
            continue;
        }

        let contracted = if reflected.1 < worst {
            let outside = eval(bounds.clamp(along(&centroid, &reflected.0, config.rho)));
            (outside.1 <= reflected.1).then_some(outside)
        } else {
            let inside = eval(bounds.clamp(along(&centroid, &simplex[n].0, config.rho)));
            (inside.1 < worst).then_some(inside)
        };

        if let Some(vertex) = contracted {
            simplex[n] = vertex;
            continue;
        }

        let anchor = simplex[0].0.clone();
        for vertex in simplex.iter_mut().skip(1) {
            *vertex = eval(bounds.clamp(along(&anchor, &vertex.0, config.sigma)));
        }
    }

    simplex.sort_by(by_value);
    let (optimal_point, optimal_value) = simplex.swap_remove(0);

    NelderMeadResult {
        optimal_point,
        optimal_value,
        iterations,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn nelder_mead_quadratic_2d() {
        let result = nelder_mead(
            |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
            &[0.0, 0.0],
            None,
            NelderMeadConfig::default(),
        );

        assert!(result.converged);
        assert_relative_eq!(result.optimal_point[0], 2.0, epsilon = 1e-3);
        assert_relative_eq!(result.optimal_point[1], 3.0, epsilon = 1e-3);
        assert!(result.optimal_value < 1e-6);
    }

    #[test]
    fn nelder_mead_rosenbrock() {
        let result = nelder_mead(
            |x| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2),
            &[-1.0, 1.0],
            None,
            NelderMeadConfig {
                max_iter: 5000,
                tolerance: 1e-12,
                ..Default::default()
            },
        );

        assert_relative_eq!(result.optimal_point[0], 1.0, epsilon = 1e-2);
        assert_relative_eq!(result.optimal_point[1], 1.0, epsilon = 2e-2);
    }

    #[test]
    fn nelder_mead_respects_bounds() {
        // Unconstrained minimum at 5, bounded to [0, 1].
        let result = nelder_mead(
            |x| (x[0] - 5.0).powi(2),
            &[0.5],
            Some(&[(0.0, 1.0)]),
            NelderMeadConfig::default(),
        );

        assert!(result.optimal_point[0] <= 1.0);
        assert_relative_eq!(result.optimal_point[0], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn nelder_mead_avoids_rejected_region() {
        // Minimum at x = 2 but everything above 1.5 is rejected.
        let result = nelder_mead(
            |x| {
                if x[0] > 1.5 {
                    f64::INFINITY
                } else {
                    (x[0] - 2.0).powi(2)
                }
            },
            &[0.0],
            None,
            NelderMeadConfig::default(),
        );

        assert!(result.optimal_point[0] <= 1.5);
        assert!(result.optimal_value.is_finite());
        assert!(result.optimal_point[0] > 1.4);
    }

    #[test]
    fn nelder_mead_empty_initial() {
        let result = nelder_mead(|_| 0.0, &[], None, NelderMeadConfig::default());
        assert!(result.optimal_point.is_empty());
        assert!(!result.converged);
    }

    #[test]
    fn nelder_mead_is_deterministic() {
        let f = |x: &[f64]| (x[0] - 0.3).powi(2) + (x[1] + 0.7).powi(4) + x[0] * x[1];
        let a = nelder_mead(f, &[0.1, 0.1], None, NelderMeadConfig::default());
        let b = nelder_mead(f, &[0.1, 0.1], None, NelderMeadConfig::default());
        assert_eq!(a.optimal_point, b.optimal_point);
        assert_eq!(a.iterations, b.iterations);
    }
}
