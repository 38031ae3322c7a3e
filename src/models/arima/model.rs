//! ARIMA (Autoregressive Integrated Moving Average) model.

use crate::core::{dates_after, DailySeries, Forecast, ForecastRow, PredictionInterval};
use crate::error::{ForecastError, Result};
use crate::models::arima::diff::{difference, integrate};
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::{mean, quantile_normal};
use chrono::NaiveDate;

/// ARIMA model specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ARIMASpec {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
    /// Estimate a mean on the differenced scale (a drift term when d >= 1).
    pub include_constant: bool,
}

impl ARIMASpec {
    /// Create a specification with a constant term.
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self {
            p,
            d,
            q,
            include_constant: true,
        }
    }

    /// Drop the constant term.
    pub fn without_constant(mut self) -> Self {
        self.include_constant = false;
        self
    }

    /// The `(p, d, q)` triple.
    pub fn order(&self) -> (usize, usize, usize) {
        (self.p, self.d, self.q)
    }

    /// Total number of estimated parameters.
    pub fn num_params(&self) -> usize {
        self.p + self.q + usize::from(self.include_constant)
    }

    /// Shortest series this specification can be estimated on.
    ///
    /// After differencing and conditioning on the first `max(p, q)` values,
    /// at least one more residual than parameters must remain.
    pub fn min_observations(&self) -> usize {
        self.d + self.p.max(self.q) + self.num_params() + 1
    }
}

impl Default for ARIMASpec {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

impl std::fmt::Display for ARIMASpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)?;
        if self.include_constant {
            write!(f, " w/ constant")?;
        }
        Ok(())
    }
}

/// A fitted ARIMA model.
///
/// Parameters are estimated by conditional sum of squares. Values are
/// immutable once [`ARIMA::fit`] returns.
#[derive(Debug, Clone)]
pub struct ARIMA {
    spec: ARIMASpec,
    ar_coefficients: Vec<f64>,
    ma_coefficients: Vec<f64>,
    /// Mean of the differenced series.
    intercept: f64,
    /// Observed series on the original scale.
    original: Vec<f64>,
    /// Series after `d` differences.
    differenced: Vec<f64>,
    /// One-step fitted values on the differenced scale (NaN during warm-up).
    fitted_diff: Vec<f64>,
    /// Residuals on the differenced scale (zero during warm-up).
    residuals: Vec<f64>,
    css: f64,
    residual_variance: f64,
    aic: Option<f64>,
    bic: Option<f64>,
    converged: bool,
    last_date: NaiveDate,
}

impl ARIMA {
    /// Fit `spec` to the full series.
    ///
    /// # Errors
    /// * `InsufficientData` when the series is shorter than
    ///   [`ARIMASpec::min_observations`].
    /// * `FitFailed` when the estimate is not finite or falls outside the
    ///   stationary/invertible region.
    pub fn fit(series: &DailySeries, spec: ARIMASpec) -> Result<Self> {
        let values = series.values();
        let needed = spec.min_observations();
        if values.len() < needed {
            return Err(ForecastError::InsufficientData {
                needed,
                got: values.len(),
            });
        }

        let differenced = difference(values, spec.d);
        let (intercept, ar, ma, converged) = Self::estimate(&differenced, spec);

        let fail = |reason: String| ForecastError::FitFailed {
            order: spec.order(),
            reason,
        };
        if !is_stationary(&ar) {
            return Err(fail(format!("AR polynomial {:?} is not stationary", ar)));
        }
        if !is_invertible(&ma) {
            return Err(fail(format!("MA polynomial {:?} is not invertible", ma)));
        }

        let start = spec.p.max(spec.q);
        let residuals = recursion_residuals(&differenced, spec.p, spec.q, intercept, &ar, &ma);
        let css: f64 = residuals[start..].iter().map(|e| e * e).sum();
        if !css.is_finite() || !intercept.is_finite() {
            return Err(fail("conditional sum of squares is not finite".to_string()));
        }

        let fitted_diff = differenced
            .iter()
            .zip(&residuals)
            .enumerate()
            .map(|(t, (x, e))| if t < start { f64::NAN } else { x - e })
            .collect();

        let n_eff = (differenced.len() - start) as f64;
        let residual_variance = css / n_eff;
        let (aic, bic) = if residual_variance > 0.0 {
            let k = spec.num_params() as f64 + 1.0;
            let ll = -0.5 * n_eff * (1.0 + residual_variance.ln() + (2.0 * std::f64::consts::PI).ln());
            (Some(-2.0 * ll + 2.0 * k), Some(-2.0 * ll + k * n_eff.ln()))
        } else {
            (None, None)
        };

        Ok(Self {
            spec,
            ar_coefficients: ar,
            ma_coefficients: ma,
            intercept,
            original: values.to_vec(),
            differenced,
            fitted_diff,
            residuals,
            css,
            residual_variance,
            aic,
            bic,
            converged,
            last_date: series.last_date(),
        })
    }

    /// Estimate `(intercept, ar, ma, converged)` by minimising the CSS.
    fn estimate(x: &[f64], spec: ARIMASpec) -> (f64, Vec<f64>, Vec<f64>, bool) {
        let (p, q) = (spec.p, spec.q);
        let mu0 = if spec.include_constant { mean(x) } else { 0.0 };

        if p == 0 && q == 0 {
            return (mu0, vec![], vec![], true);
        }

        let offset = usize::from(spec.include_constant);
        let mut initial = Vec::with_capacity(offset + p + q);
        let mut bounds = Vec::with_capacity(offset + p + q);
        if spec.include_constant {
            initial.push(mu0);
            bounds.push((f64::NEG_INFINITY, f64::INFINITY));
        }
        for i in 0..p {
            initial.push(0.1 / (i + 1) as f64);
            bounds.push((-0.99, 0.99));
        }
        for i in 0..q {
            initial.push(0.1 / (i + 1) as f64);
            bounds.push((-0.99, 0.99));
        }

        let unpack = |params: &[f64]| {
            let mu = if spec.include_constant { params[0] } else { 0.0 };
            let ar = params[offset..offset + p].to_vec();
            let ma = params[offset + p..].to_vec();
            (mu, ar, ma)
        };

        let result = nelder_mead(
            |params| {
                let (mu, ar, ma) = unpack(params);
                if !is_stationary(&ar) || !is_invertible(&ma) {
                    return f64::INFINITY;
                }
                conditional_sum_of_squares(x, p, q, mu, &ar, &ma)
            },
            &initial,
            Some(&bounds),
            NelderMeadConfig {
                max_iter: 2000,
                tolerance: 1e-10,
                ..Default::default()
            },
        );

        let (mu, ar, ma) = unpack(&result.optimal_point);
        (mu, ar, ma, result.converged)
    }

    /// Get the model specification.
    pub fn spec(&self) -> ARIMASpec {
        self.spec
    }

    /// Get AR coefficients.
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    /// Get MA coefficients.
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    /// Mean of the differenced series (drift when d >= 1).
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Residual variance σ².
    pub fn residual_variance(&self) -> f64 {
        self.residual_variance
    }

    /// Conditional sum of squares at the estimate.
    pub fn css(&self) -> f64 {
        self.css
    }

    /// Get AIC (None for a perfect fit).
    pub fn aic(&self) -> Option<f64> {
        self.aic
    }

    /// Get BIC (None for a perfect fit).
    pub fn bic(&self) -> Option<f64> {
        self.bic
    }

    /// Whether the optimiser met its tolerance.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Last observed date.
    pub fn last_date(&self) -> NaiveDate {
        self.last_date
    }

    /// Series after differencing.
    pub fn differenced(&self) -> &[f64] {
        &self.differenced
    }

    /// In-sample residuals on the differenced scale, excluding the warm-up.
    pub fn residuals(&self) -> &[f64] {
        &self.residuals[self.warm_up()..]
    }

    /// In-sample one-step fitted values on the differenced scale, excluding the warm-up.
    pub fn fitted_values(&self) -> &[f64] {
        &self.fitted_diff[self.warm_up()..]
    }

    fn warm_up(&self) -> usize {
        self.spec.p.max(self.spec.q)
    }

    /// Point forecasts on the original scale for `horizon` steps.
    pub fn predict(&self, horizon: usize) -> Vec<f64> {
        if horizon == 0 {
            return vec![];
        }

        let (p, q) = (self.spec.p, self.spec.q);
        let mu = self.intercept;
        let mut x = self.differenced.clone();
        let mut e = self.residuals.clone();

        for _ in 0..horizon {
            let t = x.len();
            let mut pred = mu;
            for i in 0..p {
                if t > i {
                    pred += self.ar_coefficients[i] * (x[t - 1 - i] - mu);
                }
            }
            for j in 0..q {
                if t > j {
                    pred += self.ma_coefficients[j] * e[t - 1 - j];
                }
            }
            x.push(pred);
            e.push(0.0);
        }

        let ahead = &x[self.differenced.len()..];
        integrate(ahead, &self.original, self.spec.d)
    }

    /// MA(∞) weights ψ_0..ψ_{n-1} of the integrated model `φ(B)(1-B)^d x = θ(B) ε`.
    pub fn psi_weights(&self, n: usize) -> Vec<f64> {
        // Coefficients of φ(B)(1-B)^d as a polynomial in B.
        let mut poly = Vec::with_capacity(self.spec.p + 1);
        poly.push(1.0);
        poly.extend(self.ar_coefficients.iter().map(|phi| -phi));
        for _ in 0..self.spec.d {
            let mut next = poly.clone();
            next.push(0.0);
            for i in 1..next.len() {
                next[i] -= poly[i - 1];
            }
            poly = next;
        }
        let phi_star: Vec<f64> = poly[1..].iter().map(|c| -c).collect();

        let mut psi = Vec::with_capacity(n);
        for j in 0..n {
            if j == 0 {
                psi.push(1.0);
                continue;
            }
            let mut value = self.ma_coefficients.get(j - 1).copied().unwrap_or(0.0);
            for (i, phi) in phi_star.iter().enumerate().take(j) {
                value += phi * psi[j - 1 - i];
            }
            psi.push(value);
        }
        psi
    }

    /// Forecast standard errors for steps `1..=horizon`.
    pub fn forecast_std_errors(&self, horizon: usize) -> Vec<f64> {
        let sigma2 = self.residual_variance;
        let mut cumulative = 0.0;
        self.psi_weights(horizon)
            .into_iter()
            .map(|psi| {
                cumulative += psi * psi;
                (sigma2 * cumulative).sqrt()
            })
            .collect()
    }

    /// Dated forecast with prediction intervals at each of `levels`.
    ///
    /// # Errors
    /// `InvalidParameter` for a zero horizon or a level outside (0, 1).
    pub fn forecast(&self, horizon: usize, levels: &[f64]) -> Result<Forecast> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "forecast horizon must be positive".to_string(),
            ));
        }
        if let Some(level) = levels.iter().find(|l| !(**l > 0.0 && **l < 1.0)) {
            return Err(ForecastError::InvalidParameter(format!(
                "interval level {} must lie in (0, 1)",
                level
            )));
        }

        let points = self.predict(horizon);
        if points.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ComputationError(format!(
                "{} produced a non-finite forecast",
                self.spec
            )));
        }
        let std_errors = self.forecast_std_errors(horizon);
        let z: Vec<f64> = levels
            .iter()
            .map(|level| quantile_normal((1.0 + level) / 2.0))
            .collect();

        let dates = dates_after(self.last_date, horizon)?;

        let rows = dates
            .into_iter()
            .zip(points.into_iter().zip(std_errors))
            .map(|(date, (point, se))| {
                let intervals = levels
                    .iter()
                    .zip(&z)
                    .map(|(&level, &z)| PredictionInterval {
                        level,
                        lower: point - z * se,
                        upper: point + z * se,
                    })
                    .collect();
                ForecastRow {
                    date,
                    point,
                    std_error: se,
                    intervals,
                }
            })
            .collect();

        Ok(Forecast::from_rows(rows))
    }
}

/// Residuals of the ARMA recursion, zero for the first `max(p, q)` positions.
fn recursion_residuals(x: &[f64], p: usize, q: usize, mu: f64, ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let n = x.len();
    let start = p.max(q);
    let mut residuals = vec![0.0; n];

    for t in start..n {
        let mut pred = mu;
        for i in 0..p {
            pred += ar[i] * (x[t - 1 - i] - mu);
        }
        for j in 0..q {
            pred += ma[j] * residuals[t - 1 - j];
        }
        residuals[t] = x[t] - pred;
    }

    residuals
}

fn conditional_sum_of_squares(x: &[f64], p: usize, q: usize, mu: f64, ar: &[f64], ma: &[f64]) -> f64 {
    let start = p.max(q);
    if x.len() <= start {
        return f64::INFINITY;
    }
    recursion_residuals(x, p, q, mu, ar, ma)[start..]
        .iter()
        .map(|e| e * e)
        .sum()
}

/// Whether `1 - φ_1 B - ... - φ_p B^p` has all roots outside the unit circle.
///
/// Uses the Durbin-Levinson step-down: the polynomial is stationary iff
/// every reflection coefficient has modulus below one.
pub fn is_stationary(phi: &[f64]) -> bool {
    let mut a = phi.to_vec();
    while let Some(&kappa) = a.last() {
        if !(kappa.abs() < 1.0) {
            return false;
        }
        let m = a.len();
        let denom = 1.0 - kappa * kappa;
        a = (0..m - 1)
            .map(|j| (a[j] + kappa * a[m - 2 - j]) / denom)
            .collect();
    }
    true
}

/// Whether `1 + θ_1 B + ... + θ_q B^q` has all roots outside the unit circle.
pub fn is_invertible(theta: &[f64]) -> bool {
    let negated: Vec<f64> = theta.iter().map(|t| -t).collect();
    is_stationary(&negated)
}
