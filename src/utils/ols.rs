//! Ordinary least squares with coefficient standard errors.
//!
//! Used by the unit-root regression, where the t-statistic of a single
//! coefficient is the quantity of interest.

/// Result of an OLS fit.
#[derive(Debug, Clone)]
pub struct OLSResult {
    /// Coefficients, one per design column.
    pub coefficients: Vec<f64>,
    /// Standard errors of the coefficients.
    pub std_errors: Vec<f64>,
    /// Residual sum of squares.
    pub rss: f64,
    /// Number of observations.
    pub nobs: usize,
}

impl OLSResult {
    /// t-statistic for coefficient `index`.
    ///
    /// NaN when the standard error is zero or not finite.
    pub fn t_stat(&self, index: usize) -> f64 {
        let se = self.std_errors[index];
        if se > 0.0 && se.is_finite() {
            self.coefficients[index] / se
        } else {
            f64::NAN
        }
    }
}

/// Fit `y = X β + ε` where `design` holds one row per observation.
///
/// The caller supplies any intercept column explicitly. Returns `None` when
/// the problem is under-determined or `X'X` is numerically singular.
pub fn ols_fit(y: &[f64], design: &[Vec<f64>]) -> Option<OLSResult> {
    let n = y.len();
    if n == 0 || design.len() != n {
        return None;
    }
    let k = design[0].len();
    if k == 0 || n <= k || design.iter().any(|row| row.len() != k) {
        return None;
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for (row, &yi) in design.iter().zip(y) {
        for i in 0..k {
            xty[i] += row[i] * yi;
            for j in 0..=i {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..k {
        for j in (i + 1)..k {
            xtx[i][j] = xtx[j][i];
        }
    }

    let chol = cholesky(&xtx)?;
    let beta = chol_solve(&chol, &xty);

    let rss: f64 = design
        .iter()
        .zip(y)
        .map(|(row, &yi)| {
            let fitted: f64 = row.iter().zip(&beta).map(|(x, b)| x * b).sum();
            (yi - fitted).powi(2)
        })
        .sum();
    let sigma_sq = rss / (n - k) as f64;

    // Diagonal of (X'X)^-1 by solving against unit vectors.
    let std_errors = (0..k)
        .map(|j| {
            let mut e = vec![0.0; k];
            e[j] = 1.0;
            let col = chol_solve(&chol, &e);
            (sigma_sq * col[j]).max(0.0).sqrt()
        })
        .collect();

    Some(OLSResult {
        coefficients: beta,
        std_errors,
        rss,
        nobs: n,
    })
}

/// Lower-triangular Cholesky factor of a symmetric positive definite matrix.
///
/// Pivots smaller than a relative tolerance of the original diagonal are
/// treated as singular.
fn cholesky(a: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for m in 0..j {
                sum -= l[i][m] * l[j][m];
            }

            if i == j {
                if sum <= 1e-10 * a[i][i].abs().max(f64::MIN_POSITIVE) {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    Some(l)
}

/// Solve `L L' x = b`.
fn chol_solve(l: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let n = b.len();

    let mut z = vec![0.0; n];
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[i][j] * z[j]).sum();
        z[i] = (b[i] - sum) / l[i][i];
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let sum: f64 = ((i + 1)..n).map(|j| l[j][i] * x[j]).sum();
        x[i] = (z[i] - sum) / l[i][i];
    }

    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn design_with_intercept(x: &[f64]) -> Vec<Vec<f64>> {
        x.iter().map(|&v| vec![1.0, v]).collect()
    }

    #[test]
    fn ols_recovers_exact_line() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v| 3.0 + 2.0 * v).collect();
        let fit = ols_fit(&y, &design_with_intercept(&x)).unwrap();

        assert_relative_eq!(fit.coefficients[0], 3.0, epsilon = 1e-9);
        assert_relative_eq!(fit.coefficients[1], 2.0, epsilon = 1e-9);
        assert!(fit.rss < 1e-18);
        assert_eq!(fit.nobs, 5);
    }

    #[test]
    fn ols_standard_error_matches_closed_form() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [1.1, 1.9, 3.2, 3.8, 5.3, 5.9];
        let fit = ols_fit(&y, &design_with_intercept(&x)).unwrap();

        let x_mean = 3.5;
        let sxx: f64 = x.iter().map(|v| (v - x_mean).powi(2)).sum();
        let sigma_sq = fit.rss / 4.0;
        assert_relative_eq!(fit.std_errors[1], (sigma_sq / sxx).sqrt(), epsilon = 1e-10);
        assert_relative_eq!(fit.t_stat(1), fit.coefficients[1] / fit.std_errors[1]);
    }

    #[test]
    fn ols_detects_collinearity() {
        // Second column duplicates the intercept.
        let design: Vec<Vec<f64>> = (0..6).map(|i| vec![1.0, 1.0, i as f64]).collect();
        let y: Vec<f64> = (0..6).map(|i| i as f64 * 0.5).collect();
        assert!(ols_fit(&y, &design).is_none());
    }

    #[test]
    fn ols_rejects_underdetermined() {
        let design = vec![vec![1.0, 2.0], vec![1.0, 3.0]];
        assert!(ols_fit(&[1.0, 2.0], &design).is_none());
        assert!(ols_fit(&[], &[]).is_none());
    }

    #[test]
    fn standard_error_vanishes_for_perfect_fit() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        let fit = ols_fit(&y, &design_with_intercept(&x)).unwrap();
        // Residuals vanish, so the standard error is (numerically) zero or tiny.
        assert!(fit.std_errors[1] < 1e-6);
    }
}
