//! Least squares solution of `A·x = b` through the singular value decomposition.
//!
//! A = U·Σ·V^T, x = V·Σ⁺·U^T·b where Σ⁺ inverts only the singular values above the rank
//! tolerance. Works for square, rectangular and ill-conditioned matrices, which is what the
//! augmented systems produced by mixed boundary conditions need. A rank deficient matrix has
//! infinitely many least squares solutions, the minimum norm one would not mean anything for a
//! boundary value problem, so it is reported as an error instead.
use log::{info, warn};
use nalgebra::{DMatrix, DVector, SVD};

/// condition numbers above this are reported in the log
pub const CONDITION_WARNING_THRESHOLD: f64 = 1e12;

#[derive(Debug, Clone, PartialEq)]
pub enum LeastSquaresFailure {
    /// rank of A below its number of columns
    RankDeficient { rank: usize, columns: usize },
    /// SVD did not provide U or V^T, or produced non finite values
    Decomposition(String),
}

impl std::fmt::Display for LeastSquaresFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeastSquaresFailure::RankDeficient { rank, columns } => {
                write!(f, "matrix rank {} is below the number of unknowns {}", rank, columns)
            }
            LeastSquaresFailure::Decomposition(msg) => write!(f, "SVD failed: {}", msg),
        }
    }
}

/// tolerance used for rank decisions: ε·max(m, n)·σ_max
pub fn rank_tolerance(singular_values: &DVector<f64>, shape: (usize, usize)) -> f64 {
    let sigma_max = singular_values.max();
    f64::EPSILON * (shape.0.max(shape.1) as f64) * sigma_max
}

/// σ_max / σ_min, infinite for singular matrices
pub fn condition_number(singular_values: &DVector<f64>) -> f64 {
    let sigma_max = singular_values.max();
    let sigma_min = singular_values.min();
    if sigma_min == 0.0 {
        f64::INFINITY
    } else {
        sigma_max / sigma_min
    }
}

pub fn svd_solve(A: DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>, LeastSquaresFailure> {
    let shape = A.shape();
    let svd: SVD<f64, _, _> = A.svd(true, true);
    let eps = rank_tolerance(&svd.singular_values, shape);
    let rank = svd.rank(eps);
    let cond = condition_number(&svd.singular_values);
    info!(
        "SVD of {}x{} matrix: rank {}, condition number {:.3e}",
        shape.0, shape.1, rank, cond
    );
    if rank < shape.1 {
        warn!("matrix is rank deficient: rank {} < {}", rank, shape.1);
        return Err(LeastSquaresFailure::RankDeficient {
            rank,
            columns: shape.1,
        });
    }
    if cond > CONDITION_WARNING_THRESHOLD {
        warn!(
            "The system of linear equations is poorly conditioned. Condition number = {:.2e}",
            cond
        );
    }
    let x = svd
        .solve(b, eps)
        .map_err(|e| LeastSquaresFailure::Decomposition(e.to_string()))?;
    if x.iter().any(|v| !v.is_finite()) {
        return Err(LeastSquaresFailure::Decomposition(
            "solution contains non finite values".to_string(),
        ));
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// famous example of ill-conditioned matrix
    fn hilbert_matrix(n: usize) -> DMatrix<f64> {
        DMatrix::from_fn(n, n, |i, j| 1.0 / (i as f64 + j as f64 + 1.0))
    }

    #[test]
    fn test_square_system() {
        let A = DMatrix::from_row_slice(2, 2, &[3.0, 1.0, 1.0, 2.0]);
        let b = DVector::from_vec(vec![9.0, 8.0]);
        let x = svd_solve(A, &b).unwrap();
        assert_relative_eq!(x[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_overdetermined_system_least_squares() {
        // fit y = k·x + m through (0, 1), (1, 3), (2, 5), (3, 7.5)
        let A = DMatrix::from_row_slice(4, 2, &[0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0, 1.0]);
        let b = DVector::from_vec(vec![1.0, 3.0, 5.0, 7.5]);
        let x = svd_solve(A.clone(), &b).unwrap();
        // normal equations
        let normal = (A.transpose() * &A).lu().solve(&(A.transpose() * &b)).unwrap();
        assert_relative_eq!(x[0], normal[0], epsilon = 1e-10);
        assert_relative_eq!(x[1], normal[1], epsilon = 1e-10);
    }

    #[test]
    fn test_rank_deficient_rejected() {
        let A = DMatrix::from_row_slice(3, 3, &[1.0, 1.0, 2.0, 1.0, 1.0, 2.0, 2.0, 1.0, 2.0]);
        let b = DVector::from_vec(vec![3.0, 1.0, 5.0]);
        let res = svd_solve(A, &b);
        assert!(matches!(res, Err(LeastSquaresFailure::RankDeficient { rank: 2, columns: 3 })));
    }

    #[test]
    fn test_hilbert_is_poorly_conditioned_but_solvable() {
        let A = hilbert_matrix(6);
        let x_true = DVector::from_element(6, 1.0);
        let b = &A * &x_true;
        let svd = A.clone().svd(false, false);
        assert!(condition_number(&svd.singular_values) > 1e6);
        let x = svd_solve(A, &b).unwrap();
        for v in x.iter() {
            assert_relative_eq!(*v, 1.0, epsilon = 1e-6);
        }
    }
}
