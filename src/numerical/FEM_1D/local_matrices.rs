//! Element matrices of Lagrange shape functions on an element of length `L`.
//!
//! For shape functions φ_i the three physical terms are
//! - diffusion  K_ij = ∫ φ_i' φ_j' dx, enters with −a (integration by parts of a·u'')
//! - advection  B_ij = ∫ φ_i φ_j' dx, enters with  b
//! - reaction   M_ij = ∫ φ_i φ_j  dx, enters with  c
//!
//! and the load vector is d·∫ φ_i dx.
use crate::numerical::FEM_1D::equation::EquationSpec;
use crate::numerical::FEM_1D::mesh::ElementScheme;
use nalgebra::{DMatrix, DVector};

const CUBIC_DIFFUSION: [f64; 16] = [
    148.0, -189.0, 54.0, -13.0, //
    -189.0, 432.0, -297.0, 54.0, //
    54.0, -297.0, 432.0, -189.0, //
    -13.0, 54.0, -189.0, 148.0,
];
const CUBIC_ADVECTION: [f64; 16] = [
    -40.0, 57.0, -24.0, 7.0, //
    -57.0, 0.0, 81.0, -24.0, //
    24.0, -81.0, 0.0, 57.0, //
    -7.0, 24.0, -57.0, 40.0,
];
const CUBIC_REACTION: [f64; 16] = [
    128.0, 99.0, -36.0, 19.0, //
    99.0, 648.0, -81.0, -36.0, //
    -36.0, -81.0, 648.0, 99.0, //
    19.0, -36.0, 99.0, 128.0,
];

pub fn diffusion_matrix(scheme: ElementScheme, length: f64) -> DMatrix<f64> {
    match scheme {
        ElementScheme::Linear => {
            DMatrix::from_row_slice(2, 2, &[1.0, -1.0, -1.0, 1.0]) / length
        }
        ElementScheme::Cubic => DMatrix::from_row_slice(4, 4, &CUBIC_DIFFUSION) / (40.0 * length),
    }
}

/// does not depend on the element length
pub fn advection_matrix(scheme: ElementScheme) -> DMatrix<f64> {
    match scheme {
        ElementScheme::Linear => DMatrix::from_row_slice(2, 2, &[-0.5, 0.5, -0.5, 0.5]),
        ElementScheme::Cubic => DMatrix::from_row_slice(4, 4, &CUBIC_ADVECTION) / 80.0,
    }
}

pub fn reaction_matrix(scheme: ElementScheme, length: f64) -> DMatrix<f64> {
    match scheme {
        ElementScheme::Linear => {
            DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 2.0]) * (length / 6.0)
        }
        ElementScheme::Cubic => DMatrix::from_row_slice(4, 4, &CUBIC_REACTION) * (length / 1680.0),
    }
}

/// −a·K + b·B + c·M, a term is left out when its coefficient is zero
pub fn local_matrix(spec: &EquationSpec, scheme: ElementScheme, length: f64) -> DMatrix<f64> {
    let n = scheme.nodes_per_element();
    let mut local = DMatrix::zeros(n, n);
    if spec.a() != 0.0 {
        local -= diffusion_matrix(scheme, length) * spec.a();
    }
    if spec.b() != 0.0 {
        local += advection_matrix(scheme) * spec.b();
    }
    if spec.c() != 0.0 {
        local += reaction_matrix(scheme, length) * spec.c();
    }
    local
}

/// d·∫φ_i: trapezoidal lumping for linear elements, [1, 3, 3, 1]/8 for cubic ones
pub fn local_load(d: f64, scheme: ElementScheme, length: f64) -> DVector<f64> {
    let weights: &[f64] = match scheme {
        ElementScheme::Linear => &[0.5, 0.5],
        ElementScheme::Cubic => &[0.125, 0.375, 0.375, 0.125],
    };
    DVector::from_iterator(weights.len(), weights.iter().map(|w| d * w * length))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strum::IntoEnumIterator;

    // value and derivative of the cubic Lagrange basis on the reference element [0, 1]
    fn cubic_basis(i: usize, t: f64) -> (f64, f64) {
        let nodes = [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0];
        let mut value = 1.0;
        let mut denom = 1.0;
        for (k, &xk) in nodes.iter().enumerate() {
            if k != i {
                value *= t - xk;
                denom *= nodes[i] - xk;
            }
        }
        let mut deriv = 0.0;
        for m in (0..4).filter(|&m| m != i) {
            let mut prod = 1.0;
            for (k, &xk) in nodes.iter().enumerate() {
                if k != i && k != m {
                    prod *= t - xk;
                }
            }
            deriv += prod;
        }
        (value / denom, deriv / denom)
    }

    fn gauss_points() -> Vec<(f64, f64)> {
        // 5-point rule on [0, 1], exact up to degree 9
        let x = [
            0.0,
            -0.538_469_310_105_683_1,
            0.538_469_310_105_683_1,
            -0.906_179_845_938_664,
            0.906_179_845_938_664,
        ];
        let w = [
            0.568_888_888_888_888_9,
            0.478_628_670_499_366_5,
            0.478_628_670_499_366_5,
            0.236_926_885_056_189_1,
            0.236_926_885_056_189_1,
        ];
        x.iter()
            .zip(w.iter())
            .map(|(&xi, &wi)| ((xi + 1.0) / 2.0, wi / 2.0))
            .collect()
    }

    #[test]
    fn test_cubic_tables_match_quadrature() {
        let length = 1.7;
        let k = diffusion_matrix(ElementScheme::Cubic, length);
        let b = advection_matrix(ElementScheme::Cubic);
        let m = reaction_matrix(ElementScheme::Cubic, length);
        for i in 0..4 {
            for j in 0..4 {
                let (mut kq, mut bq, mut mq) = (0.0, 0.0, 0.0);
                for (t, w) in gauss_points() {
                    let (phi_i, dphi_i) = cubic_basis(i, t);
                    let (phi_j, dphi_j) = cubic_basis(j, t);
                    kq += w * dphi_i * dphi_j / length;
                    bq += w * phi_i * dphi_j;
                    mq += w * phi_i * phi_j * length;
                }
                assert_relative_eq!(k[(i, j)], kq, epsilon = 1e-10);
                assert_relative_eq!(b[(i, j)], bq, epsilon = 1e-10);
                assert_relative_eq!(m[(i, j)], mq, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_row_sums() {
        // constants lie in the kernel of K and B, rows of M sum to ∫φ_i
        for scheme in ElementScheme::iter() {
            let length = 0.45;
            let k = diffusion_matrix(scheme, length);
            let b = advection_matrix(scheme);
            let m = reaction_matrix(scheme, length);
            let load = local_load(1.0, scheme, length);
            for i in 0..scheme.nodes_per_element() {
                assert_relative_eq!(k.row(i).sum(), 0.0, epsilon = 1e-12);
                assert_relative_eq!(b.row(i).sum(), 0.0, epsilon = 1e-12);
                assert_relative_eq!(m.row(i).sum(), load[i], epsilon = 1e-12);
            }
            assert_relative_eq!(load.sum(), length, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_local_matrix_linear_combination() {
        let spec = EquationSpec::new(2.0, 3.0, 4.0, 1.0, 0.0, 1.0).unwrap();
        let length = 0.5;
        let local = local_matrix(&spec, ElementScheme::Linear, length);
        // −2·(1/0.5)·1 + 3·(−0.5) + 4·(0.5/3)
        assert_relative_eq!(local[(0, 0)], -4.0 - 1.5 + 2.0 / 3.0, epsilon = 1e-14);
        assert_relative_eq!(local[(0, 1)], 4.0 + 1.5 + 1.0 / 3.0, epsilon = 1e-14);
        assert_relative_eq!(local[(1, 0)], 4.0 - 1.5 + 1.0 / 3.0, epsilon = 1e-14);
    }

    #[test]
    fn test_zero_coefficients_are_skipped() {
        let spec = EquationSpec::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0).unwrap();
        let local = local_matrix(&spec, ElementScheme::Cubic, 1.0);
        let expected = -diffusion_matrix(ElementScheme::Cubic, 1.0);
        assert_eq!(local, expected);
    }
}
