//! # Closed form solution
//!
//! General solution of a·u'' + b·u' + c·u + d = 0 is u = C1·φ1 + C2·φ2 + p where φ1, φ2 span the
//! solutions of the homogeneous equation and p is a particular solution. The homogeneous part
//! follows from the roots of the characteristic equation a·λ² + b·λ + c = 0:
//!
//! | Δ = b² − 4ac | roots                         | φ1, φ2                           |
//! |--------------|-------------------------------|----------------------------------|
//! | Δ > 0        | λ1,2 = (−b ± √Δ)/2a            | e^(λ1 x), e^(λ2 x)                |
//! | Δ = 0        | λ = −b/2a (repeated)           | e^(λx), x·e^(λx)                  |
//! | Δ < 0        | α ± iβ, α = −b/2a, β = √(−Δ)/2a | e^(αx)·cos(βx), e^(αx)·sin(βx)    |
//!
//! The particular solution is −d/c for c ≠ 0, −d·x/b for c = 0 (equation reduces to first order
//! in u'), and −d·x²/2a when b = c = 0.
//!
//! C1 and C2 come from a 2x2 linear system, one row per boundary condition: the left one always
//! binds at x0, the right one at x1. With n the outward normal (−1 at x0, +1 at x1):
//! - Dirichlet: C1·φ1 + C2·φ2 = value − p
//! - Neumann:   a·n·(C1·φ1' + C2·φ2') = value − a·n·p'
//! - Robin:     a·n·(C1·φ1' + C2·φ2') + value·(C1·φ1 + C2·φ2) = −(a·n·p' + value·p)
use crate::numerical::FEM_1D::boundary_conditions::{BoundaryCondition, BoundaryPair, ConditionKind};
use crate::numerical::FEM_1D::equation::EquationSpec;
use crate::numerical::FEM_1D::fem_error::{FemError, FemResult};
use log::info;
use nalgebra::{Matrix2, Vector2};

/// relative size of det below which the 2x2 system is treated as singular
const SINGULARITY_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharacteristicRoots {
    Distinct(f64, f64),
    Repeated(f64),
    Complex { alpha: f64, beta: f64 },
}

impl CharacteristicRoots {
    pub fn of(spec: &EquationSpec) -> CharacteristicRoots {
        let (a, b) = (spec.a(), spec.b());
        let disc = spec.discriminant();
        if disc > 0.0 {
            let sqrt_disc = disc.sqrt();
            CharacteristicRoots::Distinct((-b + sqrt_disc) / (2.0 * a), (-b - sqrt_disc) / (2.0 * a))
        } else if disc == 0.0 {
            CharacteristicRoots::Repeated(-b / (2.0 * a))
        } else {
            CharacteristicRoots::Complex {
                alpha: -b / (2.0 * a),
                beta: (-disc).sqrt() / (2.0 * a.abs()),
            }
        }
    }

    /// value, first and second derivative of basis function `k` (0 or 1) at x
    pub fn basis(&self, k: usize, x: f64) -> (f64, f64, f64) {
        match *self {
            CharacteristicRoots::Distinct(l1, l2) => {
                let l = if k == 0 { l1 } else { l2 };
                let e = (l * x).exp();
                (e, l * e, l * l * e)
            }
            CharacteristicRoots::Repeated(l) => {
                let e = (l * x).exp();
                if k == 0 {
                    (e, l * e, l * l * e)
                } else {
                    (x * e, (1.0 + l * x) * e, (2.0 * l + l * l * x) * e)
                }
            }
            CharacteristicRoots::Complex { alpha, beta } => {
                let e = (alpha * x).exp();
                let (s, c) = (beta * x).sin_cos();
                let ab2 = alpha * alpha - beta * beta;
                if k == 0 {
                    (
                        e * c,
                        e * (alpha * c - beta * s),
                        e * (ab2 * c - 2.0 * alpha * beta * s),
                    )
                } else {
                    (
                        e * s,
                        e * (alpha * s + beta * c),
                        e * (ab2 * s + 2.0 * alpha * beta * c),
                    )
                }
            }
        }
    }
}

/// particular solution of a·u'' + b·u' + c·u + d = 0
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticularSolution {
    /// −d/c
    Constant(f64),
    /// −d·x/b, holds the slope
    Linear(f64),
    /// −d·x²/2a, holds the leading coefficient
    Quadratic(f64),
}

impl ParticularSolution {
    pub fn of(spec: &EquationSpec) -> ParticularSolution {
        if spec.c() != 0.0 {
            ParticularSolution::Constant(-spec.d() / spec.c())
        } else if spec.b() != 0.0 {
            ParticularSolution::Linear(-spec.d() / spec.b())
        } else {
            ParticularSolution::Quadratic(-spec.d() / (2.0 * spec.a()))
        }
    }

    pub fn value(&self, x: f64) -> f64 {
        match *self {
            ParticularSolution::Constant(k) => k,
            ParticularSolution::Linear(k) => k * x,
            ParticularSolution::Quadratic(k) => k * x * x,
        }
    }
    pub fn derivative(&self, x: f64) -> f64 {
        match *self {
            ParticularSolution::Constant(_) => 0.0,
            ParticularSolution::Linear(k) => k,
            ParticularSolution::Quadratic(k) => 2.0 * k * x,
        }
    }
    pub fn second_derivative(&self) -> f64 {
        match *self {
            ParticularSolution::Quadratic(k) => 2.0 * k,
            _ => 0.0,
        }
    }
}

/// u(x) = C1·φ1(x) + C2·φ2(x) + p(x), valid for every real x
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticalSolution {
    pub roots: CharacteristicRoots,
    pub constants: [f64; 2],
    pub particular: ParticularSolution,
}

impl AnalyticalSolution {
    fn combine(&self, x: f64) -> (f64, f64, f64) {
        let (v0, d0, dd0) = self.roots.basis(0, x);
        let (v1, d1, dd1) = self.roots.basis(1, x);
        let [c1, c2] = self.constants;
        (
            c1 * v0 + c2 * v1 + self.particular.value(x),
            c1 * d0 + c2 * d1 + self.particular.derivative(x),
            c1 * dd0 + c2 * dd1 + self.particular.second_derivative(),
        )
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.combine(x).0
    }
    pub fn derivative(&self, x: f64) -> f64 {
        self.combine(x).1
    }
    pub fn second_derivative(&self, x: f64) -> f64 {
        self.combine(x).2
    }

    /// a·u'' + b·u' + c·u + d at x, zero up to rounding
    pub fn residual(&self, spec: &EquationSpec, x: f64) -> f64 {
        let (u, du, ddu) = self.combine(x);
        spec.a() * ddu + spec.b() * du + spec.c() * u + spec.d()
    }

    pub fn as_fn(&self) -> impl Fn(f64) -> f64 + '_ {
        move |x| self.eval(x)
    }

    pub fn into_fn(self) -> impl Fn(f64) -> f64 {
        move |x| self.eval(x)
    }

    pub fn sample(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }
}

pub struct AnalyticalSolver;

impl AnalyticalSolver {
    pub fn solve(spec: &EquationSpec, boundaries: &BoundaryPair) -> FemResult<AnalyticalSolution> {
        let roots = CharacteristicRoots::of(spec);
        let particular = ParticularSolution::of(spec);
        info!(
            "discriminant = {}, roots: {:?}, particular solution: {:?}",
            spec.discriminant(),
            roots,
            particular
        );
        let (row0, rhs0) = condition_row(spec, &roots, &particular, boundaries.left(), spec.x0());
        let (row1, rhs1) = condition_row(spec, &roots, &particular, boundaries.right(), spec.x1());
        let matrix = Matrix2::new(row0[0], row0[1], row1[0], row1[1]);
        let rhs = Vector2::new(rhs0, rhs1);

        let scale = row0[0].hypot(row0[1]) * row1[0].hypot(row1[1]);
        let det = matrix.determinant();
        if !det.is_finite() || scale == 0.0 || det.abs() <= SINGULARITY_TOLERANCE * scale {
            return Err(FemError::SingularSystem(format!(
                "integration constants are not determined by the boundary conditions ({} at x0, {} at x1): det = {:e}",
                boundaries.left().kind,
                boundaries.right().kind,
                det
            )));
        }
        let constants = matrix.lu().solve(&rhs).ok_or_else(|| {
            FemError::SingularSystem("LU of the 2x2 system for integration constants failed".to_string())
        })?;
        info!("integration constants C1 = {}, C2 = {}", constants[0], constants[1]);
        Ok(AnalyticalSolution {
            roots,
            constants: [constants[0], constants[1]],
            particular,
        })
    }
}

fn condition_row(
    spec: &EquationSpec,
    roots: &CharacteristicRoots,
    particular: &ParticularSolution,
    condition: &BoundaryCondition,
    x: f64,
) -> ([f64; 2], f64) {
    let (v0, d0, _) = roots.basis(0, x);
    let (v1, d1, _) = roots.basis(1, x);
    let an = spec.a() * condition.normal();
    let (p, dp) = (particular.value(x), particular.derivative(x));
    let value = condition.value;
    match condition.kind {
        ConditionKind::Dirichlet => ([v0, v1], value - p),
        ConditionKind::Neumann => ([an * d0, an * d1], value - an * dp),
        ConditionKind::Robin => (
            [an * d0 + value * v0, an * d1 + value * v1],
            -(an * dp + value * p),
        ),
    }
}
