//! Finite element solver for a·u'' + b·u' + c·u + d = 0 on a uniform mesh.
//!
//! One call of [`FemSolver::solve`] builds a fresh mesh, assembles the global system, applies
//! the left condition and then the right one, solves `A·u = −F` by SVD least squares and drops
//! the auxiliary unknowns introduced by Robin conditions. Nothing is cached between calls, so a
//! solver can be shared by the mesh search and by any number of independent solves.
use crate::numerical::FEM_1D::assembly::FemAssembler;
use crate::numerical::FEM_1D::boundary_conditions::BoundaryPair;
use crate::numerical::FEM_1D::equation::EquationSpec;
use crate::numerical::FEM_1D::fem_error::{FemError, FemResult};
use crate::numerical::FEM_1D::mesh::{ElementScheme, Mesh};
use crate::somelinalg::least_squares::{LeastSquaresFailure, svd_solve};
use log::{error, info};
use std::time::Instant;

/// nodal values on the mesh they were computed on
#[derive(Debug, Clone, PartialEq)]
pub struct FemSolution {
    pub scheme: ElementScheme,
    pub element_count: usize,
    pub mesh: Vec<f64>,
    pub values: Vec<f64>,
}

impl FemSolution {
    pub fn mesh(&self) -> &[f64] {
        &self.mesh
    }
    pub fn values(&self) -> &[f64] {
        &self.values
    }
    /// (x, u) pairs
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.mesh.iter().copied().zip(self.values.iter().copied())
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct FemSolver {
    spec: EquationSpec,
    boundaries: BoundaryPair,
}

impl FemSolver {
    pub fn new(spec: EquationSpec, boundaries: BoundaryPair) -> FemSolver {
        FemSolver { spec, boundaries }
    }

    pub fn spec(&self) -> &EquationSpec {
        &self.spec
    }
    pub fn boundaries(&self) -> &BoundaryPair {
        &self.boundaries
    }

    pub fn solve(&self, element_count: usize, scheme: ElementScheme) -> FemResult<FemSolution> {
        let begin = Instant::now();
        let (mesh, system) = FemAssembler::new(&self.spec, scheme).build(element_count)?;
        let system = self.boundaries.apply(system);
        info!(
            "system of {} equations ({} auxiliary unknowns) after boundary conditions",
            system.dim(),
            system.offset.total()
        );
        let rhs = -&system.vector;
        let full = svd_solve(system.matrix.clone(), &rhs).map_err(|failure| {
            error!("{} FEM system with {} elements: {}", scheme, element_count, failure);
            match failure {
                LeastSquaresFailure::RankDeficient { .. } => FemError::SingularSystem(format!(
                    "{} elements, {} at x0, {} at x1: {}",
                    element_count,
                    self.boundaries.left().kind,
                    self.boundaries.right().kind,
                    failure
                )),
                LeastSquaresFailure::Decomposition(msg) => FemError::SingularSystem(msg),
            }
        })?;
        let values = system.extract_physical(&full);
        info!(
            "{} solution with {} elements found in {} ms",
            scheme,
            element_count,
            begin.elapsed().as_millis()
        );
        Ok(Self::pack(mesh, values))
    }

    pub fn solve_linear(&self, element_count: usize) -> FemResult<FemSolution> {
        self.solve(element_count, ElementScheme::Linear)
    }

    pub fn solve_cubic(&self, element_count: usize) -> FemResult<FemSolution> {
        self.solve(element_count, ElementScheme::Cubic)
    }

    fn pack(mesh: Mesh, values: Vec<f64>) -> FemSolution {
        let scheme = mesh.scheme();
        let element_count = mesh.element_count();
        FemSolution {
            scheme,
            element_count,
            mesh: mesh.into_nodes(),
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::FEM_1D::boundary_conditions::BoundaryCondition;
    use crate::numerical::FEM_1D::boundary_conditions::ConditionSide::{Left, Right};
    use approx::assert_relative_eq;
    use strum::IntoEnumIterator;

    fn dirichlet_solver(a: f64, b: f64, c: f64, d: f64, u0: f64, u1: f64) -> FemSolver {
        let spec = EquationSpec::new(a, b, c, d, 0.0, 1.0).unwrap();
        let bc = BoundaryPair::new(
            BoundaryCondition::dirichlet(Left, u0),
            BoundaryCondition::dirichlet(Right, u1),
        )
        .unwrap();
        FemSolver::new(spec, bc)
    }

    #[test]
    fn test_dirichlet_values_are_reproduced() {
        let solver = dirichlet_solver(1.0, 2.0, -3.0, 4.0, 1.5, -2.5);
        for scheme in ElementScheme::iter() {
            let sol = solver.solve(7, scheme).unwrap();
            assert_eq!(sol.len(), scheme.node_count(7));
            assert_eq!(sol.mesh().len(), sol.values().len());
            assert_relative_eq!(sol.values()[0], 1.5, epsilon = 1e-12);
            assert_relative_eq!(sol.values()[sol.len() - 1], -2.5, epsilon = 1e-12);
            assert_eq!(sol.element_count, 7);
            assert_eq!(sol.scheme, scheme);
        }
    }

    #[test]
    fn test_pure_diffusion_is_exact_at_nodes() {
        let solver = dirichlet_solver(1.0, 0.0, 0.0, 0.0, 1.0, 3.0);
        for scheme in ElementScheme::iter() {
            let sol = solver.solve(5, scheme).unwrap();
            for (x, u) in sol.points() {
                assert_relative_eq!(u, 1.0 + 2.0 * x, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_constant_load_parabola() {
        // u'' + 2 = 0, u(0) = u(1) = 0  ->  u = x(1 − x); linear FEM is nodally exact in 1D
        let solver = dirichlet_solver(1.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let sol = solver.solve_linear(8).unwrap();
        for (x, u) in sol.points() {
            assert_relative_eq!(u, x * (1.0 - x), epsilon = 1e-12);
        }
        let sol = solver.solve_cubic(2).unwrap();
        for (x, u) in sol.points() {
            assert_relative_eq!(u, x * (1.0 - x), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_elements_rejected() {
        let solver = dirichlet_solver(1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        assert!(matches!(solver.solve_linear(0), Err(FemError::InvalidElementCount)));
    }

    #[test]
    fn test_floating_solution_is_singular() {
        // only derivatives prescribed and no reaction term: u is defined up to a constant
        let spec = EquationSpec::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0).unwrap();
        let bc = BoundaryPair::new(
            BoundaryCondition::neumann(Left, 0.0),
            BoundaryCondition::neumann(Right, 0.0),
        )
        .unwrap();
        let solver = FemSolver::new(spec, bc);
        assert!(matches!(solver.solve_linear(6), Err(FemError::SingularSystem(_))));
    }

    #[test]
    fn test_robin_both_sides_length() {
        let spec = EquationSpec::new(1.0, 0.0, -1.0, 1.0, 0.0, 1.0).unwrap();
        let bc = BoundaryPair::new(
            BoundaryCondition::robin(Right, 2.0),
            BoundaryCondition::robin(Left, 1.0),
        )
        .unwrap();
        let solver = FemSolver::new(spec, bc);
        for scheme in ElementScheme::iter() {
            let sol = solver.solve(10, scheme).unwrap();
            assert_eq!(sol.len(), scheme.node_count(10));
            assert!(sol.values().iter().all(|v| v.is_finite()));
        }
    }
}
