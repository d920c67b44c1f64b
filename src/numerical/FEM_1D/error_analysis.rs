//! Pointwise errors of FEM solutions against the closed form solution, linear/cubic comparison
//! and search for the element count that gives a prescribed maximum relative error.
use crate::numerical::FEM_1D::FEM_solver::{FemSolution, FemSolver};
use crate::numerical::FEM_1D::fem_error::{FemError, FemResult};
use crate::numerical::FEM_1D::mesh::ElementScheme;
use log::{info, warn};

/// |u_a(x) − u_h(x)| / |u_a(x)| at every node, NaN where u_a(x) is exactly zero
pub fn relative_error<F>(analytical: F, solution: &FemSolution) -> Vec<f64>
where
    F: Fn(f64) -> f64,
{
    solution
        .points()
        .map(|(x, u)| {
            let exact = analytical(x);
            if exact == 0.0 {
                f64::NAN
            } else {
                ((exact - u) / exact).abs()
            }
        })
        .collect()
}

pub fn absolute_error<F>(analytical: F, solution: &FemSolution) -> Vec<f64>
where
    F: Fn(f64) -> f64,
{
    solution
        .points()
        .map(|(x, u)| (analytical(x) - u).abs())
        .collect()
}

/// largest entry ignoring NaN, NaN when there is nothing else
pub fn max_relative_error(errors: &[f64]) -> f64 {
    errors
        .iter()
        .copied()
        .filter(|e| !e.is_nan())
        .fold(f64::NAN, f64::max)
}

pub fn max_absolute_error<F>(analytical: F, solution: &FemSolution) -> f64
where
    F: Fn(f64) -> f64,
{
    absolute_error(analytical, solution)
        .into_iter()
        .fold(f64::NAN, f64::max)
}

/// one node of the linear mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonRow {
    pub x: f64,
    pub analytical: f64,
    pub linear: f64,
    pub linear_error: f64,
    pub cubic: f64,
    pub cubic_error: f64,
    /// |linear_error − cubic_error|
    pub error_gap: f64,
}

/// Linear and cubic solutions side by side on the nodes of the linear mesh. Both meshes share
/// the element boundaries, so the cubic values are taken from every third cubic node.
pub fn comparison_table<F>(
    analytical: F,
    linear: &FemSolution,
    cubic: &FemSolution,
) -> FemResult<Vec<ComparisonRow>>
where
    F: Fn(f64) -> f64,
{
    if linear.scheme != ElementScheme::Linear || cubic.scheme != ElementScheme::Cubic {
        return Err(FemError::MeshMismatch(format!(
            "expected linear and cubic solutions, got {} and {}",
            linear.scheme, cubic.scheme
        )));
    }
    if linear.element_count != cubic.element_count {
        return Err(FemError::MeshMismatch(format!(
            "linear solution has {} elements, cubic one has {}",
            linear.element_count, cubic.element_count
        )));
    }
    let stride = ElementScheme::Cubic.stride();
    let rows = linear
        .points()
        .zip(cubic.points().step_by(stride))
        .map(|((x, lin), (_, cub))| {
            let exact = analytical(x);
            let rel = |u: f64| {
                if exact == 0.0 {
                    f64::NAN
                } else {
                    ((exact - u) / exact).abs()
                }
            };
            let (linear_error, cubic_error) = (rel(lin), rel(cub));
            ComparisonRow {
                x,
                analytical: exact,
                linear: lin,
                linear_error,
                cubic: cub,
                cubic_error,
                error_gap: (linear_error - cubic_error).abs(),
            }
        })
        .collect();
    Ok(rows)
}

/// Sequential scan over element counts with the linear scheme.
#[derive(Debug, Clone, Copy)]
pub struct MeshSearch {
    pub lower_bound: usize,
}

impl Default for MeshSearch {
    fn default() -> Self {
        MeshSearch { lower_bound: 20 }
    }
}

impl MeshSearch {
    pub fn new(lower_bound: usize) -> MeshSearch {
        MeshSearch { lower_bound }
    }

    /// first element count in `lower_bound..search_limit` whose max relative error is within
    /// `tolerance` of `target`
    pub fn minimum_elements_for_error<F>(
        &self,
        solver: &FemSolver,
        target: f64,
        analytical: F,
        tolerance: f64,
        search_limit: usize,
    ) -> FemResult<usize>
    where
        F: Fn(f64) -> f64,
    {
        let lower_bound = self.lower_bound.max(1);
        info!(
            "searching element count in {}..{} for max relative error {} ± {}",
            lower_bound, search_limit, target, tolerance
        );
        for n in lower_bound..search_limit {
            let solution = solver.solve_linear(n)?;
            let max_rel = max_relative_error(&relative_error(&analytical, &solution));
            if (max_rel - target).abs() <= tolerance {
                info!("{} elements give max relative error {:e}", n, max_rel);
                return Ok(n);
            }
        }
        warn!("element count search exhausted at {}", search_limit);
        Err(FemError::SearchExhausted {
            target,
            tolerance,
            lower_bound,
            search_limit,
        })
    }
}
