//! Linear second order ODE a·u'' + b·u' + c·u = d with constant coefficients on [x0, x1]:
//! closed form solution, finite element solutions with linear and cubic Lagrange elements,
//! error analysis and task files.
/// analytical solution through the characteristic equation
pub mod analytical;
/// element contributions scattered into the global system
pub mod assembly;
/// Dirichlet, Neumann and Robin conditions acting on the global system
pub mod boundary_conditions;
/// coefficients and interval
pub mod equation;
/// pointwise errors, linear/cubic comparison and element count search
pub mod error_analysis;
pub mod fem_error;
pub mod global_system;
pub mod local_matrices;
pub mod mesh;
/// solver: mesh, assembly, boundary conditions, least squares solve
pub mod FEM_solver;
/// parse task files into FEM runs
pub mod task_parser_fem;
