/// 1D finite element method for linear boundary value problems with constant coefficients
pub mod FEM_1D;
