use crate::numerical::FEM_1D::fem_error::{FemError, FemResult};

/// Coefficients of a·u'' + b·u' + c·u = d and the interval [x0, x1].
///
/// The forcing term enters the discrete problem with the load sign convention of the
/// finite element assembly, so both solvers actually treat the equation as
/// a·u'' + b·u' + c·u + d = 0. Values are checked once on construction and never change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquationSpec {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    x0: f64,
    x1: f64,
}

impl EquationSpec {
    pub fn new(a: f64, b: f64, c: f64, d: f64, x0: f64, x1: f64) -> FemResult<EquationSpec> {
        let all = [("a", a), ("b", b), ("c", c), ("d", d), ("x0", x0), ("x1", x1)];
        if let Some((name, value)) = all.iter().find(|(_, v)| !v.is_finite()) {
            return Err(FemError::InvalidEquation(format!(
                "{} must be finite, got {}",
                name, value
            )));
        }
        // a = 0 degenerates to a first order problem
        if a == 0.0 {
            return Err(FemError::InvalidEquation(
                "leading coefficient a must be non-zero".to_string(),
            ));
        }
        if x1 <= x0 {
            return Err(FemError::InvalidEquation(format!(
                "x1 = {} must be greater than x0 = {}",
                x1, x0
            )));
        }
        Ok(EquationSpec { a, b, c, d, x0, x1 })
    }

    pub fn a(&self) -> f64 {
        self.a
    }
    pub fn b(&self) -> f64 {
        self.b
    }
    pub fn c(&self) -> f64 {
        self.c
    }
    pub fn d(&self) -> f64 {
        self.d
    }
    pub fn x0(&self) -> f64 {
        self.x0
    }
    pub fn x1(&self) -> f64 {
        self.x1
    }
    pub fn length(&self) -> f64 {
        self.x1 - self.x0
    }
    /// b² − 4ac
    pub fn discriminant(&self) -> f64 {
        self.b * self.b - 4.0 * self.a * self.c
    }
}
