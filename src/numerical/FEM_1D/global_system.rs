use nalgebra::{DMatrix, DVector};

/// Number of auxiliary unknowns placed before and after the physical nodes.
/// Every Robin condition adds one on its own side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuxiliaryOffset {
    pub leading: usize,
    pub trailing: usize,
}

impl AuxiliaryOffset {
    pub fn total(&self) -> usize {
        self.leading + self.trailing
    }
}

/// Discretized weak form `matrix · u = −vector` before and after the boundary conditions.
#[derive(Debug, Clone)]
pub struct GlobalSystem {
    pub matrix: DMatrix<f64>,
    pub vector: DVector<f64>,
    pub offset: AuxiliaryOffset,
}

impl GlobalSystem {
    pub fn new(matrix: DMatrix<f64>, vector: DVector<f64>) -> GlobalSystem {
        assert_eq!(
            matrix.nrows(),
            vector.len(),
            "matrix rows and vector length must agree"
        );
        GlobalSystem {
            matrix,
            vector,
            offset: AuxiliaryOffset::default(),
        }
    }

    pub fn dim(&self) -> usize {
        self.vector.len()
    }

    /// number of mesh nodes represented in the system
    pub fn n_physical(&self) -> usize {
        self.dim() - self.offset.total()
    }

    /// row/column of the node at x0
    pub fn first_node(&self) -> usize {
        self.offset.leading
    }

    /// row/column of the node at x1
    pub fn last_node(&self) -> usize {
        self.offset.leading + self.n_physical() - 1
    }

    /// drops the auxiliary unknowns from a solution of the full system
    pub fn extract_physical(&self, full: &DVector<f64>) -> Vec<f64> {
        full.as_slice()[self.offset.leading..self.offset.leading + self.n_physical()].to_vec()
    }
}
