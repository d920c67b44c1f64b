//! # Boundary conditions
//!
//! One condition per end of the interval. Every condition knows how to enforce itself on the
//! assembled [`GlobalSystem`] `A·u = −f`:
//! - **Dirichlet** (first kind): `u = value`. Boundary row is replaced by the unit row,
//!   right hand side entry becomes `−value`.
//! - **Neumann** (second kind): `a·du/dn = value`. Natural condition, `value` is added to the
//!   boundary entry of the right hand side, the matrix is untouched.
//! - **Robin** (third kind): `a·du/dn + value·u = 0`. The system grows by one auxiliary
//!   unknown `w` with the extra equation `w − u_boundary = 0`, and `−value·w` is coupled into
//!   the equation of the boundary node.
//!
//! Robin conditions rebuild a larger system instead of eliminating a degree of freedom, so the
//! size change is recorded in [`AuxiliaryOffset`] and later used to cut the physical part out of
//! the solution. Rows and columns are always located through the offset, so conditions on the
//! left and on the right never touch each other's block whatever order they are applied in.
use crate::numerical::FEM_1D::fem_error::{FemError, FemResult};
use crate::numerical::FEM_1D::global_system::GlobalSystem;
use log::info;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ConditionSide {
    #[strum(to_string = "left", serialize = "start")]
    Left,
    #[strum(to_string = "right", serialize = "end")]
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ConditionKind {
    #[strum(to_string = "dirichlet", serialize = "first", serialize = "value")]
    Dirichlet,
    #[strum(to_string = "neumann", serialize = "second", serialize = "derivative")]
    Neumann,
    #[strum(to_string = "robin", serialize = "third", serialize = "mixed")]
    Robin,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryCondition {
    pub side: ConditionSide,
    pub kind: ConditionKind,
    pub value: f64,
}

impl BoundaryCondition {
    pub fn new(side: ConditionSide, kind: ConditionKind, value: f64) -> BoundaryCondition {
        BoundaryCondition { side, kind, value }
    }
    pub fn dirichlet(side: ConditionSide, value: f64) -> BoundaryCondition {
        BoundaryCondition::new(side, ConditionKind::Dirichlet, value)
    }
    pub fn neumann(side: ConditionSide, value: f64) -> BoundaryCondition {
        BoundaryCondition::new(side, ConditionKind::Neumann, value)
    }
    pub fn robin(side: ConditionSide, value: f64) -> BoundaryCondition {
        BoundaryCondition::new(side, ConditionKind::Robin, value)
    }

    pub fn is_robin(&self) -> bool {
        self.kind == ConditionKind::Robin
    }

    /// outward normal of the end the condition is attached to
    pub fn normal(&self) -> f64 {
        match self.side {
            ConditionSide::Left => -1.0,
            ConditionSide::Right => 1.0,
        }
    }

    /// enforce the condition; Robin returns a system one row and one column larger
    pub fn apply(&self, system: GlobalSystem) -> GlobalSystem {
        match self.kind {
            ConditionKind::Dirichlet => self.apply_dirichlet(system),
            ConditionKind::Neumann => self.apply_neumann(system),
            ConditionKind::Robin => self.apply_robin(system),
        }
    }

    fn boundary_index(&self, system: &GlobalSystem) -> usize {
        match self.side {
            ConditionSide::Left => system.first_node(),
            ConditionSide::Right => system.last_node(),
        }
    }

    fn apply_dirichlet(&self, mut system: GlobalSystem) -> GlobalSystem {
        let i = self.boundary_index(&system);
        system.matrix.row_mut(i).fill(0.0);
        system.matrix[(i, i)] = 1.0;
        system.vector[i] = -self.value;
        system
    }

    fn apply_neumann(&self, mut system: GlobalSystem) -> GlobalSystem {
        let i = self.boundary_index(&system);
        system.vector[i] += self.value;
        system
    }

    fn apply_robin(&self, system: GlobalSystem) -> GlobalSystem {
        let GlobalSystem {
            matrix,
            vector,
            mut offset,
        } = system;
        let n = vector.len();
        let (matrix, vector) = match self.side {
            ConditionSide::Left => {
                // auxiliary unknown becomes index 0, the physical first node moves one step right
                let boundary = offset.leading + 1;
                let mut matrix = matrix.insert_column(0, 0.0).insert_row(0, 0.0);
                matrix[(0, 0)] = 1.0;
                matrix[(0, boundary)] = -1.0;
                matrix[(boundary, 0)] = -self.value;
                offset.leading += 1;
                (matrix, vector.insert_row(0, 0.0))
            }
            ConditionSide::Right => {
                // auxiliary unknown is appended after everything else
                let boundary = n - offset.trailing - 1;
                let mut matrix = matrix.insert_column(n, 0.0).insert_row(n, 0.0);
                matrix[(n, boundary)] = -1.0;
                matrix[(n, n)] = 1.0;
                matrix[(boundary, n)] = -self.value;
                offset.trailing += 1;
                (matrix, vector.insert_row(n, 0.0))
            }
        };
        info!(
            "Robin condition on the {} side: system grew to {}x{}",
            self.side,
            matrix.nrows(),
            matrix.ncols()
        );
        GlobalSystem {
            matrix,
            vector,
            offset,
        }
    }
}

/// Exactly one condition for each end of the interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryPair {
    left: BoundaryCondition,
    right: BoundaryCondition,
}

impl BoundaryPair {
    /// conditions may come in any order, but not both for the same side
    pub fn new(first: BoundaryCondition, second: BoundaryCondition) -> FemResult<BoundaryPair> {
        match (first.side, second.side) {
            (ConditionSide::Left, ConditionSide::Right) => Ok(BoundaryPair {
                left: first,
                right: second,
            }),
            (ConditionSide::Right, ConditionSide::Left) => Ok(BoundaryPair {
                left: second,
                right: first,
            }),
            (side, _) => Err(FemError::InvalidBoundarySide(format!(
                "both conditions are given for the {} side",
                side
            ))),
        }
    }

    pub fn left(&self) -> &BoundaryCondition {
        &self.left
    }
    pub fn right(&self) -> &BoundaryCondition {
        &self.right
    }

    /// left first, then right
    pub fn apply(&self, system: GlobalSystem) -> GlobalSystem {
        let system = self.left.apply(system);
        self.right.apply(system)
    }
}
