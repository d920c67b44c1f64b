use crate::numerical::FEM_1D::equation::EquationSpec;
use crate::numerical::FEM_1D::fem_error::{FemError, FemResult};
use strum_macros::{Display, EnumIter, EnumString};

/// Lagrange elements supported by the assembler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ElementScheme {
    /// 2 nodes per element
    #[strum(to_string = "linear", serialize = "lin")]
    Linear,
    /// 4 nodes per element at 0, L/3, 2L/3, L
    #[strum(to_string = "cubic", serialize = "cub")]
    Cubic,
}

impl ElementScheme {
    pub fn nodes_per_element(&self) -> usize {
        match self {
            ElementScheme::Linear => 2,
            ElementScheme::Cubic => 4,
        }
    }
    /// global index step between the first nodes of neighbouring elements
    pub fn stride(&self) -> usize {
        self.nodes_per_element() - 1
    }
    pub fn node_count(&self, element_count: usize) -> usize {
        self.stride() * element_count + 1
    }
}

/// Uniform mesh of [x0, x1]. Neighbouring elements share their end nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    nodes: Vec<f64>,
    element_count: usize,
    scheme: ElementScheme,
}

impl Mesh {
    pub fn uniform(
        spec: &EquationSpec,
        element_count: usize,
        scheme: ElementScheme,
    ) -> FemResult<Mesh> {
        if element_count == 0 {
            return Err(FemError::InvalidElementCount);
        }
        let n_nodes = scheme.node_count(element_count);
        let h = spec.length() / (n_nodes - 1) as f64;
        let mut nodes: Vec<f64> = (0..n_nodes).map(|i| spec.x0() + i as f64 * h).collect();
        // pin the end exactly, accumulated rounding must not move it
        nodes[n_nodes - 1] = spec.x1();
        Ok(Mesh {
            nodes,
            element_count,
            scheme,
        })
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }
    pub fn into_nodes(self) -> Vec<f64> {
        self.nodes
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    pub fn element_count(&self) -> usize {
        self.element_count
    }
    pub fn scheme(&self) -> ElementScheme {
        self.scheme
    }

    /// global index of the first local node of element `e`
    pub fn element_start(&self, e: usize) -> usize {
        e * self.scheme.stride()
    }

    pub fn element_length(&self, e: usize) -> f64 {
        let start = self.element_start(e);
        self.nodes[start + self.scheme.stride()] - self.nodes[start]
    }
}
