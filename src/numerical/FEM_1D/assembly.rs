//! Assembly of the global system from element contributions.
//!
//! Element matrices are pushed as triplets into a COO matrix, duplicate entries at the nodes
//! shared by neighbouring elements are summed when it is converted to the dense matrix used by
//! the least squares solver. Load vectors are scattered the same way.
use crate::numerical::FEM_1D::equation::EquationSpec;
use crate::numerical::FEM_1D::fem_error::FemResult;
use crate::numerical::FEM_1D::global_system::GlobalSystem;
use crate::numerical::FEM_1D::local_matrices::{local_load, local_matrix};
use crate::numerical::FEM_1D::mesh::{ElementScheme, Mesh};
use log::info;
use nalgebra::DVector;
use nalgebra_sparse::convert::serial::convert_coo_dense;
use nalgebra_sparse::CooMatrix;

pub struct FemAssembler<'a> {
    spec: &'a EquationSpec,
    scheme: ElementScheme,
}

impl<'a> FemAssembler<'a> {
    pub fn new(spec: &'a EquationSpec, scheme: ElementScheme) -> FemAssembler<'a> {
        FemAssembler { spec, scheme }
    }

    pub fn linear(spec: &'a EquationSpec) -> FemAssembler<'a> {
        FemAssembler::new(spec, ElementScheme::Linear)
    }

    pub fn cubic(spec: &'a EquationSpec) -> FemAssembler<'a> {
        FemAssembler::new(spec, ElementScheme::Cubic)
    }

    /// fresh uniform mesh and the system assembled on it
    pub fn build(&self, element_count: usize) -> FemResult<(Mesh, GlobalSystem)> {
        let mesh = Mesh::uniform(self.spec, element_count, self.scheme)?;
        let stiffness = self.stiffness_matrix(&mesh);
        let load = self.load_vector(&mesh);
        info!(
            "{} elements assembled: {} elements, {} nodes, {} triplets",
            self.scheme,
            mesh.element_count(),
            mesh.len(),
            stiffness.nnz()
        );
        let system = GlobalSystem::new(convert_coo_dense(&stiffness), load);
        Ok((mesh, system))
    }

    pub fn stiffness_matrix(&self, mesh: &Mesh) -> CooMatrix<f64> {
        let n = mesh.len();
        let p = self.scheme.nodes_per_element();
        let mut coo = CooMatrix::new(n, n);
        for e in 0..mesh.element_count() {
            let start = mesh.element_start(e);
            let local = local_matrix(self.spec, self.scheme, mesh.element_length(e));
            for i in 0..p {
                for j in 0..p {
                    coo.push(start + i, start + j, local[(i, j)]);
                }
            }
        }
        coo
    }

    pub fn load_vector(&self, mesh: &Mesh) -> DVector<f64> {
        let mut load = DVector::zeros(mesh.len());
        for e in 0..mesh.element_count() {
            let start = mesh.element_start(e);
            let local = local_load(self.spec.d(), self.scheme, mesh.element_length(e));
            for (i, value) in local.iter().enumerate() {
                load[start + i] += value;
            }
        }
        load
    }
}
