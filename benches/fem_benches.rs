use RustedFEM::numerical::FEM_1D::FEM_solver::FemSolver;
use RustedFEM::numerical::FEM_1D::boundary_conditions::ConditionSide::{Left, Right};
use RustedFEM::numerical::FEM_1D::boundary_conditions::{BoundaryCondition, BoundaryPair};
use RustedFEM::numerical::FEM_1D::equation::EquationSpec;
use RustedFEM::numerical::FEM_1D::mesh::ElementScheme;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn scenario_solver() -> FemSolver {
    let spec = EquationSpec::new(32.0, 9.0, 0.0, 23.0, -2.0, 7.0).unwrap();
    let bc = BoundaryPair::new(
        BoundaryCondition::robin(Left, 32.0),
        BoundaryCondition::dirichlet(Right, -5.0),
    )
    .unwrap();
    FemSolver::new(spec, bc)
}

fn bench_fem_solve(c: &mut Criterion) {
    let solver = scenario_solver();
    let mut group = c.benchmark_group("FEM solve");
    for n in [20usize, 40, 80] {
        for scheme in [ElementScheme::Linear, ElementScheme::Cubic] {
            group.bench_with_input(BenchmarkId::new(scheme.to_string(), n), &n, |b, &n| {
                b.iter(|| solver.solve(black_box(n), scheme).unwrap())
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_fem_solve);
criterion_main!(benches);
