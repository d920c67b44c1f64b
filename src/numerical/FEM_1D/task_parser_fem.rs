//! # FEM task files
//!
//! Maps a task document (see [`crate::Utils::task_parser`]) onto an equation, its boundary
//! conditions and the runs to perform. Sections:
//!
//! - `equation`: `a`, `b`, `c`, `d`, `x0`, `x1` (all required)
//! - `left`, `right`: `kind` (dirichlet/first, neumann/second, robin/third/mixed) and `value`
//! - `solver` (optional): `elements` list (default 20), `scheme` list (default linear, cubic),
//!   `loglevel`, `save_log`
//! - `search` (optional): `target`, `tolerance`, `limit` (default 200), `lower_bound` (default 20)
//!
//! Every combination of element count and scheme is solved and compared with the closed form
//! solution. When both schemes are requested the linear/cubic comparison table is built for
//! every element count.
use crate::Utils::logger::{elapsed_time, statistics_table};
use crate::Utils::task_parser::{DocumentMap, SectionMap, Value, parse_document_as};
use crate::numerical::FEM_1D::FEM_solver::{FemSolution, FemSolver};
use crate::numerical::FEM_1D::analytical::{AnalyticalSolution, AnalyticalSolver};
use crate::numerical::FEM_1D::boundary_conditions::{
    BoundaryCondition, BoundaryPair, ConditionKind, ConditionSide,
};
use crate::numerical::FEM_1D::equation::EquationSpec;
use crate::numerical::FEM_1D::error_analysis::{
    ComparisonRow, MeshSearch, comparison_table, max_absolute_error, max_relative_error,
    relative_error,
};
use crate::numerical::FEM_1D::fem_error::{FemError, FemResult};
use crate::numerical::FEM_1D::mesh::ElementScheme;
use log::info;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

const TEMPLATE: &str = r#"// coefficients of a*u'' + b*u' + c*u = d on [x0, x1]
equation
 a: 32 b: 9 c: 0 d: 23
 x0: -2 x1: 7
// kind: dirichlet (u = value), neumann (a*du/dn = value), robin (a*du/dn + value*u = 0)
left
 kind: robin value: 32
right
 kind: dirichlet value: -5
solver
 elements: 20, 40
 scheme: linear, cubic
 loglevel: info
 save_log: false
// smallest element count (linear elements) with max relative error within tolerance of target
search
 target: 0.01 tolerance: 0.001 limit: 200
"#;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSettings {
    pub target: f64,
    pub tolerance: f64,
    pub limit: usize,
    pub lower_bound: usize,
}

#[derive(Debug, Clone)]
pub struct FemTask {
    pub spec: EquationSpec,
    pub boundaries: BoundaryPair,
    pub elements: Vec<usize>,
    pub schemes: Vec<ElementScheme>,
    pub loglevel: Option<String>,
    pub save_log: bool,
    pub search: Option<SearchSettings>,
}

/// one solve
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub solution: FemSolution,
    pub max_relative_error: f64,
    pub max_absolute_error: f64,
}

#[derive(Debug, Clone)]
pub struct TaskReport {
    pub analytical: AnalyticalSolution,
    pub runs: Vec<RunSummary>,
    /// element count and its comparison table
    pub comparisons: Vec<(usize, Vec<ComparisonRow>)>,
    pub search_result: Option<usize>,
    pub statistics: HashMap<String, String>,
}

impl TaskReport {
    pub fn run_for(&self, scheme: ElementScheme, element_count: usize) -> Option<&RunSummary> {
        self.runs.iter().find(|r| {
            r.solution.scheme == scheme && r.solution.element_count == element_count
        })
    }
}

fn template_map() -> DocumentMap {
    let sections: [(&str, &[&str]); 5] = [
        ("equation", &["a", "b", "c", "d", "x0", "x1"]),
        ("left", &["kind", "value"]),
        ("right", &["kind", "value"]),
        ("solver", &["elements", "scheme", "loglevel", "save_log"]),
        ("search", &["target", "tolerance", "limit", "lower_bound"]),
    ];
    sections
        .iter()
        .map(|(title, keys)| {
            let section: SectionMap = keys.iter().map(|k| (k.to_string(), None)).collect();
            (title.to_string(), section)
        })
        .collect()
}

fn missing(title: &str, key: &str) -> FemError {
    FemError::TaskParse(format!("section '{}' requires key '{}'", title, key))
}

fn section<'a>(doc: &'a DocumentMap, title: &str) -> FemResult<&'a SectionMap> {
    doc.get(title)
        .ok_or_else(|| FemError::TaskParse(format!("section '{}' not found", title)))
}

/// first value of a key, None when the key is absent or has no values
fn first<'a>(section: &'a SectionMap, key: &str) -> Option<&'a Value> {
    section.get(key).and_then(|v| v.as_ref()).and_then(|v| v.first())
}

fn optional_float(section: &SectionMap, title: &str, key: &str) -> FemResult<Option<f64>> {
    match first(section, key) {
        None => Ok(None),
        Some(value) => value.as_float().map(Some).ok_or_else(|| {
            FemError::TaskParse(format!("{}.{} must be a number, got '{}'", title, key, value))
        }),
    }
}

fn required_float(section: &SectionMap, title: &str, key: &str) -> FemResult<f64> {
    optional_float(section, title, key)?.ok_or_else(|| missing(title, key))
}

fn optional_count(section: &SectionMap, title: &str, key: &str) -> FemResult<Option<usize>> {
    match first(section, key) {
        None => Ok(None),
        Some(value) => match value.as_integer() {
            Some(i) if i >= 0 => Ok(Some(i as usize)),
            _ => Err(FemError::TaskParse(format!(
                "{}.{} must be a non negative integer, got '{}'",
                title, key, value
            ))),
        },
    }
}

fn condition(doc: &DocumentMap, side: ConditionSide) -> FemResult<BoundaryCondition> {
    let title = side.to_string();
    let section = section(doc, &title)?;
    let kind = match first(section, "kind") {
        Some(Value::String(s)) => ConditionKind::from_str(s).map_err(|_| {
            FemError::TaskParse(format!("unknown boundary condition kind '{}'", s))
        })?,
        Some(other) => {
            return Err(FemError::TaskParse(format!(
                "{}.kind must be a name, got '{}'",
                title, other
            )));
        }
        None => return Err(missing(&title, "kind")),
    };
    let value = required_float(section, &title, "value")?;
    Ok(BoundaryCondition::new(side, kind, value))
}

impl FemTask {
    pub fn from_file(path: &Path) -> FemResult<FemTask> {
        let contents = fs::read_to_string(path)?;
        FemTask::from_str(&contents)
    }

    fn from_document(doc: &DocumentMap) -> FemResult<FemTask> {
        let eq = section(doc, "equation")?;
        let coeff = |key: &str| required_float(eq, "equation", key);
        let spec = EquationSpec::new(
            coeff("a")?,
            coeff("b")?,
            coeff("c")?,
            coeff("d")?,
            coeff("x0")?,
            coeff("x1")?,
        )?;
        let boundaries = BoundaryPair::new(
            condition(doc, ConditionSide::Left)?,
            condition(doc, ConditionSide::Right)?,
        )?;

        let solver = section(doc, "solver")?;
        let elements = match solver.get("elements").and_then(|v| v.as_ref()) {
            None => vec![20],
            Some(values) => values
                .iter()
                .map(|v| match v.as_integer() {
                    Some(n) if n > 0 => Ok(n as usize),
                    _ => Err(FemError::TaskParse(format!(
                        "solver.elements must be positive integers, got '{}'",
                        v
                    ))),
                })
                .collect::<FemResult<Vec<usize>>>()?,
        };
        let schemes = match solver.get("scheme").and_then(|v| v.as_ref()) {
            None => vec![ElementScheme::Linear, ElementScheme::Cubic],
            Some(values) => values
                .iter()
                .map(|v| {
                    ElementScheme::from_str(&v.to_string())
                        .map_err(|_| FemError::TaskParse(format!("unknown scheme '{}'", v)))
                })
                .collect::<FemResult<Vec<ElementScheme>>>()?,
        };
        let loglevel = first(solver, "loglevel").map(|v| v.to_string());
        let save_log = match first(solver, "save_log") {
            None => false,
            Some(v) => v.as_boolean().ok_or_else(|| {
                FemError::TaskParse(format!("solver.save_log must be true or false, got '{}'", v))
            })?,
        };

        let search_section = section(doc, "search")?;
        let search = if search_section.values().all(|v| v.is_none()) {
            None
        } else {
            Some(SearchSettings {
                target: required_float(search_section, "search", "target")?,
                tolerance: required_float(search_section, "search", "tolerance")?,
                limit: optional_count(search_section, "search", "limit")?.unwrap_or(200),
                lower_bound: optional_count(search_section, "search", "lower_bound")?
                    .unwrap_or(MeshSearch::default().lower_bound),
            })
        };
        Ok(FemTask {
            spec,
            boundaries,
            elements,
            schemes,
            loglevel,
            save_log,
            search,
        })
    }

    pub fn solver(&self) -> FemSolver {
        FemSolver::new(self.spec, self.boundaries)
    }

    pub fn run(&self) -> FemResult<TaskReport> {
        let begin = Instant::now();
        let analytical = AnalyticalSolver::solve(&self.spec, &self.boundaries)?;
        let solver = self.solver();
        let mut statistics = HashMap::new();

        let mut runs = Vec::new();
        for &n in &self.elements {
            for &scheme in &self.schemes {
                let solution = solver.solve(n, scheme)?;
                let max_rel = max_relative_error(&relative_error(analytical.as_fn(), &solution));
                let max_abs = max_absolute_error(analytical.as_fn(), &solution);
                info!(
                    "{} elements, {} scheme: max relative error {:.3e}, max absolute error {:.3e}",
                    n, scheme, max_rel, max_abs
                );
                statistics.insert(
                    format!("{} x {}: max rel / abs error", scheme, n),
                    format!("{:.3e} / {:.3e}", max_rel, max_abs),
                );
                runs.push(RunSummary {
                    solution,
                    max_relative_error: max_rel,
                    max_absolute_error: max_abs,
                });
            }
        }

        let mut comparisons = Vec::new();
        for &n in &self.elements {
            let linear = runs.iter().find(|r| {
                r.solution.scheme == ElementScheme::Linear && r.solution.element_count == n
            });
            let cubic = runs.iter().find(|r| {
                r.solution.scheme == ElementScheme::Cubic && r.solution.element_count == n
            });
            if let (Some(linear), Some(cubic)) = (linear, cubic) {
                let rows = comparison_table(analytical.as_fn(), &linear.solution, &cubic.solution)?;
                comparisons.push((n, rows));
            }
        }

        let search_result = match &self.search {
            None => None,
            Some(settings) => {
                let found = MeshSearch::new(settings.lower_bound).minimum_elements_for_error(
                    &solver,
                    settings.target,
                    analytical.as_fn(),
                    settings.tolerance,
                    settings.limit,
                )?;
                statistics.insert("elements found by search".to_string(), found.to_string());
                Some(found)
            }
        };

        let (unit, time) = elapsed_time(begin.elapsed());
        statistics.insert("time elapsed".to_string(), format!("{}{}", time, unit));
        statistics.insert("discriminant".to_string(), self.spec.discriminant().to_string());
        info!("\n \n CALC STATISTICS \n \n {}", statistics_table(&statistics));
        Ok(TaskReport {
            analytical,
            runs,
            comparisons,
            search_result,
            statistics,
        })
    }
}

impl FromStr for FemTask {
    type Err = FemError;

    fn from_str(input: &str) -> FemResult<FemTask> {
        let doc = parse_document_as(input, Some(template_map())).map_err(FemError::TaskParse)?;
        FemTask::from_document(&doc)
    }
}

/// writes a commented example task
pub fn create_template_file(path: &Path) -> FemResult<()> {
    fs::write(path, TEMPLATE)?;
    Ok(())
}
