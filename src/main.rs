#![allow(non_snake_case)]
use RustedFEM::Utils::logger::init_logger;
use RustedFEM::numerical::FEM_1D::fem_error::FemResult;
use RustedFEM::numerical::FEM_1D::task_parser_fem::{FemTask, create_template_file};
use log::{error, info};
use std::env;
use std::path::Path;
use std::process::ExitCode;

const TEMPLATE_NAME: &str = "fem_task.txt";

fn run(args: &[String]) -> FemResult<()> {
    match args.get(1) {
        None => {
            create_template_file(Path::new(TEMPLATE_NAME))?;
            println!(
                "usage: RustedFEM <task-file>\ntemplate task written to {}",
                TEMPLATE_NAME
            );
            Ok(())
        }
        Some(path) => {
            let task = FemTask::from_file(Path::new(path))?;
            init_logger(task.loglevel.as_deref(), task.save_log)?;
            info!("task {} loaded", path);
            let report = task.run()?;
            for run in &report.runs {
                println!(
                    "{:>6} {:>5} elements: max relative error {:.3e}, max absolute error {:.3e}",
                    run.solution.scheme,
                    run.solution.element_count,
                    run.max_relative_error,
                    run.max_absolute_error
                );
            }
            if let Some(n) = report.search_result {
                println!("element count found by search: {}", n);
            }
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
