//! Logger setup shared by the CLI and the task runner, run statistics and timing helpers.
use crate::numerical::FEM_1D::fem_error::{FemError, FemResult};
use chrono::Local;
use log::info;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::collections::HashMap;
use std::fs::File;
use std::time::Duration;
use tabled::{builder::Builder, settings::Style};

/// "debug", "info", "warn" or "error"; None means info
pub fn parse_loglevel(level: Option<&str>) -> FemResult<LevelFilter> {
    match level.map(|l| l.trim().to_lowercase()) {
        None => Ok(LevelFilter::Info),
        Some(l) => match l.as_str() {
            "debug" => Ok(LevelFilter::Debug),
            "info" => Ok(LevelFilter::Info),
            "warn" => Ok(LevelFilter::Warn),
            "error" => Ok(LevelFilter::Error),
            "off" | "none" => Ok(LevelFilter::Off),
            other => Err(FemError::TaskParse(format!(
                "loglevel must be debug, info, warn or error, got '{}'",
                other
            ))),
        },
    }
}

/// Terminal logger plus, with `save_log`, a copy into log_<date>_<time>.txt.
/// Returns false when a logger was already installed, that one stays in charge.
pub fn init_logger(loglevel: Option<&str>, save_log: bool) -> FemResult<bool> {
    let log_option = parse_loglevel(loglevel)?;
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if save_log {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let name = format!("log_{}.txt", date_and_time);
        loggers.push(WriteLogger::new(log_option, Config::default(), File::create(name)?));
    }
    Ok(CombinedLogger::init(loggers).is_ok())
}

/// key-value table in the style of the solver reports
pub fn statistics_table(stats: &HashMap<String, String>) -> String {
    let mut table = Builder::from(stats.clone()).build();
    table.with(Style::modern_rounded());
    table.to_string()
}

pub fn elapsed_time(elapsed: Duration) -> (String, f64) {
    let time = elapsed.as_millis();
    if time < 1000 {
        info!("Elapsed {} ms", time);
        (" ms".to_string(), time as f64)
    } else if time < 60_000 {
        info!("Elapsed {} s", elapsed.as_secs());
        (" s".to_string(), elapsed.as_secs_f64())
    } else if time < 3_600_000 {
        info!("Elapsed {} min", elapsed.as_secs() / 60);
        (" min".to_string(), elapsed.as_secs_f64() / 60.0)
    } else {
        info!("Elapsed {} h", elapsed.as_secs() / 3600);
        (" h".to_string(), elapsed.as_secs_f64() / 3600.0)
    }
}
