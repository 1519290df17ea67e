//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `delivery_core` linkage and, given a database path, list the
//!   registered delivery employee ids.
//! - Route core logging to a `logs/` directory next to the database file.
//!
//! Usage: `delivery_cli [db_path]`

use delivery_core::{
    default_log_level, init_logging, DeliveryEmployeeService, FileConnectionProvider,
    SqliteDeliveryEmployeeRepository, StoreConfig,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const LOG_DIR_NAME: &str = "logs";

fn main() -> ExitCode {
    println!("delivery_core ping={}", delivery_core::ping());
    println!("delivery_core version={}", delivery_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match list_ids(&db_path) {
        Ok(ids) => {
            let rendered: Vec<String> = ids.iter().map(ToString::to_string).collect();
            println!("delivery_employee_ids=[{}]", rendered.join(","));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn list_ids(db_path: &str) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
    let provider = FileConnectionProvider::new(StoreConfig::new(db_path))?;
    start_logging(provider.config());
    let repo = SqliteDeliveryEmployeeRepository::try_new(provider)?;
    let service = DeliveryEmployeeService::new(repo);
    Ok(service.list_ids()?)
}

/// Logging failures are reported but never stop the listing.
fn start_logging(config: &StoreConfig) {
    let Some(log_dir) = log_dir_for(&config.path) else {
        eprintln!("warning: cannot derive log directory; logging disabled");
        return;
    };
    let Some(log_dir) = log_dir.to_str() else {
        eprintln!("warning: log directory is not valid UTF-8; logging disabled");
        return;
    };
    if let Err(err) = init_logging(default_log_level(), log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
}

/// Absolute `logs/` directory beside `db_path`.
fn log_dir_for(db_path: &Path) -> Option<PathBuf> {
    let absolute = if db_path.is_absolute() {
        db_path.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(db_path)
    };
    absolute.parent().map(|dir| dir.join(LOG_DIR_NAME))
}
