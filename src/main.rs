// ============================================================
// File: main.rs
//
// Description:
//   Entry point for the course catalog program.
//
//     recordindex [config.toml]
//
//   Reads the optional TOML config, sets up logging, loads the
//   configured data file (if any) and hands off to the REPL,
//   which reads commands from standard input.
// ============================================================
use std::path::Path;
use std::process::ExitCode;

use log::{error, info};
use recordindex::logger::parse_level;
use recordindex::{initialize_logger, repl_loop, Catalog, CatalogConfig};


/// Entry point for the catalog REPL.
fn main() -> ExitCode {
    let config = match std::env::args().nth(1) {
        Some(path) => match CatalogConfig::load(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                // Logger is not up yet; report straight to stderr
                eprintln!("ERR: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => CatalogConfig::default(),
    };

    initialize_logger(parse_level(&config.log_level));
    info!("starting catalog with {} backend", config.backend);

    let data_file = config.data_file.clone();
    let data_format = config.data_format;
    let mut catalog = Catalog::new(config);

    // Load data from file
    if let Some(path) = data_file {
        match catalog.load_data(&path, data_format) {
            Ok(report) => println!("Loaded {}: {}", path.display(), report),
            Err(e) => error!("{}", e),
        }
    }

    println!("Course Catalog");
    // Hand off to the main command loop
    repl_loop(&mut catalog);
    ExitCode::SUCCESS
}
