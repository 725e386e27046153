//! # recordindex
//! In-memory keyed record indexes for course and bid catalogs.
//!
//! ## Features
//! - [`OrderedIndex`]: unbalanced binary search tree with in-order,
//!   pre-order and post-order traversal.
//! - [`ChainedHashIndex`]: fixed-size separate-chaining hash table with a
//!   sorted snapshot for ordered listing.
//! - [`KeyedIndex`]: the contract both implement, so a [`Catalog`] can
//!   hold either one.
//! - A small line-oriented REPL over a catalog.
//!
//! ## Usage
//! This crate is primarily consumed by the binary in `main.rs`,
//! which provides the REPL interface. All reusable logic and
//! unit tests live here so the project can be tested with `cargo test`.
// =====================================================================
// File: lib.rs
//
//   This module implements the command-line interface (CLI)
//   that accepts the following commands:
//
//     `LOAD <path>`          -> Load a course file into the active index
//     `LOAD BIDS <path>`     -> Load a bid export (header row first)
//     `USE <TREE|HASH>`      -> Switch the active index, keeping all records
//     `LIST [IN|PRE|POST]`   -> Print records (hash index is always sorted)
//     `FIND <key>`           -> Print one record, or NOT FOUND
//     `REMOVE <key>`         -> Remove one record: 1 if removed, 0 if not found
//     `COUNT`                -> Number of records
//     `CHECK`                -> List prerequisites that are not loaded
//     `STATS`                -> Active backend and sizes
//     `EXIT` / `QUIT`        -> Terminate the program
// =====================================================================
mod error;
pub use error::{CatalogError, IndexError};

mod record;
pub use record::{Payload, Record};

pub mod index;
pub use index::{Backend, KeyedIndex, OrderedIndex, Traversal, TraversalOrder};

pub mod hash;
pub use hash::{ChainedHashIndex, HashStrategy, DEFAULT_TABLE_SIZE};

mod loader;
pub use loader::{parse_bid_line, parse_course_line, read_lines, validate_key, DataFormat};

mod config;
pub use config::CatalogConfig;

mod catalog;
pub use catalog::{Catalog, LoadReport};

pub mod logger;
pub use logger::initialize_logger;

use std::io::{self, BufRead};
use std::path::Path;
use std::time::Instant;

use log::{debug, error};

/// Result of handling a single user command.
///
/// - `Continue` means the REPL should keep running.
/// - `Exit` means the REPL should break out and terminate.
pub enum CommandResult {
    Continue,
    Exit,
}


/// Read–Evaluate–Print Loop (REPL) to handle interactive command input.
///
/// Continuously reads commands from standard input, runs them against
/// the [`Catalog`] and prints responses to standard output.
///
/// # Example
/// ```no_run
/// use recordindex::{Catalog, repl_loop};
///
/// let mut catalog = Catalog::default();
/// repl_loop(&mut catalog); // <- waits for user input interactively
/// ```
pub fn repl_loop(catalog: &mut Catalog) {
    let stdin = io::stdin();
    let proper_syntax =
        "Syntax Usage: LOAD [BIDS] <path>, USE <TREE|HASH>, LIST [IN|PRE|POST], FIND <key>, REMOVE <key>, COUNT, CHECK, STATS, EXIT";

    for input_line in stdin.lock().lines() {
        let full_command = match input_line {
            Ok(line) => line,
            Err(e) => {
                error!("failed to read input: {}", e);
                break;
            }
        };
        let (cmd, args) = parse_command(&full_command);

        match handle_command(&cmd, &args, proper_syntax, catalog) {
            CommandResult::Exit => break,
            CommandResult::Continue => (),
        }
    }
}


/// Parses a raw input line into a command and its arguments.
///
/// The first token is treated as the command (normalized to uppercase),
/// and the remaining tokens are collected as arguments.
fn parse_command(line: &str) -> (String, Vec<String>) {
    let mut command_segments = line.split_whitespace();
    let cmd = command_segments.next().unwrap_or("").to_uppercase();
    let args: Vec<String> = command_segments.map(|s| s.to_string()).collect();

    (cmd, args)
}


/// Handles a single user command and returns whether the REPL should continue or exit.
///
/// The `proper_syntax` argument is displayed in error messages to guide the user.
fn handle_command(cmd: &str, args: &[String], proper_syntax: &str, catalog: &mut Catalog) -> CommandResult {
    match cmd {
        // LOAD [BIDS] <path> - the path may contain spaces
        "LOAD" => {
            let (format, path_args) = match args.first() {
                Some(first) if first.eq_ignore_ascii_case("BIDS") => (DataFormat::Bids, &args[1..]),
                _ => (DataFormat::Courses, args),
            };
            if path_args.is_empty() {
                println!("ERR: LOAD requires a file path");
            } else {
                let path = path_args.join(" ");
                let started = Instant::now();
                match catalog.load_data(Path::new(&path), format) {
                    Ok(report) => println!("OK: {}", report),
                    Err(e) => println!("ERR: {}", e),
                }
                debug!("LOAD took {:?}", started.elapsed());
            }
            CommandResult::Continue
        }

        "USE" => {
            match args.first().map(|arg| arg.parse()) {
                Some(Ok(backend)) if args.len() == 1 => match catalog.switch_backend(backend) {
                    Ok(()) => println!("OK: using {} index", backend),
                    Err(e) => println!("ERR: {}", e),
                },
                Some(Err(e)) => println!("ERR: {}", e),
                _ => println!("ERR: USE requires exactly one of TREE or HASH"),
            }
            CommandResult::Continue
        }

        "LIST" => {
            let order = match args.first() {
                None => Ok(TraversalOrder::InOrder),
                Some(arg) => arg.parse::<TraversalOrder>(),
            };
            match order {
                Ok(order) => {
                    for record in catalog.list(order) {
                        println!("{}", record);
                    }
                    println!("END");
                }
                Err(e) => println!("ERR: {}", e),
            }
            CommandResult::Continue
        }

        "FIND" => {
            if args.len() != 1 {
                println!("ERR: FIND requires exactly one key");
            } else {
                let started = Instant::now();
                match catalog.find(&args[0]) {
                    Ok(record) => println!("{}", record),
                    Err(CatalogError::NotFound(_)) => println!("NOT FOUND"),
                    Err(e) => println!("ERR: {}", e),
                }
                debug!("FIND took {:?}", started.elapsed());
            }
            CommandResult::Continue
        }

        "REMOVE" => {
            if args.len() != 1 {
                println!("ERR: REMOVE requires exactly one key");
            } else {
                match catalog.remove(&args[0]) {
                    Ok(_) => println!("1"),
                    Err(_) => println!("0"),
                }
            }
            CommandResult::Continue
        }

        "COUNT" => {
            println!("{}", catalog.len());
            CommandResult::Continue
        }

        "CHECK" => {
            for (course, prereq) in catalog.missing_prerequisites() {
                println!("{} requires missing {}", course, prereq);
            }
            println!("END");
            CommandResult::Continue
        }

        "STATS" => {
            let config = catalog.config();
            match catalog.backend() {
                Backend::Tree => println!("backend=tree records={}", catalog.len()),
                Backend::Hash => println!(
                    "backend=hash records={} table_size={} strategy={:?}",
                    catalog.len(),
                    config.table_size,
                    config.hash_strategy
                ),
            }
            CommandResult::Continue
        }

        "EXIT" | "QUIT" => {
            println!("Good bye.");
            CommandResult::Exit
        }

        // Empty input
        "" => {
            println!("Enter a command.");
            CommandResult::Continue
        }

        // Everything else will be noted and returned as an error
        _ => {
            println!("ERR: command '{}' not handled", cmd);
            println!("{}", proper_syntax);
            CommandResult::Continue
        }
    }
}



// =================================================================
// lib.rs Unit tests
// =================================================================
