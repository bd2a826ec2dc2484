//! Postman collection generator - Command-line tool for turning route tables into collections.
//!
//! Resolves a `module.attribute` target to a web application, converts every route and
//! method into a Postman request, prints the collection JSON on stdout and writes apiDoc
//! stubs to `apidoc.py` in the current directory.
//!
//! # Usage
//!
//! ```bash
//! postman-from-routes [OPTIONS] <TARGET>
//! ```
//!
//! # Examples
//!
//! Convert the `app` entry of `myapp.yaml`:
//! ```bash
//! postman-from-routes myapp.app > collection.json
//! ```
//!
//! Convert the router returned by `fn app() -> Router` in the `shop` crate, with folders:
//! ```bash
//! postman-from-routes -f -i shop.app > collection.json
//! ```

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::info;
use postman_from_routes::cli;
use postman_from_routes::error::Error;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    // Initialize logger based on verbose flag
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Postman collection generator starting...");

    let args = cli::parse_args_from_parsed(args)?;

    if let Err(err) = cli::run(args) {
        // Bad targets are usage errors
        if let Some(resolution) = err.downcast_ref::<Error>().filter(|e| e.is_resolution()) {
            cli::CliArgs::command()
                .error(ErrorKind::ValueValidation, resolution)
                .exit();
        }
        return Err(err);
    }

    Ok(())
}
