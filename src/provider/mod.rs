//! Route providers: where route tables come from.
//!
//! A provider turns an application target into a list of [`RouteDescriptor`]s. Two kinds
//! of application are understood:
//!
//! - **Route manifests** ([`manifest::ManifestProvider`]): a YAML or JSON dump of an
//!   application's URL map.
//! - **axum crates** ([`axum::AxumProvider`]): the router returned by a zero-argument
//!   function, found by static analysis of the crate's sources.
//!
//! [`resolve_target`] picks the provider for a `module.path.attribute` target.
//!
//! # Example
//!
//! ```no_run
//! use postman_from_routes::provider::resolve_target;
//! use std::path::Path;
//!
//! let provider = resolve_target("myservice.app", Path::new(".")).unwrap();
//! for route in provider.routes().unwrap() {
//!     println!("{} {}", route.endpoint, route.rule);
//! }
//! ```

pub mod axum;
pub mod manifest;

use crate::error::{Error, Result};
use crate::route::RouteDescriptor;
use log::debug;
use std::path::{Path, PathBuf};

/// Manifest file extensions, in lookup order
const MANIFEST_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Source of an application's route table.
pub trait RouteProvider {
    /// Short human description of the application, for logging
    fn describe(&self) -> String;

    /// Every route of the application, in registration order.
    fn routes(&self) -> Result<Vec<RouteDescriptor>>;
}

/// Split a target on its final `.` into module path and attribute.
///
/// # Errors
///
/// Returns [`Error::Resolution`] when the target has no `.` or either side is empty.
pub fn split_target(target: &str) -> Result<(&str, &str)> {
    match target.rsplit_once('.') {
        Some((module, attribute)) if !module.is_empty() && !attribute.is_empty() => {
            Ok((module, attribute))
        }
        _ => Err(Error::resolution(
            target,
            "expected a target of the form module.attribute",
        )),
    }
}

/// Resolve `target` against `base_dir` and load the application it names.
///
/// The module path's dots become directory separators. The first existing candidate wins:
/// `<path>.yaml`, `<path>.yml`, `<path>.json` (route manifests), then a crate directory
/// `<path>/` containing `Cargo.toml` or `src/`.
///
/// # Errors
///
/// Returns [`Error::Resolution`] if nothing matches or the match cannot be loaded, and
/// [`Error::NotAnApplication`] if the attribute exists but does not yield an application.
pub fn resolve_target(target: &str, base_dir: &Path) -> Result<Box<dyn RouteProvider>> {
    let (module, attribute) = split_target(target)?;
    let module_path: PathBuf = module.split('.').fold(base_dir.to_path_buf(), |p, s| p.join(s));
    debug!("Resolving {} via {}", target, module_path.display());

    for extension in MANIFEST_EXTENSIONS {
        let mut candidate = module_path.clone();
        candidate.set_extension(extension);
        if candidate.is_file() {
            debug!("Found route manifest {}", candidate.display());
            let provider = manifest::ManifestProvider::load(target, &candidate, attribute)?;
            return Ok(Box::new(provider));
        }
    }

    if module_path.join("Cargo.toml").is_file() || module_path.join("src").is_dir() {
        debug!("Found crate {}", module_path.display());
        let provider = axum::AxumProvider::load(target, &module_path, attribute)?;
        return Ok(Box::new(provider));
    }

    Err(Error::resolution(
        target,
        format!("no route manifest or crate named {}", module),
    ))
}
