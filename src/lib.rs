//! Postman collection generator - Postman collections from web application route tables.
//!
//! This library turns the route table of a web application into a Postman collection
//! document and a matching file of apiDoc comment stubs. Every (route, method) pair becomes
//! one request; requests can be grouped into folders by endpoint namespace.
//!
//! # Route sources
//!
//! - **Route manifests**: YAML or JSON dumps of an application's URL map, with optional
//!   per-method documentation.
//! - **Axum crates**: the `Router` built by a zero-argument function, found by static
//!   analysis of the crate's sources.
//!
//! # Architecture
//!
//! 1. [`provider`] - Resolves a `module.attribute` target to a route table
//! 2. [`scanner`] / [`parser`] - Find and parse the sources of a crate target
//! 3. [`route`] - Route descriptors and the HTTP method type
//! 4. [`request`] - One request per (route, method) pair
//! 5. [`collection`] / [`ordering`] - Folders, the collection and their request order
//! 6. [`converter`] - Walks the route table into a collection
//! 7. [`serializer`] - JSON output
//! 8. [`apidoc`] - apiDoc stubs for every request
//!
//! # Example Usage
//!
//! ```no_run
//! use postman_from_routes::{
//!     converter::{build_collection, ConvertOptions},
//!     provider::resolve_target,
//!     serializer::serialize_json_pretty,
//! };
//! use std::path::Path;
//!
//! let provider = resolve_target("myapp.app", Path::new(".")).unwrap();
//! let routes = provider.routes().unwrap();
//!
//! let mut options = ConvertOptions::new("My API");
//! options.group_by_namespace = true;
//! let collection = build_collection(&routes, &options).unwrap();
//!
//! let json = serialize_json_pretty(&collection.to_document()).unwrap();
//! println!("{}", json);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod apidoc;
pub mod cli;
pub mod collection;
pub mod converter;
pub mod docstring;
pub mod error;
pub mod ordering;
pub mod parser;
pub mod provider;
pub mod request;
pub mod route;
pub mod scanner;
pub mod serializer;
