use crate::apidoc::write_apidoc;
use crate::collection::CollectionDocument;
use crate::converter::{build_collection, ConvertOptions, DEFAULT_BASE_URL};
use crate::provider::resolve_target;
use crate::serializer::{serialize_json, serialize_json_pretty};
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use std::env;
use std::path::Path;

/// Postman collection generator - Turn a web application's route table into a Postman collection
#[derive(Parser, Debug)]
#[command(name = "postman-from-routes")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// The application to convert, as module.attribute (e.g. myapp.app or myapp.create_app)
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Name of the collection (default: name of the current directory)
    #[arg(short = 'n', long = "name")]
    pub name: Option<String>,

    /// The base of every URL
    #[arg(short = 'b', long = "base-url", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Also generate OPTIONS/HEAD methods
    #[arg(short = 'a', long = "all")]
    pub all: bool,

    /// Also generate the static files route
    #[arg(short = 's', long = "static")]
    pub include_static: bool,

    /// Indent the output
    #[arg(short = 'i', long = "indent")]
    pub indent: bool,

    /// Add Postman folders for blueprints and modules
    #[arg(short = 'f', long = "folders")]
    pub folders: bool,

    /// Name requests after the handler instead of the endpoint
    #[arg(long = "view-names")]
    pub view_names: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl CliArgs {
    /// Conversion options described by these arguments
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            name: self.name.clone().unwrap_or_default(),
            base_url: self.base_url.clone(),
            include_all_methods: self.all,
            include_static: self.include_static,
            group_by_namespace: self.folders,
            use_view_names: self.view_names,
        }
    }
}

/// Fill in defaults and log already-parsed arguments
pub fn parse_args_from_parsed(mut args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if args.name.is_none() {
        let cwd = env::current_dir().context("Failed to determine the current directory")?;
        args.name = Some(default_collection_name(&cwd));
    }

    info!("Target: {}", args.target);
    info!("Collection name: {}", args.name.as_deref().unwrap_or_default());
    info!("Base URL: {}", args.base_url);
    if args.folders {
        info!("Grouping requests into folders");
    }

    Ok(args)
}

/// Name of the collection when none is given: the directory's last component
pub fn default_collection_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The collection document and its rendered JSON
#[derive(Debug)]
pub struct Generated {
    pub document: CollectionDocument,
    pub json: String,
}

/// Resolve the target against `base_dir` and convert its routes.
///
/// Errors from the library keep their [`crate::error::Error`] so callers can tell
/// resolution failures apart.
pub fn generate(args: &CliArgs, base_dir: &Path) -> Result<Generated> {
    info!("Resolving {}...", args.target);
    let provider = resolve_target(&args.target, base_dir)?;
    info!("Loaded {}", provider.describe());

    let routes = provider.routes()?;
    info!("Found {} routes", routes.len());
    if routes.is_empty() {
        log::warn!("No routes found in {}", provider.describe());
    }

    let collection = build_collection(&routes, &args.convert_options())?;
    let document = collection.to_document();
    info!(
        "Built collection with {} requests and {} folders",
        document.requests.len(),
        document.folders.len()
    );

    let json = if args.indent {
        serialize_json_pretty(&document)?
    } else {
        serialize_json(&document)?
    };

    Ok(Generated { document, json })
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    let cwd = env::current_dir().context("Failed to determine the current directory")?;
    let generated = generate(&args, &cwd)?;

    let apidoc_path = write_apidoc(&generated.document, &cwd)?;
    println!("{}", generated.json);

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Requests: {}", generated.document.requests.len());
    info!("  - Folders: {}", generated.document.folders.len());
    info!("  - apiDoc stubs: {}", apidoc_path.display());

    Ok(())
}
