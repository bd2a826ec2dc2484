//! Route-table manifests.
//!
//! A manifest is a YAML or JSON mapping from attribute names to entries. An entry with a
//! `routes` sequence is an application; an entry with `factory: <name>` is a zero-argument
//! factory whose result is the entry it names.
//!
//! ```yaml
//! app:
//!   routes:
//!     - endpoint: users.get_user
//!       rule: /users/<int:user_id>
//!       methods: [GET, HEAD, OPTIONS]
//!       view:
//!         name: get_user
//!         doc: Fetch a single user.
//!         documentation:
//!           get:
//!             apiHeader:
//!               - {key: Authorization, required: true, description: Bearer token}
//! create_app:
//!   factory: app
//! ```

use super::RouteProvider;
use crate::error::{Error, Result};
use crate::route::{HandlerDocumentation, HttpMethod, MethodDocumentation, RouteDescriptor};
use log::{debug, info};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// An application loaded from a route manifest
#[derive(Debug, Clone)]
pub struct ManifestProvider {
    path: PathBuf,
    attribute: String,
    application: ManifestApplication,
}

/// The route table of one manifest application
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestApplication {
    pub routes: Vec<ManifestRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestRoute {
    pub endpoint: String,
    pub rule: String,
    pub methods: Vec<HttpMethod>,
    #[serde(default)]
    pub view: Option<ManifestView>,
}

/// What a manifest records about a route's view function or view class.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestView {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub doc: Option<String>,
    /// Documentation bundle keyed by lowercase method name
    #[serde(default)]
    pub documentation: HashMap<String, MethodDocumentation>,
}

impl HandlerDocumentation for ManifestView {
    fn docstring(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    fn view_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn method_documentation(&self, method: &str) -> Option<&MethodDocumentation> {
        self.documentation.get(method)
    }
}

impl ManifestProvider {
    /// Read `path` and resolve `attribute` to an application.
    ///
    /// # Errors
    ///
    /// [`Error::Resolution`] when the file cannot be read or parsed, the attribute is
    /// missing, or the application's routes are malformed; [`Error::NotAnApplication`]
    /// when the attribute (or what its factory returns) is not an application.
    pub fn load(target: &str, path: &Path, attribute: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::resolution(target, format!("{}: {}", path.display(), e)))?;
        let root = parse_manifest(&content, path).map_err(|e| Error::resolution(target, e))?;
        let Value::Object(entries) = root else {
            return Err(Error::resolution(
                target,
                format!("{} is not a mapping of attributes", path.display()),
            ));
        };

        let entry = entries.get(attribute).ok_or_else(|| {
            Error::resolution(
                target,
                format!("{} has no attribute '{}'", path.display(), attribute),
            )
        })?;

        let application = if is_application(entry) {
            entry
        } else {
            // Call the factory once; whatever it returns has to be the application
            let returned = factory_name(entry).and_then(|name| entries.get(name));
            match returned {
                Some(value) if is_application(value) => {
                    debug!("Attribute {} is a factory, using its result", attribute);
                    value
                }
                Some(value) => {
                    return Err(Error::NotAnApplication {
                        target: target.to_string(),
                        found: kind_of(value).to_string(),
                    })
                }
                None => {
                    return Err(Error::NotAnApplication {
                        target: target.to_string(),
                        found: kind_of(entry).to_string(),
                    })
                }
            }
        };

        let application: ManifestApplication = serde_json::from_value(application.clone())
            .map_err(|e| Error::resolution(target, format!("invalid route table: {}", e)))?;
        info!(
            "Loaded {} routes from {}",
            application.routes.len(),
            path.display()
        );

        Ok(Self {
            path: path.to_path_buf(),
            attribute: attribute.to_string(),
            application,
        })
    }
}

impl RouteProvider for ManifestProvider {
    fn describe(&self) -> String {
        format!("manifest {} ({})", self.path.display(), self.attribute)
    }

    fn routes(&self) -> Result<Vec<RouteDescriptor>> {
        Ok(self
            .application
            .routes
            .iter()
            .map(|route| {
                let descriptor = RouteDescriptor::new(
                    route.endpoint.clone(),
                    route.rule.clone(),
                    route.methods.iter().cloned(),
                );
                match &route.view {
                    Some(view) => descriptor.with_handler(Box::new(view.clone())),
                    None => descriptor,
                }
            })
            .collect())
    }
}

fn parse_manifest(content: &str, path: &Path) -> std::result::Result<Value, String> {
    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    if is_json {
        serde_json::from_str(content).map_err(|e| format!("{}: {}", path.display(), e))
    } else {
        serde_yaml::from_str(content).map_err(|e| format!("{}: {}", path.display(), e))
    }
}

fn is_application(value: &Value) -> bool {
    matches!(value.get("routes"), Some(Value::Array(_)))
}

fn factory_name(value: &Value) -> Option<&str> {
    value.get("factory").and_then(Value::as_str)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(map) if is_factory(map) => "factory",
        Value::Object(_) => "mapping",
    }
}

fn is_factory(map: &Map<String, Value>) -> bool {
    map.get("factory").is_some_and(Value::is_string)
}
