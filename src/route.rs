//! Route descriptors as handed over by a [`RouteProvider`](crate::provider::RouteProvider).
//!
//! A route descriptor is one registered URL pattern together with its endpoint identifier,
//! the HTTP methods it answers and, optionally, the documentation its handler exposes.
//! Everything downstream (request construction, folders, the apiDoc stubs) only ever sees
//! these types, never the provider that produced them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// HTTP methods a route can answer.
///
/// The named variants are declared in the canonical ordering used to sort requests, so the
/// derived `Ord` iterates a method set in that order. Anything else a provider reports ends
/// up in [`HttpMethod::Other`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Copy,
    Head,
    Options,
    Link,
    Unlink,
    Purge,
    /// A method outside the canonical list, kept verbatim (uppercased)
    Other(String),
}

impl HttpMethod {
    /// Parse a method name, ignoring case
    pub fn parse(method: &str) -> Self {
        match method.trim().to_uppercase().as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "PATCH" => HttpMethod::Patch,
            "DELETE" => HttpMethod::Delete,
            "COPY" => HttpMethod::Copy,
            "HEAD" => HttpMethod::Head,
            "OPTIONS" => HttpMethod::Options,
            "LINK" => HttpMethod::Link,
            "UNLINK" => HttpMethod::Unlink,
            "PURGE" => HttpMethod::Purge,
            other => HttpMethod::Other(other.to_string()),
        }
    }

    /// Get the HTTP method as an uppercase string
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Copy => "COPY",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Link => "LINK",
            HttpMethod::Unlink => "UNLINK",
            HttpMethod::Purge => "PURGE",
            HttpMethod::Other(name) => name,
        }
    }

    /// Lowercase name, the key used by documentation bundles
    pub fn lowercase(&self) -> String {
        self.as_str().to_lowercase()
    }

    /// OPTIONS and HEAD are generated only on request
    pub fn is_implicit(&self) -> bool {
        matches!(self, HttpMethod::Options | HttpMethod::Head)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for HttpMethod {
    fn from(method: String) -> Self {
        HttpMethod::parse(&method)
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_string()
    }
}

/// One entry of `apiHeader` / `apiParam`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub key: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
}

impl FieldSpec {
    pub fn new(key: impl Into<String>, required: bool, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            required,
            description: description.into(),
        }
    }
}

/// Documentation a handler carries for a single HTTP method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodDocumentation {
    #[serde(rename = "apiHeader", default)]
    pub api_header: Option<Vec<FieldSpec>>,
    #[serde(rename = "apiParam", default)]
    pub api_param: Option<Vec<FieldSpec>>,
    #[serde(rename = "apiParamExample", default)]
    pub api_param_example: Option<Value>,
    #[serde(rename = "apiSuccessExample", default)]
    pub api_success_example: Option<Value>,
}

/// Documentation capability of a route handler.
///
/// Providers implement this for whatever they know about a handler. Every accessor may
/// return `None`; a route without any handler documentation is equally valid.
pub trait HandlerDocumentation: fmt::Debug {
    /// Raw docstring, untrimmed
    fn docstring(&self) -> Option<&str>;

    /// Name of the view function or view class
    fn view_name(&self) -> Option<&str>;

    /// Documentation bundle entry for a lowercase method name (`"get"`, `"post"`, ...)
    fn method_documentation(&self, method: &str) -> Option<&MethodDocumentation>;
}

/// One registered URL pattern of the host application.
#[derive(Debug)]
pub struct RouteDescriptor {
    /// Endpoint identifier, usually `namespace.view_name`
    pub endpoint: String,
    /// URL pattern with `<[converter:]name>` placeholders
    pub rule: String,
    /// Methods the route answers, in canonical order
    pub methods: BTreeSet<HttpMethod>,
    /// Handler documentation, if the provider knows any
    pub handler: Option<Box<dyn HandlerDocumentation>>,
}

impl RouteDescriptor {
    /// Create a new RouteDescriptor without handler documentation
    pub fn new<I>(endpoint: impl Into<String>, rule: impl Into<String>, methods: I) -> Self
    where
        I: IntoIterator<Item = HttpMethod>,
    {
        Self {
            endpoint: endpoint.into(),
            rule: rule.into(),
            methods: methods.into_iter().collect(),
            handler: None,
        }
    }

    pub fn with_handler(mut self, handler: Box<dyn HandlerDocumentation>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// The namespace part of the endpoint (text before the first `.`), if any
    pub fn namespace(&self) -> Option<&str> {
        self.endpoint.split_once('.').map(|(namespace, _)| namespace)
    }

    /// Whether this is the framework's static-files route
    pub fn is_static(&self) -> bool {
        self.endpoint == "static"
    }

    pub fn docstring(&self) -> Option<&str> {
        self.handler.as_ref().and_then(|h| h.docstring())
    }

    pub fn view_name(&self) -> Option<&str> {
        self.handler.as_ref().and_then(|h| h.view_name())
    }

    pub fn method_documentation(&self, method: &HttpMethod) -> Option<&MethodDocumentation> {
        self.handler
            .as_ref()
            .and_then(|h| h.method_documentation(&method.lowercase()))
    }
}
