//! Request records: one per (route, method) pair.

use crate::docstring::trim_docstring;
use crate::route::{FieldSpec, HttpMethod, RouteDescriptor};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;
use uuid::Uuid;

/// Default body mode of generated requests
pub const DEFAULT_DATA_MODE: &str = "params";

/// `<name>` or `<converter:name>` in a route rule
static URL_VARIABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?:[a-zA-Z0-9_]+:)?(?P<var_name>[a-zA-Z0-9_]+)>")
        .expect("Invalid URL variable regex")
});

/// Current time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A single request of the collection.
///
/// Serializes to the collection's request object. The folder relation is internal and is
/// never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: String,
    #[serde(rename = "collectionId")]
    pub collection_id: String,
    #[serde(rename = "dataMode")]
    pub data_mode: String,
    pub description: String,
    #[serde(rename = "apiHeader")]
    pub api_header: Option<Vec<FieldSpec>>,
    #[serde(rename = "apiParam")]
    pub api_param: Option<Vec<FieldSpec>>,
    #[serde(rename = "apiParamExample")]
    pub api_param_example: Option<Value>,
    #[serde(rename = "apiSuccessExample")]
    pub api_success_example: Option<Value>,
    pub method: HttpMethod,
    pub name: String,
    pub time: i64,
    pub url: String,
    #[serde(skip)]
    folder_id: Option<String>,
}

/// Explicit values that take precedence over what a route's handler provides.
#[derive(Debug, Clone, Default)]
pub struct RequestOverrides {
    pub name: Option<String>,
    pub description: Option<String>,
    pub api_header: Option<Vec<FieldSpec>>,
    pub api_param: Option<Vec<FieldSpec>>,
    pub api_param_example: Option<Value>,
    pub api_success_example: Option<Value>,
}

impl Request {
    /// Create a bare request with a fresh id and timestamp
    pub fn new(name: impl Into<String>, url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            collection_id: String::new(),
            data_mode: DEFAULT_DATA_MODE.to_string(),
            description: String::new(),
            api_header: None,
            api_param: None,
            api_param_example: None,
            api_success_example: None,
            method,
            name: name.into(),
            time: now_millis(),
            url: url.into(),
            folder_id: None,
        }
    }

    /// Build the request for one method of a route.
    ///
    /// The name is derived from the endpoint (see [`display_name`]) and the URL from
    /// `base_url` and the rule (see [`translate_url`]). Description and documentation fields
    /// come from `overrides` first, then from the handler, and are otherwise left empty.
    pub fn from_route(
        route: &RouteDescriptor,
        method: &HttpMethod,
        base_url: &str,
        overrides: RequestOverrides,
    ) -> Self {
        let name = overrides
            .name
            .unwrap_or_else(|| display_name(&route.endpoint));
        let url = translate_url(base_url, &route.rule);
        debug!("Building request {} {} ({})", method, url, name);

        let mut request = Self::new(name, url, method.clone());
        request.description = overrides
            .description
            .unwrap_or_else(|| trim_docstring(route.docstring()));

        let documentation = route.method_documentation(method);
        request.api_header = overrides
            .api_header
            .or_else(|| documentation.and_then(|d| d.api_header.clone()));
        request.api_param = overrides
            .api_param
            .or_else(|| documentation.and_then(|d| d.api_param.clone()));
        request.api_param_example = overrides
            .api_param_example
            .or_else(|| documentation.and_then(|d| d.api_param_example.clone()));
        request.api_success_example = overrides
            .api_success_example
            .or_else(|| documentation.and_then(|d| d.api_success_example.clone()));

        request
    }

    /// Id of the folder this request was added to, if any
    pub fn folder_id(&self) -> Option<&str> {
        self.folder_id.as_deref()
    }

    pub(crate) fn set_folder(&mut self, folder_id: &str) {
        self.folder_id = Some(folder_id.to_string());
    }
}

/// Human label for an endpoint identifier.
///
/// `blog.list_posts` becomes `posts`: the namespace up to the last `.` goes, then the first
/// `_`-separated token, and remaining underscores become spaces.
pub fn display_name(endpoint: &str) -> String {
    let name = endpoint.rsplit('.').next().unwrap_or(endpoint);
    let name = name.split_once('_').map_or(name, |(_, rest)| rest);
    name.replace('_', " ")
}

/// Prefix `rule` with `base_url` and turn every `<[converter:]name>` into `{{name}}`.
///
/// Anything that does not match the placeholder syntax is left as is.
pub fn translate_url(base_url: &str, rule: &str) -> String {
    let url = format!("{}{}", base_url, rule);
    URL_VARIABLE_RE
        .replace_all(&url, "{{$var_name}}")
        .into_owned()
}
