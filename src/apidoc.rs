//! apiDoc comment stubs for a collection.
//!
//! Every request of a [`CollectionDocument`] becomes one docstring block of `@api`
//! directives, ready to be picked up by the apiDoc generator.

use crate::collection::CollectionDocument;
use crate::request::Request;
use crate::route::FieldSpec;
use crate::serializer::{to_string_with, write_to_file, DumpFormatter};
use anyhow::Result;
use log::{debug, info};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Name of the stub file written next to the caller
pub const APIDOC_FILE_NAME: &str = "apidoc.py";

/// Group of requests that are not in any folder
pub const FALLBACK_GROUP: &str = "Others";

const BLOCK_DELIMITER: &str = "\"\"\"";

/// Render one apiDoc block per request, in the document's `requests` order.
///
/// Example payloads are written on one line, with `, ` and `: ` separators and non-ASCII
/// characters escaped.
pub fn render_apidoc(doc: &CollectionDocument) -> Result<String> {
    let groups: HashMap<&str, &str> = doc
        .folders
        .iter()
        .flat_map(|folder| {
            folder
                .order
                .iter()
                .map(move |id| (id.as_str(), folder.name.as_str()))
        })
        .collect();

    let mut out = String::new();
    for request in &doc.requests {
        let group = groups
            .get(request.id.as_str())
            .copied()
            .unwrap_or(FALLBACK_GROUP);
        render_block(&mut out, request, group)?;
    }
    Ok(out)
}

/// Render the stubs for `doc` into [`APIDOC_FILE_NAME`] under `dir`.
///
/// An existing file is overwritten.
pub fn write_apidoc(doc: &CollectionDocument, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(APIDOC_FILE_NAME);
    let content = render_apidoc(doc)?;
    write_to_file(&content, &path)?;
    info!(
        "Wrote apiDoc stubs for {} requests to {}",
        doc.requests.len(),
        path.display()
    );
    Ok(path)
}

fn render_block(out: &mut String, request: &Request, group: &str) -> Result<()> {
    let method = request.method.lowercase();
    debug!("Rendering apiDoc block for {} {}", method, request.name);

    // Writing to a String cannot fail
    let _ = writeln!(out, "{}", BLOCK_DELIMITER);
    let _ = writeln!(
        out,
        "@api {{{}}} {} {}-{}",
        method,
        endpoint_path(&request.url),
        method,
        request.name
    );
    let _ = writeln!(out, "@apiName {}{}", method, request.name);
    if !request.description.is_empty() {
        let _ = writeln!(out, "@apiDescription {}", request.description);
    }

    for header in request.api_header.iter().flatten() {
        let _ = writeln!(out, "@apiHeader {{String}} {}", field_line(header));
    }
    for param in request.api_param.iter().flatten() {
        let _ = writeln!(out, "@apiParam {{String}} {}", field_line(param));
    }

    if let Some(example) = truthy(&request.api_param_example)? {
        let _ = writeln!(
            out,
            "@apiParamExample {{json}} Request-Example \n {}.",
            example
        );
    }
    if let Some(example) = truthy(&request.api_success_example)? {
        let _ = writeln!(
            out,
            "@apiSuccessExample {{json}} Success-Response \n {}.",
            example
        );
    }

    let _ = writeln!(out, "@apiGroup {}", group);
    let _ = writeln!(out, "{}", BLOCK_DELIMITER);
    Ok(())
}

/// Strip the URL template back to `:name` path parameters.
fn endpoint_path(url: &str) -> String {
    url.replace("{{base_url}}", "")
        .replace("{{", ":")
        .replace("}}", "")
}

fn field_line(field: &FieldSpec) -> String {
    let key = if field.required {
        field.key.clone()
    } else {
        format!("[{}]", field.key)
    };
    format!("{} {}.", key, field.description)
}

/// One-line JSON of the value, unless it is absent or empty.
fn truthy(value: &Option<Value>) -> Result<Option<String>> {
    value
        .as_ref()
        .filter(|v| is_truthy(v))
        .map(|v| to_string_with(v, DumpFormatter::compact()))
        .transpose()
}

/// `null`, `false`, zero, and empty strings, arrays or objects are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
