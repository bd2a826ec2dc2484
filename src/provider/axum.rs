//! Route tables of axum applications.
//!
//! The application is the `Router` returned by a zero-argument function of the crate. Its
//! body is walked statically: `.route(..)`, `.nest(..)`, `.merge(..)` and
//! `.nest_service(.., ServeDir::new(..))` calls are followed through local bindings and
//! calls to other router functions of the crate.

use super::RouteProvider;
use crate::error::{Error, Result};
use crate::ordering::METHODS_ORDER;
use crate::parser::{AstParser, ParsedFile};
use crate::route::{HandlerDocumentation, HttpMethod, MethodDocumentation, RouteDescriptor};
use crate::scanner::FileScanner;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use syn::punctuated::Punctuated;
use syn::{
    Attribute, BinOp, Block, Expr, ExprMethodCall, ItemFn, Lit, Meta, Pat, ReturnType, Stmt, Token,
    Type,
};

/// Method-router constructors and their methods
const METHOD_ROUTERS: [(&str, &str); 8] = [
    ("get", "GET"),
    ("post", "POST"),
    ("put", "PUT"),
    ("patch", "PATCH"),
    ("delete", "DELETE"),
    ("head", "HEAD"),
    ("options", "OPTIONS"),
    ("trace", "TRACE"),
];

/// Router functions deeper than this are not followed
const MAX_NESTING: usize = 32;

/// Endpoint name of the static-files route
const STATIC_ENDPOINT: &str = "static";

/// A function of the analysed crate
#[derive(Debug, Clone)]
struct FunctionEntry {
    module: Option<String>,
    item: ItemFn,
}

/// Functions of a crate by name, plus the kinds of its other named items
#[derive(Debug, Default)]
struct FunctionIndex {
    functions: HashMap<String, Vec<FunctionEntry>>,
    other_items: HashMap<String, &'static str>,
}

impl FunctionIndex {
    fn build(parsed_files: &[ParsedFile]) -> Self {
        let mut index = Self::default();
        for file in parsed_files {
            index.add_items(&file.syntax_tree.items, file.module.as_deref());
        }
        debug!("Indexed {} function names", index.functions.len());
        index
    }

    fn add_items(&mut self, items: &[syn::Item], module: Option<&str>) {
        for item in items {
            match item {
                syn::Item::Fn(item_fn) => {
                    self.functions
                        .entry(item_fn.sig.ident.to_string())
                        .or_default()
                        .push(FunctionEntry {
                            module: module.map(str::to_string),
                            item: item_fn.clone(),
                        });
                }
                syn::Item::Mod(item_mod) => {
                    if let Some((_, items)) = &item_mod.content {
                        let name = item_mod.ident.to_string();
                        self.add_items(items, Some(&name));
                    }
                }
                syn::Item::Const(c) => {
                    self.other_items.insert(c.ident.to_string(), "const");
                }
                syn::Item::Static(s) => {
                    self.other_items.insert(s.ident.to_string(), "static");
                }
                syn::Item::Struct(s) => {
                    self.other_items.insert(s.ident.to_string(), "struct");
                }
                syn::Item::Enum(e) => {
                    self.other_items.insert(e.ident.to_string(), "enum");
                }
                _ => {}
            }
        }
    }

    /// Find a function, preferring the one in `qualifier`'s module, then the one in
    /// `current`'s module, then the first indexed.
    fn lookup(&self, name: &str, qualifier: Option<&str>, current: Option<&str>) -> Option<&FunctionEntry> {
        let candidates = self.functions.get(name)?;
        qualifier
            .and_then(|q| candidates.iter().find(|f| f.module.as_deref() == Some(q)))
            .or_else(|| candidates.iter().find(|f| f.module.as_deref() == current))
            .or_else(|| candidates.first())
    }
}

/// Documentation of an axum handler function
#[derive(Debug, Clone)]
pub struct AxumHandler {
    name: String,
    doc: Option<String>,
}

impl HandlerDocumentation for AxumHandler {
    fn docstring(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    fn view_name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn method_documentation(&self, _method: &str) -> Option<&MethodDocumentation> {
        None
    }
}

/// An axum application found in a crate
#[derive(Debug)]
pub struct AxumProvider {
    root: PathBuf,
    entry: String,
    index: FunctionIndex,
}

impl AxumProvider {
    /// Scan and parse the crate at `root` and check that `attribute` names a router
    /// function.
    ///
    /// # Errors
    ///
    /// [`Error::Resolution`] when the crate has no parsable sources or no item called
    /// `attribute`; [`Error::NotAnApplication`] when the item is not a zero-argument
    /// function returning `Router`.
    pub fn load(target: &str, root: &Path, attribute: &str) -> Result<Self> {
        info!("Scanning crate {}...", root.display());
        let scan_result = FileScanner::new(root.to_path_buf()).scan()?;
        if !scan_result.warnings.is_empty() {
            warn!(
                "Skipped {} unreadable paths in {}",
                scan_result.warnings.len(),
                root.display()
            );
        }
        let parsed_files = AstParser::parse_sources(&scan_result.source_files);
        if parsed_files.is_empty() {
            return Err(Error::resolution(
                target,
                format!("no parsable Rust sources in {}", root.display()),
            ));
        }
        info!("Parsed {} source files", parsed_files.len());

        Self::from_parsed(target, root, parsed_files, attribute)
    }

    /// Same as [`AxumProvider::load`] for files that are already parsed
    pub fn from_parsed(
        target: &str,
        root: &Path,
        parsed_files: Vec<ParsedFile>,
        attribute: &str,
    ) -> Result<Self> {
        let index = FunctionIndex::build(&parsed_files);

        let Some(entry) = index.lookup(attribute, None, None) else {
            return Err(match index.other_items.get(attribute) {
                Some(kind) => Error::NotAnApplication {
                    target: target.to_string(),
                    found: kind.to_string(),
                },
                None => Error::resolution(
                    target,
                    format!("crate {} has no function '{}'", root.display(), attribute),
                ),
            });
        };

        if !entry.item.sig.inputs.is_empty() {
            // Calling it without arguments fails, so it stays a plain function
            return Err(Error::NotAnApplication {
                target: target.to_string(),
                found: "function".to_string(),
            });
        }
        if !returns_router(&entry.item.sig.output) {
            return Err(Error::NotAnApplication {
                target: target.to_string(),
                found: return_type_name(&entry.item.sig.output),
            });
        }

        Ok(Self {
            root: root.to_path_buf(),
            entry: attribute.to_string(),
            index,
        })
    }
}

impl RouteProvider for AxumProvider {
    fn describe(&self) -> String {
        format!("axum crate {} ({})", self.root.display(), self.entry)
    }

    fn routes(&self) -> Result<Vec<RouteDescriptor>> {
        let mut walker = RouterWalker::new(&self.index);
        if let Some(entry) = self.index.lookup(&self.entry, None, None) {
            walker.walk_function(&self.entry, entry, "");
        }
        debug!("Found {} axum routes", walker.routes.len());
        Ok(walker.routes)
    }
}

/// Local `let` bindings visible at a point of a function body
type Scope<'a> = Vec<(String, &'a Expr)>;

/// Walks router-building code and records the routes it registers
struct RouterWalker<'a> {
    index: &'a FunctionIndex,
    routes: Vec<RouteDescriptor>,
    stack: Vec<String>,
}

impl<'a> RouterWalker<'a> {
    fn new(index: &'a FunctionIndex) -> Self {
        Self {
            index,
            routes: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn walk_function(&mut self, name: &str, entry: &'a FunctionEntry, prefix: &str) {
        if self.stack.iter().any(|n| n == name) || self.stack.len() >= MAX_NESTING {
            warn!("Not following recursive router function {}", name);
            return;
        }
        debug!("Walking router function {} under '{}'", name, prefix);
        self.stack.push(name.to_string());
        self.walk_block(&entry.item.block, prefix, entry.module.as_deref(), Vec::new());
        self.stack.pop();
    }

    fn walk_block(&mut self, block: &'a Block, prefix: &str, module: Option<&'a str>, mut scope: Scope<'a>) {
        let mut result = None;
        for stmt in &block.stmts {
            match stmt {
                Stmt::Local(local) => {
                    if let (Some(name), Some(init)) = (binding_name(&local.pat), &local.init) {
                        scope.push((name, &*init.expr));
                    }
                }
                Stmt::Expr(Expr::Return(ret), _) => {
                    result = ret.expr.as_deref();
                }
                Stmt::Expr(expr, None) => result = Some(expr),
                _ => {}
            }
        }
        if let Some(expr) = result {
            self.walk_expr(expr, prefix, module, &scope);
        }
    }

    fn walk_expr(&mut self, expr: &'a Expr, prefix: &str, module: Option<&'a str>, scope: &[(String, &'a Expr)]) {
        match expr {
            Expr::MethodCall(call) => {
                self.walk_expr(&call.receiver, prefix, module, scope);
                match call.method.to_string().as_str() {
                    "route" => self.add_route(call, prefix, module, scope),
                    "nest" => {
                        if let (Some(path), Some(router)) =
                            (call.args.first().and_then(string_literal), call.args.get(1))
                        {
                            self.walk_expr(router, &join_paths(prefix, &path), module, scope);
                        }
                    }
                    "merge" => {
                        if let Some(router) = call.args.first() {
                            self.walk_expr(router, prefix, module, scope);
                        }
                    }
                    "nest_service" => self.add_static(call, prefix),
                    _ => {}
                }
            }
            Expr::Call(call) => {
                let Expr::Path(func) = &*call.func else {
                    return;
                };
                let Some(name) = func.path.segments.last().map(|s| s.ident.to_string()) else {
                    return;
                };
                if name == "Ok" && call.args.len() == 1 {
                    if let Some(router) = call.args.first() {
                        self.walk_expr(router, prefix, module, scope);
                    }
                    return;
                }
                if !call.args.is_empty() || name == "new" || name == "default" {
                    return;
                }
                let qualifier = path_qualifier(&func.path);
                if let Some(entry) = self.index.lookup(&name, qualifier.as_deref(), module) {
                    if returns_router(&entry.item.sig.output) {
                        self.walk_function(&name, entry, prefix);
                    }
                }
            }
            Expr::Path(path) => {
                let Some(ident) = path.path.get_ident().map(|i| i.to_string()) else {
                    return;
                };
                if let Some(position) = scope.iter().rposition(|(name, _)| *name == ident) {
                    let bound = scope[position].1;
                    self.walk_expr(bound, prefix, module, &scope[..position]);
                }
            }
            Expr::Paren(inner) => self.walk_expr(&inner.expr, prefix, module, scope),
            Expr::Await(inner) => self.walk_expr(&inner.base, prefix, module, scope),
            Expr::Try(inner) => self.walk_expr(&inner.expr, prefix, module, scope),
            Expr::Block(inner) => self.walk_block(&inner.block, prefix, module, scope.to_vec()),
            _ => {}
        }
    }

    /// `.route(path, get(a).post(b))`: one route per handler
    fn add_route(
        &mut self,
        call: &'a ExprMethodCall,
        prefix: &str,
        module: Option<&'a str>,
        scope: &[(String, &'a Expr)],
    ) {
        let Some(path) = call.args.first().and_then(string_literal) else {
            debug!("Skipping route with a non-literal path");
            return;
        };
        let Some(method_router) = call.args.get(1) else {
            return;
        };
        let rule = normalize_path(&join_paths(prefix, &path));

        let mut handlers: Vec<(Option<&'a Expr>, Vec<HttpMethod>)> = Vec::new();
        let mut pairs = Vec::new();
        collect_method_handlers(method_router, scope, &mut pairs);
        if pairs.is_empty() {
            warn!("Unknown method router for route {}, skipping it", rule);
            return;
        }
        for (method, handler) in pairs {
            let key = handler.and_then(handler_key);
            match handlers
                .iter_mut()
                .find(|(h, _)| key.is_some() && h.and_then(handler_key) == key)
            {
                Some((_, methods)) => methods.push(method),
                None => handlers.push((handler, vec![method])),
            }
        }

        for (handler, mut methods) in handlers {
            if methods.contains(&HttpMethod::Get) {
                methods.push(HttpMethod::Head);
            }
            let route = self.describe_handler(handler, module, rule.clone(), methods);
            debug!("Found route {} -> {}", route.rule, route.endpoint);
            self.routes.push(route);
        }
    }

    fn describe_handler(
        &self,
        handler: Option<&'a Expr>,
        module: Option<&'a str>,
        rule: String,
        methods: Vec<HttpMethod>,
    ) -> RouteDescriptor {
        let Some(Expr::Path(path)) = handler else {
            return RouteDescriptor::new("anonymous", rule, methods);
        };
        let Some(name) = path.path.segments.last().map(|s| s.ident.to_string()) else {
            return RouteDescriptor::new("anonymous", rule, methods);
        };
        let qualifier = path_qualifier(&path.path);

        match self.index.lookup(&name, qualifier.as_deref(), module) {
            Some(entry) => {
                let endpoint = match &entry.module {
                    Some(m) => format!("{}.{}", m, name),
                    None => name.clone(),
                };
                let handler = AxumHandler {
                    name,
                    doc: doc_comment(&entry.item.attrs),
                };
                RouteDescriptor::new(endpoint, rule, methods).with_handler(Box::new(handler))
            }
            None => {
                warn!("Unknown handler: {}", name);
                let endpoint = match qualifier {
                    Some(q) => format!("{}.{}", q, name),
                    None => name,
                };
                RouteDescriptor::new(endpoint, rule, methods)
            }
        }
    }

    /// `.nest_service(path, ServeDir::new(..))`: the static-files route
    fn add_static(&mut self, call: &ExprMethodCall, prefix: &str) {
        let Some(path) = call.args.first().and_then(string_literal) else {
            return;
        };
        if !call.args.get(1).is_some_and(serves_directory) {
            debug!("Skipping non-directory service at {}", path);
            return;
        }
        let base = normalize_path(&join_paths(prefix, &path));
        let rule = format!("{}/<path:filename>", base.trim_end_matches('/'));
        debug!("Found static route {}", rule);
        self.routes.push(RouteDescriptor::new(
            STATIC_ENDPOINT,
            rule,
            vec![HttpMethod::Get, HttpMethod::Head],
        ));
    }
}

/// Pairs of (method, handler) from a method router like `get(a).post(b)`.
///
/// Method routers bound to locals are looked up in `scope`.
fn collect_method_handlers<'a>(
    expr: &'a Expr,
    scope: &[(String, &'a Expr)],
    out: &mut Vec<(HttpMethod, Option<&'a Expr>)>,
) {
    match expr {
        Expr::Call(call) => {
            if let Expr::Path(func) = &*call.func {
                if let Some(segment) = func.path.segments.last() {
                    push_method_handlers(&segment.ident.to_string(), &call.args, out);
                }
            }
        }
        Expr::MethodCall(call) => {
            collect_method_handlers(&call.receiver, scope, out);
            push_method_handlers(&call.method.to_string(), &call.args, out);
        }
        Expr::Path(path) => {
            let Some(ident) = path.path.get_ident().map(|i| i.to_string()) else {
                return;
            };
            if let Some(position) = scope.iter().rposition(|(name, _)| *name == ident) {
                collect_method_handlers(scope[position].1, &scope[..position], out);
            }
        }
        Expr::Paren(inner) => collect_method_handlers(&inner.expr, scope, out),
        _ => {}
    }
}

/// One method-router call: `get(h)`, `get_service(s)`, `any(h)` or `on(filter, h)`
fn push_method_handlers<'a>(
    name: &str,
    args: &'a Punctuated<Expr, Token![,]>,
    out: &mut Vec<(HttpMethod, Option<&'a Expr>)>,
) {
    let name = name.strip_suffix("_service").unwrap_or(name);
    match name {
        "any" => out.extend(
            METHODS_ORDER
                .iter()
                .map(|method| (HttpMethod::parse(method), args.first())),
        ),
        "on" => {
            let mut methods = Vec::new();
            if let Some(filter) = args.first() {
                collect_method_filter(filter, &mut methods);
            }
            let handler = args.get(1);
            out.extend(methods.into_iter().map(|method| (method, handler)));
        }
        _ => {
            if let Some(method) = router_method(name) {
                out.push((method, args.first()));
            }
        }
    }
}

/// Methods of a `MethodFilter` expression such as `MethodFilter::GET.or(MethodFilter::POST)`
fn collect_method_filter(expr: &Expr, out: &mut Vec<HttpMethod>) {
    match expr {
        Expr::Path(path) => {
            if let Some(segment) = path.path.segments.last() {
                out.push(HttpMethod::parse(&segment.ident.to_string()));
            }
        }
        Expr::MethodCall(call) if call.method == "or" => {
            collect_method_filter(&call.receiver, out);
            for arg in &call.args {
                collect_method_filter(arg, out);
            }
        }
        Expr::Binary(binary) if matches!(binary.op, BinOp::BitOr(_)) => {
            collect_method_filter(&binary.left, out);
            collect_method_filter(&binary.right, out);
        }
        Expr::Paren(inner) => collect_method_filter(&inner.expr, out),
        _ => {}
    }
}

fn router_method(name: &str) -> Option<HttpMethod> {
    METHOD_ROUTERS
        .iter()
        .find(|(router, _)| *router == name)
        .map(|(_, method)| HttpMethod::parse(method))
}

/// Identity of a handler expression, so `get(h).post(h)` yields one route
fn handler_key(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Path(path) => Some(
            path.path
                .segments
                .iter()
                .map(|s| s.ident.to_string())
                .collect::<Vec<_>>()
                .join("::"),
        ),
        _ => None,
    }
}

/// Module named right before the last path segment, ignoring `crate`/`self`/`super`
fn path_qualifier(path: &syn::Path) -> Option<String> {
    let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
    if segments.len() < 2 {
        return None;
    }
    let qualifier = &segments[segments.len() - 2];
    match qualifier.as_str() {
        "crate" | "self" | "super" => None,
        _ => Some(qualifier.clone()),
    }
}

fn binding_name(pat: &Pat) -> Option<String> {
    match pat {
        Pat::Ident(ident) => Some(ident.ident.to_string()),
        Pat::Type(typed) => binding_name(&typed.pat),
        _ => None,
    }
}

fn string_literal(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(lit_str) => Some(lit_str.value()),
            _ => None,
        },
        _ => None,
    }
}

fn serves_directory(expr: &Expr) -> bool {
    match expr {
        Expr::Call(call) => match &*call.func {
            Expr::Path(func) => func.path.segments.iter().any(|s| s.ident == "ServeDir"),
            _ => false,
        },
        Expr::MethodCall(call) => serves_directory(&call.receiver),
        Expr::Paren(inner) => serves_directory(&inner.expr),
        _ => false,
    }
}

/// Concatenated `///` lines of an item, as written
fn doc_comment(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => string_literal(&nv.value),
            _ => None,
        })
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Name of the last segment of a type path, `Router` for `axum::Router`
fn type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) => type_path.path.segments.last().map(|s| s.ident.to_string()),
        Type::Paren(inner) => type_name(&inner.elem),
        _ => None,
    }
}

/// `Router`, `axum::Router`, `Router<AppState>` or a `Result` of one
fn returns_router(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    if type_name(ty).as_deref() == Some("Router") {
        return true;
    }
    let Type::Path(type_path) = &**ty else {
        return false;
    };
    let Some(segment) = type_path.path.segments.last() else {
        return false;
    };
    if segment.ident != "Result" {
        return false;
    }
    match &segment.arguments {
        syn::PathArguments::AngleBracketed(args) => matches!(
            args.args.first(),
            Some(syn::GenericArgument::Type(ok)) if type_name(ok).as_deref() == Some("Router")
        ),
        _ => false,
    }
}

fn return_type_name(output: &ReturnType) -> String {
    match output {
        ReturnType::Default => "()".to_string(),
        ReturnType::Type(_, ty) => type_name(ty).unwrap_or_else(|| "unknown".to_string()),
    }
}

/// Combine a prefix and path, handling slashes correctly
fn join_paths(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        return path.to_string();
    }

    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        prefix.to_string()
    } else {
        format!("{}/{}", prefix, path)
    }
}

/// Rewrite axum path parameters into `<name>` placeholders.
///
/// `:id` and `{id}` become `<id>`; wildcards `*rest` and `{*rest}` become `<path:rest>`.
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                format!("<{}>", name)
            } else if let Some(name) = segment.strip_prefix('*') {
                format!("<path:{}>", name)
            } else if let Some(inner) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                match inner.strip_prefix('*') {
                    Some(name) => format!("<path:{}>", name),
                    None => format!("<{}>", inner),
                }
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_code(path: &str, module: Option<&str>, code: &str) -> ParsedFile {
        let syntax_tree = syn::parse_file(code).expect("Failed to parse test code");
        ParsedFile {
            path: PathBuf::from(path),
            module: module.map(str::to_string),
            syntax_tree,
        }
    }

    fn routes_of(files: Vec<ParsedFile>, entry: &str) -> Vec<RouteDescriptor> {
        AxumProvider::from_parsed("app.app", Path::new("app"), files, entry)
            .unwrap()
            .routes()
            .unwrap()
    }

    fn methods(route: &RouteDescriptor) -> Vec<&str> {
        route.methods.iter().map(|m| m.as_str()).collect()
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/users/:id"), "/users/<id>");
        assert_eq!(normalize_path("/users/{id}/posts"), "/users/<id>/posts");
        assert_eq!(normalize_path("/files/*rest"), "/files/<path:rest>");
        assert_eq!(normalize_path("/files/{*rest}"), "/files/<path:rest>");
        assert_eq!(normalize_path("/health"), "/health");
    }

    #[test]
    fn test_join_paths() {
        assert_eq!(join_paths("", "/users"), "/users");
        assert_eq!(join_paths("/api/", "/users"), "/api/users");
        assert_eq!(join_paths("/api", "/"), "/api");
    }

    #[test]
    fn test_simple_route() {
        let code = r#"
            use axum::{Router, routing::get};

            /// Liveness check.
            async fn health() -> &'static str { "ok" }

            fn app() -> Router {
                Router::new().route("/health", get(health))
            }
        "#;
        let routes = routes_of(vec![parse_code("src/main.rs", None, code)], "app");

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].endpoint, "health");
        assert_eq!(routes[0].rule, "/health");
        assert_eq!(methods(&routes[0]), vec!["GET", "HEAD"]);
        assert_eq!(routes[0].docstring(), Some(" Liveness check."));
        assert_eq!(routes[0].view_name(), Some("health"));
    }

    #[test]
    fn test_chained_method_router() {
        let code = r#"
            use axum::{Router, routing::{get, post}};
            async fn list_users() {}
            async fn create_user() {}
            async fn user() {}

            pub fn app() -> Router {
                Router::new()
                    .route("/users", get(list_users).post(create_user))
                    .route("/users/:user_id", get(user).put(user).delete(user))
            }
        "#;
        let routes = routes_of(vec![parse_code("src/lib.rs", None, code)], "app");

        let summary: Vec<_> = routes
            .iter()
            .map(|r| (r.endpoint.as_str(), r.rule.as_str(), methods(r)))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("list_users", "/users", vec!["GET", "HEAD"]),
                ("create_user", "/users", vec!["POST"]),
                ("user", "/users/<user_id>", vec!["GET", "PUT", "DELETE", "HEAD"]),
            ]
        );
    }

    #[test]
    fn test_nested_router_in_other_module() {
        let main = r#"
            use axum::Router;
            fn app() -> Router {
                let api = Router::new().nest("/blog", blog::router());
                Router::new().nest("/api", api)
            }
        "#;
        let blog = r#"
            use axum::{Router, routing::get};
            /// List every post.
            pub async fn list_posts() {}
            pub async fn create_post() {}
            pub fn router() -> Router {
                Router::new().route("/posts", get(list_posts).post(create_post))
            }
        "#;
        let routes = routes_of(
            vec![
                parse_code("src/main.rs", None, main),
                parse_code("src/blog.rs", Some("blog"), blog),
            ],
            "app",
        );

        let endpoints: Vec<_> = routes.iter().map(|r| r.endpoint.as_str()).collect();
        assert_eq!(endpoints, vec!["blog.list_posts", "blog.create_post"]);
        assert!(routes.iter().all(|r| r.rule == "/api/blog/posts"));
        assert_eq!(routes[0].docstring(), Some(" List every post."));
    }

    #[test]
    fn test_rebound_locals_and_merge() {
        let code = r#"
            use axum::{Router, routing::get};
            async fn index() {}
            async fn about() {}
            fn pages() -> Router { Router::new().route("/about", get(about)) }
            fn app() -> Router {
                let app = Router::new();
                let app = app.route("/", get(index));
                let app = app.merge(pages());
                return app;
            }
        "#;
        let routes = routes_of(vec![parse_code("src/main.rs", None, code)], "app");
        let rules: Vec<_> = routes.iter().map(|r| r.rule.as_str()).collect();
        assert_eq!(rules, vec!["/", "/about"]);
    }

    #[test]
    fn test_inline_module_handlers() {
        let code = r#"
            use axum::{Router, routing::get};
            mod admin {
                pub async fn list_accounts() {}
            }
            fn app() -> Router {
                Router::new().route("/admin/accounts", get(admin::list_accounts))
            }
        "#;
        let routes = routes_of(vec![parse_code("src/main.rs", None, code)], "app");
        assert_eq!(routes[0].endpoint, "admin.list_accounts");
    }

    #[test]
    fn test_static_service() {
        let code = r#"
            use axum::Router;
            use tower_http::services::ServeDir;
            fn app() -> Router {
                Router::new()
                    .nest_service("/static", ServeDir::new("assets"))
                    .nest_service("/metrics", metrics_service())
            }
        "#;
        let routes = routes_of(vec![parse_code("src/main.rs", None, code)], "app");

        assert_eq!(routes.len(), 1);
        assert!(routes[0].is_static());
        assert_eq!(routes[0].rule, "/static/<path:filename>");
        assert_eq!(methods(&routes[0]), vec!["GET", "HEAD"]);
    }

    #[test]
    fn test_unknown_handler_keeps_qualifier() {
        let code = r#"
            use axum::{Router, routing::post};
            fn app() -> Router {
                Router::new().route("/login", post(auth::login))
            }
        "#;
        let routes = routes_of(vec![parse_code("src/main.rs", None, code)], "app");
        assert_eq!(routes[0].endpoint, "auth.login");
        assert!(routes[0].handler.is_none());
    }

    #[test]
    fn test_recursive_router_terminates() {
        let code = r#"
            use axum::{Router, routing::get};
            async fn index() {}
            fn app() -> Router {
                Router::new().route("/", get(index)).nest("/again", app())
            }
        "#;
        let routes = routes_of(vec![parse_code("src/main.rs", None, code)], "app");
        assert_eq!(routes.len(), 1);
    }

    #[test]
    fn test_result_of_router_is_accepted() {
        let code = r#"
            use axum::{Router, routing::get};
            async fn index() {}
            async fn build() -> anyhow::Result<Router> {
                Ok(Router::new().route("/", get(index)))
            }
        "#;
        let routes = routes_of(vec![parse_code("src/main.rs", None, code)], "build");
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].endpoint, "index");
    }

    #[test]
    fn test_resolution_errors() {
        let code = r#"
            use axum::Router;
            const APP: &str = "app";
            fn with_state(state: u32) -> Router { Router::new() }
            fn version() -> String { String::new() }
        "#;
        let load = |entry: &str| {
            AxumProvider::from_parsed(
                &format!("app.{}", entry),
                Path::new("app"),
                vec![parse_code("src/main.rs", None, code)],
                entry,
            )
            .unwrap_err()
        };

        assert!(matches!(load("missing"), Error::Resolution { .. }));
        assert!(matches!(load("APP"), Error::NotAnApplication { ref found, .. } if found == "const"));
        assert!(matches!(load("with_state"), Error::NotAnApplication { ref found, .. } if found == "function"));
        assert!(matches!(load("version"), Error::NotAnApplication { ref found, .. } if found == "String"));
    }

    #[test]
    fn test_any_answers_every_method() {
        let code = r#"
            use axum::{Router, routing::{any, get}};
            async fn index() {}
            /// Forward to the upstream service.
            async fn proxy() {}
            fn app() -> Router {
                Router::new().route("/", get(index)).route("/proxy", any(proxy))
            }
        "#;
        let routes = routes_of(vec![parse_code("src/main.rs", None, code)], "app");

        let rules: Vec<_> = routes.iter().map(|r| r.rule.as_str()).collect();
        assert_eq!(rules, vec!["/", "/proxy"]);
        assert_eq!(routes[1].endpoint, "proxy");
        assert_eq!(methods(&routes[1]), METHODS_ORDER.to_vec());
    }

    #[test]
    fn test_on_method_filter() {
        let code = r#"
            use axum::{Router, routing::{on, MethodFilter}};
            async fn upsert() {}
            async fn purge() {}
            fn app() -> Router {
                Router::new()
                    .route("/items", on(MethodFilter::PUT.or(MethodFilter::PATCH), upsert))
                    .route("/cache", on(MethodFilter::DELETE | MethodFilter::GET, purge))
            }
        "#;
        let routes = routes_of(vec![parse_code("src/main.rs", None, code)], "app");

        assert_eq!(routes.len(), 2);
        assert_eq!(methods(&routes[0]), vec!["PUT", "PATCH"]);
        assert_eq!(methods(&routes[1]), vec!["GET", "DELETE", "HEAD"]);
    }

    #[test]
    fn test_method_router_bound_to_local() {
        let code = r#"
            use axum::{Router, routing::get};
            async fn list() {}
            async fn create() {}
            fn app() -> Router {
                let users = get(list);
                let users = users.post(create);
                Router::new().route("/users", users)
            }
        "#;
        let routes = routes_of(vec![parse_code("src/main.rs", None, code)], "app");

        let summary: Vec<_> = routes.iter().map(|r| (r.endpoint.as_str(), methods(r))).collect();
        assert_eq!(
            summary,
            vec![("list", vec!["GET", "HEAD"]), ("create", vec!["POST"])]
        );
    }

    #[test]
    fn test_service_method_routers() {
        let code = r#"
            use axum::{Router, routing::get_service};
            use tower_http::services::ServeFile;
            fn app() -> Router {
                Router::new().route("/favicon.ico", get_service(ServeFile::new("favicon.ico")))
            }
        "#;
        let routes = routes_of(vec![parse_code("src/main.rs", None, code)], "app");

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].endpoint, "anonymous");
        assert_eq!(methods(&routes[0]), vec!["GET", "HEAD"]);
    }

    #[test]
    fn test_unknown_method_router_is_skipped() {
        let code = r#"
            use axum::{Router, routing::get};
            async fn index() {}
            fn app() -> Router {
                Router::new()
                    .route("/", get(index))
                    .route("/custom", build_method_router(index))
            }
        "#;
        let routes = routes_of(vec![parse_code("src/main.rs", None, code)], "app");
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].rule, "/");
    }

    #[test]
    fn test_load_crate_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let src = dir.path().join("src");
        std::fs::create_dir_all(src.join(".cache")).unwrap();
        std::fs::create_dir_all(dir.path().join("target")).unwrap();
        std::fs::write(
            src.join("main.rs"),
            "use axum::{Router, routing::get};\nasync fn index() {}\nfn app() -> Router { Router::new().route(\"/\", get(index)) }\n",
        )
        .unwrap();
        std::fs::write(src.join(".cache").join("broken.rs"), "fn app( {").unwrap();
        std::fs::write(dir.path().join("target").join("app.rs"), "fn app() {}").unwrap();

        let provider = AxumProvider::load("shop.app", dir.path(), "app").unwrap();
        let routes = provider.routes().unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].endpoint, "index");

        let empty = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            AxumProvider::load("empty.app", empty.path(), "app"),
            Err(Error::Resolution { .. })
        ));
    }
}
