//! Route table to collection conversion.

use crate::collection::Collection;
use crate::error::Result;
use crate::request::{Request, RequestOverrides};
use crate::route::RouteDescriptor;
use log::debug;

/// Default base of every generated URL
pub const DEFAULT_BASE_URL: &str = "{{base_url}}";

/// Options controlling which requests are generated and how they are grouped
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Collection name
    pub name: String,
    /// Prefix of every request URL
    pub base_url: String,
    /// Also generate OPTIONS and HEAD requests
    pub include_all_methods: bool,
    /// Also generate the static-files route
    pub include_static: bool,
    /// Put requests in one folder per endpoint namespace
    pub group_by_namespace: bool,
    /// Name requests after the handler's view name instead of the endpoint
    pub use_view_names: bool,
}

impl ConvertOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            include_all_methods: false,
            include_static: false,
            group_by_namespace: false,
            use_view_names: false,
        }
    }
}

/// Build a collection with one request per (route, method) pair.
///
/// Requests are added to the namespace folder (when grouping) and always to the
/// collection.
///
/// # Errors
///
/// Returns [`Error::MethodOrdering`](crate::error::Error::MethodOrdering) when a route
/// answers a method outside the canonical ordering.
pub fn build_collection(routes: &[RouteDescriptor], options: &ConvertOptions) -> Result<Collection> {
    let mut collection = Collection::new(options.name.clone());

    for route in routes {
        if route.is_static() && !options.include_static {
            debug!("Skipping static route {}", route.rule);
            continue;
        }

        let folder_name = if options.group_by_namespace {
            route.namespace()
        } else {
            None
        };

        for method in &route.methods {
            if method.is_implicit() && !options.include_all_methods {
                continue;
            }

            let overrides = RequestOverrides {
                name: if options.use_view_names {
                    route.view_name().map(str::to_string)
                } else {
                    None
                },
                ..Default::default()
            };
            let mut request = Request::from_route(route, method, &options.base_url, overrides);

            if let Some(folder_name) = folder_name {
                collection.get_folder(folder_name).add_request(&mut request)?;
            }
            collection.add_request(request)?;
        }
    }

    debug!(
        "Built collection with {} requests in {} folders",
        collection.requests().count(),
        collection.folders().len()
    );
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::route::{HandlerDocumentation, HttpMethod, MethodDocumentation};
    use std::collections::BTreeSet;

    #[derive(Debug)]
    struct View(&'static str);

    impl HandlerDocumentation for View {
        fn docstring(&self) -> Option<&str> {
            None
        }

        fn view_name(&self) -> Option<&str> {
            Some(self.0)
        }

        fn method_documentation(&self, _method: &str) -> Option<&MethodDocumentation> {
            None
        }
    }

    fn route(endpoint: &str, rule: &str, methods: &[HttpMethod]) -> RouteDescriptor {
        RouteDescriptor::new(endpoint, rule, methods.iter().cloned())
    }

    #[test]
    fn test_user_route_example() {
        let routes = vec![route(
            "users",
            "/users/<int:user_id>",
            &[HttpMethod::Post, HttpMethod::Get],
        )];
        let collection = build_collection(&routes, &ConvertOptions::new("api")).unwrap();

        let requests: Vec<_> = collection.requests().collect();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[1].method, HttpMethod::Post);
        for request in requests {
            assert_eq!(request.name, "users");
            assert_eq!(request.url, "{{base_url}}/users/{{user_id}}");
        }
        assert!(collection.folders().is_empty());
        assert_eq!(collection.order().len(), 2);
    }

    #[test]
    fn test_implicit_methods_are_filtered() {
        let all = [
            HttpMethod::Get,
            HttpMethod::Head,
            HttpMethod::Options,
            HttpMethod::Delete,
        ];
        let routes = vec![route("items", "/items", &all)];

        let collection = build_collection(&routes, &ConvertOptions::new("api")).unwrap();
        let methods: BTreeSet<_> = collection.requests().map(|r| r.method.clone()).collect();
        assert_eq!(methods, BTreeSet::from([HttpMethod::Get, HttpMethod::Delete]));

        let mut options = ConvertOptions::new("api");
        options.include_all_methods = true;
        let collection = build_collection(&routes, &options).unwrap();
        let methods: BTreeSet<_> = collection.requests().map(|r| r.method.clone()).collect();
        assert_eq!(methods, all.iter().cloned().collect::<BTreeSet<_>>());
    }

    #[test]
    fn test_static_route_needs_flag() {
        let routes = vec![
            route("static", "/static/<path:filename>", &[HttpMethod::Get]),
            route("index", "/", &[HttpMethod::Get]),
        ];

        let collection = build_collection(&routes, &ConvertOptions::new("api")).unwrap();
        assert_eq!(collection.requests().count(), 1);

        let mut options = ConvertOptions::new("api");
        options.include_static = true;
        let collection = build_collection(&routes, &options).unwrap();
        let urls: Vec<_> = collection.requests().map(|r| r.url.as_str()).collect();
        assert!(urls.contains(&"{{base_url}}/static/{{filename}}"));
    }

    #[test]
    fn test_group_by_namespace() {
        let routes = vec![
            route("blog.list_posts", "/posts", &[HttpMethod::Get]),
            route("blog.create_post", "/posts", &[HttpMethod::Post]),
            route("index", "/", &[HttpMethod::Get]),
        ];
        let mut options = ConvertOptions::new("api");
        options.group_by_namespace = true;

        let collection = build_collection(&routes, &options).unwrap();

        assert_eq!(collection.folders().len(), 1);
        let blog = &collection.folders()[0];
        assert_eq!(blog.name, "blog");
        assert_eq!(blog.len(), 2);

        let index_id = collection
            .requests()
            .find(|r| r.name == "index")
            .map(|r| r.id.clone())
            .unwrap();
        assert_eq!(collection.order(), vec![index_id]);
        assert!(blog.order().iter().all(|id| !collection.order().contains(id)));
        assert_eq!(collection.requests().count(), 3);
    }

    #[test]
    fn test_namespaces_ignored_without_grouping() {
        let routes = vec![route("blog.list_posts", "/posts", &[HttpMethod::Get])];
        let collection = build_collection(&routes, &ConvertOptions::new("api")).unwrap();
        assert!(collection.folders().is_empty());
        assert_eq!(collection.order().len(), 1);
    }

    #[test]
    fn test_view_names() {
        let routes = vec![route("users.get_user", "/users/<id>", &[HttpMethod::Get])
            .with_handler(Box::new(View("UserView")))];

        let collection = build_collection(&routes, &ConvertOptions::new("api")).unwrap();
        assert_eq!(collection.requests().next().unwrap().name, "user");

        let mut options = ConvertOptions::new("api");
        options.use_view_names = true;
        let collection = build_collection(&routes, &options).unwrap();
        assert_eq!(collection.requests().next().unwrap().name, "UserView");
    }

    #[test]
    fn test_custom_base_url() {
        let routes = vec![route("health", "/health", &[HttpMethod::Get])];
        let mut options = ConvertOptions::new("api");
        options.base_url = "https://api.example.com".to_string();

        let collection = build_collection(&routes, &options).unwrap();
        assert_eq!(
            collection.requests().next().unwrap().url,
            "https://api.example.com/health"
        );
    }

    #[test]
    fn test_unknown_method_aborts_conversion() {
        let routes = vec![route("debug", "/debug", &[HttpMethod::parse("TRACE")])];
        let err = build_collection(&routes, &ConvertOptions::new("api")).unwrap_err();
        assert!(matches!(err, Error::MethodOrdering { .. }));
    }
}
