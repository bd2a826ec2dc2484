// Bookshop fixture - an axum application split over two modules
use axum::{routing::get, Router};
use tower_http::services::ServeDir;

mod books;

/// Landing page.
async fn index() -> &'static str {
    "bookshop"
}

fn app() -> Router {
    let api = Router::new().nest("/books", books::router());

    Router::new()
        .route("/", get(index))
        .nest("/api", api)
        .nest_service("/static", ServeDir::new("assets"))
}

#[tokio::main]
async fn main() {
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    axum::serve(listener, app()).await.unwrap();
}
