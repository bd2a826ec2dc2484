use axum::{
    extract::Path,
    routing::{get, post},
    Router,
};

/// List every book in stock.
pub async fn list_books() -> &'static str {
    "[]"
}

/// Add a book to the catalogue.
pub async fn create_book() -> &'static str {
    "{}"
}

/// Fetch one book.
///
/// Returns 404 for unknown ids.
pub async fn get_book(Path(id): Path<u32>) -> String {
    id.to_string()
}

pub async fn delete_book(Path(id): Path<u32>) -> String {
    id.to_string()
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/:book_id", get(get_book).delete(delete_book))
}
