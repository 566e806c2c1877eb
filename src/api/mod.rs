pub mod author;
pub mod book;
pub mod book_instance;
pub mod catalog;
pub mod error;
pub mod genre;

pub use error::PageError;

use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde_json::Value;

use crate::infrastructure::AppState;

/// Render `template` with its data bag through the configured view renderer.
pub(crate) fn page(
    state: &AppState,
    template: &'static str,
    bag: Value,
) -> Result<Response, PageError> {
    let body = state
        .renderer
        .render(template, &bag)
        .map_err(PageError::Internal)?;
    Ok(Html(body).into_response())
}

pub fn catalog_router(state: AppState) -> Router {
    Router::new()
        // Home
        .route("/", get(catalog::index))
        // Books
        .route("/books", get(book::book_list))
        .route(
            "/book/create",
            get(book::book_create_get).post(book::book_create_post),
        )
        .route("/book/:id", get(book::book_detail))
        .route(
            "/book/:id/update",
            get(book::book_update_get).post(book::book_update_post),
        )
        .route(
            "/book/:id/delete",
            get(book::book_delete_get).post(book::book_delete_post),
        )
        // Authors
        .route("/authors", get(author::author_list))
        .route(
            "/author/create",
            get(author::author_create_get).post(author::author_create_post),
        )
        .route("/author/:id", get(author::author_detail))
        .route(
            "/author/:id/update",
            get(author::author_update_get).post(author::author_update_post),
        )
        .route(
            "/author/:id/delete",
            get(author::author_delete_get).post(author::author_delete_post),
        )
        // Genres
        .route("/genres", get(genre::genre_list))
        .route(
            "/genre/create",
            get(genre::genre_create_get).post(genre::genre_create_post),
        )
        .route("/genre/:id", get(genre::genre_detail))
        .route(
            "/genre/:id/update",
            get(genre::genre_update_get).post(genre::genre_update_post),
        )
        .route(
            "/genre/:id/delete",
            get(genre::genre_delete_get).post(genre::genre_delete_post),
        )
        // Book instances
        .route("/bookinstances", get(book_instance::bookinstance_list))
        .route(
            "/bookinstance/create",
            get(book_instance::bookinstance_create_get)
                .post(book_instance::bookinstance_create_post),
        )
        .route("/bookinstance/:id", get(book_instance::bookinstance_detail))
        .route(
            "/bookinstance/:id/update",
            get(book_instance::bookinstance_update_get)
                .post(book_instance::bookinstance_update_post),
        )
        .route(
            "/bookinstance/:id/delete",
            get(book_instance::bookinstance_delete_get)
                .post(book_instance::bookinstance_delete_post),
        )
        .with_state(state)
}
