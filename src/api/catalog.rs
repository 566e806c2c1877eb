//! Home page: site-wide record counts gathered in one concurrent pass.

use axum::extract::State;
use axum::response::Response;
use serde_json::json;

use crate::infrastructure::AppState;

use super::{page, PageError};

pub async fn index(State(state): State<AppState>) -> Result<Response, PageError> {
    let (book_count, book_instance_count, book_instance_available_count, author_count, genre_count) =
        tokio::try_join!(
            state.book_repo.count(),
            state.book_instance_repo.count(),
            state.book_instance_repo.count_available(),
            state.author_repo.count(),
            state.genre_repo.count(),
        )?;

    page(
        &state,
        "index",
        json!({
            "title": "Local Library Home",
            "data": {
                "book_count": book_count,
                "book_instance_count": book_instance_count,
                "book_instance_available_count": book_instance_available_count,
                "author_count": author_count,
                "genre_count": genre_count,
            },
        }),
    )
}
