//! Genre request handlers

use axum::extract::{Path, RawForm, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde_json::json;

use crate::domain::GenreDraft;
use crate::forms::{FieldError, FormData, Validator};
use crate::infrastructure::AppState;

use super::{page, PageError};

fn parse_genre_form(form: &FormData) -> (GenreDraft, Vec<FieldError>) {
    let mut v = Validator::new(form);
    let name = v.required("name", "Genre name required");

    (GenreDraft { name }, v.into_errors())
}

pub async fn genre_list(State(state): State<AppState>) -> Result<Response, PageError> {
    let genres = state.genre_repo.find_all().await?;

    page(
        &state,
        "genre_list",
        json!({ "title": "Genre List", "genre_list": genres }),
    )
}

pub async fn genre_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, PageError> {
    let (genre, books) = tokio::try_join!(
        state.genre_repo.find_by_id(id),
        state.book_repo.find_by_genre(id),
    )?;

    let genre = genre.ok_or(PageError::NotFound("Genre not found"))?;

    page(
        &state,
        "genre_detail",
        json!({ "title": "Genre Detail", "genre": genre, "genre_books": books }),
    )
}

pub async fn genre_create_get(State(state): State<AppState>) -> Result<Response, PageError> {
    page(&state, "genre_form", json!({ "title": "Create Genre" }))
}

pub async fn genre_create_post(
    State(state): State<AppState>,
    RawForm(body): RawForm,
) -> Result<Response, PageError> {
    let form = FormData::parse(&body);
    let (draft, errors) = parse_genre_form(&form);

    if !errors.is_empty() {
        return page(
            &state,
            "genre_form",
            json!({ "title": "Create Genre", "genre": draft, "errors": errors }),
        );
    }

    // Uniqueness is by convention only: reuse an existing genre with the
    // same name instead of creating a duplicate.
    if let Some(existing) = state.genre_repo.find_by_name(&draft.name).await? {
        return Ok(Redirect::to(&existing.url()).into_response());
    }

    let genre = state.genre_repo.create(draft).await?;
    Ok(Redirect::to(&genre.url()).into_response())
}

pub async fn genre_update_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, PageError> {
    let genre = state
        .genre_repo
        .find_by_id(id)
        .await?
        .ok_or(PageError::NotFound("Genre not found"))?;

    page(
        &state,
        "genre_form",
        json!({ "title": "Update Genre", "genre": genre }),
    )
}

pub async fn genre_update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    RawForm(body): RawForm,
) -> Result<Response, PageError> {
    let form = FormData::parse(&body);
    let (draft, errors) = parse_genre_form(&form);

    if !errors.is_empty() {
        return page(
            &state,
            "genre_form",
            json!({ "title": "Update Genre", "genre": draft, "errors": errors }),
        );
    }

    let genre = state.genre_repo.update(id, draft).await?;
    Ok(Redirect::to(&genre.url()).into_response())
}

pub async fn genre_delete_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, PageError> {
    let (genre, books) = tokio::try_join!(
        state.genre_repo.find_by_id(id),
        state.book_repo.find_by_genre(id),
    )?;

    // Nothing to delete: back to the list rather than a 404.
    let Some(genre) = genre else {
        return Ok(Redirect::to("/catalog/genres").into_response());
    };

    page(
        &state,
        "genre_delete",
        json!({ "title": "Delete Genre", "genre": genre, "genre_books": books }),
    )
}

/// Target id comes from the form body (`genreid`), not the route — same
/// asymmetry as the author delete, preserved from the observed behavior.
pub async fn genre_delete_post(
    State(state): State<AppState>,
    RawForm(body): RawForm,
) -> Result<Response, PageError> {
    let form = FormData::parse(&body);
    let id: Option<i32> = form.value("genreid").and_then(|v| v.parse().ok());

    let Some(id) = id else {
        return Ok(Redirect::to("/catalog/genres").into_response());
    };

    let (genre, books) = tokio::try_join!(
        state.genre_repo.find_by_id(id),
        state.book_repo.find_by_genre(id),
    )?;

    match genre {
        // Dependents block the delete; show them again.
        Some(genre) if !books.is_empty() => page(
            &state,
            "genre_delete",
            json!({ "title": "Delete Genre", "genre": genre, "genre_books": books }),
        ),
        Some(_) => {
            state.genre_repo.delete(id).await?;
            Ok(Redirect::to("/catalog/genres").into_response())
        }
        None => Ok(Redirect::to("/catalog/genres").into_response()),
    }
}
