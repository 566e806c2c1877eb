//! Author request handlers

use axum::extract::{Path, RawForm, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde_json::json;

use crate::domain::AuthorDraft;
use crate::forms::{FieldError, FormData, Validator};
use crate::infrastructure::AppState;

use super::{page, PageError};

/// Validate and sanitize an author submission. The draft comes back fully
/// sanitized even when there are errors, so it can repopulate the form.
fn parse_author_form(form: &FormData) -> (AuthorDraft, Vec<FieldError>) {
    let mut v = Validator::new(form);
    let first_name = v.name("first_name", "First name");
    let family_name = v.name("family_name", "Family name");
    let date_of_birth = v.optional_date("date_of_birth", "Invalid date of birth.");
    let date_of_death = v.optional_date("date_of_death", "Invalid date of death.");

    (
        AuthorDraft {
            first_name,
            family_name,
            date_of_birth,
            date_of_death,
        },
        v.into_errors(),
    )
}

pub async fn author_list(State(state): State<AppState>) -> Result<Response, PageError> {
    let authors = state.author_repo.find_all().await?;

    page(
        &state,
        "author_list",
        json!({ "title": "Author List", "author_list": authors }),
    )
}

pub async fn author_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, PageError> {
    let (author, books) = tokio::try_join!(
        state.author_repo.find_by_id(id),
        state.book_repo.find_by_author(id),
    )?;

    let author = author.ok_or(PageError::NotFound("Author not found"))?;

    page(
        &state,
        "author_detail",
        json!({ "title": "Author Detail", "author": author, "author_books": books }),
    )
}

pub async fn author_create_get(State(state): State<AppState>) -> Result<Response, PageError> {
    page(&state, "author_form", json!({ "title": "Create Author" }))
}

pub async fn author_create_post(
    State(state): State<AppState>,
    RawForm(body): RawForm,
) -> Result<Response, PageError> {
    let form = FormData::parse(&body);
    let (draft, errors) = parse_author_form(&form);

    if !errors.is_empty() {
        return page(
            &state,
            "author_form",
            json!({ "title": "Create Author", "author": draft, "errors": errors }),
        );
    }

    let author = state.author_repo.create(draft).await?;
    Ok(Redirect::to(&author.url()).into_response())
}

pub async fn author_update_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, PageError> {
    let author = state
        .author_repo
        .find_by_id(id)
        .await?
        .ok_or(PageError::NotFound("Author not found"))?;

    page(
        &state,
        "author_form",
        json!({ "title": "Update Author", "author": author }),
    )
}

pub async fn author_update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    RawForm(body): RawForm,
) -> Result<Response, PageError> {
    let form = FormData::parse(&body);
    let (draft, errors) = parse_author_form(&form);

    if !errors.is_empty() {
        return page(
            &state,
            "author_form",
            json!({ "title": "Update Author", "author": draft, "errors": errors }),
        );
    }

    let author = state.author_repo.update(id, draft).await?;
    Ok(Redirect::to(&author.url()).into_response())
}

pub async fn author_delete_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, PageError> {
    let (author, books) = tokio::try_join!(
        state.author_repo.find_by_id(id),
        state.book_repo.find_by_author(id),
    )?;

    // Nothing to delete: back to the list rather than a 404.
    let Some(author) = author else {
        return Ok(Redirect::to("/catalog/authors").into_response());
    };

    page(
        &state,
        "author_delete",
        json!({ "title": "Delete Author", "author": author, "author_books": books }),
    )
}

/// The confirmation form posts the target id in its body (`authorid`); the
/// route id is ignored here. Asymmetric with the GET on purpose, matching
/// the observed behavior — see DESIGN.md.
pub async fn author_delete_post(
    State(state): State<AppState>,
    RawForm(body): RawForm,
) -> Result<Response, PageError> {
    let form = FormData::parse(&body);
    let id: Option<i32> = form.value("authorid").and_then(|v| v.parse().ok());

    let Some(id) = id else {
        return Ok(Redirect::to("/catalog/authors").into_response());
    };

    let (author, books) = tokio::try_join!(
        state.author_repo.find_by_id(id),
        state.book_repo.find_by_author(id),
    )?;

    match author {
        // Dependents block the delete; show them again.
        Some(author) if !books.is_empty() => page(
            &state,
            "author_delete",
            json!({ "title": "Delete Author", "author": author, "author_books": books }),
        ),
        Some(_) => {
            state.author_repo.delete(id).await?;
            Ok(Redirect::to("/catalog/authors").into_response())
        }
        None => Ok(Redirect::to("/catalog/authors").into_response()),
    }
}
