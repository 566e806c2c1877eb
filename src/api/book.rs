//! Book request handlers

use axum::extract::{Path, RawForm, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Serialize;
use serde_json::{json, Value};

use crate::domain::{BookDraft, Genre};
use crate::forms::{FieldError, FormData, Validator};
use crate::infrastructure::AppState;

use super::{page, PageError};

/// Sanitized book submission; also the echo value on a failed submit.
/// `author` stays optional here — a missing pick is a field error, and the
/// draft only exists once every error is resolved.
#[derive(Debug, Clone, Serialize)]
struct BookForm {
    title: String,
    author: Option<i32>,
    summary: String,
    isbn: String,
    genre: Vec<i32>,
}

fn parse_book_form(form: &FormData) -> (BookForm, Vec<FieldError>) {
    let mut v = Validator::new(form);
    // Multi-select normalization happens first: absent genre submissions
    // become an empty set before any field checks run.
    let genre = v.id_list("genre");
    let title = v.required("title", "Title must not be empty.");
    let author = v.selected_id("author", "Author must not be empty.");
    let summary = v.required("summary", "Summary must not be empty.");
    let isbn = v.required("isbn", "ISBN must not be empty.");

    (
        BookForm {
            title,
            author,
            summary,
            isbn,
            genre,
        },
        v.into_errors(),
    )
}

/// Genre option list for the form, with already-selected entries flagged.
fn genre_options(genres: &[Genre], selected: &[i32]) -> Vec<Value> {
    genres
        .iter()
        .map(|genre| {
            json!({
                "id": genre.id,
                "name": genre.name,
                "url": genre.url(),
                "checked": selected.contains(&genre.id),
            })
        })
        .collect()
}

pub async fn book_list(State(state): State<AppState>) -> Result<Response, PageError> {
    let books = state.book_repo.find_all().await?;

    page(
        &state,
        "book_list",
        json!({ "title": "Book List", "book_list": books }),
    )
}

pub async fn book_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, PageError> {
    let (book, instances) = tokio::try_join!(
        state.book_repo.find_by_id(id),
        state.book_instance_repo.find_by_book(id),
    )?;

    let book = book.ok_or(PageError::NotFound("Book not found"))?;

    page(
        &state,
        "book_detail",
        json!({ "title": book.title.clone(), "book": book, "book_instances": instances }),
    )
}

pub async fn book_create_get(State(state): State<AppState>) -> Result<Response, PageError> {
    let (authors, genres) = tokio::try_join!(
        state.author_repo.find_all(),
        state.genre_repo.find_all(),
    )?;

    page(
        &state,
        "book_form",
        json!({ "title": "Create Book", "authors": authors, "genres": genres }),
    )
}

pub async fn book_create_post(
    State(state): State<AppState>,
    RawForm(body): RawForm,
) -> Result<Response, PageError> {
    let form = FormData::parse(&body);
    let (book_form, errors) = parse_book_form(&form);

    match book_form.author {
        Some(author_id) if errors.is_empty() => {
            let draft = BookDraft {
                title: book_form.title,
                author_id,
                summary: book_form.summary,
                isbn: book_form.isbn,
                genre_ids: book_form.genre,
            };
            let book = state.book_repo.create(draft).await?;
            Ok(Redirect::to(&book.url()).into_response())
        }
        _ => {
            // Re-fetch the option lists and re-render with the sanitized
            // submission echoed back, selected genres still checked.
            let (authors, genres) = tokio::try_join!(
                state.author_repo.find_all(),
                state.genre_repo.find_all(),
            )?;

            page(
                &state,
                "book_form",
                json!({
                    "title": "Create Book",
                    "authors": authors,
                    "genres": genre_options(&genres, &book_form.genre),
                    "book": book_form,
                    "errors": errors,
                }),
            )
        }
    }
}

pub async fn book_update_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, PageError> {
    let (book, authors, genres) = tokio::try_join!(
        state.book_repo.find_by_id(id),
        state.author_repo.find_all(),
        state.genre_repo.find_all(),
    )?;

    let book = book.ok_or(PageError::NotFound("Book not found"))?;

    // Mark the book's own genres against the fetched option list.
    let selected: Vec<i32> = book.genres.iter().map(|g| g.id).collect();

    page(
        &state,
        "book_form",
        json!({
            "title": "Update Book",
            "authors": authors,
            "genres": genre_options(&genres, &selected),
            "book": book,
        }),
    )
}

pub async fn book_update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    RawForm(body): RawForm,
) -> Result<Response, PageError> {
    let form = FormData::parse(&body);
    let (book_form, errors) = parse_book_form(&form);

    match book_form.author {
        Some(author_id) if errors.is_empty() => {
            let draft = BookDraft {
                title: book_form.title,
                author_id,
                summary: book_form.summary,
                isbn: book_form.isbn,
                genre_ids: book_form.genre,
            };
            let book = state.book_repo.update(id, draft).await?;
            Ok(Redirect::to(&book.url()).into_response())
        }
        _ => {
            let (authors, genres) = tokio::try_join!(
                state.author_repo.find_all(),
                state.genre_repo.find_all(),
            )?;

            page(
                &state,
                "book_form",
                json!({
                    "title": "Update Book",
                    "authors": authors,
                    "genres": genre_options(&genres, &book_form.genre),
                    "book": book_form,
                    "errors": errors,
                }),
            )
        }
    }
}

// Book deletion is routed but has never been built; the stubs answer 501 so
// the gap stays visible instead of silently 404ing.

pub async fn book_delete_get() -> Response {
    (
        StatusCode::NOT_IMPLEMENTED,
        "NOT IMPLEMENTED: Book delete GET",
    )
        .into_response()
}

pub async fn book_delete_post() -> Response {
    (
        StatusCode::NOT_IMPLEMENTED,
        "NOT IMPLEMENTED: Book delete POST",
    )
        .into_response()
}
