//! BookInstance request handlers

use axum::extract::{Path, RawForm, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Serialize;
use serde_json::json;

use crate::domain::{BookInstanceDraft, Status};
use crate::forms::{FieldError, FormData, Validator};
use crate::infrastructure::AppState;

use super::{page, PageError};

/// Sanitized copy submission; also the echo value on a failed submit.
#[derive(Debug, Clone, Serialize)]
struct BookInstanceForm {
    book: Option<i32>,
    imprint: String,
    status: Option<Status>,
    due_back: Option<chrono::NaiveDate>,
}

fn parse_book_instance_form(form: &FormData) -> (BookInstanceForm, Vec<FieldError>) {
    let mut v = Validator::new(form);
    let book = v.selected_id("book", "Book must be specified.");
    let imprint = v.required("imprint", "Imprint must be specified.");
    let status = v.status("status", "Invalid status.");
    let due_back = v.optional_date("due_back", "Invalid date.");

    (
        BookInstanceForm {
            book,
            imprint,
            status,
            due_back,
        },
        v.into_errors(),
    )
}

pub async fn bookinstance_list(State(state): State<AppState>) -> Result<Response, PageError> {
    let instances = state.book_instance_repo.find_all().await?;

    page(
        &state,
        "bookinstance_list",
        json!({ "title": "Book Instance List", "bookinstance_list": instances }),
    )
}

pub async fn bookinstance_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, PageError> {
    let instance = state
        .book_instance_repo
        .find_by_id(id)
        .await?
        .ok_or(PageError::NotFound("Book copy not found"))?;

    let title = match &instance.book {
        Some(book) => format!("Copy: {}", book.title),
        None => "Copy".to_string(),
    };

    page(
        &state,
        "bookinstance_detail",
        json!({ "title": title, "bookinstance": instance }),
    )
}

pub async fn bookinstance_create_get(
    State(state): State<AppState>,
) -> Result<Response, PageError> {
    let books = state.book_repo.find_all().await?;

    page(
        &state,
        "bookinstance_form",
        json!({ "title": "Create BookInstance", "book_list": books }),
    )
}

pub async fn bookinstance_create_post(
    State(state): State<AppState>,
    RawForm(body): RawForm,
) -> Result<Response, PageError> {
    let form = FormData::parse(&body);
    let (instance_form, errors) = parse_book_instance_form(&form);

    match (instance_form.book, instance_form.status) {
        (Some(book_id), Some(status)) if errors.is_empty() => {
            let draft = BookInstanceDraft {
                book_id,
                imprint: instance_form.imprint,
                status,
                due_back: instance_form.due_back,
            };
            let instance = state.book_instance_repo.create(draft).await?;
            Ok(Redirect::to(&instance.url()).into_response())
        }
        _ => {
            let books = state.book_repo.find_all().await?;

            page(
                &state,
                "bookinstance_form",
                json!({
                    "title": "Create BookInstance",
                    "book_list": books,
                    "selected_book": instance_form.book,
                    "bookinstance": instance_form,
                    "errors": errors,
                }),
            )
        }
    }
}

pub async fn bookinstance_update_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, PageError> {
    let (instance, books) = tokio::try_join!(
        state.book_instance_repo.find_by_id(id),
        state.book_repo.find_all(),
    )?;

    let instance = instance.ok_or(PageError::NotFound("Book copy not found"))?;

    page(
        &state,
        "bookinstance_form",
        json!({
            "title": "Update BookInstance",
            "book_list": books,
            "selected_book": instance.book_id,
            "bookinstance": instance,
        }),
    )
}

pub async fn bookinstance_update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    RawForm(body): RawForm,
) -> Result<Response, PageError> {
    let form = FormData::parse(&body);
    let (instance_form, errors) = parse_book_instance_form(&form);

    match (instance_form.book, instance_form.status) {
        (Some(book_id), Some(status)) if errors.is_empty() => {
            let draft = BookInstanceDraft {
                book_id,
                imprint: instance_form.imprint,
                status,
                due_back: instance_form.due_back,
            };
            let instance = state.book_instance_repo.update(id, draft).await?;
            Ok(Redirect::to(&instance.url()).into_response())
        }
        _ => {
            let books = state.book_repo.find_all().await?;

            page(
                &state,
                "bookinstance_form",
                json!({
                    "title": "Update BookInstance",
                    "book_list": books,
                    "selected_book": instance_form.book,
                    "bookinstance": instance_form,
                    "errors": errors,
                }),
            )
        }
    }
}

// Copy deletion is routed but has never been built; the stubs answer 501 so
// the gap stays visible instead of silently 404ing.

pub async fn bookinstance_delete_get() -> Response {
    (
        StatusCode::NOT_IMPLEMENTED,
        "NOT IMPLEMENTED: BookInstance delete GET",
    )
        .into_response()
}

pub async fn bookinstance_delete_post() -> Response {
    (
        StatusCode::NOT_IMPLEMENTED,
        "NOT IMPLEMENTED: BookInstance delete POST",
    )
        .into_response()
}
