use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

use locallibrary::api;
use locallibrary::db;
use locallibrary::domain::{
    Author, AuthorDraft, Book, BookDraft, BookInstance, BookInstanceDraft, BookRepository,
    DomainError, Genre, GenreDraft, Status,
};
use locallibrary::infrastructure::AppState;

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    // In-memory SQLite for testing
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

async fn setup_test_state() -> AppState {
    AppState::new(setup_test_db().await)
}

// Mount the catalog router the same way main does
fn test_app(state: AppState) -> Router {
    Router::new().nest("/catalog", api::catalog_router(state))
}

// Helper to create a test author
async fn create_test_author(state: &AppState, first_name: &str, family_name: &str) -> Author {
    state
        .author_repo
        .create(AuthorDraft {
            first_name: first_name.to_string(),
            family_name: family_name.to_string(),
            date_of_birth: None,
            date_of_death: None,
        })
        .await
        .expect("Failed to create author")
}

// Helper to create a test genre
async fn create_test_genre(state: &AppState, name: &str) -> Genre {
    state
        .genre_repo
        .create(GenreDraft {
            name: name.to_string(),
        })
        .await
        .expect("Failed to create genre")
}

// Helper to create a test book
async fn create_test_book(
    state: &AppState,
    title: &str,
    author_id: i32,
    genre_ids: Vec<i32>,
) -> Book {
    state
        .book_repo
        .create(BookDraft {
            title: title.to_string(),
            author_id,
            summary: "A test summary".to_string(),
            isbn: "9781473211896".to_string(),
            genre_ids,
        })
        .await
        .expect("Failed to create book")
}

// Helper to create a test copy
async fn create_test_instance(state: &AppState, book_id: i32, status: Status) -> BookInstance {
    state
        .book_instance_repo
        .create(BookInstanceDraft {
            book_id,
            imprint: "London Gollancz, 2014.".to_string(),
            status,
            due_back: None,
        })
        .await
        .expect("Failed to create book instance")
}

// GET a page and decode the rendered data bag
async fn get_page(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .expect("Request failed");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, body)
}

// POST a urlencoded form and return the raw response
async fn post_form(app: &Router, uri: &str, body: &str) -> axum::http::Response<axum::body::Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .expect("Request failed")
}

fn location(response: &axum::http::Response<axum::body::Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Missing Location header")
        .to_str()
        .unwrap()
}

async fn page_body(response: axum::http::Response<axum::body::Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

#[tokio::test]
async fn index_dashboard_reports_counts() {
    let state = setup_test_state().await;
    let author = create_test_author(&state, "Isaac", "Asimov").await;
    let genre = create_test_genre(&state, "Science Fiction").await;
    let book = create_test_book(&state, "The Slip", author.id, vec![genre.id]).await;
    create_test_instance(&state, book.id, Status::Available).await;
    create_test_instance(&state, book.id, Status::Loaned).await;

    let app = test_app(state);
    let (status, body) = get_page(&app, "/catalog").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["template"], "index");
    assert_eq!(body["data"]["data"]["book_count"], 1);
    assert_eq!(body["data"]["data"]["book_instance_count"], 2);
    assert_eq!(body["data"]["data"]["book_instance_available_count"], 1);
    assert_eq!(body["data"]["data"]["author_count"], 1);
    assert_eq!(body["data"]["data"]["genre_count"], 1);
}

#[tokio::test]
async fn book_list_populates_author_and_tolerates_dangling_reference() {
    let state = setup_test_state().await;
    let author = create_test_author(&state, "Patrick", "Rothfuss").await;
    create_test_book(&state, "The Name of the Wind", author.id, vec![]).await;
    // Reference to an author that never existed: the book still lists.
    create_test_book(&state, "An Orphan Work", 9999, vec![]).await;

    let app = test_app(state);
    let (status, body) = get_page(&app, "/catalog/books").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["template"], "book_list");

    let books = body["data"]["book_list"].as_array().unwrap();
    assert_eq!(books.len(), 2);
    // Sorted by title
    assert_eq!(books[0]["title"], "An Orphan Work");
    assert!(books[0]["author"].is_null());
    assert_eq!(books[1]["author"]["name"], "Rothfuss, Patrick");
}

#[tokio::test]
async fn book_detail_unknown_id_is_not_found() {
    let state = setup_test_state().await;
    let app = test_app(state);

    let (status, body) = get_page(&app, "/catalog/book/9999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book not found");
}

#[tokio::test]
async fn book_detail_aggregates_instances() {
    let state = setup_test_state().await;
    let author = create_test_author(&state, "Ben", "Bova").await;
    let genre = create_test_genre(&state, "Science Fiction").await;
    let book = create_test_book(&state, "Apes and Angels", author.id, vec![genre.id]).await;
    create_test_instance(&state, book.id, Status::Available).await;
    create_test_instance(&state, book.id, Status::Maintenance).await;

    let app = test_app(state);
    let (status, body) = get_page(&app, &format!("/catalog/book/{}", book.id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["template"], "book_detail");
    assert_eq!(body["data"]["title"], "Apes and Angels");
    assert_eq!(body["data"]["book"]["author"]["name"], "Bova, Ben");
    assert_eq!(body["data"]["book"]["genres"][0]["name"], "Science Fiction");
    assert_eq!(body["data"]["book_instances"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn author_create_redirects_to_new_author() {
    let state = setup_test_state().await;
    let app = test_app(state.clone());

    let response = post_form(
        &app,
        "/catalog/author/create",
        "first_name=Jane&family_name=Austen&date_of_birth=1775-12-16&date_of_death=1817-07-18",
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response).to_string();
    assert!(target.starts_with("/catalog/author/"));

    let id: i32 = target.rsplit('/').next().unwrap().parse().unwrap();
    let author = state
        .author_repo
        .find_by_id(id)
        .await
        .unwrap()
        .expect("Author was not persisted");
    assert_eq!(author.name(), "Austen, Jane");
    assert_eq!(author.lifespan(), "Dec 16, 1775 - Jul 18, 1817");
}

#[tokio::test]
async fn author_create_rejects_missing_first_name_and_echoes_sanitized_fields() {
    let state = setup_test_state().await;
    let app = test_app(state.clone());

    let response = post_form(
        &app,
        "/catalog/author/create",
        "first_name=&family_name=Austen&date_of_birth=1775-12-16",
    )
    .await;

    // Validation failure is an ordinary page render, not an error.
    assert_eq!(response.status(), StatusCode::OK);
    let body = page_body(response).await;
    assert_eq!(body["template"], "author_form");

    let errors = body["data"]["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["field"], "first_name");
    assert_eq!(errors[0]["message"], "First name must be specified.");

    // The other fields echo back sanitized, ready to repopulate the form.
    assert_eq!(body["data"]["author"]["family_name"], "Austen");
    assert_eq!(body["data"]["author"]["date_of_birth"], "1775-12-16");

    // Nothing was persisted.
    assert_eq!(state.author_repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn genre_create_reuses_existing_genre_with_same_name() {
    let state = setup_test_state().await;
    let existing = create_test_genre(&state, "Fantasy").await;
    let app = test_app(state.clone());

    let response = post_form(&app, "/catalog/genre/create", "name=Fantasy").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), existing.url());
    assert_eq!(state.genre_repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn author_delete_blocked_by_dependent_books() {
    let state = setup_test_state().await;
    let author = create_test_author(&state, "Patrick", "Rothfuss").await;
    create_test_book(&state, "The Name of the Wind", author.id, vec![]).await;
    create_test_book(&state, "The Wise Man's Fear", author.id, vec![]).await;

    let app = test_app(state.clone());
    let response = post_form(
        &app,
        &format!("/catalog/author/{}/delete", author.id),
        &format!("authorid={}", author.id),
    )
    .await;

    // Blocked delete re-renders the confirmation view listing dependents.
    assert_eq!(response.status(), StatusCode::OK);
    let body = page_body(response).await;
    assert_eq!(body["template"], "author_delete");
    assert_eq!(body["data"]["author_books"].as_array().unwrap().len(), 2);

    // The author is still there.
    assert!(state
        .author_repo
        .find_by_id(author.id)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn author_delete_without_dependents_removes_record() {
    let state = setup_test_state().await;
    let author = create_test_author(&state, "Bob", "Billings").await;

    let app = test_app(state.clone());
    let response = post_form(
        &app,
        &format!("/catalog/author/{}/delete", author.id),
        &format!("authorid={}", author.id),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/authors");
    assert!(state
        .author_repo
        .find_by_id(author.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn author_delete_get_with_unknown_id_redirects_to_list() {
    let state = setup_test_state().await;
    let app = test_app(state);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/catalog/author/424242/delete")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/authors");
}

#[tokio::test]
async fn genre_delete_blocked_by_dependent_books() {
    let state = setup_test_state().await;
    let author = create_test_author(&state, "Isaac", "Asimov").await;
    let genre = create_test_genre(&state, "Science Fiction").await;
    create_test_book(&state, "The Slip", author.id, vec![genre.id]).await;

    let app = test_app(state.clone());
    let response = post_form(
        &app,
        &format!("/catalog/genre/{}/delete", genre.id),
        &format!("genreid={}", genre.id),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = page_body(response).await;
    assert_eq!(body["template"], "genre_delete");
    assert_eq!(body["data"]["genre_books"].as_array().unwrap().len(), 1);
    assert!(state
        .genre_repo
        .find_by_id(genre.id)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn update_preserves_identity() {
    let state = setup_test_state().await;
    let author = create_test_author(&state, "Jane", "Austin").await;

    let app = test_app(state.clone());
    let response = post_form(
        &app,
        &format!("/catalog/author/{}/update", author.id),
        "first_name=Jane&family_name=Austen",
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), author.url());

    let updated = state
        .author_repo
        .find_by_id(author.id)
        .await
        .unwrap()
        .expect("Author vanished on update");
    assert_eq!(updated.id, author.id);
    assert_eq!(updated.family_name, "Austen");
}

#[tokio::test]
async fn persisted_values_are_sanitized_not_raw() {
    let state = setup_test_state().await;
    let author = create_test_author(&state, "Tom", "Jones").await;

    let app = test_app(state.clone());
    let response = post_form(
        &app,
        "/catalog/book/create",
        &format!(
            "title=Tom+%26+Jerry+%3Cb%3E&author={}&summary=Loud+%22noises%22&isbn=123",
            author.id
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response).to_string();
    let id: i32 = target.rsplit('/').next().unwrap().parse().unwrap();

    let book = state
        .book_repo
        .find_by_id(id)
        .await
        .unwrap()
        .expect("Book was not persisted");
    assert_eq!(book.title, "Tom &amp; Jerry &lt;b&gt;");
    assert_eq!(book.summary, "Loud &quot;noises&quot;");
}

#[tokio::test]
async fn book_create_validation_reloads_options_with_checked_genres() {
    let state = setup_test_state().await;
    create_test_author(&state, "Patrick", "Rothfuss").await;
    let fantasy = create_test_genre(&state, "Fantasy").await;
    let poetry = create_test_genre(&state, "French Poetry").await;

    let app = test_app(state);
    // Title intentionally missing; one genre picked.
    let response = post_form(
        &app,
        "/catalog/book/create",
        &format!("title=&author=&summary=s&isbn=i&genre={}", fantasy.id),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = page_body(response).await;
    assert_eq!(body["template"], "book_form");

    let errors = body["data"]["errors"].as_array().unwrap();
    assert!(errors.iter().any(|e| e["field"] == "title"));
    assert!(errors.iter().any(|e| e["field"] == "author"));

    // The selected genre stays checked in the re-rendered option list.
    let genres = body["data"]["genres"].as_array().unwrap();
    let checked: Vec<&Value> = genres.iter().filter(|g| g["checked"] == true).collect();
    assert_eq!(checked.len(), 1);
    assert_eq!(checked[0]["id"], fantasy.id);
    assert!(genres
        .iter()
        .any(|g| g["id"] == poetry.id && g["checked"] == false));
}

#[tokio::test]
async fn book_update_get_marks_current_genres_selected() {
    let state = setup_test_state().await;
    let author = create_test_author(&state, "Patrick", "Rothfuss").await;
    let fantasy = create_test_genre(&state, "Fantasy").await;
    let poetry = create_test_genre(&state, "French Poetry").await;
    let book = create_test_book(&state, "The Name of the Wind", author.id, vec![fantasy.id]).await;

    let app = test_app(state);
    let (status, body) = get_page(&app, &format!("/catalog/book/{}/update", book.id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["template"], "book_form");

    let genres = body["data"]["genres"].as_array().unwrap();
    assert!(genres
        .iter()
        .any(|g| g["id"] == fantasy.id && g["checked"] == true));
    assert!(genres
        .iter()
        .any(|g| g["id"] == poetry.id && g["checked"] == false));
}

#[tokio::test]
async fn bookinstance_create_flags_bad_date_then_accepts_valid_submission() {
    let state = setup_test_state().await;
    let author = create_test_author(&state, "Ben", "Bova").await;
    let book = create_test_book(&state, "Apes and Angels", author.id, vec![]).await;

    let app = test_app(state.clone());

    let response = post_form(
        &app,
        "/catalog/bookinstance/create",
        &format!(
            "book={}&imprint=Gollancz%2C+2011.&status=Loaned&due_back=next+tuesday",
            book.id
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = page_body(response).await;
    assert_eq!(body["template"], "bookinstance_form");
    let errors = body["data"]["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["field"], "due_back");

    let response = post_form(
        &app,
        "/catalog/bookinstance/create",
        &format!(
            "book={}&imprint=Gollancz%2C+2011.&status=Loaned&due_back=2026-09-14",
            book.id
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response).to_string();
    let id: i32 = target.rsplit('/').next().unwrap().parse().unwrap();

    let instance = state
        .book_instance_repo
        .find_by_id(id)
        .await
        .unwrap()
        .expect("Instance was not persisted");
    assert_eq!(instance.status, Status::Loaned);
    assert_eq!(instance.due_back_formatted(), "Sep 14, 2026");
    assert_eq!(
        instance.book.as_ref().map(|b| b.title.as_str()),
        Some("Apes and Angels")
    );
}

#[tokio::test]
async fn bookinstance_list_populates_books() {
    let state = setup_test_state().await;
    let author = create_test_author(&state, "Patrick", "Rothfuss").await;
    let book = create_test_book(&state, "The Name of the Wind", author.id, vec![]).await;
    create_test_instance(&state, book.id, Status::Reserved).await;

    let app = test_app(state);
    let (status, body) = get_page(&app, "/catalog/bookinstances").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["template"], "bookinstance_list");
    let instances = body["data"]["bookinstance_list"].as_array().unwrap();
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0]["status"], "Reserved");
    assert_eq!(instances[0]["book"]["title"], "The Name of the Wind");
}

#[tokio::test]
async fn book_delete_routes_answer_not_implemented() {
    let state = setup_test_state().await;
    let app = test_app(state);

    let (status, _) = get_page(&app, "/catalog/book/1/delete").await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);

    let response = post_form(&app, "/catalog/bookinstance/1/delete", "id=1").await;
    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
}

// A book repository that always fails, standing in for a broken store.
struct FailingBookRepository;

#[async_trait::async_trait]
impl BookRepository for FailingBookRepository {
    async fn find_all(&self) -> Result<Vec<Book>, DomainError> {
        Err(DomainError::Database("backend offline".to_string()))
    }

    async fn find_by_id(&self, _id: i32) -> Result<Option<Book>, DomainError> {
        Err(DomainError::Database("backend offline".to_string()))
    }

    async fn find_by_author(&self, _author_id: i32) -> Result<Vec<Book>, DomainError> {
        Err(DomainError::Database("backend offline".to_string()))
    }

    async fn find_by_genre(&self, _genre_id: i32) -> Result<Vec<Book>, DomainError> {
        Err(DomainError::Database("backend offline".to_string()))
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Err(DomainError::Database("backend offline".to_string()))
    }

    async fn create(&self, _draft: BookDraft) -> Result<Book, DomainError> {
        Err(DomainError::Database("backend offline".to_string()))
    }

    async fn update(&self, _id: i32, _draft: BookDraft) -> Result<Book, DomainError> {
        Err(DomainError::Database("backend offline".to_string()))
    }

    async fn delete(&self, _id: i32) -> Result<(), DomainError> {
        Err(DomainError::Database("backend offline".to_string()))
    }
}

#[tokio::test]
async fn aggregation_fails_fast_when_one_sub_query_errors() {
    let mut state = setup_test_state().await;
    let author = create_test_author(&state, "Isaac", "Asimov").await;

    // The author lookup succeeds but the dependent-books fetch fails; the
    // whole aggregation must fail with the store error, not render a page
    // from partial results.
    state.book_repo = Arc::new(FailingBookRepository);
    let app = test_app(state);

    let (status, body) = get_page(&app, &format!("/catalog/author/{}", author.id)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("backend offline"));
}
