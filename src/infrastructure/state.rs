//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{AuthorRepository, BookInstanceRepository, BookRepository, GenreRepository};
use crate::infrastructure::{
    SeaOrmAuthorRepository, SeaOrmBookInstanceRepository, SeaOrmBookRepository,
    SeaOrmGenreRepository,
};
use crate::views::{DataBagRenderer, ViewRenderer};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Author repository
    pub author_repo: Arc<dyn AuthorRepository>,
    /// Book repository
    pub book_repo: Arc<dyn BookRepository>,
    /// Genre repository
    pub genre_repo: Arc<dyn GenreRepository>,
    /// BookInstance repository
    pub book_instance_repo: Arc<dyn BookInstanceRepository>,
    /// View renderer
    pub renderer: Arc<dyn ViewRenderer>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            author_repo: Arc::new(SeaOrmAuthorRepository::new(db.clone())),
            book_repo: Arc::new(SeaOrmBookRepository::new(db.clone())),
            genre_repo: Arc::new(SeaOrmGenreRepository::new(db.clone())),
            book_instance_repo: Arc::new(SeaOrmBookInstanceRepository::new(db)),
            renderer: Arc::new(DataBagRenderer),
        }
    }
}
