//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::domain::{Author, Book, BookDraft, BookRepository, DomainError, Genre};
use crate::models::book::{ActiveModel, Column, Entity as BookEntity};
use crate::models::{author, book_genres, genre};

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn replace_genre_links(&self, book_id: i32, genre_ids: &[i32]) -> Result<(), DomainError> {
        book_genres::Entity::delete_many()
            .filter(book_genres::Column::BookId.eq(book_id))
            .exec(&self.db)
            .await?;

        for genre_id in genre_ids {
            let link = book_genres::ActiveModel {
                book_id: Set(book_id),
                genre_id: Set(*genre_id),
            };
            link.insert(&self.db).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self) -> Result<Vec<Book>, DomainError> {
        let models = BookEntity::find()
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await?;

        // Populate the author reference; a dangling id simply stays None.
        let mut books = Vec::with_capacity(models.len());
        for model in models {
            let author = author::Entity::find_by_id(model.author_id)
                .one(&self.db)
                .await?;

            let mut book = Book::from(model);
            book.author = author.map(Author::from);
            books.push(book);
        }

        Ok(books)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        let model = BookEntity::find_by_id(id).one(&self.db).await?;

        let Some(model) = model else {
            return Ok(None);
        };

        let author = author::Entity::find_by_id(model.author_id)
            .one(&self.db)
            .await?;
        let genres = model.find_related(genre::Entity).all(&self.db).await?;

        let mut book = Book::from(model);
        book.author = author.map(Author::from);
        book.genres = genres.into_iter().map(Genre::from).collect();

        Ok(Some(book))
    }

    async fn find_by_author(&self, author_id: i32) -> Result<Vec<Book>, DomainError> {
        let models = BookEntity::find()
            .filter(Column::AuthorId.eq(author_id))
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Book::from).collect())
    }

    async fn find_by_genre(&self, genre_id: i32) -> Result<Vec<Book>, DomainError> {
        let links = book_genres::Entity::find()
            .filter(book_genres::Column::GenreId.eq(genre_id))
            .all(&self.db)
            .await?;

        let book_ids: Vec<i32> = links.into_iter().map(|link| link.book_id).collect();
        if book_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = BookEntity::find()
            .filter(Column::Id.is_in(book_ids))
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Book::from).collect())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(BookEntity::find().count(&self.db).await?)
    }

    async fn create(&self, draft: BookDraft) -> Result<Book, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let book = ActiveModel {
            title: Set(draft.title),
            author_id: Set(draft.author_id),
            summary: Set(draft.summary),
            isbn: Set(draft.isbn),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = book.insert(&self.db).await?;
        self.replace_genre_links(result.id, &draft.genre_ids).await?;

        Ok(Book::from(result))
    }

    async fn update(&self, id: i32, draft: BookDraft) -> Result<Book, DomainError> {
        let existing = BookEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        // Full-record replace; the id column is never written.
        let mut active: ActiveModel = existing.into();
        active.title = Set(draft.title);
        active.author_id = Set(draft.author_id);
        active.summary = Set(draft.summary);
        active.isbn = Set(draft.isbn);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await?;
        self.replace_genre_links(id, &draft.genre_ids).await?;

        Ok(Book::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        book_genres::Entity::delete_many()
            .filter(book_genres::Column::BookId.eq(id))
            .exec(&self.db)
            .await?;

        let result = BookEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }
}
