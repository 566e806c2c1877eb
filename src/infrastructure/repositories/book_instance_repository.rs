//! SeaORM implementation of BookInstanceRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, Set,
};

use crate::domain::{
    Book, BookInstance, BookInstanceDraft, BookInstanceRepository, DomainError, Status,
};
use crate::models::book;
use crate::models::book_instance::{ActiveModel, Column, Entity as BookInstanceEntity, Model};
use crate::models::{parse_stored_date, store_date};

/// SeaORM-based implementation of BookInstanceRepository
pub struct SeaOrmBookInstanceRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookInstanceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: Model, book: Option<Book>) -> Result<BookInstance, DomainError> {
    let status: Status = model.status.parse().map_err(|_| {
        DomainError::Database(format!(
            "book instance {} has invalid status '{}'",
            model.id, model.status
        ))
    })?;

    Ok(BookInstance {
        id: model.id,
        book_id: model.book_id,
        imprint: model.imprint,
        status,
        due_back: parse_stored_date(model.due_back.as_deref()),
        book,
    })
}

#[async_trait]
impl BookInstanceRepository for SeaOrmBookInstanceRepository {
    async fn find_all(&self) -> Result<Vec<BookInstance>, DomainError> {
        let models = BookInstanceEntity::find().all(&self.db).await?;

        // Populate the book reference; a dangling id simply stays None.
        let mut instances = Vec::with_capacity(models.len());
        for model in models {
            let book = model.find_related(book::Entity).one(&self.db).await?;
            instances.push(to_domain(model, book.map(Book::from))?);
        }

        Ok(instances)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<BookInstance>, DomainError> {
        let model = BookInstanceEntity::find_by_id(id).one(&self.db).await?;

        let Some(model) = model else {
            return Ok(None);
        };

        let book = model.find_related(book::Entity).one(&self.db).await?;

        Ok(Some(to_domain(model, book.map(Book::from))?))
    }

    async fn find_by_book(&self, book_id: i32) -> Result<Vec<BookInstance>, DomainError> {
        let models = BookInstanceEntity::find()
            .filter(Column::BookId.eq(book_id))
            .all(&self.db)
            .await?;

        models
            .into_iter()
            .map(|model| to_domain(model, None))
            .collect()
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(BookInstanceEntity::find().count(&self.db).await?)
    }

    async fn count_available(&self) -> Result<u64, DomainError> {
        Ok(BookInstanceEntity::find()
            .filter(Column::Status.eq(Status::Available.as_str()))
            .count(&self.db)
            .await?)
    }

    async fn create(&self, draft: BookInstanceDraft) -> Result<BookInstance, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let instance = ActiveModel {
            book_id: Set(draft.book_id),
            imprint: Set(draft.imprint),
            status: Set(draft.status.to_string()),
            due_back: Set(store_date(draft.due_back)),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = instance.insert(&self.db).await?;

        to_domain(result, None)
    }

    async fn update(
        &self,
        id: i32,
        draft: BookInstanceDraft,
    ) -> Result<BookInstance, DomainError> {
        let existing = BookInstanceEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        // Full-record replace; the id column is never written.
        let mut active: ActiveModel = existing.into();
        active.book_id = Set(draft.book_id);
        active.imprint = Set(draft.imprint);
        active.status = Set(draft.status.to_string());
        active.due_back = Set(store_date(draft.due_back));
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await?;

        to_domain(result, None)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = BookInstanceEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }
}
