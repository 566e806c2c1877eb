//! SeaORM implementation of AuthorRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set,
};

use crate::domain::{Author, AuthorDraft, AuthorRepository, DomainError};
use crate::models::author::{ActiveModel, Column, Entity as AuthorEntity};
use crate::models::store_date;

/// SeaORM-based implementation of AuthorRepository
pub struct SeaOrmAuthorRepository {
    db: DatabaseConnection,
}

impl SeaOrmAuthorRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuthorRepository for SeaOrmAuthorRepository {
    async fn find_all(&self) -> Result<Vec<Author>, DomainError> {
        let authors = AuthorEntity::find()
            .order_by_asc(Column::FamilyName)
            .all(&self.db)
            .await?;

        Ok(authors.into_iter().map(Author::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Author>, DomainError> {
        let author = AuthorEntity::find_by_id(id).one(&self.db).await?;

        Ok(author.map(Author::from))
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(AuthorEntity::find().count(&self.db).await?)
    }

    async fn create(&self, draft: AuthorDraft) -> Result<Author, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let author = ActiveModel {
            first_name: Set(draft.first_name),
            family_name: Set(draft.family_name),
            date_of_birth: Set(store_date(draft.date_of_birth)),
            date_of_death: Set(store_date(draft.date_of_death)),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = author.insert(&self.db).await?;

        Ok(Author::from(result))
    }

    async fn update(&self, id: i32, draft: AuthorDraft) -> Result<Author, DomainError> {
        let existing = AuthorEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        // Full-record replace; the id column is never written.
        let mut active: ActiveModel = existing.into();
        active.first_name = Set(draft.first_name);
        active.family_name = Set(draft.family_name);
        active.date_of_birth = Set(store_date(draft.date_of_birth));
        active.date_of_death = Set(store_date(draft.date_of_death));
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await?;

        Ok(Author::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = AuthorEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }
}
