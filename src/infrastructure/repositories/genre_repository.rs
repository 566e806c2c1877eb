//! SeaORM implementation of GenreRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{DomainError, Genre, GenreDraft, GenreRepository};
use crate::models::genre::{ActiveModel, Column, Entity as GenreEntity};

/// SeaORM-based implementation of GenreRepository
pub struct SeaOrmGenreRepository {
    db: DatabaseConnection,
}

impl SeaOrmGenreRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GenreRepository for SeaOrmGenreRepository {
    async fn find_all(&self) -> Result<Vec<Genre>, DomainError> {
        let genres = GenreEntity::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;

        Ok(genres.into_iter().map(Genre::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Genre>, DomainError> {
        let genre = GenreEntity::find_by_id(id).one(&self.db).await?;

        Ok(genre.map(Genre::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Genre>, DomainError> {
        let genre = GenreEntity::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await?;

        Ok(genre.map(Genre::from))
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(GenreEntity::find().count(&self.db).await?)
    }

    async fn create(&self, draft: GenreDraft) -> Result<Genre, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let genre = ActiveModel {
            name: Set(draft.name),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = genre.insert(&self.db).await?;

        Ok(Genre::from(result))
    }

    async fn update(&self, id: i32, draft: GenreDraft) -> Result<Genre, DomainError> {
        let existing = GenreEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(draft.name);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await?;

        Ok(Genre::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = GenreEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }
}
