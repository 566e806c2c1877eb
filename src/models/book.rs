use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    /// Weak reference: the author row may have been deleted out from under
    /// us, in which case the book renders without author data.
    pub author_id: i32,
    pub summary: String,
    pub isbn: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::author::Entity",
        from = "Column::AuthorId",
        to = "super::author::Column::Id"
    )]
    Author,
    #[sea_orm(has_many = "super::book_instance::Entity")]
    BookInstances,
}

impl Related<super::author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::book_instance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookInstances.def()
    }
}

impl Related<super::genre::Entity> for Entity {
    fn to() -> RelationDef {
        super::book_genres::Relation::Genre.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::book_genres::Relation::Book.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Unpopulated conversion; the repository fills in `author` and `genres`
/// where the operation calls for them.
impl From<Model> for crate::domain::Book {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            author_id: model.author_id,
            summary: model.summary,
            isbn: model.isbn,
            author: None,
            genres: Vec::new(),
        }
    }
}
