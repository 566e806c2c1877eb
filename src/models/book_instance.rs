use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "book_instances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub book_id: i32,
    pub imprint: String,
    /// Circulation status of this physical copy.
    /// Valid values:
    /// - `Available`: on the shelf, can be loaned
    /// - `Maintenance`: being repaired or processed
    /// - `Loaned`: checked out, `due_back` says when it returns
    /// - `Reserved`: held for a reader
    pub status: String,
    /// ISO date (YYYY-MM-DD); only meaningful while the copy is out.
    pub due_back: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id"
    )]
    Book,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
