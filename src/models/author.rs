use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::parse_stored_date;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "authors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub family_name: String,
    /// ISO date (YYYY-MM-DD) or NULL.
    pub date_of_birth: Option<String>,
    pub date_of_death: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::book::Entity")]
    Books,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Books.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::Author {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            family_name: model.family_name,
            date_of_birth: parse_stored_date(model.date_of_birth.as_deref()),
            date_of_death: parse_stored_date(model.date_of_death.as_deref()),
        }
    }
}
