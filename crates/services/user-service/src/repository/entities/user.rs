//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{DomainError, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Identity provider subject id
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl TryFrom<Model> for User {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let role = model
            .role
            .parse()
            .map_err(|_| DomainError::internal(format!("Stored role is invalid: {}", model.role)))?;

        Ok(User {
            id: model.id,
            email: model.email,
            name: model.name,
            role,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
