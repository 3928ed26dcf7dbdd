//! Site entity - the tenant scope that partitions users and content.
//!
//! Every user, challenge and idea belongs to exactly one site. Sites are
//! looked up by their domain name (e.g. `example.com`).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Site model - one deployment of the ideas platform.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sites")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Domain name the site is served from. Unique across all sites.
    #[sea_orm(unique)]
    pub domain: String,

    /// Display name.
    pub name: String,

    /// When this site was created.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user::Entity")]
    Users,
    #[sea_orm(has_many = "super::challenge::Entity")]
    Challenges,
    #[sea_orm(has_many = "super::idea::Entity")]
    Ideas,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::challenge::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Challenges.def()
    }
}

impl Related<super::idea::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ideas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
