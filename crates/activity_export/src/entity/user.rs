//! User entity - a person registered on a site.
//!
//! Two boolean flags carry the role: `is_contributor` for ordinary
//! participants and `is_manager` for users eligible to receive reports.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning site.
    pub site_id: Uuid,

    pub username: String,

    /// Email address. Used as the row key in exported reports.
    pub email: String,

    pub first_name: String,

    pub last_name: String,

    /// Ordinary participant.
    pub is_contributor: bool,

    /// Manager of the site.
    pub is_manager: bool,

    /// When the account was created.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::site::Entity",
        from = "Column::SiteId",
        to = "super::site::Column::Id",
        on_delete = "Cascade"
    )]
    Site,
    #[sea_orm(has_many = "super::challenge::Entity")]
    Challenges,
    #[sea_orm(has_many = "super::idea::Entity")]
    Ideas,
    #[sea_orm(has_many = "super::idea_vote::Entity")]
    IdeaVotes,
}

impl Related<super::site::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Site.def()
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

impl Related<super::idea_vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IdeaVotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Role derived from the user's flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Manager,
    Contributor,
    Member,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Manager => write!(f, "manager"),
            UserRole::Contributor => write!(f, "contributor"),
            UserRole::Member => write!(f, "member"),
        }
    }
}

impl Model {
    /// First and last name joined with a space, trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// The most privileged role this user holds.
    ///
    /// A user flagged as both manager and contributor is reported as a manager.
    pub fn role(&self) -> UserRole {
        if self.is_manager {
            UserRole::Manager
        } else if self.is_contributor {
            UserRole::Contributor
        } else {
            UserRole::Member
        }
    }
}
