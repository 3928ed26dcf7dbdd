use sea_orm::prelude::Uuid;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select,
};

use crate::entity::{challenge, idea, idea_vote, site, user};
use crate::error::Result;

use super::SiteActivity;

/// Find a site by its domain name.
pub async fn find_site_by_domain(
    db: &DatabaseConnection,
    domain: &str,
) -> Result<Option<site::Model>> {
    let site = site::Entity::find()
        .filter(site::Column::Domain.eq(domain))
        .one(db)
        .await?;
    Ok(site)
}

/// Load every user, challenge, idea and idea vote belonging to a site.
///
/// Users come back in creation order (ties broken by ID), which is the
/// order rows appear in the exported workbook.
pub async fn load_site_activity(
    db: &DatabaseConnection,
    site: &site::Model,
) -> Result<SiteActivity> {
    let users = user::Entity::find()
        .filter(user::Column::SiteId.eq(site.id))
        .order_by_asc(user::Column::CreatedAt)
        .order_by_asc(user::Column::Id)
        .all(db)
        .await?;

    let challenges = challenge::Entity::find()
        .filter(challenge::Column::SiteId.eq(site.id))
        .order_by_asc(challenge::Column::CreatedAt)
        .all(db)
        .await?;

    let ideas = idea::Entity::find()
        .filter(idea::Column::SiteId.eq(site.id))
        .order_by_asc(idea::Column::CreatedAt)
        .all(db)
        .await?;

    let votes = site_votes(site.id).all(db).await?;

    tracing::debug!(
        site = %site.domain,
        users = users.len(),
        challenges = challenges.len(),
        ideas = ideas.len(),
        votes = votes.len(),
        "Loaded site activity"
    );

    Ok(SiteActivity {
        users,
        challenges,
        ideas,
        votes,
    })
}

/// Votes have no site column; filter on the voted idea's site instead.
fn site_votes(site_id: Uuid) -> Select<idea_vote::Entity> {
    idea_vote::Entity::find()
        .join(JoinType::InnerJoin, idea_vote::Relation::Idea.def())
        .filter(idea::Column::SiteId.eq(site_id))
        .order_by_asc(idea_vote::Column::CreatedAt)
}

/// Find every manager-flagged user on a site, ordered by email.
pub async fn find_managers(
    db: &DatabaseConnection,
    site: &site::Model,
) -> Result<Vec<user::Model>> {
    let managers = user::Entity::find()
        .filter(user::Column::SiteId.eq(site.id))
        .filter(user::Column::IsManager.eq(true))
        .order_by_asc(user::Column::Email)
        .all(db)
        .await?;
    Ok(managers)
}
