//! Initial migration creating the site, user and content tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_sites(manager).await?;
        self.create_users(manager).await?;
        self.create_challenges(manager).await?;
        self.create_ideas(manager).await?;
        self.create_idea_votes(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IdeaVotes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ideas::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Challenges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sites::Table).to_owned())
            .await?;
        Ok(())
    }
}

impl Migration {
    async fn create_sites(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sites::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sites::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sites::Domain).string().not_null())
                    .col(
                        ColumnDef::new(Sites::Name)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Sites::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sites_domain")
                    .table(Sites::Table)
                    .col(Sites::Domain)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_users(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::SiteId).uuid().not_null())
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(
                        ColumnDef::new(Users::FirstName)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Users::LastName)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    // Role flags
                    .col(
                        ColumnDef::new(Users::IsContributor)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::IsManager)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_site")
                            .from(Users::Table, Users::SiteId)
                            .to(Sites::Table, Sites::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_site_id")
                    .table(Users::Table)
                    .col(Users::SiteId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_challenges(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Challenges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Challenges::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Challenges::SiteId).uuid().not_null())
                    .col(ColumnDef::new(Challenges::CreatorId).uuid().not_null())
                    .col(ColumnDef::new(Challenges::Name).string().not_null())
                    .col(ColumnDef::new(Challenges::Description).text().null())
                    .col(
                        ColumnDef::new(Challenges::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_challenges_site")
                            .from(Challenges::Table, Challenges::SiteId)
                            .to(Sites::Table, Sites::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_challenges_creator")
                            .from(Challenges::Table, Challenges::CreatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_challenges_creator_id")
                    .table(Challenges::Table)
                    .col(Challenges::CreatorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_ideas(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ideas::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Ideas::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Ideas::SiteId).uuid().not_null())
                    .col(ColumnDef::new(Ideas::ChallengeId).uuid().not_null())
                    .col(ColumnDef::new(Ideas::CreatorId).uuid().not_null())
                    .col(ColumnDef::new(Ideas::Name).string().not_null())
                    .col(ColumnDef::new(Ideas::Summary).text().null())
                    .col(
                        ColumnDef::new(Ideas::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ideas_site")
                            .from(Ideas::Table, Ideas::SiteId)
                            .to(Sites::Table, Sites::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ideas_challenge")
                            .from(Ideas::Table, Ideas::ChallengeId)
                            .to(Challenges::Table, Challenges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ideas_creator")
                            .from(Ideas::Table, Ideas::CreatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ideas_creator_id")
                    .table(Ideas::Table)
                    .col(Ideas::CreatorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_idea_votes(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IdeaVotes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IdeaVotes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(IdeaVotes::IdeaId).uuid().not_null())
                    .col(ColumnDef::new(IdeaVotes::CreatorId).uuid().not_null())
                    .col(
                        ColumnDef::new(IdeaVotes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_idea_votes_idea")
                            .from(IdeaVotes::Table, IdeaVotes::IdeaId)
                            .to(Ideas::Table, Ideas::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_idea_votes_creator")
                            .from(IdeaVotes::Table, IdeaVotes::CreatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_idea_votes_creator_id")
                    .table(IdeaVotes::Table)
                    .col(IdeaVotes::CreatorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Sites {
    Table,
    Id,
    Domain,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    SiteId,
    Username,
    Email,
    FirstName,
    LastName,
    IsContributor,
    IsManager,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Challenges {
    Table,
    Id,
    SiteId,
    CreatorId,
    Name,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Ideas {
    Table,
    Id,
    SiteId,
    ChallengeId,
    CreatorId,
    Name,
    Summary,
    CreatedAt,
}

#[derive(DeriveIden)]
enum IdeaVotes {
    Table,
    Id,
    IdeaId,
    CreatorId,
    CreatedAt,
}
