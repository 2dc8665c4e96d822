use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserAuths::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserAuths::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserAuths::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserAuths::IdentityType).string().not_null())
                    .col(ColumnDef::new(UserAuths::Identifier).string().not_null())
                    .col(ColumnDef::new(UserAuths::Credential).string().not_null())
                    .col(
                        ColumnDef::new(UserAuths::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserAuths::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserAuths::Table, UserAuths::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(UserAuths::Table)
                    .col(UserAuths::IdentityType)
                    .col(UserAuths::Identifier)
                    .unique()
                    .name("idx_user_auths_type_identifier")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserAuths::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserAuths {
    Table,
    Id,
    UserId,
    IdentityType,
    Identifier,
    Credential,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
