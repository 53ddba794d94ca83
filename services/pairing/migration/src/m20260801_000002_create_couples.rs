use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Couples::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Couples::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Couples::User1Id).uuid().not_null())
                    .col(ColumnDef::new(Couples::User2Id).uuid().not_null())
                    .col(ColumnDef::new(Couples::CoupleName).string())
                    .col(
                        ColumnDef::new(Couples::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Couples::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Couples::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Couples::Table, Couples::User1Id)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Couples::Table, Couples::User2Id)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // users.couple_id back-reference; deleting a couple detaches both members.
        manager
            .alter_table(
                Table::alter()
                    .table(Users::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_users_couple_id")
                            .from_tbl(Users::Table)
                            .from_col(Users::CoupleId)
                            .to_tbl(Couples::Table)
                            .to_col(Couples::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Users::Table)
                    .drop_foreign_key(Alias::new("fk_users_couple_id"))
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Couples::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Couples {
    Table,
    Id,
    User1Id,
    User2Id,
    CoupleName,
    StartDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    CoupleId,
}
