//! Creates the `session` table: `sid` text primary key, `sess` JSON blob,
//! `expire` timestamptz, plus an index on `expire`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Session::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Session::Sid)
                            .text()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Session::Sess).json().not_null())
                    .col(
                        ColumnDef::new(Session::Expire)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_session_expire")
                    .table(Session::Table)
                    .col(Session::Expire)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Session::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Session {
    Table,
    Sid,
    Sess,
    Expire,
}
