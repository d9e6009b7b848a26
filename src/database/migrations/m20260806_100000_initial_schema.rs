use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create tables in order of dependencies
        self.create_clubs_table(manager).await?;
        self.create_stadiums_table(manager).await?;
        self.create_indexes(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order
        manager
            .drop_table(Table::drop().table(Stadiums::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clubs::Table).to_owned())
            .await?;
        Ok(())
    }
}

impl Migration {
    // Helper functions for database-specific types
    fn create_id_column(&self, manager: &SchemaManager, column: impl IntoIden) -> ColumnDef {
        let mut col = ColumnDef::new(column);
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => col.uuid().not_null(),
            _ => col.string().not_null(),
        };
        col
    }

    fn create_timestamp_column(&self, manager: &SchemaManager, column: impl IntoIden) -> ColumnDef {
        let mut col = ColumnDef::new(column);
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => col.timestamp_with_time_zone().not_null(),
            _ => col.string().not_null(),
        };
        col
    }

    async fn create_clubs_table(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Clubs::Table)
                    .if_not_exists()
                    .col(self.create_id_column(manager, Clubs::Id).primary_key())
                    .col(ColumnDef::new(Clubs::Name).string().not_null())
                    .col(self.create_timestamp_column(manager, Clubs::CreatedAt))
                    .col(self.create_timestamp_column(manager, Clubs::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn create_stadiums_table(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Stadiums::Table)
                    .if_not_exists()
                    .col(self.create_id_column(manager, Stadiums::Id).primary_key())
                    .col(ColumnDef::new(Stadiums::Name).string().not_null())
                    .col(ColumnDef::new(Stadiums::Capacity).integer().not_null())
                    .col(self.create_id_column(manager, Stadiums::ClubId))
                    .col(self.create_timestamp_column(manager, Stadiums::CreatedAt))
                    .col(self.create_timestamp_column(manager, Stadiums::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stadiums_club_id")
                            .from(Stadiums::Table, Stadiums::ClubId)
                            .to(Clubs::Table, Clubs::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_indexes(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_clubs_name_unique")
                    .table(Clubs::Table)
                    .col(Clubs::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_stadiums_name_unique")
                    .table(Stadiums::Table)
                    .col(Stadiums::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_stadiums_club_id")
                    .table(Stadiums::Table)
                    .col(Stadiums::ClubId)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Clubs {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Stadiums {
    Table,
    Id,
    Name,
    Capacity,
    ClubId,
    CreatedAt,
    UpdatedAt,
}
