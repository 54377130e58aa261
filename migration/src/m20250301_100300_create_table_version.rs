/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Version::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Version::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Version::Project).integer().not_null())
                    .col(ColumnDef::new(Version::Name).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-version-project")
                            .from(Version::Table, Version::Project)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Version::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Version {
    Table,
    Id,
    Project,
    Name,
}

#[derive(DeriveIden)]
enum Project {
    Table,
    Id,
}
