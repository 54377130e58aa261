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
                    .table(Milestone::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Milestone::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Milestone::Project).integer().not_null())
                    .col(ColumnDef::new(Milestone::Name).string().not_null())
                    .col(ColumnDef::new(Milestone::Description).text().not_null())
                    .col(ColumnDef::new(Milestone::DueDate).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-milestone-project")
                            .from(Milestone::Table, Milestone::Project)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Milestone::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Milestone {
    Table,
    Id,
    Project,
    Name,
    Description,
    DueDate,
}

#[derive(DeriveIden)]
enum Project {
    Table,
    Id,
}
