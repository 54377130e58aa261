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
                    .table(ProjectPermission::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProjectPermission::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProjectPermission::User).integer().not_null())
                    .col(
                        ColumnDef::new(ProjectPermission::Project)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProjectPermission::Kind)
                            .small_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-project_permission-user")
                            .from(ProjectPermission::Table, ProjectPermission::User)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-project_permission-project")
                            .from(ProjectPermission::Table, ProjectPermission::Project)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-project_permission-user-project-kind")
                    .table(ProjectPermission::Table)
                    .col(ProjectPermission::User)
                    .col(ProjectPermission::Project)
                    .col(ProjectPermission::Kind)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProjectPermission::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProjectPermission {
    Table,
    Id,
    User,
    Project,
    Kind,
}

#[derive(DeriveIden)]
enum Project {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
