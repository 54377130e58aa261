/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub use sea_orm_migration::prelude::*;

mod m20250301_100000_create_table_user;
mod m20250301_100100_create_table_project;
mod m20250301_100200_create_table_milestone;
mod m20250301_100300_create_table_version;
mod m20250301_100400_create_table_project_member;
mod m20250301_100500_create_table_project_permission;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_100000_create_table_user::Migration),
            Box::new(m20250301_100100_create_table_project::Migration),
            Box::new(m20250301_100200_create_table_milestone::Migration),
            Box::new(m20250301_100300_create_table_version::Migration),
            Box::new(m20250301_100400_create_table_project_member::Migration),
            Box::new(m20250301_100500_create_table_project_permission::Migration),
        ]
    }
}
