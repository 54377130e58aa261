/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr,
    EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use std::time::Duration;
use tracing::log::LevelFilter;

use super::types::*;

pub async fn connect_db(cli: &Cli) -> Result<DatabaseConnection> {
    let db_url = if let Some(file) = &cli.database_url_file {
        std::fs::read_to_string(file)
            .context("Failed to read database url from file")?
            .trim()
            .to_string()
    } else if let Some(url) = &cli.database_url {
        url.clone()
    } else {
        anyhow::bail!("No database url provided")
    };

    connect_url(&db_url, cli.log_level == "debug").await
}

/// Opens a connection pool for `db_url` and brings the schema up to date.
pub async fn connect_url(db_url: &str, sql_logging: bool) -> Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(db_url.to_string());

    // Only enable SQL logging at debug level
    if sql_logging {
        opt.sqlx_logging(true)
            .sqlx_logging_level(LevelFilter::Debug);
    } else {
        opt.sqlx_logging(false);
    }

    if db_url.starts_with("sqlite::memory:") {
        // every pooled connection would otherwise open its own empty database
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(100)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(300));
    }

    let db = Database::connect(opt)
        .await
        .context("Failed to connect to database")?;
    Migrator::up(&db, None)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database ready");
    Ok(db)
}

pub async fn get_user_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> Result<Option<MUser>, DbErr> {
    EUser::find()
        .filter(CUser::Username.eq(username))
        .one(db)
        .await
}

pub async fn get_project_members<C: ConnectionTrait>(
    db: &C,
    project_id: i32,
) -> Result<Vec<MUser>, DbErr> {
    EUser::find()
        .join(JoinType::InnerJoin, entity::user::Relation::ProjectMember.def())
        .filter(CProjectMember::Project.eq(project_id))
        .order_by_asc(CUser::Username)
        .all(db)
        .await
}
