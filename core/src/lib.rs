/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod consts;
pub mod database;
pub mod error;
pub mod forms;
pub mod input;
pub mod permission;
pub mod project;
pub mod types;

use anyhow::{Result, bail};
use database::connect_db;
use input::load_secret;
use permission::GrantAuthorizer;
use std::sync::Arc;
use types::*;

pub async fn init_state(cli: Cli) -> Result<Arc<ServerState>> {
    tracing::info!("Starting Tracker Server on {}:{}", cli.ip, cli.port);

    let jwt_secret = load_secret(&cli.jwt_secret_file);
    if jwt_secret.is_empty() {
        bail!(
            "JWT secret file {} is missing or empty",
            cli.jwt_secret_file
        );
    }

    let db = connect_db(&cli).await?;

    Ok(Arc::new(ServerState {
        db,
        cli,
        authorizer: GrantAuthorizer,
        jwt_secret,
    }))
}
