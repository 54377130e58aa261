/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

#![allow(dead_code)]

use axum_test::TestServer;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set};
use std::sync::Arc;
use tracker_core::database::connect_url;
use tracker_core::permission::GrantAuthorizer;
use tracker_core::types::*;
use web::authorization::encode_jwt;
use web::create_router;

pub const JWT_SECRET: &str = "test-jwt-secret";

pub fn create_cli() -> Cli {
    Cli {
        log_level: "info".to_string(),
        log_format: LogFormat::Pretty,
        debug: false,
        ip: "127.0.0.1".to_string(),
        port: 3000,
        serve_url: "http://127.0.0.1:8000".to_string(),
        database_url: Some("sqlite::memory:".to_string()),
        database_url_file: None,
        jwt_secret_file: "/run/secrets/tracker-jwt".to_string(),
        disable_registration: false,
    }
}

pub async fn create_state_with(cli: Cli) -> Arc<ServerState> {
    let db = connect_url("sqlite::memory:", false)
        .await
        .expect("in-memory database");

    Arc::new(ServerState {
        db,
        cli,
        authorizer: GrantAuthorizer,
        jwt_secret: JWT_SECRET.to_string(),
    })
}

pub async fn create_server_with(cli: Cli) -> (TestServer, Arc<ServerState>) {
    let state = create_state_with(cli).await;
    let server = TestServer::new(create_router(Arc::clone(&state))).expect("test server");
    (server, state)
}

pub async fn create_server() -> (TestServer, Arc<ServerState>) {
    create_server_with(create_cli()).await
}

/// Inserts a user directly and returns it with a valid bearer token.
pub async fn create_user(state: &ServerState, username: &str) -> (MUser, String) {
    let user = AUser {
        id: NotSet,
        username: Set(username.to_string()),
        name: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        password: Set("!".to_string()),
        is_staff: Set(false),
        created_at: Set(Utc::now().naive_utc()),
    }
    .insert(&state.db)
    .await
    .expect("insert user");

    let token = encode_jwt(state, user.id).expect("token");
    (user, token)
}
