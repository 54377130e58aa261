/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::authorization::encode_jwt;
use crate::error::{WebError, WebResult};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use chrono::Utc;
use email_address::EmailAddress;
use password_auth::{generate_hash, verify_password};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracker_core::input::{check_username, validate_name, validate_password};
use tracker_core::types::*;

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeLoginRequest {
    pub loginname: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeUserRequest {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

pub async fn post_register(
    state: State<Arc<ServerState>>,
    body: Result<Json<MakeUserRequest>, JsonRejection>,
) -> WebResult<Json<BaseResponse<String>>> {
    if state.cli.disable_registration {
        return Err(WebError::registration_disabled());
    }

    let Json(body) = body?;

    check_username(&body.username).map_err(WebError::invalid_username)?;
    let name = validate_name("Name", &body.name).map_err(WebError::BadRequest)?;

    if !EmailAddress::is_valid(&body.email) {
        return Err(WebError::invalid_email());
    }

    validate_password(&body.password).map_err(WebError::invalid_password)?;

    let existing = EUser::find()
        .filter(
            Condition::any()
                .add(CUser::Username.eq(body.username.clone()))
                .add(CUser::Email.eq(body.email.clone())),
        )
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(WebError::already_exists("User"));
    }

    let user = AUser {
        id: NotSet,
        username: Set(body.username.clone()),
        name: Set(name),
        email: Set(body.email.clone()),
        password: Set(generate_hash(&body.password)),
        is_staff: Set(false),
        created_at: Set(Utc::now().naive_utc()),
    };

    let user = user.insert(&state.db).await?;
    tracing::info!(user = %user.username, "User registered");

    let res = BaseResponse {
        error: false,
        message: user.id.to_string(),
    };

    Ok(Json(res))
}

pub async fn post_login(
    state: State<Arc<ServerState>>,
    body: Result<Json<MakeLoginRequest>, JsonRejection>,
) -> WebResult<Json<BaseResponse<String>>> {
    let Json(body) = body?;

    let user = EUser::find()
        .filter(
            Condition::any()
                .add(CUser::Username.eq(body.loginname.clone()))
                .add(CUser::Email.eq(body.loginname.clone())),
        )
        .one(&state.db)
        .await?
        .ok_or_else(WebError::invalid_credentials)?;

    if verify_password(&body.password, &user.password).is_err() {
        tracing::warn!(user = %user.username, "Failed login attempt");
        return Err(WebError::invalid_credentials());
    }

    let token = encode_jwt(&state, user.id)?;

    let res = BaseResponse {
        error: false,
        message: token,
    };

    Ok(Json(res))
}
