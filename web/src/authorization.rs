/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracker_core::consts::TOKEN_LIFETIME_HOURS;
use tracker_core::types::*;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize,
    pub iat: usize,
    pub id: i32,
}

fn bearer_token(header: &HeaderValue) -> WebResult<&str> {
    let header = header
        .to_str()
        .map_err(|_| WebError::Unauthorized("Invalid Authorization header".to_string()))?;

    let mut parts = header.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(WebError::Unauthorized(
            "Invalid Authorization header".to_string(),
        )),
    }
}

/// Attaches an [`Actor`] to every request. Requests without an
/// `Authorization` header continue as [`Actor::Anonymous`]; a header that
/// does not resolve to a user is rejected.
pub async fn authenticate(
    state: State<Arc<ServerState>>,
    mut req: Request,
    next: Next,
) -> WebResult<Response<Body>> {
    let token = match req.headers().get(axum::http::header::AUTHORIZATION) {
        Some(header) => Some(bearer_token(header)?.to_string()),
        None => None,
    };

    let actor = match token {
        Some(token) => {
            let token_data = decode_jwt(&state, &token)?;

            let user = EUser::find_by_id(token_data.claims.id)
                .one(&state.db)
                .await?
                .ok_or_else(|| WebError::Unauthorized("User not found".to_string()))?;

            Actor::User(user)
        }
        None => Actor::Anonymous,
    };

    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}

pub fn encode_jwt(state: &ServerState, id: i32) -> WebResult<String> {
    let now = Utc::now();
    let expire = Duration::hours(TOKEN_LIFETIME_HOURS);
    let exp: usize = (now + expire).timestamp() as usize;
    let iat: usize = now.timestamp() as usize;

    let claim = Claims { iat, exp, id };

    encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(state.jwt_secret.as_bytes()),
    )
    .map_err(|_| WebError::failed_to_generate_token())
}

pub fn decode_jwt(state: &ServerState, jwt: &str) -> WebResult<TokenData<Claims>> {
    decode(
        jwt,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        WebError::invalid_token()
    })
}
