/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod authorization;
pub mod endpoints;
pub mod error;

use axum::routing::{get, post};
use axum::{Router, middleware};
use endpoints::*;
use http::HeaderValue;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracker_core::types::ServerState;

fn cors_layer(state: &ServerState) -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        state.cli.serve_url.clone(),
        format!("http://{}:8000", state.cli.ip),
    ]
    .into_iter()
    .filter_map(|origin| HeaderValue::from_str(&origin).ok())
    .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_headers(vec![AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
}

pub fn create_router(state: Arc<ServerState>) -> Router {
    let app = Router::new()
        .route("/project/", get(projects::get))
        .route(
            "/project/start",
            get(projects::get_start).post(projects::post_start),
        )
        .route("/project/{project}/detail", get(projects::get_detail))
        .route(
            "/project/{project}/update",
            get(projects::get_update).post(projects::post_update),
        )
        .route(
            "/project/{project}/delete",
            get(projects::get_delete).post(projects::post_delete),
        )
        .route("/project/{project}/transfer", post(projects::post_transfer))
        .route(
            "/project/{project}/add_milestone",
            get(milestones::get_add).post(milestones::post_add),
        )
        .route(
            "/project/milestone/{milestone}/update",
            get(milestones::get_update).post(milestones::post_update),
        )
        .route(
            "/project/milestone/{milestone}/delete",
            get(milestones::get_delete).post(milestones::post_delete),
        )
        .route(
            "/project/{project}/add_version",
            get(versions::get_add).post(versions::post_add),
        )
        .route(
            "/project/version/{version}/update",
            get(versions::get_update).post(versions::post_update),
        )
        .route(
            "/project/version/{version}/delete",
            get(versions::get_delete).post(versions::post_delete),
        )
        .route(
            "/project/{project}/add-member",
            get(members::get_add).post(members::post_add),
        )
        .route(
            "/project/{project}/remove-member/{user}",
            get(members::get_remove).post(members::post_remove),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            authorization::authenticate,
        ))
        .route("/api/user/login", post(auth::post_login))
        .route("/api/user/register", post(auth::post_register))
        .route("/api/health", get(get_health))
        .fallback(handle_404)
        .layer(TraceLayer::new_for_http());

    let app = if state.cli.debug {
        app.layer(cors_layer(&state))
    } else {
        app
    };

    app.with_state(state)
}

pub async fn serve_web(state: Arc<ServerState>) -> std::io::Result<()> {
    let server_url = format!("{}:{}", state.cli.ip, state.cli.port);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&server_url).await?;
    tracing::info!("Listening on {}", server_url);
    axum::serve(listener, app).await
}
