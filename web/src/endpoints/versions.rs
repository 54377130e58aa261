/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::{found, ok, project_detail_url};
use crate::error::WebResult;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Path, State};
use axum::response::Response;
use axum::{Extension, Json};
use std::sync::Arc;
use tracker_core::forms::VersionForm;
use tracker_core::types::*;

pub async fn get_add(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    Path(project): Path<i32>,
) -> WebResult<Json<BaseResponse<VersionForm>>> {
    state.projects().add_version_form(&actor, project).await?;
    Ok(ok(VersionForm::default()))
}

pub async fn post_add(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    Path(project): Path<i32>,
    form: Result<Form<VersionForm>, FormRejection>,
) -> WebResult<Response> {
    let Form(form) = form?;
    let version = state
        .projects()
        .add_version(&actor, project, &form)
        .await?;

    Ok(found(project_detail_url(version.project)))
}

pub async fn get_update(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    Path(version): Path<i32>,
) -> WebResult<Json<BaseResponse<VersionForm>>> {
    let version = state.projects().version(&actor, version).await?;
    Ok(ok(VersionForm::from(&version)))
}

pub async fn post_update(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    Path(version): Path<i32>,
    form: Result<Form<VersionForm>, FormRejection>,
) -> WebResult<Json<BaseResponse<MVersion>>> {
    let Form(form) = form?;

    Ok(ok(state
        .projects()
        .update_version(&actor, version, &form)
        .await?))
}

pub async fn get_delete(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    Path(version): Path<i32>,
) -> WebResult<Json<BaseResponse<MVersion>>> {
    Ok(ok(state.projects().version(&actor, version).await?))
}

pub async fn post_delete(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    Path(version): Path<i32>,
) -> WebResult<Response> {
    let version = state.projects().delete_version(&actor, version).await?;
    Ok(found(project_detail_url(version.project)))
}
