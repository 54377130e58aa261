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
use tracker_core::forms::{MemberForm, ProjectForm};
use tracker_core::project::{CascadeReport, ProjectDetail};
use tracker_core::types::*;

pub async fn get(state: State<Arc<ServerState>>) -> WebResult<Json<BaseResponse<ListResponse>>> {
    let projects: ListResponse = state
        .projects()
        .list_projects()
        .await?
        .into_iter()
        .map(|p| ListItem {
            id: p.id,
            name: p.name,
        })
        .collect();

    Ok(ok(projects))
}

pub async fn get_start(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
) -> WebResult<Json<BaseResponse<ProjectForm>>> {
    Ok(ok(state.projects().start_form(&actor)?))
}

pub async fn post_start(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    form: Result<Form<ProjectForm>, FormRejection>,
) -> WebResult<Response> {
    let Form(form) = form?;
    let project = state.projects().create_project(&actor, &form).await?;

    Ok(found(project_detail_url(project.id)))
}

pub async fn get_detail(
    state: State<Arc<ServerState>>,
    Path(project): Path<i32>,
) -> WebResult<Json<BaseResponse<ProjectDetail>>> {
    Ok(ok(state.projects().project_detail(project).await?))
}

pub async fn get_update(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    Path(project): Path<i32>,
) -> WebResult<Json<BaseResponse<ProjectForm>>> {
    Ok(ok(state.projects().update_form(&actor, project).await?))
}

pub async fn post_update(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    Path(project): Path<i32>,
    form: Result<Form<ProjectForm>, FormRejection>,
) -> WebResult<Json<BaseResponse<MProject>>> {
    let Form(form) = form?;

    Ok(ok(state
        .projects()
        .update_project(&actor, project, &form)
        .await?))
}

pub async fn get_delete(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    Path(project): Path<i32>,
) -> WebResult<Json<BaseResponse<MProject>>> {
    Ok(ok(state.projects().delete_form(&actor, project).await?))
}

pub async fn post_delete(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    Path(project): Path<i32>,
) -> WebResult<Response> {
    let _: CascadeReport = state.projects().delete_project(&actor, project).await?;

    Ok(found("/project/".to_string()))
}

pub async fn post_transfer(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    Path(project): Path<i32>,
    form: Result<Form<MemberForm>, FormRejection>,
) -> WebResult<Json<BaseResponse<MProject>>> {
    let Form(form) = form?;

    Ok(ok(state
        .projects()
        .transfer_ownership(&actor, project, &form)
        .await?))
}
